use std::sync::Mutex;

use rustc_hash::FxHashMap;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// In-process live push hub. Connected observers subscribe to a per-entity
/// channel name (`location/{driverId}`, `order/{orderId}`); publishes to a
/// channel with no subscribers are dropped.
#[derive(Default)]
pub struct BroadcastHub {
    channels: Mutex<FxHashMap<String, broadcast::Sender<String>>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, channel: &str, payload: String) {
        let Ok(mut channels) = self.channels.lock() else {
            return;
        };
        if let Some(sender) = channels.get(channel) {
            if sender.send(payload).is_err() {
                // the last subscriber disconnected
                channels.remove(channel);
            }
        }
    }

    pub fn subscribe(&self, channel: &str) -> broadcast::Receiver<String> {
        let Ok(mut channels) = self.channels.lock() else {
            return broadcast::channel(1).1;
        };
        channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_subscriber() {
        let hub = BroadcastHub::new();
        let mut receiver = hub.subscribe("location/D1");
        hub.publish("location/D1", "{\"driverId\":\"D1\"}".to_string());
        assert_eq!(receiver.recv().await.unwrap(), "{\"driverId\":\"D1\"}");
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_dropped() {
        let hub = BroadcastHub::new();
        hub.publish("location/D2", "ignored".to_string());

        // a later subscriber only sees events published after subscribing
        let mut receiver = hub.subscribe("location/D2");
        hub.publish("location/D2", "seen".to_string());
        assert_eq!(receiver.recv().await.unwrap(), "seen");
    }

    #[tokio::test]
    async fn closed_channels_are_removed() {
        let hub = BroadcastHub::new();
        let receiver = hub.subscribe("order/O1");
        drop(receiver);
        hub.publish("order/O1", "lost".to_string());

        let mut receiver = hub.subscribe("order/O1");
        hub.publish("order/O1", "fresh".to_string());
        assert_eq!(receiver.recv().await.unwrap(), "fresh");
    }
}
