/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
pub mod kafka;
pub mod push;

use std::sync::Arc;

use async_trait::async_trait;
use shared::utils::logger::*;

use crate::{
    common::types::*,
    events::push::BroadcastHub,
    tools::{error::AppError, prometheus::EVENT_PUBLISH_FAILURES},
};

/// Durable pub/sub seam, partitioned by entity id.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, topic: &str, key: &str, payload: String) -> Result<(), AppError>;
}

pub fn driver_channel(DriverId(driver_id): &DriverId) -> String {
    format!("location/{driver_id}")
}

pub fn order_channel(OrderId(order_id): &OrderId) -> String {
    format!("order/{order_id}")
}

/// Fans every event out to the pub/sub topic and the live push channel.
/// Both sinks are best effort and at most once: failures are logged and
/// counted, never retried, never surfaced to the caller.
pub struct EventPublisher {
    bus: Arc<dyn EventBus>,
    hub: Arc<BroadcastHub>,
    location_update_topic: String,
    delivery_status_topic: String,
}

impl EventPublisher {
    pub fn new(
        bus: Arc<dyn EventBus>,
        hub: Arc<BroadcastHub>,
        location_update_topic: String,
        delivery_status_topic: String,
    ) -> Self {
        Self {
            bus,
            hub,
            location_update_topic,
            delivery_status_topic,
        }
    }

    pub async fn location_updated(&self, ping: &LocationPing) {
        let payload = match serde_json::to_string(ping) {
            Ok(payload) => payload,
            Err(err) => {
                error!(tag = "[Event Publish Failed]", driver_id = %ping.driver_id.0, error = %err);
                EVENT_PUBLISH_FAILURES.inc();
                return;
            }
        };

        if let Err(err) = self
            .bus
            .publish(&self.location_update_topic, &ping.driver_id.0, payload.clone())
            .await
        {
            error!(
                tag = "[Event Publish Failed]",
                topic = %self.location_update_topic,
                driver_id = %ping.driver_id.0,
                error = %err
            );
            EVENT_PUBLISH_FAILURES.inc();
        }

        self.hub.publish(&driver_channel(&ping.driver_id), payload);
    }

    pub async fn status_updated(&self, tracking: &OrderTracking) {
        let payload = match serde_json::to_string(tracking) {
            Ok(payload) => payload,
            Err(err) => {
                error!(tag = "[Event Publish Failed]", order_id = %tracking.order_id.0, error = %err);
                EVENT_PUBLISH_FAILURES.inc();
                return;
            }
        };

        if let Err(err) = self
            .bus
            .publish(
                &self.delivery_status_topic,
                &tracking.order_id.0,
                payload.clone(),
            )
            .await
        {
            error!(
                tag = "[Event Publish Failed]",
                topic = %self.delivery_status_topic,
                order_id = %tracking.order_id.0,
                error = %err
            );
            EVENT_PUBLISH_FAILURES.inc();
        }

        self.hub.publish(&order_channel(&tracking.order_id), payload);
    }
}
