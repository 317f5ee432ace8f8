use std::time::Duration;

use async_trait::async_trait;
use rdkafka::{
    producer::{FutureProducer, FutureRecord},
    util::Timeout,
};
use shared::utils::logger::*;

use crate::{events::EventBus, tools::error::AppError};

/// Kafka-backed event bus. The producer is optional: when the broker was not
/// reachable at startup the service keeps running and publishes degrade to a
/// log line, matching the rest of the best-effort pipeline.
pub struct KafkaEventBus {
    producer: Option<FutureProducer>,
}

impl KafkaEventBus {
    pub fn new(producer: Option<FutureProducer>) -> Self {
        Self { producer }
    }
}

#[async_trait]
impl EventBus for KafkaEventBus {
    async fn publish(&self, topic: &str, key: &str, payload: String) -> Result<(), AppError> {
        match &self.producer {
            Some(producer) => producer
                .send(
                    FutureRecord::to(topic).key(key).payload(&payload),
                    Timeout::After(Duration::from_secs(1)),
                )
                .await
                .map(|_| ())
                .map_err(|(err, _)| AppError::KafkaPushFailed(err.to_string())),
            None => {
                info!("Producer is None, unable to send message");
                Ok(())
            }
        }
    }
}
