/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
#![allow(clippy::expect_used)]

use std::sync::Arc;

use rdkafka::{error::KafkaError, producer::FutureProducer, ClientConfig};
use serde::{Deserialize, Serialize};
use shared::{
    redis::types::{RedisConnectionPool, RedisSettings},
    utils::logger::*,
};

use crate::{
    engine::{TrackingEngine, TrackingEngineConfig},
    events::{kafka::KafkaEventBus, push::BroadcastHub, EventPublisher},
    redis::commands::{RedisKeyValueCache, RedisLocationRepository, RedisOrderTrackingRepository},
    simulation::{SimulationConfig, SimulationScheduler},
};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub workers: usize,
    pub logger_cfg: LoggerConfig,
    pub persistent_redis_cfg: RedisConfig,
    pub cache_redis_cfg: RedisConfig,
    pub kafka_cfg: KafkaConfig,
    pub location_update_topic: String,
    pub delivery_status_topic: String,
    pub driver_location_cache_prefix: String,
    /// Cache TTL in seconds
    pub driver_location_cache_expiry: u32,
    /// Active-driver lookback in seconds
    pub active_driver_window: u64,
    /// Request timeout in milliseconds
    pub request_timeout: u64,
    pub simulation_cfg: SimulationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct KafkaConfig {
    pub kafka_key: String,
    pub kafka_host: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RedisConfig {
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_pool_size: usize,
    pub redis_partition: usize,
    pub reconnect_max_attempts: u32,
    pub reconnect_delay: u32,
    pub default_ttl: u32,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TrackingEngine>,
    pub push_hub: Arc<BroadcastHub>,
    pub persistent_redis: Arc<RedisConnectionPool>,
    pub request_timeout: u64,
}

impl AppState {
    pub async fn new(app_config: AppConfig) -> AppState {
        let persistent_redis = Arc::new(
            RedisConnectionPool::new(RedisSettings::new(
                app_config.persistent_redis_cfg.redis_host,
                app_config.persistent_redis_cfg.redis_port,
                app_config.persistent_redis_cfg.redis_pool_size,
                app_config.persistent_redis_cfg.redis_partition,
                app_config.persistent_redis_cfg.reconnect_max_attempts,
                app_config.persistent_redis_cfg.reconnect_delay,
                app_config.persistent_redis_cfg.default_ttl,
            ))
            .await
            .expect("Failed to create Tracking Redis connection pool"),
        );

        let cache_redis = Arc::new(
            RedisConnectionPool::new(RedisSettings::new(
                app_config.cache_redis_cfg.redis_host,
                app_config.cache_redis_cfg.redis_port,
                app_config.cache_redis_cfg.redis_pool_size,
                app_config.cache_redis_cfg.redis_partition,
                app_config.cache_redis_cfg.reconnect_max_attempts,
                app_config.cache_redis_cfg.reconnect_delay,
                app_config.cache_redis_cfg.default_ttl,
            ))
            .await
            .expect("Failed to create Cache Redis connection pool"),
        );

        let producer: Option<FutureProducer>;

        let result: Result<FutureProducer, KafkaError> = ClientConfig::new()
            .set(
                app_config.kafka_cfg.kafka_key,
                app_config.kafka_cfg.kafka_host,
            )
            .set("compression.type", "lz4")
            .create();

        match result {
            Ok(val) => {
                producer = Some(val);
            }
            Err(err) => {
                producer = None;
                info!(
                    tag = "[Kafka Connection]",
                    "Error connecting to kafka config: {err}"
                );
            }
        }

        let push_hub = Arc::new(BroadcastHub::new());
        let publisher = EventPublisher::new(
            Arc::new(KafkaEventBus::new(producer)),
            push_hub.clone(),
            app_config.location_update_topic,
            app_config.delivery_status_topic,
        );

        let engine = Arc::new(TrackingEngine::new(
            Arc::new(RedisLocationRepository::new(persistent_redis.clone())),
            Arc::new(RedisOrderTrackingRepository::new(persistent_redis.clone())),
            Arc::new(RedisKeyValueCache::new(cache_redis)),
            publisher,
            SimulationScheduler::new(app_config.simulation_cfg),
            TrackingEngineConfig {
                cache_key_prefix: app_config.driver_location_cache_prefix,
                cache_expiry: app_config.driver_location_cache_expiry,
                active_driver_window: app_config.active_driver_window,
            },
        ));

        AppState {
            engine,
            push_hub,
            persistent_redis,
            request_timeout: app_config.request_timeout,
        }
    }
}
