/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use std::sync::Arc;

use async_trait::async_trait;
use shared::redis::types::RedisConnectionPool;
use shared::utils::logger::*;
use uuid::Uuid;

use crate::{
    common::{
        types::*,
        utils::{current_timestamp, timestamp_score},
    },
    redis::keys::*,
    storage::{KeyValueCache, LocationRepository, OrderTrackingRepository},
    tools::error::AppError,
};

fn decode_ping(raw: &str) -> Option<LocationPing> {
    match serde_json::from_str(raw) {
        Ok(ping) => Some(ping),
        Err(err) => {
            warn!(tag = "[Corrupt Location Entry]", error = %err);
            None
        }
    }
}

pub struct RedisLocationRepository {
    redis: Arc<RedisConnectionPool>,
}

impl RedisLocationRepository {
    pub fn new(redis: Arc<RedisConnectionPool>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl LocationRepository for RedisLocationRepository {
    async fn append(&self, ping: LocationPing) -> Result<LocationPing, AppError> {
        let stored = LocationPing {
            id: Uuid::new_v4().to_string(),
            created_at: current_timestamp(),
            ..ping
        };
        let raw = serde_json::to_string(&stored)
            .map_err(|err| AppError::SerializationError(err.to_string()))?;
        let score = timestamp_score(&stored.timestamp);

        self.redis
            .zadd(&driver_location_history_key(&stored.driver_id), score, &raw)
            .await?;
        if let Some(order_id) = &stored.order_id {
            self.redis
                .zadd(&order_location_history_key(order_id), score, &raw)
                .await?;
        }
        self.redis
            .zadd(&active_drivers_key(), score, &stored.driver_id.0)
            .await?;

        Ok(stored)
    }

    async fn latest(&self, driver_id: &DriverId) -> Result<Option<LocationPing>, AppError> {
        let rows = self
            .redis
            .zrange_rev(&driver_location_history_key(driver_id), 0, 0)
            .await?;
        Ok(rows.first().and_then(|raw| decode_ping(raw)))
    }

    async fn driver_history(
        &self,
        driver_id: &DriverId,
        since: Option<TimeStamp>,
    ) -> Result<Vec<LocationPing>, AppError> {
        let key = driver_location_history_key(driver_id);
        let rows = match since {
            Some(since) => {
                self.redis
                    .zrange_by_score_rev(&key, f64::INFINITY, timestamp_score(&since))
                    .await?
            }
            None => self.redis.zrange_rev(&key, 0, -1).await?,
        };
        Ok(rows.iter().filter_map(|raw| decode_ping(raw)).collect())
    }

    async fn order_history(
        &self,
        order_id: &OrderId,
        since: Option<TimeStamp>,
    ) -> Result<Vec<LocationPing>, AppError> {
        let key = order_location_history_key(order_id);
        let rows = match since {
            Some(since) => {
                self.redis
                    .zrange_by_score_rev(&key, f64::INFINITY, timestamp_score(&since))
                    .await?
            }
            None => self.redis.zrange_rev(&key, 0, -1).await?,
        };
        Ok(rows.iter().filter_map(|raw| decode_ping(raw)).collect())
    }

    async fn active_drivers(&self, since: TimeStamp) -> Result<Vec<DriverId>, AppError> {
        let drivers = self
            .redis
            .zrange_by_score(&active_drivers_key(), timestamp_score(&since), f64::INFINITY)
            .await?;
        Ok(drivers.into_iter().map(DriverId).collect())
    }

    async fn purge_driver(&self, driver_id: &DriverId) -> Result<(), AppError> {
        self.redis
            .delete_key(&driver_location_history_key(driver_id))
            .await?;
        self.redis
            .zrem(&active_drivers_key(), &driver_id.0)
            .await?;
        Ok(())
    }

    async fn purge_order(&self, order_id: &OrderId) -> Result<(), AppError> {
        self.redis
            .delete_key(&order_location_history_key(order_id))
            .await?;
        Ok(())
    }
}

pub struct RedisOrderTrackingRepository {
    redis: Arc<RedisConnectionPool>,
}

impl RedisOrderTrackingRepository {
    pub fn new(redis: Arc<RedisConnectionPool>) -> Self {
        Self { redis }
    }

    async fn read_order(&self, order_id: &OrderId) -> Result<Option<OrderTracking>, AppError> {
        let raw = self.redis.get_key(&order_tracking_key(order_id)).await?;
        match raw {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|err| AppError::DeserializationError(err.to_string())),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl OrderTrackingRepository for RedisOrderTrackingRepository {
    async fn insert(&self, tracking: OrderTracking) -> Result<OrderTracking, AppError> {
        let raw = serde_json::to_string(&tracking)
            .map_err(|err| AppError::SerializationError(err.to_string()))?;

        // SETNX keeps the one-row-per-order invariant under concurrent creates
        let created = self
            .redis
            .setnx(&order_tracking_key(&tracking.order_id), &raw)
            .await?;
        if !created {
            return Err(AppError::OrderTrackingAlreadyExists(
                tracking.order_id.0.clone(),
            ));
        }

        self.redis
            .sadd(&driver_orders_key(&tracking.driver_id), &tracking.order_id.0)
            .await?;
        self.redis
            .sadd(
                &customer_orders_key(&tracking.customer_id),
                &tracking.order_id.0,
            )
            .await?;

        Ok(tracking)
    }

    async fn find(&self, order_id: &OrderId) -> Result<Option<OrderTracking>, AppError> {
        self.read_order(order_id).await
    }

    async fn save(&self, tracking: &OrderTracking) -> Result<(), AppError> {
        let raw = serde_json::to_string(tracking)
            .map_err(|err| AppError::SerializationError(err.to_string()))?;
        self.redis
            .set_key(&order_tracking_key(&tracking.order_id), &raw)
            .await?;
        Ok(())
    }

    async fn find_by_driver(&self, driver_id: &DriverId) -> Result<Vec<OrderTracking>, AppError> {
        let order_ids = self.redis.smembers(&driver_orders_key(driver_id)).await?;
        let mut orders = Vec::with_capacity(order_ids.len());
        for order_id in order_ids {
            if let Some(tracking) = self.read_order(&OrderId(order_id)).await? {
                orders.push(tracking);
            }
        }
        Ok(orders)
    }

    async fn find_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<OrderTracking>, AppError> {
        let order_ids = self
            .redis
            .smembers(&customer_orders_key(customer_id))
            .await?;
        let mut orders = Vec::with_capacity(order_ids.len());
        for order_id in order_ids {
            if let Some(tracking) = self.read_order(&OrderId(order_id)).await? {
                orders.push(tracking);
            }
        }
        Ok(orders)
    }

    async fn remove(&self, order_id: &OrderId) -> Result<(), AppError> {
        let Some(tracking) = self.read_order(order_id).await? else {
            return Ok(());
        };
        self.redis.delete_key(&order_tracking_key(order_id)).await?;
        self.redis
            .srem(&driver_orders_key(&tracking.driver_id), &order_id.0)
            .await?;
        self.redis
            .srem(&customer_orders_key(&tracking.customer_id), &order_id.0)
            .await?;
        Ok(())
    }
}

pub struct RedisKeyValueCache {
    redis: Arc<RedisConnectionPool>,
}

impl RedisKeyValueCache {
    pub fn new(redis: Arc<RedisConnectionPool>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl KeyValueCache for RedisKeyValueCache {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.redis.get_key(key).await?)
    }

    async fn set(&self, key: &str, value: String, expiry: u32) -> Result<(), AppError> {
        Ok(self.redis.set_with_expiry(key, &value, expiry).await?)
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        Ok(self.redis.delete_key(key).await?)
    }
}
