/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use std::sync::Arc;

use chrono::Duration;
use shared::utils::logger::*;
use uuid::Uuid;

use crate::{
    common::{
        types::*,
        utils::{current_timestamp, is_valid_coordinate},
    },
    domain::types::ui::{location::UpdateLocationRequest, order::CreateOrderTrackingRequest},
    events::EventPublisher,
    redis::keys::driver_location_cache_key,
    simulation::SimulationScheduler,
    storage::{KeyValueCache, LocationRepository, OrderTrackingRepository},
    tools::{
        error::AppError,
        prometheus::{LOCATION_CACHE_HITS, LOCATION_CACHE_MISSES, TOTAL_LOCATION_UPDATES},
    },
};

pub struct TrackingEngineConfig {
    pub cache_key_prefix: String,
    /// Cache entry TTL in seconds.
    pub cache_expiry: u32,
    /// Lookback window in seconds for `get_active_driver_locations`.
    pub active_driver_window: u64,
}

/// Orchestrates the tracking pipeline. Holds every dependency explicitly:
/// durable stores, the hot-location cache, the event publisher and the
/// simulation scheduler are injected at construction, there is no ambient
/// state. A ping is recorded once the durable append succeeds; cache refresh
/// and event publishing are best effort on top of that.
pub struct TrackingEngine {
    location_store: Arc<dyn LocationRepository>,
    order_store: Arc<dyn OrderTrackingRepository>,
    cache: Arc<dyn KeyValueCache>,
    publisher: EventPublisher,
    scheduler: SimulationScheduler,
    config: TrackingEngineConfig,
}

impl TrackingEngine {
    pub fn new(
        location_store: Arc<dyn LocationRepository>,
        order_store: Arc<dyn OrderTrackingRepository>,
        cache: Arc<dyn KeyValueCache>,
        publisher: EventPublisher,
        scheduler: SimulationScheduler,
        config: TrackingEngineConfig,
    ) -> Self {
        Self {
            location_store,
            order_store,
            cache,
            publisher,
            scheduler,
            config,
        }
    }

    pub async fn update_location(
        &self,
        request: UpdateLocationRequest,
    ) -> Result<LocationPing, AppError> {
        if request.driver_id.0.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "driverId must not be empty".to_string(),
            ));
        }
        if !is_valid_coordinate(&request.latitude, &request.longitude) {
            return Err(AppError::InvalidGPSData(format!(
                "(Lat : {}, Lon : {})",
                request.latitude.0, request.longitude.0
            )));
        }

        let now = current_timestamp();
        let ping = LocationPing {
            id: Uuid::nil().to_string(),
            driver_id: request.driver_id,
            order_id: request.order_id,
            latitude: request.latitude,
            longitude: request.longitude,
            altitude: request.altitude,
            speed: request.speed,
            heading: request.heading,
            accuracy: request.accuracy,
            timestamp: request.timestamp.unwrap_or(now),
            status: TrackingStatus::ACTIVE,
            created_at: now,
        };

        let stored = self.location_store.append(ping).await?;
        TOTAL_LOCATION_UPDATES.inc();

        self.refresh_cache(&stored).await;
        self.publisher.location_updated(&stored).await;

        Ok(stored)
    }

    /// Cache-aside read: cache hit wins, a miss falls back to the durable
    /// store and repopulates the cache. A store outage degrades to a miss.
    pub async fn get_current_location(
        &self,
        driver_id: &DriverId,
    ) -> Result<Option<LocationPing>, AppError> {
        let key = driver_location_cache_key(&self.config.cache_key_prefix, driver_id);

        match self.cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<LocationPing>(&raw) {
                Ok(ping) => {
                    LOCATION_CACHE_HITS.inc();
                    return Ok(Some(ping));
                }
                Err(err) => {
                    warn!(tag = "[Cache Entry Corrupt]", driver_id = %driver_id.0, error = %err)
                }
            },
            Ok(None) => {}
            Err(err) => {
                warn!(tag = "[Cache Read Degraded]", driver_id = %driver_id.0, error = %err)
            }
        }
        LOCATION_CACHE_MISSES.inc();

        let latest = match self.location_store.latest(driver_id).await {
            Ok(latest) => latest,
            Err(err) => {
                warn!(tag = "[Location Read Degraded]", driver_id = %driver_id.0, error = %err);
                return Ok(None);
            }
        };

        if let Some(ping) = &latest {
            self.refresh_cache(ping).await;
        }

        Ok(latest)
    }

    pub async fn get_location_history(
        &self,
        driver_id: &DriverId,
        order_id: Option<&OrderId>,
        since: Option<TimeStamp>,
    ) -> Result<Vec<LocationPing>, AppError> {
        match order_id {
            Some(order_id) => self.location_store.order_history(order_id, since).await,
            None => self.location_store.driver_history(driver_id, since).await,
        }
    }

    pub async fn get_active_driver_locations(&self) -> Result<Vec<LocationPing>, AppError> {
        let TimeStamp(now) = current_timestamp();
        let since = TimeStamp(now - Duration::seconds(self.config.active_driver_window as i64));
        let drivers = self.location_store.active_drivers(since).await?;

        let mut locations = Vec::with_capacity(drivers.len());
        for driver_id in drivers {
            if let Some(ping) = self.get_current_location(&driver_id).await? {
                locations.push(ping);
            }
        }
        Ok(locations)
    }

    /// Data retention cleanup, not part of the hot path.
    pub async fn purge_location_history(
        &self,
        driver_id: &DriverId,
        order_id: Option<&OrderId>,
    ) -> Result<(), AppError> {
        match order_id {
            Some(order_id) => self.location_store.purge_order(order_id).await,
            None => self.location_store.purge_driver(driver_id).await,
        }
    }

    pub async fn create_order_tracking(
        &self,
        request: CreateOrderTrackingRequest,
    ) -> Result<OrderTracking, AppError> {
        let now = current_timestamp();
        let tracking = OrderTracking {
            order_id: request.order_id,
            driver_id: request.driver_id,
            customer_id: request.customer_id,
            pickup_latitude: request.pickup_lat,
            pickup_longitude: request.pickup_lng,
            delivery_latitude: request.delivery_lat,
            delivery_longitude: request.delivery_lng,
            current_latitude: None,
            current_longitude: None,
            estimated_arrival: None,
            actual_arrival: None,
            status: DeliveryStatus::ASSIGNED,
            created_at: now,
            updated_at: now,
        };
        self.order_store.insert(tracking).await
    }

    /// Transitions are deliberately unchecked: any status may be set from any
    /// other. Entering DELIVERED stamps `actualArrival` with the current time
    /// on every such call.
    pub async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: DeliveryStatus,
    ) -> Result<OrderTracking, AppError> {
        let mut tracking = self
            .order_store
            .find(order_id)
            .await?
            .ok_or_else(|| AppError::OrderTrackingNotFound(order_id.0.clone()))?;

        tracking.status = status;
        tracking.updated_at = current_timestamp();
        if status == DeliveryStatus::DELIVERED {
            tracking.actual_arrival = Some(current_timestamp());
        }

        self.order_store.save(&tracking).await?;
        self.publisher.status_updated(&tracking).await;
        Ok(tracking)
    }

    pub async fn update_order_location(
        &self,
        order_id: &OrderId,
        latitude: Latitude,
        longitude: Longitude,
    ) -> Result<OrderTracking, AppError> {
        let mut tracking = self
            .order_store
            .find(order_id)
            .await?
            .ok_or_else(|| AppError::OrderTrackingNotFound(order_id.0.clone()))?;

        tracking.current_latitude = Some(latitude);
        tracking.current_longitude = Some(longitude);
        tracking.updated_at = current_timestamp();

        self.order_store.save(&tracking).await?;
        self.publisher.status_updated(&tracking).await;
        Ok(tracking)
    }

    pub async fn get_order_tracking(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<OrderTracking>, AppError> {
        self.order_store.find(order_id).await
    }

    pub async fn get_driver_orders(
        &self,
        driver_id: &DriverId,
    ) -> Result<Vec<OrderTracking>, AppError> {
        self.order_store.find_by_driver(driver_id).await
    }

    pub async fn get_customer_orders(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<OrderTracking>, AppError> {
        self.order_store.find_by_customer(customer_id).await
    }

    pub async fn invalidate_driver_cache(&self, driver_id: &DriverId) -> Result<(), AppError> {
        let key = driver_location_cache_key(&self.config.cache_key_prefix, driver_id);
        self.cache.delete(&key).await
    }

    /// Replaces any simulation already running for the driver.
    pub async fn start_simulation(self: Arc<Self>, driver_id: DriverId, order_id: OrderId) {
        if !self.scheduler.enabled() {
            warn!(tag = "[Simulation]", "GPS simulation is disabled");
            return;
        }
        let engine = Arc::clone(&self);
        self.scheduler.start(engine, driver_id, order_id).await;
    }

    pub async fn stop_simulation(&self, driver_id: &DriverId) {
        self.scheduler.stop(driver_id).await;
    }

    pub fn simulations(&self) -> &SimulationScheduler {
        &self.scheduler
    }

    async fn refresh_cache(&self, ping: &LocationPing) {
        let key = driver_location_cache_key(&self.config.cache_key_prefix, &ping.driver_id);
        match serde_json::to_string(ping) {
            Ok(raw) => {
                if let Err(err) = self.cache.set(&key, raw, self.config.cache_expiry).await {
                    warn!(tag = "[Cache Refresh Skipped]", driver_id = %ping.driver_id.0, error = %err);
                }
            }
            Err(err) => {
                warn!(tag = "[Cache Refresh Skipped]", driver_id = %ping.driver_id.0, error = %err);
            }
        }
    }
}
