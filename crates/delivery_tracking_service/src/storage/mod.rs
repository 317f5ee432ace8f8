/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
pub mod memory;

use async_trait::async_trait;

use crate::{common::types::*, tools::error::AppError};

/// Durable append-only log of location pings. History is immutable in the
/// hot path; the purge operations exist for data retention cleanup only.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Persists a ping, assigning the surrogate id and `createdAt`.
    async fn append(&self, ping: LocationPing) -> Result<LocationPing, AppError>;

    async fn latest(&self, driver_id: &DriverId) -> Result<Option<LocationPing>, AppError>;

    /// Newest first.
    async fn driver_history(
        &self,
        driver_id: &DriverId,
        since: Option<TimeStamp>,
    ) -> Result<Vec<LocationPing>, AppError>;

    /// Newest first.
    async fn order_history(
        &self,
        order_id: &OrderId,
        since: Option<TimeStamp>,
    ) -> Result<Vec<LocationPing>, AppError>;

    /// Distinct drivers with a ping at or after `since`.
    async fn active_drivers(&self, since: TimeStamp) -> Result<Vec<DriverId>, AppError>;

    async fn purge_driver(&self, driver_id: &DriverId) -> Result<(), AppError>;

    async fn purge_order(&self, order_id: &OrderId) -> Result<(), AppError>;
}

/// Durable mutable store of one tracking row per order.
#[async_trait]
pub trait OrderTrackingRepository: Send + Sync {
    /// Fails when a record for the order already exists.
    async fn insert(&self, tracking: OrderTracking) -> Result<OrderTracking, AppError>;

    async fn find(&self, order_id: &OrderId) -> Result<Option<OrderTracking>, AppError>;

    async fn save(&self, tracking: &OrderTracking) -> Result<(), AppError>;

    async fn find_by_driver(&self, driver_id: &DriverId) -> Result<Vec<OrderTracking>, AppError>;

    async fn find_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<OrderTracking>, AppError>;

    async fn remove(&self, order_id: &OrderId) -> Result<(), AppError>;
}

/// Single-key cache with per-entry TTL. The engine treats every failure here
/// as non-fatal.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set(&self, key: &str, value: String, expiry: u32) -> Result<(), AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}
