/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
//! In-memory implementations of the storage and event seams. Used by the
//! test suite in place of Redis/Kafka; backend failures can be injected to
//! exercise the degraded paths.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rustc_hash::{FxHashMap, FxHashSet};
use uuid::Uuid;

use crate::{
    common::{types::*, utils::current_timestamp},
    events::EventBus,
    storage::{KeyValueCache, LocationRepository, OrderTrackingRepository},
    tools::error::AppError,
};

#[derive(Default)]
pub struct InMemoryLocationStore {
    pings: Mutex<Vec<LocationPing>>,
    latest_reads: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `latest` lookups that reached this store.
    pub fn latest_reads(&self) -> usize {
        self.latest_reads.load(Ordering::SeqCst)
    }

    pub fn ping_count(&self) -> usize {
        self.pings.lock().map(|pings| pings.len()).unwrap_or(0)
    }

    /// Simulate a backend outage: every subsequent operation fails.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::InternalError(
                "location store unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationStore {
    async fn append(&self, ping: LocationPing) -> Result<LocationPing, AppError> {
        self.check_available()?;
        let stored = LocationPing {
            id: Uuid::new_v4().to_string(),
            created_at: current_timestamp(),
            ..ping
        };
        let Ok(mut pings) = self.pings.lock() else {
            return Err(AppError::InternalError("location store poisoned".to_string()));
        };
        pings.push(stored.clone());
        Ok(stored)
    }

    async fn latest(&self, driver_id: &DriverId) -> Result<Option<LocationPing>, AppError> {
        self.check_available()?;
        self.latest_reads.fetch_add(1, Ordering::SeqCst);
        let Ok(pings) = self.pings.lock() else {
            return Err(AppError::InternalError("location store poisoned".to_string()));
        };
        Ok(pings
            .iter()
            .filter(|ping| &ping.driver_id == driver_id)
            .max_by_key(|ping| ping.timestamp)
            .cloned())
    }

    async fn driver_history(
        &self,
        driver_id: &DriverId,
        since: Option<TimeStamp>,
    ) -> Result<Vec<LocationPing>, AppError> {
        self.check_available()?;
        let Ok(pings) = self.pings.lock() else {
            return Err(AppError::InternalError("location store poisoned".to_string()));
        };
        let mut history: Vec<LocationPing> = pings
            .iter()
            .filter(|ping| &ping.driver_id == driver_id)
            .filter(|ping| since.map_or(true, |since| ping.timestamp >= since))
            .cloned()
            .collect();
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(history)
    }

    async fn order_history(
        &self,
        order_id: &OrderId,
        since: Option<TimeStamp>,
    ) -> Result<Vec<LocationPing>, AppError> {
        self.check_available()?;
        let Ok(pings) = self.pings.lock() else {
            return Err(AppError::InternalError("location store poisoned".to_string()));
        };
        let mut history: Vec<LocationPing> = pings
            .iter()
            .filter(|ping| ping.order_id.as_ref() == Some(order_id))
            .filter(|ping| since.map_or(true, |since| ping.timestamp >= since))
            .cloned()
            .collect();
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(history)
    }

    async fn active_drivers(&self, since: TimeStamp) -> Result<Vec<DriverId>, AppError> {
        self.check_available()?;
        let Ok(pings) = self.pings.lock() else {
            return Err(AppError::InternalError("location store poisoned".to_string()));
        };
        let mut seen = FxHashSet::default();
        Ok(pings
            .iter()
            .filter(|ping| ping.timestamp >= since)
            .filter(|ping| seen.insert(ping.driver_id.clone()))
            .map(|ping| ping.driver_id.clone())
            .collect())
    }

    async fn purge_driver(&self, driver_id: &DriverId) -> Result<(), AppError> {
        self.check_available()?;
        if let Ok(mut pings) = self.pings.lock() {
            pings.retain(|ping| &ping.driver_id != driver_id);
        }
        Ok(())
    }

    async fn purge_order(&self, order_id: &OrderId) -> Result<(), AppError> {
        self.check_available()?;
        if let Ok(mut pings) = self.pings.lock() {
            pings.retain(|ping| ping.order_id.as_ref() != Some(order_id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryOrderStore {
    records: Mutex<FxHashMap<OrderId, OrderTracking>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderTrackingRepository for InMemoryOrderStore {
    async fn insert(&self, tracking: OrderTracking) -> Result<OrderTracking, AppError> {
        let Ok(mut records) = self.records.lock() else {
            return Err(AppError::InternalError("order store poisoned".to_string()));
        };
        if records.contains_key(&tracking.order_id) {
            return Err(AppError::OrderTrackingAlreadyExists(
                tracking.order_id.0.clone(),
            ));
        }
        records.insert(tracking.order_id.clone(), tracking.clone());
        Ok(tracking)
    }

    async fn find(&self, order_id: &OrderId) -> Result<Option<OrderTracking>, AppError> {
        let Ok(records) = self.records.lock() else {
            return Err(AppError::InternalError("order store poisoned".to_string()));
        };
        Ok(records.get(order_id).cloned())
    }

    async fn save(&self, tracking: &OrderTracking) -> Result<(), AppError> {
        let Ok(mut records) = self.records.lock() else {
            return Err(AppError::InternalError("order store poisoned".to_string()));
        };
        records.insert(tracking.order_id.clone(), tracking.clone());
        Ok(())
    }

    async fn find_by_driver(&self, driver_id: &DriverId) -> Result<Vec<OrderTracking>, AppError> {
        let Ok(records) = self.records.lock() else {
            return Err(AppError::InternalError("order store poisoned".to_string()));
        };
        Ok(records
            .values()
            .filter(|tracking| &tracking.driver_id == driver_id)
            .cloned()
            .collect())
    }

    async fn find_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<OrderTracking>, AppError> {
        let Ok(records) = self.records.lock() else {
            return Err(AppError::InternalError("order store poisoned".to_string()));
        };
        Ok(records
            .values()
            .filter(|tracking| &tracking.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn remove(&self, order_id: &OrderId) -> Result<(), AppError> {
        if let Ok(mut records) = self.records.lock() {
            records.remove(order_id);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<FxHashMap<String, (String, Instant)>>,
    failing: AtomicBool,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::InternalError("cache unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.check_available()?;
        let Ok(mut entries) = self.entries.lock() else {
            return Err(AppError::InternalError("cache poisoned".to_string()));
        };
        let hit = entries
            .get(key)
            .map(|(value, deadline)| (value.clone(), *deadline));
        match hit {
            Some((value, deadline)) if deadline > Instant::now() => Ok(Some(value)),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String, expiry: u32) -> Result<(), AppError> {
        self.check_available()?;
        let Ok(mut entries) = self.entries.lock() else {
            return Err(AppError::InternalError("cache poisoned".to_string()));
        };
        let deadline = Instant::now() + Duration::from_secs(expiry.into());
        entries.insert(key.to_string(), (value, deadline));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.check_available()?;
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub key: String,
    pub payload: String,
}

/// Event bus fake that records every publish instead of talking to Kafka.
#[derive(Default)]
pub struct RecordingEventBus {
    messages: Mutex<Vec<PublishedMessage>>,
    failing: AtomicBool,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventBus for RecordingEventBus {
    async fn publish(&self, topic: &str, key: &str, payload: String) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::KafkaPushFailed("broker unavailable".to_string()));
        }
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(PublishedMessage {
                topic: topic.to_string(),
                key: key.to_string(),
                payload,
            });
        }
        Ok(())
    }
}
