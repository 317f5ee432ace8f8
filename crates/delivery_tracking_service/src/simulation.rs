/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use std::{sync::Arc, time::Duration};

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use shared::utils::logger::*;
use tokio::{sync::Mutex, task::JoinHandle, time::interval};

use crate::{
    common::types::*, domain::types::ui::location::UpdateLocationRequest, engine::TrackingEngine,
    tools::prometheus::ACTIVE_SIMULATIONS,
};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SimulationConfig {
    pub enabled: bool,
    /// Tick period in milliseconds.
    pub tick_interval: u64,
    /// Fraction of the remaining vector to the delivery point covered per
    /// tick, before the 0.5..1.0 random factor.
    pub step_fraction: f64,
    /// km/h
    pub min_speed: f64,
    pub max_speed: f64,
    /// Jitter center when the simulated order cannot be found.
    pub fallback_latitude: f64,
    pub fallback_longitude: f64,
}

struct SimulationHandle {
    order_id: OrderId,
    task: JoinHandle<()>,
}

/// One repeating synthetic-ping task per driver. The map is the single
/// source of truth for liveness: replacing or stopping an entry aborts the
/// task and awaits it, so no ping for that driver can be emitted after the
/// call returns.
pub struct SimulationScheduler {
    config: SimulationConfig,
    simulations: Mutex<FxHashMap<DriverId, SimulationHandle>>,
}

impl SimulationScheduler {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            simulations: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Cancel-then-insert under one lock: at most one live timer per driver
    /// even when callers race on the same driver id.
    pub async fn start(&self, engine: Arc<TrackingEngine>, driver_id: DriverId, order_id: OrderId) {
        let mut simulations = self.simulations.lock().await;

        if let Some(previous) = simulations.remove(&driver_id) {
            previous.task.abort();
            let _ = previous.task.await;
            ACTIVE_SIMULATIONS.dec();
            info!(
                tag = "[Simulation]",
                driver_id = %driver_id.0,
                replaced_order_id = %previous.order_id.0,
                "replacing running simulation"
            );
        }

        let config = self.config.clone();
        let task_driver = driver_id.clone();
        let task_order = order_id.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_millis(config.tick_interval));
            loop {
                ticker.tick().await;

                // one driver's faulty tick must not cancel the timer
                let tracking = match engine.get_order_tracking(&task_order).await {
                    Ok(tracking) => tracking,
                    Err(err) => {
                        error!(
                            tag = "[Simulation]",
                            driver_id = %task_driver.0,
                            error = %err,
                            "failed to load order tracking"
                        );
                        None
                    }
                };

                let request =
                    simulated_location(&config, &task_driver, &task_order, tracking.as_ref());
                if let Err(err) = engine.update_location(request).await {
                    error!(
                        tag = "[Simulation]",
                        driver_id = %task_driver.0,
                        error = %err,
                        "simulated ping rejected"
                    );
                }
            }
        });

        simulations.insert(driver_id.clone(), SimulationHandle { order_id, task });
        ACTIVE_SIMULATIONS.inc();
        info!(tag = "[Simulation]", driver_id = %driver_id.0, "started location simulation");
    }

    /// No-op when nothing is running for the driver.
    pub async fn stop(&self, driver_id: &DriverId) -> bool {
        let removed = self.simulations.lock().await.remove(driver_id);
        match removed {
            Some(handle) => {
                handle.task.abort();
                let _ = handle.task.await;
                ACTIVE_SIMULATIONS.dec();
                info!(tag = "[Simulation]", driver_id = %driver_id.0, "stopped location simulation");
                true
            }
            None => false,
        }
    }

    pub async fn is_running(&self, driver_id: &DriverId) -> bool {
        self.simulations.lock().await.contains_key(driver_id)
    }

    pub async fn active_count(&self) -> usize {
        self.simulations.lock().await.len()
    }

    pub async fn simulated_order(&self, driver_id: &DriverId) -> Option<OrderId> {
        self.simulations
            .lock()
            .await
            .get(driver_id)
            .map(|handle| handle.order_id.clone())
    }
}

/// Moves a small randomized fraction of the remaining vector towards the
/// delivery point, starting from the order's current position (pickup until
/// the first update). Without a tracking record the ping jitters around the
/// configured fallback coordinate.
fn simulated_location(
    config: &SimulationConfig,
    driver_id: &DriverId,
    order_id: &OrderId,
    tracking: Option<&OrderTracking>,
) -> UpdateLocationRequest {
    let mut rng = rand::thread_rng();

    let (latitude, longitude) = match tracking {
        Some(tracking) => {
            let Latitude(current_lat) = tracking.current_latitude.unwrap_or(tracking.pickup_latitude);
            let Longitude(current_lng) =
                tracking.current_longitude.unwrap_or(tracking.pickup_longitude);
            let Latitude(delivery_lat) = tracking.delivery_latitude;
            let Longitude(delivery_lng) = tracking.delivery_longitude;

            let step = config.step_fraction * rng.gen_range(0.5..1.0);
            (
                current_lat + (delivery_lat - current_lat) * step,
                current_lng + (delivery_lng - current_lng) * step,
            )
        }
        None => (
            config.fallback_latitude + rng.gen_range(-0.005..0.005),
            config.fallback_longitude + rng.gen_range(-0.005..0.005),
        ),
    };

    UpdateLocationRequest {
        driver_id: driver_id.clone(),
        order_id: Some(order_id.clone()),
        latitude: Latitude(latitude),
        longitude: Longitude(longitude),
        altitude: None,
        speed: Some(rng.gen_range(config.min_speed..config.max_speed)),
        heading: Some(rng.gen_range(0.0..360.0)),
        accuracy: Some(rng.gen_range(5.0..15.0)),
        timestamp: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::utils::current_timestamp;

    fn test_config() -> SimulationConfig {
        SimulationConfig {
            enabled: true,
            tick_interval: 5000,
            step_fraction: 0.1,
            min_speed: 30.0,
            max_speed: 50.0,
            fallback_latitude: 10.762622,
            fallback_longitude: 106.660172,
        }
    }

    fn tracking() -> OrderTracking {
        let now = current_timestamp();
        OrderTracking {
            order_id: OrderId("O1".to_string()),
            driver_id: DriverId("D1".to_string()),
            customer_id: CustomerId("C1".to_string()),
            pickup_latitude: Latitude(10.0),
            pickup_longitude: Longitude(106.0),
            delivery_latitude: Latitude(10.1),
            delivery_longitude: Longitude(106.1),
            current_latitude: None,
            current_longitude: None,
            estimated_arrival: None,
            actual_arrival: None,
            status: DeliveryStatus::ASSIGNED,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn moves_towards_the_delivery_point() {
        let config = test_config();
        let driver_id = DriverId("D1".to_string());
        let order_id = OrderId("O1".to_string());
        let tracking = tracking();

        for _ in 0..100 {
            let request =
                simulated_location(&config, &driver_id, &order_id, Some(&tracking));
            let Latitude(lat) = request.latitude;
            let Longitude(lng) = request.longitude;
            // strictly between pickup and delivery on both axes
            assert!(lat > 10.0 && lat < 10.1, "lat out of range: {lat}");
            assert!(lng > 106.0 && lng < 106.1, "lng out of range: {lng}");
        }
    }

    #[test]
    fn resumes_from_the_current_position() {
        let config = test_config();
        let mut tracking = tracking();
        tracking.current_latitude = Some(Latitude(10.09));
        tracking.current_longitude = Some(Longitude(106.09));

        let request = simulated_location(
            &config,
            &DriverId("D1".to_string()),
            &OrderId("O1".to_string()),
            Some(&tracking),
        );
        assert!(request.latitude.0 > 10.09);
        assert!(request.longitude.0 > 106.09);
    }

    #[test]
    fn falls_back_to_jitter_without_an_order() {
        let config = test_config();
        for _ in 0..100 {
            let request = simulated_location(
                &config,
                &DriverId("D1".to_string()),
                &OrderId("missing".to_string()),
                None,
            );
            assert!((request.latitude.0 - config.fallback_latitude).abs() <= 0.005);
            assert!((request.longitude.0 - config.fallback_longitude).abs() <= 0.005);
        }
    }

    #[test]
    fn telemetry_stays_within_the_configured_bounds() {
        let config = test_config();
        for _ in 0..100 {
            let request = simulated_location(
                &config,
                &DriverId("D1".to_string()),
                &OrderId("O1".to_string()),
                Some(&tracking()),
            );
            let speed = request.speed.unwrap();
            let heading = request.heading.unwrap();
            let accuracy = request.accuracy.unwrap();
            assert!((config.min_speed..config.max_speed).contains(&speed));
            assert!((0.0..360.0).contains(&heading));
            assert!((5.0..15.0).contains(&accuracy));
        }
    }
}
