/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use tokio::time::{sleep, timeout, Duration};

use delivery_tracking_service::{
    common::types::*,
    domain::types::ui::{location::UpdateLocationRequest, order::CreateOrderTrackingRequest},
    engine::{TrackingEngine, TrackingEngineConfig},
    events::EventPublisher,
    events::push::BroadcastHub,
    simulation::{SimulationConfig, SimulationScheduler},
    storage::memory::{
        InMemoryCache, InMemoryLocationStore, InMemoryOrderStore, RecordingEventBus,
    },
    tools::error::AppError,
};

const LOCATION_TOPIC: &str = "location-updates";
const STATUS_TOPIC: &str = "delivery-status-updates";

struct TestHarness {
    engine: Arc<TrackingEngine>,
    location_store: Arc<InMemoryLocationStore>,
    cache: Arc<InMemoryCache>,
    bus: Arc<RecordingEventBus>,
    hub: Arc<BroadcastHub>,
}

fn harness() -> TestHarness {
    harness_with_tick(60_000)
}

fn harness_with_tick(tick_interval: u64) -> TestHarness {
    let location_store = Arc::new(InMemoryLocationStore::new());
    let order_store = Arc::new(InMemoryOrderStore::new());
    let cache = Arc::new(InMemoryCache::new());
    let bus = Arc::new(RecordingEventBus::new());
    let hub = Arc::new(BroadcastHub::new());

    let publisher = EventPublisher::new(
        bus.clone(),
        hub.clone(),
        LOCATION_TOPIC.to_string(),
        STATUS_TOPIC.to_string(),
    );

    let engine = Arc::new(TrackingEngine::new(
        location_store.clone(),
        order_store,
        cache.clone(),
        publisher,
        SimulationScheduler::new(SimulationConfig {
            enabled: true,
            tick_interval,
            step_fraction: 0.05,
            min_speed: 30.0,
            max_speed: 50.0,
            fallback_latitude: 10.762622,
            fallback_longitude: 106.660172,
        }),
        TrackingEngineConfig {
            cache_key_prefix: "dts:cache:driver_location".to_string(),
            cache_expiry: 1800,
            active_driver_window: 1800,
        },
    ));

    TestHarness {
        engine,
        location_store,
        cache,
        bus,
        hub,
    }
}

fn location_request(driver_id: &str, lat: f64, lng: f64) -> UpdateLocationRequest {
    UpdateLocationRequest {
        driver_id: DriverId(driver_id.to_string()),
        order_id: None,
        latitude: Latitude(lat),
        longitude: Longitude(lng),
        altitude: None,
        speed: Some(35.0),
        heading: Some(90.0),
        accuracy: Some(8.0),
        timestamp: None,
    }
}

fn create_request(order_id: &str, driver_id: &str, customer_id: &str) -> CreateOrderTrackingRequest {
    CreateOrderTrackingRequest {
        order_id: OrderId(order_id.to_string()),
        driver_id: DriverId(driver_id.to_string()),
        customer_id: CustomerId(customer_id.to_string()),
        pickup_lat: Latitude(10.0),
        pickup_lng: Longitude(106.0),
        delivery_lat: Latitude(10.1),
        delivery_lng: Longitude(106.1),
    }
}

#[tokio::test]
async fn recorded_ping_is_readable_back_with_same_coordinates() {
    let harness = harness();
    let before = Utc::now();

    let stored = harness
        .engine
        .update_location(location_request("D1", 10.0, 106.0))
        .await
        .unwrap();

    assert!(!stored.id.is_empty());
    assert_eq!(stored.status, TrackingStatus::ACTIVE);
    assert_eq!(stored.latitude, Latitude(10.0));
    assert_eq!(stored.longitude, Longitude(106.0));
    assert!(stored.created_at.0 >= before);
    assert!(stored.timestamp.0 >= before);

    let current = harness
        .engine
        .get_current_location(&DriverId("D1".to_string()))
        .await
        .unwrap()
        .expect("current location must exist after an update");
    assert_eq!(current.id, stored.id);
    assert_eq!(current.latitude, Latitude(10.0));
    assert_eq!(current.longitude, Longitude(106.0));
}

#[tokio::test]
async fn cold_cache_read_populates_cache_and_skips_store_afterwards() {
    let harness = harness();
    let driver_id = DriverId("D1".to_string());

    harness
        .engine
        .update_location(location_request("D1", 10.0, 106.0))
        .await
        .unwrap();
    harness
        .engine
        .invalidate_driver_cache(&driver_id)
        .await
        .unwrap();

    let reads_before = harness.location_store.latest_reads();
    assert!(harness
        .engine
        .get_current_location(&driver_id)
        .await
        .unwrap()
        .is_some());
    assert_eq!(harness.location_store.latest_reads(), reads_before + 1);

    // repopulated on the miss, so the second read never reaches the store
    assert!(harness
        .engine
        .get_current_location(&driver_id)
        .await
        .unwrap()
        .is_some());
    assert_eq!(harness.location_store.latest_reads(), reads_before + 1);
}

#[tokio::test]
async fn ingestion_refreshes_cache_so_reporting_drivers_never_miss() {
    let harness = harness();
    let driver_id = DriverId("D1".to_string());

    harness
        .engine
        .update_location(location_request("D1", 10.0, 106.0))
        .await
        .unwrap();

    let reads_before = harness.location_store.latest_reads();
    assert!(harness
        .engine
        .get_current_location(&driver_id)
        .await
        .unwrap()
        .is_some());
    assert_eq!(harness.location_store.latest_reads(), reads_before);
}

#[tokio::test]
async fn store_outage_on_read_degrades_to_a_miss() {
    let harness = harness();
    let driver_id = DriverId("D1".to_string());

    harness
        .engine
        .update_location(location_request("D1", 10.0, 106.0))
        .await
        .unwrap();
    harness
        .engine
        .invalidate_driver_cache(&driver_id)
        .await
        .unwrap();

    harness.location_store.set_failing(true);
    let current = harness.engine.get_current_location(&driver_id).await.unwrap();
    assert!(current.is_none());
}

#[tokio::test]
async fn history_is_newest_first_and_filterable_by_order() {
    let harness = harness();
    let now = Utc::now();

    for (age_secs, order_id) in [(40, Some("O1")), (5, None), (90, Some("O1")), (20, None)] {
        let mut request = location_request("D1", 10.0, 106.0);
        request.order_id = order_id.map(|id| OrderId(id.to_string()));
        request.timestamp = Some(TimeStamp(now - ChronoDuration::seconds(age_secs)));
        harness.engine.update_location(request).await.unwrap();
    }

    let history = harness
        .engine
        .get_location_history(&DriverId("D1".to_string()), None, None)
        .await
        .unwrap();
    assert_eq!(history.len(), 4);
    assert!(history
        .windows(2)
        .all(|pair| pair[0].timestamp >= pair[1].timestamp));

    let order_history = harness
        .engine
        .get_location_history(
            &DriverId("D1".to_string()),
            Some(&OrderId("O1".to_string())),
            None,
        )
        .await
        .unwrap();
    assert_eq!(order_history.len(), 2);
    assert!(order_history
        .iter()
        .all(|ping| ping.order_id == Some(OrderId("O1".to_string()))));

    let recent = harness
        .engine
        .get_location_history(
            &DriverId("D1".to_string()),
            None,
            Some(TimeStamp(now - ChronoDuration::seconds(30))),
        )
        .await
        .unwrap();
    assert_eq!(recent.len(), 2, "since must exclude the older pings");
}

#[tokio::test]
async fn active_drivers_exclude_stale_pings() {
    let harness = harness();
    let now = Utc::now();

    harness
        .engine
        .update_location(location_request("FRESH", 10.0, 106.0))
        .await
        .unwrap();

    let mut stale = location_request("STALE", 11.0, 107.0);
    stale.timestamp = Some(TimeStamp(now - ChronoDuration::minutes(31)));
    harness.engine.update_location(stale).await.unwrap();

    let active = harness.engine.get_active_driver_locations().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].driver_id, DriverId("FRESH".to_string()));
}

#[tokio::test]
async fn order_location_update_keeps_status_untouched() {
    let harness = harness();
    let order_id = OrderId("O1".to_string());

    harness
        .engine
        .create_order_tracking(create_request("O1", "D1", "C1"))
        .await
        .unwrap();

    harness
        .engine
        .update_order_location(&order_id, Latitude(10.05), Longitude(106.05))
        .await
        .unwrap();

    let tracking = harness
        .engine
        .get_order_tracking(&order_id)
        .await
        .unwrap()
        .expect("tracking row must exist");
    assert_eq!(tracking.current_latitude, Some(Latitude(10.05)));
    assert_eq!(tracking.current_longitude, Some(Longitude(106.05)));
    assert_eq!(tracking.status, DeliveryStatus::ASSIGNED);
}

#[tokio::test]
async fn delivered_stamps_actual_arrival_and_later_states_keep_it() {
    let harness = harness();
    let order_id = OrderId("O1".to_string());

    let created = harness
        .engine
        .create_order_tracking(create_request("O1", "D1", "C1"))
        .await
        .unwrap();
    assert_eq!(created.status, DeliveryStatus::ASSIGNED);
    assert_eq!(created.actual_arrival, None);

    let delivered = harness
        .engine
        .update_order_status(&order_id, DeliveryStatus::DELIVERED)
        .await
        .unwrap();
    let arrival = delivered.actual_arrival.expect("DELIVERED must stamp actualArrival");

    // transitions are permissive, and leaving DELIVERED keeps the stamp
    let failed = harness
        .engine
        .update_order_status(&order_id, DeliveryStatus::FAILED)
        .await
        .unwrap();
    assert_eq!(failed.status, DeliveryStatus::FAILED);
    assert_eq!(failed.actual_arrival, Some(arrival));
}

#[tokio::test]
async fn unknown_order_is_a_not_found_error() {
    let harness = harness();
    let order_id = OrderId("missing".to_string());

    assert!(harness
        .engine
        .get_order_tracking(&order_id)
        .await
        .unwrap()
        .is_none());

    let err = harness
        .engine
        .update_order_status(&order_id, DeliveryStatus::DELIVERED)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::OrderTrackingNotFound(_)));

    let err = harness
        .engine
        .update_order_location(&order_id, Latitude(10.0), Longitude(106.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::OrderTrackingNotFound(_)));
}

#[tokio::test]
async fn duplicate_create_is_rejected_and_keeps_the_first_row() {
    let harness = harness();
    let order_id = OrderId("O1".to_string());

    harness
        .engine
        .create_order_tracking(create_request("O1", "D1", "C1"))
        .await
        .unwrap();

    let err = harness
        .engine
        .create_order_tracking(create_request("O1", "D2", "C2"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::OrderTrackingAlreadyExists(_)));

    let tracking = harness
        .engine
        .get_order_tracking(&order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tracking.driver_id, DriverId("D1".to_string()));
}

#[tokio::test]
async fn driver_and_customer_order_lookups() {
    let harness = harness();

    harness
        .engine
        .create_order_tracking(create_request("O1", "D1", "C1"))
        .await
        .unwrap();
    harness
        .engine
        .create_order_tracking(create_request("O2", "D1", "C2"))
        .await
        .unwrap();
    harness
        .engine
        .create_order_tracking(create_request("O3", "D2", "C1"))
        .await
        .unwrap();

    let driver_orders = harness
        .engine
        .get_driver_orders(&DriverId("D1".to_string()))
        .await
        .unwrap();
    assert_eq!(driver_orders.len(), 2);

    let customer_orders = harness
        .engine
        .get_customer_orders(&CustomerId("C1".to_string()))
        .await
        .unwrap();
    assert_eq!(customer_orders.len(), 2);
}

#[tokio::test]
async fn broken_downstreams_never_fail_ingestion() {
    let harness = harness();
    harness.bus.set_failing(true);
    harness.cache.set_failing(true);

    let stored = harness
        .engine
        .update_location(location_request("D1", 10.0, 106.0))
        .await
        .unwrap();
    assert_eq!(stored.latitude, Latitude(10.0));

    // the durable write went through
    let history = harness
        .engine
        .get_location_history(&DriverId("D1".to_string()), None, None)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);

    // and reads still work, served by the store while the cache is down
    let current = harness
        .engine
        .get_current_location(&DriverId("D1".to_string()))
        .await
        .unwrap();
    assert!(current.is_some());
}

#[tokio::test]
async fn invalid_pings_are_rejected_before_persistence() {
    let harness = harness();

    let err = harness
        .engine
        .update_location(location_request("   ", 10.0, 106.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));

    let err = harness
        .engine
        .update_location(location_request("D1", f64::NAN, 106.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidGPSData(_)));

    let err = harness
        .engine
        .update_location(location_request("D1", 10.0, 181.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidGPSData(_)));

    assert_eq!(harness.location_store.ping_count(), 0);
}

#[tokio::test]
async fn events_are_keyed_by_entity_id() {
    let harness = harness();

    harness
        .engine
        .update_location(location_request("D1", 10.0, 106.0))
        .await
        .unwrap();

    harness
        .engine
        .create_order_tracking(create_request("O1", "D1", "C1"))
        .await
        .unwrap();
    harness
        .engine
        .update_order_status(&OrderId("O1".to_string()), DeliveryStatus::PickedUp)
        .await
        .unwrap();

    let messages = harness.bus.messages();
    assert!(messages
        .iter()
        .any(|message| message.topic == LOCATION_TOPIC && message.key == "D1"));
    assert!(messages
        .iter()
        .any(|message| message.topic == STATUS_TOPIC && message.key == "O1"));
}

#[tokio::test]
async fn live_push_reaches_channel_subscribers() {
    let harness = harness();
    let mut location_rx = harness.hub.subscribe("location/D1");
    let mut order_rx = harness.hub.subscribe("order/O1");

    harness
        .engine
        .update_location(location_request("D1", 10.0, 106.0))
        .await
        .unwrap();
    let payload = timeout(Duration::from_secs(1), location_rx.recv())
        .await
        .unwrap()
        .unwrap();
    let event: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(event["driverId"], "D1");

    harness
        .engine
        .create_order_tracking(create_request("O1", "D1", "C1"))
        .await
        .unwrap();
    harness
        .engine
        .update_order_location(&OrderId("O1".to_string()), Latitude(10.05), Longitude(106.05))
        .await
        .unwrap();
    let payload = timeout(Duration::from_secs(1), order_rx.recv())
        .await
        .unwrap()
        .unwrap();
    let event: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(event["orderId"], "O1");
    assert_eq!(event["currentLatitude"], 10.05);
}

#[tokio::test]
async fn purging_history_clears_the_driver_log() {
    let harness = harness();

    harness
        .engine
        .update_location(location_request("D1", 10.0, 106.0))
        .await
        .unwrap();
    harness
        .engine
        .purge_location_history(&DriverId("D1".to_string()), None)
        .await
        .unwrap();

    let history = harness
        .engine
        .get_location_history(&DriverId("D1".to_string()), None, None)
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn second_simulation_start_replaces_the_first() {
    let harness = harness();
    let driver_id = DriverId("D1".to_string());

    harness
        .engine
        .create_order_tracking(create_request("O1", "D1", "C1"))
        .await
        .unwrap();

    harness
        .engine
        .clone()
        .start_simulation(driver_id.clone(), OrderId("O1".to_string()))
        .await;
    harness
        .engine
        .clone()
        .start_simulation(driver_id.clone(), OrderId("O2".to_string()))
        .await;

    assert_eq!(harness.engine.simulations().active_count().await, 1);
    assert_eq!(
        harness.engine.simulations().simulated_order(&driver_id).await,
        Some(OrderId("O2".to_string()))
    );

    harness.engine.stop_simulation(&driver_id).await;
    assert_eq!(harness.engine.simulations().active_count().await, 0);
}

#[tokio::test]
async fn stopping_without_a_running_simulation_is_a_noop() {
    let harness = harness();

    harness
        .engine
        .stop_simulation(&DriverId("ghost".to_string()))
        .await;
    assert_eq!(harness.engine.simulations().active_count().await, 0);
}

#[tokio::test]
async fn no_pings_are_emitted_after_stop_returns() {
    let harness = harness_with_tick(20);
    let driver_id = DriverId("D1".to_string());

    harness
        .engine
        .create_order_tracking(create_request("O1", "D1", "C1"))
        .await
        .unwrap();
    harness
        .engine
        .clone()
        .start_simulation(driver_id.clone(), OrderId("O1".to_string()))
        .await;

    sleep(Duration::from_millis(150)).await;
    harness.engine.stop_simulation(&driver_id).await;

    let count_at_stop = harness.location_store.ping_count();
    assert!(count_at_stop >= 1, "simulation produced no pings");

    sleep(Duration::from_millis(150)).await;
    assert_eq!(harness.location_store.ping_count(), count_at_stop);
}

#[tokio::test]
async fn simulated_pings_flow_through_the_normal_pipeline() {
    let harness = harness_with_tick(20);
    let driver_id = DriverId("D1".to_string());

    harness
        .engine
        .create_order_tracking(create_request("O1", "D1", "C1"))
        .await
        .unwrap();
    harness
        .engine
        .clone()
        .start_simulation(driver_id.clone(), OrderId("O1".to_string()))
        .await;
    sleep(Duration::from_millis(150)).await;
    harness.engine.stop_simulation(&driver_id).await;

    let history = harness
        .engine
        .get_location_history(&driver_id, Some(&OrderId("O1".to_string())), None)
        .await
        .unwrap();
    assert!(!history.is_empty());
    for ping in &history {
        assert_eq!(ping.status, TrackingStatus::ACTIVE);
        assert_eq!(ping.order_id, Some(OrderId("O1".to_string())));
        assert!(ping.latitude.0 > 10.0 && ping.latitude.0 < 10.1);
        assert!(ping.longitude.0 > 106.0 && ping.longitude.0 < 106.1);
        let speed = ping.speed.expect("simulated pings carry a speed");
        assert!((30.0..50.0).contains(&speed));
    }

    // the driver is indistinguishable from a real one on the read path
    let current = harness
        .engine
        .get_current_location(&driver_id)
        .await
        .unwrap();
    assert!(current.is_some());
}
