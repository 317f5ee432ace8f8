/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
#![allow(clippy::expect_used)]

use actix_web_prom::PrometheusMetrics;
use prometheus::{
    opts, register_histogram_vec, register_int_counter, register_int_gauge, HistogramVec,
    IntCounter, IntGauge,
};
pub use shared::utils::prometheus::init_prometheus_metrics;

pub static INCOMING_API: once_cell::sync::Lazy<HistogramVec> = once_cell::sync::Lazy::new(|| {
    register_histogram_vec!(
        opts!("http_request_duration_seconds", "Incoming API requests").into(),
        &["method", "handler", "status_code", "code", "version"]
    )
    .expect("Failed to register incoming API metrics")
});

pub static TOTAL_LOCATION_UPDATES: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!("total_location_updates", "Total Location Updates")
            .expect("Failed to register total location updates metrics")
    });

pub static LOCATION_CACHE_HITS: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!("location_cache_hits", "Driver Location Cache Hits")
            .expect("Failed to register location cache hit metrics")
    });

pub static LOCATION_CACHE_MISSES: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!("location_cache_misses", "Driver Location Cache Misses")
            .expect("Failed to register location cache miss metrics")
    });

pub static EVENT_PUBLISH_FAILURES: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!("event_publish_failures", "Dropped Event Publishes")
            .expect("Failed to register event publish failure metrics")
    });

pub static ACTIVE_SIMULATIONS: once_cell::sync::Lazy<IntGauge> = once_cell::sync::Lazy::new(|| {
    register_int_gauge!("active_simulations", "Currently Running Driver Simulations")
        .expect("Failed to register active simulations metrics")
});

/// Macro that observes the duration of incoming API requests and logs metrics related to the request.
///
/// This macro captures key parameters of an incoming request like method, endpoint, status, code, and the time taken to process the request.
/// It then updates the `INCOMING_API` histogram with these metrics.
#[macro_export]
macro_rules! incoming_api {
    ($method:expr, $endpoint:expr, $status:expr, $code:expr, $start:expr) => {
        let duration = $start.elapsed().as_secs_f64();
        let version = std::env::var("DEPLOYMENT_VERSION").unwrap_or("DEV".to_string());
        INCOMING_API
            .with_label_values(&[$method, $endpoint, $status, $code, version.as_str()])
            .observe(duration);
    };
}

/// Initializes and returns a `PrometheusMetrics` instance with the service
/// collectors registered, exposing them for scraping on `/metrics`.
pub fn prometheus_metrics() -> PrometheusMetrics {
    let prometheus = init_prometheus_metrics();

    prometheus
        .registry
        .register(Box::new(INCOMING_API.to_owned()))
        .expect("Failed to register incoming API metrics");

    prometheus
        .registry
        .register(Box::new(TOTAL_LOCATION_UPDATES.to_owned()))
        .expect("Failed to register total location updates metrics");

    prometheus
        .registry
        .register(Box::new(LOCATION_CACHE_HITS.to_owned()))
        .expect("Failed to register location cache hit metrics");

    prometheus
        .registry
        .register(Box::new(LOCATION_CACHE_MISSES.to_owned()))
        .expect("Failed to register location cache miss metrics");

    prometheus
        .registry
        .register(Box::new(EVENT_PUBLISH_FAILURES.to_owned()))
        .expect("Failed to register event publish failure metrics");

    prometheus
        .registry
        .register(Box::new(ACTIVE_SIMULATIONS.to_owned()))
        .expect("Failed to register active simulations metrics");

    prometheus
}
