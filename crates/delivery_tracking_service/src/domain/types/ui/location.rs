use crate::common::types::*;
use serde::{Deserialize, Serialize};

/// Body of `POST /tracking/location`. Real GPS clients and the simulation
/// scheduler submit the same shape.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    pub driver_id: DriverId,
    pub order_id: Option<OrderId>,
    pub latitude: Latitude,
    pub longitude: Longitude,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub accuracy: Option<f64>,
    /// Defaults to the ingestion time when absent.
    pub timestamp: Option<TimeStamp>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LocationHistoryQuery {
    /// When set, the history is filtered by order instead of driver.
    pub order_id: Option<OrderId>,
    pub since: Option<TimeStamp>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PurgeHistoryQuery {
    pub order_id: Option<OrderId>,
}
