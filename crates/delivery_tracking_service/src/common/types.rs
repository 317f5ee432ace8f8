/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct DriverId(pub String);
#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct OrderId(pub String);
#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct CustomerId(pub String);
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Copy)]
pub struct Latitude(pub f64);
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Copy)]
pub struct Longitude(pub f64);
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Hash, Ord)]
pub struct TimeStamp(pub DateTime<Utc>);

/// Lifecycle state of a single reported ping.
#[derive(Debug, Clone, Copy, EnumString, Display, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub enum TrackingStatus {
    ACTIVE,
    INACTIVE,
    STALE,
}

#[derive(Debug, Clone, Copy, EnumString, Display, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub enum DeliveryStatus {
    PENDING,
    ASSIGNED,
    #[strum(serialize = "PICKED_UP")]
    #[serde(rename = "PICKED_UP")]
    PickedUp,
    #[strum(serialize = "IN_TRANSIT")]
    #[serde(rename = "IN_TRANSIT")]
    InTransit,
    #[strum(serialize = "OUT_FOR_DELIVERY")]
    #[serde(rename = "OUT_FOR_DELIVERY")]
    OutForDelivery,
    DELIVERED,
    FAILED,
    RETURNED,
}

/// One reported GPS sample for a driver. Immutable once persisted, retained
/// indefinitely as history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationPing {
    pub id: String,
    pub driver_id: DriverId,
    pub order_id: Option<OrderId>,
    pub latitude: Latitude,
    pub longitude: Longitude,
    pub altitude: Option<f64>,
    /// km/h
    pub speed: Option<f64>,
    /// degrees
    pub heading: Option<f64>,
    /// meters
    pub accuracy: Option<f64>,
    pub timestamp: TimeStamp,
    pub status: TrackingStatus,
    pub created_at: TimeStamp,
}

/// Durable per-order tracking row. At most one record per `order_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderTracking {
    pub order_id: OrderId,
    pub driver_id: DriverId,
    pub customer_id: CustomerId,
    pub pickup_latitude: Latitude,
    pub pickup_longitude: Longitude,
    pub delivery_latitude: Latitude,
    pub delivery_longitude: Longitude,
    pub current_latitude: Option<Latitude>,
    pub current_longitude: Option<Longitude>,
    pub estimated_arrival: Option<TimeStamp>,
    pub actual_arrival: Option<TimeStamp>,
    pub status: DeliveryStatus,
    pub created_at: TimeStamp,
    pub updated_at: TimeStamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn delivery_status_uses_wire_names() {
        let parsed: DeliveryStatus = serde_json::from_str("\"OUT_FOR_DELIVERY\"").unwrap();
        assert_eq!(parsed, DeliveryStatus::OutForDelivery);
        assert_eq!(
            serde_json::to_string(&DeliveryStatus::PickedUp).unwrap(),
            "\"PICKED_UP\""
        );
        assert_eq!(
            DeliveryStatus::from_str("IN_TRANSIT").unwrap(),
            DeliveryStatus::InTransit
        );
        assert_eq!(DeliveryStatus::PickedUp.to_string(), "PICKED_UP");
    }
}
