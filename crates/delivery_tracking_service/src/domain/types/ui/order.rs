use crate::common::types::*;
use serde::{Deserialize, Serialize};

/// Query parameters of `POST /tracking/order`.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderTrackingRequest {
    pub order_id: OrderId,
    pub driver_id: DriverId,
    pub customer_id: CustomerId,
    pub pickup_lat: Latitude,
    pub pickup_lng: Longitude,
    pub delivery_lat: Latitude,
    pub delivery_lng: Longitude,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusQuery {
    pub status: DeliveryStatus,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderLocationQuery {
    pub latitude: Latitude,
    pub longitude: Longitude,
}
