use crate::common::types::*;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StartSimulationQuery {
    pub driver_id: DriverId,
    pub order_id: OrderId,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StopSimulationQuery {
    pub driver_id: DriverId,
}
