/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;

// Persistent Redis
pub fn driver_location_history_key(DriverId(driver_id): &DriverId) -> String {
    format!("dts:loc:driver:{driver_id}")
}

// Persistent Redis
pub fn order_location_history_key(OrderId(order_id): &OrderId) -> String {
    format!("dts:loc:order:{order_id}")
}

// Persistent Redis, driver id scored by last ping timestamp
pub fn active_drivers_key() -> String {
    "dts:loc:drivers".to_string()
}

// Persistent Redis
pub fn order_tracking_key(OrderId(order_id): &OrderId) -> String {
    format!("dts:order:{order_id}")
}

// Persistent Redis
pub fn driver_orders_key(DriverId(driver_id): &DriverId) -> String {
    format!("dts:order:driver:{driver_id}")
}

// Persistent Redis
pub fn customer_orders_key(CustomerId(customer_id): &CustomerId) -> String {
    format!("dts:order:customer:{customer_id}")
}

// Cache Redis
pub fn driver_location_cache_key(prefix: &str, DriverId(driver_id): &DriverId) -> String {
    format!("{prefix}:{driver_id}")
}

// Persistent Redis
pub fn health_check_key() -> String {
    "dts:health_check".to_string()
}
