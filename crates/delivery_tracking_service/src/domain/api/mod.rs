/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
pub mod ui;

use actix_web::web::ServiceConfig;

pub fn handler(config: &mut ServiceConfig) {
    // fixed segments before `{driverId}`/`{orderId}` captures
    config
        .service(ui::location::update_location)
        .service(ui::location::get_active_driver_locations)
        .service(ui::location::get_location_history)
        .service(ui::location::purge_location_history)
        .service(ui::location::get_current_location)
        .service(ui::location::clear_driver_cache)
        .service(ui::order::create_order_tracking)
        .service(ui::order::get_driver_orders)
        .service(ui::order::get_customer_orders)
        .service(ui::order::update_order_status)
        .service(ui::order::update_order_location)
        .service(ui::order::get_order_tracking)
        .service(ui::simulation::start_simulation)
        .service(ui::simulation::stop_simulation)
        .service(ui::stream::stream_events)
        .service(ui::healthcheck::health_check);
}
