/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::{
    delete, get, post,
    web::{Data, Json, Path, Query},
};

use crate::{
    common::types::*,
    domain::types::ui::location::*,
    environment::AppState,
    tools::error::AppError,
};

#[post("/tracking/location")]
pub async fn update_location(
    data: Data<AppState>,
    param_obj: Json<UpdateLocationRequest>,
) -> Result<Json<LocationPing>, AppError> {
    let request_body = param_obj.into_inner();

    Ok(Json(data.engine.update_location(request_body).await?))
}

#[get("/tracking/location/active")]
pub async fn get_active_driver_locations(
    data: Data<AppState>,
) -> Result<Json<Vec<LocationPing>>, AppError> {
    Ok(Json(data.engine.get_active_driver_locations().await?))
}

#[get("/tracking/location/{driverId}/history")]
pub async fn get_location_history(
    data: Data<AppState>,
    path: Path<String>,
    query: Query<LocationHistoryQuery>,
) -> Result<Json<Vec<LocationPing>>, AppError> {
    let driver_id = DriverId(path.into_inner());
    let LocationHistoryQuery { order_id, since } = query.into_inner();

    Ok(Json(
        data.engine
            .get_location_history(&driver_id, order_id.as_ref(), since)
            .await?,
    ))
}

#[delete("/tracking/location/{driverId}/history")]
pub async fn purge_location_history(
    data: Data<AppState>,
    path: Path<String>,
    query: Query<PurgeHistoryQuery>,
) -> Result<String, AppError> {
    let driver_id = DriverId(path.into_inner());
    let order_id = query.into_inner().order_id;

    data.engine
        .purge_location_history(&driver_id, order_id.as_ref())
        .await?;

    Ok(format!("Location history cleared for driver: {}", driver_id.0))
}

#[get("/tracking/location/{driverId}")]
pub async fn get_current_location(
    data: Data<AppState>,
    path: Path<String>,
) -> Result<Json<LocationPing>, AppError> {
    let driver_id = DriverId(path.into_inner());

    match data.engine.get_current_location(&driver_id).await? {
        Some(location) => Ok(Json(location)),
        None => Err(AppError::DriverLocationNotFound(driver_id.0)),
    }
}

#[delete("/tracking/cache/driver/{driverId}")]
pub async fn clear_driver_cache(
    data: Data<AppState>,
    path: Path<String>,
) -> Result<String, AppError> {
    let driver_id = DriverId(path.into_inner());

    data.engine.invalidate_driver_cache(&driver_id).await?;

    Ok(format!("Cache cleared for driver: {}", driver_id.0))
}
