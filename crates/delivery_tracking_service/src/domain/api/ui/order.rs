use actix_web::{
    get, post, put,
    web::{Data, Json, Path, Query},
    HttpResponse,
};

use crate::{
    common::types::*,
    domain::types::ui::order::*,
    environment::AppState,
    tools::error::AppError,
};

#[post("/tracking/order")]
pub async fn create_order_tracking(
    data: Data<AppState>,
    query: Query<CreateOrderTrackingRequest>,
) -> Result<HttpResponse, AppError> {
    let tracking = data.engine.create_order_tracking(query.into_inner()).await?;

    Ok(HttpResponse::Created().json(tracking))
}

#[get("/tracking/order/driver/{driverId}")]
pub async fn get_driver_orders(
    data: Data<AppState>,
    path: Path<String>,
) -> Result<Json<Vec<OrderTracking>>, AppError> {
    let driver_id = DriverId(path.into_inner());

    Ok(Json(data.engine.get_driver_orders(&driver_id).await?))
}

#[get("/tracking/order/customer/{customerId}")]
pub async fn get_customer_orders(
    data: Data<AppState>,
    path: Path<String>,
) -> Result<Json<Vec<OrderTracking>>, AppError> {
    let customer_id = CustomerId(path.into_inner());

    Ok(Json(data.engine.get_customer_orders(&customer_id).await?))
}

#[put("/tracking/order/{orderId}/status")]
pub async fn update_order_status(
    data: Data<AppState>,
    path: Path<String>,
    query: Query<UpdateOrderStatusQuery>,
) -> Result<Json<OrderTracking>, AppError> {
    let order_id = OrderId(path.into_inner());

    Ok(Json(
        data.engine
            .update_order_status(&order_id, query.status)
            .await?,
    ))
}

#[put("/tracking/order/{orderId}/location")]
pub async fn update_order_location(
    data: Data<AppState>,
    path: Path<String>,
    query: Query<UpdateOrderLocationQuery>,
) -> Result<Json<OrderTracking>, AppError> {
    let order_id = OrderId(path.into_inner());
    let UpdateOrderLocationQuery { latitude, longitude } = query.into_inner();

    Ok(Json(
        data.engine
            .update_order_location(&order_id, latitude, longitude)
            .await?,
    ))
}

#[get("/tracking/order/{orderId}")]
pub async fn get_order_tracking(
    data: Data<AppState>,
    path: Path<String>,
) -> Result<Json<OrderTracking>, AppError> {
    let order_id = OrderId(path.into_inner());

    match data.engine.get_order_tracking(&order_id).await? {
        Some(tracking) => Ok(Json(tracking)),
        None => Err(AppError::OrderTrackingNotFound(order_id.0)),
    }
}
