use actix_web::{
    get,
    web::{Data, Json},
};

use crate::{
    domain::types::ui::ResponseData, environment::AppState, redis::keys::health_check_key,
    tools::error::AppError,
};

#[get("/healthcheck")]
async fn health_check(data: Data<AppState>) -> Result<Json<ResponseData>, AppError> {
    data.persistent_redis
        .set_with_expiry(&health_check_key(), "delivery-tracking-service-health-check", 60)
        .await?;

    let health_check_resp = data.persistent_redis.get_key(&health_check_key()).await?;

    if health_check_resp.is_none() {
        return Err(AppError::InternalError(
            "Health check failed as cannot get key from redis".to_string(),
        ));
    }

    Ok(Json(ResponseData {
        result: "Service Is Up".to_string(),
    }))
}
