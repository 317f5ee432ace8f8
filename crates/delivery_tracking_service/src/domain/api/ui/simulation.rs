use actix_web::{
    post,
    web::{Data, Query},
};

use crate::{domain::types::ui::simulation::*, environment::AppState, tools::error::AppError};

#[post("/tracking/simulation/start")]
pub async fn start_simulation(
    data: Data<AppState>,
    query: Query<StartSimulationQuery>,
) -> Result<String, AppError> {
    let StartSimulationQuery {
        driver_id,
        order_id,
    } = query.into_inner();
    let confirmation = format!("Location simulation started for driver: {}", driver_id.0);

    data.engine.clone().start_simulation(driver_id, order_id).await;

    Ok(confirmation)
}

#[post("/tracking/simulation/stop")]
pub async fn stop_simulation(
    data: Data<AppState>,
    query: Query<StopSimulationQuery>,
) -> Result<String, AppError> {
    let StopSimulationQuery { driver_id } = query.into_inner();

    data.engine.stop_simulation(&driver_id).await;

    Ok(format!("Location simulation stopped for driver: {}", driver_id.0))
}
