use crate::dtos::{FlowResponse, UserDeleteResponse};
use crate::flows::PlantUserDeleteFlow;
use crate::handlers::record_flow;
use crate::middleware::Principal;
use crate::AppState;
use axum::extract::{Json, Path, State};
use service_core::error::AppError;
use service_core::flow::{Flow, FlowExecutor};
use tracing::instrument;
use uuid::Uuid;

/// POST /api/v1/plant/{plant_code}/user-delete
#[instrument(skip(state, principal), fields(plant_code = %plant_code))]
pub async fn user_delete(
    State(state): State<AppState>,
    Path(plant_code): Path<Uuid>,
    principal: Principal,
) -> Result<Json<FlowResponse<UserDeleteResponse>>, AppError> {
    let mut plant = state
        .store
        .get_plant(plant_code)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Plant {} not found", plant_code)))?;
    let flow = PlantUserDeleteFlow::new(state.store.clone());

    let result = FlowExecutor::new(principal.context())
        .execute(&flow, &mut plant, ())
        .await
        .map_err(AppError::from);
    record_flow(flow.name(), &result);

    Ok(Json(FlowResponse::ok(result?)))
}
