use crate::dtos::{FlowResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::flows::{TacLoginFlow, TacRegisterFlow};
use crate::handlers::record_flow;
use crate::middleware::Principal;
use crate::models::Tac;
use crate::AppState;
use axum::extract::{Json, Path, State};
use service_core::error::AppError;
use service_core::flow::{Flow, FlowExecutor};
use tracing::instrument;
use uuid::Uuid;

async fn load_tac(state: &AppState, tac_code: Uuid) -> Result<Tac, AppError> {
    state
        .store
        .get_tac(tac_code)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Tac {} not found", tac_code)))
}

/// POST /api/v1/tac/{tac_code}/register
#[instrument(skip(state, principal, request), fields(tac_code = %tac_code))]
pub async fn register(
    State(state): State<AppState>,
    Path(tac_code): Path<Uuid>,
    principal: Principal,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<FlowResponse<RegisterResponse>>, AppError> {
    let mut tac = load_tac(&state, tac_code).await?;
    let flow = TacRegisterFlow::new(state.store.clone());

    let result = FlowExecutor::new(principal.context())
        .execute(&flow, &mut tac, request.into())
        .await
        .map_err(AppError::from);
    record_flow(flow.name(), &result);

    Ok(Json(FlowResponse::ok(result?)))
}

/// POST /api/v1/tac/{tac_code}/login
#[instrument(skip(state, principal, request), fields(tac_code = %tac_code))]
pub async fn login(
    State(state): State<AppState>,
    Path(tac_code): Path<Uuid>,
    principal: Principal,
    Json(request): Json<LoginRequest>,
) -> Result<Json<FlowResponse<LoginResponse>>, AppError> {
    let mut tac = load_tac(&state, tac_code).await?;
    let flow = TacLoginFlow::new(state.store.clone());

    let result = FlowExecutor::new(principal.context())
        .execute(&flow, &mut tac, request.into())
        .await
        .map_err(AppError::from);
    record_flow(flow.name(), &result);

    Ok(Json(FlowResponse::ok(result?)))
}
