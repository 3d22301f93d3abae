use crate::dtos::{AddPlantRequest, AddPlantResponse, FlowResponse, PlantListQuery, PlantListResponse};
use crate::flows::LandAddPlantFlow;
use crate::handlers::{load_land, record_flow};
use crate::middleware::Principal;
use crate::reports::land_plant_list::{LandPlantListReport, REPORT_NAME};
use crate::services::metrics::{outcome_label, REPORT_REQUESTS_TOTAL};
use crate::AppState;
use axum::extract::{Json, Path, Query, State};
use service_core::error::AppError;
use service_core::flow::{Flow, FlowExecutor};
use tracing::instrument;
use uuid::Uuid;

/// POST /api/v1/land/{land_code}/add-plant
#[instrument(skip(state, principal, request), fields(land_code = %land_code))]
pub async fn add_plant(
    State(state): State<AppState>,
    Path(land_code): Path<Uuid>,
    principal: Principal,
    Json(request): Json<AddPlantRequest>,
) -> Result<Json<FlowResponse<AddPlantResponse>>, AppError> {
    let mut land = load_land(&state, land_code).await?;
    let flow = LandAddPlantFlow::new(state.store.clone());

    let result = FlowExecutor::new(principal.context())
        .execute(&flow, &mut land, request.into())
        .await
        .map_err(AppError::from);
    record_flow(flow.name(), &result);

    Ok(Json(FlowResponse::ok(result?)))
}

/// GET /api/v1/land/{land_code}/plant-list
#[instrument(skip(state, principal, query), fields(land_code = %land_code))]
pub async fn plant_list(
    State(state): State<AppState>,
    Path(land_code): Path<Uuid>,
    principal: Principal,
    Query(query): Query<PlantListQuery>,
) -> Result<Json<PlantListResponse>, AppError> {
    let land = load_land(&state, land_code).await?;
    let pagination = query.pagination(&state.config.reports);

    let result = LandPlantListReport::new(state.store.clone())
        .generate(principal.context(), &land, &query.filter(), &pagination)
        .await;
    REPORT_REQUESTS_TOTAL
        .with_label_values(&[REPORT_NAME, outcome_label(&result)])
        .inc();

    Ok(Json(PlantListResponse {
        page_number: pagination.page_number,
        item_count_per_page: pagination.item_count_per_page,
        items: result?.into_iter().map(Into::into).collect(),
    }))
}
