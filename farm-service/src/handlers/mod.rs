pub mod health;
pub mod land;
pub mod plant;
pub mod tac;

pub use health::{health_check, metrics_endpoint, readiness_check};

use crate::models::Land;
use crate::services::metrics::{outcome_label, FLOW_EXECUTIONS_TOTAL};
use crate::AppState;
use service_core::error::AppError;
use uuid::Uuid;

pub(crate) async fn load_land(state: &AppState, land_code: Uuid) -> Result<Land, AppError> {
    state
        .store
        .get_land(land_code)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Land {} not found", land_code)))
}

pub(crate) fn record_flow<T>(flow_name: &str, result: &Result<T, AppError>) {
    FLOW_EXECUTIONS_TOTAL
        .with_label_values(&[flow_name, outcome_label(result)])
        .inc();
}
