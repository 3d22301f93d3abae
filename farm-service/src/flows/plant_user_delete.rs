//! Delete a plant on behalf of its owning customer.

use crate::models::Plant;
use crate::services::FarmStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::flow::{Flow, FlowConfig, FlowResult};
use service_core::security::RowLevelSecurityPolicy;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub const FLOW_NAME: &str = "PlantUserDelete";
pub const REQUIRED_ROLE: &str = "User";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantUserDeleteResult {
    pub land_code: Uuid,
}

impl FlowResult for PlantUserDeleteResult {}

pub fn flow_config() -> FlowConfig<()> {
    FlowConfig::new()
        .with_required_role(REQUIRED_ROLE)
        .with_row_level(RowLevelSecurityPolicy::CUSTOMER)
}

pub struct PlantUserDeleteFlow {
    store: Arc<dyn FarmStore>,
    config: FlowConfig<()>,
}

impl PlantUserDeleteFlow {
    pub fn new(store: Arc<dyn FarmStore>) -> Self {
        Self::with_config(store, flow_config())
    }

    pub fn with_config(store: Arc<dyn FarmStore>, config: FlowConfig<()>) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl Flow for PlantUserDeleteFlow {
    type Entity = Plant;
    type Params = ();
    type Output = PlantUserDeleteResult;
    type Error = AppError;

    fn name(&self) -> &'static str {
        FLOW_NAME
    }

    fn config(&self) -> &FlowConfig<()> {
        &self.config
    }

    async fn run(&self, plant: &mut Plant, _params: ()) -> Result<PlantUserDeleteResult, AppError> {
        if !self.store.delete_plant(plant.code).await? {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Plant {} not found",
                plant.code
            )));
        }

        info!(plant_code = %plant.code, land_code = %plant.land_code, "Plant deleted");

        Ok(PlantUserDeleteResult {
            land_code: plant.land_code,
        })
    }
}
