//! Add a plant to a land the caller owns.

use crate::models::{CreatePlant, Land};
use crate::services::FarmStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::flow::{FieldRule, Flow, FlowConfig, FlowResult};
use service_core::security::RowLevelSecurityPolicy;
use service_core::validation::ValidationErrorCollector;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub const FLOW_NAME: &str = "LandAddPlant";

/// `None` and blank strings count as not provided.
#[derive(Debug, Clone, Default, Validate)]
pub struct LandAddPlantParams {
    pub flavor_code: Option<Uuid>,
    pub other_flavor: String,
    pub some_int_val: Option<i32>,
    pub some_decimal_val: Option<Decimal>,
    pub some_money_val: Option<Decimal>,
    pub some_utc_date_time_val: Option<DateTime<Utc>>,
    #[validate(email(message = "Please enter a valid Some Email Address"))]
    pub some_email_address: Option<String>,
    pub some_phone_number: String,
    pub is_delete_allowed: bool,
    pub is_edit_allowed: bool,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandAddPlantResult {
    pub land_code: Uuid,
    pub plant_code: Uuid,
}

impl FlowResult for LandAddPlantResult {}

fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn flow_config() -> FlowConfig<LandAddPlantParams> {
    type P = LandAddPlantParams;
    FlowConfig::new()
        .with_row_level(RowLevelSecurityPolicy::CUSTOMER)
        .field(FieldRule::selection("flavorCode", "Flavor", |p: &P| p.flavor_code.is_some()).required(true))
        .field(FieldRule::entry("otherFlavor", "Other Flavor", |p: &P| not_blank(&p.other_flavor)))
        .field(FieldRule::entry("someIntVal", "Some Int Val", |p: &P| p.some_int_val.is_some()))
        .field(FieldRule::entry("someDecimalVal", "Some Decimal Val", |p: &P| {
            p.some_decimal_val.is_some()
        }))
        .field(FieldRule::entry("someMoneyVal", "Some Money Val", |p: &P| {
            p.some_money_val.is_some()
        }))
        .field(FieldRule::entry("someUTCDateTimeVal", "Some UTC Date Time Val", |p: &P| {
            p.some_utc_date_time_val.is_some()
        }))
        .field(FieldRule::entry("someEmailAddress", "Some Email Address", |p: &P| {
            p.some_email_address.as_deref().is_some_and(not_blank)
        }))
        .field(FieldRule::entry("somePhoneNumber", "Some Phone Number", |p: &P| {
            not_blank(&p.some_phone_number)
        }))
        .field(FieldRule::entry("isDeleteAllowed", "Is Delete Allowed", |_: &P| true))
        .field(FieldRule::entry("isEditAllowed", "Is Edit Allowed", |_: &P| true))
        .field(FieldRule::entry("notes", "Notes", |p: &P| not_blank(&p.notes)))
}

pub struct LandAddPlantFlow {
    store: Arc<dyn FarmStore>,
    config: FlowConfig<LandAddPlantParams>,
}

impl LandAddPlantFlow {
    pub fn new(store: Arc<dyn FarmStore>) -> Self {
        Self::with_config(store, flow_config())
    }

    pub fn with_config(store: Arc<dyn FarmStore>, config: FlowConfig<LandAddPlantParams>) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl Flow for LandAddPlantFlow {
    type Entity = Land;
    type Params = LandAddPlantParams;
    type Output = LandAddPlantResult;
    type Error = AppError;

    fn name(&self) -> &'static str {
        FLOW_NAME
    }

    fn config(&self) -> &FlowConfig<Self::Params> {
        &self.config
    }

    async fn validate(
        &self,
        _land: &Land,
        params: &LandAddPlantParams,
        errors: &mut ValidationErrorCollector,
    ) -> Result<(), AppError> {
        if let Err(format_errors) = params.validate() {
            errors.add_validator_errors(&format_errors);
        }

        if let Some(flavor_code) = params.flavor_code {
            let known = self
                .store
                .get_flavor(flavor_code)
                .await?
                .is_some_and(|flavor| flavor.is_active);
            if !known {
                errors.add("flavorCode", "Please select a valid Flavor");
            }
        }
        Ok(())
    }

    async fn run(
        &self,
        land: &mut Land,
        params: LandAddPlantParams,
    ) -> Result<LandAddPlantResult, AppError> {
        let flavor_code = params.flavor_code.ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("Flavor code missing after validation"))
        })?;

        let plant = self
            .store
            .insert_plant(CreatePlant {
                land_code: land.code,
                flavor_code,
                other_flavor: params.other_flavor,
                some_int_val: params.some_int_val.unwrap_or_default(),
                some_decimal_val: params.some_decimal_val.unwrap_or_default(),
                some_money_val: params.some_money_val.unwrap_or_default(),
                some_utc_date_time_val: params.some_utc_date_time_val,
                some_email_address: params.some_email_address.unwrap_or_default(),
                some_phone_number: params.some_phone_number,
                is_delete_allowed: params.is_delete_allowed,
                is_edit_allowed: params.is_edit_allowed,
                notes: params.notes,
            })
            .await?;

        info!(land_code = %land.code, plant_code = %plant.code, "Plant added to land");

        Ok(LandAddPlantResult {
            land_code: land.code,
            plant_code: plant.code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_flavor_required_by_default() {
        let config = flow_config();
        let mut errors = ValidationErrorCollector::new();
        config.check_fields(&LandAddPlantParams::default(), &mut errors);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.message_for("flavorCode"), Some("Please select a Flavor"));
    }

    #[test]
    fn test_required_toggle_on_copy() {
        let mut config = flow_config();
        assert!(config.set_required("notes", true));
        let mut errors = ValidationErrorCollector::new();
        config.check_fields(&LandAddPlantParams::default(), &mut errors);
        assert_eq!(errors.message_for("notes"), Some("Please enter a Notes"));

        let mut fresh = ValidationErrorCollector::new();
        flow_config().check_fields(&LandAddPlantParams::default(), &mut fresh);
        assert!(fresh.message_for("notes").is_none());
    }

    #[test]
    fn test_email_format() {
        let params = LandAddPlantParams {
            some_email_address: Some("not-an-email".to_string()),
            ..Default::default()
        };
        let mut errors = ValidationErrorCollector::new();
        if let Err(e) = params.validate() {
            errors.add_validator_errors(&e);
        }
        assert_eq!(
            errors.message_for("someEmailAddress"),
            Some("Please enter a valid Some Email Address")
        );
    }
}
