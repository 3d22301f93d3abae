//! Plants on a land, filtered and paged.

use crate::models::Land;
use crate::services::FarmStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::report::{
    PaginationRequest, RawRow, ReportAssembler, ReportConfig, ReportItem, RowProvider,
};
use service_core::security::{RowLevelSecurityPolicy, SecurityContext};
use std::sync::Arc;
use uuid::Uuid;

pub const REPORT_NAME: &str = "LandPlantList";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandPlantListFilter {
    pub flavor_code: Option<Uuid>,
    pub some_int_val_min: Option<i32>,
    pub is_delete_allowed: Option<bool>,
}

impl LandPlantListFilter {
    pub fn matches(&self, flavor_code: Uuid, some_int_val: i32, is_delete_allowed: bool) -> bool {
        self.flavor_code.is_none_or(|code| code == flavor_code)
            && self.some_int_val_min.is_none_or(|min| some_int_val >= min)
            && self.is_delete_allowed.is_none_or(|flag| flag == is_delete_allowed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandPlantListItem {
    pub plant_code: Uuid,
    pub land_code: Uuid,
    pub flavor_code: Uuid,
    pub flavor_name: String,
    pub some_int_val: i32,
    pub some_decimal_val: Decimal,
    pub some_money_val: Decimal,
    pub some_utc_date_time_val: Option<DateTime<Utc>>,
    pub some_email_address: String,
    pub is_delete_allowed: bool,
    pub is_edit_allowed: bool,
    pub notes: String,
}

impl ReportItem for LandPlantListItem {}

/// Columns a caller may order by. Anything else falls back to creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    SomeIntVal,
    SomeDecimalVal,
    SomeUtcDateTimeVal,
    FlavorName,
    SomeEmailAddress,
}

impl SortColumn {
    pub fn parse(column_name: &str) -> Option<Self> {
        match column_name {
            "someIntVal" => Some(Self::SomeIntVal),
            "someDecimalVal" => Some(Self::SomeDecimalVal),
            "someUTCDateTimeVal" => Some(Self::SomeUtcDateTimeVal),
            "flavorName" => Some(Self::FlavorName),
            "someEmailAddress" => Some(Self::SomeEmailAddress),
            _ => None,
        }
    }

    pub fn sql_expr(&self) -> &'static str {
        match self {
            Self::SomeIntVal => "p.some_int_val",
            Self::SomeDecimalVal => "p.some_decimal_val",
            Self::SomeUtcDateTimeVal => "p.some_utc_date_time_val",
            Self::FlavorName => "f.name",
            Self::SomeEmailAddress => "p.some_email_address",
        }
    }
}

pub fn report_config() -> ReportConfig {
    ReportConfig::new(REPORT_NAME).with_row_level(RowLevelSecurityPolicy::CUSTOMER)
}

/// Row source backed by whichever store the service runs on.
#[derive(Clone)]
pub struct LandPlantListProvider {
    store: Arc<dyn FarmStore>,
}

impl LandPlantListProvider {
    pub fn new(store: Arc<dyn FarmStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RowProvider for LandPlantListProvider {
    type Filter = LandPlantListFilter;
    type Error = AppError;

    async fn generate_list(
        &self,
        owning_code: Uuid,
        filter: &Self::Filter,
        pagination: &PaginationRequest,
    ) -> Result<Vec<RawRow>, Self::Error> {
        self.store
            .land_plant_list_rows(owning_code, filter, pagination)
            .await
    }
}

pub struct LandPlantListReport {
    assembler: ReportAssembler<LandPlantListProvider>,
}

impl LandPlantListReport {
    pub fn new(store: Arc<dyn FarmStore>) -> Self {
        Self::with_config(store, report_config())
    }

    pub fn with_config(store: Arc<dyn FarmStore>, config: ReportConfig) -> Self {
        Self {
            assembler: ReportAssembler::new(LandPlantListProvider::new(store), config),
        }
    }

    pub async fn generate(
        &self,
        ctx: &SecurityContext,
        land: &Land,
        filter: &LandPlantListFilter,
        pagination: &PaginationRequest,
    ) -> Result<Vec<LandPlantListItem>, AppError> {
        Ok(self.assembler.generate(ctx, land, filter, pagination).await?)
    }
}
