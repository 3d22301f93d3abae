use crate::config::ReportSettings;
use crate::reports::{LandPlantListFilter, LandPlantListItem};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::report::PaginationRequest;
use uuid::Uuid;

/// Query string of the plant list endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantListQuery {
    pub page_number: Option<i64>,
    pub item_count_per_page: Option<i64>,
    pub order_by_column_name: Option<String>,
    pub order_by_descending: Option<bool>,
    pub flavor_code: Option<Uuid>,
    pub some_int_val_min: Option<i32>,
    pub is_delete_allowed: Option<bool>,
}

impl PlantListQuery {
    /// Missing page size takes the configured default; oversize is clamped.
    /// Non-positive values are left for the pagination guard to reject.
    pub fn pagination(&self, settings: &ReportSettings) -> PaginationRequest {
        let item_count_per_page = self
            .item_count_per_page
            .unwrap_or(settings.default_item_count_per_page)
            .min(settings.max_item_count_per_page);

        PaginationRequest::new(self.page_number.unwrap_or(1), item_count_per_page).ordered_by(
            self.order_by_column_name.clone().unwrap_or_default(),
            self.order_by_descending.unwrap_or(false),
        )
    }

    pub fn filter(&self) -> LandPlantListFilter {
        LandPlantListFilter {
            flavor_code: self.flavor_code,
            some_int_val_min: self.some_int_val_min,
            is_delete_allowed: self.is_delete_allowed,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantListItemResponse {
    pub plant_code: Uuid,
    pub land_code: Uuid,
    pub flavor_code: Uuid,
    pub flavor_name: String,
    pub some_int_val: i32,
    pub some_decimal_val: Decimal,
    pub some_money_val: Decimal,
    #[serde(rename = "someUTCDateTimeVal")]
    pub some_utc_date_time_val: Option<DateTime<Utc>>,
    pub some_email_address: String,
    pub is_delete_allowed: bool,
    pub is_edit_allowed: bool,
    pub notes: String,
}

impl From<LandPlantListItem> for PlantListItemResponse {
    fn from(item: LandPlantListItem) -> Self {
        Self {
            plant_code: item.plant_code,
            land_code: item.land_code,
            flavor_code: item.flavor_code,
            flavor_name: item.flavor_name,
            some_int_val: item.some_int_val,
            some_decimal_val: item.some_decimal_val,
            some_money_val: item.some_money_val,
            some_utc_date_time_val: item.some_utc_date_time_val,
            some_email_address: item.some_email_address,
            is_delete_allowed: item.is_delete_allowed,
            is_edit_allowed: item.is_edit_allowed,
            notes: item.notes,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantListResponse {
    pub page_number: i64,
    pub item_count_per_page: i64,
    pub items: Vec<PlantListItemResponse>,
}
