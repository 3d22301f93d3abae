//! Plant model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::security::{OwnerCodes, SecuredEntity};
use sqlx::FromRow;
use uuid::Uuid;

/// Plant on a land. `customer_code` is resolved through the land when loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Plant {
    pub code: Uuid,
    pub land_code: Uuid,
    pub customer_code: Option<Uuid>,
    pub flavor_code: Uuid,
    pub other_flavor: String,
    pub some_int_val: i32,
    pub some_decimal_val: Decimal,
    pub some_money_val: Decimal,
    pub some_utc_date_time_val: Option<DateTime<Utc>>,
    pub some_email_address: String,
    pub some_phone_number: String,
    pub is_delete_allowed: bool,
    pub is_edit_allowed: bool,
    pub notes: String,
    pub created_utc: DateTime<Utc>,
}

impl SecuredEntity for Plant {
    fn entity_kind(&self) -> &'static str {
        "Plant"
    }

    fn code(&self) -> Uuid {
        self.code
    }

    fn owner_codes(&self) -> OwnerCodes {
        OwnerCodes {
            customer_code: self.customer_code,
            ..OwnerCodes::default()
        }
    }
}

/// Input for adding a plant to a land.
#[derive(Debug, Clone)]
pub struct CreatePlant {
    pub land_code: Uuid,
    pub flavor_code: Uuid,
    pub other_flavor: String,
    pub some_int_val: i32,
    pub some_decimal_val: Decimal,
    pub some_money_val: Decimal,
    pub some_utc_date_time_val: Option<DateTime<Utc>>,
    pub some_email_address: String,
    pub some_phone_number: String,
    pub is_delete_allowed: bool,
    pub is_edit_allowed: bool,
    pub notes: String,
}

impl CreatePlant {
    pub fn into_plant(self, customer_code: Option<Uuid>) -> Plant {
        Plant {
            code: Uuid::new_v4(),
            land_code: self.land_code,
            customer_code,
            flavor_code: self.flavor_code,
            other_flavor: self.other_flavor,
            some_int_val: self.some_int_val,
            some_decimal_val: self.some_decimal_val,
            some_money_val: self.some_money_val,
            some_utc_date_time_val: self.some_utc_date_time_val,
            some_email_address: self.some_email_address,
            some_phone_number: self.some_phone_number,
            is_delete_allowed: self.is_delete_allowed,
            is_edit_allowed: self.is_edit_allowed,
            notes: self.notes,
            created_utc: Utc::now(),
        }
    }
}
