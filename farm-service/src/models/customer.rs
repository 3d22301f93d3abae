//! Customer model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registered customer of a tac.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub code: Uuid,
    pub tac_code: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub role_name_csv: String,
    pub last_login_utc: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for registering a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomer {
    pub tac_code: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role_name_csv: String,
}

impl CreateCustomer {
    pub fn into_customer(self) -> Customer {
        Customer {
            code: Uuid::new_v4(),
            tac_code: self.tac_code,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            password_hash: self.password_hash,
            is_active: true,
            role_name_csv: self.role_name_csv,
            last_login_utc: None,
            created_utc: Utc::now(),
        }
    }
}
