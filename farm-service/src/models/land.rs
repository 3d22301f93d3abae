//! Land model: owns plants and scopes the add-plant flow and plant list report.

use serde::{Deserialize, Serialize};
use service_core::security::{OwnerCodes, SecuredEntity};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Land {
    pub code: Uuid,
    pub name: String,
    pub pac_code: Uuid,
    /// Unassigned land has no owner and fails every customer-scoped check.
    pub customer_code: Option<Uuid>,
}

impl Land {
    pub fn new(name: impl Into<String>, pac_code: Uuid, customer_code: Option<Uuid>) -> Self {
        Self {
            code: Uuid::new_v4(),
            name: name.into(),
            pac_code,
            customer_code,
        }
    }
}

impl SecuredEntity for Land {
    fn entity_kind(&self) -> &'static str {
        "Land"
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
