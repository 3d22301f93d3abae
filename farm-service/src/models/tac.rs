//! Tac model: the tenant a customer registers and logs in under.

use serde::{Deserialize, Serialize};
use service_core::security::{OwnerCodes, SecuredEntity};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tac {
    pub code: Uuid,
    pub name: String,
    pub pac_code: Uuid,
}

impl Tac {
    pub fn new(name: impl Into<String>, pac_code: Uuid) -> Self {
        Self {
            code: Uuid::new_v4(),
            name: name.into(),
            pac_code,
        }
    }
}

/// Anonymous flows run against a tac, so it has no owning customer.
impl SecuredEntity for Tac {
    fn entity_kind(&self) -> &'static str {
        "Tac"
    }

    fn code(&self) -> Uuid {
        self.code
    }

    fn owner_codes(&self) -> OwnerCodes {
        OwnerCodes::default()
    }
}
