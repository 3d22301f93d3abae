//! Flavor lookup model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Flavor {
    pub code: Uuid,
    pub name: String,
    pub lookup_enum_name: String,
    pub is_active: bool,
}

impl Flavor {
    pub fn new(name: impl Into<String>, lookup_enum_name: impl Into<String>) -> Self {
        Self {
            code: Uuid::new_v4(),
            name: name.into(),
            lookup_enum_name: lookup_enum_name.into(),
            is_active: true,
        }
    }
}
