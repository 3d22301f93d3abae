//! Business operations ("flows") run under validate, secure, then execute.

mod config;
mod executor;

pub use config::{FieldKind, FieldRule, FlowConfig};
pub use executor::{FlowError, FlowExecutor};

use crate::security::SecuredEntity;
use crate::validation::ValidationErrorCollector;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// One business use case.
///
/// `validate` may add format, cross-field or uniqueness failures to the
/// collector; it must not write. `run` is the only place persistence happens
/// and is never reached when any failure was collected.
#[async_trait]
pub trait Flow: Send + Sync {
    type Entity: SecuredEntity + Send + Sync;
    type Params: Send + Sync;
    type Output: FlowResult + Send;
    type Error: Send;

    fn name(&self) -> &'static str;

    fn config(&self) -> &FlowConfig<Self::Params>;

    async fn validate(
        &self,
        _entity: &Self::Entity,
        _params: &Self::Params,
        _errors: &mut ValidationErrorCollector,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn run(
        &self,
        entity: &mut Self::Entity,
        params: Self::Params,
    ) -> Result<Self::Output, Self::Error>;
}

/// Output record of a completed flow.
///
/// The canonical JSON form uses snake_case keys, RFC-4122 strings for UUIDs,
/// RFC 3339 for datetimes and strings for decimals, which is what the serde
/// impls of `uuid`, `chrono` and `rust_decimal` produce.
pub trait FlowResult: Serialize + DeserializeOwned {
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use serde::Deserialize;
    use std::str::FromStr;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct IssuedCodes {
        plant_code: Uuid,
        issued_utc: DateTime<Utc>,
        some_money_val: Decimal,
        is_active: bool,
    }

    impl FlowResult for IssuedCodes {}

    fn sample() -> IssuedCodes {
        IssuedCodes {
            plant_code: Uuid::new_v4(),
            issued_utc: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            some_money_val: Decimal::from_str("1234.5600").unwrap(),
            is_active: true,
        }
    }

    #[test]
    fn test_to_json_uses_canonical_types() {
        let result = sample();
        let json = result.to_json().unwrap();

        assert_eq!(json["plant_code"], result.plant_code.to_string());
        assert_eq!(json["issued_utc"], "2024-03-01T12:30:00Z");
        assert_eq!(json["some_money_val"], "1234.5600");
        assert_eq!(json["is_active"], true);
    }

    #[test]
    fn test_json_round_trip_preserves_values() {
        let result = sample();
        let parsed = IssuedCodes::from_json(result.to_json().unwrap()).unwrap();
        assert_eq!(parsed, result);
        assert_eq!(parsed.some_money_val.scale(), 4);
    }
}
