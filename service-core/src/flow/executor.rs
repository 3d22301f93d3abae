use super::Flow;
use crate::security::{SecurityContext, SecurityPredicateEvaluator};
use crate::validation::{AggregatedValidationError, ValidationErrorCollector};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Outcome of a flow that did not complete.
#[derive(Debug, Error)]
pub enum FlowError<E> {
    /// Validation or authorization failed; the body never ran.
    #[error("{0}")]
    Rejected(#[from] AggregatedValidationError),
    /// Raised by the flow itself (validate hook or body), passed through as-is.
    #[error("{0}")]
    Operation(#[source] E),
}

impl<E> FlowError<E> {
    pub fn rejection(&self) -> Option<&AggregatedValidationError> {
        match self {
            FlowError::Rejected(err) => Some(err),
            FlowError::Operation(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, FlowError::Rejected(_))
    }
}

/// Runs flows for one principal.
///
/// `Start -> ValidateFields -> ValidateSecurity -> Aggregate -> ExecuteBody -> Done`,
/// with `Rejected` as the only failure exit before the body. Every call uses
/// a fresh collector, so failures never leak between invocations.
#[derive(Debug, Clone, Copy)]
pub struct FlowExecutor<'a> {
    ctx: &'a SecurityContext,
}

impl<'a> FlowExecutor<'a> {
    pub fn new(ctx: &'a SecurityContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &SecurityContext {
        self.ctx
    }

    #[instrument(
        skip_all,
        fields(flow = flow.name(), session_code = %self.ctx.session_code)
    )]
    pub async fn execute<F: Flow>(
        &self,
        flow: &F,
        entity: &mut F::Entity,
        params: F::Params,
    ) -> Result<F::Output, FlowError<F::Error>> {
        let errors = self.collect_failures(flow, entity, &params).await?;

        if let Err(rejection) = errors.throw_if_any() {
            warn!(failure_count = rejection.len(), "Flow rejected");
            return Err(FlowError::Rejected(rejection));
        }

        debug!("Validation passed, running flow body");
        flow.run(entity, params).await.map_err(FlowError::Operation)
    }

    /// Field rules, the flow's own checks, then role and ownership.
    /// Nothing is raised here; backend errors from the validate hook excepted.
    async fn collect_failures<F: Flow>(
        &self,
        flow: &F,
        entity: &F::Entity,
        params: &F::Params,
    ) -> Result<ValidationErrorCollector, FlowError<F::Error>> {
        let config = flow.config();
        let mut errors = ValidationErrorCollector::new();

        config.check_fields(params, &mut errors);

        flow.validate(entity, params, &mut errors)
            .await
            .map_err(FlowError::Operation)?;

        match SecurityPredicateEvaluator::check_role(self.ctx, &config.required_role) {
            Some(failure) => errors.push(failure),
            None => {
                if let Some(failure) = SecurityPredicateEvaluator::check_row_level_ownership(
                    self.ctx,
                    entity,
                    &config.row_level,
                ) {
                    errors.push(failure);
                }
            }
        }

        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{FieldRule, FlowConfig, FlowResult};
    use crate::security::{OwnerCodes, RowLevelSecurityPolicy, SecuredEntity};
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct Land {
        code: Uuid,
        customer_code: Uuid,
        plant_count: usize,
    }

    impl SecuredEntity for Land {
        fn entity_kind(&self) -> &'static str {
            "Land"
        }

        fn code(&self) -> Uuid {
            self.code
        }

        fn owner_codes(&self) -> OwnerCodes {
            OwnerCodes::customer(self.customer_code)
        }
    }

    #[derive(Default)]
    struct AddPlantParams {
        flavor_code: Option<Uuid>,
        some_int_val: Option<i32>,
        notes: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct AddPlantResult {
        land_code: Uuid,
        plant_count: usize,
    }

    impl FlowResult for AddPlantResult {}

    #[derive(Debug, thiserror::Error)]
    #[error("store unavailable")]
    struct StoreDown;

    struct AddPlant {
        config: FlowConfig<AddPlantParams>,
        body_calls: AtomicUsize,
        fail_body: bool,
    }

    impl AddPlant {
        fn new(config: FlowConfig<AddPlantParams>) -> Self {
            Self {
                config,
                body_calls: AtomicUsize::new(0),
                fail_body: false,
            }
        }
    }

    fn default_config() -> FlowConfig<AddPlantParams> {
        FlowConfig::new()
            .with_row_level(RowLevelSecurityPolicy::CUSTOMER)
            .field(
                FieldRule::selection("flavorCode", "Flavor", |p: &AddPlantParams| {
                    p.flavor_code.is_some()
                })
                .required(true),
            )
            .field(
                FieldRule::entry("someIntVal", "Some Int Val", |p: &AddPlantParams| {
                    p.some_int_val.is_some()
                })
                .required(true),
            )
            .field(FieldRule::entry("notes", "Notes", |p: &AddPlantParams| {
                !p.notes.is_empty()
            }))
    }

    #[async_trait]
    impl Flow for AddPlant {
        type Entity = Land;
        type Params = AddPlantParams;
        type Output = AddPlantResult;
        type Error = StoreDown;

        fn name(&self) -> &'static str {
            "LandAddPlant"
        }

        fn config(&self) -> &FlowConfig<AddPlantParams> {
            &self.config
        }

        async fn run(
            &self,
            entity: &mut Land,
            _params: AddPlantParams,
        ) -> Result<AddPlantResult, StoreDown> {
            self.body_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_body {
                return Err(StoreDown);
            }
            entity.plant_count += 1;
            Ok(AddPlantResult {
                land_code: entity.code,
                plant_count: entity.plant_count,
            })
        }
    }

    fn land_for(customer_code: Uuid) -> Land {
        Land {
            code: Uuid::new_v4(),
            customer_code,
            plant_count: 0,
        }
    }

    fn valid_params() -> AddPlantParams {
        AddPlantParams {
            flavor_code: Some(Uuid::new_v4()),
            some_int_val: Some(7),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_valid_request_runs_body_once() {
        let customer = Uuid::new_v4();
        let ctx = SecurityContext::new("", customer);
        let flow = AddPlant::new(default_config());
        let mut land = land_for(customer);

        let result = FlowExecutor::new(&ctx)
            .execute(&flow, &mut land, valid_params())
            .await
            .unwrap();

        assert_eq!(result.land_code, land.code);
        assert_eq!(result.plant_count, 1);
        assert_eq!(flow.body_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_each_missing_required_field_is_reported() {
        let customer = Uuid::new_v4();
        let ctx = SecurityContext::new("", customer);
        let flow = AddPlant::new(default_config());
        let mut land = land_for(customer);

        let err = FlowExecutor::new(&ctx)
            .execute(&flow, &mut land, AddPlantParams::default())
            .await
            .unwrap_err();

        let rejection = err.rejection().unwrap();
        assert_eq!(rejection.len(), 2);
        assert_eq!(rejection.message_for("flavorCode"), Some("Please select a Flavor"));
        assert_eq!(rejection.message_for("someIntVal"), Some("Please enter a Some Int Val"));
        assert_eq!(flow.body_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_role_rejects_and_skips_body() {
        let customer = Uuid::new_v4();
        let ctx = SecurityContext::new("User", customer);
        let flow = AddPlant::new(default_config().with_required_role("Admin"));
        let mut land = land_for(customer);

        let err = FlowExecutor::new(&ctx)
            .execute(&flow, &mut land, valid_params())
            .await
            .unwrap_err();

        assert_eq!(
            err.rejection().unwrap().message_for(""),
            Some("Unautorized access. Admin role not found.")
        );
        assert_eq!(flow.body_calls.load(Ordering::SeqCst), 0);
        assert_eq!(land.plant_count, 0);
    }

    #[tokio::test]
    async fn test_ownership_mismatch_is_aggregated_with_field_failures() {
        let ctx = SecurityContext::new("", Uuid::new_v4());
        let flow = AddPlant::new(default_config());
        let mut land = land_for(Uuid::new_v4());

        let err = FlowExecutor::new(&ctx)
            .execute(&flow, &mut land, AddPlantParams::default())
            .await
            .unwrap_err();

        let rejection = err.rejection().unwrap();
        assert_eq!(rejection.len(), 3);
        assert_eq!(
            rejection.message_for(""),
            Some("Unautorized access.  Invalid Land.")
        );
        assert_eq!(flow.body_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ownership_not_checked_when_role_fails() {
        let ctx = SecurityContext::new("", Uuid::new_v4());
        let flow = AddPlant::new(default_config().with_required_role("Admin"));
        let mut land = land_for(Uuid::new_v4());

        let err = FlowExecutor::new(&ctx)
            .execute(&flow, &mut land, valid_params())
            .await
            .unwrap_err();

        let rejection = err.rejection().unwrap();
        assert_eq!(rejection.len(), 1);
        assert_eq!(
            rejection.message_for(""),
            Some("Unautorized access. Admin role not found.")
        );
    }

    #[tokio::test]
    async fn test_role_granted_between_invocations() {
        let customer = Uuid::new_v4();
        let mut ctx = SecurityContext::new("", customer);
        let flow = AddPlant::new(default_config().with_required_role("Admin"));
        let mut land = land_for(customer);

        let first = FlowExecutor::new(&ctx)
            .execute(&flow, &mut land, valid_params())
            .await;
        assert!(first.unwrap_err().is_rejected());

        ctx.role_name_csv = "User,Admin".to_string();
        let second = FlowExecutor::new(&ctx)
            .execute(&flow, &mut land, valid_params())
            .await;
        assert!(second.is_ok());
        assert_eq!(flow.body_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_body_error_propagates_unchanged() {
        let customer = Uuid::new_v4();
        let ctx = SecurityContext::new("", customer);
        let mut flow = AddPlant::new(default_config());
        flow.fail_body = true;
        let mut land = land_for(customer);

        let err = FlowExecutor::new(&ctx)
            .execute(&flow, &mut land, valid_params())
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::Operation(StoreDown)));
        assert_eq!(err.to_string(), "store unavailable");
        let cause = std::error::Error::source(&err).expect("Operation error keeps its cause");
        assert_eq!(cause.to_string(), "store unavailable");
    }
}
