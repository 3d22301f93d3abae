//! Register a new customer under a tac.

use crate::models::{CreateCustomer, Tac};
use crate::services::FarmStore;
use crate::utils::{hash_password_blocking, Password};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::flow::{FieldRule, Flow, FlowConfig, FlowResult};
use service_core::validation::ValidationErrorCollector;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub const FLOW_NAME: &str = "TacRegister";

/// Role list every self-registered customer starts with.
pub const DEFAULT_ROLE_NAME_CSV: &str = "User";

#[derive(Debug, Clone, Default, Validate)]
pub struct TacRegisterParams {
    #[validate(email(message = "Please enter a valid Email"))]
    pub email: Option<String>,
    pub password: Option<Password>,
    pub confirm_password: Option<Password>,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacRegisterResult {
    pub customer_code: Uuid,
    pub email: String,
    pub user_name: String,
}

impl FlowResult for TacRegisterResult {}

fn provided(password: &Option<Password>) -> bool {
    password.as_ref().is_some_and(|p| !p.is_blank())
}

pub fn flow_config() -> FlowConfig<TacRegisterParams> {
    type P = TacRegisterParams;
    FlowConfig::new()
        .field(
            FieldRule::entry("email", "Email", |p: &P| {
                p.email.as_deref().is_some_and(|e| !e.trim().is_empty())
            })
            .required(true),
        )
        .field(FieldRule::entry("password", "Password", |p: &P| provided(&p.password)).required(true))
        .field(
            FieldRule::entry("confirmPassword", "Confirm Password", |p: &P| {
                provided(&p.confirm_password)
            })
            .required(true),
        )
        .field(
            FieldRule::entry("firstName", "First Name", |p: &P| !p.first_name.trim().is_empty())
                .required(true),
        )
        .field(
            FieldRule::entry("lastName", "Last Name", |p: &P| !p.last_name.trim().is_empty())
                .required(true),
        )
}

pub struct TacRegisterFlow {
    store: Arc<dyn FarmStore>,
    config: FlowConfig<TacRegisterParams>,
}

impl TacRegisterFlow {
    pub fn new(store: Arc<dyn FarmStore>) -> Self {
        Self::with_config(store, flow_config())
    }

    pub fn with_config(store: Arc<dyn FarmStore>, config: FlowConfig<TacRegisterParams>) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl Flow for TacRegisterFlow {
    type Entity = Tac;
    type Params = TacRegisterParams;
    type Output = TacRegisterResult;
    type Error = AppError;

    fn name(&self) -> &'static str {
        FLOW_NAME
    }

    fn config(&self) -> &FlowConfig<Self::Params> {
        &self.config
    }

    async fn validate(
        &self,
        tac: &Tac,
        params: &TacRegisterParams,
        errors: &mut ValidationErrorCollector,
    ) -> Result<(), AppError> {
        if let (Some(password), Some(confirm)) = (&params.password, &params.confirm_password) {
            if password != confirm {
                errors.add("confirmPassword", "Passwords do not match");
            }
        }

        let email = params.email.as_deref().map(str::trim).unwrap_or_default();
        if email.is_empty() {
            return Ok(());
        }

        if let Err(format_errors) = params.validate() {
            errors.add_validator_errors(&format_errors);
        } else if self
            .store
            .find_customer_by_email(tac.code, email)
            .await?
            .is_some()
        {
            errors.add("email", "Email is already registered");
        }
        Ok(())
    }

    async fn run(&self, tac: &mut Tac, params: TacRegisterParams) -> Result<TacRegisterResult, AppError> {
        let password = params.password.ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("Password missing after validation"))
        })?;
        let email = params.email.unwrap_or_default().trim().to_string();
        let password_hash = hash_password_blocking(password).await?;

        let customer = self
            .store
            .insert_customer(CreateCustomer {
                tac_code: tac.code,
                email,
                first_name: params.first_name.trim().to_string(),
                last_name: params.last_name.trim().to_string(),
                password_hash,
                role_name_csv: DEFAULT_ROLE_NAME_CSV.to_string(),
            })
            .await?;

        info!(tac_code = %tac.code, customer_code = %customer.code, "Customer registered");

        Ok(TacRegisterResult {
            customer_code: customer.code,
            user_name: customer.full_name(),
            email: customer.email,
        })
    }
}
