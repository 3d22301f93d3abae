//! Customer login under a tac.

use crate::models::Tac;
use crate::services::FarmStore;
use crate::utils::{verify_password_blocking, Password};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::flow::{FieldRule, Flow, FlowConfig, FlowResult};
use service_core::validation::{AggregatedValidationError, ValidationFailure};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub const FLOW_NAME: &str = "TacLogin";
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid Login.";

#[derive(Debug, Clone, Default)]
pub struct TacLoginParams {
    pub email: String,
    pub password: Option<Password>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacLoginResult {
    pub customer_code: Uuid,
    pub email: String,
    pub user_code_value: Uuid,
    pub role_name_csv: String,
    pub last_login_utc: DateTime<Utc>,
}

impl FlowResult for TacLoginResult {}

pub fn flow_config() -> FlowConfig<TacLoginParams> {
    type P = TacLoginParams;
    FlowConfig::new()
        .field(FieldRule::entry("email", "Email", |p: &P| !p.email.trim().is_empty()).required(true))
        .field(
            FieldRule::entry("password", "Password", |p: &P| {
                p.password.as_ref().is_some_and(|pw| !pw.is_blank())
            })
            .required(true),
        )
}

fn invalid_login() -> AppError {
    AppError::FlowValidation(AggregatedValidationError::single(
        ValidationFailure::operation(INVALID_LOGIN_MESSAGE),
    ))
}

pub struct TacLoginFlow {
    store: Arc<dyn FarmStore>,
    config: FlowConfig<TacLoginParams>,
}

impl TacLoginFlow {
    pub fn new(store: Arc<dyn FarmStore>) -> Self {
        Self::with_config(store, flow_config())
    }

    pub fn with_config(store: Arc<dyn FarmStore>, config: FlowConfig<TacLoginParams>) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl Flow for TacLoginFlow {
    type Entity = Tac;
    type Params = TacLoginParams;
    type Output = TacLoginResult;
    type Error = AppError;

    fn name(&self) -> &'static str {
        FLOW_NAME
    }

    fn config(&self) -> &FlowConfig<Self::Params> {
        &self.config
    }

    /// Unknown email, inactive customer and wrong password all fail the same way.
    async fn run(&self, tac: &mut Tac, params: TacLoginParams) -> Result<TacLoginResult, AppError> {
        let password = params.password.ok_or_else(invalid_login)?;

        let Some(customer) = self
            .store
            .find_customer_by_email(tac.code, params.email.trim())
            .await?
        else {
            warn!(tac_code = %tac.code, "Login for unknown email");
            return Err(invalid_login());
        };

        if !customer.is_active
            || !verify_password_blocking(password, customer.password_hash.clone()).await
        {
            warn!(tac_code = %tac.code, customer_code = %customer.code, "Login rejected");
            return Err(invalid_login());
        }

        let now = Utc::now();
        self.store.record_login(customer.code, now).await?;

        info!(tac_code = %tac.code, customer_code = %customer.code, "Customer logged in");

        Ok(TacLoginResult {
            customer_code: customer.code,
            email: customer.email,
            user_code_value: customer.code,
            role_name_csv: customer.role_name_csv,
            last_login_utc: now,
        })
    }
}
