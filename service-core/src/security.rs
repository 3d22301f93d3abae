//! Role and row-level ownership predicates.
//!
//! Neither check raises: each returns an operation-level
//! [`ValidationFailure`] that the caller routes into its collector so that
//! authorization problems are reported together with field problems.

use crate::validation::ValidationFailure;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Principal acting on behalf of one inbound request.
///
/// Read-only while a flow or report runs; callers may change it between
/// invocations (e.g. granting a role).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    /// Comma-separated role names. Order is irrelevant.
    pub role_name_csv: String,
    /// Customer or org-customer identity used for row-level checks.
    pub principal_code: Uuid,
    /// Correlates log lines of one request with the persistence session.
    pub session_code: Uuid,
}

impl SecurityContext {
    pub fn new(role_name_csv: impl Into<String>, principal_code: Uuid) -> Self {
        Self {
            role_name_csv: role_name_csv.into(),
            principal_code,
            session_code: Uuid::new_v4(),
        }
    }

    pub fn with_session_code(mut self, session_code: Uuid) -> Self {
        self.session_code = session_code;
        self
    }

    /// Role names with surrounding whitespace removed; empty segments skipped.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.role_name_csv
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    pub fn has_role(&self, role_name: &str) -> bool {
        self.roles().any(|r| r == role_name)
    }
}

/// Row-level security switches for one flow or report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLevelSecurityPolicy {
    #[serde(default)]
    pub customer_security_enabled: bool,
    #[serde(default)]
    pub organization_security_enabled: bool,
    #[serde(default)]
    pub org_customer_security_enabled: bool,
}

impl RowLevelSecurityPolicy {
    /// No ownership check.
    pub const NONE: Self = Self {
        customer_security_enabled: false,
        organization_security_enabled: false,
        org_customer_security_enabled: false,
    };

    /// Principal must be the owning customer.
    pub const CUSTOMER: Self = Self {
        customer_security_enabled: true,
        organization_security_enabled: false,
        org_customer_security_enabled: false,
    };

    pub fn customer_code_match_required(&self) -> bool {
        self.customer_security_enabled
            || self.organization_security_enabled
            || self.org_customer_security_enabled
    }
}

/// Ownership chain of an entity as resolved by the business-object layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnerCodes {
    pub customer_code: Option<Uuid>,
    pub organization_code: Option<Uuid>,
    pub org_customer_code: Option<Uuid>,
}

impl OwnerCodes {
    pub fn customer(customer_code: Uuid) -> Self {
        Self {
            customer_code: Some(customer_code),
            ..Self::default()
        }
    }
}

/// The narrow view of a business object the core needs.
pub trait SecuredEntity {
    /// Human-readable kind used in ownership messages, e.g. `"Land"`.
    fn entity_kind(&self) -> &'static str;

    /// Externally visible identifier.
    fn code(&self) -> Uuid;

    fn owner_codes(&self) -> OwnerCodes;
}

/// Stateless evaluator for role and ownership predicates.
pub struct SecurityPredicateEvaluator;

impl SecurityPredicateEvaluator {
    /// Empty `required_role_name` always passes.
    pub fn check_role(ctx: &SecurityContext, required_role_name: &str) -> Option<ValidationFailure> {
        if required_role_name.is_empty() || ctx.has_role(required_role_name) {
            return None;
        }

        Some(ValidationFailure::operation(format!(
            "Unautorized access. {} role not found.",
            required_role_name
        )))
    }

    /// Passes when the policy requires nothing, or when the principal code
    /// matches at least one owner code selected by the enabled flags.
    pub fn check_row_level_ownership<E>(
        ctx: &SecurityContext,
        entity: &E,
        policy: &RowLevelSecurityPolicy,
    ) -> Option<ValidationFailure>
    where
        E: SecuredEntity + ?Sized,
    {
        if !policy.customer_code_match_required() {
            return None;
        }

        let owners = entity.owner_codes();
        let candidates = [
            (policy.customer_security_enabled, owners.customer_code),
            (
                policy.organization_security_enabled,
                owners.organization_code,
            ),
            (
                policy.org_customer_security_enabled,
                owners.org_customer_code,
            ),
        ];

        let matched = candidates
            .iter()
            .filter(|(enabled, _)| *enabled)
            .filter_map(|(_, code)| *code)
            .any(|code| code == ctx.principal_code);

        if matched {
            None
        } else {
            Some(ValidationFailure::operation(format!(
                "Unautorized access.  Invalid {}.",
                entity.entity_kind()
            )))
        }
    }
}
