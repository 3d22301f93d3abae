use super::{PaginationGuard, PaginationRequest, ReportItem, ReportRequestValidationError, RowProvider};
use crate::security::{
    RowLevelSecurityPolicy, SecuredEntity, SecurityContext, SecurityPredicateEvaluator,
};
use crate::validation::{AggregatedValidationError, ValidationErrorCollector};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Access rules for one report. Reports are read-only and usually leave
/// `required_role` empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub name: &'static str,
    pub required_role: String,
    pub row_level: RowLevelSecurityPolicy,
}

impl ReportConfig {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            required_role: String::new(),
            row_level: RowLevelSecurityPolicy::NONE,
        }
    }

    pub fn with_required_role(mut self, role: impl Into<String>) -> Self {
        self.required_role = role.into();
        self
    }

    pub fn with_row_level(mut self, policy: RowLevelSecurityPolicy) -> Self {
        self.row_level = policy;
        self
    }
}

#[derive(Debug, Error)]
pub enum ReportError<E> {
    /// Pagination rejected before the provider was called.
    #[error("{0}")]
    InvalidRequest(#[from] ReportRequestValidationError),
    /// Role or ownership check failed.
    #[error("{0}")]
    Rejected(#[from] AggregatedValidationError),
    /// Raised by the row provider, passed through as-is.
    #[error("{0}")]
    Provider(#[source] E),
    /// A provider row did not match the report item shape.
    #[error("Report row {row_index} could not be mapped: {source}")]
    RowMapping {
        row_index: usize,
        source: serde_json::Error,
    },
}

/// Guards, authorizes, queries and maps one report.
pub struct ReportAssembler<P> {
    provider: P,
    config: ReportConfig,
}

impl<P: RowProvider> ReportAssembler<P> {
    pub fn new(provider: P, config: ReportConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Rows come back in the provider's order; nothing is re-sorted here.
    #[instrument(
        skip_all,
        fields(
            report = self.config.name,
            owning_code = %owner.code(),
            session_code = %ctx.session_code,
            page_number = pagination.page_number,
            item_count_per_page = pagination.item_count_per_page
        )
    )]
    pub async fn generate<T, O>(
        &self,
        ctx: &SecurityContext,
        owner: &O,
        filter: &P::Filter,
        pagination: &PaginationRequest,
    ) -> Result<Vec<T>, ReportError<P::Error>>
    where
        T: ReportItem,
        O: SecuredEntity + Sync + ?Sized,
    {
        PaginationGuard::validate_request(pagination).inspect_err(|err| {
            warn!(error = %err, "Report request rejected");
        })?;

        self.authorize(ctx, owner).throw_if_any().inspect_err(|err| {
            warn!(failure_count = err.len(), "Report access rejected");
        })?;

        let rows = self
            .provider
            .generate_list(owner.code(), filter, pagination)
            .await
            .map_err(ReportError::Provider)?;

        debug!(row_count = rows.len(), "Mapping report rows");

        rows.into_iter()
            .enumerate()
            .map(|(row_index, row)| {
                T::from_row(row).map_err(|source| ReportError::RowMapping { row_index, source })
            })
            .collect()
    }

    fn authorize<O>(&self, ctx: &SecurityContext, owner: &O) -> ValidationErrorCollector
    where
        O: SecuredEntity + ?Sized,
    {
        let mut errors = ValidationErrorCollector::new();
        match SecurityPredicateEvaluator::check_role(ctx, &self.config.required_role) {
            Some(failure) => errors.push(failure),
            None => {
                if let Some(failure) = SecurityPredicateEvaluator::check_row_level_ownership(
                    ctx,
                    owner,
                    &self.config.row_level,
                ) {
                    errors.push(failure);
                }
            }
        }
        errors
    }
}
