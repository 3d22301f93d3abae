//! Paginated, security-filtered report assembly.

mod assembler;
mod pagination;

pub use assembler::{ReportAssembler, ReportConfig, ReportError};
pub use pagination::{PaginationGuard, PaginationRequest, ReportRequestValidationError};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;

/// One raw row as handed back by a provider: column name to value.
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// Query side of a report. Sorting and sort-column validity belong here.
#[async_trait]
pub trait RowProvider: Send + Sync {
    type Filter: Send + Sync;
    type Error: Send;

    async fn generate_list(
        &self,
        owning_code: Uuid,
        filter: &Self::Filter,
        pagination: &PaginationRequest,
    ) -> Result<Vec<RawRow>, Self::Error>;
}

#[async_trait]
impl<P> RowProvider for Arc<P>
where
    P: RowProvider + ?Sized,
{
    type Filter = P::Filter;
    type Error = P::Error;

    async fn generate_list(
        &self,
        owning_code: Uuid,
        filter: &Self::Filter,
        pagination: &PaginationRequest,
    ) -> Result<Vec<RawRow>, Self::Error> {
        (**self).generate_list(owning_code, filter, pagination).await
    }
}

/// Typed report row.
///
/// Implementors should use `#[serde(deny_unknown_fields)]` and no field
/// defaults: a row that does not match the item shape is a defect in the
/// provider and must fail rather than be patched up.
pub trait ReportItem: DeserializeOwned + Send {
    fn from_row(row: RawRow) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(row))
    }
}
