use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page window and ordering requested by a report caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationRequest {
    pub page_number: i64,
    pub item_count_per_page: i64,
    /// Empty means the provider's default order.
    #[serde(default)]
    pub order_by_column_name: String,
    #[serde(default)]
    pub order_by_descending: bool,
}

impl PaginationRequest {
    pub fn new(page_number: i64, item_count_per_page: i64) -> Self {
        Self {
            page_number,
            item_count_per_page,
            order_by_column_name: String::new(),
            order_by_descending: false,
        }
    }

    pub fn ordered_by(mut self, column_name: impl Into<String>, descending: bool) -> Self {
        self.order_by_column_name = column_name.into();
        self.order_by_descending = descending;
        self
    }

    /// Rows to skip. Saturates at `i64::MAX`, so a page past the end is empty
    /// rather than wrapping back to an earlier window.
    pub fn offset(&self) -> i64 {
        self.page_number
            .saturating_sub(1)
            .max(0)
            .saturating_mul(self.item_count_per_page.max(0))
    }

    pub fn limit(&self) -> i64 {
        self.item_count_per_page
    }
}

/// Client-input error for a report request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportRequestValidationError {
    #[error("Invalid page number {0}: page number must be at least 1")]
    PageNumber(i64),

    #[error("Invalid item count per page {0}: item count per page must be at least 1")]
    ItemCountPerPage(i64),
}

/// Fail-fast check that runs before any report query.
pub struct PaginationGuard;

impl PaginationGuard {
    pub fn validate(
        page_number: i64,
        item_count_per_page: i64,
    ) -> Result<(), ReportRequestValidationError> {
        if page_number < 1 {
            return Err(ReportRequestValidationError::PageNumber(page_number));
        }
        if item_count_per_page < 1 {
            return Err(ReportRequestValidationError::ItemCountPerPage(
                item_count_per_page,
            ));
        }
        Ok(())
    }

    pub fn validate_request(request: &PaginationRequest) -> Result<(), ReportRequestValidationError> {
        Self::validate(request.page_number, request.item_count_per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_window_is_accepted() {
        assert!(PaginationGuard::validate(1, 1).is_ok());
    }

    #[test]
    fn test_zero_page_number_rejected() {
        assert_eq!(
            PaginationGuard::validate(0, 10),
            Err(ReportRequestValidationError::PageNumber(0))
        );
    }

    #[test]
    fn test_zero_item_count_rejected() {
        assert_eq!(
            PaginationGuard::validate(1, 0),
            Err(ReportRequestValidationError::ItemCountPerPage(0))
        );
    }

    #[test]
    fn test_negative_values_rejected() {
        assert!(PaginationGuard::validate(-3, 10).is_err());
        assert!(PaginationGuard::validate(2, -1).is_err());
    }

    #[test]
    fn test_page_number_checked_first() {
        assert_eq!(
            PaginationGuard::validate(0, 0),
            Err(ReportRequestValidationError::PageNumber(0))
        );
    }

    #[test]
    fn test_offset() {
        assert_eq!(PaginationRequest::new(1, 10).offset(), 0);
        assert_eq!(PaginationRequest::new(3, 25).offset(), 50);
    }

    #[test]
    fn test_offset_saturates_for_huge_page_number() {
        let request = PaginationRequest::new(i64::MAX, 500);
        assert!(PaginationGuard::validate_request(&request).is_ok());
        assert_eq!(request.offset(), i64::MAX);
        assert_eq!(PaginationRequest::new(i64::MAX - 1, 10).offset(), i64::MAX);
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let request: PaginationRequest =
            serde_json::from_str(r#"{"pageNumber":2,"itemCountPerPage":5}"#).unwrap();
        assert_eq!(request, PaginationRequest::new(2, 5));
    }
}
