//! Prometheus metrics for farm-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// Flow executions by flow name and outcome (ok, rejected, error).
pub static FLOW_EXECUTIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "farm_flow_executions_total",
        "Total number of flow executions",
        &["flow", "outcome"]
    )
    .expect("Failed to register flow_executions_total")
});

/// Report requests by report name and outcome.
pub static REPORT_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "farm_report_requests_total",
        "Total number of report requests",
        &["report", "outcome"]
    )
    .expect("Failed to register report_requests_total")
});

/// Store query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "farm_db_query_duration_seconds",
        "Store query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&FLOW_EXECUTIONS_TOTAL);
    Lazy::force(&REPORT_REQUESTS_TOTAL);
    Lazy::force(&DB_QUERY_DURATION);
}

/// Outcome label for a flow or report result.
pub fn outcome_label<T>(result: &Result<T, service_core::error::AppError>) -> &'static str {
    use service_core::error::AppError;
    match result {
        Ok(_) => "ok",
        Err(AppError::FlowValidation(_)) | Err(AppError::ReportRequest(_)) => "rejected",
        Err(_) => "error",
    }
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_core::error::AppError;
    use service_core::validation::AggregatedValidationError;
    use service_core::validation::ValidationFailure;

    #[test]
    fn test_outcome_label() {
        let ok: Result<(), AppError> = Ok(());
        let rejected: Result<(), AppError> = Err(AppError::FlowValidation(
            AggregatedValidationError::single(ValidationFailure::operation("Invalid Login.")),
        ));
        let failed: Result<(), AppError> = Err(AppError::DatabaseError(anyhow::anyhow!("pool closed")));
        assert_eq!(outcome_label(&ok), "ok");
        assert_eq!(outcome_label(&rejected), "rejected");
        assert_eq!(outcome_label(&failed), "error");
    }

    #[test]
    fn test_metrics_exported() {
        init_metrics();
        FLOW_EXECUTIONS_TOTAL
            .with_label_values(&["TacLogin", "ok"])
            .inc();
        assert!(get_metrics().contains("farm_flow_executions_total"));
    }
}
