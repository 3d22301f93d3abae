//! Field-keyed validation failure accumulation.
//!
//! A [`ValidationErrorCollector`] lives for exactly one flow or report
//! invocation. Checks record failures into it and nothing is raised until
//! [`ValidationErrorCollector::throw_if_any`] converts the accumulated entries
//! into a single [`AggregatedValidationError`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One problem found while validating an operation.
///
/// An empty `field_key` marks an operation-level failure (authorization and
/// ownership problems); otherwise it is the external camelCase name of the
/// offending parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub field_key: String,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_key: field_key.into(),
            message: message.into(),
        }
    }

    /// Failure that is not tied to a single parameter.
    pub fn operation(message: impl Into<String>) -> Self {
        Self::new(String::new(), message)
    }

    pub fn is_operation_level(&self) -> bool {
        self.field_key.is_empty()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field_key.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field_key, self.message)
        }
    }
}

/// Every failure discovered during one operation, raised at most once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed with {} error(s): {}", .failures.len(), joined(.failures))]
pub struct AggregatedValidationError {
    failures: Vec<ValidationFailure>,
}

impl AggregatedValidationError {
    /// Build an error directly, e.g. for a credential failure detected inside a flow body.
    pub fn single(failure: ValidationFailure) -> Self {
        Self {
            failures: vec![failure],
        }
    }

    /// Failures in insertion order.
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    pub fn message_for(&self, field_key: &str) -> Option<&str> {
        self.failures
            .iter()
            .find(|f| f.field_key == field_key)
            .map(|f| f.message.as_str())
    }

    pub fn contains_key(&self, field_key: &str) -> bool {
        self.message_for(field_key).is_some()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn into_failures(self) -> Vec<ValidationFailure> {
        self.failures
    }
}

fn joined(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Accumulates `(field_key, message)` pairs for a single operation.
///
/// A repeated key replaces the earlier message but keeps the key's original
/// position.
#[derive(Debug, Default)]
pub struct ValidationErrorCollector {
    failures: Vec<ValidationFailure>,
}

impl ValidationErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field_key: impl Into<String>, message: impl Into<String>) {
        self.push(ValidationFailure::new(field_key, message));
    }

    pub fn push(&mut self, failure: ValidationFailure) {
        match self
            .failures
            .iter_mut()
            .find(|existing| existing.field_key == failure.field_key)
        {
            Some(existing) => existing.message = failure.message,
            None => self.failures.push(failure),
        }
    }

    /// Fold `validator` derive output into the collector.
    ///
    /// Struct field names are converted to their external camelCase form. The
    /// error's message is used when present, otherwise its code.
    pub fn add_validator_errors(&mut self, errors: &validator::ValidationErrors) {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        for (field, field_errors) in fields {
            if let Some(first) = field_errors.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                self.add(to_camel_case(field.as_ref()), message);
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    pub fn message_for(&self, field_key: &str) -> Option<&str> {
        self.failures
            .iter()
            .find(|f| f.field_key == field_key)
            .map(|f| f.message.as_str())
    }

    /// Raise everything collected so far as one error.
    ///
    /// Calling this on an empty collector is a no-op, however many times.
    pub fn throw_if_any(&self) -> Result<(), AggregatedValidationError> {
        if self.has_errors() {
            Err(AggregatedValidationError {
                failures: self.failures.clone(),
            })
        } else {
            Ok(())
        }
    }
}

/// `some_int_val` -> `someIntVal`.
pub fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for ch in snake.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
