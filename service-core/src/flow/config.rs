//! Per-flow rule sets.
//!
//! A [`FlowConfig`] replaces module-level "is X required" constants: it is
//! built by the flow's constructor and handed to the executor at call time,
//! so a caller can adjust a copy without touching anything global.

use crate::security::RowLevelSecurityPolicy;
use crate::validation::ValidationErrorCollector;
use std::fmt;

/// How a missing parameter is described to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form input: "Please enter a ...".
    Entry,
    /// Foreign-key or code selector: "Please select a ...".
    Selection,
}

/// Required-ness rule for one flow parameter.
pub struct FieldRule<P> {
    /// External camelCase name, used as the failure key.
    pub name: &'static str,
    /// Label shown in the failure message.
    pub label: &'static str,
    pub kind: FieldKind,
    pub is_required: bool,
    is_provided: fn(&P) -> bool,
}

impl<P> FieldRule<P> {
    pub fn entry(name: &'static str, label: &'static str, is_provided: fn(&P) -> bool) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Entry,
            is_required: false,
            is_provided,
        }
    }

    pub fn selection(name: &'static str, label: &'static str, is_provided: fn(&P) -> bool) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Selection,
            is_required: false,
            is_provided,
        }
    }

    pub fn required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }

    pub fn missing_message(&self) -> String {
        match self.kind {
            FieldKind::Entry => format!("Please enter a {}", self.label),
            FieldKind::Selection => format!("Please select a {}", self.label),
        }
    }

    pub fn is_provided(&self, params: &P) -> bool {
        (self.is_provided)(params)
    }

    /// Record a failure when the field is required and absent.
    pub fn check(&self, params: &P, errors: &mut ValidationErrorCollector) {
        if self.is_required && !self.is_provided(params) {
            errors.add(self.name, self.missing_message());
        }
    }
}

impl<P> Clone for FieldRule<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            label: self.label,
            kind: self.kind,
            is_required: self.is_required,
            is_provided: self.is_provided,
        }
    }
}

impl<P> fmt::Debug for FieldRule<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("is_required", &self.is_required)
            .finish_non_exhaustive()
    }
}

/// Everything the executor needs to know about a flow besides its body.
pub struct FlowConfig<P> {
    /// Empty means no role is required.
    pub required_role: String,
    pub row_level: RowLevelSecurityPolicy,
    pub fields: Vec<FieldRule<P>>,
}

impl<P> FlowConfig<P> {
    pub fn new() -> Self {
        Self {
            required_role: String::new(),
            row_level: RowLevelSecurityPolicy::NONE,
            fields: Vec::new(),
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

    pub fn field(mut self, rule: FieldRule<P>) -> Self {
        self.fields.push(rule);
        self
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule<P>> {
        self.fields.iter().find(|r| r.name == name)
    }

    /// Toggle a field's required flag. Returns false if no such field exists.
    pub fn set_required(&mut self, name: &str, is_required: bool) -> bool {
        match self.fields.iter_mut().find(|r| r.name == name) {
            Some(rule) => {
                rule.is_required = is_required;
                true
            }
            None => false,
        }
    }

    pub fn check_fields(&self, params: &P, errors: &mut ValidationErrorCollector) {
        for rule in &self.fields {
            rule.check(params, errors);
        }
    }
}

impl<P> Default for FlowConfig<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for FlowConfig<P> {
    fn clone(&self) -> Self {
        Self {
            required_role: self.required_role.clone(),
            row_level: self.row_level,
            fields: self.fields.clone(),
        }
    }
}

impl<P> fmt::Debug for FlowConfig<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowConfig")
            .field("required_role", &self.required_role)
            .field("row_level", &self.row_level)
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Params {
        email: String,
        flavor_code: Option<uuid::Uuid>,
    }

    fn config() -> FlowConfig<Params> {
        FlowConfig::new()
            .field(FieldRule::entry("email", "Email", |p: &Params| !p.email.is_empty()).required(true))
            .field(
                FieldRule::selection("flavorCode", "Flavor", |p: &Params| p.flavor_code.is_some())
                    .required(true),
            )
    }

    #[test]
    fn test_missing_entry_and_selection_messages() {
        let params = Params {
            email: String::new(),
            flavor_code: None,
        };
        let mut errors = ValidationErrorCollector::new();
        config().check_fields(&params, &mut errors);

        assert_eq!(errors.message_for("email"), Some("Please enter a Email"));
        assert_eq!(errors.message_for("flavorCode"), Some("Please select a Flavor"));
    }

    #[test]
    fn test_optional_field_is_not_checked() {
        let mut config = config();
        assert!(config.set_required("email", false));

        let params = Params {
            email: String::new(),
            flavor_code: Some(uuid::Uuid::new_v4()),
        };
        let mut errors = ValidationErrorCollector::new();
        config.check_fields(&params, &mut errors);
        assert!(!errors.has_errors());
    }

    #[test]
    fn test_set_required_unknown_field() {
        let mut config = config();
        assert!(!config.set_required("noSuchField", true));
    }
}
