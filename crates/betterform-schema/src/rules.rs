//! Rule evaluation against current form values.
//!
//! Failures are data, not errors: callers decide how to show them. Every
//! function here is pure and cheap enough to run on each keystroke.

use crate::config::{FieldConfig, FormConfig, ValidationRule};
use crate::normalize::{EMAIL_MESSAGE, SAME_AS_MESSAGE};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Current form values keyed by field name.
pub type FormValues = HashMap<String, String>;

/// local-part@domain with at least one dot in the domain.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Result of evaluating a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Pass,
    Fail(String),
}

impl RuleOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, RuleOutcome::Pass)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            RuleOutcome::Pass => None,
            RuleOutcome::Fail(message) => Some(message),
        }
    }
}

/// Evaluate one rule for a field value.
pub fn evaluate(rule: &ValidationRule, value: &str, all_values: &FormValues) -> RuleOutcome {
    evaluate_labeled(rule, value, all_values, None)
}

/// Evaluate a rule; `label` names the field in default messages.
fn evaluate_labeled(
    rule: &ValidationRule,
    value: &str,
    all_values: &FormValues,
    label: Option<&str>,
) -> RuleOutcome {
    let passed = match rule {
        ValidationRule::Required { .. } => !value.trim().is_empty(),
        ValidationRule::Email { .. } => value.is_empty() || EMAIL_PATTERN.is_match(value),
        // Unicode scalar values, not bytes or UTF-16 units.
        ValidationRule::MinLength { length, .. } => value.chars().count() >= *length,
        ValidationRule::SameAs { field, .. } => {
            all_values.get(field).map(String::as_str) == Some(value)
        }
    };
    if passed {
        RuleOutcome::Pass
    } else {
        RuleOutcome::Fail(failure_message(rule, label))
    }
}

/// Custom message when non-blank, otherwise the rule's default text.
fn failure_message(rule: &ValidationRule, label: Option<&str>) -> String {
    if let Some(message) = rule.message().filter(|message| !message.trim().is_empty()) {
        return message.to_string();
    }
    match (rule, label) {
        (ValidationRule::Required { .. }, Some(label)) => format!("{label} is required."),
        (ValidationRule::Required { .. }, None) => "This field is required.".to_string(),
        (ValidationRule::MinLength { length, .. }, Some(label)) => {
            format!("{label} must be at least {length} characters.")
        }
        (ValidationRule::MinLength { length, .. }, None) => {
            format!("Must be at least {length} characters.")
        }
        (ValidationRule::Email { .. }, _) => EMAIL_MESSAGE.to_string(),
        (ValidationRule::SameAs { .. }, _) => SAME_AS_MESSAGE.to_string(),
    }
}

/// Evaluate a field's rules in order, stopping at the first failure.
///
/// A field with no entry in `all_values` is treated as empty.
pub fn evaluate_field(field: &FieldConfig, all_values: &FormValues) -> Option<String> {
    let value = all_values.get(field.name()).map(String::as_str).unwrap_or("");
    let label = Some(field.label());
    field
        .rules()
        .iter()
        .find_map(|rule| match evaluate_labeled(rule, value, all_values, label) {
            RuleOutcome::Pass => None,
            RuleOutcome::Fail(message) => Some(message),
        })
}

/// Failure for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// One failure message per failing field, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    fn collect<'a>(
        fields: impl IntoIterator<Item = &'a FieldConfig>,
        all_values: &FormValues,
    ) -> Self {
        let errors = fields
            .into_iter()
            .filter_map(|field| {
                evaluate_field(field, all_values).map(|message| FieldError {
                    field: field.name().to_string(),
                    message,
                })
            })
            .collect();
        Self { errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }
}

/// Evaluate every field of the form independently.
pub fn validate_form(config: &FormConfig, all_values: &FormValues) -> ValidationReport {
    ValidationReport::collect(config.fields(), all_values)
}

/// Evaluate only the fields shown on one step. `None` when out of range.
pub fn validate_step(
    config: &FormConfig,
    step_index: usize,
    all_values: &FormValues,
) -> Option<ValidationReport> {
    let fields = config.current_step_fields(step_index)?;
    Some(ValidationReport::collect(fields, all_values))
}
