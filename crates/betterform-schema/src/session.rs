//! Per-form interaction state over an immutable config.
//!
//! A session owns the values typed so far and the current step of a
//! multi-step flow. It is passed around explicitly; nothing here is global.
//! Submission is delegated to a caller-provided [`FormSubmitter`].

use crate::config::{FieldConfig, FormConfig};
use crate::model::FieldDefault;
use crate::rules::{FormValues, ValidationReport, evaluate_field, validate_form, validate_step};
use log::{debug, warn};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by session navigation and submission.
#[derive(Debug, Error)]
pub enum SessionError {
    /// One or more fields failed validation.
    #[error("{} field(s) failed validation", .0.errors.len())]
    Invalid(ValidationReport),
    /// The submitter failed; details are logged, not shown.
    #[error("Something went wrong. Please try again.")]
    Submit { details: String },
}

/// What a submitter receives when the form is valid.
#[derive(Debug, Clone, Copy)]
pub struct SubmitRequest<'a> {
    pub endpoint: Option<&'a str>,
    pub method: &'a str,
    pub values: &'a FormValues,
}

/// Performs the actual submission (auth provider, HTTP, test double...).
pub trait FormSubmitter {
    fn submit(&mut self, request: SubmitRequest<'_>) -> Result<(), String>;
}

impl<F> FormSubmitter for F
where
    F: FnMut(SubmitRequest<'_>) -> Result<(), String>,
{
    fn submit(&mut self, request: SubmitRequest<'_>) -> Result<(), String> {
        self(request)
    }
}

/// Values, step position and last report for one form on screen.
#[derive(Debug, Clone)]
pub struct FormSession {
    config: Arc<FormConfig>,
    values: FormValues,
    step: usize,
    report: ValidationReport,
}

impl FormSession {
    /// Start a session with values seeded from field defaults.
    pub fn new(config: Arc<FormConfig>) -> Self {
        let values = config
            .fields()
            .iter()
            .map(|field| (field.name().to_string(), initial_value(field)))
            .collect();
        Self {
            config,
            values,
            step: 0,
            report: ValidationReport::default(),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// Store a value and return the field's current failure, if any.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        self.values.insert(name.to_string(), value.into());
        let field = self.config.field(name)?;
        evaluate_field(field, &self.values)
    }

    /// Report from the last `next` or `submit` call.
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Fields on screen: the current step's fields, or all of them.
    pub fn current_fields(&self) -> Vec<&FieldConfig> {
        self.config
            .current_step_fields(self.step)
            .unwrap_or_else(|| self.config.fields().iter().collect())
    }

    pub fn is_last_step(&self) -> bool {
        self.step + 1 >= self.config.steps().len()
    }

    /// Validate the current step and advance when it passes.
    ///
    /// On the last step (or a single-page form) the position does not change.
    pub fn next(&mut self) -> Result<usize, SessionError> {
        let report = validate_step(&self.config, self.step, &self.values)
            .unwrap_or_else(|| validate_form(&self.config, &self.values));
        self.report = report.clone();
        if !report.is_valid() {
            return Err(SessionError::Invalid(report));
        }
        if !self.is_last_step() {
            self.step += 1;
            debug!("advanced to step {}", self.step);
        }
        Ok(self.step)
    }

    /// Go back one step; stays on the first step.
    pub fn back(&mut self) -> usize {
        self.step = self.step.saturating_sub(1);
        self.step
    }

    /// Validate the whole form and hand valid values to the submitter.
    pub fn submit<S: FormSubmitter + ?Sized>(
        &mut self,
        submitter: &mut S,
    ) -> Result<(), SessionError> {
        let report = validate_form(&self.config, &self.values);
        self.report = report.clone();
        if !report.is_valid() {
            return Err(SessionError::Invalid(report));
        }
        let request = SubmitRequest {
            endpoint: self.config.endpoint(),
            method: self.config.method(),
            values: &self.values,
        };
        submitter.submit(request).map_err(|details| {
            warn!("form submission failed: {details}");
            SessionError::Submit { details }
        })
    }
}

fn initial_value(field: &FieldConfig) -> String {
    match field.default_value() {
        Some(value) => value.as_value(),
        None if field.field_type().is_flag() => FieldDefault::Flag(false).as_value(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::signup_form;
    use pretty_assertions::assert_eq;

    fn multi_step() -> Arc<FormConfig> {
        let config = FormConfig::load_from_str(
            r#"{
                fields: [
                    { name: "email", type: "email", validation: { required: true, email: true } },
                    { name: "password", type: "password", validation: { required: true } },
                    { name: "newsletter", type: "toggle", defaultValue: true },
                ],
                steps: [
                    { title: "Account", fields: ["email"] },
                    { title: "Security", fields: ["password", "newsletter"] },
                ],
                submit: "Finish",
            }"#,
        )
        .expect("config");
        Arc::new(config)
    }

    #[test]
    fn seeds_values_from_defaults() {
        let session = FormSession::new(multi_step());
        assert_eq!(session.value("email"), "");
        assert_eq!(session.value("newsletter"), "true");
    }

    #[test]
    fn next_blocks_on_invalid_step() {
        let mut session = FormSession::new(multi_step());
        let err = session.next().unwrap_err();
        let SessionError::Invalid(report) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(report.message_for("email"), Some("email is required."));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(session.current_step(), 0);
    }

    #[test]
    fn next_and_back_move_between_steps() {
        let mut session = FormSession::new(multi_step());
        assert_eq!(session.set_value("email", "a@b.co"), None);
        assert_eq!(session.next().expect("next"), 1);
        assert!(session.is_last_step());
        let names: Vec<_> = session.current_fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["password", "newsletter"]);
        assert_eq!(session.back(), 0);
        assert_eq!(session.back(), 0);
    }

    #[test]
    fn set_value_reports_field_failure() {
        let mut session = FormSession::new(multi_step());
        assert_eq!(
            session.set_value("email", "nope"),
            Some("Please enter a valid email address.".to_string())
        );
    }

    #[test]
    fn submit_skips_submitter_when_invalid() {
        let mut session = FormSession::new(Arc::new(signup_form().expect("preset")));
        let mut calls = 0;
        let mut submitter = |_: SubmitRequest<'_>| {
            calls += 1;
            Ok(())
        };
        let err = session.submit(&mut submitter).unwrap_err();
        assert!(matches!(err, SessionError::Invalid(_)));
        assert_eq!(session.report().errors.len(), 4);
        assert_eq!(calls, 0);
    }

    #[test]
    fn submit_passes_values_to_submitter() {
        let mut session = FormSession::new(Arc::new(signup_form().expect("preset")));
        session.set_value("name", "Ada Lovelace");
        session.set_value("email", "ada@example.com");
        session.set_value("password", "analytical");
        session.set_value("confirmPassword", "analytical");

        let mut seen = None;
        let mut submitter = |request: SubmitRequest<'_>| {
            seen = Some((
                request.endpoint.map(str::to_string),
                request.method.to_string(),
                request.values.get("email").cloned(),
            ));
            Ok(())
        };
        session.submit(&mut submitter).expect("submit");
        assert_eq!(
            seen,
            Some((
                Some("/api/auth/sign-up/email".to_string()),
                "POST".to_string(),
                Some("ada@example.com".to_string())
            ))
        );
        assert!(session.report().is_valid());
    }

    #[test]
    fn submitter_failure_is_generic() {
        let mut session = FormSession::new(Arc::new(signup_form().expect("preset")));
        session.set_value("name", "Ada Lovelace");
        session.set_value("email", "ada@example.com");
        session.set_value("password", "analytical");
        session.set_value("confirmPassword", "analytical");

        let mut submitter = |_: SubmitRequest<'_>| Err("502 bad gateway".to_string());
        let err = session.submit(&mut submitter).unwrap_err();
        assert_eq!(err.to_string(), "Something went wrong. Please try again.");
        assert!(matches!(err, SessionError::Submit { details } if details == "502 bad gateway"));
    }
}
