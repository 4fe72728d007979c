//! Form schema engine: validation, normalization and rule evaluation.
//!
//! Raw JSON/JSON5 form schemas are checked against the recognized shape,
//! expanded into a canonical [`FormConfig`], and evaluated field by field
//! against the values a user has typed.

mod config;
mod error;
mod loader;
mod model;
mod normalize;
pub mod presets;
pub mod rules;
mod session;

/// Canonical config types.
pub use config::{FieldConfig, FormConfig, StepConfig, SubmitConfig, ValidationRule};
/// Public error types returned by loading, validation and normalization.
pub use error::{ErrorKind, FormError, StructuralReason};
/// Schema loading entry points.
pub use loader::{parse_form_config, validate};
/// Raw schema input types.
pub use model::*;
pub use normalize::normalize;
/// Rule evaluation entry points.
pub use rules::{
    FieldError, FormValues, RuleOutcome, ValidationReport, evaluate, evaluate_field,
    validate_form, validate_step,
};
/// Explicit per-form session state.
pub use session::{FormSession, FormSubmitter, SessionError, SubmitRequest};
