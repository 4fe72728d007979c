//! Canonical form configuration produced by normalization.
//!
//! A [`FormConfig`] is read-only: fields are private and only reachable
//! through accessors. Producing a different config means parsing again.

use crate::model::{
    EmailParam, FieldDefault, FieldDescriptor, FieldType, Footer, FormKind, FormSchemaInput,
    MinLengthParam, RequiredParam, RuleInput, SameAsParam, StepDescriptor, SubmitInput,
    ValidationInput,
};
use serde::{Deserialize, Serialize};

/// Fully resolved form configuration consumed by renderers and the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    #[serde(rename = "type")]
    pub(crate) kind: FormKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) endpoint: Option<String>,
    pub(crate) method: String,
    pub(crate) fields: Vec<FieldConfig>,
    pub(crate) submit: SubmitConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) footer: Option<Footer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) steps: Vec<StepConfig>,
}

impl FormConfig {
    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldConfig] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn submit(&self) -> &SubmitConfig {
        &self.submit
    }

    pub fn footer(&self) -> Option<&Footer> {
        self.footer.as_ref()
    }

    pub fn steps(&self) -> &[StepConfig] {
        &self.steps
    }

    pub fn step(&self, step_index: usize) -> Option<&StepConfig> {
        self.steps.get(step_index)
    }

    pub fn is_multi_step(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Fields shown on the given step, in the order the step lists them.
    ///
    /// Returns `None` when the index is out of range; range checks belong to
    /// the caller.
    pub fn current_step_fields(&self, step_index: usize) -> Option<Vec<&FieldConfig>> {
        let step = self.steps.get(step_index)?;
        Some(
            step.field_indices
                .iter()
                .map(|&idx| &self.fields[idx])
                .collect(),
        )
    }

    /// Convert back into schema input so the config can be normalized again.
    pub fn to_input(&self) -> FormSchemaInput {
        FormSchemaInput {
            kind: Some(self.kind),
            title: self.title.clone(),
            description: self.description.clone(),
            endpoint: self.endpoint.clone(),
            method: Some(self.method.clone()),
            fields: self.fields.iter().map(FieldConfig::to_descriptor).collect(),
            submit: Some(SubmitInput::Detailed {
                label: self.submit.label.clone(),
                loading_text: Some(self.submit.loading_text.clone()),
            }),
            footer: self.footer.clone(),
            steps: if self.steps.is_empty() {
                None
            } else {
                Some(self.steps.iter().map(StepConfig::to_descriptor).collect())
            },
        }
    }
}

/// A field with defaults filled and rules resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) field_type: FieldType,
    pub(crate) label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    pub(crate) is_password: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) default_value: Option<FieldDefault>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) auto_complete: Option<String>,
    pub(crate) rules: Vec<ValidationRule>,
}

impl FieldConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_password(&self) -> bool {
        self.is_password
    }

    pub fn default_value(&self) -> Option<&FieldDefault> {
        self.default_value.as_ref()
    }

    pub fn auto_complete(&self) -> Option<&str> {
        self.auto_complete.as_deref()
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// Whether the renderer should mark the field as mandatory.
    pub fn is_required(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| matches!(rule, ValidationRule::Required { .. }))
    }

    fn to_descriptor(&self) -> FieldDescriptor {
        let rules = self.rules.iter().map(ValidationRule::to_input).collect();
        FieldDescriptor {
            name: self.name.clone(),
            field_type: self.field_type,
            label: Some(self.label.clone()),
            placeholder: self.placeholder.clone(),
            description: self.description.clone(),
            is_password: Some(self.is_password),
            default_value: self.default_value.clone(),
            auto_complete: self.auto_complete.clone(),
            required: None,
            validation: ValidationInput(rules),
        }
    }
}

/// A single canonical validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum ValidationRule {
    Required {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Email {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    MinLength {
        length: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    SameAs {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl ValidationRule {
    pub fn required() -> Self {
        ValidationRule::Required { message: None }
    }

    pub fn email() -> Self {
        ValidationRule::Email { message: None }
    }

    pub fn min_length(length: usize) -> Self {
        ValidationRule::MinLength {
            length,
            message: None,
        }
    }

    pub fn same_as(field: impl Into<String>) -> Self {
        ValidationRule::SameAs {
            field: field.into(),
            message: None,
        }
    }

    /// Replace the custom error message.
    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        let slot = match &mut self {
            ValidationRule::Required { message }
            | ValidationRule::Email { message }
            | ValidationRule::MinLength { message, .. }
            | ValidationRule::SameAs { message, .. } => message,
        };
        *slot = Some(text.into());
        self
    }

    /// Custom error message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationRule::Required { message }
            | ValidationRule::Email { message }
            | ValidationRule::MinLength { message, .. }
            | ValidationRule::SameAs { message, .. } => message.as_deref(),
        }
    }

    /// Rule name as written in schema input.
    pub fn name(&self) -> &'static str {
        match self {
            ValidationRule::Required { .. } => "required",
            ValidationRule::Email { .. } => "email",
            ValidationRule::MinLength { .. } => "minLength",
            ValidationRule::SameAs { .. } => "sameAs",
        }
    }

    fn to_input(&self) -> RuleInput {
        match self {
            ValidationRule::Required { message } => match message {
                Some(text) => RuleInput::Required(RequiredParam::Message(text.clone())),
                None => RuleInput::Required(RequiredParam::Flag(true)),
            },
            ValidationRule::Email { message } => match message {
                Some(_) => RuleInput::Email(EmailParam::Detailed {
                    message: message.clone(),
                }),
                None => RuleInput::Email(EmailParam::Flag(true)),
            },
            ValidationRule::MinLength { length, message } => {
                RuleInput::MinLength(MinLengthParam::Detailed {
                    value: *length,
                    message: message.clone(),
                })
            }
            ValidationRule::SameAs { field, message } => {
                RuleInput::SameAs(SameAsParam::Detailed {
                    field: field.clone(),
                    message: message.clone(),
                })
            }
        }
    }
}

/// Submit button wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitConfig {
    pub label: String,
    pub loading_text: String,
}

/// A step with resolved field membership and navigation labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) progress_label: Option<String>,
    pub(crate) fields: Vec<String>,
    pub(crate) previous_label: String,
    pub(crate) next_label: String,
    #[serde(skip)]
    pub(crate) field_indices: Vec<usize>,
}

impl StepConfig {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn progress_label(&self) -> Option<&str> {
        self.progress_label.as_deref()
    }

    /// Field names in display order.
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    pub fn previous_label(&self) -> &str {
        &self.previous_label
    }

    pub fn next_label(&self) -> &str {
        &self.next_label
    }

    fn to_descriptor(&self) -> StepDescriptor {
        StepDescriptor {
            title: self.title.clone(),
            description: self.description.clone(),
            progress_label: self.progress_label.clone(),
            fields: self.fields.clone(),
            previous_label: Some(self.previous_label.clone()),
            next_label: Some(self.next_label.clone()),
        }
    }
}
