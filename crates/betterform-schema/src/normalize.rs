//! Expansion of schema shorthand into a canonical [`FormConfig`].
//!
//! Normalization is a pure function of its input: field order and rule
//! declaration order are kept, defaults are written out explicitly, and every
//! reference to another field is resolved or rejected.

use crate::config::{FieldConfig, FormConfig, StepConfig, SubmitConfig, ValidationRule};
use crate::error::{FormError, StructuralReason};
use crate::model::{
    EmailParam, FieldDescriptor, FieldType, FormKind, FormSchemaInput, MinLengthParam,
    RequiredParam, RuleInput, SameAsParam, StepDescriptor, SubmitInput,
};
use log::debug;
use std::collections::HashMap;

const DEFAULT_METHOD: &str = "POST";
const DEFAULT_SUBMIT_LABEL: &str = "Submit";
const DEFAULT_PREVIOUS_LABEL: &str = "Back";
const DEFAULT_NEXT_LABEL: &str = "Next";
pub(crate) const EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub(crate) const SAME_AS_MESSAGE: &str = "Fields do not match.";

/// Normalize a checked schema into a canonical config.
///
/// Fails with `dangling-reference` when a step or `sameAs` rule names a
/// missing field, and with `duplicate-name` when two fields share a name.
pub fn normalize(input: FormSchemaInput) -> Result<FormConfig, FormError> {
    let FormSchemaInput {
        kind,
        title,
        description,
        endpoint,
        method,
        fields,
        submit,
        footer,
        steps,
    } = input;

    let kind = kind.unwrap_or_default();
    let index = field_index(&fields)?;
    let fields = fields
        .into_iter()
        .enumerate()
        .map(|(idx, field)| normalize_field(field, idx, &index))
        .collect::<Result<Vec<_>, _>>()?;
    let submit = normalize_submit(submit, kind);
    let steps = match steps {
        Some(steps) => normalize_steps(steps, &index, &submit)?,
        None => Vec::new(),
    };

    debug!(
        "normalized form config (kind={:?}, fields={}, steps={})",
        kind,
        fields.len(),
        steps.len()
    );
    Ok(FormConfig {
        kind,
        title,
        description,
        endpoint,
        method: method.unwrap_or_else(|| DEFAULT_METHOD.to_string()),
        fields,
        submit,
        footer,
        steps,
    })
}

/// Map each field name to its position, rejecting duplicates.
fn field_index(fields: &[FieldDescriptor]) -> Result<HashMap<String, usize>, FormError> {
    let mut index = HashMap::with_capacity(fields.len());
    for (idx, field) in fields.iter().enumerate() {
        if index.insert(field.name.clone(), idx).is_some() {
            return Err(FormError::structural(
                &format!("fields[{idx}].name"),
                StructuralReason::DuplicateName,
                &format!("field name `{}` is already used", field.name),
            ));
        }
    }
    Ok(index)
}

fn normalize_field(
    field: FieldDescriptor,
    idx: usize,
    index: &HashMap<String, usize>,
) -> Result<FieldConfig, FormError> {
    let FieldDescriptor {
        name,
        field_type,
        label,
        placeholder,
        description,
        is_password,
        default_value,
        auto_complete,
        required,
        validation,
    } = field;

    let label = label.unwrap_or_else(|| name.clone());
    let path = format!("fields[{idx}].validation");
    let mut rules = Vec::with_capacity(validation.rules().len() + 1);

    // Field-level shorthand only applies when the mapping has no `required`.
    if validation.required().is_none() {
        if let Some(rule) = required.as_ref().and_then(|param| required_rule(param, &label)) {
            rules.push(rule);
        }
    }

    for rule in validation.0 {
        let resolved = match rule {
            RuleInput::Required(param) => required_rule(&param, &label),
            RuleInput::Email(param) => email_rule(param),
            RuleInput::MinLength(param) => Some(min_length_rule(param, &label)),
            RuleInput::SameAs(param) => {
                Some(same_as_rule(param, &name, idx, index, &format!("{path}.sameAs"))?)
            }
        };
        rules.extend(resolved);
    }

    Ok(FieldConfig {
        is_password: is_password.unwrap_or(field_type == FieldType::Password),
        name,
        field_type,
        label,
        placeholder,
        description,
        default_value,
        auto_complete,
        rules,
    })
}

/// A blank custom message counts as no message.
fn custom_message(message: Option<String>) -> Option<String> {
    message.filter(|message| !message.trim().is_empty())
}

fn required_rule(param: &RequiredParam, label: &str) -> Option<ValidationRule> {
    let message = match param {
        RequiredParam::Flag(false) => return None,
        RequiredParam::Flag(true) => None,
        RequiredParam::Message(message) => Some(message.clone()),
        RequiredParam::Detailed { message } => message.clone(),
    };
    let message = custom_message(message).unwrap_or_else(|| format!("{label} is required."));
    Some(ValidationRule::required().with_message(message))
}

fn email_rule(param: EmailParam) -> Option<ValidationRule> {
    let message = match param {
        EmailParam::Flag(false) => return None,
        EmailParam::Flag(true) => None,
        EmailParam::Detailed { message } => message,
    };
    let message = custom_message(message).unwrap_or_else(|| EMAIL_MESSAGE.to_string());
    Some(ValidationRule::email().with_message(message))
}

fn min_length_rule(param: MinLengthParam, label: &str) -> ValidationRule {
    let (length, message) = match param {
        MinLengthParam::Length(length) => (length, None),
        MinLengthParam::Detailed { value, message } => (value, message),
    };
    let message = custom_message(message)
        .unwrap_or_else(|| format!("{label} must be at least {length} characters."));
    ValidationRule::min_length(length).with_message(message)
}

fn same_as_rule(
    param: SameAsParam,
    name: &str,
    idx: usize,
    index: &HashMap<String, usize>,
    path: &str,
) -> Result<ValidationRule, FormError> {
    let (target, message) = match param {
        SameAsParam::Field(target) => (target, None),
        SameAsParam::Detailed { field, message } => (field, message),
    };
    let Some(&target_idx) = index.get(&target) else {
        return Err(FormError::dangling(path, &target));
    };
    if target_idx > idx {
        debug!("field `{name}` is compared with `{target}`, which is declared later");
    }
    let message = custom_message(message).unwrap_or_else(|| SAME_AS_MESSAGE.to_string());
    Ok(ValidationRule::same_as(target).with_message(message))
}

fn normalize_submit(submit: Option<SubmitInput>, kind: FormKind) -> SubmitConfig {
    let (label, loading_text) = match submit {
        Some(SubmitInput::Label(label)) => (label, None),
        Some(SubmitInput::Detailed {
            label,
            loading_text,
        }) => (label, loading_text),
        None => (DEFAULT_SUBMIT_LABEL.to_string(), None),
    };
    SubmitConfig {
        label,
        loading_text: loading_text.unwrap_or_else(|| kind.default_loading_text().to_string()),
    }
}

/// Resolve step field references; the first dangling name fails the call.
fn normalize_steps(
    steps: Vec<StepDescriptor>,
    index: &HashMap<String, usize>,
    submit: &SubmitConfig,
) -> Result<Vec<StepConfig>, FormError> {
    let last = steps.len().saturating_sub(1);
    steps
        .into_iter()
        .enumerate()
        .map(|(step_idx, step)| {
            let field_indices = step
                .fields
                .iter()
                .enumerate()
                .map(|(pos, name)| {
                    index.get(name).copied().ok_or_else(|| {
                        FormError::dangling(&format!("steps[{step_idx}].fields[{pos}]"), name)
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let next_label = step.next_label.unwrap_or_else(|| {
                if step_idx == last {
                    submit.label.clone()
                } else {
                    DEFAULT_NEXT_LABEL.to_string()
                }
            });
            Ok(StepConfig {
                title: step.title,
                description: step.description,
                progress_label: step.progress_label,
                fields: step.fields,
                previous_label: step
                    .previous_label
                    .unwrap_or_else(|| DEFAULT_PREVIOUS_LABEL.to_string()),
                next_label,
                field_indices,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, ValidationInput};
    use pretty_assertions::assert_eq;

    fn field(name: &str, field_type: FieldType, rules: Vec<RuleInput>) -> FieldDescriptor {
        let mut field = FieldDescriptor::new(name, field_type);
        field.validation = ValidationInput(rules);
        field
    }

    fn schema(fields: Vec<FieldDescriptor>) -> FormSchemaInput {
        FormSchemaInput {
            fields,
            ..FormSchemaInput::default()
        }
    }

    #[test]
    fn required_flag_uses_label_in_message() {
        let mut email = field(
            "email",
            FieldType::Email,
            vec![RuleInput::Required(RequiredParam::Flag(true))],
        );
        email.label = Some("Email".to_string());
        let config = normalize(schema(vec![email])).expect("config");
        assert_eq!(
            config.fields()[0].rules(),
            &[ValidationRule::required().with_message("Email is required.")]
        );
    }

    #[test]
    fn label_falls_back_to_name() {
        let config = normalize(schema(vec![field(
            "nickname",
            FieldType::Text,
            vec![RuleInput::MinLength(MinLengthParam::Length(3))],
        )]))
        .expect("config");
        let field = &config.fields()[0];
        assert_eq!(field.label(), "nickname");
        assert_eq!(
            field.rules()[0].message(),
            Some("nickname must be at least 3 characters.")
        );
    }

    #[test]
    fn disabled_rules_are_dropped() {
        let config = normalize(schema(vec![field(
            "email",
            FieldType::Email,
            vec![
                RuleInput::Required(RequiredParam::Flag(false)),
                RuleInput::Email(EmailParam::Flag(false)),
            ],
        )]))
        .expect("config");
        assert!(config.fields()[0].rules().is_empty());
        assert!(!config.fields()[0].is_required());
    }

    #[test]
    fn field_level_required_is_prepended() {
        let mut email = field(
            "email",
            FieldType::Email,
            vec![RuleInput::Email(EmailParam::Flag(true))],
        );
        email.required = Some(RequiredParam::Flag(true));
        let config = normalize(schema(vec![email])).expect("config");
        let names: Vec<_> = config.fields()[0].rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["required", "email"]);
    }

    #[test]
    fn validation_required_wins_over_field_level() {
        let mut name = field(
            "name",
            FieldType::Text,
            vec![RuleInput::Required(RequiredParam::Message(
                "Tell us your name.".to_string(),
            ))],
        );
        name.required = Some(RequiredParam::Flag(true));
        let config = normalize(schema(vec![name])).expect("config");
        assert_eq!(
            config.fields()[0].rules(),
            &[ValidationRule::required().with_message("Tell us your name.")]
        );
    }

    #[test]
    fn blank_custom_messages_use_defaults() {
        let mut password = field("password", FieldType::Password, Vec::new());
        password.label = Some("Password".to_string());
        let mut confirm = field(
            "confirm",
            FieldType::Password,
            vec![
                RuleInput::Required(RequiredParam::Message(String::new())),
                RuleInput::Email(EmailParam::Detailed {
                    message: Some(" ".to_string()),
                }),
                RuleInput::MinLength(MinLengthParam::Detailed {
                    value: 8,
                    message: Some(String::new()),
                }),
                RuleInput::SameAs(SameAsParam::Detailed {
                    field: "password".to_string(),
                    message: Some(String::new()),
                }),
            ],
        );
        confirm.label = Some("Confirm".to_string());
        let config = normalize(schema(vec![password, confirm])).expect("config");
        let messages: Vec<_> = config.fields()[1]
            .rules()
            .iter()
            .map(|rule| rule.message().unwrap_or_default())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Confirm is required.",
                "Please enter a valid email address.",
                "Confirm must be at least 8 characters.",
                "Fields do not match.",
            ]
        );
    }

    #[test]
    fn password_fields_are_masked_by_default() {
        let config = normalize(schema(vec![
            field("password", FieldType::Password, Vec::new()),
            field("name", FieldType::Text, Vec::new()),
        ]))
        .expect("config");
        assert!(config.fields()[0].is_password());
        assert!(!config.fields()[1].is_password());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = normalize(schema(vec![
            field("email", FieldType::Email, Vec::new()),
            field("email", FieldType::Text, Vec::new()),
        ]))
        .unwrap_err();
        assert_eq!(err.reason(), Some(StructuralReason::DuplicateName));
        assert_eq!(err.path(), Some("fields[1].name"));
    }

    #[test]
    fn submit_defaults_follow_form_kind() {
        for (kind, expected) in [
            (FormKind::Login, "Logging in..."),
            (FormKind::Signup, "Creating Account..."),
            (FormKind::Generic, "Submitting..."),
        ] {
            let mut input = schema(vec![field("email", FieldType::Email, Vec::new())]);
            input.kind = Some(kind);
            input.submit = Some(SubmitInput::Label("Go".to_string()));
            let config = normalize(input).expect("config");
            assert_eq!(config.submit().loading_text, expected);
        }
    }

    #[test]
    fn missing_submit_gets_default_label() {
        let config =
            normalize(schema(vec![field("email", FieldType::Email, Vec::new())])).expect("config");
        assert_eq!(config.submit().label, "Submit");
        assert_eq!(config.method(), "POST");
    }

    #[test]
    fn last_step_next_label_is_submit_label() {
        let mut input = schema(vec![
            field("email", FieldType::Email, Vec::new()),
            field("password", FieldType::Password, Vec::new()),
        ]);
        input.submit = Some(SubmitInput::Label("Finish".to_string()));
        input.steps = Some(vec![
            StepDescriptor {
                fields: vec!["email".to_string()],
                ..StepDescriptor::default()
            },
            StepDescriptor {
                fields: vec!["password".to_string()],
                previous_label: Some("Go back".to_string()),
                ..StepDescriptor::default()
            },
        ]);
        let config = normalize(input).expect("config");
        assert_eq!(config.steps()[0].next_label(), "Next");
        assert_eq!(config.steps()[0].previous_label(), "Back");
        assert_eq!(config.steps()[1].next_label(), "Finish");
        assert_eq!(config.steps()[1].previous_label(), "Go back");
    }
}
