//! Raw form schema as authored in JSON or JSON5.
//!
//! These types mirror the user-facing shape, shorthand included. They are only
//! produced by the schema check in `loader::schema`, so every value reaching
//! the normalizer already has the expected JSON types.

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Root of a user-authored form schema.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormSchemaInput {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<FormKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit: Option<SubmitInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Footer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepDescriptor>>,
}

/// Kind of authentication form; selects default submit wording.
///
/// Unrecognized kinds decode as `Generic`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Login,
    Signup,
    #[default]
    #[serde(other)]
    Generic,
}

impl FormKind {
    /// Loading text shown on the submit button while a submission runs.
    pub fn default_loading_text(&self) -> &'static str {
        match self {
            FormKind::Login => "Logging in...",
            FormKind::Signup => "Creating Account...",
            FormKind::Generic => "Submitting...",
        }
    }
}

/// Supported input types. The set is closed; anything else is rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Password,
    Tel,
    Url,
    Number,
    Textarea,
    Toggle,
}

impl FieldType {
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Password,
        FieldType::Tel,
        FieldType::Url,
        FieldType::Number,
        FieldType::Textarea,
        FieldType::Toggle,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Password => "password",
            FieldType::Tel => "tel",
            FieldType::Url => "url",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Toggle => "toggle",
        }
    }

    /// Whether the field holds an on/off flag rather than free text.
    pub fn is_flag(&self) -> bool {
        matches!(self, FieldType::Toggle)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field as written in the schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_password: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldDefault>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_complete: Option<String>,
    /// Field-level `required` shorthand, used when `validation.required` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<RequiredParam>,
    #[serde(default, skip_serializing_if = "ValidationInput::is_empty")]
    pub validation: ValidationInput,
}

impl FieldDescriptor {
    /// Minimal descriptor with only a name and type.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: None,
            placeholder: None,
            description: None,
            is_password: None,
            default_value: None,
            auto_complete: None,
            required: None,
            validation: ValidationInput::default(),
        }
    }
}

/// Initial value of a field: a flag for toggles, text for everything else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldDefault {
    Flag(bool),
    Text(String),
}

impl FieldDefault {
    /// String form used to seed form values.
    pub fn as_value(&self) -> String {
        match self {
            FieldDefault::Flag(flag) => flag.to_string(),
            FieldDefault::Text(text) => text.clone(),
        }
    }
}

/// Validation rules in declaration order.
///
/// Serialized as a JSON object keyed by rule name; declaration order is the
/// key order of that object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationInput(pub Vec<RuleInput>);

impl ValidationInput {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rules(&self) -> &[RuleInput] {
        &self.0
    }

    /// Return the `required` entry when declared.
    pub fn required(&self) -> Option<&RequiredParam> {
        self.0.iter().find_map(|rule| match rule {
            RuleInput::Required(param) => Some(param),
            _ => None,
        })
    }
}

/// A rule entry in the input mapping, parameter still in shorthand form.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleInput {
    Required(RequiredParam),
    Email(EmailParam),
    MinLength(MinLengthParam),
    SameAs(SameAsParam),
}

impl RuleInput {
    pub fn key(&self) -> &'static str {
        match self {
            RuleInput::Required(_) => "required",
            RuleInput::Email(_) => "email",
            RuleInput::MinLength(_) => "minLength",
            RuleInput::SameAs(_) => "sameAs",
        }
    }
}

/// `required: true | false | "message" | { message }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RequiredParam {
    Flag(bool),
    Message(String),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

/// `email: true | false | { message }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EmailParam {
    Flag(bool),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

/// `minLength: n | { value, message }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MinLengthParam {
    Length(usize),
    Detailed {
        value: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

/// `sameAs: "field" | { field, message }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SameAsParam {
    Field(String),
    Detailed {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl Serialize for ValidationInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for rule in &self.0 {
            match rule {
                RuleInput::Required(param) => map.serialize_entry(rule.key(), param)?,
                RuleInput::Email(param) => map.serialize_entry(rule.key(), param)?,
                RuleInput::MinLength(param) => map.serialize_entry(rule.key(), param)?,
                RuleInput::SameAs(param) => map.serialize_entry(rule.key(), param)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ValidationInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RulesVisitor;

        impl<'de> Visitor<'de> for RulesVisitor {
            type Value = ValidationInput;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of validation rules")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut rules = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    // A `null` parameter leaves the rule undeclared.
                    let rule = match key.as_str() {
                        "required" => map.next_value::<Option<_>>()?.map(RuleInput::Required),
                        "email" => map.next_value::<Option<_>>()?.map(RuleInput::Email),
                        "minLength" => map.next_value::<Option<_>>()?.map(RuleInput::MinLength),
                        "sameAs" => map.next_value::<Option<_>>()?.map(RuleInput::SameAs),
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                            None
                        }
                    };
                    rules.extend(rule);
                }
                Ok(ValidationInput(rules))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(ValidationInput::default())
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(ValidationInput::default())
            }
        }

        deserializer.deserialize_any(RulesVisitor)
    }
}

/// `submit: "Label" | { label, loadingText }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SubmitInput {
    Label(String),
    Detailed {
        label: String,
        #[serde(
            default,
            rename = "loadingText",
            skip_serializing_if = "Option::is_none"
        )]
        loading_text: Option<String>,
    },
}

/// Text under the submit button, optionally with a link.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Footer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<FooterLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FooterLink {
    pub text: String,
    pub href: String,
}

/// One page of a multi-step form, referencing fields by name.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StepDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_label: Option<String>,
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_label: Option<String>,
}
