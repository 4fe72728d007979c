//! Structural checks for raw form schemas.
//!
//! Walks a `serde_json::Value` and reports the first violation with its path
//! (`fields[2].name`) and a reason code. Unknown keys are logged and skipped;
//! `null` on an optional key counts as absent.

use crate::error::{FormError, StructuralReason};
use crate::model::FieldType;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashSet;

const FORM_KEYS: &[&str] = &[
    "type",
    "title",
    "description",
    "endpoint",
    "method",
    "fields",
    "submit",
    "footer",
    "steps",
];

const FIELD_KEYS: &[&str] = &[
    "name",
    "type",
    "label",
    "placeholder",
    "description",
    "isPassword",
    "defaultValue",
    "autoComplete",
    "required",
    "validation",
];

const STEP_KEYS: &[&str] = &[
    "title",
    "description",
    "progressLabel",
    "fields",
    "previousLabel",
    "nextLabel",
];

/// Validate a whole form schema value.
pub(super) fn validate_form_schema(value: &Value) -> Result<(), FormError> {
    let map = expect_object(value, "")?;
    note_unknown_keys(map, FORM_KEYS, "");

    for key in ["type", "title", "description", "endpoint", "method"] {
        if let Some(value) = optional(map, key) {
            expect_string(value, key)?;
        }
    }

    let Some(fields) = map.get("fields") else {
        return Err(missing("fields"));
    };
    validate_fields(fields, "fields")?;

    if let Some(value) = optional(map, "submit") {
        validate_submit(value, "submit")?;
    }
    if let Some(value) = optional(map, "footer") {
        validate_footer(value, "footer")?;
    }
    if let Some(value) = optional(map, "steps") {
        validate_steps(value, "steps")?;
    }
    Ok(())
}

/// Validate the field list, including name uniqueness.
fn validate_fields(value: &Value, path: &str) -> Result<(), FormError> {
    let arr = expect_array(value, path)?;
    if arr.is_empty() {
        return Err(FormError::structural(
            path,
            StructuralReason::WrongType,
            "expected at least one field",
        ));
    }
    let mut seen = HashSet::new();
    for (idx, entry) in arr.iter().enumerate() {
        let field_path = format!("{path}[{idx}]");
        let name = validate_field(entry, &field_path)?;
        if !seen.insert(name) {
            return Err(FormError::structural(
                &join_path(&field_path, "name"),
                StructuralReason::DuplicateName,
                &format!("field name `{name}` is already used"),
            ));
        }
    }
    Ok(())
}

/// Validate one field descriptor and return its name.
fn validate_field<'a>(value: &'a Value, path: &str) -> Result<&'a str, FormError> {
    let map = expect_object(value, path)?;
    note_unknown_keys(map, FIELD_KEYS, path);

    let name_path = join_path(path, "name");
    let name = map.get("name").ok_or_else(|| missing(&name_path))?;
    let name = expect_str(name, &name_path)?;
    if name.trim().is_empty() {
        return Err(FormError::structural(
            &name_path,
            StructuralReason::MissingRequiredKey,
            "field name must not be empty",
        ));
    }

    let type_path = join_path(path, "type");
    let field_type = map.get("type").ok_or_else(|| missing(&type_path))?;
    let field_type = expect_str(field_type, &type_path)?;
    let Some(field_type) = FieldType::from_name(field_type) else {
        return Err(FormError::structural(
            &type_path,
            StructuralReason::UnknownFieldType,
            &format!("unsupported field type `{field_type}`"),
        ));
    };

    for key in ["label", "placeholder", "description", "autoComplete"] {
        if let Some(value) = optional(map, key) {
            expect_string(value, &join_path(path, key))?;
        }
    }
    if let Some(value) = optional(map, "isPassword") {
        expect_bool(value, &join_path(path, "isPassword"))?;
    }
    if let Some(value) = optional(map, "defaultValue") {
        validate_default_value(value, field_type, &join_path(path, "defaultValue"))?;
    }
    if let Some(value) = optional(map, "required") {
        validate_required(value, &join_path(path, "required"))?;
    }
    if let Some(value) = optional(map, "validation") {
        validate_rules(value, &join_path(path, "validation"))?;
    }
    Ok(name)
}

/// Toggles take a boolean default; other inputs take text.
fn validate_default_value(value: &Value, field_type: FieldType, path: &str) -> Result<(), FormError> {
    if field_type.is_flag() {
        expect_bool(value, path)
    } else {
        expect_string(value, path)
    }
}

/// Validate the rule mapping of a field.
fn validate_rules(value: &Value, path: &str) -> Result<(), FormError> {
    let map = expect_object(value, path)?;
    note_unknown_keys(map, &["required", "email", "minLength", "sameAs"], path);

    if let Some(value) = optional(map, "required") {
        validate_required(value, &join_path(path, "required"))?;
    }
    if let Some(value) = optional(map, "email") {
        validate_flag_rule(value, &join_path(path, "email"))?;
    }
    if let Some(value) = optional(map, "minLength") {
        validate_min_length(value, &join_path(path, "minLength"))?;
    }
    if let Some(value) = optional(map, "sameAs") {
        validate_same_as(value, &join_path(path, "sameAs"))?;
    }
    Ok(())
}

/// `required` accepts a flag, a message string, or `{ message }`.
fn validate_required(value: &Value, path: &str) -> Result<(), FormError> {
    match value {
        Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Object(_) => validate_flag_rule(value, path),
        _ => Err(wrong_type(path, "expected bool, string or object")),
    }
}

/// Rules without a parameter accept a flag or `{ message }`.
fn validate_flag_rule(value: &Value, path: &str) -> Result<(), FormError> {
    match value {
        Value::Bool(_) => Ok(()),
        Value::Object(map) => validate_message(map, path),
        _ => Err(wrong_type(path, "expected bool or object")),
    }
}

fn validate_min_length(value: &Value, path: &str) -> Result<(), FormError> {
    match value {
        Value::Object(map) => {
            let value_path = join_path(path, "value");
            let length = map.get("value").ok_or_else(|| missing(&value_path))?;
            expect_u64(length, &value_path)?;
            validate_message(map, path)
        }
        _ => expect_u64(value, path),
    }
}

fn validate_same_as(value: &Value, path: &str) -> Result<(), FormError> {
    match value {
        Value::String(_) => expect_field_name(value, path),
        Value::Object(map) => {
            let field_path = join_path(path, "field");
            let field = map.get("field").ok_or_else(|| missing(&field_path))?;
            expect_field_name(field, &field_path)?;
            validate_message(map, path)
        }
        _ => Err(wrong_type(path, "expected string or object")),
    }
}

fn validate_message(map: &Map<String, Value>, path: &str) -> Result<(), FormError> {
    if let Some(value) = optional(map, "message") {
        expect_string(value, &join_path(path, "message"))?;
    }
    Ok(())
}

/// `submit` accepts a label string or `{ label, loadingText }`.
fn validate_submit(value: &Value, path: &str) -> Result<(), FormError> {
    if value.is_string() {
        return Ok(());
    }
    let map = expect_object(value, path)
        .map_err(|_| wrong_type(path, "expected string or object"))?;
    note_unknown_keys(map, &["label", "loadingText"], path);

    let label_path = join_path(path, "label");
    let label = map.get("label").ok_or_else(|| missing(&label_path))?;
    expect_string(label, &label_path)?;
    if let Some(value) = optional(map, "loadingText") {
        expect_string(value, &join_path(path, "loadingText"))?;
    }
    Ok(())
}

fn validate_footer(value: &Value, path: &str) -> Result<(), FormError> {
    let map = expect_object(value, path)?;
    note_unknown_keys(map, &["text", "link"], path);

    if let Some(value) = optional(map, "text") {
        expect_string(value, &join_path(path, "text"))?;
    }
    if let Some(value) = optional(map, "link") {
        let link_path = join_path(path, "link");
        let link = expect_object(value, &link_path)?;
        for key in ["text", "href"] {
            let key_path = join_path(&link_path, key);
            let value = link.get(key).ok_or_else(|| missing(&key_path))?;
            expect_string(value, &key_path)?;
        }
    }
    Ok(())
}

/// Validate step descriptors. Name resolution happens during normalization.
fn validate_steps(value: &Value, path: &str) -> Result<(), FormError> {
    let arr = expect_array(value, path)?;
    for (idx, entry) in arr.iter().enumerate() {
        let step_path = format!("{path}[{idx}]");
        let map = expect_object(entry, &step_path)?;
        note_unknown_keys(map, STEP_KEYS, &step_path);

        for key in [
            "title",
            "description",
            "progressLabel",
            "previousLabel",
            "nextLabel",
        ] {
            if let Some(value) = optional(map, key) {
                expect_string(value, &join_path(&step_path, key))?;
            }
        }

        let fields_path = join_path(&step_path, "fields");
        let fields = map.get("fields").ok_or_else(|| missing(&fields_path))?;
        validate_string_array(fields, &fields_path)?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, FormError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(wrong_type(path, "expected object")),
    }
}

/// Expect a JSON array or return a typed error.
fn expect_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, FormError> {
    match value {
        Value::Array(arr) => Ok(arr),
        _ => Err(wrong_type(path, "expected array")),
    }
}

/// Expect a JSON string and borrow it.
fn expect_str<'a>(value: &'a Value, path: &str) -> Result<&'a str, FormError> {
    value
        .as_str()
        .ok_or_else(|| wrong_type(path, "expected string"))
}

fn expect_string(value: &Value, path: &str) -> Result<(), FormError> {
    expect_str(value, path).map(|_| ())
}

/// A reference to another field: a non-empty string.
fn expect_field_name(value: &Value, path: &str) -> Result<(), FormError> {
    if expect_str(value, path)?.trim().is_empty() {
        return Err(FormError::structural(
            path,
            StructuralReason::MissingRequiredKey,
            "field reference must not be empty",
        ));
    }
    Ok(())
}

fn expect_bool(value: &Value, path: &str) -> Result<(), FormError> {
    if value.is_boolean() {
        Ok(())
    } else {
        Err(wrong_type(path, "expected bool"))
    }
}

/// Expect a non-negative JSON integer.
fn expect_u64(value: &Value, path: &str) -> Result<(), FormError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(wrong_type(path, "expected non-negative integer"))
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, path: &str) -> Result<(), FormError> {
    let arr = expect_array(value, path)?;
    for (idx, entry) in arr.iter().enumerate() {
        expect_string(entry, &format!("{path}[{idx}]"))?;
    }
    Ok(())
}

/// Log keys this version does not understand; they are kept out of the model.
fn note_unknown_keys(map: &Map<String, Value>, known: &[&str], path: &str) {
    for key in map.keys() {
        if !known.contains(&key.as_str()) {
            debug!("ignoring unknown schema key: {}", join_path(path, key));
        }
    }
}

/// Optional keys treat an explicit `null` as absent.
fn optional<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn missing(path: &str) -> FormError {
    FormError::structural(
        path,
        StructuralReason::MissingRequiredKey,
        "missing required field",
    )
}

fn wrong_type(path: &str, message: &str) -> FormError {
    FormError::structural(path, StructuralReason::WrongType, message)
}
