//! Schema loading: JSON5 text or files in, canonical `FormConfig` out.
//!
//! The pipeline is parse -> structural check -> typed decode -> normalize.
//! Each stage fails fast; no partial config is ever returned.

mod schema;


use crate::normalize::normalize;
use crate::{FormConfig, FormError, FormSchemaInput};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Check a raw JSON value against the form-schema shape and decode it.
pub fn validate(input: &Value) -> Result<FormSchemaInput, FormError> {
    schema::validate_form_schema(input)?;
    let schema: FormSchemaInput = serde_json::from_value(input.clone())?;
    debug!("schema check passed (fields={})", schema.fields.len());
    Ok(schema)
}

/// Run validation and normalization on an already parsed value.
pub fn parse_form_config(input: &Value) -> Result<FormConfig, FormError> {
    let schema = validate(input)?;
    normalize(schema)
}

impl FormConfig {
    /// Load a form config from a JSON or JSON5 file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, FormError> {
        info!("loading form schema from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load a form config from JSON or JSON5 contents.
    pub fn load_from_str(contents: &str) -> Result<Self, FormError> {
        debug!("loading form schema from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        parse_form_config(&value)
    }
}
