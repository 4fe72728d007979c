//! Command-line interface for the playground binary.

use crate::read_values;
use anyhow::{Context, bail};
use betterform_schema::presets::Preset;
use betterform_schema::{FormConfig, validate_form, validate_step};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Command-line options for the playground.
#[derive(Debug, Parser)]
#[command(name = "betterform", version, about = "Check form schemas and evaluate form values")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate and normalize a schema, printing the canonical config
    Check {
        /// Path to a JSON or JSON5 form schema
        schema: PathBuf,
    },
    /// Evaluate field values against a schema
    Evaluate {
        /// Path to a JSON or JSON5 form schema
        schema: PathBuf,
        /// Path to a JSON object of field values
        #[arg(long)]
        values: PathBuf,
        /// Only evaluate the fields of this step (zero-based)
        #[arg(long)]
        step: Option<usize>,
    },
    /// Print a built-in preset as a canonical config
    Preset {
        /// Preset name (login or signup)
        #[arg(value_parser = parse_preset)]
        name: Preset,
    },
}

fn parse_preset(name: &str) -> Result<Preset, String> {
    Preset::from_name(name).ok_or_else(|| {
        let known: Vec<_> = Preset::ALL.iter().map(|preset| preset.name()).collect();
        format!("unknown preset `{name}` (expected one of: {})", known.join(", "))
    })
}

/// Run one subcommand, writing JSON output to `out`.
///
/// Invalid values are printed first and then reported as an error, so the
/// process exits non-zero.
pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    match cli.command {
        Command::Check { schema } => {
            let config = load_schema(&schema)?;
            write_json(out, &config)
        }
        Command::Evaluate {
            schema,
            values,
            step,
        } => {
            let config = load_schema(&schema)?;
            let values = read_values(&values)?;
            debug!("evaluating {} value(s)", values.len());
            let report = match step {
                Some(step) => validate_step(&config, step, &values).with_context(|| {
                    format!(
                        "step {step} is out of range (form has {} step(s))",
                        config.steps().len()
                    )
                })?,
                None => validate_form(&config, &values),
            };
            write_json(out, &report)?;
            if !report.is_valid() {
                bail!("{} field(s) failed validation", report.errors.len());
            }
            Ok(())
        }
        Command::Preset { name } => {
            info!("loading preset {}", name.name());
            let config = name.load()?;
            write_json(out, &config)
        }
    }
}

fn load_schema(path: &Path) -> anyhow::Result<FormConfig> {
    FormConfig::load_from_path(path)
        .with_context(|| format!("failed to load schema {}", path.display()))
}

fn write_json(out: &mut impl Write, value: &impl serde::Serialize) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    writeln!(out, "{text}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    const SIGNUP_SCHEMA: &str = r#"{
        fields: [
            { name: "email", type: "email", validation: { required: true, email: true } },
            { name: "password", type: "password", validation: { required: true, minLength: 8 } },
        ],
        steps: [
            { fields: ["email"] },
            { fields: ["password"] },
        ],
    }"#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("write");
        path
    }

    fn run_args(args: &[&str]) -> (anyhow::Result<()>, String) {
        let cli = Cli::try_parse_from(args.iter().copied()).expect("args");
        let mut out = Vec::new();
        let result = run(cli, &mut out);
        (result, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn check_prints_canonical_config() {
        let dir = TempDir::new().expect("tmp");
        let schema = write(&dir, "form.json5", SIGNUP_SCHEMA);
        let (result, out) = run_args(&["betterform", "check", schema.to_str().expect("path")]);
        result.expect("check");
        let config: Value = serde_json::from_str(&out).expect("json");
        assert_eq!(config["submit"]["label"], "Submit");
        assert_eq!(config["steps"][1]["nextLabel"], "Submit");
    }

    #[test]
    fn evaluate_fails_on_invalid_values() {
        let dir = TempDir::new().expect("tmp");
        let schema = write(&dir, "form.json5", SIGNUP_SCHEMA);
        let values = write(&dir, "values.json", r#"{ "email": "nope", "password": "short" }"#);
        let (result, out) = run_args(&[
            "betterform",
            "evaluate",
            schema.to_str().expect("path"),
            "--values",
            values.to_str().expect("path"),
        ]);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "2 field(s) failed validation");
        let report: Value = serde_json::from_str(&out).expect("json");
        assert_eq!(report["errors"][0]["field"], "email");
        assert_eq!(report["errors"][1]["field"], "password");
    }

    #[test]
    fn evaluate_step_only_checks_that_step() {
        let dir = TempDir::new().expect("tmp");
        let schema = write(&dir, "form.json5", SIGNUP_SCHEMA);
        let values = write(&dir, "values.json", r#"{ "email": "a@b.co" }"#);
        let (result, _) = run_args(&[
            "betterform",
            "evaluate",
            schema.to_str().expect("path"),
            "--values",
            values.to_str().expect("path"),
            "--step",
            "0",
        ]);
        result.expect("step 0 is valid");
    }

    #[test]
    fn evaluate_rejects_out_of_range_step() {
        let dir = TempDir::new().expect("tmp");
        let schema = write(&dir, "form.json5", SIGNUP_SCHEMA);
        let values = write(&dir, "values.json", "{}");
        let (result, out) = run_args(&[
            "betterform",
            "evaluate",
            schema.to_str().expect("path"),
            "--values",
            values.to_str().expect("path"),
            "--step",
            "5",
        ]);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "step 5 is out of range (form has 2 step(s))");
        assert!(out.is_empty());
    }

    #[test]
    fn schema_errors_show_path_and_reason() {
        let dir = TempDir::new().expect("tmp");
        let schema = write(&dir, "form.json5", r#"{ fields: [{ name: "a", type: "slider" }] }"#);
        let (result, _) = run_args(&["betterform", "check", schema.to_str().expect("path")]);
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("fields[0].type"), "{message}");
        assert!(message.contains("unknown-field-type"), "{message}");
    }

    #[test]
    fn preset_names_are_checked_by_the_parser() {
        let cli = Cli::try_parse_from(["betterform", "preset", "signup"]).expect("args");
        assert!(matches!(cli.command, Command::Preset { name: Preset::Signup }));
        assert!(Cli::try_parse_from(["betterform", "preset", "reset"]).is_err());
    }
}
