//! Built-in authentication form schemas.

use crate::{FormConfig, FormError};

const LOGIN_SCHEMA: &str = include_str!("../presets/login.json5");
const SIGNUP_SCHEMA: &str = include_str!("../presets/signup.json5");

/// A schema shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Login,
    Signup,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Login, Preset::Signup];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Login => "login",
            Preset::Signup => "signup",
        }
    }

    /// Raw JSON5 source of the preset.
    pub fn source(&self) -> &'static str {
        match self {
            Preset::Login => LOGIN_SCHEMA,
            Preset::Signup => SIGNUP_SCHEMA,
        }
    }

    /// Parse the preset through the regular schema pipeline.
    pub fn load(&self) -> Result<FormConfig, FormError> {
        FormConfig::load_from_str(self.source())
    }
}

/// Email + password login form.
pub fn login_form() -> Result<FormConfig, FormError> {
    Preset::Login.load()
}

/// Name, email, password and confirmation signup form.
pub fn signup_form() -> Result<FormConfig, FormError> {
    Preset::Signup.load()
}
