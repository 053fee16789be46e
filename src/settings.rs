//! Layered settings for the CLI.
//!
//! Precedence, lowest first: built-in defaults, the YAML settings file,
//! `ATMGEN_*` environment variables (after `.env` is loaded), CLI flags.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::generator::{GeneratorOptions, DEFAULT_MAX_ATTEMPTS};
use crate::ports::filesystem::FileSystem;

/// Settings file picked up from the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "atmgen.yaml";

/// Where the simulation service listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Config field that holds the ATM list.
pub const DEFAULT_FIELD: &str = "atms";

const ENV_BASE_URL: &str = "ATMGEN_BASE_URL";
const ENV_FIELD: &str = "ATMGEN_FIELD";
const ENV_MAX_ATTEMPTS: &str = "ATMGEN_MAX_ATTEMPTS";

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Root URL of the simulation service.
    pub base_url: String,
    /// Config field replaced by `replace`.
    pub field: String,
    /// Draws allowed per record before generation gives up.
    pub max_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            field: DEFAULT_FIELD.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Settings {
    /// Parses settings from YAML; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error string if the YAML is malformed or has unknown keys.
    pub fn from_yaml(text: &str) -> Result<Self, String> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| format!("Invalid settings: {e}"))
    }

    /// Loads settings from `explicit` if given, otherwise from
    /// [`DEFAULT_SETTINGS_FILE`] when it exists, otherwise defaults.
    ///
    /// # Errors
    ///
    /// Returns an error string if an explicit file is missing, the default
    /// file exists but cannot be read, or any file fails to parse.
    pub fn load(fs: &dyn FileSystem, explicit: Option<&Path>) -> Result<Self, String> {
        let (path, required) = match explicit {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_SETTINGS_FILE), false),
        };

        match fs.read_to_string(path) {
            Ok(text) => {
                tracing::debug!(path = %path.display(), "loaded settings file");
                Self::from_yaml(&text).map_err(|e| format!("{}: {e}", path.display()))
            }
            Err(e) if !required && is_not_found(e.as_ref()) => Ok(Self::default()),
            Err(e) => Err(format!("Failed to read settings file {}: {e}", path.display())),
        }
    }

    /// Overrides fields from `ATMGEN_*` variables resolved through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error string if `ATMGEN_MAX_ATTEMPTS` is not a number.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(field) = lookup(ENV_FIELD) {
            self.field = field;
        }
        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            self.max_attempts = raw
                .trim()
                .parse()
                .map_err(|e| format!("{ENV_MAX_ATTEMPTS}={raw:?} is not a valid count: {e}"))?;
        }
        Ok(())
    }

    /// Checks invariants the rest of the tool relies on.
    ///
    /// # Errors
    ///
    /// Returns an error string describing the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".into());
        }
        if self.field.is_empty() {
            return Err("field must not be empty".into());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".into());
        }
        Ok(())
    }

    /// Generator tuning derived from these settings.
    #[must_use]
    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions { max_attempts: self.max_attempts }
    }
}

fn is_not_found(err: &(dyn std::error::Error + 'static)) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}
