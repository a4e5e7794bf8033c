//! Settings of the resolver itself, discovered from the environment.
//!
//! ## Environment Variables
//! - `SITE_CONFIG_APP_DIR` - Directory holding the global `config.yml`
//!   (default: `<config dir>/site-config`, falling back to `.`)
//! - `SITE_CONFIG_ENV` - Environment name (default: `dev`)
//! - `SITE_CONFIG_FILE` - Site config filename (default: `config.yml`)
//! - `SITE_CONFIG_FILE_ENV` - Environment filename template (default: `config_:env.yml`)

use super::configuration::DEFAULT_ENV;
use crate::paths::{DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_FILE_ENV, PathTable};
use std::path::PathBuf;

pub const APP_DIR_VAR: &str = "SITE_CONFIG_APP_DIR";
pub const ENV_VAR: &str = "SITE_CONFIG_ENV";
pub const FILE_VAR: &str = "SITE_CONFIG_FILE";
pub const FILE_ENV_VAR: &str = "SITE_CONFIG_FILE_ENV";

/// Where the resolver looks for things.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the global (application-default) configuration.
    pub app_dir: PathBuf,
    /// Environment to resolve.
    pub env: String,
    /// Site configuration filename.
    pub config_file: String,
    /// Environment filename template, containing `:env`.
    pub config_file_env: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_dir: default_app_dir(),
            env: DEFAULT_ENV.to_string(),
            config_file: DEFAULT_CONFIG_FILE.to_string(),
            config_file_env: DEFAULT_CONFIG_FILE_ENV.to_string(),
        }
    }
}

fn default_app_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("site-config"))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Settings {
    /// Discover settings from environment variables and defaults.
    pub fn discover() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        Self {
            app_dir: non_empty(APP_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.app_dir),
            env: non_empty(ENV_VAR).unwrap_or(defaults.env),
            config_file: non_empty(FILE_VAR).unwrap_or(defaults.config_file),
            config_file_env: non_empty(FILE_ENV_VAR).unwrap_or(defaults.config_file_env),
        }
    }

    /// Apply explicit overrides (e.g. from the command line).
    pub fn with_overrides(mut self, app_dir: Option<PathBuf>, env: Option<String>) -> Self {
        if let Some(app_dir) = app_dir {
            self.app_dir = app_dir;
        }
        if let Some(env) = env {
            self.env = env;
        }
        self
    }

    /// Path table for these settings.
    pub fn path_table(&self) -> PathTable {
        PathTable::new(self.config_file.clone(), self.config_file_env.clone())
    }
}
