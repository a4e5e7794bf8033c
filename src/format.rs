//! Output formatting for repositories and values.

use crate::config::{Configuration, Format, Repository};
use anyhow::Result;
use serde_json::Value;

/// Render a repository as YAML or pretty JSON.
pub fn format_repository(repository: &Repository, format: Format) -> Result<String> {
    format_value(&repository.to_value(), format)
}

/// Render a single value. Strings are printed bare.
pub fn format_value(value: &Value, format: Format) -> Result<String> {
    if let Value::String(s) = value {
        return Ok(s.clone());
    }
    let rendered = match format {
        Format::Yaml => serde_yaml::to_string(value)?,
        Format::Json => serde_json::to_string_pretty(value)?,
    };
    Ok(rendered.trim_end().to_string())
}

/// Summary of the facade's metadata, one `name: value` per line.
pub fn format_info(config: &Configuration) -> String {
    let mut out = String::new();

    out.push_str(&format!("version: {}\n", config.app_version()));
    out.push_str(&format!("environment: {}\n", config.env_name()));
    out.push_str(&format!("config_file: {}\n", config.config_filename()));
    if let Some(env_file) = config.config_environment_filename() {
        out.push_str(&format!("config_file_env: {}\n", env_file));
    }
    out.push_str(&format!(
        "config_file_env_wildcard: {}\n",
        config.config_environment_filename_wildcard()
    ));
    for (name, value) in config.paths().entries() {
        out.push_str(&format!("path.{}: {}\n", name, value));
    }

    out
}
