//! Path table and filesystem path resolution.
//!
//! The path table maps logical names (e.g. `config.file`) to filename
//! templates. The resolver turns a candidate path into a canonical absolute
//! path, either failing or returning `None` when nothing exists there.

use crate::error::{ConfigError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Logical name of the site configuration filename.
pub const CONFIG_FILE: &str = "config.file";

/// Logical name of the environment configuration filename template.
pub const CONFIG_FILE_ENV: &str = "config.file_env";

/// Placeholder replaced by the environment name in `config.file_env`.
pub const ENV_PLACEHOLDER: &str = ":env";

/// Default value of `config.file`.
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Default value of `config.file_env`.
pub const DEFAULT_CONFIG_FILE_ENV: &str = "config_:env.yml";

/// Standard paths and filenames of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTable {
    entries: BTreeMap<String, String>,
}

impl Default for PathTable {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_FILE_ENV)
    }
}

impl PathTable {
    /// Create a table with the two required entries.
    pub fn new(config_file: impl Into<String>, config_file_env: impl Into<String>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(CONFIG_FILE.to_string(), config_file.into());
        entries.insert(CONFIG_FILE_ENV.to_string(), config_file_env.into());
        Self { entries }
    }

    /// Build a table from arbitrary entries. Both required names must be present.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries: BTreeMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        for required in [CONFIG_FILE, CONFIG_FILE_ENV] {
            if !entries.contains_key(required) {
                return Err(ConfigError::missing_path(required));
            }
        }
        Ok(Self { entries })
    }

    /// Add or replace an entry.
    pub fn with_entry(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// The site configuration filename. Typically `config.yml`.
    pub fn config_file(&self) -> &str {
        self.entries
            .get(CONFIG_FILE)
            .map(String::as_str)
            .unwrap_or(DEFAULT_CONFIG_FILE)
    }

    /// The environment filename template. Typically `config_:env.yml`.
    pub fn config_file_env(&self) -> &str {
        self.entries
            .get(CONFIG_FILE_ENV)
            .map(String::as_str)
            .unwrap_or(DEFAULT_CONFIG_FILE_ENV)
    }

    /// Environment filename for `env`, or `None` for the `dev` baseline.
    pub fn env_filename(&self, env: &str) -> Option<String> {
        if is_dev(env) {
            return None;
        }
        Some(self.config_file_env().replace(ENV_PLACEHOLDER, env))
    }

    /// Environment filename with `*` in place of the environment name.
    pub fn env_filename_wildcard(&self) -> String {
        self.config_file_env().replace(ENV_PLACEHOLDER, "*")
    }
}

/// `dev` is the implicit baseline environment; it has no override file.
pub fn is_dev(env: &str) -> bool {
    env.eq_ignore_ascii_case("dev")
}

/// Resolve `path` to a canonical absolute path (symlinks resolved).
///
/// A path with nothing behind it fails with `PathNotFound` when `strict`,
/// and yields `Ok(None)` otherwise.
pub fn resolve_path(path: &Path, strict: bool) -> Result<Option<PathBuf>> {
    match std::fs::canonicalize(path) {
        Ok(resolved) => Ok(Some(resolved)),
        Err(_) if strict => Err(ConfigError::path_not_found(path)),
        Err(_) => Ok(None),
    }
}

/// Resolve `path` strictly, returning the canonical path.
pub fn resolve_existing(path: &Path) -> Result<PathBuf> {
    resolve_path(path, true)?.ok_or_else(|| ConfigError::path_not_found(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_default_table() {
        let paths = PathTable::default();
        assert_eq!(paths.config_file(), "config.yml");
        assert_eq!(paths.config_file_env(), "config_:env.yml");
        assert_eq!(paths.get(CONFIG_FILE), Some("config.yml"));
    }

    #[test]
    fn test_env_filename() {
        let paths = PathTable::default();
        assert_eq!(paths.env_filename("prod").as_deref(), Some("config_prod.yml"));
        assert_eq!(paths.env_filename("dev"), None);
        assert_eq!(paths.env_filename("DEV"), None);
        assert_eq!(paths.env_filename_wildcard(), "config_*.yml");
    }

    #[test]
    fn test_from_entries_requires_both_names() {
        let err = PathTable::from_entries([(CONFIG_FILE, "site.yml")]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingPath);

        let paths = PathTable::from_entries([
            (CONFIG_FILE, "site.yml"),
            (CONFIG_FILE_ENV, "site.:env.yml"),
            ("layouts", "_layouts"),
        ])
        .unwrap();
        assert_eq!(paths.config_file(), "site.yml");
        assert_eq!(paths.env_filename("stage").as_deref(), Some("site.stage.yml"));
        assert_eq!(paths.get("layouts"), Some("_layouts"));
    }

    #[test]
    fn test_resolve_existing_path() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config.yml");
        std::fs::write(&file, "a: 1\n").unwrap();

        let resolved = resolve_path(&file, true).unwrap().unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved, std::fs::canonicalize(&file).unwrap());
    }

    #[test]
    fn test_resolve_missing_path_strict_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");

        let err = resolve_path(&missing, true).unwrap_err();
        match err {
            ConfigError::PathNotFound { path } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_missing_path_lenient_is_none() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");
        assert_eq!(resolve_path(&missing, false).unwrap(), None);
    }

    #[test]
    fn test_resolve_normalizes_dot_segments() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("site")).unwrap();
        let dotted = temp.path().join("site").join("..").join("site");

        let resolved = resolve_existing(&dotted).unwrap();
        assert_eq!(resolved, std::fs::canonicalize(temp.path().join("site")).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_follows_symlinks() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("real");
        std::fs::create_dir_all(&target).unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let resolved = resolve_existing(&link).unwrap();
        assert_eq!(resolved, std::fs::canonicalize(&target).unwrap());
    }
}
