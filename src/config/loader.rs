//! Repository loading and per-layer resolution.
//!
//! [`RepositoryLoader`] is the parsing capability: path or inline text in,
//! [`Repository`] out. [`LayerLoader`] decides which files make up the
//! global, local, and environment layers.

use super::repository::Repository;
use crate::error::{ConfigError, Result};
use crate::paths::{self, PathTable};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key injected into the local layer with the site's absolute base directory.
pub const SOURCE_KEY: &str = "source";

/// Document format understood by [`FileLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl Format {
    /// Pick the format from a file extension. Anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            _ => Err(format!("Invalid format '{}'. Valid options: yaml, json", s)),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Yaml => write!(f, "yaml"),
            Format::Json => write!(f, "json"),
        }
    }
}

/// Turns configuration files or fragments into repositories.
pub trait RepositoryLoader {
    /// Load a file. Relative paths are up to the implementation.
    fn load(&self, path: &Path) -> Result<Repository>;

    /// Parse a fragment already in memory.
    fn load_inline(&self, text: &str, format: Format) -> Result<Repository>;
}

/// Loads YAML and JSON files from disk.
///
/// Relative paths resolve against the application directory, which is
/// where the global configuration lives.
#[derive(Debug, Clone)]
pub struct FileLoader {
    app_dir: PathBuf,
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FileLoader {
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
        }
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.app_dir.join(path)
        }
    }
}

/// Parse `text` in `format` into a repository, naming `origin` in errors.
pub fn parse_repository(text: &str, format: Format, origin: &str) -> Result<Repository> {
    if text.trim().is_empty() {
        return Ok(Repository::new());
    }
    let value: Value = match format {
        Format::Yaml => serde_yaml::from_str(text).map_err(|source| ConfigError::ParseYaml {
            origin: origin.to_string(),
            source,
        })?,
        Format::Json => serde_json::from_str(text).map_err(|source| ConfigError::ParseJson {
            origin: origin.to_string(),
            source,
        })?,
    };
    Repository::from_document(value, origin)
}

impl RepositoryLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<Repository> {
        let full = self.full_path(path);
        let content = std::fs::read_to_string(&full).map_err(|source| ConfigError::Read {
            path: full.clone(),
            source,
        })?;
        debug!(path = %full.display(), "Loaded configuration file");
        parse_repository(&content, Format::from_path(&full), &full.display().to_string())
    }

    fn load_inline(&self, text: &str, format: Format) -> Result<Repository> {
        parse_repository(text, format, "inline configuration")
    }
}

/// Resolves and loads the individual configuration layers.
pub struct LayerLoader<'a> {
    loader: &'a dyn RepositoryLoader,
    paths: &'a PathTable,
}

impl<'a> LayerLoader<'a> {
    pub fn new(loader: &'a dyn RepositoryLoader, paths: &'a PathTable) -> Self {
        Self { loader, paths }
    }

    /// Load the application-default layer. Validation is left to the caller.
    pub fn load_global(&self) -> Result<Repository> {
        let filename = self.paths.config_file();
        debug!(file = filename, "Loading global configuration");
        self.loader.load(Path::new(filename))
    }

    /// Base directory for the site: `local_path` when given, otherwise the
    /// `source` recorded in the global layer, otherwise the current directory.
    pub fn base_dir(&self, local_path: Option<&Path>, global: &Repository) -> PathBuf {
        match local_path {
            Some(path) => path.to_path_buf(),
            None => global
                .get_str(SOURCE_KEY)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// Load the site configuration from `base_dir`. The file must exist.
    ///
    /// The returned layer carries `source` set to the canonical base directory.
    pub fn load_local(&self, base_dir: &Path) -> Result<Repository> {
        let candidate = base_dir.join(self.paths.config_file());
        let config_path = paths::resolve_existing(&candidate)?;
        let mut local = self.loader.load(&config_path)?;

        let source = paths::resolve_existing(base_dir)?;
        local.set(SOURCE_KEY, source.to_string_lossy().into_owned());
        debug!(path = %config_path.display(), "Loaded local configuration");
        Ok(local)
    }

    /// Load the override layer for `env`, if any.
    ///
    /// `dev` has no layer. For other environments a missing file is not an
    /// error: a warning is logged and `None` returned.
    pub fn load_environment(&self, base_dir: &Path, env: &str) -> Result<Option<Repository>> {
        let Some(filename) = self.paths.env_filename(env) else {
            debug!(env = %env, "Baseline environment, no override file");
            return Ok(None);
        };

        let candidate = base_dir.join(&filename);
        match paths::resolve_path(&candidate, false)? {
            Some(resolved) => {
                let repository = self.loader.load(&resolved)?;
                debug!(env = %env, path = %resolved.display(), "Loaded environment configuration");
                Ok(Some(repository))
            }
            None => {
                warn!(
                    env = %env,
                    path = %candidate.display(),
                    "No configuration file for environment, using local configuration only"
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("config.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("config.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("config.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("config")), Format::Yaml);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("yaml".parse::<Format>().unwrap(), Format::Yaml);
        assert_eq!("YML".parse::<Format>().unwrap(), Format::Yaml);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert!("toml".parse::<Format>().is_err());
    }

    #[test]
    fn test_file_loader_relative_to_app_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.yml"), "port: 4000\nhost: localhost\n").unwrap();

        let loader = FileLoader::new(temp.path());
        let repo = loader.load(Path::new("config.yml")).unwrap();
        assert_eq!(repo.get_i64("port"), Some(4000));
        assert_eq!(repo.get_str("host"), Some("localhost"));
    }

    #[test]
    fn test_file_loader_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{"title": "Site", "tags": ["a"]}"#).unwrap();

        let repo = FileLoader::default().load(&path).unwrap();
        assert_eq!(repo.get("tags"), Some(&json!(["a"])));
    }

    #[test]
    fn test_file_loader_missing_file_is_load_error() {
        let temp = TempDir::new().unwrap();
        let err = FileLoader::new(temp.path())
            .load(Path::new("missing.yml"))
            .unwrap_err();
        assert!(err.is_load_error());
    }

    #[test]
    fn test_parse_errors() {
        let loader = FileLoader::default();
        let err = loader.load_inline("a: [1, 2", Format::Yaml).unwrap_err();
        assert_eq!(err.code(), ErrorCode::LoadFailed);

        let err = loader.load_inline("- a\n- b\n", Format::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping { .. }));
    }

    #[test]
    fn test_empty_document_is_blank() {
        let loader = FileLoader::default();
        assert!(loader.load_inline("", Format::Yaml).unwrap().is_empty());
        assert!(loader.load_inline("  ", Format::Json).unwrap().is_empty());
    }

    #[test]
    fn test_yaml_preserves_key_order() {
        let repo = FileLoader::default()
            .load_inline("zeta: 1\nalpha: 2\nmid: 3\n", Format::Yaml)
            .unwrap();
        let keys: Vec<&str> = repo.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_base_dir_fallbacks() {
        let loader = FileLoader::default();
        let paths = PathTable::default();
        let layers = LayerLoader::new(&loader, &paths);

        let mut global = Repository::new();
        assert_eq!(layers.base_dir(None, &global), PathBuf::from("."));

        global.set(SOURCE_KEY, "/srv/site");
        assert_eq!(layers.base_dir(None, &global), PathBuf::from("/srv/site"));
        assert_eq!(
            layers.base_dir(Some(Path::new("/other")), &global),
            PathBuf::from("/other")
        );
    }

    #[test]
    fn test_load_local_injects_source() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.yml"), "title: Site\n").unwrap();

        let loader = FileLoader::default();
        let paths = PathTable::default();
        let local = LayerLoader::new(&loader, &paths)
            .load_local(temp.path())
            .unwrap();

        let expected = std::fs::canonicalize(temp.path()).unwrap();
        assert_eq!(local.get_str("title"), Some("Site"));
        assert_eq!(local.get_str(SOURCE_KEY), Some(expected.to_str().unwrap()));
    }

    #[test]
    fn test_load_local_requires_file() {
        let temp = TempDir::new().unwrap();
        let loader = FileLoader::default();
        let paths = PathTable::default();
        let err = LayerLoader::new(&loader, &paths)
            .load_local(temp.path())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PathNotFound);
    }

    #[test]
    fn test_load_environment_dev_is_skipped() {
        let temp = TempDir::new().unwrap();
        // Even an existing config_dev.yml is ignored.
        std::fs::write(temp.path().join("config_dev.yml"), "port: 1\n").unwrap();

        let loader = FileLoader::default();
        let paths = PathTable::default();
        let layers = LayerLoader::new(&loader, &paths);
        assert_eq!(layers.load_environment(temp.path(), "dev").unwrap(), None);
        assert_eq!(layers.load_environment(temp.path(), "Dev").unwrap(), None);
    }

    #[test]
    fn test_load_environment_found_and_missing() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config_prod.yml"), "port: 9090\n").unwrap();

        let loader = FileLoader::default();
        let paths = PathTable::default();
        let layers = LayerLoader::new(&loader, &paths);

        let prod = layers.load_environment(temp.path(), "prod").unwrap().unwrap();
        assert_eq!(prod.get_i64("port"), Some(9090));
        assert_eq!(layers.load_environment(temp.path(), "staging").unwrap(), None);
    }
}
