//! The configuration facade: owns the layers and the effective view.

use super::definition::{Definition, Schema};
use super::loader::{Format, LayerLoader, RepositoryLoader};
use super::merge::{check_definitions, merge_layers};
use super::repository::Repository;
use crate::error::Result;
use crate::paths::{self, PathTable};
use std::path::Path;
use tracing::info;

/// Name of the baseline environment.
pub const DEFAULT_ENV: &str = "dev";

/// Effective configuration of one site.
///
/// Holds the global, local, and environment layers plus the merged view.
/// Each instance is independent. Not thread-safe: `load_local` replaces
/// every layer but the global one and needs exclusive access.
pub struct Configuration {
    loader: Box<dyn RepositoryLoader>,
    definition: Box<dyn Definition>,
    paths: PathTable,
    version: String,
    env_name: String,
    repository: Repository,
    global: Repository,
    local: Repository,
    environment: Repository,
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("paths", &self.paths)
            .field("version", &self.version)
            .field("env_name", &self.env_name)
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl Configuration {
    /// Load and validate the global layer using the built-in site definition.
    pub fn new<L>(loader: L, paths: PathTable, version: impl Into<String>) -> Result<Self>
    where
        L: RepositoryLoader + 'static,
    {
        Self::with_definition(loader, paths, version, Schema::site())
    }

    /// Load and validate the global layer against `definition`.
    ///
    /// Fails if the global configuration cannot be loaded or does not
    /// satisfy the definition.
    pub fn with_definition<L, D>(
        loader: L,
        paths: PathTable,
        version: impl Into<String>,
        definition: D,
    ) -> Result<Self>
    where
        L: RepositoryLoader + 'static,
        D: Definition + 'static,
    {
        let global = LayerLoader::new(&loader, &paths).load_global()?;
        check_definitions(&global, &global, &definition)?;

        Ok(Self {
            loader: Box::new(loader),
            definition: Box::new(definition),
            paths,
            version: version.into(),
            env_name: DEFAULT_ENV.to_string(),
            repository: global.clone(),
            global,
            local: Repository::new(),
            environment: Repository::new(),
        })
    }

    /// Load the site configuration from `local_path` (or the global layer's
    /// `source`) and the override file for `env`, then rebuild the effective
    /// repository.
    ///
    /// On failure nothing changes: the new layers are staged and only
    /// committed after loading and validation succeed.
    pub fn load_local(&mut self, local_path: Option<&Path>, env: &str) -> Result<()> {
        let layers = LayerLoader::new(self.loader.as_ref(), &self.paths);
        let base_dir = layers.base_dir(local_path, &self.global);

        let local = layers.load_local(&base_dir)?;
        let environment = layers
            .load_environment(&base_dir, env)?
            .unwrap_or_default();

        let repository = merge_layers(&environment, &local, &self.global);
        check_definitions(&repository, &self.global, self.definition.as_ref())?;

        info!(
            env = %env,
            source = local.get_str(super::loader::SOURCE_KEY).unwrap_or_default(),
            keys = repository.len(),
            "Resolved site configuration"
        );

        self.env_name = env.to_string();
        self.local = local;
        self.environment = environment;
        self.repository = repository;
        Ok(())
    }

    /// Parse a YAML fragment into a standalone repository. Layer state is
    /// not touched.
    pub fn repository_inline(&self, config: &str) -> Result<Repository> {
        self.loader.load_inline(config, Format::Yaml)
    }

    pub fn create_blank_repository(&self) -> Repository {
        Repository::new()
    }

    /// The effective repository: global until `load_local` succeeds, then
    /// environment over local over global.
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn global(&self) -> &Repository {
        &self.global
    }

    pub fn local(&self) -> &Repository {
        &self.local
    }

    pub fn environment(&self) -> &Repository {
        &self.environment
    }

    /// Name of the current environment. `dev` until `load_local` says otherwise.
    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    /// The config filename. Typically `config.yml`.
    pub fn config_filename(&self) -> &str {
        self.paths.config_file()
    }

    /// The environment config filename, `None` for `dev`.
    pub fn config_environment_filename(&self) -> Option<String> {
        self.paths.env_filename(&self.env_name)
    }

    /// The environment config filename with a wildcard: `config_*.yml`.
    pub fn config_environment_filename_wildcard(&self) -> String {
        self.paths.env_filename_wildcard()
    }

    pub fn app_version(&self) -> &str {
        &self.version
    }

    /// Standard paths and filenames of the application.
    pub fn paths(&self) -> &PathTable {
        &self.paths
    }

    /// True when the current environment is the `dev` baseline.
    pub fn is_dev(&self) -> bool {
        paths::is_dev(&self.env_name)
    }
}
