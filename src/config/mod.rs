//! Layered site configuration.
//!
//! Resolves the effective configuration of a site from three layers:
//! 1. **Global** - Application defaults, `config.yml` in the application directory
//! 2. **Local** - The site's own `config.yml`
//! 3. **Environment** - `config_<env>.yml` next to the site config (skipped for `dev`)
//!
//! ## Precedence
//! Environment overrides local, local overrides global, key by key. Nested
//! mappings are merged field-by-field; lists and scalars are replaced.
//!
//! ## Validation
//! Only keys that also exist in the global layer are checked against the
//! definition, so sites can add options of their own.

mod configuration;
mod definition;
mod loader;
mod merge;
mod repository;
mod settings;

pub use configuration::{Configuration, DEFAULT_ENV};
pub use definition::{AcceptAll, Definition, Schema, Shape, describe};
pub use loader::{FileLoader, Format, LayerLoader, RepositoryLoader, SOURCE_KEY, parse_repository};
pub use merge::{check_definitions, deep_merge, deep_merge_all, merge_layers};
pub use repository::Repository;
pub use settings::Settings;
