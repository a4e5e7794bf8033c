//! Layered Site Configuration Library
//!
//! Resolves the effective configuration of a static site from global,
//! local, and per-environment layers.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod paths;
