//! Shared configuration and catalog types for the vimark workspace.

mod app_config;
mod catalog;
mod config;
mod error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, CatalogFile, Product};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
