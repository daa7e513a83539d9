use tasting_survey_notify::NotifyError;
use tasting_survey_types::CatalogError;
use thiserror::Error;

use crate::config::ConfigError;

/// Anything that keeps the server from starting or serving.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Mail setup failed: {0}")]
    Notify(#[from] NotifyError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}
