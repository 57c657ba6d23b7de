use thiserror::Error;

use crate::api::history::LoadError;
use crate::config::ConfigError;
use crate::services::chart_service::ChartError;
use crate::services::notify_service::NotifyError;

/// Anything that aborts a dashboard run
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
