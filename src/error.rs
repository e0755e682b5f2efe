use crate::lifecycle::LifecycleError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LifelineError>;

#[derive(Debug, Error)]
pub enum LifelineError {
    #[error("Module not found: {module}")]
    ModuleNotFound { module: String },

    #[error("Module already registered: {module}")]
    DuplicateModule { module: String },

    #[error("Module registration failed: {message}")]
    ModuleRegistrationFailed { message: String },

    #[error("Invalid configuration for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}
