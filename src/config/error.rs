//! Configuration error types

use crate::error::DispatchError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration from {source_name}: {message}")]
    LoadFailed {
        source_name: String,
        message: String,
    },
}

impl ConfigurationError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn load_failed(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::LoadFailed {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }
}

impl From<ConfigurationError> for DispatchError {
    fn from(err: ConfigurationError) -> Self {
        DispatchError::Configuration(err.to_string())
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;
