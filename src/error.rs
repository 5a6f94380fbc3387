/// Errors surfaced by the dispatcher.
///
/// A `Blocked` rejection from the service is not one of these: the loop
/// observes and reports it, then moves on. `DispatchError` is reserved for
/// precondition violations caught before the loop starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl DispatchError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
