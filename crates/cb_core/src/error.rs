use thiserror::Error;

use crate::engine::physics::BodyHandle;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A component was driven with a body handle the provider does not know.
    #[error("Rigid body not initialized: {0}")]
    BodyNotInitialized(BodyHandle),

    /// Negative or non-finite tick delta reached a component that assumes `dt >= 0`.
    #[error("Invalid tick delta: {0}")]
    InvalidDelta(f32),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CoreError {
    /// Precondition violations are programming errors on the caller's side.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, CoreError::BodyNotInitialized(_) | CoreError::InvalidDelta(_))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Reject a precondition violation.
///
/// Returns the error to the caller, or panics when `strict_contracts` is enabled (CI builds).
pub(crate) fn contract_violation<T>(err: CoreError) -> Result<T> {
    tracing::warn!(error = %err, "contract violation");
    if cfg!(feature = "strict_contracts") {
        panic!("contract violation: {err}");
    }
    Err(err)
}
