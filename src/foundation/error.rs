/// Convenience result type used across the crate.
pub type NtscResult<T> = Result<T, NtscError>;

/// Error taxonomy for the effect core, its adapters and devices.
///
/// None of these abort a host frame: adapters log and pass the frame through instead.
#[derive(thiserror::Error, Debug)]
pub enum NtscError {
    /// The shared shader program could not be resolved when an adapter initialized.
    #[error("missing shader: {0}")]
    MissingShader(String),

    /// A configuration document could not be read (parameters themselves are never validated).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A scratch target request was degenerate, doubled, leaked or released twice.
    #[error("resource acquisition failure: {0}")]
    ResourceAcquisition(String),

    /// A device failed to execute a recorded command.
    #[error("device error: {0}")]
    Device(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NtscError {
    /// Build a [`NtscError::MissingShader`] value.
    pub fn missing_shader(msg: impl Into<String>) -> Self {
        Self::MissingShader(msg.into())
    }

    /// Build a [`NtscError::InvalidConfiguration`] value.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Build a [`NtscError::ResourceAcquisition`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::ResourceAcquisition(msg.into())
    }

    /// Build a [`NtscError::Device`] value.
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
