use chromecast::CastError;

/// Errors that end a ramp run
#[derive(Debug, thiserror::Error)]
pub enum RampError {
    /// No discovered device carries the requested friendly name
    #[error("Chromecast '{0}' was not found on the network")]
    DeviceNotFound(String),

    #[error(transparent)]
    Device(#[from] CastError),

    /// The user cancelled the run (Ctrl-C)
    #[error("Interrupted")]
    Interrupted,
}

impl RampError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            RampError::DeviceNotFound(_) | RampError::Device(_) => 1,
            RampError::Interrupted => 130,
        }
    }
}
