/// Errors raised by the device controller
#[derive(Debug, thiserror::Error)]
pub enum CastError {
    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),

    #[error("Communication error with {device}: {source}")]
    CommunicationError {
        device: String,
        #[source]
        source: rust_cast::errors::Error,
    },

    #[error("Device {0} is not connected")]
    NotConnected(String),

    #[error("Invalid volume level: {0}")]
    InvalidVolume(f32),
}

impl CastError {
    pub(crate) fn communication(device: &str, source: rust_cast::errors::Error) -> Self {
        CastError::CommunicationError {
            device: device.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CastError>;
