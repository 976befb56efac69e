pub mod controller;
pub mod device;
pub mod discovery;
pub mod error;
pub mod model;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export key types for easier access
pub use controller::{CastController, CastDevice};
pub use device::{DeviceInfo, CAST_SERVICE_TYPE, DEFAULT_CAST_PORT};
pub use discovery::{Discover, MdnsDiscovery};
pub use error::{CastError, Result};
pub use model::{DeviceStatus, PlayerState, IDLE_APP_IDS};
