use std::future::Future;

use chromecast::{CastDevice, Discover};
use log::{error, info, warn};

use crate::activity::log_device_status;
use crate::config::RampConfig;
use crate::error::RampError;
use crate::ramp::VolumeRamp;

/// Discover, connect and ramp the configured device.
///
/// Discovery is stopped before returning, whatever the outcome.
pub async fn run<D, F>(discovery: &mut D, config: &RampConfig, interrupt: F) -> Result<(), RampError>
where
    D: Discover,
    F: Future,
{
    let result = connect_and_ramp(discovery, config, interrupt).await;
    discovery.stop_discovery();
    result
}

async fn connect_and_ramp<D, F>(
    discovery: &mut D,
    config: &RampConfig,
    interrupt: F,
) -> Result<(), RampError>
where
    D: Discover,
    F: Future,
{
    let device = find_device(discovery, &config.device_name)?;
    device.wait_ready()?;

    let initial_volume = initial_volume(&device, config.default_volume);
    VolumeRamp::new(&device, config, initial_volume)
        .run_until(interrupt)
        .await
}

/// Find the device whose friendly name is exactly `name`
pub fn find_device<D: Discover>(discovery: &mut D, name: &str) -> Result<D::Device, RampError> {
    info!("Searching for Chromecast devices...");
    let devices = discovery.discover_all()?;

    if devices.is_empty() {
        error!("No Chromecast found on the network");
        return Err(RampError::DeviceNotFound(name.to_string()));
    }

    let names: Vec<&str> = devices.iter().map(|device| device.name()).collect();
    info!("Discovered devices: {:?}", names);

    for device in devices {
        info!("Cast name: {}", device.name());
        if device.name() == name {
            return Ok(device);
        }
    }

    error!("Chromecast '{}' was not found", name);
    Err(RampError::DeviceNotFound(name.to_string()))
}

/// Volume to restore at the end, read once at startup
pub fn initial_volume<D: CastDevice>(device: &D, default_volume: f32) -> f32 {
    let status = match device.status() {
        Ok(status) => status,
        Err(e) => {
            warn!(
                "Failed to read the startup status ({}), using volume {:.2}",
                e, default_volume
            );
            return default_volume;
        }
    };

    log_device_status(&status);

    match status.volume_level {
        Some(volume) => {
            info!("Saved the startup volume: {:.2}", volume);
            volume
        }
        None => {
            warn!("Could not read the startup volume, using {:.2}", default_volume);
            default_volume
        }
    }
}
