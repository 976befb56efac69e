use std::future::Future;
use std::time::Duration;

use chromecast::CastDevice;
use log::{error, info, warn};
use tokio::time::sleep;

use crate::activity::is_device_active;
use crate::config::RampConfig;
use crate::error::RampError;

/// Wait before re-reading a volume the device did not report
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Wait after a volume or standby command before reading the device again
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Wait after restoring the volume on interrupt
pub const INTERRUPT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Volume after one step, rounded to hundredths and never below
/// `min_level - 1`.
pub fn next_level(current: f32, step: f32, min_level: f32) -> f32 {
    let stepped = f64::from(current) + f64::from(step);
    let rounded = ((stepped * 100.0).round() / 100.0) as f32;
    rounded.max(min_level - 1.0)
}

/// Step the volume down once.
///
/// Returns the level that was set, or `None` without touching the device
/// when `current` is already at the floor.
pub fn adjust_volume<D: CastDevice>(
    device: &D,
    current: f32,
    config: &RampConfig,
) -> Result<Option<f32>, RampError> {
    if current <= config.min_level {
        return Ok(None);
    }

    let new_level = next_level(current, config.step, config.min_level);
    device.set_volume(new_level)?;
    info!("Volume changed {:.2} -> {:.2}", current, new_level);
    Ok(Some(new_level))
}

/// Drives one device from its current volume down to the floor
pub struct VolumeRamp<'a, D> {
    device: &'a D,
    config: &'a RampConfig,
    initial_volume: f32,
}

impl<'a, D: CastDevice> VolumeRamp<'a, D> {
    pub fn new(device: &'a D, config: &'a RampConfig, initial_volume: f32) -> Self {
        Self {
            device,
            config,
            initial_volume,
        }
    }

    /// Step the volume down every interval until the floor is reached, then
    /// restore and put the device in standby.
    pub async fn run(&self) -> Result<(), RampError> {
        loop {
            if !is_device_active(self.device) {
                info!("Chromecast is in standby, skipping volume adjustment");
                sleep(self.config.interval).await;
                continue;
            }

            let Some(current) = self.device.status()?.volume_level else {
                warn!("Could not read the volume level, retrying");
                sleep(RETRY_DELAY).await;
                continue;
            };

            info!("Current volume: {:.2}", current);

            match adjust_volume(self.device, current, self.config)? {
                Some(_) => sleep(self.config.interval).await,
                None => {
                    info!("Reached the minimum volume ({:.2})", current);
                    self.restore_and_standby().await?;
                    info!("Ramp finished, exiting");
                    return Ok(());
                }
            }
        }
    }

    /// Run until finished or until `interrupt` resolves. On interrupt the
    /// initial volume is restored and `RampError::Interrupted` returned.
    pub async fn run_until<F: Future>(&self, interrupt: F) -> Result<(), RampError> {
        tokio::select! {
            result = self.run() => result,
            _ = interrupt => {
                info!("Interrupted, restoring the initial volume...");
                self.restore_after_interrupt().await;
                Err(RampError::Interrupted)
            }
        }
    }

    /// Put the initial volume back, then stop the foreground app unless the
    /// device already went idle.
    pub async fn restore_and_standby(&self) -> Result<(), RampError> {
        self.device.set_volume(self.initial_volume)?;
        info!("Restored the volume to {:.2}", self.initial_volume);
        sleep(SETTLE_DELAY).await;

        if is_device_active(self.device) {
            info!("Putting {} into standby", self.device.name());
            self.device.quit_app()?;
            sleep(SETTLE_DELAY).await;
            info!("{} is now in standby", self.device.name());
        } else {
            info!("{} is already in standby", self.device.name());
        }

        Ok(())
    }

    async fn restore_after_interrupt(&self) {
        match self.device.set_volume(self.initial_volume) {
            Ok(()) => {
                info!("Restored the volume to {:.2}", self.initial_volume);
                sleep(INTERRUPT_SETTLE_DELAY).await;
            }
            Err(e) => error!("Failed to restore the volume: {}", e),
        }
    }
}
