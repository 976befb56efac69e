use std::cell::Cell;

use log::{debug, info};
use rust_cast::channels::receiver::Application;
use rust_cast::CastDevice as RustCastDevice;

use crate::device::DeviceInfo;
use crate::error::{CastError, Result};
use crate::model::{DeviceStatus, PlayerState};

const RECEIVER_DESTINATION: &str = "receiver-0";
const MEDIA_NAMESPACE: &str = "urn:x-cast:com.google.cast.media";

/// Capabilities the volume ramp needs from a playback device
pub trait CastDevice {
    /// Friendly name the device was discovered under
    fn name(&self) -> &str;

    /// Block until the device accepts commands
    fn wait_ready(&self) -> Result<()>;

    /// Read a fresh status snapshot
    fn status(&self) -> Result<DeviceStatus>;

    /// Set the receiver volume, `level` in `[0, 1]`
    fn set_volume(&self, level: f32) -> Result<()>;

    /// Stop the foreground app, leaving the device in standby
    fn quit_app(&self) -> Result<()>;
}

/// Controls a single Cast receiver over CASTV2.
///
/// Every call opens its own TLS session: receivers drop sockets that stop
/// answering heartbeats, and the ramp sleeps far longer than the heartbeat
/// window between calls.
#[derive(Debug)]
pub struct CastController {
    info: DeviceInfo,
    ready: Cell<bool>,
}

impl CastController {
    pub fn new(info: DeviceInfo) -> Self {
        Self {
            info,
            ready: Cell::new(false),
        }
    }

    fn connect(&self) -> Result<RustCastDevice<'static>> {
        let device =
            RustCastDevice::connect_without_host_verification(self.info.host.clone(), self.info.port)
                .map_err(|e| CastError::communication(&self.info.name, e))?;

        device
            .connection
            .connect(RECEIVER_DESTINATION)
            .map_err(|e| CastError::communication(&self.info.name, e))?;

        Ok(device)
    }

    fn session(&self) -> Result<RustCastDevice<'static>> {
        if !self.ready.get() {
            return Err(CastError::NotConnected(self.info.name.clone()));
        }
        self.connect()
    }

    /// Media state of `app`; `None` when it cannot be read
    fn player_state(device: &RustCastDevice<'static>, app: &Application) -> Option<PlayerState> {
        if !app.namespaces.iter().any(|ns| ns == MEDIA_NAMESPACE) {
            return None;
        }

        if let Err(e) = device.connection.connect(app.transport_id.clone()) {
            debug!("Could not connect to media transport {}: {}", app.transport_id, e);
            return None;
        }

        match device.media.get_status(app.transport_id.clone(), None) {
            Ok(status) => status
                .entries
                .first()
                .map(|entry| PlayerState::from(&entry.player_state)),
            Err(e) => {
                debug!("Could not read media status: {}", e);
                None
            }
        }
    }
}

impl CastDevice for CastController {
    fn name(&self) -> &str {
        &self.info.name
    }

    fn wait_ready(&self) -> Result<()> {
        let device = self.connect()?;
        device
            .heartbeat
            .ping()
            .map_err(|e| CastError::communication(&self.info.name, e))?;

        self.ready.set(true);
        info!("Connected to {}", self.info);
        Ok(())
    }

    fn status(&self) -> Result<DeviceStatus> {
        let device = self.session()?;
        let receiver = device
            .receiver
            .get_status()
            .map_err(|e| CastError::communication(&self.info.name, e))?;

        let app = receiver.applications.first();
        let player_state = app.and_then(|app| Self::player_state(&device, app));

        Ok(DeviceStatus {
            app_id: app.map(|app| app.app_id.clone()),
            display_name: app.map(|app| app.display_name.clone()),
            player_state,
            volume_level: receiver.volume.level,
            is_stand_by: receiver.is_stand_by,
            is_active_input: receiver.is_active_input,
        })
    }

    fn set_volume(&self, level: f32) -> Result<()> {
        if level.is_nan() {
            return Err(CastError::InvalidVolume(level));
        }

        let device = self.session()?;
        device
            .receiver
            .set_volume(level.clamp(0.0, 1.0))
            .map_err(|e| CastError::communication(&self.info.name, e))?;
        Ok(())
    }

    fn quit_app(&self) -> Result<()> {
        let device = self.session()?;
        let receiver = device
            .receiver
            .get_status()
            .map_err(|e| CastError::communication(&self.info.name, e))?;

        match receiver.applications.first() {
            Some(app) => {
                debug!("Stopping {} ({})", app.display_name, app.app_id);
                device
                    .receiver
                    .stop_app(app.session_id.clone())
                    .map_err(|e| CastError::communication(&self.info.name, e))?;
            }
            None => debug!("No application running on {}", self.info.name),
        }
        Ok(())
    }
}
