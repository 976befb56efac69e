use chromecast::{CastDevice, DeviceStatus};
use log::{debug, info, warn};

/// Whether the device is showing user content.
///
/// Fails open: if the status cannot be read the device counts as active so
/// the ramp keeps going.
pub fn is_device_active<D: CastDevice>(device: &D) -> bool {
    match device.status() {
        Ok(status) => is_status_active(&status),
        Err(e) => {
            warn!("Failed to check the Chromecast state: {}", e);
            true
        }
    }
}

pub fn is_status_active(status: &DeviceStatus) -> bool {
    debug!(
        "Cast status - app_id: {:?}, display_name: {:?}, is_active_input: {}, is_stand_by: {}",
        status.app_id, status.display_name, status.is_active_input, status.is_stand_by
    );

    let Some(app_id) = status.app_id.as_deref() else {
        debug!("Chromecast is idle (no app running)");
        return false;
    };

    if status.is_idle_app() {
        debug!("Chromecast is idle (app_id: {})", app_id);
        return false;
    }

    if let Some(state) = status.player_state {
        debug!("Media player state: {}", state);
        if state.is_engaged() {
            return true;
        }
    }

    // Any foreground app counts, even without a media session
    debug!(
        "Chromecast is active - app: {} ({})",
        status.display_name.as_deref().unwrap_or("unknown"),
        app_id
    );
    true
}

/// Log a one-line summary of the device state
pub fn log_device_status(status: &DeviceStatus) {
    if is_status_active(status) {
        info!(
            "Chromecast state: active - app: {}",
            status
                .display_name
                .as_deref()
                .or(status.app_id.as_deref())
                .unwrap_or("unknown")
        );
        log_active_app_status(status);
    } else {
        info!("Chromecast state: idle");
    }
}

pub fn log_active_app_status(status: &DeviceStatus) {
    match status.player_state {
        Some(state) => info!("Playback state: {}", state),
        None => info!("Playback state: unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromecast::mock::MockCastDevice;
    use chromecast::{CastError, PlayerState};

    fn status(app_id: Option<&str>, player_state: Option<PlayerState>) -> DeviceStatus {
        DeviceStatus {
            app_id: app_id.map(str::to_string),
            display_name: app_id.map(|_| "Netflix".to_string()),
            player_state,
            volume_level: Some(0.5),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_app_is_inactive() {
        assert!(!is_status_active(&status(None, None)));
        assert!(!is_status_active(&status(None, Some(PlayerState::Playing))));
    }

    #[test]
    fn test_backdrop_is_inactive() {
        assert!(!is_status_active(&status(Some("E8C28D3C"), None)));
        assert!(!is_status_active(&status(Some("Backdrop"), Some(PlayerState::Idle))));
    }

    #[test]
    fn test_engaged_player_is_active() {
        for state in [PlayerState::Playing, PlayerState::Paused, PlayerState::Buffering] {
            assert!(is_status_active(&status(Some("CA5E8412"), Some(state))));
        }
    }

    #[test]
    fn test_running_app_without_player_state_is_active() {
        assert!(is_status_active(&status(Some("AndroidNativeApp"), None)));
        assert!(is_status_active(&status(Some("CA5E8412"), Some(PlayerState::Idle))));
    }

    #[test]
    fn test_status_error_fails_open() {
        let mut device = MockCastDevice::new();
        device
            .expect_status()
            .times(1)
            .returning(|| Err(CastError::NotConnected("Dell".into())));

        assert!(is_device_active(&device));
    }

    #[test]
    fn test_is_device_active_reads_status() {
        let mut device = MockCastDevice::new();
        device
            .expect_status()
            .times(1)
            .returning(|| Ok(status(None, None)));

        assert!(!is_device_active(&device));
    }
}
