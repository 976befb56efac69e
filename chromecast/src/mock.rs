use mockall::mock;

use crate::controller::CastDevice;
use crate::discovery::Discover;
use crate::error::Result;
use crate::model::{DeviceStatus, PlayerState};

mock! {
    pub CastDevice {}

    impl CastDevice for CastDevice {
        fn name(&self) -> &str;
        fn wait_ready(&self) -> Result<()>;
        fn status(&self) -> Result<DeviceStatus>;
        fn set_volume(&self, level: f32) -> Result<()>;
        fn quit_app(&self) -> Result<()>;
    }
}

/// Builds a `MockCastDevice` that answers every call successfully
pub struct MockCastDeviceBuilder {
    name: String,
    app_id: Option<String>,
    player_state: Option<PlayerState>,
    volume_level: Option<f32>,
}

impl MockCastDeviceBuilder {
    pub fn new() -> Self {
        Self {
            name: "Living Room TV".into(),
            app_id: Some("233637DE".into()),
            player_state: Some(PlayerState::Playing),
            volume_level: Some(0.5),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn app_id(mut self, app_id: Option<&str>) -> Self {
        self.app_id = app_id.map(str::to_string);
        self
    }

    pub fn player_state(mut self, player_state: Option<PlayerState>) -> Self {
        self.player_state = player_state;
        self
    }

    pub fn volume_level(mut self, volume_level: Option<f32>) -> Self {
        self.volume_level = volume_level;
        self
    }

    pub fn status(&self) -> DeviceStatus {
        DeviceStatus {
            app_id: self.app_id.clone(),
            display_name: self.app_id.as_ref().map(|_| "YouTube".to_string()),
            player_state: self.player_state,
            volume_level: self.volume_level,
            ..Default::default()
        }
    }

    pub fn build(self) -> MockCastDevice {
        let mut device = MockCastDevice::new();
        let status = self.status();

        device.expect_name().return_const(self.name);
        device.expect_wait_ready().returning(|| Ok(()));
        device
            .expect_status()
            .returning(move || Ok(status.clone()));
        device.expect_set_volume().returning(|_| Ok(()));
        device.expect_quit_app().returning(|| Ok(()));

        device
    }
}

impl Default for MockCastDeviceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Discovery over a fixed device list that counts `stop_discovery` calls
pub struct StaticDiscovery<D> {
    devices: Vec<D>,
    stop_calls: usize,
}

impl<D> StaticDiscovery<D> {
    pub fn new(devices: Vec<D>) -> Self {
        Self {
            devices,
            stop_calls: 0,
        }
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_calls > 0
    }
}

impl<D: CastDevice> Discover for StaticDiscovery<D> {
    type Device = D;

    fn discover_all(&mut self) -> Result<Vec<D>> {
        Ok(std::mem::take(&mut self.devices))
    }

    fn stop_discovery(&mut self) {
        self.stop_calls += 1;
    }
}
