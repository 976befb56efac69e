use std::fmt;

use rust_cast::channels::media;

/// App ids a receiver reports while it shows its idle screen or backdrop
pub const IDLE_APP_IDS: [&str; 2] = ["E8C28D3C", "Backdrop"];

/// Media player state of the app running on the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Playing,
    Paused,
    Buffering,
    Idle,
}

impl PlayerState {
    /// Whether a media session is loaded, playing or not
    pub fn is_engaged(&self) -> bool {
        matches!(
            self,
            PlayerState::Playing | PlayerState::Paused | PlayerState::Buffering
        )
    }
}

impl From<&media::PlayerState> for PlayerState {
    fn from(state: &media::PlayerState) -> Self {
        match state {
            media::PlayerState::Playing => PlayerState::Playing,
            media::PlayerState::Paused => PlayerState::Paused,
            media::PlayerState::Buffering => PlayerState::Buffering,
            _ => PlayerState::Idle,
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayerState::Playing => "PLAYING",
            PlayerState::Paused => "PAUSED",
            PlayerState::Buffering => "BUFFERING",
            PlayerState::Idle => "IDLE",
        };
        f.write_str(label)
    }
}

/// Point-in-time snapshot of a receiver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceStatus {
    /// Id of the foreground application, `None` when nothing runs
    pub app_id: Option<String>,
    pub display_name: Option<String>,
    /// `None` when the app has no media session or it could not be read
    pub player_state: Option<PlayerState>,
    /// Receiver volume in `[0, 1]`
    pub volume_level: Option<f32>,
    pub is_stand_by: bool,
    pub is_active_input: bool,
}

impl DeviceStatus {
    /// True when the foreground app is one of the idle/backdrop screens
    pub fn is_idle_app(&self) -> bool {
        self.app_id
            .as_deref()
            .map(|id| IDLE_APP_IDS.contains(&id))
            .unwrap_or(false)
    }
}
