use serde::{Deserialize, Serialize};

pub const VOLUME_MAX: u8 = 100;
pub const PRESET_MIN: u8 = 1;
pub const PRESET_MAX: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Unconfigured,
    Connected,
    Error,
}

/// Device commands exposed by the control API. Each maps onto a
/// `POST /device/<endpoint>` path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Power,
    Play,
    Pause,
    Volume,
    Preset,
    PrevTrack,
    NextTrack,
    ThumbsUp,
    ThumbsDown,
}

impl Command {
    pub fn endpoint(self) -> &'static str {
        match self {
            Command::Power => "power",
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Volume => "volume",
            Command::Preset => "preset",
            Command::PrevTrack => "prev_track",
            Command::NextTrack => "next_track",
            Command::ThumbsUp => "thumbs_up",
            Command::ThumbsDown => "thumbs_down",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_endpoints_match_device_api_paths() {
        assert_eq!(Command::Power.endpoint(), "power");
        assert_eq!(Command::PrevTrack.endpoint(), "prev_track");
        assert_eq!(Command::ThumbsDown.endpoint(), "thumbs_down");
    }

    #[test]
    fn connection_state_serializes_snake_case() {
        let state = serde_json::to_string(&ConnectionState::Unconfigured).expect("serialize");
        assert_eq!(state, "\"unconfigured\"");
    }
}
