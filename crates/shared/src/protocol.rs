use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigureRequest {
    pub hostname: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeRequest {
    pub value: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PresetRequest {
    pub value: u8,
}

/// Error body returned by the device API on any non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// The media unit the device reports as currently loaded: a track, a
/// station, or a preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_art: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<String>,
    #[serde(default)]
    pub content_item: ContentItem,
}

/// Device volume snapshot. `target` is where the device is ramping to,
/// `actual` is the level it is at right now.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeState {
    pub target: u8,
    pub actual: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_status_parses_with_all_optional_fields_missing() {
        let status: PlaybackStatus =
            serde_json::from_str(r#"{"source":"STANDBY","content_item":{}}"#).expect("parse");
        assert_eq!(status.source, "STANDBY");
        assert!(status.track.is_none());
        assert!(status.station_name.is_none());
        assert!(status.content_item.name.is_none());
        assert!(status.content_item.container_art.is_none());
    }

    #[test]
    fn playback_status_parses_full_radio_payload() {
        let status: PlaybackStatus = serde_json::from_str(
            r#"{
                "station_name": "Radio Paradise",
                "source": "INTERNET_RADIO",
                "content_item": {
                    "name": "Radio Paradise",
                    "container_art": "http://cdn.example/art.jpg"
                }
            }"#,
        )
        .expect("parse");
        assert_eq!(status.station_name.as_deref(), Some("Radio Paradise"));
        assert_eq!(
            status.content_item.container_art.as_deref(),
            Some("http://cdn.example/art.jpg")
        );
    }

    #[test]
    fn volume_state_round_trips() {
        let volume: VolumeState =
            serde_json::from_str(r#"{"target":40,"actual":35}"#).expect("parse");
        assert_eq!(volume.target, 40);
        assert_eq!(volume.actual, 35);
    }

    #[test]
    fn error_body_exposes_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":"Device not configured"}"#).expect("parse");
        assert_eq!(body.detail, "Device not configured");
    }
}
