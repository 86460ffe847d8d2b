use std::sync::Arc;

use reqwest::Client;
use serde_json::json;
use shared::{
    domain::{Command, ConnectionState, PRESET_MAX, PRESET_MIN, VOLUME_MAX},
    protocol::{ConfigureRequest, ErrorBody, PlaybackStatus, VolumeState},
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info};
use url::form_urlencoded;

mod poller;

pub use poller::{StatusPoller, POLL_INTERVAL};

/// Label rendered when the device reports nothing identifiable playing.
pub const NOT_PLAYING_LABEL: &str = "Not Playing";

#[derive(Debug, Error)]
pub enum PanelError {
    /// Non-2xx response; `detail` comes from the device API's error body.
    #[error("{detail}")]
    Server { detail: String },
    /// The request never completed: unreachable host, timeout, or a
    /// malformed response body.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("device hostname must not be empty")]
    InvalidHostname,
    #[error("volume {0} is out of range (0-{VOLUME_MAX})")]
    VolumeOutOfRange(u8),
    #[error("preset {0} is out of range ({PRESET_MIN}-{PRESET_MAX})")]
    PresetOutOfRange(u8),
}

#[derive(Debug, Clone)]
pub enum PanelEvent {
    ConnectionChanged(ConnectionState),
    StatusUpdated(StatusRender),
    VolumeUpdated(u8),
    Error(String),
}

/// Precomputed render model for one status snapshot, so label precedence
/// and art proxying stay in the core rather than in every front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRender {
    /// Track name, else station name, else content-item name, else the
    /// not-playing placeholder. Empty strings count as absent.
    pub label: String,
    /// Empty when the device reports no artist.
    pub artist: String,
    /// `"<source>"`, or `"<source> - <content name>"` when the content
    /// item is named.
    pub source_line: String,
    /// Same-origin proxy URL for the artwork; `None` hides the art element.
    pub art_url: Option<String>,
}

impl StatusRender {
    pub fn from_status(status: &PlaybackStatus) -> Self {
        let present = |field: &Option<String>| field.clone().filter(|value| !value.is_empty());

        let label = present(&status.track)
            .or_else(|| present(&status.station_name))
            .or_else(|| present(&status.content_item.name))
            .unwrap_or_else(|| NOT_PLAYING_LABEL.to_string());
        let source_line = match present(&status.content_item.name) {
            Some(name) => format!("{} - {}", status.source, name),
            None => status.source.clone(),
        };

        Self {
            label,
            artist: present(&status.artist).unwrap_or_default(),
            source_line,
            art_url: status
                .content_item
                .container_art
                .as_deref()
                .map(proxy_image_url),
        }
    }
}

/// Builds the same-origin relay path for a remote artwork URL. The relay
/// fetches the image on the device's behalf, sidestepping mixed-content
/// restrictions on whatever URL the device hands back.
pub fn proxy_image_url(art_url: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(art_url.as_bytes()).collect();
    format!("/proxy/image?url={encoded}")
}

/// Rendering seam between the panel core and whatever hosts it. All calls
/// arrive on the runtime's worker threads; implementations just paint.
pub trait PanelView: Send + Sync {
    fn connection_changed(&self, state: ConnectionState);
    fn render_status(&self, status: &StatusRender);
    fn render_volume(&self, actual: u8);
}

/// View for hosts that only consume [`PanelEvent`]s.
pub struct NullView;

impl PanelView for NullView {
    fn connection_changed(&self, _state: ConnectionState) {}
    fn render_status(&self, _status: &StatusRender) {}
    fn render_volume(&self, _actual: u8) {}
}

/// HTTP client for the device API. Every call resolves to a connection
/// state transition: success marks the panel connected, any failure marks
/// it errored, and the next success recovers it.
pub struct DeviceClient {
    http: Client,
    base_url: String,
    view: Arc<dyn PanelView>,
    connection: Mutex<ConnectionState>,
    events: broadcast::Sender<PanelEvent>,
}

impl DeviceClient {
    pub fn new(base_url: impl Into<String>) -> Arc<Self> {
        Self::with_view(base_url, Arc::new(NullView))
    }

    pub fn with_view(base_url: impl Into<String>, view: Arc<dyn PanelView>) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            view,
            connection: Mutex::new(ConnectionState::Unconfigured),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PanelEvent> {
        self.events.subscribe()
    }

    pub async fn connection_state(&self) -> ConnectionState {
        *self.connection.lock().await
    }

    async fn set_connection(&self, next: ConnectionState) {
        let changed = {
            let mut guard = self.connection.lock().await;
            if *guard == next {
                false
            } else {
                *guard = next;
                true
            }
        };
        if changed {
            self.view.connection_changed(next);
            let _ = self.events.send(PanelEvent::ConnectionChanged(next));
        }
    }

    async fn fail(&self, err: &PanelError) {
        error!("device call failed: {err}");
        self.set_connection(ConnectionState::Error).await;
        let _ = self.events.send(PanelEvent::Error(err.to_string()));
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, PanelError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = match response.json::<ErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => status.to_string(),
        };
        Err(PanelError::Server { detail })
    }

    /// Points the panel at a device. An empty or whitespace hostname is
    /// rejected before any request goes out, leaving connection state
    /// untouched so the prompt can simply be retried. One attempt, no retry.
    pub async fn configure(&self, hostname: &str) -> Result<(), PanelError> {
        let hostname = hostname.trim();
        if hostname.is_empty() {
            return Err(PanelError::InvalidHostname);
        }

        let result = async {
            let response = self
                .http
                .post(format!("{}/device/configure", self.base_url))
                .json(&ConfigureRequest {
                    hostname: hostname.to_string(),
                })
                .send()
                .await?;
            Self::check_response(response).await?;
            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                info!(hostname, "device configured");
                self.set_connection(ConnectionState::Connected).await;
                Ok(())
            }
            Err(err) => {
                self.fail(&err).await;
                Err(err)
            }
        }
    }

    /// Posts one command to its `/device/<endpoint>` path. Success triggers
    /// exactly one status refresh so the panel reflects the new device
    /// state; failure marks the connection errored and rolls nothing back.
    pub async fn send_command(
        &self,
        command: Command,
        payload: Option<serde_json::Value>,
    ) -> Result<(), PanelError> {
        let result = async {
            let mut request = self
                .http
                .post(format!("{}/device/{}", self.base_url, command.endpoint()));
            if let Some(payload) = &payload {
                request = request.json(payload);
            }
            let response = request.send().await?;
            Self::check_response(response).await?;
            Ok(())
        }
        .await;

        match result {
            Ok(()) => self.refresh_status().await,
            Err(err) => {
                self.fail(&err).await;
                Err(err)
            }
        }
    }

    pub async fn power(&self) -> Result<(), PanelError> {
        self.send_command(Command::Power, None).await
    }

    pub async fn play(&self) -> Result<(), PanelError> {
        self.send_command(Command::Play, None).await
    }

    pub async fn pause(&self) -> Result<(), PanelError> {
        self.send_command(Command::Pause, None).await
    }

    pub async fn prev_track(&self) -> Result<(), PanelError> {
        self.send_command(Command::PrevTrack, None).await
    }

    pub async fn next_track(&self) -> Result<(), PanelError> {
        self.send_command(Command::NextTrack, None).await
    }

    pub async fn thumbs_up(&self) -> Result<(), PanelError> {
        self.send_command(Command::ThumbsUp, None).await
    }

    pub async fn thumbs_down(&self) -> Result<(), PanelError> {
        self.send_command(Command::ThumbsDown, None).await
    }

    /// Sets the device volume. The view gets the new value immediately as
    /// feedback, before the request completes; a failed command leaves that
    /// optimistic value in place.
    pub async fn set_volume(&self, value: u8) -> Result<(), PanelError> {
        if value > VOLUME_MAX {
            return Err(PanelError::VolumeOutOfRange(value));
        }
        self.view.render_volume(value);
        let _ = self.events.send(PanelEvent::VolumeUpdated(value));
        self.send_command(Command::Volume, Some(json!({ "value": value })))
            .await
    }

    pub async fn set_preset(&self, value: u8) -> Result<(), PanelError> {
        if !(PRESET_MIN..=PRESET_MAX).contains(&value) {
            return Err(PanelError::PresetOutOfRange(value));
        }
        self.send_command(Command::Preset, Some(json!({ "value": value })))
            .await
    }

    /// Fetches the current device volume and renders `actual`.
    pub async fn fetch_volume(&self) -> Result<VolumeState, PanelError> {
        let result = async {
            let response = self
                .http
                .get(format!("{}/device/volume", self.base_url))
                .send()
                .await?;
            let volume: VolumeState = Self::check_response(response).await?.json().await?;
            Ok(volume)
        }
        .await;

        match result {
            Ok(volume) => {
                self.set_connection(ConnectionState::Connected).await;
                self.view.render_volume(volume.actual);
                let _ = self.events.send(PanelEvent::VolumeUpdated(volume.actual));
                Ok(volume)
            }
            Err(err) => {
                self.fail(&err).await;
                Err(err)
            }
        }
    }

    /// One full status refresh: fetch, render, update the connection
    /// indicator. On failure whatever was rendered last stays on screen.
    pub async fn refresh_status(&self) -> Result<(), PanelError> {
        let result = async {
            let response = self
                .http
                .get(format!("{}/device/status", self.base_url))
                .send()
                .await?;
            let status: PlaybackStatus = Self::check_response(response).await?.json().await?;
            Ok(status)
        }
        .await;

        match result {
            Ok(status) => {
                let render = StatusRender::from_status(&status);
                self.view.render_status(&render);
                self.set_connection(ConnectionState::Connected).await;
                let _ = self.events.send(PanelEvent::StatusUpdated(render));
                Ok(())
            }
            Err(err) => {
                self.fail(&err).await;
                Err(err)
            }
        }
    }
}

/// The full panel: a [`DeviceClient`] plus the [`StatusPoller`] that keeps
/// its view current. Hosting shells call [`ControlPanel::bring_up`] on
/// mount and [`ControlPanel::shut_down`] on teardown.
pub struct ControlPanel {
    client: Arc<DeviceClient>,
    poller: StatusPoller,
}

impl ControlPanel {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_view(base_url, Arc::new(NullView))
    }

    pub fn with_view(base_url: impl Into<String>, view: Arc<dyn PanelView>) -> Self {
        Self::with_options(base_url, view, POLL_INTERVAL)
    }

    pub fn with_options(
        base_url: impl Into<String>,
        view: Arc<dyn PanelView>,
        poll_interval: std::time::Duration,
    ) -> Self {
        let client = DeviceClient::with_view(base_url, view);
        let poller = StatusPoller::with_interval(Arc::clone(&client), poll_interval);
        Self { client, poller }
    }

    pub fn client(&self) -> &Arc<DeviceClient> {
        &self.client
    }

    pub fn poller(&self) -> &StatusPoller {
        &self.poller
    }

    /// Configures the device, then brings the panel up: an initial volume
    /// fetch followed by the recurring status poll. A failed volume fetch
    /// is already reflected on the indicator and does not stop the poll
    /// from starting.
    pub async fn bring_up(&self, hostname: &str) -> Result<(), PanelError> {
        self.client.configure(hostname).await?;
        let _ = self.client.fetch_volume().await;
        self.poller.start().await;
        Ok(())
    }

    pub async fn shut_down(&self) {
        self.poller.stop().await;
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/poller_tests.rs"]
mod poller_tests;
