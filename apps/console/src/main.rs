use std::{sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use panel_core::ControlPanel;

mod config;
mod view;

use config::load_settings;
use view::ConsoleView;

#[derive(Parser, Debug)]
#[command(name = "soundpanel", about = "Terminal control panel for a networked speaker")]
struct Args {
    /// Device hostname or IP; overrides panel.toml and the environment.
    #[arg(long)]
    hostname: Option<String>,
    /// Base URL of the device API bridge.
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Keep the panel open and poll status until interrupted (default).
    Watch,
    /// Print one status snapshot and exit.
    Status,
    /// Toggle power.
    Power,
    Play,
    Pause,
    /// Set the volume (0-100).
    Volume { value: u8 },
    /// Select a preset (1-6).
    Preset { value: u8 },
    PrevTrack,
    NextTrack,
    ThumbsUp,
    ThumbsDown,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();
    let settings = load_settings(args.base_url, args.hostname);
    tracing::info!(base_url = %settings.base_url, "panel starting");

    let panel = ControlPanel::with_options(
        &settings.base_url,
        Arc::new(ConsoleView),
        Duration::from_millis(settings.poll_interval_ms),
    );

    let action = args.action.unwrap_or(Action::Watch);
    if let Action::Watch = action {
        panel.bring_up(&settings.hostname).await?;
        tokio::signal::ctrl_c().await?;
        panel.shut_down().await;
        return Ok(());
    }

    // One-shot actions: the bridge needs a configured device first, and the
    // command itself already triggers the status render on success.
    let client = panel.client();
    client.configure(&settings.hostname).await?;
    match action {
        Action::Watch => unreachable!(),
        Action::Status => {
            client.refresh_status().await?;
            let _ = client.fetch_volume().await;
        }
        Action::Power => client.power().await?,
        Action::Play => client.play().await?,
        Action::Pause => client.pause().await?,
        Action::Volume { value } => client.set_volume(value).await?,
        Action::Preset { value } => client.set_preset(value).await?,
        Action::PrevTrack => client.prev_track().await?,
        Action::NextTrack => client.next_track().await?,
        Action::ThumbsUp => client.thumbs_up().await?,
        Action::ThumbsDown => client.thumbs_down().await?,
    }

    Ok(())
}
