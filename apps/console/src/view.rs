use panel_core::{PanelView, StatusRender};
use shared::domain::ConnectionState;

/// Renders panel updates as plain terminal lines: the connection
/// indicator, the now-playing block, and the volume readout.
#[derive(Debug, Default)]
pub struct ConsoleView;

impl PanelView for ConsoleView {
    fn connection_changed(&self, state: ConnectionState) {
        let indicator = match state {
            ConnectionState::Unconfigured => "not configured",
            ConnectionState::Connected => "connected",
            ConnectionState::Error => "error",
        };
        println!("[{indicator}]");
    }

    fn render_status(&self, status: &StatusRender) {
        println!("{}", status.label);
        if !status.artist.is_empty() {
            println!("  {}", status.artist);
        }
        println!("  {}", status.source_line);
        if let Some(art_url) = &status.art_url {
            println!("  art: {art_url}");
        }
    }

    fn render_volume(&self, actual: u8) {
        println!("  volume: {actual}");
    }
}
