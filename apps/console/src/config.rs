use std::{collections::HashMap, fs};

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub hostname: String,
    pub poll_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            hostname: String::new(),
            poll_interval_ms: 5000,
        }
    }
}

/// Layered settings: defaults, then `panel.toml`, then environment, then
/// whatever the CLI passed in.
pub fn load_settings(cli_base_url: Option<String>, cli_hostname: Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("panel.toml") {
        apply_file_overrides(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("PANEL_BASE_URL") {
        settings.base_url = v;
    }
    if let Ok(v) = std::env::var("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Ok(v) = std::env::var("PANEL_HOSTNAME") {
        settings.hostname = v;
    }
    if let Ok(v) = std::env::var("APP__HOSTNAME") {
        settings.hostname = v;
    }

    if let Ok(v) = std::env::var("APP__POLL_INTERVAL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.poll_interval_ms = parsed;
        }
    }

    if let Some(v) = cli_base_url {
        settings.base_url = v;
    }
    if let Some(v) = cli_hostname {
        settings.hostname = v;
    }

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("base_url") {
        settings.base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("hostname") {
        settings.hostname = v.clone();
    }
    if let Some(v) = file_cfg.get("poll_interval_ms") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.poll_interval_ms = parsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_bridge() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, "http://127.0.0.1:8000");
        assert!(settings.hostname.is_empty());
        assert_eq!(settings.poll_interval_ms, 5000);
    }

    #[test]
    fn file_overrides_apply_known_keys() {
        let mut settings = Settings::default();
        apply_file_overrides(
            &mut settings,
            r#"
            base_url = "http://bridge:9000"
            hostname = "speaker.local"
            poll_interval_ms = "2500"
            "#,
        );
        assert_eq!(settings.base_url, "http://bridge:9000");
        assert_eq!(settings.hostname, "speaker.local");
        assert_eq!(settings.poll_interval_ms, 2500);
    }

    #[test]
    fn malformed_file_leaves_defaults_alone() {
        let mut settings = Settings::default();
        apply_file_overrides(&mut settings, "not = [valid");
        assert_eq!(settings.base_url, Settings::default().base_url);
    }
}
