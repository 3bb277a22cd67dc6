use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::{ControllerConfig, DEFAULT_RESET_DELAY, MAX_COUNTER_VALUE};

pub const SETTINGS_FILE: &str = "counter.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub initial_value: u64,
    pub confirmation_latency_ms: u64,
    pub reset_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_value: 0,
            confirmation_latency_ms: 1500,
            reset_delay_ms: DEFAULT_RESET_DELAY.as_millis() as u64,
        }
    }
}

impl Settings {
    pub fn confirmation_latency(&self) -> Duration {
        Duration::from_millis(self.confirmation_latency_ms)
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            reset_delay: Duration::from_millis(self.reset_delay_ms),
        }
    }
}

/// Defaults, then `counter.toml` (or `path`), then `APP__*` environment
/// variables.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let file = path.unwrap_or_else(|| Path::new(SETTINGS_FILE));
    match fs::read_to_string(file) {
        Ok(raw) => {
            let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(&raw)
                .with_context(|| format!("failed to parse settings file '{}'", file.display()))?;
            apply_overrides(&mut settings, |key| {
                file_cfg.get(key).map(|v| match v {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
            })?;
        }
        Err(err) if path.is_some() => {
            return Err(err).with_context(|| {
                format!("failed to read settings file '{}'", file.display())
            });
        }
        Err(_) => {}
    }

    apply_overrides(&mut settings, |key| {
        std::env::var(format!("APP__{}", key.to_ascii_uppercase())).ok()
    })?;

    Ok(settings)
}

fn apply_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("initial_value") {
        settings.initial_value = parse_u64("initial_value", &v)?;
        anyhow::ensure!(
            settings.initial_value <= MAX_COUNTER_VALUE,
            "initial_value {} exceeds {MAX_COUNTER_VALUE}",
            settings.initial_value
        );
    }
    if let Some(v) = lookup("confirmation_latency_ms") {
        settings.confirmation_latency_ms = parse_u64("confirmation_latency_ms", &v)?;
    }
    if let Some(v) = lookup("reset_delay_ms") {
        settings.reset_delay_ms = parse_u64("reset_delay_ms", &v)?;
    }
    Ok(())
}

fn parse_u64(key: &str, raw: &str) -> anyhow::Result<u64> {
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("invalid value '{raw}' for {key}"))
}
