use std::{fs, path::Path, str::FromStr, time::Duration};

use serde::Deserialize;
use shared::protocol::{DEFAULT_ASK_PATH, DEFAULT_SERVICE_PORT};
use tracing::warn;

pub const SETTINGS_FILE: &str = "askpdf.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub service_scheme: String,
    pub service_host: String,
    pub service_port: u16,
    pub ask_path: String,
    /// Drop the previous answer as soon as a new question is submitted instead
    /// of leaving it on screen until the next one arrives.
    pub clear_answer_on_submit: bool,
    pub follow_acceleration: f32,
    pub follow_frame_interval_ms: u64,
    pub follow_height_factor: f32,
    pub follow_vertical_bias: f32,
    pub logo_mount_offset_x: f32,
    pub logo_mount_offset_y: f32,
    pub logo_mount_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_scheme: "http".into(),
            service_host: "127.0.0.1".into(),
            service_port: DEFAULT_SERVICE_PORT,
            ask_path: DEFAULT_ASK_PATH.into(),
            clear_answer_on_submit: false,
            follow_acceleration: 0.03,
            follow_frame_interval_ms: 16,
            follow_height_factor: 2.0,
            follow_vertical_bias: 0.0,
            logo_mount_offset_x: 35.0,
            logo_mount_offset_y: -40.0,
            logo_mount_delay_ms: 100,
        }
    }
}

impl Settings {
    pub fn follow_frame_interval(&self) -> Duration {
        Duration::from_millis(self.follow_frame_interval_ms.max(1))
    }

    pub fn logo_mount_delay(&self) -> Duration {
        Duration::from_millis(self.logo_mount_delay_ms)
    }
}

/// Reads `askpdf.toml` from the working directory, then applies `APP__*`
/// environment overrides.
pub fn load_settings() -> Settings {
    load_settings_with(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path) -> Settings {
    load_settings_with(path, |key| std::env::var(key).ok())
}

pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => parse_settings(&raw).unwrap_or_else(|err| {
            warn!(path = %path.display(), "ignoring unreadable settings file: {err}");
            Settings::default()
        }),
        Err(_) => Settings::default(),
    };
    apply_env_overrides(&mut settings, env);
    settings
}

pub fn parse_settings(raw: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(raw)
}

pub fn apply_env_overrides(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("APP__SERVICE_SCHEME") {
        settings.service_scheme = v;
    }
    if let Some(v) = env("APP__SERVICE_HOST") {
        settings.service_host = v;
    }
    override_parsed(&env, "APP__SERVICE_PORT", &mut settings.service_port);
    if let Some(v) = env("APP__ASK_PATH") {
        settings.ask_path = v;
    }
    override_parsed(
        &env,
        "APP__CLEAR_ANSWER_ON_SUBMIT",
        &mut settings.clear_answer_on_submit,
    );
    override_parsed(
        &env,
        "APP__FOLLOW_ACCELERATION",
        &mut settings.follow_acceleration,
    );
    override_parsed(
        &env,
        "APP__FOLLOW_FRAME_INTERVAL_MS",
        &mut settings.follow_frame_interval_ms,
    );
    override_parsed(
        &env,
        "APP__FOLLOW_HEIGHT_FACTOR",
        &mut settings.follow_height_factor,
    );
    override_parsed(
        &env,
        "APP__FOLLOW_VERTICAL_BIAS",
        &mut settings.follow_vertical_bias,
    );
    override_parsed(&env, "APP__LOGO_MOUNT_OFFSET_X", &mut settings.logo_mount_offset_x);
    override_parsed(&env, "APP__LOGO_MOUNT_OFFSET_Y", &mut settings.logo_mount_offset_y);
    override_parsed(&env, "APP__LOGO_MOUNT_DELAY_MS", &mut settings.logo_mount_delay_ms);
}

fn override_parsed<T: FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T) {
    let Some(raw) = env(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(key, value = %raw, "ignoring unparseable setting override"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
