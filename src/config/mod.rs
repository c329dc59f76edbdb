use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_BOUNDS_PADDING, DEFAULT_DRAG_INTERVAL_SECS, DEFAULT_HIT_THRESHOLD_PX,
    DEFAULT_MIN_SPAN_DEGREES, DEFAULT_NOTIFY_QUIET_MS, MAX_RECENT_FILES,
};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

fn default_hit_threshold_px() -> f32 {
    DEFAULT_HIT_THRESHOLD_PX
}

fn default_drag_interval_secs() -> f64 {
    DEFAULT_DRAG_INTERVAL_SECS
}

fn default_notify_quiet_ms() -> u64 {
    DEFAULT_NOTIFY_QUIET_MS
}

fn default_bounds_padding() -> f64 {
    DEFAULT_BOUNDS_PADDING
}

fn default_min_span_degrees() -> f64 {
    DEFAULT_MIN_SPAN_DEGREES
}

/// Tunables for hit testing, drag throttling and viewport fitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Screen distance within which a click lands on a vertex
    #[serde(default = "default_hit_threshold_px")]
    pub hit_threshold_px: f32,

    /// Minimum seconds between applied drag samples
    #[serde(default = "default_drag_interval_secs")]
    pub drag_interval_secs: f64,

    /// Quiet period after a drag before the change is announced
    #[serde(default = "default_notify_quiet_ms")]
    pub notify_quiet_ms: u64,

    /// Padding on each side of fitted bounds, as a fraction of the span
    #[serde(default = "default_bounds_padding")]
    pub bounds_padding: f64,

    /// Smallest span in degrees a fitted viewport may have
    #[serde(default = "default_min_span_degrees")]
    pub min_span_degrees: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            hit_threshold_px: DEFAULT_HIT_THRESHOLD_PX,
            drag_interval_secs: DEFAULT_DRAG_INTERVAL_SECS,
            notify_quiet_ms: DEFAULT_NOTIFY_QUIET_MS,
            bounds_padding: DEFAULT_BOUNDS_PADDING,
            min_span_degrees: DEFAULT_MIN_SPAN_DEGREES,
        }
    }
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfigData {
    /// Last opened feature file (not auto-loaded, just remembered for quick access)
    #[serde(default)]
    pub last_file_path: Option<PathBuf>,

    /// Recently opened or saved feature files, newest first
    #[serde(default)]
    pub recent_files: Vec<PathBuf>,

    #[serde(default)]
    pub editor: EditorSettings,
}

impl AppConfigData {
    /// Remember `path` as the last file and move it to the front of the recent list
    pub fn remember_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path.clone());
        self.recent_files.truncate(MAX_RECENT_FILES);
        self.last_file_path = Some(path);
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: get_config_path(),
            dirty: false,
        }
    }
}

/// Resource for the "last file missing" warning dialog
#[derive(Resource, Default)]
pub struct MissingFileWarning {
    pub show: bool,
    pub path: Option<PathBuf>,
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to update the last file path (and recent list) in config
#[derive(Message)]
pub struct UpdateLastFilePathRequest {
    pub path: PathBuf,
}

/// Get the path to the config file (platform-appropriate location)
fn get_config_path() -> PathBuf {
    crate::paths::config_file()
}

/// Result of loading config from disk
struct LoadConfigResult {
    data: AppConfigData,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Parse config file contents, falling back to defaults on error
fn parse_config(json: &str) -> LoadConfigResult {
    match serde_json::from_str(json) {
        Ok(data) => LoadConfigResult {
            data,
            reset_reason: None,
        },
        Err(e) => {
            warn!("Failed to parse config file: {}", e);
            LoadConfigResult {
                data: AppConfigData::default(),
                reset_reason: Some(format!("Configuration file was corrupted: {}", e)),
            }
        }
    }
}

/// Load configuration from disk
fn load_config(config_path: &Path) -> LoadConfigResult {
    if !config_path.exists() {
        info!("No config file found, using defaults");
        return LoadConfigResult {
            data: AppConfigData::default(),
            reset_reason: None,
        };
    }

    match std::fs::read_to_string(config_path) {
        Ok(json) => {
            let result = parse_config(&json);
            if result.reset_reason.is_none() {
                info!("Loaded config from {:?}", config_path);
            }
            result
        }
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            LoadConfigResult {
                data: AppConfigData::default(),
                reset_reason: Some(format!("Could not read configuration file: {}", e)),
            }
        }
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let config_path = get_config_path();
    let result = load_config(&config_path);
    config.data = result.data;
    config.config_path = config_path;
    config.dirty = false;

    // Set notification if config was reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// Startup system to check if the last file still exists
fn check_last_file_exists(config: Res<AppConfig>, mut warning: ResMut<MissingFileWarning>) {
    if let Some(ref path) = config.data.last_file_path
        && !path.exists()
    {
        warning.show = true;
        warning.path = Some(path.clone());
        info!("Last opened file no longer exists: {:?}", path);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

/// System to update the last file path
fn update_last_file_path_system(
    mut events: MessageReader<UpdateLastFilePathRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.remember_file(event.path.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<MissingFileWarning>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateLastFilePathRequest>()
            .add_systems(
                Startup,
                (load_config_system, check_last_file_exists)
                    .chain()
                    .in_set(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                    update_last_file_path_system.run_if(on_message::<UpdateLastFilePathRequest>),
                ),
            );
    }
}
