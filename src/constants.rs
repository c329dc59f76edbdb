//! Centralized constants used across the application.
//!
//! Editor defaults here are also the serde defaults of the persisted editor
//! settings, so a config file without them behaves like a fresh install.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Maximum number of recent feature files to remember in config
pub const MAX_RECENT_FILES: usize = 5;

/// Screen distance within which a click or drag lands on a vertex
pub const DEFAULT_HIT_THRESHOLD_PX: f32 = 20.0;

/// Minimum time between two applied drag samples
pub const DEFAULT_DRAG_INTERVAL_SECS: f64 = 1.0 / 240.0;

/// Quiet period after a drag before observers are told the features changed
pub const DEFAULT_NOTIFY_QUIET_MS: u64 = 100;

/// Padding added on each side of fitted bounds, as a fraction of the span
pub const DEFAULT_BOUNDS_PADDING: f64 = 0.1;

/// Smallest viewport span in degrees when fitting bounds
pub const DEFAULT_MIN_SPAN_DEGREES: f64 = 0.001;

/// Pointer travel in pixels that turns a press into a drag
pub const DRAG_SLOP_PX: f32 = 3.0;

/// Two clicks closer together than this form a double-click
pub const DOUBLE_CLICK_SECS: f64 = 0.35;

/// World units per degree of the equirectangular canvas projection
pub const WORLD_UNITS_PER_DEGREE: f64 = 10_000.0;

/// Vertex handle radius in screen pixels
pub const HANDLE_RADIUS_PX: f32 = 5.0;

/// Closest camera zoom (world units per screen pixel)
pub const MIN_ZOOM_SCALE: f32 = 1e-4;

/// Farthest camera zoom (world units per screen pixel)
pub const MAX_ZOOM_SCALE: f32 = 1e4;
