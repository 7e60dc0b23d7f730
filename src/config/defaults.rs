//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default request timeout for the Gemini API in seconds (0 = no timeout)
pub const DEFAULT_TIMEOUT_SECS: u64 = 0;

/// Map id passed to the widget (required for advanced markers)
pub const DEFAULT_MAP_ID: &str = "GEOINFO_EXPLORER_MAP";

/// Initial map centre: the whole world around (0, 0)
pub const DEFAULT_INITIAL_LAT: f64 = 0.0;
pub const DEFAULT_INITIAL_LNG: f64 = 0.0;

/// Initial zoom level, shows most of the world
pub const DEFAULT_INITIAL_ZOOM: u8 = 2;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "geo-explorer";
