//! User configuration.
//!
//! Settings live in an INI file under the platform config directory
//! (`~/.config/milmarker/config.ini` on Linux):
//!
//! ```ini
//! [symbol]
//! default_size = 35
//! key_strategy = canonical
//!
//! [icon]
//! markup = svg
//! class_name =
//!
//! [orbit]
//! speed = 0.6
//! heading_threshold = 15
//! radius = 0.01
//! throttle = grid
//! fps = 60
//! ```

mod file;
mod keys;

pub use file::{
    config_file_path, ConfigError, ConfigFile, ConfigResult, IconSettings, OrbitSettings,
    SymbolSettings, DEFAULT_FPS,
};
pub use keys::ConfigKey;
