//! Locations of configuration files

use std::path::{Path, PathBuf};

use etcetera::{BaseStrategy, choose_base_strategy};
use log::debug;

/// Name of both the user-level and the project-level configuration file
pub const CONFIG_FILE_NAME: &str = "funcstyle.toml";

const APP_DIR_NAME: &str = "funcstyle";

/// Per-user configuration directory (`$XDG_CONFIG_HOME/funcstyle` on Linux)
pub fn user_config_dir() -> Option<PathBuf> {
    match choose_base_strategy() {
        Ok(strategy) => Some(strategy.config_dir().join(APP_DIR_NAME)),
        Err(e) => {
            debug!("No home directory, skipping user configuration: {e}");
            None
        }
    }
}

/// Per-user configuration file, whether or not it exists
pub fn user_config_file() -> Option<PathBuf> {
    user_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Project configuration file next to the entry source
pub fn project_config_file(project_dir: &Path) -> PathBuf {
    project_dir.join(CONFIG_FILE_NAME)
}
