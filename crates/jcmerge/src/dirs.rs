use std::path::{Path, PathBuf};

use etcetera::BaseStrategy;

/// File name looked up in every configuration location
pub const CONFIG_FILE_NAME: &str = "jcmerge.toml";

/// `$XDG_CONFIG_HOME/jcmerge` (or the platform equivalent)
pub fn user_jcmerge_config_dir() -> Option<PathBuf> {
    etcetera::choose_base_strategy()
        .map(|dirs| dirs.config_dir().join("jcmerge"))
        .ok()
}

/// The user-level configuration file, if the home directory can be resolved
pub fn user_config_file() -> Option<PathBuf> {
    user_jcmerge_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// The project-level configuration file living next to the library sources
pub fn project_config_file(library_dir: &Path) -> PathBuf {
    library_dir.join(CONFIG_FILE_NAME)
}
