use crate::config::Config;
use std::path::{Path, PathBuf};

pub fn config_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../config")
}

/// The bundled game data
pub fn test_config() -> Config {
    Config::load_from_dir(&config_dir()).expect("bundled config should load")
}
