use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::touch::ActivityArea;

const CONFIG_FILE_NAME: &str = "mt-hwstate.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub device: Option<PathBuf>,
    pub profile: Option<String>,
    pub event_size: Option<usize>,
    #[serde(default)]
    pub semi_mt: bool,
    pub finger_high: Option<i32>,
    pub device_id: Option<u32>,
    /// Fallback when the device reports no X/Y fuzz.
    pub hysteresis: Option<i32>,
    pub initial_slot: Option<usize>,
    #[serde(default)]
    pub area: ActivityArea,
}

pub fn load_from_path(path: &Path) -> Option<FileConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

pub fn load_from_default_paths() -> Option<FileConfig> {
    for path in default_config_paths() {
        if path.exists() {
            if let Some(config) = load_from_path(&path) {
                return Some(config);
            }
        }
    }
    None
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from(CONFIG_FILE_NAME));

    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".config").join(CONFIG_FILE_NAME));
    }

    paths
}
