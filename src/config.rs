//! Runtime configuration for the raincheck CLI.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use raincheck_weather::{geocode, provider};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the append-only forecast cache.
    pub cache_file: PathBuf,

    /// Open-Meteo forecast endpoint.
    pub forecast_url: String,

    /// Nominatim search endpoint.
    pub geocode_url: String,

    /// Identifying User-Agent sent to the geocoding service
    /// (Nominatim requires an application name and contact).
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_file: PathBuf::from("weather_data.txt"),
            forecast_url: provider::OPEN_METEO_URL.to_string(),
            geocode_url: geocode::NOMINATIM_URL.to_string(),
            user_agent: "raincheck/0.1 (contact@example.com)".to_string(),
        }
    }
}

impl Config {
    /// Load from the platform config directory, falling back to defaults.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from a specific file. A missing or malformed file falls back to
    /// defaults; malformed content is warned about rather than fatal.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!("Could not read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("raincheck").join("config.json"))
    }
}
