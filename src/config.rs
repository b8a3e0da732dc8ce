use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::search::{DEFAULT_LIMIT, DEFAULT_THRESHOLD};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("plugins.json"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}
fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            limit: default_limit(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_path()?;
        if let Some(path) = config_path {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str(&content).with_context(|| "Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    fn find_config_path() -> Result<Option<PathBuf>> {
        // Explicit override wins, mainly for scripting and tests.
        if let Some(explicit) = std::env::var_os("PLUGSEEK_CONFIG") {
            return Ok(Some(PathBuf::from(explicit)));
        }

        if let Some(xdg_config) = dirs::config_dir() {
            let xdg_path = xdg_config.join("plugseek/config.toml");
            if xdg_path.exists() {
                return Ok(Some(xdg_path));
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_path = home.join(".plugseek.toml");
            if home_path.exists() {
                return Ok(Some(home_path));
            }
        }

        let current_path = Path::new(".plugseek.toml");
        if current_path.exists() {
            return Ok(Some(current_path.to_path_buf()));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_search_constants() {
        let config = Config::default();
        assert_eq!(config.search.threshold, DEFAULT_THRESHOLD);
        assert_eq!(config.search.limit, DEFAULT_LIMIT);
        assert_eq!(config.catalog.path, PathBuf::from("plugins.json"));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str("[search]\nthreshold = 0.3\n").unwrap();
        assert_eq!(config.search.threshold, 0.3);
        assert_eq!(config.search.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.search.limit, config.search.limit);
    }
}
