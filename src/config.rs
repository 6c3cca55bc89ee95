//! Dashboard settings.
//!
//! Resolution order: built-in defaults, then a TOML file, then CLI flags
//! (applied by the binary). The file is looked up as:
//! 1. an explicit path (must exist),
//! 2. `econ-dash.toml` in the working directory,
//! 3. `<config dir>/econ-dash/config.toml`.
//!
//! ```toml
//! data_path = "data/final_economic_data.csv"
//! icon_path = "data/icon.webp"
//! locale = "de"
//!
//! [year_range]
//! min = 2005
//! max = 2020
//! ```

use crate::error::ConfigError;
use crate::models::YearRange;
use crate::store::{DEFAULT_DATA_PATH, DEFAULT_ICON_PATH};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "econ-dash.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub icon_path: PathBuf,
    /// Year range applied to the data table, charts and cards.
    pub year_range: YearRange,
    /// Year range of the GDP Growth map.
    pub map_year_range: YearRange,
    /// Locale tag for metric cards; unset means plain `1234.50` formatting.
    pub locale: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            icon_path: PathBuf::from(DEFAULT_ICON_PATH),
            year_range: YearRange::default(),
            map_year_range: YearRange::default(),
            locale: None,
        }
    }
}

impl DashboardConfig {
    /// Parse a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        debug!("loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Resolve the config: `explicit` if given, else the first existing
    /// default location, else built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(p) = explicit {
            return Self::from_file(p);
        }
        match default_locations().into_iter().find(|p| p.is_file()) {
            Some(p) => Self::from_file(p),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, r) in [("year_range", self.year_range), ("map_year_range", self.map_year_range)] {
            if r.min > r.max {
                return Err(ConfigError::Invalid {
                    message: format!("{name}: start year {} is after end year {}", r.min, r.max),
                });
            }
        }
        Ok(())
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut out = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        out.push(dir.join("econ-dash").join("config.toml"));
    }
    out
}
