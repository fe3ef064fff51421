//! Configuration file parser for the MTD analysis

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};
use thiserror::Error;

use units::Time;

use crate::aggregator::Settings;
use crate::timewalk::TimeWalk;
use crate::types::Energyf32;

fn deserialize_uom<'d, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'d>,
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    <&str>::deserialize(deserializer)?
        .parse::<T>()
        .map_err(de::Error::custom)
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub barrel: RegionConfig,
    /// Endcap analysis is skipped when absent
    pub endcap: Option<RegionConfig>,
    #[serde(default)]
    pub timewalk: TimeWalk,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegionConfig {
    #[serde(deserialize_with = "deserialize_uom")]
    pub integration_window: Time,
    /// MeV
    #[serde(default)]
    pub minimum_energy: Energyf32,
}

impl From<RegionConfig> for Settings {
    fn from(RegionConfig { integration_window, minimum_energy }: RegionConfig) -> Self {
        Settings { integration_window, minimum_energy }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("couldn't read config file `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid config file `{path}`: {source}")]
    Toml { path: PathBuf, source: toml::de::Error },
}

pub fn read_config_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref().to_path_buf();
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(source) => return Err(ConfigError::Io { path, source }),
    };
    toml::from_str(&text).map_err(|source| ConfigError::Toml { path, source })
}
