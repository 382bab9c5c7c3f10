//! Server configuration
//!
//! Layered with `figment`: built-in defaults, then an optional TOML file,
//! then `INITD_*` environment variables. The binary merges CLI flags on top.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Config file read from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "initd.toml";

/// Prefix for environment overrides, e.g. `INITD_BIND_ADDR`
pub const ENV_PREFIX: &str = "INITD_";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Root holding `players/` and `monsters/`
    pub data_dir: PathBuf,
    /// Overrides `<data_dir>/players`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players_dir: Option<PathBuf>,
    /// Overrides `<data_dir>/monsters`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monsters_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            data_dir: PathBuf::from("./data"),
            players_dir: None,
            monsters_dir: None,
        }
    }
}

impl Config {
    /// Config for a data directory with the default bind address
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Defaults, then `file` (or `initd.toml`) if present, then environment
    pub fn figment(file: Option<&Path>) -> Figment {
        let file = file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extract a config from the default layers
    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(file).extract()
    }

    /// Directory holding player sources
    pub fn players_dir(&self) -> PathBuf {
        self.players_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("players"))
    }

    /// Directory holding monster sources, one encounter per file
    pub fn monsters_dir(&self) -> PathBuf {
        self.monsters_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("monsters"))
    }
}
