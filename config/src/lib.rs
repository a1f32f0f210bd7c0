//! Configuration loading for the simulator server.
//!
//! The file lives at `$ACIDSIM_CONFIG` or `~/.acidsim/config.toml`. A missing
//! file means defaults. Raw TOML structs are validated into resolved settings
//! at the parse boundary, so a loaded [`AcidsimConfig`] is always usable.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//! cors = true
//!
//! [simulation]
//! timestep_s = 1.0
//! speed = 1.0
//! autostart = false
//!
//! [log]
//! filter = "info"
//! file = "/var/log/acidsim.log"
//! ```

use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "ACIDSIM_CONFIG";
pub const BIND_ENV: &str = "ACIDSIM_BIND";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMESTEP_S: f64 = 1.0;
const DEFAULT_SPEED: f64 = 1.0;
/// One simulated hour per tick.
pub const MAX_TIMESTEP_S: f64 = 3600.0;
const MAX_SPEED: f64 = 100.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AcidsimConfig {
    pub server: ServerConfig,
    pub simulation: SimulationConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Answer CORS preflights and allow any origin.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            cors: true,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum SimulationConfigError {
    #[error("timestep_s must be in (0, 3600] seconds (got {0})")]
    Timestep(f64),
    #[error("speed must be a finite number (got {0})")]
    Speed(f64),
}

#[derive(Deserialize)]
#[serde(default)]
struct RawSimulationConfig {
    timestep_s: f64,
    speed: f64,
    autostart: bool,
}

impl Default for RawSimulationConfig {
    fn default() -> Self {
        Self {
            timestep_s: DEFAULT_TIMESTEP_S,
            speed: DEFAULT_SPEED,
            autostart: false,
        }
    }
}

/// Validated simulation settings.
///
/// Invariant: `timestep_s` is within `(0, MAX_TIMESTEP_S]`, `speed` is within
/// `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawSimulationConfig")]
pub struct SimulationConfig {
    timestep_s: f64,
    speed: f64,
    autostart: bool,
}

impl TryFrom<RawSimulationConfig> for SimulationConfig {
    type Error = SimulationConfigError;

    fn try_from(raw: RawSimulationConfig) -> Result<Self, Self::Error> {
        if !(raw.timestep_s > 0.0 && raw.timestep_s <= MAX_TIMESTEP_S) {
            return Err(SimulationConfigError::Timestep(raw.timestep_s));
        }
        if !raw.speed.is_finite() {
            return Err(SimulationConfigError::Speed(raw.speed));
        }
        Ok(Self {
            timestep_s: raw.timestep_s,
            speed: raw.speed.clamp(0.0, MAX_SPEED),
            autostart: raw.autostart,
        })
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep_s: DEFAULT_TIMESTEP_S,
            speed: DEFAULT_SPEED,
            autostart: false,
        }
    }
}

impl SimulationConfig {
    /// Physics timestep in simulated seconds per driver tick.
    #[must_use]
    pub fn timestep_s(&self) -> f64 {
        self.timestep_s
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub fn autostart(&self) -> bool {
        self.autostart
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` wins when set.
    pub filter: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl AcidsimConfig {
    /// Load the config file if one exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// Apply `ACIDSIM_BIND` from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Unparseable values are logged and ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(BIND_ENV) {
            match raw.trim().parse::<SocketAddr>() {
                Ok(addr) => self.server.bind = addr,
                Err(err) => tracing::warn!("Ignoring {BIND_ENV}={raw:?}: {err}"),
            }
        }
        self
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV)
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }
    dirs::home_dir().map(|home| home.join(".acidsim").join("config.toml"))
}
