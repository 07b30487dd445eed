//! Configuration – reads/writes `~/.asimov/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use asimov_link::{DEFAULT_PORT, DEFAULT_READ_TIMEOUT};
use asimov_runtime::BehaviorConfig;
use asimov_types::AsimovError;
use serde::{Deserialize, Serialize};

/// Persisted operator configuration stored in `~/.asimov/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Host running the robot server.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Drive the in-process simulator instead of a real robot.
    #[serde(default)]
    pub simulate: bool,

    /// How long to wait for each reply before the link is declared broken.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Pause after each beep.
    #[serde(default = "default_beep_settle_ms")]
    pub beep_settle_ms: u64,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT.as_millis() as u64
}
fn default_beep_settle_ms() -> u64 {
    asimov_hal::DEFAULT_BEEP_SETTLE.as_millis() as u64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            simulate: false,
            read_timeout_ms: default_read_timeout_ms(),
            beep_settle_ms: default_beep_settle_ms(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Config {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn beep_settle(&self) -> Duration {
        Duration::from_millis(self.beep_settle_ms)
    }
}

/// Return the path to `~/.asimov/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".asimov").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
///
/// Environment overrides are not applied; see [`apply_env_overrides`].
pub fn load() -> Result<Option<Config>, AsimovError> {
    load_from(&config_path())
}

pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, AsimovError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        AsimovError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    let cfg: Config = toml::from_str(&raw)
        .map_err(|e| AsimovError::Config(format!("failed to parse {}: {e}", path.display())))?;
    Ok(Some(cfg))
}

/// Apply `ASIMOV_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `ASIMOV_HOST` | `host` |
/// | `ASIMOV_PORT` | `port` |
/// | `ASIMOV_SIMULATE` | `simulate` (`1`/`true`/`yes`) |
///
/// Unparseable values are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("ASIMOV_HOST") {
        cfg.host = v;
    }
    if let Ok(v) = std::env::var("ASIMOV_PORT")
        && let Ok(port) = v.parse::<u16>()
    {
        cfg.port = port;
    }
    if let Ok(v) = std::env::var("ASIMOV_SIMULATE") {
        match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => cfg.simulate = true,
            "0" | "false" | "no" => cfg.simulate = false,
            _ => {}
        }
    }
}

/// Save the config to disk, creating `~/.asimov/` if necessary.
pub fn save(cfg: &Config) -> Result<(), AsimovError> {
    save_to(cfg, &config_path())
}

pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), AsimovError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AsimovError::Config(format!("failed to create config directory: {e}"))
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700)).map_err(|e| {
                AsimovError::Config(format!("failed to set config directory permissions: {e}"))
            })?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| AsimovError::Config(format!("failed to serialize config: {e}")))?;
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| f.write_all(raw.as_bytes()))
            .map_err(|e| {
                AsimovError::Config(format!("failed to write {}: {e}", path.display()))
            })?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| AsimovError::Config(format!("failed to write {}: {e}", path.display())))?;
    Ok(())
}
