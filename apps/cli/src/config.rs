//! CLI configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux/macOS: `~/.config/minetunnel/config.toml`
//! - Windows: `%APPDATA%/minetunnel/config.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// minetunnel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Public hostname the tunnel forwards from.
    #[serde(default = "default_public_host")]
    pub public_host: String,

    /// Name of the external tunneling executable, resolved via PATH.
    #[serde(default = "default_tunnel_program")]
    pub tunnel_program: String,

    /// Minecraft log file to scan for the LAN port.
    #[serde(default = "minetunnel_lan_log::default_log_path")]
    pub log_file: PathBuf,

    /// Poll interval for `watch`, in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Copy the public address to the clipboard after a start.
    #[serde(default = "default_true")]
    pub copy_to_clipboard: bool,

    /// Fixed port to tunnel; bypasses log detection when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_port: Option<u16>,
}

fn default_public_host() -> String {
    "name-leo.gl.joinmc.link".into()
}

fn default_tunnel_program() -> String {
    if cfg!(windows) {
        "playit.exe".into()
    } else {
        "playit".into()
    }
}

fn default_poll_interval() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            public_host: default_public_host(),
            tunnel_program: default_tunnel_program(),
            log_file: minetunnel_lan_log::default_log_path(),
            poll_interval: default_poll_interval(),
            copy_to_clipboard: true,
            manual_port: None,
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from the platform default
    /// location; a missing file is created with defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata)
            .join("minetunnel")
            .join("config.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("minetunnel")
            .join("config.toml"))
    }
}
