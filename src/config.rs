use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

#[derive(Deserialize, Serialize, Clone)]
pub struct Config {
    pub account: AccountConfig,
    pub monitor: MonitorConfig,
    pub alert: AlertConfig,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct AccountConfig {
    pub email: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct MonitorConfig {
    pub check_interval_secs: u64,
    pub time_window_minutes: u64,
    pub sender_filter: String,
    pub keyword_filter: String,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct AlertConfig {
    pub bell_repeat: u32,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
        Ok(dir.join("mailwatch").join("config.toml"))
    }

    /// Load the config file, writing one with defaults first if it does
    /// not exist yet. Returns whether the file was just created.
    pub fn load_or_create(path: Option<PathBuf>) -> Result<(Self, bool, PathBuf)> {
        let path = match path {
            Some(p) => p,
            None => Self::path()?,
        };

        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, DEFAULT_CONFIG)?;
            let cfg: Self = toml::from_str(DEFAULT_CONFIG)?;
            return Ok((cfg, true, path));
        }

        let data = fs::read_to_string(&path)?;
        let cfg = toml::from_str(&data)?;
        Ok((cfg, false, path))
    }

    pub fn is_configured(&self) -> bool {
        !self.account.email.is_empty() && !self.account.password.is_empty()
    }
}

const DEFAULT_CONFIG: &str = r#"
[account]
email = ""
password = ""
host = "imap.gmail.com"
port = 993

[monitor]
check_interval_secs = 60
time_window_minutes = 2
sender_filter = ""
keyword_filter = ""

[alert]
bell_repeat = 3
"#;
