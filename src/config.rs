use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::cli::Args;

pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 8113;
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 100 * 1024 * 1024;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub webdav_url: String,
    pub username: String,
    pub password: String,
    pub server_addr: String,
    pub server_port: u16,
    pub max_upload_size: u64, // bytes
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webdav_url: String::new(),
            username: String::new(),
            password: String::new(),
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}

impl Config {
    /// Reads the TOML config file, falling back to defaults when it is missing.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(config_str) => toml::from_str(&config_str)
                .with_context(|| format!("Could not parse config file: {:?}", path)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e).with_context(|| format!("Could not read config file: {:?}", path)),
        }
    }

    /// Overrides the remote server settings from `WEBDAV_*` environment variables.
    pub fn apply_env(&mut self) {
        if let Some(url) = non_empty_var("WEBDAV_URL") {
            self.webdav_url = url;
        }
        if let Some(username) = non_empty_var("WEBDAV_USERNAME") {
            self.username = username;
        }
        if let Some(password) = non_empty_var("WEBDAV_PASSWORD") {
            self.password = password;
        }
    }

    pub fn apply_args(&mut self, args: &Args) {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        if let Some(url) = non_empty(&args.webdav_url) {
            self.webdav_url = url;
        }
        if let Some(username) = non_empty(&args.webdav_username) {
            self.username = username;
        }
        if let Some(password) = non_empty(&args.webdav_password) {
            self.password = password;
        }
        if let Some(addr) = non_empty(&args.server_addr) {
            self.server_addr = addr;
        }
        if let Some(port) = args.server_port {
            self.server_port = port;
        }
    }

    /// Defaults, then config file, then environment, then command line.
    pub fn resolve(args: &Args) -> Result<Self> {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => get_config_path()?,
        };
        let mut config = Config::load(&path)?;
        config.apply_env();
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.webdav_url.is_empty() {
            anyhow::bail!("WebDAV server url is not configured");
        }
        if self.max_upload_size == 0 {
            anyhow::bail!("max_upload_size must be greater than zero");
        }
        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

pub fn get_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(path) = env::var("WEBDAV_GATEWAY_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
        .join("webdav-gateway");
    Ok(config_dir.join("config.toml"))
}
