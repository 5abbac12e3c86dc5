use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::totp::{
    Params, TotpError, DEFAULT_DIGITS, DEFAULT_PERIOD, DEFAULT_WINDOW, MAX_WINDOW,
};

pub const DIR_ENV_VAR: &str = "TOTP_VAULT_DIR";
const DIR_NAME: &str = ".totp-vault";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to find home directory (set TOTP_VAULT_DIR)")]
    NoHome,
    #[error("unable to read {0}: {1}")]
    Read(PathBuf, #[source] io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] TotpError),
    #[error("window must be at most {}, got {0}", MAX_WINDOW)]
    Window(u64),
}

// every field optional in config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    period: Option<u64>,
    digits: Option<u32>,
    window: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dir: PathBuf,
    pub period: u64,
    pub digits: u32,
    pub window: u64,
}

impl Config {
    pub fn with_dir(dir: PathBuf) -> Self {
        Config {
            dir,
            period: DEFAULT_PERIOD,
            digits: DEFAULT_DIGITS,
            window: DEFAULT_WINDOW,
        }
    }

    /// `$TOTP_VAULT_DIR`, or `~/.totp-vault`, plus its optional `config.toml`.
    pub fn load() -> Result<Config, ConfigError> {
        let dir = match env::var_os(DIR_ENV_VAR) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir().ok_or(ConfigError::NoHome)?.join(DIR_NAME),
        };
        Config::load_from(&dir)
    }

    pub fn load_from(dir: &Path) -> Result<Config, ConfigError> {
        let mut config = Config::with_dir(dir.to_path_buf());

        let path = dir.join(CONFIG_FILE_NAME);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(config),
            Err(e) => return Err(ConfigError::Read(path, e)),
        };

        let file: ConfigFile = toml::from_str(&contents)?;
        config.period = file.period.unwrap_or(config.period);
        config.digits = file.digits.unwrap_or(config.digits);
        config.window = file.window.unwrap_or(config.window);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params().validate()?;
        if self.window > MAX_WINDOW {
            return Err(ConfigError::Window(self.window));
        }
        Ok(())
    }

    pub fn params(&self) -> Params {
        Params::new(self.period, self.digits)
    }
}
