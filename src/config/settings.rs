use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use toml::{Table, Value};
use tracing::debug;

use crate::utils::{current_user, get_app_dir};

pub const DEFAULT_SERVICE_URL: &str = "http://portalquery.just.ro/query.asmx";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const SYSTEM_CONFIG_PATH: &str = "/etc/adrian.toml";
const USER_CONFIG_FILENAME: &str = "adrian.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid value for '{key}' in {}: expected {expected}", .path.display())]
    InvalidValue { path: PathBuf, key: String, expected: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub start_tls: bool,
    pub mail_from: String,
    pub mail_to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub service: ServiceSettings,
    pub smtp: SmtpSettings,
}

/// A configuration together with how it was assembled
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Configuration,
    /// Files that were found and applied, in order
    pub sources: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        let user = current_user();
        let address = user.clone().unwrap_or_default();
        Self {
            service: ServiceSettings {
                url: DEFAULT_SERVICE_URL.to_string(),
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
            smtp: SmtpSettings {
                host: "localhost".to_string(),
                port: 25,
                user,
                password: None,
                start_tls: false,
                mail_from: address.clone(),
                mail_to: address,
            },
        }
    }
}

impl Configuration {
    /// System-wide file first, then the per-user one
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
        if let Ok(app_dir) = get_app_dir() {
            paths.push(app_dir.join(USER_CONFIG_FILENAME));
        }
        paths
    }

    pub fn load() -> Result<LoadedConfig, ConfigError> {
        Self::load_from(&Self::default_paths())
    }

    /// Apply every existing file of `paths` in order on top of the defaults
    pub fn load_from(paths: &[PathBuf]) -> Result<LoadedConfig, ConfigError> {
        let mut config = Configuration::default();
        let mut sources = Vec::new();
        let mut warnings = Vec::new();

        for path in paths {
            let text = match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(ConfigError::Read { path: path.clone(), source }),
            };
            let table: Table = text
                .parse()
                .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;

            config.apply(&table, path, &mut warnings)?;
            sources.push(path.clone());
        }

        if sources.is_empty() {
            debug!("No configuration file found, using defaults");
        }

        Ok(LoadedConfig { config, sources, warnings })
    }

    fn apply(
        &mut self,
        table: &Table,
        path: &Path,
        warnings: &mut Vec<String>,
    ) -> Result<(), ConfigError> {
        for (section, value) in table {
            let Some(entries) = value.as_table() else {
                warnings.push(format!("Unknown configuration option: {}", section));
                continue;
            };
            for (key, value) in entries {
                let field = Field { path, section, key, value };
                let known = match section.as_str() {
                    "service" => self.service.apply(&field)?,
                    "smtp" => self.smtp.apply(&field)?,
                    _ => false,
                };
                if !known {
                    warnings.push(format!("Unknown configuration option: {}.{}", section, key));
                }
            }
        }
        Ok(())
    }
}

/// One `key = value` entry being applied, with enough context for error messages
struct Field<'a> {
    path: &'a Path,
    section: &'a str,
    key: &'a str,
    value: &'a Value,
}

impl Field<'_> {
    fn invalid(&self, expected: &'static str) -> ConfigError {
        ConfigError::InvalidValue {
            path: self.path.to_path_buf(),
            key: format!("{}.{}", self.section, self.key),
            expected,
        }
    }

    fn string(&self) -> Result<String, ConfigError> {
        self.value.as_str().map(str::to_string).ok_or_else(|| self.invalid("a string"))
    }

    fn boolean(&self) -> Result<bool, ConfigError> {
        self.value.as_bool().ok_or_else(|| self.invalid("true or false"))
    }

    fn integer_in(&self, min: i64, max: i64, expected: &'static str) -> Result<i64, ConfigError> {
        self.value.as_integer().filter(|n| (min..=max).contains(n)).ok_or_else(|| self.invalid(expected))
    }
}

impl ServiceSettings {
    fn apply(&mut self, field: &Field<'_>) -> Result<bool, ConfigError> {
        match field.key {
            "service_url" => self.url = field.string()?,
            "timeout_secs" => {
                let secs = field.integer_in(1, 3600, "a number of seconds between 1 and 3600")?;
                self.timeout = Duration::from_secs(secs as u64);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl SmtpSettings {
    fn apply(&mut self, field: &Field<'_>) -> Result<bool, ConfigError> {
        match field.key {
            "host" => self.host = field.string()?,
            "port" => self.port = field.integer_in(1, 65535, "a port number")? as u16,
            "user" => self.user = Some(field.string()?),
            "password" => self.password = Some(field.string()?),
            "start_tls" => self.start_tls = field.boolean()?,
            "mailfrom" => self.mail_from = field.string()?,
            "mailto" => self.mail_to = field.string()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
