use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;
use snaptext_engine::{ClientSettings, DEFAULT_ENDPOINT};
use thiserror::Error;

use super::cli::Cli;
use super::logging::LogDestination;

const DEFAULT_CONFIG_FILENAME: &str = "snaptext.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Contents of `snaptext.ron`. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub endpoint: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub export_dir: PathBuf,
    pub log: LogDestination,
}

impl Default for FileConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            max_response_bytes: client.max_response_bytes,
            export_dir: PathBuf::from("."),
            log: LogDestination::default(),
        }
    }
}

/// Effective settings after merging the file with command-line flags.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client: ClientSettings,
    pub export_dir: PathBuf,
    pub log: LogDestination,
    pub log_level: LevelFilter,
}

/// Reads the config file. An explicit path must exist; the default one may not.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
    };
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(FileConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    parse_file_config(&content).map_err(|message| ConfigError::Parse { path, message })
}

fn parse_file_config(content: &str) -> Result<FileConfig, String> {
    ron::from_str(content).map_err(|err| err.to_string())
}

pub fn resolve(cli: &Cli, file: FileConfig) -> Result<AppConfig, ConfigError> {
    let request_timeout_secs = cli.timeout_secs.unwrap_or(file.request_timeout_secs);
    if request_timeout_secs == 0 {
        return Err(ConfigError::Zero {
            field: "request timeout",
        });
    }
    if file.connect_timeout_secs == 0 {
        return Err(ConfigError::Zero {
            field: "connect_timeout_secs",
        });
    }
    if file.max_response_bytes == 0 {
        return Err(ConfigError::Zero {
            field: "max_response_bytes",
        });
    }

    let client = ClientSettings {
        endpoint: cli.endpoint.clone().unwrap_or(file.endpoint),
        connect_timeout: Duration::from_secs(file.connect_timeout_secs),
        request_timeout: Duration::from_secs(request_timeout_secs),
        max_response_bytes: file.max_response_bytes,
    };

    Ok(AppConfig {
        client,
        export_dir: cli.export_dir.clone().unwrap_or(file.export_dir),
        log: cli.log.unwrap_or(file.log),
        log_level: if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
    })
}
