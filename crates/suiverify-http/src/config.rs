//! SuiVerify HTTP configuration types and utilities.
use serde::{Deserialize, Serialize};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};
use suiverify_core::SUIVERIFY_CONFIG;
use thiserror::Error;
use toml;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ENVIRONMENT: &str = "production";
const DEVELOPMENT_ENVIRONMENT: &str = "development";
/// 10 MiB.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// An error relating to HTTP configuration.
#[derive(Error, Debug)]
pub enum HTTPConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(String, std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// HTTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HTTPConfig {
    /// Host address for server.
    pub host: IpAddr,
    /// Port for server.
    pub port: u16,
    /// Deployment environment. Error details are only returned in `development`.
    pub environment: String,
    /// Largest accepted document upload in bytes.
    pub max_upload_bytes: usize,
}

impl std::fmt::Display for HTTPConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Host: {} | Port: {} | Environment: {} | Max upload: {} bytes",
            self.host, self.port, self.environment, self.max_upload_bytes
        )
    }
}

impl Default for HTTPConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl HTTPConfig {
    /// Provides `SocketAddr` of server config address.
    pub fn to_socket_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment == DEVELOPMENT_ENVIRONMENT
    }
}

/// Parses the `[http]` table of a SuiVerify config file.
pub fn parse_toml(toml_str: &str) -> Result<HTTPConfig, HTTPConfigError> {
    Ok(toml::from_str::<Config>(toml_str)?.http)
}

/// Wrapper struct for parsing the `http` config table.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct Config {
    /// HTTP configuration data.
    #[serde(default)]
    http: HTTPConfig,
}

/// Server command line arguments.
#[derive(clap::Parser, Debug, Clone)]
pub struct ServerConfig {
    /// Path to the SuiVerify TOML config file
    #[clap(short = 'c', long, env = SUIVERIFY_CONFIG)]
    pub config: PathBuf,
    /// Host address, overriding the config file
    #[clap(short = 's', long)]
    pub host: Option<IpAddr>,
    /// Port, overriding the config file
    #[clap(short = 'p', long)]
    pub port: Option<u16>,
}

impl std::fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Config: {} | Host: {:?} | Port: {:?}",
            self.config.display(),
            self.host,
            self.port
        )
    }
}

impl ServerConfig {
    /// Reads the config file contents.
    pub fn read_config(&self) -> Result<String, HTTPConfigError> {
        std::fs::read_to_string(&self.config)
            .map_err(|err| HTTPConfigError::Read(self.config.display().to_string(), err))
    }

    /// Applies command line overrides to the file configuration.
    pub fn apply(&self, mut http: HTTPConfig) -> HTTPConfig {
        if let Some(host) = self.host {
            http.host = host;
        }
        if let Some(port) = self.port {
            http.port = port;
        }
        http
    }
}
