//! # Configuration Management
//!
//! Centralized configuration for the encryption/decryption services and their clients.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`
//!
//! ## Security Considerations
//! - The message size ceiling bounds the allocation a peer can force with a forged length prefix
//! - Alphabet re-validation on the server is on by default

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Length of the role token sent before any framed message
pub const ROLE_TOKEN_LEN: usize = 7;

/// Length of the big-endian length prefix in front of every message
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Listen backlog for the service sockets
pub const DEFAULT_BACKLOG: u32 = 5;

/// Max allowed message payload (16 MB)
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Host the clients connect to
pub const DEFAULT_CLIENT_HOST: &str = "localhost";

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct NetworkConfig {
    /// Server-specific configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Client-specific configuration
    #[serde(default)]
    pub client: ClientConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NetworkConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from `OTP_PROTOCOL_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(addr) = std::env::var("OTP_PROTOCOL_SERVER_ADDRESS") {
            self.server.address = addr;
        }

        if let Ok(size) = std::env::var("OTP_PROTOCOL_MAX_MESSAGE_SIZE") {
            let val = size.parse::<usize>().map_err(|_| {
                ProtocolError::ConfigError(format!(
                    "OTP_PROTOCOL_MAX_MESSAGE_SIZE is not a number: '{size}'"
                ))
            })?;
            self.server.max_message_size = val;
            self.client.max_message_size = val;
        }

        if let Ok(host) = std::env::var("OTP_PROTOCOL_CLIENT_HOST") {
            self.client.host = host;
        }

        if let Ok(level) = std::env::var("OTP_PROTOCOL_LOG_LEVEL") {
            self.logging.log_level = level.parse::<Level>().map_err(|_| {
                ProtocolError::ConfigError(format!("Invalid log level: '{level}'"))
            })?;
        }

        Ok(())
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.server.validate());
        errors.extend(self.client.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Server-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server listen address (e.g., "0.0.0.0:57171"); the port is replaced by the CLI argument
    pub address: String,

    /// Listen backlog
    pub backlog: u32,

    /// Largest declared message length accepted from a client
    pub max_message_size: usize,

    /// Re-check both payloads against the alphabet before transforming
    pub validate_alphabet: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: String::from("0.0.0.0:0"),
            backlog: DEFAULT_BACKLOG,
            max_message_size: MAX_MESSAGE_SIZE,
            validate_alphabet: true,
        }
    }
}

impl ServerConfig {
    /// Same configuration listening on `port` of the configured interface
    pub fn with_port(mut self, port: u16) -> Result<Self> {
        let mut addr = self
            .address
            .parse::<std::net::SocketAddr>()
            .map_err(|_| {
                ProtocolError::ConfigError(format!(
                    "Invalid server address format: '{}'",
                    self.address
                ))
            })?;
        addr.set_port(port);
        self.address = addr.to_string();
        Ok(self)
    }

    /// Validate server configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.address.is_empty() {
            errors.push("Server address cannot be empty".to_string());
        } else if self.address.parse::<std::net::SocketAddr>().is_err() {
            errors.push(format!(
                "Invalid server address format: '{}' (expected format: '0.0.0.0:8080')",
                self.address
            ));
        }

        if self.backlog == 0 {
            errors.push("Backlog must be greater than 0".to_string());
        } else if self.backlog > 4096 {
            errors.push(format!("Backlog too large: {} (maximum: 4096)", self.backlog));
        }

        errors.extend(validate_message_size("Server", self.max_message_size));
        errors
    }
}

/// Client-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Host the client connects to; the port comes from the command line
    pub host: String,

    /// Largest declared response length accepted from the server
    pub max_message_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_CLIENT_HOST),
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// `host:port` string to hand to the resolver
    pub fn address(&self, port: u16) -> String {
        if self.host.parse::<std::net::Ipv6Addr>().is_ok() {
            format!("[{}]:{port}", self.host)
        } else {
            format!("{}:{port}", self.host)
        }
    }

    /// Validate client configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.host.is_empty() {
            errors.push("Client host cannot be empty".to_string());
        } else if self.host.contains(':') && self.host.parse::<std::net::IpAddr>().is_err() {
            errors.push(format!(
                "Client host must not include a port: '{}'",
                self.host
            ));
        }

        errors.extend(validate_message_size("Client", self.max_message_size));
        errors
    }
}

fn validate_message_size(side: &str, size: usize) -> Vec<String> {
    let mut errors = Vec::new();
    if size == 0 {
        errors.push(format!("{side} max message size cannot be 0"));
    } else if size > u32::MAX as usize {
        errors.push(format!(
            "{side} max message size too large: {size} bytes (a length prefix is 4 bytes)"
        ));
    }
    errors
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("otp-protocol"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
