//! Configuration management for astrosearch.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RegistryError, Result};
use crate::locator::SchemaVersion;

/// Schema version of the POLIS static data layout this service reads
pub const DEFAULT_SCHEMA_VERSION: &str = "0.2.0-alpha.1";

/// Command-line arguments for astrosearch
#[derive(Parser, Debug)]
#[command(name = "astrosearch")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Host address to bind to
    #[arg(short = 'H', long, env = "ASTROSEARCH_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "ASTROSEARCH_PORT")]
    pub port: Option<u16>,

    /// Number of worker threads
    #[arg(short, long, env = "ASTROSEARCH_WORKERS")]
    pub workers: Option<usize>,

    /// Folder holding (or receiving) the local POLIS mirror
    #[arg(short = 'l', long, env = "ASTROSEARCH_LOCAL_PATH")]
    pub local_path: Option<PathBuf>,

    /// Remote POLIS source URL mirrored when the local copy is absent
    #[arg(short = 'r', long, env = "ASTROSEARCH_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "ASTROSEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ASTROSEARCH_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads (None = number of CPU cores)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Mirror and data access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Local mirror root
    #[serde(default = "default_local_path")]
    pub local_path: PathBuf,

    /// Remote source for the bulk fetch (empty = never fetch)
    #[serde(default)]
    pub remote_url: String,

    /// POLIS schema version used to locate files
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Send internal error reasons to clients (debug builds by default)
    #[serde(default = "default_expose_errors")]
    pub expose_errors: bool,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Data configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Build configuration from parsed arguments, reading the JSON file they name
    pub fn from_args(args: Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(host) = args.host {
            config.server.host = host;
        }
        if let Some(port) = args.port {
            config.server.port = port;
        }
        if args.workers.is_some() {
            config.server.workers = args.workers;
        }
        if let Some(local_path) = args.local_path {
            config.data.local_path = local_path;
        }
        if let Some(remote_url) = args.remote_url {
            config.data.remote_url = remote_url;
        }
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.server.host = other.server.host;
        self.server.port = other.server.port;
        if other.server.workers.is_some() {
            self.server.workers = other.server.workers;
        }
        self.data = other.data;
        self.log_level = other.log_level;
    }

    /// Number of runtime worker threads to start
    pub fn worker_threads(&self) -> usize {
        self.server.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate server host (must be a valid IP or hostname)
        if self.server.host.is_empty() {
            return Err(RegistryError::Config {
                message: "Server host cannot be empty".to_string(),
            });
        }

        // Validate port (0 is not a valid port for users)
        if self.server.port == 0 {
            return Err(RegistryError::Config {
                message: "Server port cannot be 0".to_string(),
            });
        }

        if self.server.workers == Some(0) {
            return Err(RegistryError::Config {
                message: "Worker count cannot be 0".to_string(),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(RegistryError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        if self.data.local_path.as_os_str().is_empty() {
            return Err(RegistryError::Config {
                message: "Local mirror path cannot be empty".to_string(),
            });
        }

        // Reported to clients by the readiness build; only logged here.
        if self.data.schema_version.parse::<SchemaVersion>().is_err() {
            tracing::warn!(
                schema_version = %self.data.schema_version,
                "Schema version is not a valid semantic version"
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            local_path: default_local_path(),
            remote_url: String::new(),
            schema_version: default_schema_version(),
            expose_errors: default_expose_errors(),
        }
    }
}

// Default value functions for serde
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_local_path() -> PathBuf {
    PathBuf::from("./polis_data")
}

fn default_schema_version() -> String {
    DEFAULT_SCHEMA_VERSION.to_string()
}

fn default_expose_errors() -> bool {
    cfg!(debug_assertions)
}

fn default_log_level() -> String {
    "info".to_string()
}
