//! Server configuration
//!
//! Resolution order, later wins: built-in defaults, the TOML file given by
//! `--config`, then command-line flags and their environment variables.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use calburn_core::errors::{CalburnError, ExError, Result};
use clap::Parser;
use serde::Deserialize;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_MODEL_PATH: &str = "calories_burnt.json";
pub const DEFAULT_DATABASE_PATH: &str = "database.db";

#[derive(Debug, Clone, Parser)]
#[command(name = "calburn")]
#[command(about = "calburn - calories-burnt prediction service", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, env = "CALBURN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "CALBURN_BIND")]
    pub bind: Option<SocketAddr>,

    /// Model artifact (JSON)
    #[arg(long, env = "CALBURN_MODEL")]
    pub model: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, env = "CALBURN_DATABASE")]
    pub database: Option<PathBuf>,

    /// Human-readable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Contents of the optional TOML file; every key may be omitted
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    bind: Option<String>,
    model_path: Option<PathBuf>,
    database_path: Option<PathBuf>,
    debug: Option<bool>,
}

/// Fully resolved configuration handed to the server at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub model_path: PathBuf,
    pub database_path: PathBuf,
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            debug: false,
        }
    }
}

impl ServerConfig {
    /// Resolve defaults, the optional config file, and CLI overrides
    ///
    /// # Errors
    ///
    /// Returns an `ExErrorKind::Config` error if the file cannot be read or
    /// contains unknown keys or an unparsable bind address.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(bind) = cli.bind {
            config.bind = bind;
        }
        if let Some(model) = &cli.model {
            config.model_path = model.clone();
        }
        if let Some(database) = &cli.database {
            config.database_path = database.clone();
        }
        config.debug |= cli.debug;
        Ok(config)
    }

    /// Defaults overlaid with the TOML file at `path`
    ///
    /// # Errors
    ///
    /// Returns an `ExErrorKind::Config` error if the file is unreadable or invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| config_error(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Defaults overlaid with TOML text
    ///
    /// # Errors
    ///
    /// Returns an `ExErrorKind::Config` error if the TOML is invalid.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(text)
            .map_err(|e| config_error(e.to_string()))?;

        let mut config = Self::default();
        if let Some(bind) = file.bind {
            config.bind = bind
                .parse()
                .map_err(|e| config_error(format!("invalid bind address {:?}: {}", bind, e)))?;
        }
        if let Some(model_path) = file.model_path {
            config.model_path = model_path;
        }
        if let Some(database_path) = file.database_path {
            config.database_path = database_path;
        }
        if let Some(debug) = file.debug {
            config.debug = debug;
        }
        Ok(config)
    }
}

fn config_error(reason: String) -> ExError {
    CalburnError::Config { reason }.into()
}
