//! Server configuration loaded from environment variables.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: String,
    /// `None` keeps the catalog in memory for the lifetime of the process.
    pub database_path: Option<PathBuf>,
    pub seed: bool,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_address = match lookup("BOOKSHELF_BIND_ADDRESS") {
            Some(address) => address,
            None => match lookup("PORT") {
                Some(port) => {
                    let port: u16 = port
                        .trim()
                        .parse()
                        .with_context(|| format!("invalid PORT value `{port}`"))?;
                    format!("0.0.0.0:{port}")
                }
                None => DEFAULT_BIND_ADDRESS.to_string(),
            },
        };

        let database_path = lookup("BOOKSHELF_DATABASE_PATH")
            .filter(|path| !path.trim().is_empty() && path != ":memory:")
            .map(PathBuf::from);

        let seed = match lookup("BOOKSHELF_SEED") {
            Some(raw) => parse_flag(&raw)?,
            None => true,
        };

        let log_level = lookup("BOOKSHELF_LOG_LEVEL")
            .map(|level| level.trim().to_ascii_lowercase())
            .unwrap_or_else(|| bookshelf_core::default_log_level().to_string());

        let log_dir = lookup("BOOKSHELF_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("logs"));
        let log_dir = if log_dir.is_absolute() {
            log_dir
        } else {
            std::env::current_dir()
                .context("failed to resolve working directory")?
                .join(log_dir)
        };

        Ok(Self {
            bind_address,
            database_path,
            seed,
            log_level,
            log_dir,
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("invalid BOOKSHELF_SEED value `{other}`"),
    }
}
