use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

/// Runtime settings, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub models_dir: PathBuf,
    pub output_dir: PathBuf,
    pub static_dir: PathBuf,
    pub piper_bin: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port: u16 = var("PORT", "8000")
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a number: {}", e)))?;

        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid address {}:{}: {}", host, port, e)))?;

        Ok(Self {
            addr,
            models_dir: var("MODELS_DIR", ".").into(),
            output_dir: var("OUTPUT_DIR", ".").into(),
            static_dir: var("STATIC_DIR", ".").into(),
            piper_bin: var("PIPER_BIN", "piper").into(),
        })
    }
}
