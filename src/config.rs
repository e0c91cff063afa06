//! Runtime settings.
//!
//! Every option can be given on the command line or through the `MB_*`
//! environment variables. Data file locations are derived from `data_dir`.

use crate::combinations::Strategy;
use clap::Parser;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const SETS_DIR: &str = "subway_pokemon";
pub const TRAINERS_FILE: &str = "subway_trainers_set45.json";
pub const POOLS_FILE: &str = "subway_pools_set45.json";
pub const POOLS_INDEX_FILE: &str = "subway_pools_index_set45.json";

#[derive(Debug, Clone, Parser)]
#[command(name = "battle-subway-helper")]
#[command(about = "Battle Subway (B2/W2) Super Set 4/5 team narrowing service")]
pub struct Settings {
    /// Directory holding the trainers, pools and pool index files
    #[arg(long, env = "MB_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Comma separated list of origins allowed by CORS (disabled when empty)
    #[arg(long, env = "MB_CORS_ORIGINS", default_value = "")]
    pub cors_origins: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "MB_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "MB_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "MB_PORT", default_value_t = 8000)]
    pub port: u16,

    /// How possible teams are counted: closed-form or enumerate
    #[arg(long, env = "MB_STRATEGY", default_value_t = Strategy::ClosedForm)]
    pub strategy: Strategy,
}

impl Settings {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cors_origins: String::new(),
            log_level: "info".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            strategy: Strategy::default(),
        }
    }

    pub fn paths(&self) -> DataPaths {
        DataPaths::new(&self.data_dir)
    }

    /// Origins parsed from `cors_origins`, blanks dropped.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn bind_address(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Locations of every file the repository loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub data_dir: PathBuf,
    pub sets_dir: PathBuf,
    pub trainers_file: PathBuf,
    pub pools_file: PathBuf,
    pub pools_index_file: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            sets_dir: data_dir.join(SETS_DIR),
            trainers_file: data_dir.join(TRAINERS_FILE),
            pools_file: data_dir.join(POOLS_FILE),
            pools_index_file: data_dir.join(POOLS_INDEX_FILE),
        }
    }
}
