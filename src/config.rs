//! Run configuration shared by the link and backup passes

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Default mapping file, relative to the invocation directory
pub const DEFAULT_MAPPING_FILE: &str = "symlinks.map";

/// Directory that receives backup archives, relative to the invocation directory
pub const DEFAULT_BACKUP_DIR: &str = "backups";

/// Paths a run operates on.
///
/// Constructed once in `main` and passed into the commands, so tests can
/// point everything at temporary directories.
#[derive(Debug, Clone)]
pub struct Config {
    /// The mapping file to parse
    pub mapping_path: PathBuf,
    /// Where backup archives are written
    pub backup_dir: PathBuf,
    /// The user's home directory (`~` expansion and archive entry names)
    pub home: PathBuf,
}

impl Config {
    /// Build a config with the default mapping file and backup directory
    pub fn from_env() -> Result<Self> {
        Self::with_mapping(DEFAULT_MAPPING_FILE)
    }

    /// Build a config reading from the given mapping file
    pub fn with_mapping(mapping_path: impl Into<PathBuf>) -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(Self {
            mapping_path: mapping_path.into(),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            home,
        })
    }
}
