use crate::cli::Cli;
use anyhow::{ensure, Context};
use blk_format::{FrameConfig, SyncPolicy, DEFAULT_MAX_BLOCK_SIZE, MAINNET_MAGIC};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;


pub const DEFAULT_FILE_PREFIX: &str = "blk";
pub const DEFAULT_DATABASE_DIR: &str = "blocks.db";
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;


/// Four byte network identifier opening every frame, written as 8 hex digits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Magic(pub [u8; 4]);


impl FromStr for Magic {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 4];
        hex::decode_to_slice(digits, &mut bytes)
            .with_context(|| format!("invalid magic '{}', expected 8 hex digits", s))?;
        Ok(Self(bytes))
    }
}


impl TryFrom<String> for Magic {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}


impl From<Magic> for String {
    fn from(value: Magic) -> Self {
        hex::encode(value.0)
    }
}


impl fmt::Display for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}


/// Everything the import pipeline needs, passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    pub input_dir: PathBuf,
    pub file_prefix: String,
    /// Store location, a RocksDB directory.
    pub database_dir: PathBuf,
    pub dry_run: bool,
    pub max_block_size: u32,
    pub magics: Vec<Magic>,
    pub resync: bool,
    pub read_buffer_size: usize,
}


impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::new(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            database_dir: PathBuf::from(DEFAULT_DATABASE_DIR),
            dry_run: false,
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
            magics: vec![Magic(MAINNET_MAGIC)],
            resync: false,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}


impl ImportConfig {
    pub fn read(file: &Path) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_reader(
            std::io::BufReader::new(std::fs::File::open(file)?)
        )?;
        Ok(config)
    }

    /// Defaults, overlaid by the config file if one is given, overlaid
    /// by command line flags.
    pub fn from_cli(args: &Cli) -> anyhow::Result<Self> {
        let mut config = match args.config.as_deref() {
            Some(file) => Self::read(file).with_context(|| {
                format!("failed to read config from '{}'", file.display())
            })?,
            None => Self::default(),
        };

        if let Some(dir) = &args.dir {
            config.input_dir = dir.clone();
        }
        if let Some(prefix) = &args.prefix {
            config.file_prefix = prefix.clone();
        }
        if let Some(dir) = &args.database_dir {
            config.database_dir = dir.clone();
        }
        if args.dry_run {
            config.dry_run = true;
        }
        if let Some(size) = args.max_block_size {
            config.max_block_size = size;
        }
        if let Some(network) = args.network {
            config.magics = vec![network.magic()];
        }
        if !args.magics.is_empty() {
            config.magics = args.magics.clone();
        }
        if args.resync {
            config.resync = true;
        }
        if let Some(size) = args.read_buffer_size {
            config.read_buffer_size = size;
        }

        config.validate().context("invalid config")?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.input_dir.as_os_str().is_empty(), "input directory is not set");
        ensure!(!self.file_prefix.is_empty(), "file prefix must not be empty");
        ensure!(!self.magics.is_empty(), "at least one magic value is required");
        ensure!(self.max_block_size > 0, "max block size must be greater than 0");
        ensure!(self.read_buffer_size > 0, "read buffer size must be greater than 0");
        Ok(())
    }

    pub fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            magics: self.magics.iter().map(|m| m.0).collect(),
            max_block_size: self.max_block_size,
            sync_policy: if self.resync {
                SyncPolicy::Resync
            } else {
                SyncPolicy::Abort
            },
        }
    }
}
