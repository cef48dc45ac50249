use crate::config::Magic;
use blk_format::{MAINNET_MAGIC, REGTEST_MAGIC, SIGNET_MAGIC, TESTNET_MAGIC};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;


#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
    Signet,
}


impl Network {
    pub fn magic(&self) -> Magic {
        Magic(match self {
            Network::Mainnet => MAINNET_MAGIC,
            Network::Testnet => TESTNET_MAGIC,
            Network::Regtest => REGTEST_MAGIC,
            Network::Signet => SIGNET_MAGIC,
        })
    }
}


#[derive(Parser, Debug)]
#[command(version, about = "Loads block files into a key-value store", long_about = None)]
pub struct Cli {
    /// Directory which contains the block files
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Database directory to write block and transaction rows to
    #[arg(long = "db", value_name = "DIR")]
    pub database_dir: Option<PathBuf>,

    /// Parse and count everything, but write nothing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// JSON file with import settings, flags take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only files whose name starts with this prefix are read [default: blk]
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Network whose magic value frames start with [default: mainnet]
    #[arg(long, value_enum)]
    pub network: Option<Network>,

    /// Accepted frame magic as 8 hex digits, can be given multiple times
    #[arg(long = "magic", value_name = "HEX")]
    pub magics: Vec<Magic>,

    /// Upper limit on the declared size of a block [default: 1048576]
    #[arg(long, value_name = "BYTES")]
    pub max_block_size: Option<u32>,

    /// Search for the next frame instead of abandoning a file on unexpected bytes
    #[arg(long)]
    pub resync: bool,

    /// Read buffer size per file [default: 65536]
    #[arg(long, value_name = "BYTES")]
    pub read_buffer_size: Option<usize>,

    /// Whether the logs should be structured in JSON format
    #[arg(long)]
    pub json_log: bool,
}
