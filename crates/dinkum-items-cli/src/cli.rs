//! CLI argument definitions for dinkum-items

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dinkum-items")]
#[command(about = "Extract item names, tool flags, stack sizes and durability from Dinkum")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML extraction profile overriding the built-in tables
    #[arg(long, global = true, env = "DINKUM_ITEMS_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full extraction and write the item database
    Extract {
        /// Game directory whose containers are exported as raw object dump directories
        game_dir: PathBuf,

        /// Output JSON file
        #[arg(short, long, default_value = "data/items.json")]
        output: PathBuf,
    },

    /// Discover field offsets and print them without writing anything
    Calibrate {
        /// Game directory with exported containers
        game_dir: PathBuf,
    },

    /// Hexdump the fixed-size tail of one item record
    Inspect {
        /// Game directory with exported containers
        game_dir: PathBuf,

        /// Item index
        index: u32,

        /// Bytes to dump from the tail start
        #[arg(short, long, default_value = "320")]
        size: usize,
    },
}
