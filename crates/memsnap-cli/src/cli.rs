//! CLI argument definitions for memsnap.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

use crate::cli_utils::parse_hex_address;

#[derive(Parser)]
#[command(name = "memsnap")]
#[command(about = "Process memory dumper and pattern scanner", version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    /// Process ID to dump
    #[arg(value_name = "PID")]
    pub pid: Option<String>,

    /// Image file path
    #[arg(short, long, env = "MEMSNAP_OUTPUT", default_value = "dump.bin")]
    pub output: PathBuf,

    /// Exclusive upper address of the dump (hex, e.g., 0x10000000)
    #[arg(long, value_parser = parse_hex_address, default_value = "0x10000000")]
    pub ceiling: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the memory regions of a process
    Regions {
        /// Process ID
        pid: u32,
        /// Include reserved, free and guard regions
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search committed memory for a byte pattern
    #[command(group(ArgGroup::new("target").required(true).args(["module", "base"])))]
    Scan {
        /// Byte pattern (hex, e.g., "48 8B 05")
        #[arg(long)]
        pattern: String,
        /// Restrict the scan to a loaded module's image
        #[arg(long, conflicts_with_all = ["base", "size"])]
        module: Option<String>,
        /// Start address of the scanned range (hex)
        #[arg(long, value_parser = parse_hex_address, requires = "size")]
        base: Option<u64>,
        /// Length of the scanned range in bytes (hex)
        #[arg(long, value_parser = parse_hex_address, requires = "base")]
        size: Option<u64>,
        /// Process ID (scan this process when omitted)
        #[arg(long)]
        pid: Option<u32>,
        /// Maximum number of matches to print
        #[arg(long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
