//! Dump command implementation.

use std::path::Path;

use anyhow::Result;
use memsnap::{DumpConfig, dump_process};
use tracing::debug;

use crate::cli_utils::parse_pid;

/// Run the dump command
pub fn run(pid: Option<&str>, output: &Path, ceiling: u64) -> Result<()> {
    let Some(pid) = parse_pid(pid) else {
        debug!("No valid PID given, nothing to dump");
        return Ok(());
    };

    let config = DumpConfig::builder().output(output).ceiling(ceiling).build();
    let report = dump_process(pid, &config)?;

    if let Some(stats) = report.statistics {
        println!("Flat size:   {}", stats.flat_size);
        println!("Packed size: {}", stats.packed_size);
    }

    Ok(())
}
