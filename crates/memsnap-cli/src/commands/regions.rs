//! Region listing command implementation.

use anyhow::{Context, Result};
use memsnap::config::memory::DUMP_CEILING;
use memsnap::{
    AddressRange, AllRegions, DumpPolicy, MemorySnapshot, ProcessHandle, RegionEnumerator,
};

/// Run the regions command
pub fn run(pid: u32, all: bool, json: bool) -> Result<()> {
    let process = ProcessHandle::open(pid)?;
    let range = AddressRange::new(0, DUMP_CEILING);

    let snapshot = if all {
        RegionEnumerator::new(&process, range, AllRegions).snapshot()?
    } else {
        RegionEnumerator::new(&process, range, DumpPolicy).snapshot()?
    };

    if json {
        let output = serde_json::to_string_pretty(snapshot.regions())
            .context("Failed to serialize regions")?;
        println!("{}", output);
    } else {
        print_table(&snapshot);
    }

    Ok(())
}

fn print_table(snapshot: &MemorySnapshot) {
    println!(
        "{:<18} {:<18} {:<10} {:<5} {:<8}",
        "START", "END", "STATE", "PROT", "TYPE"
    );
    for region in snapshot {
        println!(
            "{:<#18x} {:<#18x} {:<10} {:<5} {:<8}",
            region.start,
            region.end(),
            region.state,
            region.protection.short_name(),
            region.kind
        );
    }

    if let Some(stats) = snapshot.statistics() {
        println!();
        println!(
            "{} regions, {} bytes in a {} byte span ({:.1}% dense)",
            snapshot.len(),
            stats.packed_size,
            stats.flat_size,
            stats.density() * 100.0
        );
    }
}
