//! Scan command implementation.

use anyhow::{Result, bail};
use memsnap::{LocalMemory, PatternScanner, ProcessHandle, RemoteView, ScanTarget, parse_hex_pattern};
use serde::Serialize;

#[derive(Serialize)]
struct ScanOutput<'a> {
    target: &'a ScanTarget,
    pattern: String,
    total: usize,
    matches: &'a [u64],
}

/// Run the scan command
pub fn run(
    pattern: &str,
    module: Option<String>,
    base: Option<u64>,
    size: Option<u64>,
    pid: Option<u32>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let pattern = parse_hex_pattern(pattern)?;
    let target = match (module, base, size) {
        (Some(name), _, _) => ScanTarget::Module(name),
        (None, Some(base), Some(size)) => ScanTarget::Range { base, size },
        _ => bail!("Either --module or both --base and --size are required"),
    };

    let matches = match pid {
        Some(pid) => {
            let process = ProcessHandle::open(pid)?;
            let remote = RemoteView::new(&process);
            PatternScanner::new(&remote).scan(&target, &pattern)?
        }
        None => PatternScanner::new(&LocalMemory::new()).scan(&target, &pattern)?,
    };

    let shown = &matches[..limit.unwrap_or(matches.len()).min(matches.len())];

    if json {
        let output = ScanOutput {
            target: &target,
            pattern: hex_string(&pattern),
            total: matches.len(),
            matches: shown,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Found {} matches for {} in {}",
        matches.len(),
        hex_string(&pattern),
        target
    );
    for address in shown {
        println!("  0x{:X}", address);
    }
    if shown.len() < matches.len() {
        println!("  ... {} more", matches.len() - shown.len());
    }

    Ok(())
}

fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
