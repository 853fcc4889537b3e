//! End-to-end dump tests against synthetic address spaces

use std::fs;

use memsnap::dump::{PartialRead, SparseImageWriter, dump_regions};
use memsnap::error::Error;
use memsnap::process::MockAddressSpace;
use memsnap::region::{AddressRange, Protection};
use memsnap::{DumpConfig, config::memory::PAGE_SIZE};
use tempfile::TempDir;

fn dump_to_file(space: &MockAddressSpace, config: &DumpConfig) -> memsnap::Result<memsnap::DumpReport> {
    let mut writer = SparseImageWriter::create(config.output())?;
    let report = dump_regions(space, config.range(), config.page_size(), &mut writer)?;
    writer.finish()?;
    Ok(report)
}

#[test]
fn test_single_region_image() {
    let dir = TempDir::new().unwrap();
    let config = DumpConfig::builder().output(dir.path().join("dump.bin")).build();
    let bytes: Vec<u8> = (0..0x100).map(|i| i as u8).collect();
    let space = MockAddressSpace::builder()
        .region(0x5000, Protection::READWRITE, bytes.clone())
        .build();

    let report = dump_to_file(&space, &config).unwrap();

    let stats = report.statistics.unwrap();
    assert_eq!(stats.flat_size, 0x5100);
    assert_eq!(stats.packed_size, 0x100);

    let image = fs::read(config.output()).unwrap();
    assert_eq!(image.len(), 0x5100);
    assert_eq!(&image[0x5000..0x5100], bytes.as_slice());
    assert!(image[..0x5000].iter().all(|&b| b == 0));
}

#[test]
fn test_partial_region_is_zero_filled_and_reported() {
    let dir = TempDir::new().unwrap();
    let config = DumpConfig::builder().output(dir.path().join("dump.bin")).build();
    let space = MockAddressSpace::builder()
        .region(0x1000, Protection::READWRITE, vec![0x11; 0x1000])
        .region(0x3000, Protection::READWRITE, vec![0x22; 0x2000])
        .partial(0x3000, 0x800)
        .build();

    let report = dump_to_file(&space, &config).unwrap();

    assert_eq!(report.regions_written, 2);
    assert_eq!(
        report.partial_reads,
        vec![PartialRead {
            address: 0x3000,
            size: 0x2000,
            bytes_read: 0x800,
        }]
    );

    let image = fs::read(config.output()).unwrap();
    assert_eq!(image.len(), 0x5000);
    assert!(image[0x1000..0x2000].iter().all(|&b| b == 0x11));
    assert!(image[0x3000..0x3800].iter().all(|&b| b == 0x22));
    assert!(image[0x3800..0x5000].iter().all(|&b| b == 0));
}

#[test]
fn test_read_failure_aborts_dump() {
    let dir = TempDir::new().unwrap();
    let config = DumpConfig::builder().output(dir.path().join("dump.bin")).build();
    let space = MockAddressSpace::builder()
        .region(0x1000, Protection::READWRITE, vec![1; 0x1000])
        .region(0x4000, Protection::READWRITE, vec![2; 0x1000])
        .failing_read(0x4000, 5)
        .build();

    let result = dump_to_file(&space, &config);

    assert!(matches!(result, Err(Error::MemoryRead { address: 0x4000, .. })));
}

#[test]
fn test_ceiling_limits_walk() {
    let dir = TempDir::new().unwrap();
    let config = DumpConfig::builder()
        .output(dir.path().join("dump.bin"))
        .ceiling(0x4000)
        .build();
    let space = MockAddressSpace::builder()
        .region(0x1000, Protection::READWRITE, vec![1; 0x1000])
        .region(0x8000, Protection::READWRITE, vec![2; 0x1000])
        .build();

    let report = dump_to_file(&space, &config).unwrap();

    assert_eq!(report.regions_written, 1);
    assert_eq!(fs::metadata(config.output()).unwrap().len(), 0x2000);
}

#[test]
fn test_unreadable_query_pages_are_skipped() {
    let space = MockAddressSpace::builder()
        .failing_query(0x0..0x2000)
        .region(0x2000, Protection::READONLY, vec![7; 0x1000])
        .build();
    let mut writer = SparseImageWriter::new(std::io::Cursor::new(Vec::new()));

    let report = dump_regions(&space, AddressRange::new(0, 0x10000), PAGE_SIZE, &mut writer).unwrap();

    assert_eq!(report.regions_written, 1);
    let image = writer.finish().unwrap().into_inner();
    assert_eq!(image.len(), 0x3000);
}

#[test]
fn test_report_serializes() {
    let space = MockAddressSpace::builder()
        .region(0x1000, Protection::READWRITE, vec![0; 0x10])
        .build();
    let mut writer = SparseImageWriter::new(std::io::Cursor::new(Vec::new()));

    let report = dump_regions(&space, AddressRange::new(0, 0x10000), PAGE_SIZE, &mut writer).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["regions_written"], 1);
    assert_eq!(json["statistics"]["flat_size"], 0x1010);
}
