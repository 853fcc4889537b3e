use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{FromRepr, IntoStaticStr};

/// Allocation state of a region.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, FromRepr, IntoStaticStr,
)]
#[repr(u32)]
pub enum RegionState {
    Committed = 0x1000,
    Reserved = 0x2000,
    #[default]
    Free = 0x1_0000,
}

impl RegionState {
    /// Map a raw `MEM_*` state value. Unknown values are treated as free.
    pub fn from_raw(value: u32) -> Self {
        Self::from_repr(value).unwrap_or_default()
    }
}

impl std::fmt::Display for RegionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(<&'static str>::from(self))
    }
}

/// Backing of a region.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, FromRepr, IntoStaticStr,
)]
#[repr(u32)]
pub enum RegionKind {
    Private = 0x2_0000,
    Mapped = 0x4_0000,
    Image = 0x100_0000,
    #[default]
    Unknown = 0,
}

impl RegionKind {
    /// Map a raw `MEM_*` type value. Free regions report zero.
    pub fn from_raw(value: u32) -> Self {
        Self::from_repr(value).unwrap_or_default()
    }
}

impl std::fmt::Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(<&'static str>::from(self))
    }
}

bitflags! {
    /// Page protection, using the `PAGE_*` bit layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Protection: u32 {
        const NOACCESS = 0x01;
        const READONLY = 0x02;
        const READWRITE = 0x04;
        const WRITECOPY = 0x08;
        const EXECUTE = 0x10;
        const EXECUTE_READ = 0x20;
        const EXECUTE_READWRITE = 0x40;
        const EXECUTE_WRITECOPY = 0x80;
        const GUARD = 0x100;
        const NOCACHE = 0x200;
        const WRITECOMBINE = 0x400;
    }
}

impl Protection {
    /// Any protection under which the pages can be read or executed.
    pub const ACCESSIBLE: Self = Self::READONLY
        .union(Self::READWRITE)
        .union(Self::WRITECOPY)
        .union(Self::EXECUTE)
        .union(Self::EXECUTE_READ)
        .union(Self::EXECUTE_READWRITE)
        .union(Self::EXECUTE_WRITECOPY);

    /// Protections whose pages can be read. `EXECUTE` alone cannot.
    pub const READABLE: Self = Self::ACCESSIBLE.difference(Self::EXECUTE);

    pub fn is_guard(self) -> bool {
        self.contains(Self::GUARD)
    }

    pub fn is_accessible(self) -> bool {
        self.intersects(Self::ACCESSIBLE)
    }

    pub fn is_readable(self) -> bool {
        self.intersects(Self::READABLE)
    }

    /// Short `rwx` style summary, with `g` appended for guard pages.
    pub fn short_name(self) -> String {
        let read = self.is_readable();
        let write = self.intersects(Self::READWRITE | Self::EXECUTE_READWRITE);
        let copy = self.intersects(Self::WRITECOPY | Self::EXECUTE_WRITECOPY);
        let exec = self.intersects(
            Self::EXECUTE | Self::EXECUTE_READ | Self::EXECUTE_READWRITE | Self::EXECUTE_WRITECOPY,
        );

        let mut name = String::with_capacity(4);
        name.push(if read { 'r' } else { '-' });
        name.push(if write {
            'w'
        } else if copy {
            'c'
        } else {
            '-'
        });
        name.push(if exec { 'x' } else { '-' });
        if self.is_guard() {
            name.push('g');
        }
        name
    }
}

/// A contiguous run of virtual address space with uniform state and protection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryRegion {
    pub start: u64,
    pub size: u64,
    pub state: RegionState,
    pub protection: Protection,
    pub kind: RegionKind,
}

impl MemoryRegion {
    /// Committed private region, the common case for synthetic address spaces.
    pub fn committed(start: u64, size: u64, protection: Protection) -> Self {
        Self {
            start,
            size,
            state: RegionState::Committed,
            protection,
            kind: RegionKind::Private,
        }
    }

    /// Exclusive end address, saturating at `u64::MAX`.
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size)
    }

    pub fn contains(&self, address: u64) -> bool {
        address >= self.start && address < self.end()
    }
}

/// Half-open address range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressRange {
    pub start: u64,
    pub end: u64,
}

impl AddressRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn from_base_size(base: u64, size: u64) -> Self {
        Self {
            start: base,
            end: base.saturating_add(size),
        }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, address: u64) -> bool {
        address >= self.start && address < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_raw() {
        assert_eq!(RegionState::from_raw(0x1000), RegionState::Committed);
        assert_eq!(RegionState::from_raw(0x2000), RegionState::Reserved);
        assert_eq!(RegionState::from_raw(0x10000), RegionState::Free);
        assert_eq!(RegionState::from_raw(0xdead), RegionState::Free);
    }

    #[test]
    fn test_kind_from_raw() {
        assert_eq!(RegionKind::from_raw(0x1000000), RegionKind::Image);
        assert_eq!(RegionKind::from_raw(0x40000), RegionKind::Mapped);
        assert_eq!(RegionKind::from_raw(0), RegionKind::Unknown);
    }

    #[test]
    fn test_protection_accessible() {
        assert!(Protection::READONLY.is_accessible());
        assert!(Protection::EXECUTE.is_accessible());
        assert!((Protection::READWRITE | Protection::GUARD).is_accessible());
        assert!(!Protection::NOACCESS.is_accessible());
        assert!(!Protection::empty().is_accessible());
    }

    #[test]
    fn test_protection_readable() {
        assert!(Protection::READONLY.is_readable());
        assert!(Protection::EXECUTE_READ.is_readable());
        assert!((Protection::WRITECOPY | Protection::NOCACHE).is_readable());
        assert!(!Protection::EXECUTE.is_readable());
        assert!(!Protection::NOACCESS.is_readable());
    }

    #[test]
    fn test_protection_short_name() {
        assert_eq!(Protection::READONLY.short_name(), "r--");
        assert_eq!(Protection::READWRITE.short_name(), "rw-");
        assert_eq!(Protection::EXECUTE_WRITECOPY.short_name(), "rcx");
        assert_eq!(Protection::EXECUTE.short_name(), "--x");
        assert_eq!((Protection::READWRITE | Protection::GUARD).short_name(), "rw-g");
        assert_eq!(Protection::NOACCESS.short_name(), "---");
    }

    #[test]
    fn test_region_end_saturates() {
        let region = MemoryRegion::committed(u64::MAX - 1, 0x1000, Protection::READONLY);
        assert_eq!(region.end(), u64::MAX);
    }

    #[test]
    fn test_region_contains() {
        let region = MemoryRegion::committed(0x1000, 0x1000, Protection::READONLY);
        assert!(region.contains(0x1000));
        assert!(region.contains(0x1fff));
        assert!(!region.contains(0x2000));
        assert!(!region.contains(0xfff));
    }

    #[test]
    fn test_range_from_base_size() {
        let range = AddressRange::from_base_size(0x4000_0000, 0x2000);
        assert_eq!(range.end, 0x4000_2000);
        assert_eq!(range.len(), 0x2000);
        assert!(!range.is_empty());
        assert!(AddressRange::new(5, 5).is_empty());
    }
}
