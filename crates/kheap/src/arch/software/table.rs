//! Two-level page tables for software emulation.
//!
//! The emulated MMU is a scale model of classic 32-bit x86 paging:
//! - 32-bit virtual and physical addresses
//! - 2 levels (directory, table)
//! - 10-bit index at each level (1024 entries per table)
//! - 12-bit page offset (4 KiB pages)
//!
//! Address layout:
//! - Bits 0-11: Page offset
//! - Bits 12-21: Table index
//! - Bits 22-31: Directory index

use alloc::boxed::Box;

use crate::{MapError, PAGE_SIZE, PageFlags, PhysicalAddress, VirtualAddress};

use super::entry::PageEntry;

/// Number of entries in a directory or table.
const ENTRY_COUNT: usize = 1024;

/// Largest virtual address the emulated MMU can translate.
pub const MAX_VIRTUAL_ADDRESS: usize = u32::MAX as usize;

/// Returns the table index for a virtual address at the given level (0 = table, 1 = directory).
#[inline]
pub const fn page_index(address: usize, level: usize) -> usize {
    assert!(level < 2, "level out of range for software emulation (0-1)");
    let shift = 12 + level * 10;
    (address >> shift) & (ENTRY_COUNT - 1)
}

/// A leaf page table.
pub struct PageTable {
    entries: Box<[PageEntry; ENTRY_COUNT]>,
    present: usize,
}

impl PageTable {
    /// Creates a new, empty page table.
    pub fn new() -> Self {
        Self {
            entries: Box::new([PageEntry::default(); ENTRY_COUNT]),
            present: 0,
        }
    }

    /// Returns the entry at the given index.
    pub fn entry(&self, index: usize) -> PageEntry {
        self.entries[index]
    }

    /// Number of present entries in this table.
    pub fn present_entries(&self) -> usize {
        self.present
    }
}

impl Default for PageTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The root of an emulated address space.
///
/// Leaf tables are created the first time a page inside their 4 MiB span is mapped and
/// dropped again once their last page is unmapped.
pub struct PageDirectory {
    tables: Box<[Option<Box<PageTable>>; ENTRY_COUNT]>,
}

impl PageDirectory {
    /// Creates a page directory with no tables.
    pub fn new() -> Self {
        Self {
            tables: Box::new([const { None }; ENTRY_COUNT]),
        }
    }

    /// Maps the page at `virt` to the frame at `phys`.
    ///
    /// Both addresses must be page-aligned and representable in 32 bits. Mapping a page that
    /// is already present fails with [`MapError::AlreadyMapped`].
    pub fn map(
        &mut self,
        virt: VirtualAddress,
        phys: PhysicalAddress,
        flags: PageFlags,
    ) -> Result<(), MapError> {
        if !virt.is_aligned(PAGE_SIZE)
            || !phys.is_aligned(PAGE_SIZE)
            || virt.as_usize() > MAX_VIRTUAL_ADDRESS
            || phys.as_usize() > MAX_VIRTUAL_ADDRESS
        {
            return Err(MapError::MappingFailed);
        }

        let table = self.walk_or_create(virt);
        let index = page_index(virt.as_usize(), 0);
        if table.entries[index].is_present() {
            return Err(MapError::AlreadyMapped);
        }

        let mut flags = flags;
        flags.set_present(true);
        table.entries[index] = PageEntry::new(phys, flags);
        table.present += 1;
        Ok(())
    }

    /// Unmaps the page containing `virt`, returning the frame address that was mapped.
    pub fn unmap(&mut self, virt: VirtualAddress) -> Option<PhysicalAddress> {
        if virt.as_usize() > MAX_VIRTUAL_ADDRESS {
            return None;
        }

        let dir_index = page_index(virt.as_usize(), 1);
        let table = self.tables[dir_index].as_deref_mut()?;
        let entry = &mut table.entries[page_index(virt.as_usize(), 0)];
        let phys = entry.address()?;
        entry.clear();
        table.present -= 1;

        if table.present == 0 {
            self.tables[dir_index] = None;
        }
        Some(phys)
    }

    /// Returns the frame address mapped at the page containing `virt`.
    pub fn lookup(&self, virt: VirtualAddress) -> Option<PhysicalAddress> {
        self.entry(virt)?.address()
    }

    /// Returns the leaf entry for `virt`, or `None` if its table does not exist.
    pub fn entry(&self, virt: VirtualAddress) -> Option<PageEntry> {
        if virt.as_usize() > MAX_VIRTUAL_ADDRESS {
            return None;
        }
        let table = self.tables[page_index(virt.as_usize(), 1)].as_deref()?;
        Some(table.entry(page_index(virt.as_usize(), 0)))
    }

    /// Number of pages currently mapped.
    pub fn mapped_pages(&self) -> usize {
        self.tables
            .iter()
            .flatten()
            .map(|table| table.present_entries())
            .sum()
    }

    /// Number of leaf tables currently allocated.
    pub fn table_count(&self) -> usize {
        self.tables.iter().flatten().count()
    }

    fn walk_or_create(&mut self, virt: VirtualAddress) -> &mut PageTable {
        self.tables[page_index(virt.as_usize(), 1)]
            .get_or_insert_with(|| Box::new(PageTable::new()))
    }
}

impl Default for PageDirectory {
    fn default() -> Self {
        Self::new()
    }
}
