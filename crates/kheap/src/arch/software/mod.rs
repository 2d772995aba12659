//! Software emulation of the paging hardware under the kernel heap.
//!
//! This module provides an emulated MMU and physical memory that run on any host, so the
//! heap can be exercised without real page tables. The emulation is a scale model of
//! 32-bit x86 paging: two table levels, 1024 entries per table and 4 KiB pages. Frame
//! contents live in an ordinary host buffer, which lets the heap read and write its
//! metadata pages exactly as it would through a direct map.

mod entry;
mod frames;
mod table;

pub use entry::PageEntry;
pub use frames::EmulatedFrames;
pub use table::{MAX_VIRTUAL_ADDRESS, PageDirectory, PageTable, page_index};

use crate::{
    FrameLayer, FrameNumber, MapError, PAGE_SIZE, PageFlags, PhysicalAddress, VirtualAddress,
};

/// Default physical address of the first emulated frame.
pub const DEFAULT_FRAME_BASE: PhysicalAddress = PhysicalAddress::new(0x0010_0000);

/// An emulated address space: one page directory plus the frame pool that backs it.
pub struct EmulatedAddressSpace {
    directory: PageDirectory,
    frames: EmulatedFrames,
}

impl EmulatedAddressSpace {
    /// Creates an address space with `frame_count` frames of physical memory.
    pub fn new(frame_count: usize) -> Self {
        Self::with_frame_base(DEFAULT_FRAME_BASE, frame_count)
    }

    /// Creates an address space whose physical memory starts at `base`.
    pub fn with_frame_base(base: PhysicalAddress, frame_count: usize) -> Self {
        Self {
            directory: PageDirectory::new(),
            frames: EmulatedFrames::new(base, frame_count),
        }
    }

    /// Number of frames not currently allocated.
    pub fn free_frames(&self) -> usize {
        self.frames.free_frames()
    }

    /// Number of pages currently mapped.
    pub fn mapped_pages(&self) -> usize {
        self.directory.mapped_pages()
    }

    /// The page directory.
    pub fn directory(&self) -> &PageDirectory {
        &self.directory
    }

    /// The frame pool.
    pub fn frames(&self) -> &EmulatedFrames {
        &self.frames
    }
}

impl FrameLayer for EmulatedAddressSpace {
    type Frame = FrameNumber;

    fn query_backing(&self, page: VirtualAddress) -> Option<FrameNumber> {
        self.directory.lookup(page).map(PhysicalAddress::frame_number)
    }

    fn allocate_frame(&mut self) -> Result<FrameNumber, MapError> {
        self.frames.allocate().ok_or(MapError::OutOfFrames)
    }

    fn deallocate_frame(&mut self, frame: FrameNumber) {
        self.frames.free(frame);
    }

    fn map(
        &mut self,
        page: VirtualAddress,
        frame: FrameNumber,
        flags: PageFlags,
    ) -> Result<(), MapError> {
        if !page.is_aligned(PAGE_SIZE) {
            return Err(MapError::MappingFailed);
        }
        self.directory.map(page, frame.start(), flags)
    }

    fn unmap(&mut self, page: VirtualAddress) -> Option<FrameNumber> {
        let frame = self.directory.unmap(page)?.frame_number();
        self.frames.free(frame);
        Some(frame)
    }

    fn physical_base(&self, frame: FrameNumber) -> PhysicalAddress {
        frame.start()
    }

    fn frame_ptr(&self, frame: FrameNumber) -> *mut u8 {
        self.frames.frame_ptr(frame)
    }
}
