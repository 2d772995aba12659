//! Kernel heap address-space layout.
//!
//! The heap manages one contiguous, page-aligned virtual range. The range is owned by
//! the kernel's memory layout; the heap only validates it and walks it.

use crate::{HeapError, VirtualAddress};

/// Page size in bytes (4 KiB).
pub const PAGE_SIZE: usize = 4096;

/// Mask selecting the offset of an address within its page.
pub const PAGE_OFFSET_MASK: usize = PAGE_SIZE - 1;

/// Default start of the kernel heap range.
pub const KERNEL_HEAP_START: usize = 0xF600_0000;

/// Default end (exclusive) of the kernel heap range.
pub const KERNEL_HEAP_MAX: usize = 0xFFFF_F000;

const _: () = assert!(PAGE_SIZE.is_power_of_two());

/// The virtual range `[start, end)` a kernel heap allocates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapLayout {
    start: VirtualAddress,
    end: VirtualAddress,
}

impl HeapLayout {
    /// The default kernel heap range.
    pub const KERNEL: HeapLayout = HeapLayout {
        start: VirtualAddress::new(KERNEL_HEAP_START),
        end: VirtualAddress::new(KERNEL_HEAP_MAX),
    };

    /// Creates a layout for `[start, end)`.
    ///
    /// Both bounds must be page-aligned and the range must hold at least one page.
    pub const fn new(start: VirtualAddress, end: VirtualAddress) -> Result<Self, HeapError> {
        if !start.is_aligned(PAGE_SIZE) || !end.is_aligned(PAGE_SIZE) {
            return Err(HeapError::InvalidRange);
        }
        if end.as_usize() <= start.as_usize() {
            return Err(HeapError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Creates a layout of `pages` pages starting at `start`.
    pub const fn with_pages(start: VirtualAddress, pages: usize) -> Result<Self, HeapError> {
        let Some(len) = pages.checked_mul(PAGE_SIZE) else {
            return Err(HeapError::InvalidRange);
        };
        let Some(end) = start.checked_add(len) else {
            return Err(HeapError::InvalidRange);
        };
        Self::new(start, end)
    }

    /// First address of the range.
    #[inline]
    pub const fn start(&self) -> VirtualAddress {
        self.start
    }

    /// First address past the end of the range.
    #[inline]
    pub const fn end(&self) -> VirtualAddress {
        self.end
    }

    /// Size of the range in bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.end.as_usize() - self.start.as_usize()
    }

    /// Number of pages in the range.
    #[inline]
    pub const fn page_count(&self) -> usize {
        self.capacity() / PAGE_SIZE
    }

    /// Returns true if `addr` lies inside `[start, end)`.
    #[inline]
    pub const fn contains(&self, addr: VirtualAddress) -> bool {
        addr.as_usize() >= self.start.as_usize() && addr.as_usize() < self.end.as_usize()
    }

    /// Iterates over the start address of every page in the range, lowest first.
    pub fn pages(&self) -> impl Iterator<Item = VirtualAddress> + use<> {
        (self.start.as_usize()..self.end.as_usize())
            .step_by(PAGE_SIZE)
            .map(VirtualAddress::new)
    }
}
