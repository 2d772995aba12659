//! The contract between the kernel heap and the page-table/frame layer underneath it.
//!
//! The heap never tracks physical memory or page tables on its own. Whether a heap page
//! is in use is answered solely by asking the frame layer whether the page is backed,
//! and every page the heap hands out is backed through this trait.

use crate::{MapError, PageFlags, PhysicalAddress, VirtualAddress};

/// Page-table and physical-frame services the kernel heap is built on.
///
/// Implementations are not expected to be thread-safe; callers serialize access (see
/// [`LockedKernelHeap`](crate::LockedKernelHeap)).
pub trait FrameLayer {
    /// Handle identifying one physical frame.
    type Frame: Copy;

    /// Returns the frame backing the page that contains `page`, if any.
    fn query_backing(&self, page: VirtualAddress) -> Option<Self::Frame>;

    /// Allocates a fresh physical frame.
    fn allocate_frame(&mut self) -> Result<Self::Frame, MapError>;

    /// Returns a frame obtained from [`allocate_frame`](Self::allocate_frame) that was never
    /// mapped.
    fn deallocate_frame(&mut self, frame: Self::Frame);

    /// Maps `frame` at the page-aligned address `page`.
    fn map(&mut self, page: VirtualAddress, frame: Self::Frame, flags: PageFlags)
    -> Result<(), MapError>;

    /// Unmaps the page at `page` and releases its frame, returning the frame that was mapped.
    fn unmap(&mut self, page: VirtualAddress) -> Option<Self::Frame>;

    /// Returns the physical address of the first byte of `frame`.
    fn physical_base(&self, frame: Self::Frame) -> PhysicalAddress;

    /// Returns a pointer through which the kernel can read and write `frame`'s contents.
    ///
    /// The pointer is valid for `PAGE_SIZE` bytes for as long as the frame stays allocated.
    fn frame_ptr(&self, frame: Self::Frame) -> *mut u8;
}
