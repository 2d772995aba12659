//! Frame layer backed by the x86_64 page tables.
//!
//! The kernel maps all physical memory at a fixed offset, so the heap's metadata pages are
//! reachable through that direct map without touching the heap's own virtual range.

use x86_64::{
    VirtAddr,
    structures::paging::{
        FrameAllocator, FrameDeallocator, Mapper, OffsetPageTable, Page, PageTableFlags,
        PhysFrame, Size4KiB, mapper::MapToError,
    },
};

use crate::{FrameLayer, MapError, PageFlags, PhysicalAddress, VirtualAddress};

/// A [`FrameLayer`] over the active level 4 page table.
///
/// `A` supplies physical frames both for heap pages and for any intermediate page tables
/// the mapper has to create.
pub struct PagingFrameLayer<'a, A> {
    mapper: OffsetPageTable<'a>,
    frames: A,
}

impl<'a, A> PagingFrameLayer<'a, A>
where
    A: FrameAllocator<Size4KiB> + FrameDeallocator<Size4KiB>,
{
    /// Creates a frame layer from a mapper and a frame allocator.
    pub fn new(mapper: OffsetPageTable<'a>, frames: A) -> Self {
        Self { mapper, frames }
    }

    /// Virtual address at which physical memory is mapped.
    pub fn physical_memory_offset(&self) -> VirtAddr {
        self.mapper.phys_offset()
    }

    /// Returns the frame allocator.
    pub fn frames(&mut self) -> &mut A {
        &mut self.frames
    }

    fn page(addr: VirtualAddress) -> Option<Page<Size4KiB>> {
        let addr = VirtAddr::try_new(addr.as_usize() as u64).ok()?;
        Some(Page::containing_address(addr))
    }
}

impl<A> FrameLayer for PagingFrameLayer<'_, A>
where
    A: FrameAllocator<Size4KiB> + FrameDeallocator<Size4KiB>,
{
    type Frame = PhysFrame<Size4KiB>;

    fn query_backing(&self, page: VirtualAddress) -> Option<Self::Frame> {
        self.mapper.translate_page(Self::page(page)?).ok()
    }

    fn allocate_frame(&mut self) -> Result<Self::Frame, MapError> {
        self.frames.allocate_frame().ok_or(MapError::OutOfFrames)
    }

    fn deallocate_frame(&mut self, frame: Self::Frame) {
        // SAFETY: the heap only returns frames it allocated and never mapped.
        unsafe { self.frames.deallocate_frame(frame) };
    }

    fn map(
        &mut self,
        page: VirtualAddress,
        frame: Self::Frame,
        flags: PageFlags,
    ) -> Result<(), MapError> {
        let Ok(addr) = VirtAddr::try_new(page.as_usize() as u64) else {
            return Err(MapError::MappingFailed);
        };
        let Ok(page) = Page::<Size4KiB>::from_start_address(addr) else {
            return Err(MapError::MappingFailed);
        };

        // SAFETY: `frame` was freshly allocated for this page, so no other mapping aliases it.
        let result =
            unsafe { self.mapper.map_to(page, frame, table_flags(flags), &mut self.frames) };
        match result {
            Ok(flush) => {
                flush.flush();
                Ok(())
            }
            Err(MapToError::FrameAllocationFailed) => Err(MapError::OutOfFrames),
            Err(MapToError::PageAlreadyMapped(_)) => Err(MapError::AlreadyMapped),
            Err(MapToError::ParentEntryHugePage) => Err(MapError::MappingFailed),
        }
    }

    fn unmap(&mut self, page: VirtualAddress) -> Option<Self::Frame> {
        let (frame, flush) = self.mapper.unmap(Self::page(page)?).ok()?;
        flush.flush();
        // SAFETY: the page that referenced `frame` has just been unmapped and flushed.
        unsafe { self.frames.deallocate_frame(frame) };
        Some(frame)
    }

    fn physical_base(&self, frame: Self::Frame) -> PhysicalAddress {
        PhysicalAddress::new(frame.start_address().as_u64() as usize)
    }

    fn frame_ptr(&self, frame: Self::Frame) -> *mut u8 {
        (self.mapper.phys_offset() + frame.start_address().as_u64()).as_mut_ptr()
    }
}

/// Translates heap page flags into hardware page table flags.
pub fn table_flags(flags: PageFlags) -> PageTableFlags {
    let mut result = PageTableFlags::empty();
    if flags.is_present() {
        result |= PageTableFlags::PRESENT;
    }
    if flags.is_writable() {
        result |= PageTableFlags::WRITABLE;
    }
    if flags.is_user() {
        result |= PageTableFlags::USER_ACCESSIBLE;
    }
    if flags.is_no_execute() {
        result |= PageTableFlags::NO_EXECUTE;
    }
    result
}
