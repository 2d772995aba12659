//! The kernel heap core.
//!
//! Every allocation occupies a run of consecutive pages inside the managed range. The first
//! page of the run holds the payload size and the caller receives the address of the
//! second page. Whether a page is free is decided solely by the
//! frame layer: a page is in use exactly when it is backed by a frame.
//!
//! Placement is first-fit and reverse translation is a linear walk, so both cost O(n) in the
//! number of pages in the range.

use crate::metadata;
use crate::{
    FrameLayer, HeapError, HeapLayout, MapError, PAGE_SIZE, PageFlags, PhysicalAddress,
    VirtualAddress,
};

/// A page-granular kernel heap over one [`HeapLayout`].
///
/// The heap itself holds no mutable state. Every operation takes the frame layer that
/// backs the range, and callers are responsible for serializing access to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelHeap {
    layout: HeapLayout,
}

impl KernelHeap {
    /// Creates a heap that allocates from `layout`.
    pub const fn new(layout: HeapLayout) -> Self {
        Self { layout }
    }

    /// Creates a heap over the default kernel heap range.
    pub const fn kernel() -> Self {
        Self::new(HeapLayout::KERNEL)
    }

    /// The managed range.
    pub const fn layout(&self) -> &HeapLayout {
        &self.layout
    }

    /// Allocates at least `size` bytes and returns the page-aligned start of the payload.
    ///
    /// The payload is rounded up to whole pages and preceded by one metadata page. If the
    /// frame layer runs out of frames part way through, every page backed by this call is
    /// released again before [`HeapError::OutOfSpace`] is returned.
    pub fn allocate<L: FrameLayer>(
        &self,
        layer: &mut L,
        size: usize,
    ) -> Result<VirtualAddress, HeapError> {
        if size == 0 {
            return Err(HeapError::ZeroSize);
        }

        let payload_pages = size.div_ceil(PAGE_SIZE);
        let Some(total_pages) = payload_pages
            .checked_add(1)
            .filter(|&total| total <= self.layout.page_count())
        else {
            log::debug!("kernel heap request of {} bytes exceeds the heap range", size);
            return Err(HeapError::OutOfSpace);
        };

        let Some(start) = self.find_free_run(layer, total_pages) else {
            log::debug!("no run of {} free pages in the kernel heap", total_pages);
            return Err(HeapError::OutOfSpace);
        };

        let metadata_frame = Self::back_run(layer, start, total_pages)?;
        metadata::write_size(layer, metadata_frame, payload_pages * PAGE_SIZE);

        let payload = start + PAGE_SIZE;
        log::trace!("allocated {} bytes at {} ({} pages)", size, payload, total_pages);
        Ok(payload)
    }

    /// Frees the allocation whose payload starts at `ptr`.
    ///
    /// Pointers that do not name a live allocation are ignored. Use
    /// [`try_free`](Self::try_free) to find out why a pointer was rejected.
    pub fn free<L: FrameLayer>(&self, layer: &mut L, ptr: VirtualAddress) {
        if let Err(err) = self.try_free(layer, ptr) {
            log::debug!("ignoring free of {}: {}", ptr, err);
        }
    }

    /// Frees the allocation whose payload starts at `ptr`, reporting invalid pointers.
    ///
    /// Fails with [`HeapError::InvalidAddress`] if `ptr` is outside the managed range, and
    /// with [`HeapError::InvalidFree`] if it is inside the range but does not point at the
    /// payload of a live allocation. Nothing is unmapped on failure.
    pub fn try_free<L: FrameLayer>(
        &self,
        layer: &mut L,
        ptr: VirtualAddress,
    ) -> Result<(), HeapError> {
        let (metadata_page, size) = self.locate(layer, ptr)?;

        let pages = size / PAGE_SIZE + 1;
        for index in 0..pages {
            let page = metadata_page + index * PAGE_SIZE;
            if layer.unmap(page).is_none() {
                log::warn!("kernel heap page {} was not backed during free", page);
            }
        }

        log::trace!("freed {} bytes at {}", size, ptr);
        Ok(())
    }

    /// Returns the payload size recorded for the allocation at `ptr`.
    ///
    /// The size is always a whole number of pages. Fails in the same cases as
    /// [`try_free`](Self::try_free).
    pub fn allocation_size<L: FrameLayer>(
        &self,
        layer: &L,
        ptr: VirtualAddress,
    ) -> Result<usize, HeapError> {
        self.locate(layer, ptr).map(|(_, size)| size)
    }

    /// Translates a heap address to the physical address that backs it.
    pub fn translate_to_physical<L: FrameLayer>(
        &self,
        layer: &L,
        virt: VirtualAddress,
    ) -> Result<PhysicalAddress, HeapError> {
        if !self.layout.contains(virt) {
            return Err(HeapError::InvalidAddress);
        }

        let frame = layer
            .query_backing(virt.page_base())
            .ok_or(HeapError::Unmapped)?;
        let base = layer.physical_base(frame);
        Ok(PhysicalAddress::new(base.as_usize() | virt.page_offset()))
    }

    /// Finds the heap address that maps to `phys`.
    ///
    /// Walks the whole range in ascending order and returns the first page backed by the
    /// frame containing `phys`. Fails with [`HeapError::NotFound`] if no heap page is
    /// backed by that frame.
    pub fn translate_to_virtual<L: FrameLayer>(
        &self,
        layer: &L,
        phys: PhysicalAddress,
    ) -> Result<VirtualAddress, HeapError> {
        let target = phys.page_base();
        self.layout
            .pages()
            .find(|&page| {
                layer
                    .query_backing(page)
                    .is_some_and(|frame| layer.physical_base(frame) == target)
            })
            .map(|page| VirtualAddress::new(page.as_usize() | phys.page_offset()))
            .ok_or(HeapError::NotFound)
    }

    /// Resizing allocations in place is not supported.
    pub fn realloc<L: FrameLayer>(
        &self,
        _layer: &mut L,
        _ptr: VirtualAddress,
        _new_size: usize,
    ) -> Result<VirtualAddress, HeapError> {
        Err(HeapError::NotSupported)
    }

    /// Number of pages in the managed range that are currently backed.
    pub fn backed_pages<L: FrameLayer>(&self, layer: &L) -> usize {
        self.layout
            .pages()
            .filter(|&page| layer.query_backing(page).is_some())
            .count()
    }

    /// Returns the first page of the lowest run of `pages` consecutive unbacked pages.
    fn find_free_run<L: FrameLayer>(&self, layer: &L, pages: usize) -> Option<VirtualAddress> {
        let mut run_start = self.layout.start();
        let mut run_length = 0;

        for page in self.layout.pages() {
            if layer.query_backing(page).is_some() {
                if cfg!(feature = "detailed-logging") && run_length > 0 {
                    log::trace!("run of {} pages at {} ends at {}", run_length, run_start, page);
                }
                run_length = 0;
                continue;
            }

            if run_length == 0 {
                run_start = page;
            }
            run_length += 1;
            if run_length == pages {
                return Some(run_start);
            }
        }

        None
    }

    /// Backs `pages` pages starting at `start`, lowest first, and returns the frame behind
    /// the first page.
    ///
    /// On failure every page backed so far is unmapped again.
    fn back_run<L: FrameLayer>(
        layer: &mut L,
        start: VirtualAddress,
        pages: usize,
    ) -> Result<L::Frame, HeapError> {
        let mut first = None;

        for index in 0..pages {
            let page = start + index * PAGE_SIZE;
            match Self::back_page(layer, page) {
                Ok(frame) => {
                    #[cfg(feature = "detailed-logging")]
                    log::trace!("backed heap page {} with {}", page, layer.physical_base(frame));
                    first.get_or_insert(frame);
                }
                Err(err) => {
                    log::warn!(
                        "failed to back kernel heap page {}: {}; releasing {} pages",
                        page,
                        err,
                        index
                    );
                    for backed in 0..index {
                        layer.unmap(start + backed * PAGE_SIZE);
                    }
                    return Err(err.into());
                }
            }
        }

        first.ok_or(HeapError::OutOfSpace)
    }

    fn back_page<L: FrameLayer>(
        layer: &mut L,
        page: VirtualAddress,
    ) -> Result<L::Frame, MapError> {
        let frame = layer.allocate_frame()?;
        if let Err(err) = layer.map(page, frame, PageFlags::kernel_data()) {
            layer.deallocate_frame(frame);
            return Err(err);
        }
        Ok(frame)
    }

    /// Validates `ptr` as the payload pointer of a live allocation, returning its metadata
    /// page and payload size.
    fn locate<L: FrameLayer>(
        &self,
        layer: &L,
        ptr: VirtualAddress,
    ) -> Result<(VirtualAddress, usize), HeapError> {
        if !self.layout.contains(ptr) {
            return Err(HeapError::InvalidAddress);
        }
        if !ptr.is_aligned(PAGE_SIZE) || ptr == self.layout.start() {
            return Err(HeapError::InvalidFree);
        }

        let metadata_page = ptr - PAGE_SIZE;
        let frame = layer
            .query_backing(metadata_page)
            .ok_or(HeapError::InvalidFree)?;

        let size = metadata::read_size(layer, frame);
        if !metadata::is_plausible(size, &self.layout) {
            return Err(HeapError::InvalidFree);
        }
        match ptr.checked_add(size) {
            Some(end) if end <= self.layout.end() => Ok((metadata_page, size)),
            _ => Err(HeapError::InvalidFree),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::software::{DEFAULT_FRAME_BASE, EmulatedAddressSpace};
    use crate::{FrameNumber, KERNEL_HEAP_START};

    const BASE: VirtualAddress = VirtualAddress::new(KERNEL_HEAP_START);

    fn setup(pages: usize, frames: usize) -> (KernelHeap, EmulatedAddressSpace) {
        let layout = HeapLayout::with_pages(BASE, pages).unwrap();
        (KernelHeap::new(layout), EmulatedAddressSpace::new(frames))
    }

    fn page(index: usize) -> VirtualAddress {
        BASE + index * PAGE_SIZE
    }

    fn write_metadata(space: &EmulatedAddressSpace, ptr: VirtualAddress, value: usize) {
        let frame = space.query_backing(ptr - PAGE_SIZE).unwrap();
        unsafe { space.frame_ptr(frame).cast::<usize>().write(value) };
    }

    /// Delegates to an emulated address space but fails every map after the first `maps`.
    struct FailingLayer {
        inner: EmulatedAddressSpace,
        maps: usize,
    }

    impl FrameLayer for FailingLayer {
        type Frame = FrameNumber;

        fn query_backing(&self, page: VirtualAddress) -> Option<FrameNumber> {
            self.inner.query_backing(page)
        }

        fn allocate_frame(&mut self) -> Result<FrameNumber, MapError> {
            self.inner.allocate_frame()
        }

        fn deallocate_frame(&mut self, frame: FrameNumber) {
            self.inner.deallocate_frame(frame)
        }

        fn map(
            &mut self,
            page: VirtualAddress,
            frame: FrameNumber,
            flags: PageFlags,
        ) -> Result<(), MapError> {
            if self.maps == 0 {
                return Err(MapError::MappingFailed);
            }
            self.maps -= 1;
            self.inner.map(page, frame, flags)
        }

        fn unmap(&mut self, page: VirtualAddress) -> Option<FrameNumber> {
            self.inner.unmap(page)
        }

        fn physical_base(&self, frame: FrameNumber) -> PhysicalAddress {
            self.inner.physical_base(frame)
        }

        fn frame_ptr(&self, frame: FrameNumber) -> *mut u8 {
            self.inner.frame_ptr(frame)
        }
    }

    mod allocate {
        use super::*;

        #[test]
        fn zero_size_is_rejected() {
            let (heap, mut space) = setup(8, 8);
            assert_eq!(heap.allocate(&mut space, 0), Err(HeapError::ZeroSize));
            assert_eq!(heap.backed_pages(&space), 0);
            assert_eq!(space.free_frames(), 8);
        }

        #[test]
        fn single_page() {
            let (heap, mut space) = setup(8, 8);
            let ptr = heap.allocate(&mut space, 1).unwrap();

            assert_eq!(ptr, page(1));
            assert!(ptr.is_aligned(PAGE_SIZE));
            assert_eq!(heap.backed_pages(&space), 2);
            assert_eq!(heap.allocation_size(&space, ptr), Ok(PAGE_SIZE));
        }

        #[test]
        fn size_is_rounded_up_to_pages() {
            let (heap, mut space) = setup(8, 8);
            let ptr = heap.allocate(&mut space, PAGE_SIZE + 1).unwrap();

            assert_eq!(heap.allocation_size(&space, ptr), Ok(2 * PAGE_SIZE));
            assert_eq!(heap.backed_pages(&space), 3);
        }

        #[test]
        fn metadata_page_holds_payload_size() {
            let (heap, mut space) = setup(8, 8);
            let ptr = heap.allocate(&mut space, 3 * PAGE_SIZE - 100).unwrap();

            let frame = space.query_backing(ptr - PAGE_SIZE).unwrap();
            let stored = unsafe { space.frame_ptr(frame).cast::<usize>().read() };
            assert_eq!(stored, 3 * PAGE_SIZE);
        }

        #[test]
        fn exact_page_multiple() {
            let (heap, mut space) = setup(8, 8);
            let ptr = heap.allocate(&mut space, 2 * PAGE_SIZE).unwrap();
            assert_eq!(heap.allocation_size(&space, ptr), Ok(2 * PAGE_SIZE));
            assert_eq!(heap.backed_pages(&space), 3);
        }

        #[test]
        fn first_fit_reuses_lowest_hole() {
            let (heap, mut space) = setup(16, 16);
            let a = heap.allocate(&mut space, PAGE_SIZE).unwrap();
            let b = heap.allocate(&mut space, PAGE_SIZE).unwrap();
            let c = heap.allocate(&mut space, PAGE_SIZE).unwrap();
            assert_eq!((a, b, c), (page(1), page(3), page(5)));

            heap.free(&mut space, b);

            // A two-page hole fits a one-page allocation but not a two-page one.
            assert_eq!(heap.allocate(&mut space, 2 * PAGE_SIZE), Ok(page(7)));
            assert_eq!(heap.allocate(&mut space, PAGE_SIZE), Ok(b));
        }

        #[test]
        fn first_fit_is_repeatable() {
            let run = || {
                let (heap, mut space) = setup(16, 16);
                let sizes = [PAGE_SIZE, 3 * PAGE_SIZE, 10, 2 * PAGE_SIZE];
                let ptrs: Vec<_> = sizes
                    .iter()
                    .map(|&size| heap.allocate(&mut space, size).unwrap())
                    .collect();
                heap.free(&mut space, ptrs[1]);
                let reused = heap.allocate(&mut space, PAGE_SIZE).unwrap();
                (ptrs, reused)
            };

            let (ptrs, reused) = run();
            assert_eq!(run(), (ptrs.clone(), reused));
            assert_eq!(reused, ptrs[1]);
        }

        #[test]
        fn live_allocations_do_not_overlap() {
            let (heap, mut space) = setup(32, 32);
            let sizes = [1, PAGE_SIZE * 2, 5000, PAGE_SIZE, 3 * PAGE_SIZE + 1];
            let spans: Vec<_> = sizes
                .iter()
                .map(|&size| {
                    let ptr = heap.allocate(&mut space, size).unwrap();
                    let len = heap.allocation_size(&space, ptr).unwrap();
                    (ptr - PAGE_SIZE, ptr + len)
                })
                .collect();

            for (i, a) in spans.iter().enumerate() {
                for b in &spans[i + 1..] {
                    assert!(a.1 <= b.0 || b.1 <= a.0, "{:?} overlaps {:?}", a, b);
                }
            }
        }

        #[test]
        fn oversized_requests_fail() {
            let (heap, mut space) = setup(4, 8);
            assert_eq!(heap.allocate(&mut space, usize::MAX), Err(HeapError::OutOfSpace));
            // The whole range leaves no room for the metadata page.
            assert_eq!(heap.allocate(&mut space, 4 * PAGE_SIZE), Err(HeapError::OutOfSpace));
            assert_eq!(heap.allocate(&mut space, 3 * PAGE_SIZE), Ok(page(1)));
            assert_eq!(space.free_frames(), 4);
        }

        #[test]
        fn exhaust_and_reuse() {
            let (heap, mut space) = setup(3, 8);
            let p0 = heap.allocate(&mut space, PAGE_SIZE).unwrap();
            assert_eq!(heap.allocate(&mut space, PAGE_SIZE), Err(HeapError::OutOfSpace));

            heap.free(&mut space, p0);
            assert_eq!(heap.allocate(&mut space, PAGE_SIZE), Ok(p0));
        }

        #[test]
        fn frame_exhaustion_rolls_back() {
            let (heap, mut space) = setup(8, 3);
            assert_eq!(heap.allocate(&mut space, 3 * PAGE_SIZE), Err(HeapError::OutOfSpace));

            assert_eq!(heap.backed_pages(&space), 0);
            assert_eq!(space.free_frames(), 3);
            assert_eq!(space.mapped_pages(), 0);

            // A smaller request still fits in the frames that were handed back.
            assert_eq!(heap.allocate(&mut space, 2 * PAGE_SIZE), Ok(page(1)));
        }

        #[test]
        fn rollback_keeps_existing_allocations() {
            let (heap, mut space) = setup(8, 4);
            let live = heap.allocate(&mut space, PAGE_SIZE).unwrap();

            assert_eq!(heap.allocate(&mut space, 2 * PAGE_SIZE), Err(HeapError::OutOfSpace));
            assert_eq!(heap.backed_pages(&space), 2);
            assert_eq!(space.free_frames(), 2);
            assert_eq!(heap.allocation_size(&space, live), Ok(PAGE_SIZE));
        }

        #[test]
        fn map_failure_returns_unmapped_frame() {
            let layout = HeapLayout::with_pages(BASE, 8).unwrap();
            let heap = KernelHeap::new(layout);
            let mut layer = FailingLayer {
                inner: EmulatedAddressSpace::new(8),
                maps: 2,
            };

            assert_eq!(heap.allocate(&mut layer, 2 * PAGE_SIZE), Err(HeapError::OutOfSpace));
            assert_eq!(heap.backed_pages(&layer), 0);
            assert_eq!(layer.inner.free_frames(), 8);
        }

        #[test]
        fn default_kernel_range() {
            let heap = KernelHeap::kernel();
            let mut space = EmulatedAddressSpace::new(4);
            let ptr = heap.allocate(&mut space, 100).unwrap();
            assert_eq!(ptr, VirtualAddress::new(0xF600_1000));
        }
    }

    mod free {
        use super::*;

        #[test]
        fn free_restores_backing_state() {
            let (heap, mut space) = setup(8, 8);
            let keep = heap.allocate(&mut space, PAGE_SIZE).unwrap();
            let before = (heap.backed_pages(&space), space.free_frames());

            let ptr = heap.allocate(&mut space, 3 * PAGE_SIZE).unwrap();
            assert_eq!(heap.try_free(&mut space, ptr), Ok(()));

            assert_eq!((heap.backed_pages(&space), space.free_frames()), before);
            assert_eq!(heap.allocation_size(&space, keep), Ok(PAGE_SIZE));
        }

        #[test]
        fn double_free_is_rejected() {
            let (heap, mut space) = setup(8, 8);
            let ptr = heap.allocate(&mut space, PAGE_SIZE).unwrap();

            assert_eq!(heap.try_free(&mut space, ptr), Ok(()));
            assert_eq!(heap.try_free(&mut space, ptr), Err(HeapError::InvalidFree));
            heap.free(&mut space, ptr);
            assert_eq!(space.free_frames(), 8);
        }

        #[test]
        fn interior_pointer_is_rejected() {
            let (heap, mut space) = setup(8, 8);
            let ptr = heap.allocate(&mut space, 3 * PAGE_SIZE).unwrap();

            assert_eq!(heap.try_free(&mut space, ptr + PAGE_SIZE), Err(HeapError::InvalidFree));
            assert_eq!(heap.try_free(&mut space, ptr + 8), Err(HeapError::InvalidFree));
            assert_eq!(heap.backed_pages(&space), 4);
            assert_eq!(heap.allocation_size(&space, ptr), Ok(3 * PAGE_SIZE));
        }

        #[test]
        fn out_of_range_is_rejected() {
            let (heap, mut space) = setup(8, 8);
            heap.allocate(&mut space, PAGE_SIZE).unwrap();

            assert_eq!(
                heap.try_free(&mut space, VirtualAddress::new(0x1000)),
                Err(HeapError::InvalidAddress)
            );
            assert_eq!(heap.try_free(&mut space, page(8)), Err(HeapError::InvalidAddress));
            heap.free(&mut space, VirtualAddress::new(0x1000));
            assert_eq!(heap.backed_pages(&space), 2);
        }

        #[test]
        fn range_start_is_rejected() {
            let (heap, mut space) = setup(8, 8);
            heap.allocate(&mut space, PAGE_SIZE).unwrap();
            assert_eq!(heap.try_free(&mut space, BASE), Err(HeapError::InvalidFree));
        }

        #[test]
        fn unbacked_pointer_is_rejected() {
            let (heap, mut space) = setup(8, 8);
            assert_eq!(heap.try_free(&mut space, page(4)), Err(HeapError::InvalidFree));
        }

        #[test]
        fn corrupt_metadata_is_rejected() {
            let (heap, mut space) = setup(8, 8);
            let ptr = heap.allocate(&mut space, PAGE_SIZE).unwrap();

            for bad in [0, 123, PAGE_SIZE + 1, 9 * PAGE_SIZE] {
                write_metadata(&space, ptr, bad);
                assert_eq!(heap.try_free(&mut space, ptr), Err(HeapError::InvalidFree));
            }
            assert_eq!(heap.backed_pages(&space), 2);

            write_metadata(&space, ptr, PAGE_SIZE);
            assert_eq!(heap.try_free(&mut space, ptr), Ok(()));
        }

        #[test]
        fn span_past_range_end_is_rejected() {
            let (heap, mut space) = setup(4, 8);
            let ptr = heap.allocate(&mut space, PAGE_SIZE).unwrap();

            // Plausible on its own, but the payload would run past the end of the range.
            write_metadata(&space, ptr, 4 * PAGE_SIZE);
            assert_eq!(heap.try_free(&mut space, ptr), Err(HeapError::InvalidFree));
        }
    }

    mod translate {
        use super::*;

        #[test]
        fn to_physical_keeps_page_offset() {
            let (heap, mut space) = setup(8, 8);
            let ptr = heap.allocate(&mut space, PAGE_SIZE).unwrap();

            // Frames are handed out lowest first, so the payload sits in the second frame.
            assert_eq!(
                heap.translate_to_physical(&space, ptr + 0x123),
                Ok(DEFAULT_FRAME_BASE + PAGE_SIZE + 0x123)
            );
            assert_eq!(
                heap.translate_to_physical(&space, ptr - PAGE_SIZE),
                Ok(DEFAULT_FRAME_BASE)
            );
        }

        #[test]
        fn to_physical_rejects_bad_addresses() {
            let (heap, mut space) = setup(8, 8);
            heap.allocate(&mut space, PAGE_SIZE).unwrap();

            assert_eq!(
                heap.translate_to_physical(&space, BASE - 1),
                Err(HeapError::InvalidAddress)
            );
            assert_eq!(
                heap.translate_to_physical(&space, page(8)),
                Err(HeapError::InvalidAddress)
            );
            assert_eq!(
                heap.translate_to_physical(&space, page(5) + 7),
                Err(HeapError::Unmapped)
            );
        }

        #[test]
        fn round_trip() {
            let (heap, mut space) = setup(16, 16);
            heap.allocate(&mut space, PAGE_SIZE).unwrap();
            let ptr = heap.allocate(&mut space, 3 * PAGE_SIZE).unwrap();

            for offset in [0, 1, 0xFFF, PAGE_SIZE, 2 * PAGE_SIZE + 0x800, 3 * PAGE_SIZE - 1] {
                let virt = ptr + offset;
                let phys = heap.translate_to_physical(&space, virt).unwrap();
                assert_eq!(heap.translate_to_virtual(&space, phys), Ok(virt));
            }
        }

        #[test]
        fn to_virtual_not_found() {
            let (heap, mut space) = setup(8, 8);
            let ptr = heap.allocate(&mut space, PAGE_SIZE).unwrap();
            let phys = heap.translate_to_physical(&space, ptr).unwrap();

            assert_eq!(
                heap.translate_to_virtual(&space, PhysicalAddress::new(0xDEAD_0000)),
                Err(HeapError::NotFound)
            );

            heap.free(&mut space, ptr);
            assert_eq!(heap.translate_to_virtual(&space, phys), Err(HeapError::NotFound));
        }
    }

    #[test]
    fn realloc_is_not_supported() {
        let (heap, mut space) = setup(8, 8);
        let ptr = heap.allocate(&mut space, PAGE_SIZE).unwrap();

        assert_eq!(
            heap.realloc(&mut space, ptr, 2 * PAGE_SIZE),
            Err(HeapError::NotSupported)
        );
        assert_eq!(heap.allocation_size(&space, ptr), Ok(PAGE_SIZE));
    }
}
