//! Emulated physical memory for software simulation.

use alloc::vec::Vec;
use core::ptr::NonNull;

use crate::{FrameNumber, PAGE_SIZE, PhysicalAddress};

/// A pool of emulated physical frames.
///
/// The pool owns a host buffer covering `frame_count` frames starting at `base`, and hands
/// frames out lowest-address first. Freshly allocated frames are zeroed.
pub struct EmulatedFrames {
    /// Backing storage. Only accessed through `memory_ptr` after construction.
    memory: Vec<u8>,
    memory_ptr: NonNull<u8>,
    base: PhysicalAddress,
    /// One bit per frame, set while the frame is allocated.
    used: Vec<u64>,
    frame_count: usize,
    allocated: usize,
}

// SAFETY: `memory_ptr` points into `memory`, which the pool owns exclusively.
unsafe impl Send for EmulatedFrames {}

impl EmulatedFrames {
    /// Creates a pool of `frame_count` frames whose first frame is at `base`.
    ///
    /// # Panics
    ///
    /// Panics if `base` is not page-aligned.
    pub fn new(base: PhysicalAddress, frame_count: usize) -> Self {
        assert!(base.is_aligned(PAGE_SIZE), "frame pool base must be page-aligned");

        let mut memory = alloc::vec![0u8; frame_count * PAGE_SIZE];
        let memory_ptr = NonNull::new(memory.as_mut_ptr()).unwrap_or(NonNull::dangling());

        Self {
            memory,
            memory_ptr,
            base,
            used: alloc::vec![0u64; frame_count.div_ceil(64)],
            frame_count,
            allocated: 0,
        }
    }

    /// Allocates the lowest free frame.
    pub fn allocate(&mut self) -> Option<FrameNumber> {
        let index = (0..self.frame_count).find(|&i| !self.is_used(i))?;
        self.used[index / 64] |= 1 << (index % 64);
        self.allocated += 1;

        // SAFETY: `index < frame_count`, so the whole frame lies inside `memory`.
        unsafe {
            self.memory_ptr
                .as_ptr()
                .add(index * PAGE_SIZE)
                .write_bytes(0, PAGE_SIZE);
        }

        Some(self.frame_at(index))
    }

    /// Returns `frame` to the pool.
    ///
    /// Frames that do not belong to the pool, or are already free, are ignored.
    pub fn free(&mut self, frame: FrameNumber) {
        let Some(index) = self.index_of(frame) else {
            log::warn!("ignoring free of foreign frame {:?}", frame);
            return;
        };
        if !self.is_used(index) {
            log::warn!("ignoring double free of frame {:?}", frame);
            return;
        }

        self.used[index / 64] &= !(1 << (index % 64));
        self.allocated -= 1;
    }

    /// Returns a pointer to the first byte of `frame`.
    ///
    /// The pointer is only dereferenceable if `frame` belongs to the pool.
    pub fn frame_ptr(&self, frame: FrameNumber) -> *mut u8 {
        debug_assert!(self.index_of(frame).is_some(), "frame {:?} is not in this pool", frame);
        let offset = frame.start().as_usize().wrapping_sub(self.base.as_usize());
        self.memory_ptr.as_ptr().wrapping_add(offset)
    }

    /// Total number of frames in the pool.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Number of frames not currently allocated.
    pub fn free_frames(&self) -> usize {
        self.frame_count - self.allocated
    }

    /// Size of the emulated memory in bytes.
    pub fn size(&self) -> usize {
        self.memory.len()
    }

    fn frame_at(&self, index: usize) -> FrameNumber {
        (self.base + index * PAGE_SIZE).frame_number()
    }

    fn index_of(&self, frame: FrameNumber) -> Option<usize> {
        let addr = frame.start().as_usize();
        let offset = addr.checked_sub(self.base.as_usize())?;
        let index = offset / PAGE_SIZE;
        (index < self.frame_count).then_some(index)
    }

    fn is_used(&self, index: usize) -> bool {
        self.used[index / 64] & (1 << (index % 64)) != 0
    }
}
