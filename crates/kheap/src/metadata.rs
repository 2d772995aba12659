//! Allocation size header stored in the page in front of each allocation.
//!
//! The heap keeps no allocation table. Instead the first page of every allocation holds a
//! single machine word: the payload size in bytes, always a non-zero multiple of
//! `PAGE_SIZE`. The caller's pointer starts one page later.

use crate::{FrameLayer, HeapLayout, PAGE_SIZE};

/// Writes `payload_size` into the metadata page backed by `frame`.
pub(crate) fn write_size<L: FrameLayer>(layer: &L, frame: L::Frame, payload_size: usize) {
    debug_assert!(payload_size != 0 && payload_size % PAGE_SIZE == 0);

    let ptr = layer.frame_ptr(frame).cast::<usize>();
    // SAFETY: `frame` is allocated and page-aligned, so its first word is in bounds and
    // aligned for `usize`.
    unsafe { ptr.write(payload_size) }
}

/// Reads the payload size stored in the metadata page backed by `frame`.
pub(crate) fn read_size<L: FrameLayer>(layer: &L, frame: L::Frame) -> usize {
    let ptr = layer.frame_ptr(frame).cast::<usize>();
    // SAFETY: see `write_size`.
    unsafe { ptr.read() }
}

/// Returns true if `size` could have been written by [`write_size`] for `layout`.
pub(crate) fn is_plausible(size: usize, layout: &HeapLayout) -> bool {
    size != 0 && size % PAGE_SIZE == 0 && size <= layout.capacity()
}
