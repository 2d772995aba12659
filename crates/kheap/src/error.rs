use core::fmt;

/// Errors reported by the kernel heap.
///
/// Every variant is recoverable: a failed operation leaves the heap and the frame
/// layer exactly as they were before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// No free run of pages is large enough, or frames ran out while backing one.
    OutOfSpace,
    /// A zero-byte allocation was requested.
    ZeroSize,
    /// The address lies outside the managed range.
    InvalidAddress,
    /// The address is inside the managed range but its page is not backed.
    Unmapped,
    /// No page in the managed range is backed by the requested physical frame.
    NotFound,
    /// The operation is not implemented by this heap.
    NotSupported,
    /// The pointer does not name a live allocation.
    InvalidFree,
    /// The heap range is empty, inverted, or not page-aligned.
    InvalidRange,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::OutOfSpace => "kernel heap out of space",
            Self::ZeroSize => "zero-sized allocation",
            Self::InvalidAddress => "address outside the kernel heap",
            Self::Unmapped => "address is not backed by a frame",
            Self::NotFound => "physical address is not mapped into the kernel heap",
            Self::NotSupported => "operation not supported",
            Self::InvalidFree => "pointer does not name a live allocation",
            Self::InvalidRange => "invalid kernel heap range",
        };
        f.write_str(msg)
    }
}

/// Errors reported by a [`FrameLayer`](crate::FrameLayer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// No physical frame is available.
    OutOfFrames,
    /// The virtual page already has a frame mapped.
    AlreadyMapped,
    /// The page tables could not be updated.
    MappingFailed,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::OutOfFrames => "out of physical frames",
            Self::AlreadyMapped => "page is already mapped",
            Self::MappingFailed => "failed to update page tables",
        };
        f.write_str(msg)
    }
}

impl From<MapError> for HeapError {
    fn from(_: MapError) -> Self {
        HeapError::OutOfSpace
    }
}
