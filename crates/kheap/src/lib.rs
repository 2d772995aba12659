#![cfg_attr(not(any(test, feature = "software-emulation")), no_std)]

//! # Kernel Heap
//!
//! A page-granular allocator for kernel memory. It hands out virtually contiguous,
//! page-aligned regions from a fixed kernel address range and can translate between heap
//! addresses and the physical frames behind them. It provides:
//!
//! - First-fit placement over a single virtual range, with rollback on frame exhaustion.
//! - Allocation sizes stored in a metadata page in front of each allocation.
//! - A spin-locked wrapper that can serve as the kernel's global allocator.
//! - Frame layers for x86_64 page tables and for software emulation on any host.

extern crate alloc;

mod address;
pub mod arch;
mod error;
mod flags;
mod frame_layer;
mod heap;
mod layout;
mod locked;
mod metadata;
mod numbers;

pub use address::{PhysicalAddress, VirtualAddress};
pub use error::{HeapError, MapError};
pub use flags::PageFlags;
pub use frame_layer::FrameLayer;
pub use heap::KernelHeap;
pub use layout::{HeapLayout, KERNEL_HEAP_MAX, KERNEL_HEAP_START, PAGE_OFFSET_MASK, PAGE_SIZE};
pub use locked::LockedKernelHeap;
pub use numbers::{FrameNumber, PageNumber};
