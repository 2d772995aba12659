//! A spin-locked kernel heap usable as the global allocator.

use core::alloc::{GlobalAlloc, Layout};
use core::ptr;

use crate::{FrameLayer, KernelHeap, PAGE_SIZE, VirtualAddress};

struct InnerHeap<L> {
    heap: KernelHeap,
    layer: L,
}

/// A [`KernelHeap`] and its frame layer behind a spin lock.
///
/// The heap starts out empty and hands out null pointers until [`init`](Self::init) installs
/// a heap and the frame layer backing it.
///
/// ```ignore
/// #[global_allocator]
/// static KERNEL_HEAP: LockedKernelHeap<Layer> = LockedKernelHeap::empty();
///
/// KERNEL_HEAP.init(KernelHeap::kernel(), layer);
/// ```
pub struct LockedKernelHeap<L> {
    inner: spin::Mutex<Option<InnerHeap<L>>>,
}

impl<L> LockedKernelHeap<L> {
    /// Creates an uninitialized heap.
    pub const fn empty() -> Self {
        Self {
            inner: spin::Mutex::new(None),
        }
    }
}

impl<L: FrameLayer> LockedKernelHeap<L> {
    /// Installs `heap` and the frame layer that backs it, replacing any previous heap.
    pub fn init(&self, heap: KernelHeap, layer: L) {
        let mut inner = self.inner.lock();
        *inner = Some(InnerHeap { heap, layer });
    }

    /// Returns true once [`init`](Self::init) has been called.
    pub fn is_initialized(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Runs `f` with the heap and its frame layer while holding the lock.
    ///
    /// Returns `None` if the heap has not been initialized.
    pub fn with<R>(&self, f: impl FnOnce(&KernelHeap, &mut L) -> R) -> Option<R> {
        let mut inner = self.inner.lock();
        let inner = inner.as_mut()?;
        Some(f(&inner.heap, &mut inner.layer))
    }
}

unsafe impl<L: FrameLayer> GlobalAlloc for LockedKernelHeap<L> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if layout.align() > PAGE_SIZE {
            log::error!("kernel heap cannot satisfy {}-byte alignment", layout.align());
            return ptr::null_mut();
        }

        match &mut *self.inner.lock() {
            None => ptr::null_mut(),
            Some(inner) => inner
                .heap
                .allocate(&mut inner.layer, layout.size())
                .map(|addr| addr.as_mut_ptr::<u8>())
                .inspect_err(|e| log::error!("kernel heap error: {}", e))
                .unwrap_or(ptr::null_mut()),
        }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
        if ptr.is_null() {
            return;
        }

        if let Some(inner) = &mut *self.inner.lock() {
            inner.heap.free(&mut inner.layer, VirtualAddress::from_ptr(ptr));
        }
    }
}
