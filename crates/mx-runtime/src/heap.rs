//! Heap allocation for runtime values
//!
//! Compiled programs never free what they allocate; blocks live until the
//! process exits. [`release`] exists for Rust embedders that run many
//! programs in one process.

use std::alloc::{self, Layout};
use std::fmt::Display;
use std::ptr::NonNull;

use tracing::{error, trace};

use crate::abi::ALLOC_ALIGN;

fn layout_for(size: usize) -> Option<Layout> {
    // Zero-sized requests still get a unique block.
    Layout::from_size_align(size.max(1), ALLOC_ALIGN).ok()
}

/// Allocate `size` uninitialized bytes. Aborts on failure.
pub fn allocate(size: usize) -> NonNull<u8> {
    crate::config::get();
    let Some(layout) = layout_for(size) else {
        fail(size)
    };
    let ptr = unsafe { alloc::alloc(layout) };
    trace!(size, "allocate");
    NonNull::new(ptr).unwrap_or_else(|| alloc::handle_alloc_error(layout))
}

/// Allocate `size` zeroed bytes. Aborts on failure.
pub fn allocate_zeroed(size: usize) -> NonNull<u8> {
    crate::config::get();
    let Some(layout) = layout_for(size) else {
        fail(size)
    };
    let ptr = unsafe { alloc::alloc_zeroed(layout) };
    trace!(size, "allocate zeroed");
    NonNull::new(ptr).unwrap_or_else(|| alloc::handle_alloc_error(layout))
}

/// Return a block to the allocator.
///
/// # Safety
///
/// `ptr` must come from [`allocate`] or [`allocate_zeroed`] with the same
/// `size`, and must not be used afterwards.
pub unsafe fn release(ptr: NonNull<u8>, size: usize) {
    let Some(layout) = layout_for(size) else {
        return;
    };
    trace!(size, "release");
    unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
}

/// Abort for a request no allocator can satisfy (negative or oversized).
#[cold]
pub(crate) fn fail(requested: impl Display) -> ! {
    error!(%requested, "allocation request cannot be satisfied");
    std::process::abort()
}
