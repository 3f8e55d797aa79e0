//! Raw binding to the C trampoline.
//!
//! This is the primitive the rest of the crate is built on: a C function
//! that reserves `size` bytes of automatic storage in its own frame, calls
//! a callback with a pointer to that region plus an opaque context, and
//! releases the region on return. Nothing here touches the heap.
//!
//! Prefer the safe closure API in [`crate::bytes`] unless you are building
//! a binding of your own.

use std::ffi::c_void;

/// Callback type accepted by the trampoline: `(region, context)`.
///
/// The first argument points to the reserved region, the second is the
/// caller's context, forwarded unmodified.
pub type Callback = extern "C" fn(ptr: *mut c_void, data: *mut c_void);

extern "C" {
    fn stackpad_trampoline_(len: usize, cb: Option<Callback>, data: *mut c_void);
}

/// Reserve `size` bytes on the stack and call `cb` with the region.
///
/// # Safety
///
/// * `size` must be small enough not to overflow the remaining stack.
///   There is no check and no cap: an oversized request terminates the
///   process the same way unbounded recursion does. A `size` of 0 is
///   allowed; the callback still runs.
/// * `cb` must not unwind. It is an `extern "C"` function, and a panic
///   escaping it aborts the process.
/// * `data` may be null; it is passed to `cb` unmodified.
///
/// # Guarantees
///
/// * `cb` is called exactly once (unless the reservation itself overflows
///   the stack, which never returns).
/// * The region pointer given to `cb` is non-null, unaliased, and valid
///   for `size` bytes of reads and writes. Its alignment is 1; align it
///   yourself before storing anything wider than a byte. For `size == 0`
///   the pointer must not be dereferenced at all.
/// * The region is reclaimed when this function returns. Any copy of the
///   pointer that survives the call is dangling.
// The frame that owns the reserved region lives inside the C function.
// Never inline this wrapper: under cross-language LTO an inlined call
// could let the region's lifetime leak into the caller's frame.
#[inline(never)]
pub unsafe fn trampoline(size: usize, cb: Callback, data: *mut c_void) {
    stackpad_trampoline_(size, Some(cb), data);
}
