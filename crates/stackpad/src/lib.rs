//! Runtime-sized stack allocation through a C trampoline.
//!
//! `stackpad` reserves a caller-chosen number of bytes of automatic
//! storage — real stack memory, not heap — and lends it to a closure for
//! exactly one call. The storage lives in the frame of a small C function
//! (a variable-length array) and is reclaimed by ordinary frame teardown
//! the moment the closure returns. Nothing in the path touches the heap.
//!
//! # Layers
//!
//! ```text
//! with_slice / with_slice_with        (initialised, dropped for you)
//! └── with_uninit_slice               (typed, aligned)
//!     └── with_bytes / with_bytes_zeroed   (safe closure over raw bytes)
//!         └── ffi::trampoline          (unsafe fn-pointer + opaque context)
//!             └── stackpad_trampoline_ (C99 VLA, compiled by build.rs)
//! ```
//!
//! [`SpillVec`] rounds the crate out: a vector over any borrowed buffer
//! (typically trampoline storage) that touches the heap only if the
//! buffer overflows.
//!
//! # The deal
//!
//! - The closure runs exactly once, synchronously, on the calling thread.
//! - The region's address is stable for the duration of the closure and
//!   dead afterwards; the scoped borrow makes retaining it a compile
//!   error.
//! - Calls nest: each invocation gets its own disjoint region further
//!   down the stack. Threads are fully independent.
//! - There is **no size check**. A request exceeding the remaining stack
//!   kills the process the same way unbounded recursion does; sizing the
//!   stack is the embedding application's job (e.g.
//!   `std::thread::Builder::stack_size`). This is deliberate — remaining
//!   stack is not portably observable, and a probe would change the
//!   contract.
//!
//! # Example
//!
//! ```
//! // A scratch buffer whose size is only known at run time.
//! fn checksum(input: &[u8]) -> u32 {
//!     stackpad::with_bytes_zeroed(input.len(), |scratch| {
//!         scratch.copy_from_slice(input);
//!         scratch.iter().map(|&b| b as u32).sum()
//!     })
//! }
//! assert_eq!(checksum(&[1, 2, 3]), 6);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod bytes;
pub mod ffi;
pub mod spill;
pub mod typed;

// Public re-exports for the primary API surface.
pub use bytes::{with_bytes, with_bytes_zeroed};
pub use spill::SpillVec;
pub use typed::{with_slice, with_slice_with, with_uninit_slice};
