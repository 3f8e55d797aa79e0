//! Safe closure API over the raw trampoline.
//!
//! [`with_bytes`] and [`with_bytes_zeroed`] hand a closure a mutable byte
//! slice backed by stack storage in the trampoline's frame. The borrow is
//! scoped to the closure, so the region cannot be retained past the call;
//! it is released before `with_bytes` returns.

use std::ffi::c_void;
use std::mem::MaybeUninit;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crate::ffi;

/// Context threaded through the trampoline's opaque pointer: the closure
/// on the way in, its outcome on the way out.
struct Shim<F, R> {
    len: usize,
    f: Option<F>,
    outcome: Option<thread::Result<R>>,
}

/// `extern "C"` entry invoked by the trampoline with the reserved region.
///
/// Monomorphised per closure type; recovers the [`Shim`] from the opaque
/// context pointer.
extern "C" fn enter<F, R>(ptr: *mut c_void, data: *mut c_void)
where
    F: FnOnce(&mut [MaybeUninit<u8>]) -> R,
{
    // SAFETY: data is the Shim constructed in with_bytes, alive for the
    // whole trampoline call, and never aliased while we hold it.
    let shim = unsafe { &mut *(data as *mut Shim<F, R>) };
    let Some(f) = shim.f.take() else {
        // Exactly-once contract: the trampoline never calls us twice.
        return;
    };

    // SAFETY: ptr is non-null and valid for shim.len writable bytes per
    // the trampoline contract (for len 0 it points at one reserved byte
    // that the empty slice never touches).
    let region =
        unsafe { std::slice::from_raw_parts_mut(ptr.cast::<MaybeUninit<u8>>(), shim.len) };

    // catch_unwind prevents panic from unwinding across the extern "C"
    // boundary (UB); the payload is resumed after the frame is torn down.
    shim.outcome = Some(panic::catch_unwind(AssertUnwindSafe(move || f(region))));
}

/// Run `f` with `len` bytes of uninitialised stack storage.
///
/// The slice is uninitialised; read nothing you have not written. The
/// storage lives in a dedicated stack frame and is reclaimed before this
/// function returns. A panic inside `f` propagates to the caller after
/// the region is released.
///
/// There is no size check and no cap: a `len` exceeding the remaining
/// stack terminates the process, exactly like runaway recursion. `len`
/// of 0 is fine and still runs `f` (with an empty slice).
///
/// # Example
///
/// ```
/// let sum = stackpad::with_bytes(64, |buf| {
///     for (i, slot) in buf.iter_mut().enumerate() {
///         slot.write(i as u8);
///     }
///     (0u32..64).sum::<u32>()
/// });
/// assert_eq!(sum, 2016);
/// ```
pub fn with_bytes<R, F>(len: usize, f: F) -> R
where
    F: FnOnce(&mut [MaybeUninit<u8>]) -> R,
{
    let mut shim = Shim {
        len,
        f: Some(f),
        outcome: None,
    };

    // SAFETY: enter::<F, R> catches unwinds before they reach the C frame,
    // and shim outlives the call. Stack exhaustion is the caller's
    // documented fatal risk, not a safety obligation we can discharge.
    unsafe {
        ffi::trampoline(
            len,
            enter::<F, R>,
            &mut shim as *mut Shim<F, R> as *mut c_void,
        );
    }

    match shim.outcome {
        Some(Ok(value)) => value,
        Some(Err(payload)) => panic::resume_unwind(payload),
        // The trampoline calls `enter` exactly once before returning.
        None => unreachable!("trampoline returned without running the callback"),
    }
}

/// Run `f` with `len` zero-initialised bytes of stack storage.
///
/// Identical to [`with_bytes`] except the region is zero-filled before `f`
/// runs, so the closure receives an ordinary `&mut [u8]`.
pub fn with_bytes_zeroed<R, F>(len: usize, f: F) -> R
where
    F: FnOnce(&mut [u8]) -> R,
{
    with_bytes(len, move |region| {
        let ptr = region.as_mut_ptr().cast::<u8>();
        // SAFETY: region is len writable bytes; after the zero-fill every
        // byte is initialised.
        let bytes = unsafe {
            std::ptr::write_bytes(ptr, 0, len);
            std::slice::from_raw_parts_mut(ptr, len)
        };
        f(bytes)
    })
}

#[cfg(test)]
mod tests {
    use std::mem::MaybeUninit;

    use super::{with_bytes, with_bytes_zeroed};

    #[test]
    fn closure_sees_exactly_len_bytes_and_returns_value() {
        const SIZE: usize = 128;
        let sum = with_bytes(SIZE, |buf| {
            assert_eq!(buf.len(), SIZE);
            for (i, slot) in (1..).zip(buf.iter_mut()) {
                slot.write(i as u8);
            }
            buf.iter()
                // SAFETY: every slot was written just above.
                .map(|slot| unsafe { slot.assume_init() } as u64)
                .sum::<u64>()
        });
        assert_eq!(sum, (1..=SIZE as u64).sum::<u64>());
    }

    #[test]
    fn zeroed_variant_hands_over_initialised_zeroes() {
        with_bytes_zeroed(256, |buf| {
            assert_eq!(buf.len(), 256);
            assert!(buf.iter().all(|&b| b == 0));
            buf[255] = 7;
            assert_eq!(buf[255], 7);
        });
    }

    #[test]
    fn zero_len_still_runs_closure() {
        let mut ran = false;
        with_bytes(0, |buf: &mut [MaybeUninit<u8>]| {
            assert!(buf.is_empty());
            ran = true;
        });
        assert!(ran);
    }

    #[test]
    #[should_panic(expected = "escapes the frame")]
    fn panic_in_closure_propagates_after_teardown() {
        with_bytes(120, |_buf| panic!("escapes the frame"));
    }

    #[test]
    fn nested_invocations_get_independent_regions() {
        with_bytes_zeroed(32, |outer| {
            outer.fill(0xAA);
            let outer_ptr = outer.as_ptr();
            with_bytes_zeroed(32, |inner| {
                assert!(inner.iter().all(|&b| b == 0));
                inner.fill(0xBB);
                assert_ne!(outer_ptr, inner.as_ptr());
            });
            assert!(outer.iter().all(|&b| b == 0xAA));
        });
    }

    #[test]
    fn closure_capturing_state_replaces_opaque_context() {
        let mut echo = [0u8; 16];
        with_bytes(16, |buf| {
            for (i, slot) in buf.iter_mut().enumerate() {
                slot.write(i as u8);
            }
            for (dst, src) in echo.iter_mut().zip(buf.iter()) {
                // SAFETY: every slot was written just above.
                *dst = unsafe { src.assume_init() };
            }
        });
        let expected: Vec<u8> = (0..16).collect();
        assert_eq!(&echo[..], &expected[..]);
    }
}
