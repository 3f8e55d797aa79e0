//! Element-typed views over the byte primitive.
//!
//! The C region has alignment 1, so these helpers over-reserve by
//! `align_of::<T>() - 1` bytes and round the base pointer up before
//! casting. Initialising variants drop their elements when the closure
//! returns and when it unwinds.

use std::mem::{self, MaybeUninit};
use std::ptr;

use crate::bytes::with_bytes;

/// Byte budget for a `len`-element slice of `T`, including alignment slack.
///
/// Panics on `usize` overflow: such a request cannot fit in any address
/// space, and the panic fires before any stack reservation.
fn slice_bytes<T>(len: usize) -> usize {
    len.checked_mul(mem::size_of::<T>())
        .and_then(|bytes| bytes.checked_add(mem::align_of::<T>() - 1))
        .unwrap_or_else(|| panic!("slice of {len} elements overflows usize"))
}

/// Run `f` with `len` uninitialised `T` slots of stack storage.
///
/// The slots are uninitialised and never dropped; the caller decides what
/// (if anything) gets written. Same fatal-on-exhaustion policy as
/// [`with_bytes`].
///
/// # Example
///
/// ```
/// let max = stackpad::with_uninit_slice(8, |slots: &mut [std::mem::MaybeUninit<u32>]| {
///     for (i, slot) in slots.iter_mut().enumerate() {
///         slot.write(i as u32 * 3);
///     }
///     slots.iter().map(|s| unsafe { s.assume_init() }).max()
/// });
/// assert_eq!(max, Some(21));
/// ```
pub fn with_uninit_slice<T, R, F>(len: usize, f: F) -> R
where
    F: FnOnce(&mut [MaybeUninit<T>]) -> R,
{
    let align = mem::align_of::<T>();
    with_bytes(slice_bytes::<T>(len), move |region| {
        let base = region.as_mut_ptr().cast::<u8>();
        let offset = base.align_offset(align);
        // SAFETY: offset < align, so base + offset stays within the
        // over-reserved region and is aligned for T; the remaining bytes
        // cover len elements.
        let slots = unsafe {
            std::slice::from_raw_parts_mut(base.add(offset).cast::<MaybeUninit<T>>(), len)
        };
        f(slots)
    })
}

/// Run `f` with a stack slice of `len` elements built by `init(index)`.
///
/// Elements are dropped after `f` returns, and the already-initialised
/// prefix is dropped if `init` or `f` unwinds.
pub fn with_slice_with<T, R, I, F>(len: usize, mut init: I, f: F) -> R
where
    I: FnMut(usize) -> T,
    F: FnOnce(&mut [T]) -> R,
{
    with_uninit_slice(len, move |slots: &mut [MaybeUninit<T>]| {
        let mut guard = InitGuard {
            base: slots.as_mut_ptr().cast::<T>(),
            initialised: 0,
        };
        for i in 0..len {
            // SAFETY: i < len, so slot i is in bounds; it has not been
            // written yet.
            unsafe { guard.base.add(i).write(init(i)) };
            guard.initialised = i + 1;
        }
        // SAFETY: all len elements are initialised.
        let slice = unsafe { std::slice::from_raw_parts_mut(guard.base, len) };
        f(slice)
        // guard drops the elements here, or on unwind above.
    })
}

/// Run `f` with a stack slice holding `len` clones of `value`.
///
/// ```
/// let joined = stackpad::with_slice(3, String::from("ab"), |strs| strs.concat());
/// assert_eq!(joined, "ababab");
/// ```
pub fn with_slice<T, R, F>(len: usize, value: T, f: F) -> R
where
    T: Clone,
    F: FnOnce(&mut [T]) -> R,
{
    with_slice_with(len, move |_| value.clone(), f)
}

/// Drops the initialised prefix of a slice under construction.
struct InitGuard<T> {
    base: *mut T,
    initialised: usize,
}

impl<T> Drop for InitGuard<T> {
    fn drop(&mut self) {
        // SAFETY: exactly the first `initialised` elements are live, and
        // nothing else drops them.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.base, self.initialised));
        }
    }
}
