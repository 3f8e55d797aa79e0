//! A vector over a borrowed buffer that spills to the heap when full.
//!
//! [`SpillVec`] is the documented exception to this crate's no-heap rule:
//! it stays inside the caller-provided buffer (typically stack storage
//! from [`crate::with_uninit_slice`]) and touches the allocator only once
//! the buffer is exhausted. Steady-state use within the buffer is
//! allocation-free.

use std::mem::MaybeUninit;
use std::ops::{Deref, DerefMut};
use std::ptr;
use std::slice;

/// Growable vector backed by a borrowed slot buffer, moving to a heap
/// `Vec<T>` only when the buffer runs out.
///
/// # Example
///
/// ```
/// stackpad::with_uninit_slice(8, |slots| {
///     let mut v = stackpad::SpillVec::new(slots);
///     for i in 0..4u32 {
///         v.push(i);
///     }
///     assert!(!v.spilled());
///     assert_eq!(v.as_slice(), &[0, 1, 2, 3]);
/// });
/// ```
pub struct SpillVec<'a, T> {
    storage: Storage<'a, T>,
}

enum Storage<'a, T> {
    /// Still inside the borrowed buffer; the first `len` slots are live.
    Stack {
        buf: &'a mut [MaybeUninit<T>],
        len: usize,
    },
    /// The buffer overflowed and every element moved to the heap.
    Heap(Vec<T>),
}

impl<'a, T> SpillVec<'a, T> {
    /// Create an empty vector over `buf`. A zero-length buffer is allowed;
    /// the first push then spills immediately.
    pub fn new(buf: &'a mut [MaybeUninit<T>]) -> Self {
        Self {
            storage: Storage::Stack { buf, len: 0 },
        }
    }

    /// Number of elements pushed so far.
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Stack { len, .. } => *len,
            Storage::Heap(v) => v.len(),
        }
    }

    /// True if nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once the elements have moved to the heap.
    pub fn spilled(&self) -> bool {
        matches!(self.storage, Storage::Heap(_))
    }

    /// Append an element, spilling to the heap if the buffer is full.
    pub fn push(&mut self, item: T) {
        match &mut self.storage {
            Storage::Heap(v) => v.push(item),
            Storage::Stack { buf, len } => {
                if *len < buf.len() {
                    buf[*len].write(item);
                    *len += 1;
                    return;
                }
                // Reserve before moving anything so an allocation panic
                // leaves the stack elements owned and droppable. The
                // in-capacity pushes below cannot reallocate.
                let count = *len;
                let mut v: Vec<T> =
                    Vec::with_capacity(count.saturating_add(count).saturating_add(1));
                *len = 0;
                for slot in buf.iter_mut().take(count) {
                    // SAFETY: the first `count` slots were initialised and
                    // `len` is already 0, so nothing else will read or
                    // drop them.
                    v.push(unsafe { slot.as_ptr().read() });
                }
                v.push(item);
                self.storage = Storage::Heap(v);
            }
        }
    }

    /// The pushed elements, in insertion order.
    pub fn as_slice(&self) -> &[T] {
        match &self.storage {
            Storage::Heap(v) => v.as_slice(),
            Storage::Stack { buf, len } => {
                // SAFETY: the first `len` slots are initialised.
                unsafe { slice::from_raw_parts(buf.as_ptr().cast::<T>(), *len) }
            }
        }
    }

    /// Mutable view of the pushed elements.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.storage {
            Storage::Heap(v) => v.as_mut_slice(),
            Storage::Stack { buf, len } => {
                // SAFETY: the first `len` slots are initialised.
                unsafe { slice::from_raw_parts_mut(buf.as_mut_ptr().cast::<T>(), *len) }
            }
        }
    }
}

impl<T> Drop for SpillVec<'_, T> {
    fn drop(&mut self) {
        if let Storage::Stack { buf, len } = &mut self.storage {
            // SAFETY: the first `len` slots are initialised and dropped
            // exactly here; the Heap variant owns its Vec and needs no
            // help.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                    buf.as_mut_ptr().cast::<T>(),
                    *len,
                ));
            }
        }
    }
}

impl<T> Deref for SpillVec<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for SpillVec<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SpillVec<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice().iter()).finish()
    }
}
