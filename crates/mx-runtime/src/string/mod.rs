//! Immutable, length-prefixed strings
//!
//! A string is one heap block laid out as
//!
//! ```text
//! [length: i32][payload: length bytes][NUL]
//! ```
//!
//! Compiled code holds a pointer to the header ([`StringRef`]). The payload
//! is never written after construction; every operation builds a new block.
//! The trailing NUL is not part of the content; it keeps the payload usable
//! as a C string.

mod compare;

pub use compare::Comparison;

use std::fmt;
use std::mem::offset_of;
use std::ptr::{self, NonNull};
use std::slice;

use crate::abi::{STRING_HEADER_SIZE, STRING_TERMINATOR_SIZE};
use crate::heap;
use crate::number::{self, Digits};

#[repr(C)]
pub struct StringHeader {
    length: i32,
    bytes: [u8; 0],
}

const PAYLOAD_OFFSET: usize = offset_of!(StringHeader, bytes);

const _: () = assert!(PAYLOAD_OFFSET == STRING_HEADER_SIZE);
const _: () = assert!(size_of::<StringHeader>() == STRING_HEADER_SIZE);

/// Handle to a runtime string, as passed to and from compiled code.
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct StringRef(NonNull<StringHeader>);

impl StringRef {
    fn block_size(length: usize) -> usize {
        STRING_HEADER_SIZE + length + STRING_TERMINATOR_SIZE
    }

    /// Allocate a string of `length` bytes and let `fill` write its payload.
    ///
    /// The payload starts zeroed, so the terminator is already in place.
    pub fn build(length: usize, fill: impl FnOnce(&mut [u8])) -> Self {
        let Ok(stored) = i32::try_from(length) else {
            heap::fail(length)
        };
        let header = heap::allocate_zeroed(Self::block_size(length)).cast::<StringHeader>();
        unsafe {
            ptr::addr_of_mut!((*header.as_ptr()).length).write(stored);
            let payload = header.as_ptr().cast::<u8>().add(PAYLOAD_OFFSET);
            fill(slice::from_raw_parts_mut(payload, length));
        }
        StringRef(header)
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::build(bytes.len(), |payload| payload.copy_from_slice(bytes))
    }

    /// Decimal rendering of `value`.
    pub fn from_int(value: i32) -> Self {
        let digits = Digits::new(value);
        Self::build(digits.rendered_len(), |payload| digits.write_to(payload))
    }

    /// Wrap a header pointer received from compiled code.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point at a string built by this runtime that has
    /// not been released.
    pub unsafe fn from_raw(ptr: *mut StringHeader) -> Option<Self> {
        NonNull::new(ptr).map(StringRef)
    }

    /// Recover the handle from a payload pointer (the legacy convention).
    ///
    /// # Safety
    ///
    /// `payload` must be the [`payload_ptr`](Self::payload_ptr) of a live
    /// runtime string.
    pub unsafe fn from_payload_ptr(payload: *const u8) -> Self {
        let header = unsafe { payload.sub(PAYLOAD_OFFSET) } as *mut StringHeader;
        StringRef(unsafe { NonNull::new_unchecked(header) })
    }

    pub fn as_ptr(self) -> *mut StringHeader {
        self.0.as_ptr()
    }

    /// Pointer to the first payload byte (NUL-terminated).
    pub fn payload_ptr(self) -> *mut u8 {
        unsafe { self.0.as_ptr().cast::<u8>().add(PAYLOAD_OFFSET) }
    }

    /// The stored length field.
    pub fn length(self) -> i32 {
        unsafe { ptr::addr_of!((*self.0.as_ptr()).length).read() }
    }

    pub fn len(self) -> usize {
        self.length() as usize
    }

    pub fn is_empty(self) -> bool {
        self.length() == 0
    }

    pub fn as_bytes<'a>(self) -> &'a [u8] {
        unsafe { slice::from_raw_parts(self.payload_ptr(), self.len()) }
    }

    /// Byte value at `index`, unchecked.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Self::len).
    pub unsafe fn byte_at(self, index: usize) -> u8 {
        debug_assert!(
            index < self.len(),
            "string index {index} out of range for length {}",
            self.len()
        );
        unsafe { *self.as_bytes().get_unchecked(index) }
    }

    /// The bytes in `[left, right)` as a new string, unchecked.
    ///
    /// # Safety
    ///
    /// Requires `left <= right <= len`.
    pub unsafe fn substring(self, left: usize, right: usize) -> Self {
        debug_assert!(
            left <= right && right <= self.len(),
            "substring [{left}, {right}) out of range for length {}",
            self.len()
        );
        let bytes = unsafe { self.as_bytes().get_unchecked(left..right) };
        Self::from_bytes(bytes)
    }

    pub fn concat(self, other: StringRef) -> Self {
        let (head, tail) = (self.as_bytes(), other.as_bytes());
        Self::build(head.len() + tail.len(), |payload| {
            let (first, second) = payload.split_at_mut(head.len());
            first.copy_from_slice(head);
            second.copy_from_slice(tail);
        })
    }

    /// Scan the content as a decimal integer; non-numeric content gives 0.
    pub fn parse_int(self) -> i32 {
        number::scan_decimal(self.as_bytes())
    }

    pub fn compare(self, other: StringRef, op: Comparison) -> bool {
        op.evaluate(self.as_bytes(), other.as_bytes())
    }

    /// Free the block.
    ///
    /// # Safety
    ///
    /// No copy of this handle may be used afterwards.
    pub unsafe fn release(self) {
        let size = Self::block_size(self.len());
        unsafe { heap::release(self.0.cast(), size) };
    }
}

impl fmt::Debug for StringRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StringRef")
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}
