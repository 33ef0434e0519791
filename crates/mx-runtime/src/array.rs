//! Length-prefixed arrays
//!
//! An array is one heap block: an 8-byte header followed by the elements.
//! Compiled code receives a pointer to the first element and indexes it
//! inline with the stride it already knows; the runtime only ever reads the
//! length back, from the `i32` stored directly in front of the elements.
//!
//! ```text
//! [reserved: i32][length: i32][elements: stride * length bytes]
//!                             ^ ArrayRef
//! ```

use std::mem::offset_of;
use std::ptr::{self, NonNull};

use crate::abi::{ARRAY_HEADER_SIZE, ARRAY_LENGTH_OFFSET};
use crate::heap;

#[repr(C, align(8))]
pub struct ArrayHeader {
    reserved: i32,
    length: i32,
}

const _: () = assert!(size_of::<ArrayHeader>() == ARRAY_HEADER_SIZE);
const _: () = assert!(offset_of!(ArrayHeader, length) == ARRAY_HEADER_SIZE - ARRAY_LENGTH_OFFSET);

/// Handle to a runtime array: a pointer to its first element.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayRef(NonNull<u8>);

impl ArrayRef {
    fn block_size(stride: usize, length: usize) -> Option<usize> {
        stride.checked_mul(length)?.checked_add(ARRAY_HEADER_SIZE)
    }

    /// Allocate `length` zeroed elements of `stride` bytes each.
    pub fn allocate(stride: usize, length: usize) -> Self {
        let Ok(stored) = i32::try_from(length) else {
            heap::fail(length)
        };
        let Some(size) = Self::block_size(stride, length) else {
            heap::fail(format_args!("{length} x {stride} bytes"))
        };

        let header = heap::allocate_zeroed(size).cast::<ArrayHeader>();
        unsafe {
            ptr::addr_of_mut!((*header.as_ptr()).length).write(stored);
            ArrayRef(header.cast::<u8>().add(ARRAY_HEADER_SIZE))
        }
    }

    /// Wrap an element pointer received from compiled code.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or an element pointer returned by
    /// [`allocate`](Self::allocate) that has not been released.
    pub unsafe fn from_raw(ptr: *mut u8) -> Option<Self> {
        NonNull::new(ptr).map(ArrayRef)
    }

    pub fn as_ptr(self) -> *mut u8 {
        self.0.as_ptr()
    }

    fn header(self) -> NonNull<ArrayHeader> {
        // The header is part of the same block, directly in front.
        unsafe { self.0.sub(ARRAY_HEADER_SIZE).cast() }
    }

    /// The stored element count.
    pub fn size(self) -> i32 {
        unsafe { ptr::addr_of!((*self.header().as_ptr()).length).read() }
    }

    pub fn len(self) -> usize {
        self.size() as usize
    }

    pub fn is_empty(self) -> bool {
        self.size() == 0
    }

    /// Free the block.
    ///
    /// # Safety
    ///
    /// `stride` must be the stride the array was allocated with, and no copy
    /// of this handle may be used afterwards.
    pub unsafe fn release(self, stride: usize) {
        let size = Self::block_size(stride, self.len()).unwrap_or(ARRAY_HEADER_SIZE);
        unsafe { heap::release(self.header().cast(), size) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_regardless_of_stride() {
        for stride in [1, 4, 8, 24] {
            let array = ArrayRef::allocate(stride, 5);
            assert_eq!(array.size(), 5);
            unsafe { array.release(stride) };
        }
    }

    #[test]
    fn test_length_sits_before_elements() {
        let array = ArrayRef::allocate(4, 3);
        let length = unsafe {
            array
                .as_ptr()
                .sub(ARRAY_LENGTH_OFFSET)
                .cast::<i32>()
                .read()
        };
        assert_eq!(length, 3);
        unsafe { array.release(4) };
    }

    #[test]
    fn test_elements_are_zeroed_and_writable() {
        let array = ArrayRef::allocate(8, 4);
        assert_eq!(array.as_ptr() as usize % 8, 0);
        unsafe {
            let elements = array.as_ptr().cast::<u64>();
            for i in 0..4 {
                assert_eq!(elements.add(i).read(), 0);
                elements.add(i).write(i as u64 * 10);
            }
            assert_eq!(elements.add(3).read(), 30);
        }
        // Writing elements leaves the length alone.
        assert_eq!(array.size(), 4);
        unsafe { array.release(8) };
    }

    #[test]
    fn test_empty_array() {
        let array = ArrayRef::allocate(4, 0);
        assert!(array.is_empty());
        unsafe { array.release(4) };
    }

    #[test]
    fn test_from_raw_round_trip() {
        let array = ArrayRef::allocate(2, 7);
        let back = unsafe { ArrayRef::from_raw(array.as_ptr()) }.unwrap();
        assert_eq!(back, array);
        assert_eq!(back.size(), 7);
        assert!(unsafe { ArrayRef::from_raw(ptr::null_mut()) }.is_none());
    }

    #[test]
    fn test_block_size_overflow() {
        assert_eq!(ArrayRef::block_size(usize::MAX, 2), None);
        assert_eq!(ArrayRef::block_size(4, 5), Some(28));
    }
}
