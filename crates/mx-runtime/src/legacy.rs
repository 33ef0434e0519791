//! Entry points of the first-generation code generator
//!
//! That generator passed strings as payload pointers, with the length stored
//! in the four bytes before the first character. A primary [`StringRef`]
//! block has exactly that shape behind its header, so a legacy string is
//! simply `payload_ptr()` of a primary one and both surfaces share values.
//!
//! Differences from the primary surface:
//! - string arguments come last (`__string__ord__(index, s)`)
//! - `__string__substring__(l, r, s)` includes `r`

use crate::abi::{self, legacy_symbols as symbols};
use crate::array::ArrayRef;
use crate::builtins::{self, print_bytes, print_int};
use crate::string::StringRef;

unsafe fn from_legacy(payload: *const u8) -> StringRef {
    unsafe { StringRef::from_payload_ptr(payload) }
}

#[unsafe(export_name = "__malloc__")]
pub extern "C" fn legacy_malloc(size: i32) -> *mut u8 {
    abi::enter(symbols::MALLOC);
    builtins::allocate_object(size)
}

#[unsafe(export_name = "__getInt__")]
pub extern "C" fn legacy_get_int() -> i32 {
    abi::enter(symbols::GET_INT);
    builtins::read_int(symbols::GET_INT)
}

#[unsafe(export_name = "__getString__")]
pub extern "C" fn legacy_get_string() -> *mut u8 {
    abi::enter(symbols::GET_STRING);
    builtins::read_string(symbols::GET_STRING).payload_ptr()
}

/// # Safety
///
/// `s` must be a legacy string handle.
#[unsafe(export_name = "__print__")]
pub unsafe extern "C" fn legacy_print(s: *const u8) {
    abi::enter(symbols::PRINT);
    print_bytes(symbols::PRINT, unsafe { from_legacy(s) }.as_bytes(), false);
}

/// # Safety
///
/// `s` must be a legacy string handle.
#[unsafe(export_name = "__println__")]
pub unsafe extern "C" fn legacy_println(s: *const u8) {
    abi::enter(symbols::PRINTLN);
    print_bytes(symbols::PRINTLN, unsafe { from_legacy(s) }.as_bytes(), true);
}

#[unsafe(export_name = "__printInt__")]
pub extern "C" fn legacy_print_int(value: i32) {
    abi::enter(symbols::PRINT_INT);
    print_int(symbols::PRINT_INT, value, false);
}

#[unsafe(export_name = "__printlnInt__")]
pub extern "C" fn legacy_println_int(value: i32) {
    abi::enter(symbols::PRINTLN_INT);
    print_int(symbols::PRINTLN_INT, value, true);
}

#[unsafe(export_name = "__toString__")]
pub extern "C" fn legacy_to_string(value: i32) -> *mut u8 {
    abi::enter(symbols::TO_STRING);
    StringRef::from_int(value).payload_ptr()
}

/// # Safety
///
/// `s` must be a legacy string handle.
#[unsafe(export_name = "__string__length__")]
pub unsafe extern "C" fn legacy_string_length(s: *const u8) -> i32 {
    abi::enter(symbols::STRING_LENGTH);
    unsafe { from_legacy(s) }.length()
}

/// # Safety
///
/// `s` must be a legacy string handle and `0 <= index < length(s)`.
#[unsafe(export_name = "__string__ord__")]
pub unsafe extern "C" fn legacy_string_ord(index: i32, s: *const u8) -> i32 {
    abi::enter(symbols::STRING_ORD);
    i32::from(unsafe { from_legacy(s).byte_at(index as usize) })
}

/// # Safety
///
/// `s` must be a legacy string handle.
#[unsafe(export_name = "__string__parseInt__")]
pub unsafe extern "C" fn legacy_string_parse_int(s: *const u8) -> i32 {
    abi::enter(symbols::STRING_PARSE_INT);
    unsafe { from_legacy(s) }.parse_int()
}

/// Bytes `[left, right]` of `s`, both ends included.
///
/// # Safety
///
/// `s` must be a legacy string handle and `0 <= left <= right + 1 <= length(s)`.
#[unsafe(export_name = "__string__substring__")]
pub unsafe extern "C" fn legacy_string_substring(left: i32, right: i32, s: *const u8) -> *mut u8 {
    abi::enter(symbols::STRING_SUBSTRING);
    let s = unsafe { from_legacy(s) };
    unsafe { s.substring(left as usize, right.wrapping_add(1) as usize) }.payload_ptr()
}

#[unsafe(export_name = "__array__size__")]
pub extern "C" fn legacy_array_size(array: ArrayRef) -> i32 {
    abi::enter(symbols::ARRAY_SIZE);
    array.size()
}

/// Default constructor for classes that declare none.
#[unsafe(export_name = "__empty__")]
pub extern "C" fn legacy_empty() {
    abi::enter(symbols::EMPTY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{self, Console};

    fn legacy(text: &str) -> *mut u8 {
        StringRef::from_bytes(text.as_bytes()).payload_ptr()
    }

    #[test]
    fn test_length_sits_before_payload() {
        let s = legacy("hello");
        let stored = unsafe { s.sub(4).cast::<i32>().read_unaligned() };
        assert_eq!(stored, 5);
        assert_eq!(unsafe { legacy_string_length(s) }, 5);
        // NUL-terminated for C consumers.
        assert_eq!(unsafe { s.add(5).read() }, 0);
    }

    #[test]
    fn test_substring_is_inclusive() {
        let s = legacy("abcde");
        let sub = unsafe { legacy_string_substring(1, 3, s) };
        assert_eq!(unsafe { legacy_string_length(sub) }, 3);
        assert_eq!(unsafe { from_legacy(sub) }.as_bytes(), b"bcd");

        let single = unsafe { legacy_string_substring(4, 4, s) };
        assert_eq!(unsafe { from_legacy(single) }.as_bytes(), b"e");

        let empty = unsafe { legacy_string_substring(2, 1, s) };
        assert_eq!(unsafe { legacy_string_length(empty) }, 0);
    }

    #[test]
    fn test_ord_takes_index_first() {
        let s = legacy("AZ");
        assert_eq!(unsafe { legacy_string_ord(1, s) }, 90);
    }

    #[test]
    fn test_to_string_and_parse() {
        let s = legacy_to_string(-1234);
        assert_eq!(unsafe { legacy_string_parse_int(s) }, -1234);
        assert_eq!(unsafe { legacy_string_length(s) }, 5);
    }

    #[test]
    fn test_shares_values_with_primary_surface() {
        let primary = builtins::_to_str_(77);
        let s = primary.payload_ptr();
        assert_eq!(builtins::_s_equal_(unsafe { from_legacy(s) }, primary), 1);

        let array = builtins::_malloc_a_(8, 3);
        assert_eq!(legacy_array_size(array), builtins::_a_size_(array));
    }

    #[test]
    fn test_console_round_trip() {
        let (console, transcript) = Console::with_buffers("word 9");
        console::redirect(console);
        let word = legacy_get_string();
        let n = legacy_get_int();
        unsafe { legacy_println(word) };
        legacy_print_int(n);
        legacy_println_int(n + 1);
        legacy_empty();
        assert_eq!(transcript.to_string_lossy(), "word\n910\n");
        console::reset();
    }

    #[test]
    fn test_malloc() {
        assert!(!legacy_malloc(12).is_null());
    }

    #[test]
    fn test_calls_record_only_legacy_symbols() {
        let (console, _) = Console::with_buffers("3 word");
        console::redirect(console);
        abi::take_entered();

        legacy_malloc(4);
        let n = legacy_get_int();
        let word = legacy_get_string();
        unsafe {
            legacy_print(word);
            legacy_string_ord(0, word);
            legacy_string_substring(0, 1, word);
        }
        legacy_println_int(n);
        legacy_to_string(n);
        console::reset();

        assert_eq!(
            abi::take_entered(),
            [
                symbols::MALLOC,
                symbols::GET_INT,
                symbols::GET_STRING,
                symbols::PRINT,
                symbols::STRING_ORD,
                symbols::STRING_SUBSTRING,
                symbols::PRINTLN_INT,
                symbols::TO_STRING,
            ]
        );
    }
}
