//! Entry points called by compiled Mx* programs
//!
//! Every function here is exported under the exact symbol the code generator
//! emits (see [`crate::abi::symbols`]). Integers are `i32`, booleans are one
//! byte holding 0 or 1, strings are [`StringRef`] header pointers and arrays
//! are [`ArrayRef`] element pointers.
//!
//! Nothing here reports errors to the caller. Malformed input yields an
//! unspecified number (0), out-of-range indices are undefined behavior
//! (asserted in debug builds), and impossible allocations abort.

use tracing::{debug, warn};

use crate::abi::{self, symbols};
use crate::array::ArrayRef;
use crate::console;
use crate::error::RuntimeError;
use crate::heap;
use crate::string::{Comparison, StringRef};

// =============================================================================
// Allocation
// =============================================================================

/// Allocate `size` uninitialized bytes (8-byte aligned).
///
/// Signature: `(i32) -> ptr`
#[unsafe(no_mangle)]
pub extern "C" fn _malloc_o_(size: i32) -> *mut u8 {
    abi::enter(symbols::MALLOC);
    allocate_object(size)
}

pub(crate) fn allocate_object(size: i32) -> *mut u8 {
    let Ok(size) = usize::try_from(size) else {
        heap::fail(size)
    };
    heap::allocate(size).as_ptr()
}

/// Allocate a zeroed array of `length` elements, `stride` bytes each.
///
/// Signature: `(i32, i32) -> ptr`
#[unsafe(no_mangle)]
pub extern "C" fn _malloc_a_(stride: i32, length: i32) -> ArrayRef {
    abi::enter(symbols::MALLOC_ARRAY);
    let (Ok(stride), Ok(length)) = (usize::try_from(stride), usize::try_from(length)) else {
        heap::fail(format_args!("{length} x {stride} bytes"))
    };
    ArrayRef::allocate(stride, length)
}

/// Element count of an array.
///
/// Signature: `(ptr) -> i32`
#[unsafe(no_mangle)]
pub extern "C" fn _a_size_(array: ArrayRef) -> i32 {
    abi::enter(symbols::ARRAY_SIZE);
    array.size()
}

// =============================================================================
// Input / output
// =============================================================================

fn log_io_failure(symbol: &'static str, err: RuntimeError) {
    if err.is_end_of_input() {
        debug!(symbol, "input exhausted");
    } else {
        warn!(symbol, %err, "console I/O failed");
    }
}

/// Read the next integer token from standard input.
///
/// Signature: `() -> i32`
#[unsafe(no_mangle)]
pub extern "C" fn _get_i_() -> i32 {
    abi::enter(symbols::GET_INT);
    read_int(symbols::GET_INT)
}

pub(crate) fn read_int(symbol: &'static str) -> i32 {
    console::with_console(|console| console.read_int()).unwrap_or_else(|err| {
        log_io_failure(symbol, err);
        0
    })
}

/// Read the next whitespace-delimited token from standard input.
///
/// Signature: `() -> str`
#[unsafe(no_mangle)]
pub extern "C" fn _get_s_() -> StringRef {
    abi::enter(symbols::GET_STRING);
    read_string(symbols::GET_STRING)
}

pub(crate) fn read_string(symbol: &'static str) -> StringRef {
    match console::with_console(|console| console.read_token()) {
        Ok(token) => StringRef::from_bytes(&token),
        Err(err) => {
            log_io_failure(symbol, err);
            StringRef::from_bytes(b"")
        }
    }
}

pub(crate) fn print_bytes(symbol: &'static str, bytes: &[u8], newline: bool) {
    if let Err(err) = console::with_console(|console| console.write(bytes, newline)) {
        log_io_failure(symbol, err);
    }
}

pub(crate) fn print_int(symbol: &'static str, value: i32, newline: bool) {
    if let Err(err) = console::with_console(|console| console.write_int(value, newline)) {
        log_io_failure(symbol, err);
    }
}

/// Signature: `(str) -> ()`
#[unsafe(no_mangle)]
pub extern "C" fn _print_s_(s: StringRef) {
    abi::enter(symbols::PRINT);
    print_bytes(symbols::PRINT, s.as_bytes(), false);
}

/// Signature: `(str) -> ()`
#[unsafe(no_mangle)]
pub extern "C" fn _println_s_(s: StringRef) {
    abi::enter(symbols::PRINTLN);
    print_bytes(symbols::PRINTLN, s.as_bytes(), true);
}

/// Signature: `(i32) -> ()`
#[unsafe(no_mangle)]
pub extern "C" fn _print_i_(value: i32) {
    abi::enter(symbols::PRINT_INT);
    print_int(symbols::PRINT_INT, value, false);
}

/// Signature: `(i32) -> ()`
#[unsafe(no_mangle)]
pub extern "C" fn _println_i_(value: i32) {
    abi::enter(symbols::PRINTLN_INT);
    print_int(symbols::PRINTLN_INT, value, true);
}

// =============================================================================
// Strings
// =============================================================================

/// Decimal rendering of an integer.
///
/// Signature: `(i32) -> str`
#[unsafe(no_mangle)]
pub extern "C" fn _to_str_(value: i32) -> StringRef {
    abi::enter(symbols::TO_STRING);
    StringRef::from_int(value)
}

/// Copy a literal emitted into the program image.
///
/// Signature: `(ptr, i32) -> str`
///
/// # Safety
///
/// `bytes` must be readable for `length` bytes (or `length` must be 0).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _s_literal_(bytes: *const u8, length: i32) -> StringRef {
    abi::enter(symbols::STRING_LITERAL);
    let length = usize::try_from(length).unwrap_or(0);
    if bytes.is_null() || length == 0 {
        return StringRef::from_bytes(b"");
    }
    StringRef::from_bytes(unsafe { std::slice::from_raw_parts(bytes, length) })
}

/// Signature: `(str) -> i32`
#[unsafe(no_mangle)]
pub extern "C" fn _s_length_(s: StringRef) -> i32 {
    abi::enter(symbols::STRING_LENGTH);
    s.length()
}

/// Signature: `(str) -> i32`
#[unsafe(no_mangle)]
pub extern "C" fn _s_parse_(s: StringRef) -> i32 {
    abi::enter(symbols::STRING_PARSE);
    s.parse_int()
}

/// Byte value (0-255) at `index`.
///
/// Signature: `(str, i32) -> i32`
///
/// # Safety
///
/// `0 <= index < length(s)`; nothing is checked in release builds.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _s_ord_(s: StringRef, index: i32) -> i32 {
    abi::enter(symbols::STRING_ORD);
    i32::from(unsafe { s.byte_at(index as usize) })
}

/// Bytes `[left, right)` of `s` as a new string.
///
/// Signature: `(str, i32, i32) -> str`
///
/// # Safety
///
/// `0 <= left <= right <= length(s)`; nothing is checked in release builds.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _s_substring_(s: StringRef, left: i32, right: i32) -> StringRef {
    abi::enter(symbols::STRING_SUBSTRING);
    unsafe { s.substring(left as usize, right as usize) }
}

/// Signature: `(str, str) -> str`
#[unsafe(no_mangle)]
pub extern "C" fn _s_concatenate_(s: StringRef, t: StringRef) -> StringRef {
    abi::enter(symbols::STRING_CONCATENATE);
    s.concat(t)
}

fn compare(s: StringRef, t: StringRef, op: Comparison) -> i8 {
    abi::enter(op.symbol());
    i8::from(s.compare(t, op))
}

/// Signature: `(str, str) -> i8`
#[unsafe(no_mangle)]
pub extern "C" fn _s_equal_(s: StringRef, t: StringRef) -> i8 {
    compare(s, t, Comparison::Equal)
}

/// Signature: `(str, str) -> i8`
#[unsafe(no_mangle)]
pub extern "C" fn _s_neq_(s: StringRef, t: StringRef) -> i8 {
    compare(s, t, Comparison::NotEqual)
}

/// Signature: `(str, str) -> i8`
#[unsafe(no_mangle)]
pub extern "C" fn _s_less_(s: StringRef, t: StringRef) -> i8 {
    compare(s, t, Comparison::Less)
}

/// Signature: `(str, str) -> i8`
#[unsafe(no_mangle)]
pub extern "C" fn _s_leq_(s: StringRef, t: StringRef) -> i8 {
    compare(s, t, Comparison::LessOrEqual)
}

/// Signature: `(str, str) -> i8`
#[unsafe(no_mangle)]
pub extern "C" fn _s_greater_(s: StringRef, t: StringRef) -> i8 {
    compare(s, t, Comparison::Greater)
}

/// Signature: `(str, str) -> i8`
#[unsafe(no_mangle)]
pub extern "C" fn _s_geq_(s: StringRef, t: StringRef) -> i8 {
    compare(s, t, Comparison::GreaterOrEqual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Console;

    fn lit(text: &str) -> StringRef {
        unsafe { _s_literal_(text.as_ptr(), text.len() as i32) }
    }

    #[test]
    fn test_malloc_raw() {
        let block = _malloc_o_(16);
        assert!(!block.is_null());
        assert_eq!(block as usize % abi::ALLOC_ALIGN, 0);
    }

    #[test]
    fn test_literal_null_or_empty() {
        let s = unsafe { _s_literal_(std::ptr::null(), 4) };
        assert_eq!(_s_length_(s), 0);
        let s = unsafe { _s_literal_(b"abc".as_ptr(), 0) };
        assert_eq!(_s_length_(s), 0);
    }

    #[test]
    fn test_ord_returns_unsigned_byte() {
        let s = unsafe { _s_literal_([b'a', 0xE9].as_ptr(), 2) };
        assert_eq!(unsafe { _s_ord_(s, 0) }, 97);
        assert_eq!(unsafe { _s_ord_(s, 1) }, 0xE9);
    }

    #[test]
    fn test_comparisons_return_single_byte_booleans() {
        let (abc, abd) = (lit("abc"), lit("abd"));
        assert_eq!(_s_equal_(abc, abd), 0);
        assert_eq!(_s_neq_(abc, abd), 1);
        assert_eq!(_s_less_(abc, abd), 1);
        assert_eq!(_s_leq_(abc, abd), 1);
        assert_eq!(_s_greater_(abc, abd), 0);
        assert_eq!(_s_geq_(abc, abd), 0);
        assert_eq!(_s_equal_(abc, lit("abc")), 1);
    }

    #[test]
    fn test_get_string_at_end_of_input_is_empty() {
        let (console, _) = Console::with_buffers("");
        console::redirect(console);
        assert_eq!(_s_length_(_get_s_()), 0);
        assert_eq!(_get_i_(), 0);
        console::reset();
    }

    #[test]
    fn test_print_entry_points() {
        let (console, transcript) = Console::with_buffers("");
        console::redirect(console);
        _print_s_(lit("x="));
        _print_i_(-3);
        _println_s_(lit(""));
        _println_i_(0);
        assert_eq!(transcript.to_string_lossy(), "x=-3\n0\n");
        console::reset();
    }
}
