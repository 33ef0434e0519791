//! ABI definitions shared between the code generator and the runtime.
//!
//! Symbol names must match the `extern "C"` exports in [`crate::builtins`]
//! and [`crate::legacy`]; layout constants must match [`crate::string`] and
//! [`crate::array`].

/// Alignment of every block the runtime allocates.
pub const ALLOC_ALIGN: usize = 8;

/// Bytes before a string's payload: the `i32` length.
pub const STRING_HEADER_SIZE: usize = 4;

/// NUL byte stored after every string payload.
pub const STRING_TERMINATOR_SIZE: usize = 1;

/// Bytes before an array's first element.
pub const ARRAY_HEADER_SIZE: usize = 8;

/// Distance from an array handle back to its `i32` length.
pub const ARRAY_LENGTH_OFFSET: usize = 4;

/// Primary entry points.
pub mod symbols {
    pub const MALLOC: &str = "_malloc_o_";
    pub const MALLOC_ARRAY: &str = "_malloc_a_";
    pub const GET_INT: &str = "_get_i_";
    pub const GET_STRING: &str = "_get_s_";
    pub const PRINT: &str = "_print_s_";
    pub const PRINTLN: &str = "_println_s_";
    pub const PRINT_INT: &str = "_print_i_";
    pub const PRINTLN_INT: &str = "_println_i_";
    pub const TO_STRING: &str = "_to_str_";
    pub const STRING_LITERAL: &str = "_s_literal_";
    pub const STRING_LENGTH: &str = "_s_length_";
    pub const STRING_PARSE: &str = "_s_parse_";
    pub const STRING_ORD: &str = "_s_ord_";
    pub const STRING_SUBSTRING: &str = "_s_substring_";
    pub const STRING_CONCATENATE: &str = "_s_concatenate_";
    pub const STRING_EQUAL: &str = "_s_equal_";
    pub const STRING_NEQ: &str = "_s_neq_";
    pub const STRING_LESS: &str = "_s_less_";
    pub const STRING_LEQ: &str = "_s_leq_";
    pub const STRING_GREATER: &str = "_s_greater_";
    pub const STRING_GEQ: &str = "_s_geq_";
    pub const ARRAY_SIZE: &str = "_a_size_";

    pub const ALL: &[&str] = &[
        MALLOC,
        MALLOC_ARRAY,
        GET_INT,
        GET_STRING,
        PRINT,
        PRINTLN,
        PRINT_INT,
        PRINTLN_INT,
        TO_STRING,
        STRING_LITERAL,
        STRING_LENGTH,
        STRING_PARSE,
        STRING_ORD,
        STRING_SUBSTRING,
        STRING_CONCATENATE,
        STRING_EQUAL,
        STRING_NEQ,
        STRING_LESS,
        STRING_LEQ,
        STRING_GREATER,
        STRING_GEQ,
        ARRAY_SIZE,
    ];
}

/// Entry points of the first-generation code generator.
///
/// Strings on this surface are passed as payload pointers and substring
/// takes an inclusive right bound.
pub mod legacy_symbols {
    pub const MALLOC: &str = "__malloc__";
    pub const GET_INT: &str = "__getInt__";
    pub const GET_STRING: &str = "__getString__";
    pub const PRINT: &str = "__print__";
    pub const PRINTLN: &str = "__println__";
    pub const PRINT_INT: &str = "__printInt__";
    pub const PRINTLN_INT: &str = "__printlnInt__";
    pub const TO_STRING: &str = "__toString__";
    pub const STRING_LENGTH: &str = "__string__length__";
    pub const STRING_ORD: &str = "__string__ord__";
    pub const STRING_PARSE_INT: &str = "__string__parseInt__";
    pub const STRING_SUBSTRING: &str = "__string__substring__";
    pub const ARRAY_SIZE: &str = "__array__size__";
    pub const EMPTY: &str = "__empty__";

    pub const ALL: &[&str] = &[
        MALLOC,
        GET_INT,
        GET_STRING,
        PRINT,
        PRINTLN,
        PRINT_INT,
        PRINTLN_INT,
        TO_STRING,
        STRING_LENGTH,
        STRING_ORD,
        STRING_PARSE_INT,
        STRING_SUBSTRING,
        ARRAY_SIZE,
        EMPTY,
    ];
}

/// Record an entry-point call when built with `debug_runtime`.
#[inline(always)]
pub(crate) fn enter(symbol: &'static str) {
    #[cfg(feature = "debug_runtime")]
    tracing::trace!(symbol, "enter");
    #[cfg(test)]
    ENTERED.with(|entered| entered.borrow_mut().push(symbol));
    #[cfg(not(any(test, feature = "debug_runtime")))]
    let _ = symbol;
}

#[cfg(test)]
thread_local! {
    static ENTERED: std::cell::RefCell<Vec<&'static str>> =
        const { std::cell::RefCell::new(Vec::new()) };
}

/// Symbols entered on this thread since the last call.
#[cfg(test)]
pub(crate) fn take_entered() -> Vec<&'static str> {
    ENTERED.with(|entered| entered.take())
}
