//! Mx* runtime library.
//!
//! Provides the native functions compiled Mx* programs link against:
//! - Heap allocation (`_malloc_o_`, `_malloc_a_`) and array size (`_a_size_`)
//! - Length-prefixed immutable strings (`_s_*`, `_to_str_`)
//! - Token input and printing on standard I/O (`_get_*`, `_print*`)
//! - The first-generation symbol set (`__getInt__`, `__string__*__`, ...)
//!
//! The runtime trusts its caller: indices and bounds are checked only in
//! debug builds, malformed numbers scan to an unspecified value, and an
//! allocation that cannot be satisfied aborts the process. Nothing is ever
//! freed on behalf of compiled code.

pub mod abi;
pub mod array;
pub mod builtins;
pub mod config;
pub mod console;
pub mod error;
pub mod heap;
pub mod legacy;
pub mod number;
pub mod string;


pub use array::{ArrayHeader, ArrayRef};
pub use builtins::*;
pub use config::RuntimeConfig;
pub use console::{Console, Transcript};
pub use error::{RuntimeError, RuntimeResult};
pub use string::{Comparison, StringHeader, StringRef};
