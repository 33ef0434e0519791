//! Drives the runtime the way a compiled Mx* program would.
//!
//! Reads a count followed by that many words from standard input and prints
//! each word reversed, along with its length:
//!
//! ```text
//! $ printf '2\nhello mx\n' | cargo run --example reverse_words
//! olleh 5
//! xm 2
//! ```
//!
//! Set `MX_RT_LOG=debug` to see the runtime's own log lines on stderr.

use mx_runtime::*;

fn main() {
    let count = _get_i_();
    let words = _malloc_a_(size_of::<StringRef>() as i32, count.max(0));
    let slots = words.as_ptr().cast::<StringRef>();

    unsafe {
        for i in 0.._a_size_(words) as usize {
            slots.add(i).write(_get_s_());
        }

        let space = _s_literal_(b" ".as_ptr(), 1);
        for i in 0.._a_size_(words) as usize {
            let word = slots.add(i).read();
            let mut reversed = _s_literal_(std::ptr::null(), 0);
            for j in (0.._s_length_(word)).rev() {
                reversed = _s_concatenate_(reversed, _s_substring_(word, j, j + 1));
            }
            _print_s_(_s_concatenate_(reversed, space));
            _println_s_(_to_str_(_s_length_(reversed)));
        }
    }
}
