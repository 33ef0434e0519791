//! End-to-end runs of small programs written against the C entry points,
//! the way generated code calls them.

use insta::assert_snapshot;
use mx_runtime::console::{self, Console};
use mx_runtime::*;

/// Run `program` with `input` on standard input and return what it printed.
fn run(input: &str, program: impl FnOnce()) -> String {
    let (console, transcript) = Console::with_buffers(input);
    console::redirect(console);
    program();
    console::reset();
    transcript.to_string_lossy()
}

fn lit(text: &str) -> StringRef {
    unsafe { _s_literal_(text.as_ptr(), text.len() as i32) }
}

#[test]
fn test_echo_string_then_int() {
    let output = run("hello world\n42", || {
        let s = _get_s_();
        let n = _get_i_();
        _println_s_(s);
        _println_i_(n);
    });
    assert_snapshot!(format!("{output:?}"), @r#""hello\n42\n""#);
}

#[test]
fn test_sort_words() {
    // int n = getInt(); string[] words = new string[n]; ... insertion sort
    let output = run("4\npear apple fig banana", || {
        let n = _get_i_();
        let array = _malloc_a_(size_of::<StringRef>() as i32, n);
        assert_eq!(_a_size_(array), 4);

        let slots = array.as_ptr().cast::<StringRef>();
        for i in 0.._a_size_(array) as usize {
            unsafe { slots.add(i).write(_get_s_()) };
        }
        for i in 1..n as usize {
            let mut j = i;
            while j > 0 {
                let (prev, cur) = unsafe { (slots.add(j - 1).read(), slots.add(j).read()) };
                if _s_leq_(prev, cur) == 1 {
                    break;
                }
                unsafe {
                    slots.add(j - 1).write(cur);
                    slots.add(j).write(prev);
                }
                j -= 1;
            }
        }
        for i in 0..n as usize {
            _print_s_(unsafe { slots.add(i).read() });
            _print_s_(lit(" "));
        }
        _println_s_(lit(""));
    });
    assert_snapshot!(format!("{output:?}"), @r#""apple banana fig pear \n""#);
}

#[test]
fn test_string_building() {
    // Reverse each token and report its length and digit sum.
    let output = run("abc 12345", || {
        for _ in 0..2 {
            let s = _get_s_();
            let mut reversed = lit("");
            for i in (0.._s_length_(s)).rev() {
                let ch = unsafe { _s_substring_(s, i, i + 1) };
                reversed = _s_concatenate_(reversed, ch);
            }
            _print_s_(reversed);
            _print_s_(lit(":"));
            _print_i_(_s_length_(reversed));
            _print_s_(lit(":"));
            let digits: i32 = (0.._s_length_(s))
                .map(|i| unsafe { _s_ord_(s, i) })
                .filter(|c| (48..58).contains(c))
                .map(|c| c - 48)
                .sum();
            _println_s_(_to_str_(digits));
        }
    });
    assert_snapshot!(format!("{output:?}"), @r#""cba:3:0\n54321:5:15\n""#);
}

#[test]
fn test_parse_and_compare_numbers_as_strings() {
    let output = run("-17 +8 007", || {
        let a = _get_s_();
        let b = _get_s_();
        let c = _get_s_();
        _println_i_(_s_parse_(a) + _s_parse_(b) + _s_parse_(c));
        _println_i_(i32::from(_s_less_(a, b)));
        _println_i_(i32::from(_s_equal_(_to_str_(_s_parse_(c)), lit("7"))));
    });
    assert_snapshot!(format!("{output:?}"), @r#""-2\n0\n1\n""#);
}

#[test]
fn test_exhausted_input() {
    let output = run("only", || {
        let first = _get_s_();
        let second = _get_s_();
        let n = _get_i_();
        _println_s_(first);
        _println_i_(_s_length_(second));
        _println_i_(n);
    });
    assert_snapshot!(format!("{output:?}"), @r#""only\n0\n0\n""#);
}

#[test]
fn test_overlong_token_is_truncated() {
    let input = format!("{} 5", "z".repeat(300));
    let output = run(&input, || {
        let s = _get_s_();
        _println_i_(_s_length_(s));
        _println_i_(_get_i_());
    });
    assert_snapshot!(format!("{output:?}"), @r#""256\n5\n""#);
}

#[test]
fn test_padded_integer_keeps_its_value() {
    let input = format!("{}7 9", "0".repeat(300));
    let output = run(&input, || {
        let n = _get_i_();
        _println_i_(n);
        _println_i_(_get_i_());
    });
    assert_snapshot!(format!("{output:?}"), @r#""7\n9\n""#);
}
