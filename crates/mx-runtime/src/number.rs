//! Decimal conversion shared by strings and the console
//!
//! Rendering follows the two-pass scheme compiled programs were built
//! against: digits are produced least-significant first into a scratch
//! buffer, then copied out in reverse behind an optional sign, so the digit
//! count never has to be known up front.
//!
//! Scanning mirrors `scanf("%d")`: leading whitespace, one optional sign,
//! then as many digits as follow. Overflow wraps, and content without digits
//! scans as 0.

/// Digits in `u32::MAX`, enough for the magnitude of any `i32`.
const MAX_DIGITS: usize = 10;

/// Longest rendering of an `i32`: a sign plus ten digits.
pub const MAX_DECIMAL_LEN: usize = MAX_DIGITS + 1;

/// The decimal digits of one integer, least significant first.
#[derive(Debug, Clone, Copy)]
pub struct Digits {
    scratch: [u8; MAX_DIGITS],
    count: usize,
    negative: bool,
}

impl Digits {
    pub fn new(value: i32) -> Self {
        let mut scratch = [0u8; MAX_DIGITS];
        let mut count = 0;
        // unsigned_abs keeps i32::MIN representable
        let mut magnitude = value.unsigned_abs();

        if magnitude == 0 {
            scratch[0] = b'0';
            count = 1;
        }
        while magnitude != 0 {
            scratch[count] = b'0' + (magnitude % 10) as u8;
            magnitude /= 10;
            count += 1;
        }

        Digits {
            scratch,
            count,
            negative: value < 0,
        }
    }

    /// Length of the rendered text, sign included.
    pub fn rendered_len(&self) -> usize {
        self.count + usize::from(self.negative)
    }

    /// Write the rendering into `dst`, which must be exactly
    /// [`rendered_len`](Self::rendered_len) bytes long.
    pub fn write_to(&self, dst: &mut [u8]) {
        debug_assert_eq!(dst.len(), self.rendered_len());

        let mut out = dst.iter_mut();
        if self.negative {
            if let Some(slot) = out.next() {
                *slot = b'-';
            }
        }
        for (slot, digit) in out.zip(self.scratch[..self.count].iter().rev()) {
            *slot = *digit;
        }
    }

    /// Render onto the stack, for callers that only need the bytes briefly.
    pub fn render(&self) -> ([u8; MAX_DECIMAL_LEN], usize) {
        let mut buf = [0u8; MAX_DECIMAL_LEN];
        let len = self.rendered_len();
        self.write_to(&mut buf[..len]);
        (buf, len)
    }
}

/// `isspace` in the C locale: space, `\t`, `\n`, `\v`, `\f`, `\r`.
pub fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Whether `bytes` begins with an optional sign followed by a digit.
pub fn starts_integer(bytes: &[u8]) -> bool {
    let unsigned = match bytes.first() {
        Some(b'+' | b'-') => &bytes[1..],
        _ => bytes,
    };
    unsigned.first().is_some_and(u8::is_ascii_digit)
}

/// Scan a decimal integer prefix.
pub fn scan_decimal(bytes: &[u8]) -> i32 {
    let start = bytes
        .iter()
        .position(|&b| !is_space(b))
        .unwrap_or(bytes.len());
    let mut rest = &bytes[start..];

    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    let magnitude = rest
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i32, |acc, b| {
            acc.wrapping_mul(10).wrapping_add(i32::from(b - b'0'))
        });

    if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    }
}
