//! Standard input and output for compiled programs
//!
//! This is the only module that touches the process environment. Input is
//! read one whitespace-delimited token at a time from a single buffered
//! reader, so `getInt` and `getString` consume the same stream in order.
//! Output is buffered and flushed before every read, so prompts appear
//! before the program blocks on input. Compiled programs end by returning
//! from a foreign `main`, where no Rust code runs, so attaching standard I/O
//! also registers an `atexit` hook that flushes whatever is still pending.
//!
//! The console is thread-local and created lazily on standard I/O. Tests and
//! embedders swap in in-memory buffers with [`redirect`].

use std::cell::RefCell;
use std::ffi::c_int;
use std::io::{self, BufRead, BufWriter, Cursor, Write};
use std::rc::Rc;
use std::sync::Once;

use tracing::{debug, warn};

use crate::config::{self, DEFAULT_TOKEN_LIMIT};
use crate::error::{RuntimeError, RuntimeResult};
use crate::number::{self, Digits};

pub struct Console {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    token_limit: Option<usize>,
}

impl Console {
    pub fn new(
        input: impl BufRead + 'static,
        output: impl Write + 'static,
        token_limit: Option<usize>,
    ) -> Self {
        Console {
            input: Box::new(input),
            output: Box::new(output),
            token_limit,
        }
    }

    /// Console over the process's standard input and output.
    pub fn stdio() -> Self {
        let token_limit = config::get().token_limit;
        debug!(?token_limit, "attaching console to standard I/O");
        register_exit_flush();
        Console::new(io::stdin().lock(), BufWriter::new(io::stdout()), token_limit)
    }

    /// Console reading from `input` and writing into the returned transcript.
    pub fn with_buffers(input: impl Into<Vec<u8>>) -> (Self, Transcript) {
        let transcript = Transcript::default();
        let console = Console::new(
            Cursor::new(input.into()),
            transcript.clone(),
            Some(DEFAULT_TOKEN_LIMIT),
        );
        (console, transcript)
    }

    pub fn with_token_limit(mut self, token_limit: Option<usize>) -> Self {
        self.token_limit = token_limit;
        self
    }

    /// Consume whitespace; `false` once the input is exhausted.
    fn skip_whitespace(&mut self) -> io::Result<bool> {
        loop {
            let buf = self.input.fill_buf()?;
            if buf.is_empty() {
                return Ok(false);
            }
            match buf.iter().position(|&b| !number::is_space(b)) {
                Some(n) => {
                    self.input.consume(n);
                    return Ok(true);
                }
                None => {
                    let n = buf.len();
                    self.input.consume(n);
                }
            }
        }
    }

    /// Read the next whitespace-delimited token.
    ///
    /// Bytes beyond the token limit are consumed and dropped, so the next read
    /// starts at the following token. The delimiter itself is left unread.
    pub fn read_token(&mut self) -> RuntimeResult<Vec<u8>> {
        self.read_token_limited(self.token_limit)
    }

    fn read_token_limited(&mut self, token_limit: Option<usize>) -> RuntimeResult<Vec<u8>> {
        if let Err(err) = self.output.flush() {
            warn!(%err, "flushing output before read failed");
        }
        if !self.skip_whitespace()? {
            return Err(RuntimeError::EndOfInput);
        }

        let mut token = Vec::new();
        let mut dropped = 0usize;
        loop {
            let buf = self.input.fill_buf()?;
            if buf.is_empty() {
                break;
            }
            let end = buf
                .iter()
                .position(|&b| number::is_space(b))
                .unwrap_or(buf.len());
            let keep = match token_limit {
                Some(limit) => limit.saturating_sub(token.len()).min(end),
                None => end,
            };
            token.extend_from_slice(&buf[..keep]);
            dropped += end - keep;

            let delimited = end < buf.len();
            self.input.consume(end);
            if delimited {
                break;
            }
        }

        if dropped > 0 {
            warn!(
                limit = ?token_limit,
                dropped,
                "input token truncated"
            );
        }
        Ok(token)
    }

    /// Read the next token that starts like an integer and scan it.
    ///
    /// Tokens that cannot begin an integer are skipped. The token limit does
    /// not apply here: a padded number still scans to its full value.
    pub fn read_int(&mut self) -> RuntimeResult<i32> {
        loop {
            let token = self.read_token_limited(None)?;
            if number::starts_integer(&token) {
                return Ok(number::scan_decimal(&token));
            }
            debug!(
                token = %String::from_utf8_lossy(&token),
                "skipping non-numeric token"
            );
        }
    }

    pub fn write(&mut self, bytes: &[u8], newline: bool) -> RuntimeResult<()> {
        self.output.write_all(bytes)?;
        if newline {
            self.output.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn write_int(&mut self, value: i32, newline: bool) -> RuntimeResult<()> {
        let (buf, len) = Digits::new(value).render();
        self.write(&buf[..len], newline)
    }

    pub fn flush(&mut self) -> RuntimeResult<()> {
        self.output.flush()?;
        Ok(())
    }
}

thread_local! {
    static CONSOLE: RefCell<Option<Console>> = const { RefCell::new(None) };
}

/// Run `f` against this thread's console, attaching standard I/O if needed.
pub fn with_console<R>(f: impl FnOnce(&mut Console) -> R) -> R {
    CONSOLE.with(|slot| {
        let mut slot = slot.borrow_mut();
        f(slot.get_or_insert_with(Console::stdio))
    })
}

/// Install `console` for this thread, returning the previous one.
pub fn redirect(console: Console) -> Option<Console> {
    CONSOLE.with(|slot| slot.borrow_mut().replace(console))
}

/// Detach this thread's console; the next I/O call reattaches standard I/O.
pub fn reset() -> Option<Console> {
    CONSOLE.with(|slot| slot.borrow_mut().take())
}

/// Flush this thread's console, if one is attached and not in use.
pub fn flush_pending() {
    let _ = CONSOLE.try_with(|slot| {
        let Ok(mut slot) = slot.try_borrow_mut() else {
            return;
        };
        if let Some(Err(err)) = slot.as_mut().map(Console::flush) {
            warn!(%err, "flushing pending output failed");
        }
    });
}

unsafe extern "C" {
    fn atexit(callback: extern "C" fn()) -> c_int;
}

extern "C" fn flush_at_exit() {
    flush_pending();
}

fn register_exit_flush() {
    static REGISTERED: Once = Once::new();

    REGISTERED.call_once(|| {
        if unsafe { atexit(flush_at_exit) } != 0 {
            warn!("could not register exit flush; buffered output may be lost");
        }
    });
}

/// Shared in-memory output sink.
#[derive(Debug, Clone, Default)]
pub struct Transcript(Rc<RefCell<Vec<u8>>>);

impl Transcript {
    pub fn contents(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Transcript {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
