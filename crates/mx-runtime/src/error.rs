//! Error types for the runtime
//!
//! None of these cross the C ABI. The entry points in [`crate::builtins`]
//! collapse them into the unspecified-value or abort behavior that compiled
//! code expects.

use derive_more::{Display, Error, From};

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Display, Debug, Error, From)]
pub enum RuntimeError {
    #[display("I/O error: {_0}")]
    #[from]
    Io(std::io::Error),

    #[display("End of input")]
    EndOfInput,

    #[display("Invalid value {value:?} for {var}")]
    Config { var: &'static str, value: String },
}

impl RuntimeError {
    pub(crate) fn config(var: &'static str, value: impl Into<String>) -> Self {
        RuntimeError::Config {
            var,
            value: value.into(),
        }
    }

    pub fn is_end_of_input(&self) -> bool {
        matches!(self, RuntimeError::EndOfInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = RuntimeError::config("MX_RT_TOKEN_LIMIT", "lots");
        assert_eq!(
            err.to_string(),
            "Invalid value \"lots\" for MX_RT_TOKEN_LIMIT"
        );
        assert_eq!(RuntimeError::EndOfInput.to_string(), "End of input");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: RuntimeError = io.into();
        assert!(matches!(err, RuntimeError::Io(_)));
        assert!(err.to_string().starts_with("I/O error: "));
        assert!(!err.is_end_of_input());
    }
}
