//! Runtime configuration
//!
//! Compiled programs take no arguments meant for the runtime, so the few
//! tunables are read from the environment once, on first use.
//!
//! - `MX_RT_TOKEN_LIMIT`: longest input token in bytes (`0` for unbounded)
//! - `MX_RT_LOG`: a `tracing` filter; logging stays off when unset

use std::sync::OnceLock;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::error::{RuntimeError, RuntimeResult};

/// Longest token kept when nothing else is configured.
pub const DEFAULT_TOKEN_LIMIT: usize = 256;

pub const TOKEN_LIMIT_VAR: &str = "MX_RT_TOKEN_LIMIT";
pub const LOG_VAR: &str = "MX_RT_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Longest token `getString`/`getInt` keep; `None` means unbounded.
    pub token_limit: Option<usize>,
    /// Filter directives for the stderr log subscriber.
    pub log_filter: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            token_limit: Some(DEFAULT_TOKEN_LIMIT),
            log_filter: None,
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> RuntimeResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RuntimeResult<Self> {
        let mut config = RuntimeConfig::default();

        if let Some(raw) = lookup(TOKEN_LIMIT_VAR) {
            let limit = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| RuntimeError::config(TOKEN_LIMIT_VAR, raw.as_str()))?;
            config.token_limit = (limit != 0).then_some(limit);
        }

        config.log_filter = lookup(LOG_VAR).filter(|filter| !filter.trim().is_empty());

        Ok(config)
    }
}

/// The process-wide configuration, loaded (and logging installed) on first call.
pub fn get() -> &'static RuntimeConfig {
    static CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

    CONFIG.get_or_init(|| match RuntimeConfig::from_env() {
        Ok(config) => {
            init_logging(config.log_filter.as_deref());
            config
        }
        Err(err) => {
            let config = RuntimeConfig {
                log_filter: std::env::var(LOG_VAR).ok(),
                ..RuntimeConfig::default()
            };
            init_logging(config.log_filter.as_deref());
            warn!(%err, "falling back to default runtime configuration");
            config
        }
    })
}

/// Install a stderr subscriber. Stdout belongs to the compiled program.
fn init_logging(filter: Option<&str>) {
    let Some(filter) = filter else {
        return;
    };

    // Another subscriber may already be installed by an embedder.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .try_init();
}
