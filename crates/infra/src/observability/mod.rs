//! Tracing initialisation
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` read from
//! `RUST_LOG` (default `info`) and either human-readable or JSON output on
//! stderr.
//!
//! ```no_run
//! use sellerlink_infra::observability::{init_tracing, LogFormat};
//!
//! init_tracing(LogFormat::from_env());
//! ```

use std::io;
use std::str::FromStr;

use sellerlink_common::error::{ErrorKind, ErrorRecord};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable selecting the output format
pub const LOG_FORMAT_ENV: &str = "SELLERLINK_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines for development
    #[default]
    Plain,
    /// One JSON object per event for log aggregation
    Json,
}

impl LogFormat {
    /// Read [`LOG_FORMAT_ENV`]; anything other than `json` is plain.
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for LogFormat {
    type Err = ErrorRecord;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "pretty" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            other => Err(ErrorRecord::new(
                ErrorKind::InitializationError,
                format!("unknown log format '{other}'"),
            )
            .with_context("observability.log_format")),
        }
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a global subscriber was already set, in which case
/// nothing changes. Safe to call more than once.
pub fn init_tracing(format: LogFormat) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Plain => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(io::stderr),
            )
            .try_init(),
    };

    installed.is_ok()
}
