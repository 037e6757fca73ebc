//! Telemetry initialization.
//!
//! Controlled by `LINKMERGE_LOG`:
//! - unset or empty → no subscriber (tracing disabled)
//! - `"stderr"` → JSON spans/events to stderr, filtered by `RUST_LOG`
//!   (default `info`)
//! - anything else → an `EnvFilter` directive (e.g. `linkmerge=debug`) with
//!   human-readable output on stderr

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::{SubscriberInitExt as _, TryInitError};

/// Environment variable selecting the log output.
pub const LOG_ENV: &str = "LINKMERGE_LOG";

/// Opaque guard for the process-wide subscriber. Hold this in `main()` until
/// exit.
pub struct TelemetryGuard {
    _private: (),
}

/// What `LINKMERGE_LOG` asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
enum LogMode {
    Off,
    Json,
    Human(String),
}

impl LogMode {
    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Off,
            Some("stderr") => Self::Json,
            Some(directive) => Self::Human(directive.to_owned()),
        }
    }
}

/// Initialize telemetry based on `LINKMERGE_LOG`.
///
/// Installs a global subscriber, so events from every thread are seen.
#[must_use]
pub fn init() -> TelemetryGuard {
    let value = std::env::var(LOG_ENV).ok();
    let installed = match LogMode::from_env_value(value.as_deref()) {
        LogMode::Off => Ok(()),
        LogMode::Json => init_json(),
        LogMode::Human(directive) => init_human(&directive),
    };
    if let Err(e) = installed {
        eprintln!("warning: failed to install tracing subscriber: {e}");
    }
    TelemetryGuard { _private: () }
}

/// JSON spans/events to stderr via tracing-subscriber's JSON formatter.
fn init_json() -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE),
        )
        .try_init()
}

/// Human-readable events to stderr, filtered by `directive`.
fn init_human(directive: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("warning: invalid {LOG_ENV} directive `{directive}`: {e}");
        EnvFilter::new("info")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
}
