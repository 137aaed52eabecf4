//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! - `LOG_LEVEL` holds the filter directives; `DEFAULT_FILTER` when unset or invalid.
//! - `LOG_FORMAT` picks the output: `pretty` (default), `compact` or `json`.
//!
//! Targets: `vocab_drill` for service plumbing, `game` for session flow.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,game=debug,vocab_drill=debug,tower_http=info,axum=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    /// Unknown values fall back to pretty output.
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            Some("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

fn filter_from(raw: Option<&str>) -> EnvFilter {
    raw.and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing() {
    let level = std::env::var("LOG_LEVEL").ok();
    let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_from(level.as_deref()))
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.init(),
    }
    tracing::debug!(target: "vocab_drill", ?format, "Tracing initialised");
}
