use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// JSON output by default (set `LOOTLEDGER_LOG_FORMAT=compact` for local
/// dev), filtered via `RUST_LOG` with an `info` fallback. Safe to call
/// multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let compact = std::env::var("LOOTLEDGER_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("compact"))
        .unwrap_or(false);

    if compact {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .with_target(false)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .with_target(false)
            .try_init();
    }
}
