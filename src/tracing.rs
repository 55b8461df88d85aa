use time::macros::format_description;
use tracing_subscriber::{fmt, EnvFilter, FmtSubscriber};

pub const TRACE_ENV_VAR: &str = "TRACE";

// Sets up tracing to stderr, filtered by the TRACE env var, and off by default.
// Levels are: trace, debug, info, warn, error
//
// Eg.
// All targets, info level:             info
// All modules under fx, debug level:   spcfx::fx=debug
// Global at warn, spc as trace:        warn,spcfx::spc=trace
//
// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
pub fn setup_tracing() {
    let builder = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_env(TRACE_ENV_VAR));

    let time_format = format_description!("[hour]:[minute]:[second].[subsecond digits:5]");

    // Already set up (eg. by a test) is not an error.
    // Fall back to the default (UTC) timer if the local offset isn't known.
    match crate::util::date::local_utc_offset() {
        Ok(offset) => {
            let timer = fmt::time::OffsetTime::new(offset, time_format);
            let _ = tracing::subscriber::set_global_default(builder.with_timer(timer).finish());
        }
        Err(_) => {
            let _ = tracing::subscriber::set_global_default(builder.finish());
        }
    }
}

/// Adds directives to the TRACE env var, before setup_tracing.
pub fn enable_trace_env(directives: &str) {
    if let Ok(existing) = std::env::var(TRACE_ENV_VAR) {
        std::env::set_var(TRACE_ENV_VAR, existing + "," + directives);
    } else {
        std::env::set_var(TRACE_ENV_VAR, directives);
    }
}
