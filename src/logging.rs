//! Tracing setup for the CLI.
//!
//! The library only emits `tracing` events; the binary decides where they
//! go. Logs are written to stderr so stdout stays clean for reports and
//! `--json` output. `RUST_LOG` wins over the `-v` count when set.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Map a `-v` count to a filter level.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Filter directives for our own crate at `level`, with dependencies kept quiet.
pub fn filter_directives(level: &str) -> String {
    format!("warn,salad_builder={level}")
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_tracing(verbose: u8) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(level_for_verbosity(verbose))));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(9), "trace");
    }

    #[test]
    fn directives_scope_to_crate() {
        let directives = filter_directives("debug");
        assert_eq!(directives, "warn,salad_builder=debug");
        assert!(EnvFilter::try_new(&directives).is_ok());
    }
}
