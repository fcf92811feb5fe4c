//! Logging setup on top of `tracing`
//!
//! Library code only emits events; the binary installs the subscriber once
//! through [`init_logger`].

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "gomodgraph=info";
const VERBOSE_FILTER: &str = "gomodgraph=debug";
const QUIET_FILTER: &str = "gomodgraph=error";

/// Pick the filter directives for the given flags
///
/// `verbose` wins over `quiet`, both win over `RUST_LOG`.
pub fn filter_directives(verbose: bool, quiet: bool, env: Option<&str>) -> String {
    if verbose {
        VERBOSE_FILTER.to_string()
    } else if quiet {
        QUIET_FILTER.to_string()
    } else {
        env.filter(|directives| !directives.trim().is_empty())
            .unwrap_or(DEFAULT_FILTER)
            .to_string()
    }
}

/// Install the global subscriber writing compact lines to stderr
///
/// Calling this twice is harmless, the second subscriber is ignored.
pub fn init_logger(verbose: bool, quiet: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::try_new(filter_directives(verbose, quiet, env.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(filter_directives(false, false, None), "gomodgraph=info");
        assert_eq!(filter_directives(false, false, Some("  ")), "gomodgraph=info");
    }

    #[test]
    fn test_flags_override_env() {
        assert_eq!(
            filter_directives(true, true, Some("gomodgraph=trace")),
            "gomodgraph=debug"
        );
        assert_eq!(
            filter_directives(false, true, Some("gomodgraph=trace")),
            "gomodgraph=error"
        );
    }

    #[test]
    fn test_env_is_honoured() {
        assert_eq!(
            filter_directives(false, false, Some("gomodgraph=trace,reqwest=debug")),
            "gomodgraph=trace,reqwest=debug"
        );
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logger(false, true);
        init_logger(false, true);
    }
}
