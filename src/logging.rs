//! Diagnostic logging setup
//!
//! Services log through `tracing` macros; the binary installs a single
//! `fmt` subscriber writing to stderr so command output on stdout stays
//! machine-readable.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber once
///
/// `RUST_LOG` is honored; the crate's own level defaults to `info`, or
/// `debug` when `verbose` is set.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let level = if verbose { "rentshare=debug" } else { "rentshare=info" };
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = level.parse() {
            filter = filter.add_directive(directive);
        }

        // A subscriber installed by a host application wins
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing(false);
        init_tracing(true);
        tracing::info!("logging initialized twice without panicking");
    }
}
