//! tracing subscriber setup.
//!
//! Filter precedence: GITWP_LOG, then RUST_LOG, then `gitwp=debug` with --verbose,
//! otherwise `warn`. Output goes to stderr so stdout stays free for passthrough commands.

use std::env;

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

fn filter_directive(verbose: bool) -> String {
    for key in ["GITWP_LOG", "RUST_LOG"] {
        if let Ok(v) = env::var(key) {
            if !v.trim().is_empty() {
                return v;
            }
        }
    }
    if verbose {
        "gitwp=debug".to_string()
    } else {
        "warn".to_string()
    }
}

/// Install the global fmt subscriber once; returns false when one was already set.
pub fn telemetry_init(verbose: bool) -> bool {
    if INIT.get().is_some() {
        return false;
    }
    let filter = EnvFilter::try_new(filter_directive(verbose))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let ok = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();
    if !ok {
        eprintln!("gitwp: telemetry init skipped (global subscriber already set)");
        return false;
    }
    let _ = INIT.set(());
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        build_date = env!("GITWP_BUILD_DATE"),
        target = env!("GITWP_BUILD_TARGET"),
        profile = env!("GITWP_BUILD_PROFILE"),
        "gitwp starting"
    );
    true
}
