//! Log capture for scorekeeper tests.
//!
//! Reducer, store and storage code log through `tracing`; this routes those
//! events into the libtest output capture so they only show for failing tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Install the test subscriber once per process.
///
/// `TEST_LOG` picks the filter (e.g. `TEST_LOG=scorekeeper=debug` to see
/// every reduced action), then `RUST_LOG`, then `warn`. Later calls are
/// no-ops, and a subscriber installed by someone else is left alone.
pub fn init() {
    INSTALLED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .with_target(true)
            .try_init();
    });
}
