//! Shared helpers for taskdag's integration tests.
//!
//! - [`builders`] assembles plan files and tasks.
//! - [`fixtures`] provides ready-made schedulers and invariant checks.

pub mod builders;
pub mod fixtures;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use taskdag::logging::LOG_ENV;
use tracing_subscriber::{fmt, EnvFilter};

/// Upper bound for a single async test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Reads the same `TASKDAG_LOG` directives as the binary, then `RUST_LOG`,
/// then falls back to `warn`. Captured output only shows for failing tests
/// unless the run uses `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        // Another test harness may own the global subscriber already.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `future`, failing the test if it runs longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F: Future>(future: F) -> F::Output {
    match tokio::time::timeout(TEST_TIMEOUT, future).await {
        Ok(output) => output,
        Err(_) => panic!("scheduler test did not finish within {TEST_TIMEOUT:?}"),
    }
}
