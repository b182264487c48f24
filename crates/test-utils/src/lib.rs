//! Shared helpers for taskdag's integration tests.

pub mod builders;
pub mod inline_backend;

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use taskdag::logging::LOG_ENV;
use tracing_subscriber::{fmt, EnvFilter};

pub use inline_backend::InlineBackend;

/// Upper bound for any single awaited run in a test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: OnceLock<()> = OnceLock::new();

/// Route `tracing` output into the test harness's captured output.
///
/// Filter comes from `TASKDAG_LOG` (same variable as the binary), falling
/// back to `taskdag=debug` so scheduler decisions show up for failing tests.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("taskdag=debug"));

        // A subscriber may already be installed in this process.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}

/// Await `f`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("graph run did not finish within {TEST_TIMEOUT:?}"),
    }
}
