//! Shared helpers for the `jobdag` integration tests.
//!
//! - [`builders`]: fluent construction of job bodies.
//! - [`fixtures`]: a throwaway store + data dir, a fixed-verdict validator
//!   and a literal table constructor.

pub mod builders;
pub mod fixtures;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Route `jobdag` tracing output into the test harness.
///
/// Output is captured per test and only shown for failures (or with
/// `--nocapture`). Store and executor events are at debug level, so
/// `RUST_LOG=jobdag::store=debug,jobdag::dag=debug` shows every mutation and
/// merge step of a failing test.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("jobdag=info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Fail the test if `f` does not finish within five seconds.
///
/// Service tests wait on the store mutex; a lost wakeup should fail the test
/// rather than hang the suite.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("test did not finish within 5 seconds")
}
