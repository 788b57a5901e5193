// Common utilities for tests

use std::sync::Once;
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test-friendly subscriber once per process. Honors `RUST_LOG`, defaulting to `warn`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Run `f` and report how long it took.
pub fn timed<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Panic unless `elapsed` falls within `[lower, upper]`.
pub fn assert_elapsed_between(elapsed: Duration, lower: Duration, upper: Duration) {
    assert!(
        elapsed >= lower,
        "returned too early: {elapsed:?} < {lower:?}"
    );
    assert!(elapsed <= upper, "returned too late: {elapsed:?} > {upper:?}");
}

/// Spin with `yield_now` until `condition` holds, panicking after `timeout`.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + timeout;
    while !condition() {
        assert!(Instant::now() < deadline, "condition not met within {timeout:?}");
        std::thread::yield_now();
    }
}
