//! Random asynchronous delays, run concurrently and collected in the order
//! they complete.

use std::time::{Duration, Instant};

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use rand::Rng;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

pub mod stream;

pub use stream::{
    GeneratorSettings, async_comprehension, async_generator, measure_runtime,
    measure_runtime_with, random_stream,
};

/// Default upper bound, in seconds, for [`wait_random`].
pub const DEFAULT_MAX_DELAY: f64 = 10.0;

/// Uniform sample in `[0, max]`. Non-finite or non-positive bounds yield 0.
pub(crate) fn random_up_to(max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    rand::rng().random_range(0.0..=max)
}

/// Seconds to a `Duration`, saturating at `Duration::MAX` for values that do
/// not fit.
fn delay_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Sleep for a random number of seconds in `[0, max_delay]` and return it.
pub async fn wait_random(max_delay: f64) -> f64 {
    let delay = random_up_to(max_delay);
    tokio::time::sleep(delay_duration(delay)).await;
    delay
}

/// Run `n` [`wait_random`] calls concurrently on the current task.
///
/// Delays are returned in completion order, which makes the result ascending
/// without any sorting.
pub async fn wait_n(n: usize, max_delay: f64) -> Vec<f64> {
    let mut pending: FuturesUnordered<_> = (0..n).map(|_| wait_random(max_delay)).collect();

    let mut delays = Vec::with_capacity(n);
    while let Some(delay) = pending.next().await {
        delays.push(delay);
    }

    debug!("wait_n collected {} delays (max_delay={})", delays.len(), max_delay);
    delays
}

/// Spawn [`wait_random`] as its own tokio task.
pub fn task_wait_random(max_delay: f64) -> JoinHandle<f64> {
    tokio::spawn(wait_random(max_delay))
}

/// Same as [`wait_n`], but every delay runs in a spawned task.
pub async fn task_wait_n(n: usize, max_delay: f64) -> Result<Vec<f64>, JoinError> {
    let mut pending: FuturesUnordered<JoinHandle<f64>> =
        (0..n).map(|_| task_wait_random(max_delay)).collect();

    let mut delays = Vec::with_capacity(n);
    while let Some(joined) = pending.next().await {
        delays.push(joined?);
    }

    debug!("task_wait_n collected {} delays (max_delay={})", delays.len(), max_delay);
    Ok(delays)
}

/// Average wall-clock seconds per task for one [`wait_n`] run.
///
/// Builds a dedicated runtime, so it must not be called from inside one.
pub fn measure_time(n: usize, max_delay: f64) -> Result<f64> {
    if n == 0 {
        anyhow::bail!("cannot measure an average over zero tasks");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let start = Instant::now();
    runtime.block_on(wait_n(n, max_delay));
    let total = start.elapsed().as_secs_f64();

    debug!("measure_time: {} tasks took {:.3}s", n, total);
    Ok(total / n as f64)
}
