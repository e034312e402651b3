//! A paced stream of random numbers and a helper that times several
//! consumers of it running side by side.

use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use tracing::debug;

use super::random_up_to;

/// Shape of the stream produced by [`random_stream`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorSettings {
    /// Number of values yielded before the stream ends.
    pub count: usize,
    /// Sleep before each value.
    pub interval: Duration,
    /// Values are uniform in `[0, upper_bound]`.
    pub upper_bound: f64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            count: 10,
            interval: Duration::from_secs(1),
            upper_bound: 10.0,
        }
    }
}

pub fn random_stream(settings: GeneratorSettings) -> impl Stream<Item = f64> {
    stream::unfold(0usize, move |produced| async move {
        if produced >= settings.count {
            return None;
        }
        tokio::time::sleep(settings.interval).await;
        Some((random_up_to(settings.upper_bound), produced + 1))
    })
}

/// Ten values in `[0, 10]`, one per second.
pub fn async_generator() -> impl Stream<Item = f64> {
    random_stream(GeneratorSettings::default())
}

pub async fn async_comprehension() -> Vec<f64> {
    async_generator().collect().await
}

/// Four [`async_comprehension`]s at once; returns elapsed seconds.
pub async fn measure_runtime() -> f64 {
    measure_runtime_with(GeneratorSettings::default(), 4).await
}

/// Collect `parallelism` streams concurrently and return elapsed seconds.
pub async fn measure_runtime_with(settings: GeneratorSettings, parallelism: usize) -> f64 {
    let start = tokio::time::Instant::now();

    let runs = (0..parallelism).map(|_| random_stream(settings).collect::<Vec<f64>>());
    let collected = futures::future::join_all(runs).await;

    let elapsed = start.elapsed().as_secs_f64();
    debug!(
        "collected {} streams of {} values in {:.3}s",
        collected.len(),
        settings.count,
        elapsed
    );
    elapsed
}
