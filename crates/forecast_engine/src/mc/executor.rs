//! Chunked path execution with optional rayon parallelism.
//!
//! Paths are split into fixed-size chunks. Each chunk draws from its own RNG
//! stream, derived from the horizon generator and the chunk index, so the
//! merged output is identical whether chunks run sequentially or on the
//! rayon pool, and whatever the thread count.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use forecast_core::types::ForecastError;
use rayon::prelude::*;

use crate::rng::ForecastRng;

/// Number of paths simulated per chunk.
pub const PATH_CHUNK_SIZE: usize = 256;

/// Cooperative cancellation flag shared between a caller and a running
/// forecast.
///
/// Checked before each path chunk starts; a chunk already running finishes.
///
/// # Examples
///
/// ```rust
/// use forecast_engine::mc::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
///
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Runs a fixed number of paths in chunks and returns per-chunk outputs in
/// chunk order.
#[derive(Clone, Debug)]
pub struct PathExecutor {
    n_paths: usize,
    parallel: bool,
    cancel: Option<CancellationToken>,
}

impl PathExecutor {
    /// Creates an executor for `n_paths` paths.
    pub fn new(n_paths: usize, parallel: bool) -> Self {
        Self {
            n_paths,
            parallel,
            cancel: None,
        }
    }

    /// Attaches a cancellation token.
    pub fn with_cancellation(mut self, token: Option<CancellationToken>) -> Self {
        self.cancel = token;
        self
    }

    /// Total number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of chunks the paths are split into.
    #[inline]
    pub fn n_chunks(&self) -> usize {
        self.n_paths.div_ceil(PATH_CHUNK_SIZE)
    }

    /// Number of paths in chunk `index`.
    #[inline]
    fn chunk_len(&self, index: usize) -> usize {
        let start = index * PATH_CHUNK_SIZE;
        PATH_CHUNK_SIZE.min(self.n_paths - start)
    }

    /// Simulates every chunk with `simulate_chunk(rng, paths_in_chunk)`.
    ///
    /// Chunk `i` receives `rng.stream(i)`. Outputs are returned in chunk
    /// order regardless of scheduling.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Cancelled`] if the token fires before all
    /// chunks have started.
    pub fn run<T, F>(&self, rng: &ForecastRng, simulate_chunk: F) -> Result<Vec<T>, ForecastError>
    where
        T: Send,
        F: Fn(&mut ForecastRng, usize) -> T + Sync + Send,
    {
        let run_chunk = |index: usize| -> Result<T, ForecastError> {
            if self.is_cancelled() {
                return Err(ForecastError::Cancelled);
            }
            let mut chunk_rng = rng.stream(index as u64);
            Ok(simulate_chunk(&mut chunk_rng, self.chunk_len(index)))
        };

        if self.parallel {
            (0..self.n_chunks()).into_par_iter().map(run_chunk).collect()
        } else {
            (0..self.n_chunks()).map(run_chunk).collect()
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_chunk(rng: &mut ForecastRng, n: usize) -> Vec<f64> {
        (0..n).map(|_| rng.gen_uniform()).collect()
    }

    #[test]
    fn test_chunk_layout() {
        let exec = PathExecutor::new(2000, false);
        assert_eq!(exec.n_chunks(), 8);
        assert_eq!(exec.chunk_len(0), PATH_CHUNK_SIZE);
        assert_eq!(exec.chunk_len(7), 2000 - 7 * PATH_CHUNK_SIZE);

        let exec = PathExecutor::new(256, false);
        assert_eq!(exec.n_chunks(), 1);
        assert_eq!(exec.chunk_len(0), 256);
    }

    #[test]
    fn test_run_visits_every_path() {
        let exec = PathExecutor::new(1000, false);
        let rng = ForecastRng::from_seed(1);
        let chunks = exec.run(&rng, draw_chunk).unwrap();

        assert_eq!(chunks.len(), exec.n_chunks());
        assert_eq!(chunks.iter().map(Vec::len).sum::<usize>(), 1000);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let rng = ForecastRng::from_seed(42);
        let seq = PathExecutor::new(3000, false).run(&rng, draw_chunk).unwrap();
        let par = PathExecutor::new(3000, true).run(&rng, draw_chunk).unwrap();

        assert_eq!(seq, par);
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();

        let exec = PathExecutor::new(1000, true).with_cancellation(Some(token));
        let result = exec.run(&ForecastRng::from_seed(3), draw_chunk);

        assert_eq!(result, Err(ForecastError::Cancelled));
    }

    #[test]
    fn test_cancel_mid_run() {
        let token = CancellationToken::new();
        let exec = PathExecutor::new(10 * PATH_CHUNK_SIZE, false)
            .with_cancellation(Some(token.clone()));

        let result = exec.run(&ForecastRng::from_seed(3), |rng, n| {
            token.cancel();
            draw_chunk(rng, n)
        });

        assert_eq!(result, Err(ForecastError::Cancelled));
    }
}
