// Batch Processor
// Round-trips every message of a batch and times the whole pass

use std::time::{Duration, Instant};

use log::info;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

use crate::rsa::{RsaBigInt, RsaKeyPair};

/// Errors from setting up a parallel run
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

/// Outcome of one processing run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchResult {
    pub correct_count: usize,
    pub total: usize,
    pub elapsed_millis: f64,
}

impl BatchResult {
    fn new(correct_count: usize, total: usize, elapsed: Duration) -> Self {
        Self {
            correct_count,
            total,
            elapsed_millis: elapsed.as_secs_f64() * 1000.0,
        }
    }

    /// Every message in the batch came back unchanged
    pub fn all_correct(&self) -> bool {
        self.correct_count == self.total
    }
}

/// Per-message detail of a round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTrip {
    pub source: RsaBigInt,
    pub encrypted: RsaBigInt,
    pub decrypted: RsaBigInt,
}

impl RoundTrip {
    fn run(source: &RsaBigInt, keys: &RsaKeyPair) -> Self {
        let encrypted = keys.public_key().encode(source);
        let decrypted = keys.private_key().decode(&encrypted);
        Self {
            source: source.clone(),
            encrypted,
            decrypted,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.decrypted == self.source
    }
}

/// Applies encode then decode to a batch of messages under one key pair.
///
/// The key pair is only read, so every worker shares the same borrow.
#[derive(Debug, Clone, Copy)]
pub struct BatchProcessor<'a> {
    keys: &'a RsaKeyPair,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(keys: &'a RsaKeyPair) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &'a RsaKeyPair {
        self.keys
    }

    /// Single pass on the calling thread
    pub fn run_sequential(&self, messages: &[RsaBigInt]) -> BatchResult {
        let start = Instant::now();
        let correct = self.count_correct(messages);
        let result = BatchResult::new(correct, messages.len(), start.elapsed());

        info!(
            "sequential run: {}/{} correct in {:.3} ms",
            result.correct_count, result.total, result.elapsed_millis
        );
        result
    }

    /// Pass over `workers` contiguous slices on a dedicated pool of `workers`
    /// threads.
    ///
    /// Each worker counts its own slice; the partial counts are summed once
    /// all of them have finished. Timing covers dispatch to the last worker
    /// completing, not pool start-up.
    pub fn run_parallel(
        &self,
        messages: &[RsaBigInt],
        workers: usize,
    ) -> Result<BatchResult, BatchError> {
        let pool = build_pool(workers)?;
        if messages.is_empty() {
            return Ok(BatchResult::new(0, 0, Duration::ZERO));
        }

        let chunk_len = messages.len().div_ceil(workers);

        let start = Instant::now();
        let correct: usize = pool.install(|| {
            messages
                .par_chunks(chunk_len)
                .map(|chunk| self.count_correct(chunk))
                .sum()
        });
        let result = BatchResult::new(correct, messages.len(), start.elapsed());

        info!(
            "parallel run ({} workers): {}/{} correct in {:.3} ms",
            workers, result.correct_count, result.total, result.elapsed_millis
        );
        Ok(result)
    }

    /// Encrypted and decrypted value of every message, in input order
    pub fn round_trips(
        &self,
        messages: &[RsaBigInt],
        workers: usize,
    ) -> Result<Vec<RoundTrip>, BatchError> {
        let pool = build_pool(workers)?;
        let keys = self.keys;
        Ok(pool.install(|| {
            messages
                .par_iter()
                .map(|message| RoundTrip::run(message, keys))
                .collect()
        }))
    }

    fn count_correct(&self, messages: &[RsaBigInt]) -> usize {
        messages
            .iter()
            .filter(|message| self.keys.round_trip(message))
            .count()
    }
}

fn build_pool(workers: usize) -> Result<ThreadPool, BatchError> {
    if workers == 0 {
        return Err(BatchError::InvalidWorkerCount);
    }

    Ok(ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("rsa-worker-{}", index))
        .build()?)
}
