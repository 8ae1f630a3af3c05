//! Textbook RSA key generation and a batch encode/decode benchmark.
//!
//! The [`rsa`] module holds the arithmetic engine (modular exponentiation,
//! inverses, Miller-Rabin, key generation). [`batch`] round-trips message
//! batches on one thread or on a fixed-size worker pool and times both.
//!
//! Unpadded RSA is used purely as a CPU workload and offers no security.

pub mod batch;
pub mod config;
pub mod rsa;
pub mod ui;
pub mod util;

pub use batch::{BatchProcessor, BatchResult};
pub use config::BenchConfig;
pub use rsa::{RsaError, RsaKeyPair};
