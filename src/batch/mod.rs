// Batch Module
// Sequential and pooled encode/decode runs over a message batch

pub mod processor;

pub use processor::{BatchError, BatchProcessor, BatchResult, RoundTrip};
