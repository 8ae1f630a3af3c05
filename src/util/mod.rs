// Utility Module
// Message sources for batch runs

pub mod file_ops;

pub use file_ops::{generate_messages, load_messages, parse_messages, reduce_message, SourceError};
