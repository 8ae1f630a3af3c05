// Console front end
// Drives key generation and batch runs, and prints their reports

pub mod app;
pub mod report;

pub use report::{KeySummary, RoundTripTable, RunReport};
