// Console Reports
// Formatting of key material, batch timings and round-trip tables

use std::fmt;

use crate::batch::{BatchResult, RoundTrip};
use crate::rsa::bigint::to_bytes;
use crate::rsa::RsaKeyPair;

/// Leading modulus bytes shown as the key fingerprint
const FINGERPRINT_BYTES: usize = 8;

/// Comparison of one sequential and one parallel run over the same batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    pub workers: usize,
    pub sequential: BatchResult,
    pub parallel: BatchResult,
}

impl RunReport {
    pub fn new(workers: usize, sequential: BatchResult, parallel: BatchResult) -> Self {
        Self {
            workers,
            sequential,
            parallel,
        }
    }

    /// Sequential time over parallel time; 0 when the parallel run took no
    /// measurable time
    pub fn speedup(&self) -> f64 {
        if self.parallel.elapsed_millis == 0.0 {
            0.0
        } else {
            self.sequential.elapsed_millis / self.parallel.elapsed_millis
        }
    }

    /// Both runs round-tripped every message of the batch
    pub fn is_correct(&self) -> bool {
        self.sequential.all_correct()
            && self.parallel.all_correct()
            && self.sequential.total == self.parallel.total
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>7} | {:>6}/{:<6} {:>10.3} ms | {:>6}/{:<6} {:>10.3} ms | {:>7.2}x | {}",
            self.workers,
            self.sequential.correct_count,
            self.sequential.total,
            self.sequential.elapsed_millis,
            self.parallel.correct_count,
            self.parallel.total,
            self.parallel.elapsed_millis,
            self.speedup(),
            if self.is_correct() { "yes" } else { "NO" }
        )
    }
}

/// Column header matching [`RunReport`]'s Display output
pub fn run_report_header() -> String {
    format!(
        "{:>7} | {:^24} | {:^24} | {:>8} | {}",
        "workers", "sequential", "parallel", "speed-up", "correct"
    )
}

/// Printable view of a key pair
pub struct KeySummary<'a>(pub &'a RsaKeyPair);

impl KeySummary<'_> {
    /// Hex of the leading bytes of n
    pub fn fingerprint(&self) -> String {
        let bytes = to_bytes(self.0.public_key().n());
        hex::encode(&bytes[..bytes.len().min(FINGERPRINT_BYTES)])
    }
}

impl fmt::Display for KeySummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let public_key = self.0.public_key();
        let private_key = self.0.private_key();
        writeln!(f, "Public key  (e, n): {}, {}", public_key.e(), public_key.n())?;
        writeln!(f, "Private key (d, n): {}, {}", private_key.d(), private_key.n())?;
        write!(
            f,
            "Modulus: {} bits, fingerprint {}",
            self.0.bit_length(),
            self.fingerprint()
        )
    }
}

/// Per-message table of a round-trip run
pub struct RoundTripTable<'a>(pub &'a [RoundTrip]);

impl fmt::Display for RoundTripTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<12}{:<12}{:<12}{}", "source", "encrypted", "decrypted", "ok")?;
        writeln!(f, "{}", "=".repeat(42))?;
        for trip in self.0 {
            writeln!(
                f,
                "{:<12}{:<12}{:<12}{}",
                trip.source.to_string(),
                trip.encrypted.to_string(),
                trip.decrypted.to_string(),
                if trip.is_ok() { "yes" } else { "NO" }
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchProcessor;
    use crate::rsa::bigint::from_u64;
    use crate::rsa::generate_keypair;

    fn result(correct_count: usize, total: usize, elapsed_millis: f64) -> BatchResult {
        BatchResult {
            correct_count,
            total,
            elapsed_millis,
        }
    }

    #[test]
    fn test_speedup() {
        let report = RunReport::new(4, result(10, 10, 8.0), result(10, 10, 2.0));
        assert_eq!(report.speedup(), 4.0);
        assert!(report.is_correct());
    }

    #[test]
    fn test_speedup_zero_parallel_time() {
        let report = RunReport::new(4, result(0, 0, 1.5), result(0, 0, 0.0));
        assert_eq!(report.speedup(), 0.0);
    }

    #[test]
    fn test_incorrect_run() {
        let report = RunReport::new(2, result(10, 10, 1.0), result(9, 10, 1.0));
        assert!(!report.is_correct());
        assert!(report.to_string().ends_with("NO"));
    }

    #[test]
    fn test_key_summary() {
        let keys = generate_keypair(&from_u64(29), &from_u64(19), &from_u64(47)).unwrap();
        let summary = KeySummary(&keys);
        let text = summary.to_string();
        assert!(text.contains("Public key  (e, n): 47, 551"));
        assert!(text.contains("Private key (d, n): 311, 551"));
        assert!(text.contains("10 bits"));
        // 551 = 0x0227
        assert_eq!(summary.fingerprint(), "0227");
    }

    #[test]
    fn test_round_trip_table() {
        let keys = generate_keypair(&from_u64(29), &from_u64(19), &from_u64(47)).unwrap();
        let trips = BatchProcessor::new(&keys)
            .round_trips(&[from_u64(19), from_u64(13)], 2)
            .unwrap();
        let table = RoundTripTable(&trips).to_string();
        assert_eq!(table.lines().count(), 4);
        assert!(table.lines().nth(2).unwrap().starts_with("19"));
    }
}
