// Console application
// Generates a key pair, runs every batch sequentially and in parallel, prints reports

use anyhow::{Context, Result};
use log::{info, warn};

use crate::batch::BatchProcessor;
use crate::config::BenchConfig;
use crate::rsa::bigint::from_u64;
use crate::rsa::{generate_keypair, KeyGenerator, RandomSource, RsaBigInt, RsaKeyPair};
use crate::util::file_ops::{generate_messages, load_messages};

use super::report::{run_report_header, KeySummary, RoundTripTable, RunReport};

/// Fixed key and messages of the textbook demonstration
const DEMO_P: u64 = 29;
const DEMO_Q: u64 = 19;
const DEMO_E: u64 = 47;
const DEMO_MESSAGES: [u64; 10] = [19, 13, 30, 350, 500, 19, 13, 30, 350, 500];

/// A named batch of messages ready to be processed
struct Batch {
    label: String,
    messages: Vec<RsaBigInt>,
}

pub fn run(config: &BenchConfig) -> Result<()> {
    config.validate()?;

    if config.demo {
        return run_demo();
    }

    let rng = match config.seed {
        Some(seed) => {
            info!("using seed {}", seed);
            RandomSource::seeded(seed)
        }
        None => RandomSource::from_entropy(),
    };
    let generator = KeyGenerator::new(rng).with_rounds(config.rounds);

    println!("=== RSA batch benchmark ===");
    println!("Generating {}-bit key pair...", config.key_bits);
    let keys = generator
        .generate(config.key_bits)
        .with_context(|| format!("generating a {}-bit key pair", config.key_bits))?;
    println!("{}", KeySummary(&keys));
    println!();

    let batches = collect_batches(config, &keys, generator.rng());
    for batch in &batches {
        run_batch(&keys, batch, &config.worker_counts)?;
    }

    Ok(())
}

/// Textbook key (p = 29, q = 19, e = 47) over a fixed message list
pub fn run_demo() -> Result<()> {
    let keys = generate_keypair(&from_u64(DEMO_P), &from_u64(DEMO_Q), &from_u64(DEMO_E))
        .context("building the demonstration key pair")?;
    let messages: Vec<RsaBigInt> = DEMO_MESSAGES
        .iter()
        .map(|&m| from_u64(m) % keys.public_key().n())
        .collect();

    println!("=== RSA demonstration ===");
    println!("{}", KeySummary(&keys));
    println!();

    let trips = BatchProcessor::new(&keys).round_trips(&messages, DEMO_MESSAGES.len())?;
    print!("{}", RoundTripTable(&trips));

    if trips.iter().all(|trip| trip.is_ok()) {
        println!("\nAll messages round-tripped correctly.");
    } else {
        println!("\nSome messages did not round-trip.");
    }
    Ok(())
}

/// Synthetic batch first, then every message file that loads
fn collect_batches(config: &BenchConfig, keys: &RsaKeyPair, rng: &RandomSource) -> Vec<Batch> {
    let modulus = keys.public_key().n();
    let mut batches = Vec::with_capacity(config.message_files.len() + 1);

    if config.message_count > 0 {
        batches.push(Batch {
            label: format!("{} synthetic messages", config.message_count),
            messages: generate_messages(config.message_count, modulus, rng),
        });
    }

    for path in &config.message_files {
        match load_messages(path, modulus) {
            Ok(messages) => batches.push(Batch {
                label: path.display().to_string(),
                messages,
            }),
            Err(err) => warn!("skipping {}: {}", path.display(), err),
        }
    }

    batches
}

fn run_batch(keys: &RsaKeyPair, batch: &Batch, worker_counts: &[usize]) -> Result<()> {
    println!("--- {} ---", batch.label);
    if batch.messages.is_empty() {
        println!("nothing to process");
        println!();
        return Ok(());
    }

    let processor = BatchProcessor::new(keys);
    println!("{}", run_report_header());
    for &workers in worker_counts {
        let sequential = processor.run_sequential(&batch.messages);
        let parallel = processor
            .run_parallel(&batch.messages, workers)
            .with_context(|| format!("parallel run with {} workers", workers))?;
        println!("{}", RunReport::new(workers, sequential, parallel));
    }
    println!();

    Ok(())
}
