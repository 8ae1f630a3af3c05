// Benchmark Configuration
// Key size, worker counts and message sources for one program run

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::rsa::keygen::MIN_MODULUS_BITS;
use crate::rsa::DEFAULT_ROUNDS;

/// Environment variable consulted for a seed when `--seed` is not given
pub const SEED_ENV_VAR: &str = "RSA_BATCH_SEED";

/// Configuration for a benchmark run
#[derive(Clone, Debug, PartialEq)]
pub struct BenchConfig {
    pub key_bits: u32,
    pub worker_counts: Vec<usize>,
    pub message_count: usize,
    pub rounds: u32,
    pub seed: Option<u64>,
    pub message_files: Vec<PathBuf>,
    pub demo: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            key_bits: 1024,
            worker_counts: vec![2, 4, 8],
            message_count: 200,
            rounds: DEFAULT_ROUNDS,
            seed: None,
            message_files: Vec::new(),
            demo: false,
        }
    }
}

impl BenchConfig {
    pub fn with_key_bits(mut self, bits: u32) -> Self {
        self.key_bits = bits;
        self
    }

    pub fn with_worker_counts(mut self, workers: Vec<usize>) -> Self {
        self.worker_counts = workers;
        self
    }

    pub fn with_message_count(mut self, count: usize) -> Self {
        self.message_count = count;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_message_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.message_files.push(path.into());
        self
    }

    /// Build a configuration from command line arguments (program name
    /// already stripped), falling back to [`SEED_ENV_VAR`] for the seed.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bits" => config.key_bits = parse_value(&mut args, "--bits")?,
                "--messages" => config.message_count = parse_value(&mut args, "--messages")?,
                "--rounds" => config.rounds = parse_value(&mut args, "--rounds")?,
                "--seed" => config.seed = Some(parse_value(&mut args, "--seed")?),
                "--workers" => {
                    let list: String = parse_value(&mut args, "--workers")?;
                    config.worker_counts = parse_worker_list(&list)?;
                }
                "--demo" => config.demo = true,
                flag if flag.starts_with("--") => bail!("unknown option {}", flag),
                path => config.message_files.push(PathBuf::from(path)),
            }
        }

        if config.seed.is_none() {
            if let Ok(value) = env::var(SEED_ENV_VAR) {
                let seed = value
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid {} value {:?}", SEED_ENV_VAR, value))?;
                config.seed = Some(seed);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.key_bits < MIN_MODULUS_BITS || self.key_bits % 2 != 0 {
            bail!(
                "key size must be an even number of bits, at least {} (got {})",
                MIN_MODULUS_BITS,
                self.key_bits
            );
        }
        if self.worker_counts.is_empty() {
            bail!("at least one worker count is required");
        }
        if self.worker_counts.contains(&0) {
            bail!("worker counts must be at least 1");
        }
        Ok(())
    }
}

fn parse_value<T, I>(args: &mut I, flag: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    I: Iterator<Item = String>,
{
    let value = args
        .next()
        .with_context(|| format!("{} requires a value", flag))?;
    value
        .parse()
        .with_context(|| format!("invalid value {:?} for {}", value, flag))
}

fn parse_worker_list(list: &str) -> Result<Vec<usize>> {
    list.split(',')
        .map(|item| {
            item.trim()
                .parse::<usize>()
                .with_context(|| format!("invalid worker count {:?} for --workers", item))
        })
        .collect()
}
