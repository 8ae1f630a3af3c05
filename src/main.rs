use std::{env, process};

use rsa_batch::config::BenchConfig;
use rsa_batch::ui::app;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = BenchConfig::from_args(env::args().skip(1)).and_then(|config| app::run(&config));
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
