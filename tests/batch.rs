//! End-to-end checks of key generation, message loading and batch runs.

use num_traits::Zero;
use rsa_batch::batch::BatchProcessor;
use rsa_batch::rsa::bigint::from_u64;
use rsa_batch::rsa::{
    decode, encode, generate_keypair, mod_inverse, KeyGenerator, RandomSource, RsaBigInt,
};
use rsa_batch::ui::RunReport;
use rsa_batch::util::{generate_messages, parse_messages};

#[test]
fn textbook_example() {
    let (p, q, e) = (from_u64(29), from_u64(19), from_u64(47));
    let keys = generate_keypair(&p, &q, &e).unwrap();

    assert_eq!(keys.public_key().n(), &from_u64(551));
    let phi = from_u64(504);
    assert_eq!(keys.private_key().d(), &mod_inverse(&e, &phi).unwrap());

    let cipher = encode(&from_u64(19), keys.public_key());
    assert_eq!(decode(&cipher, keys.private_key()), from_u64(19));
}

#[test]
fn sequential_and_parallel_runs_agree() {
    let generator = KeyGenerator::new(RandomSource::seeded(2718));
    let keys = generator.generate(512).unwrap();
    let messages = generate_messages(48, keys.public_key().n(), generator.rng());

    let processor = BatchProcessor::new(&keys);
    let sequential = processor.run_sequential(&messages);
    assert_eq!(sequential.correct_count, messages.len());

    for workers in [1, 4, 8] {
        let parallel = processor.run_parallel(&messages, workers).unwrap();
        assert_eq!(parallel.correct_count, sequential.correct_count);

        let report = RunReport::new(workers, sequential, parallel);
        assert!(report.is_correct());
        assert!(report.speedup() >= 0.0);
    }
}

#[test]
fn loaded_messages_are_never_zero() {
    let keys = generate_keypair(&from_u64(29), &from_u64(19), &from_u64(47)).unwrap();
    let n = keys.public_key().n();
    let messages = parse_messages("6 0 551 1102 19 600 -551", n).unwrap();

    assert_eq!(
        messages,
        vec![from_u64(1), from_u64(1), from_u64(1), from_u64(19), from_u64(49), from_u64(1)]
    );
    assert!(messages.iter().all(|m| !m.is_zero() && m < n));

    let result = BatchProcessor::new(&keys).run_parallel(&messages, 4).unwrap();
    assert!(result.all_correct());
}

#[test]
fn seeded_generation_is_reproducible() {
    let a = KeyGenerator::new(RandomSource::seeded(1)).generate(256).unwrap();
    let b = KeyGenerator::new(RandomSource::seeded(1)).generate(256).unwrap();
    assert_eq!(a.public_key(), b.public_key());
    assert_eq!(a.private_key(), b.private_key());

    let message: RsaBigInt = from_u64(42);
    assert_eq!(encode(&message, a.public_key()), encode(&message, b.public_key()));
}
