// Primality Testing
// Miller-Rabin probabilistic test driven by a shared RandomSource

use num_integer::Integer;
use num_traits::{One, ToPrimitive};

use super::bigint::{mod_pow, RsaBigInt};
use super::random::RandomSource;

/// Rounds used when the caller has no preference; false positives ≤ 4^-25
pub const DEFAULT_ROUNDS: u32 = 25;

/// Odd primes below 100, used to weed out candidates before Miller-Rabin
const SMALL_PRIMES: [u32; 24] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Miller-Rabin primality test
/// Returns true if n is probably prime
///
/// Values below 2 and even values other than 2 are rejected without touching
/// the generator. A composite survives `rounds` random bases with
/// probability at most `4^-rounds`.
pub fn is_prime(n: &RsaBigInt, rounds: u32, rng: &RandomSource) -> bool {
    let two = RsaBigInt::from(2u8);
    if n < &two {
        return false;
    }
    if n == &two || n == &RsaBigInt::from(3u8) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    if let Some(verdict) = trial_division(n) {
        return verdict;
    }

    miller_rabin(n, rounds.max(1), rng)
}

/// Definite answer for n divisible by a small prime, None otherwise
fn trial_division(n: &RsaBigInt) -> Option<bool> {
    if let Some(small) = n.to_u32() {
        if SMALL_PRIMES.contains(&small) {
            return Some(true);
        }
    }

    for p in SMALL_PRIMES {
        if (n % p).to_u32() == Some(0) {
            return Some(false);
        }
    }

    None
}

fn miller_rabin(n: &RsaBigInt, rounds: u32, rng: &RandomSource) -> bool {
    let one = RsaBigInt::one();
    let two = RsaBigInt::from(2u8);
    let n_minus_one = n - 1u8;

    // Write n-1 as d * 2^s with d odd
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1u32;
        s += 1;
    }

    'witness: for _ in 0..rounds {
        // Random witness a in [2, n-2]
        let a = rng.bigint_range(&two, &n_minus_one);

        let mut x = mod_pow(&a, &d, n);
        if x == one || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
            if x == one {
                return false;
            }
        }

        // Composite
        return false;
    }

    // Probably prime
    true
}
