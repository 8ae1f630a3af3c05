// RSA Big Integer Operations
// Modular arithmetic on top of num-bigint: extended Euclid, inverses, exponentiation

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use super::error::{RsaError, RsaResult};

/// RSA Big Integer type alias
pub type RsaBigInt = BigInt;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Convert a non-negative big integer to bytes (big-endian)
pub fn to_bytes(n: &RsaBigInt) -> Vec<u8> {
    n.to_bytes_be().1
}

/// Extended Euclidean Algorithm, iterative form.
///
/// Returns `(gcd, x, y)` such that `a*x + b*y = gcd(a, b)`. The coefficient
/// pairs of the current `a` and `b` are carried along while `(a, b)` is
/// replaced by `(b, a mod b)`, so stack use is constant whatever the operand
/// size.
pub fn extended_euclid(a: &RsaBigInt, b: &RsaBigInt) -> (RsaBigInt, RsaBigInt, RsaBigInt) {
    if b.is_zero() {
        return (a.clone(), RsaBigInt::one(), RsaBigInt::zero());
    }

    let mut a = a.clone();
    let mut b = b.clone();

    // a = a_x*A + a_y*B, b = b_x*A + b_y*B
    let (mut a_x, mut a_y) = (RsaBigInt::one(), RsaBigInt::zero());
    let (mut b_x, mut b_y) = (RsaBigInt::zero(), RsaBigInt::one());

    loop {
        let (quotient, remainder) = a.div_rem(&b);
        if remainder.is_zero() {
            return (b, b_x, b_y);
        }

        let r_x = &a_x - &quotient * &b_x;
        let r_y = &a_y - &quotient * &b_y;

        a_x = std::mem::replace(&mut b_x, r_x);
        a_y = std::mem::replace(&mut b_y, r_y);
        a = std::mem::replace(&mut b, remainder);
    }
}

/// Compute modular inverse: x^(-1) mod m, in `[0, m)`
///
/// Fails with [`RsaError::NoInverse`] when `gcd(x, m) != 1`.
pub fn mod_inverse(x: &RsaBigInt, m: &RsaBigInt) -> RsaResult<RsaBigInt> {
    if !m.is_positive() {
        return Err(RsaError::NoInverse {
            value: x.clone(),
            modulus: m.clone(),
        });
    }

    let (gcd, _, y) = extended_euclid(m, &x.mod_floor(m));
    if !gcd.is_one() {
        return Err(RsaError::NoInverse {
            value: x.clone(),
            modulus: m.clone(),
        });
    }

    let mut y = y;
    while y.is_negative() {
        y += m;
    }

    Ok(y % m)
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply algorithm
///
/// # Panics
///
/// If `exp` is negative or `modulus` is not positive.
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    assert!(!exp.is_negative(), "mod_pow: negative exponent");
    assert!(modulus.is_positive(), "mod_pow: modulus must be positive");

    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base.mod_floor(modulus);
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1u32;
    }

    result
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Whether a and b share no factor other than 1
pub fn is_coprime(a: &RsaBigInt, b: &RsaBigInt) -> bool {
    gcd(a, b).is_one()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        let base = from_u64(3);
        let exp = from_u64(5);
        let modulus = from_u64(7);
        let result = mod_pow(&base, &exp, &modulus);
        assert_eq!(result, from_u64(5));
    }

    #[test]
    fn test_mod_pow_zero_exponent() {
        for m in 2..50u64 {
            for a in 0..20u64 {
                assert!(mod_pow(&from_u64(a), &RsaBigInt::zero(), &from_u64(m)).is_one());
            }
        }
    }

    #[test]
    fn test_mod_pow_result_below_modulus() {
        let modulus = from_u64(551);
        for b in 0..200u64 {
            let r = mod_pow(&from_u64(1_000_003), &from_u64(b), &modulus);
            assert!(r < modulus);
            assert!(!r.is_negative());
        }
    }

    #[test]
    fn test_mod_pow_negative_base() {
        // (-2)^3 mod 7 = -8 mod 7 = 6
        let r = mod_pow(&RsaBigInt::from(-2), &from_u64(3), &from_u64(7));
        assert_eq!(r, from_u64(6));
    }

    #[test]
    #[should_panic(expected = "negative exponent")]
    fn test_mod_pow_rejects_negative_exponent() {
        mod_pow(&from_u64(3), &RsaBigInt::from(-1), &from_u64(7));
    }

    #[test]
    #[should_panic(expected = "modulus must be positive")]
    fn test_mod_pow_rejects_zero_modulus() {
        mod_pow(&from_u64(3), &from_u64(2), &RsaBigInt::zero());
    }

    #[test]
    fn test_extended_euclid() {
        let a = from_u64(504);
        let b = from_u64(47);
        let (g, x, y) = extended_euclid(&a, &b);
        assert!(g.is_one());
        assert_eq!(&a * &x + &b * &y, g);

        let (g, x, y) = extended_euclid(&from_u64(240), &from_u64(46));
        assert_eq!(g, from_u64(2));
        assert_eq!(from_u64(240) * x + from_u64(46) * y, g);
    }

    #[test]
    fn test_extended_euclid_zero() {
        let (g, x, y) = extended_euclid(&from_u64(12), &RsaBigInt::zero());
        assert_eq!(g, from_u64(12));
        assert!(x.is_one());
        assert!(y.is_zero());
    }

    #[test]
    fn test_extended_euclid_large_operands() {
        // Consecutive Fibonacci numbers are the worst case for the step count
        let (mut f0, mut f1) = (RsaBigInt::zero(), RsaBigInt::one());
        for _ in 0..3000 {
            let next = &f0 + &f1;
            f0 = std::mem::replace(&mut f1, next);
        }
        let (g, x, y) = extended_euclid(&f1, &f0);
        assert!(g.is_one());
        assert_eq!(&f1 * x + &f0 * y, g);
    }

    #[test]
    fn test_mod_inverse() {
        // 3 * 5 = 15 ≡ 1 mod 7, so inverse of 3 mod 7 is 5
        let a = from_u64(3);
        let m = from_u64(7);
        let inv = mod_inverse(&a, &m).unwrap();
        assert_eq!(inv, from_u64(5));

        // Verify: 3 * 5 = 15 ≡ 1 (mod 7)
        assert_eq!((a * inv) % m, from_u64(1));
    }

    #[test]
    fn test_mod_inverse_range() {
        let m = from_u64(504);
        for x in 1..504u64 {
            let x = from_u64(x);
            match mod_inverse(&x, &m) {
                Ok(inv) => {
                    assert!(!inv.is_negative() && inv < m);
                    assert!(((&x * &inv) % &m).is_one());
                }
                Err(err) => {
                    assert!(!is_coprime(&x, &m));
                    assert!(matches!(err, RsaError::NoInverse { .. }));
                }
            }
        }
    }

    #[test]
    fn test_mod_inverse_not_coprime() {
        let result = mod_inverse(&from_u64(6), &from_u64(9));
        assert!(matches!(result, Err(RsaError::NoInverse { .. })));
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(&from_u64(3), &from_u64(120)), from_u64(3));
        assert!(is_coprime(&from_u64(17), &from_u64(120)));
    }
}
