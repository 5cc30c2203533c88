use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::{Error, Result};

/// Bases used by the Miller-Rabin check on curve moduli.
///
/// Deterministic for candidates below 3.3 * 10^24; a strong probable-prime test beyond.
const WITNESS_BASES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Computes the unique `x` in `[0, modulus)` with `k * x = 1 (mod modulus)`.
///
/// Uses the iterative extended Euclidean algorithm, so stack usage does not depend
/// on operand size.
///
/// # Errors
///
/// Returns [`Error::Arithmetic`] if `k = 0 (mod modulus)` or `gcd(k, modulus) != 1`.
pub fn mod_inverse(k: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus <= &BigUint::one() {
        return Err(Error::Arithmetic(
            "modulus must be greater than one".to_string(),
        ));
    }

    let k = k % modulus;
    if k.is_zero() {
        return Err(Error::Arithmetic(
            "zero has no modular inverse".to_string(),
        ));
    }

    let m = BigInt::from(modulus.clone());
    let (mut old_r, mut r) = (BigInt::from(k), m.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return Err(Error::Arithmetic(format!(
            "no inverse exists, gcd is {old_r}"
        )));
    }

    let reduced = ((old_s % &m) + &m) % &m;
    reduced
        .to_biguint()
        .ok_or_else(|| Error::Arithmetic("inverse reduced to a negative value".to_string()))
}

/// Computes `(a - b) mod modulus` without leaving unsigned arithmetic.
pub fn mod_sub(a: &BigUint, b: &BigUint, modulus: &BigUint) -> BigUint {
    let a = a % modulus;
    let b = b % modulus;
    if a >= b {
        a - b
    } else {
        modulus - (b - a)
    }
}

/// Number of bytes needed to hold any value below `modulus`.
pub fn byte_width(modulus: &BigUint) -> usize {
    modulus.bits().div_ceil(8) as usize
}

/// Big-endian encoding of `value`, left-padded with zeros to `width` bytes.
///
/// Values wider than `width` are returned unpadded.
pub fn to_fixed_bytes(value: &BigUint, width: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    let mut out = vec![0u8; width.saturating_sub(bytes.len())];
    out.extend_from_slice(&bytes);
    out
}

/// Miller-Rabin probable-prime test with fixed small bases.
pub fn is_probable_prime(candidate: &BigUint) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    if candidate < &two {
        return false;
    }

    for &base in &WITNESS_BASES {
        let base = BigUint::from(base);
        if candidate == &base {
            return true;
        }
        if (candidate % &base).is_zero() {
            return false;
        }
    }

    let n_minus_one = candidate - &one;
    let shift = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> shift;

    'witness: for &base in &WITNESS_BASES {
        let mut x = BigUint::from(base).modpow(&d, candidate);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..shift {
            x = (&x * &x) % candidate;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn inverse_of_small_values() {
        assert_eq!(mod_inverse(&big(3), &big(11)).unwrap(), big(4));
        assert_eq!(mod_inverse(&big(2), &big(17)).unwrap(), big(9));
        assert_eq!(mod_inverse(&big(1), &big(19)).unwrap(), big(1));
    }

    #[test]
    fn inverse_reduces_operand_first() {
        assert_eq!(mod_inverse(&big(14), &big(11)).unwrap(), big(4));
    }

    #[test]
    fn inverse_of_zero_fails() {
        assert!(matches!(
            mod_inverse(&big(0), &big(17)),
            Err(Error::Arithmetic(_))
        ));
        assert!(matches!(
            mod_inverse(&big(34), &big(17)),
            Err(Error::Arithmetic(_))
        ));
    }

    #[test]
    fn inverse_fails_without_coprimality() {
        assert!(matches!(
            mod_inverse(&big(6), &big(9)),
            Err(Error::Arithmetic(_))
        ));
    }

    #[test]
    fn inverse_of_large_operand() {
        let n = BigUint::parse_bytes(
            b"FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFF7203DF6B21C6052B53BBF40939D54123",
            16,
        )
        .unwrap();
        let k = BigUint::parse_bytes(b"123456789abcdef0fedcba9876543210", 16).unwrap();
        let inv = mod_inverse(&k, &n).unwrap();
        assert!(inv < n);
        assert_eq!((k * inv) % n, BigUint::one());
    }

    #[test]
    fn subtraction_wraps() {
        assert_eq!(mod_sub(&big(3), &big(5), &big(17)), big(15));
        assert_eq!(mod_sub(&big(5), &big(3), &big(17)), big(2));
        assert_eq!(mod_sub(&big(20), &big(3), &big(17)), big(0));
    }

    #[test]
    fn fixed_width_encoding() {
        assert_eq!(to_fixed_bytes(&big(0x0102), 4), vec![0, 0, 1, 2]);
        assert_eq!(to_fixed_bytes(&big(0), 2), vec![0, 0]);
        assert_eq!(byte_width(&big(17)), 1);
        assert_eq!(byte_width(&big(256)), 2);
    }

    #[test]
    fn primality() {
        assert!(is_probable_prime(&big(17)));
        assert!(is_probable_prime(&big(19)));
        assert!(is_probable_prime(&big(1_000_000_007)));
        assert!(!is_probable_prime(&big(1)));
        assert!(!is_probable_prime(&big(561)));
        assert!(!is_probable_prime(&big(1_000_000_007 * 3)));
    }
}
