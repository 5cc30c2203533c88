//! Cryptographically secure random number generation.

use num_bigint::BigUint;
use num_traits::One;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::primitives::crypto::field::byte_width;
use crate::{Error, Result};

/// Draws allowed before a source is treated as broken.
///
/// Each masked draw lands in range with probability at least one half.
const MAX_SAMPLING_DRAWS: usize = 128;

/// Cryptographically secure random number generator.
///
/// This is a thin wrapper around `OsRng` and the default source for keys and nonces.
/// Every randomized operation is generic over `RngCore + CryptoRng`, so a seeded
/// generator can be swapped in for reproducible tests.
pub struct SecureRng(OsRng);

impl SecureRng {
    /// Creates a new cryptographically secure random number generator.
    pub fn new() -> Self {
        Self(OsRng)
    }
}

impl Default for SecureRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}

/// Draws a scalar uniformly from the inclusive range `[low, high]`.
///
/// # Errors
///
/// Returns [`Error::InsufficientEntropy`] if the source fails to produce bytes or
/// never yields an in-range sample, and [`Error::Arithmetic`] for an empty range.
pub fn random_scalar<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    low: &BigUint,
    high: &BigUint,
) -> Result<BigUint> {
    if low > high {
        return Err(Error::Arithmetic(format!(
            "empty sampling range [{low}, {high}]"
        )));
    }

    let span = high - low + BigUint::one();
    let bits = span.bits();
    let width = byte_width(&span);
    let excess = (width as u64 * 8).saturating_sub(bits) as u32;
    let mask = 0xffu8.checked_shr(excess).unwrap_or(0);

    let mut buf = vec![0u8; width];
    for _ in 0..MAX_SAMPLING_DRAWS {
        rng.try_fill_bytes(&mut buf).map_err(|e| {
            tracing::warn!("random source failure: {e}");
            Error::InsufficientEntropy(e.to_string())
        })?;
        buf[0] &= mask;

        let candidate = BigUint::from_bytes_be(&buf);
        if candidate < span {
            return Ok(low + candidate);
        }
    }

    tracing::warn!(draws = MAX_SAMPLING_DRAWS, "random source produced no in-range sample");
    Err(Error::InsufficientEntropy(format!(
        "no in-range sample after {MAX_SAMPLING_DRAWS} draws"
    )))
}
