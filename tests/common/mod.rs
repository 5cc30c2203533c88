//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use num_bigint::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sm2_lab::DomainParameters;

/// Initialize test tracing (call once at the beginning of tests).
///
/// Shows library logs at DEBUG level through the test writer.
/// Subsequent calls are safe and will be ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("sm2_lab=debug");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// The curve `y^2 = x^3 + 2x + 2 (mod 17)` with base point `(5, 1)` of order 19.
pub fn toy_params() -> DomainParameters {
    DomainParameters::new(
        "toy",
        BigUint::from(17u32),
        BigUint::from(2u32),
        BigUint::from(2u32),
        BigUint::from(19u32),
        BigUint::from(5u32),
        BigUint::from(1u32),
    )
    .expect("toy curve parameters are valid")
}

/// Deterministic generator for reproducible tests.
pub fn seeded_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}
