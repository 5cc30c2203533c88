use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use super::{KeyPair, Sm2Config};
use crate::{DomainParameters, Point, Result};

/// Domain parameters bound to a validated configuration.
///
/// Every scheme operation runs through an `Sm2` value. It holds no mutable state, so
/// one instance can be shared across threads.
///
/// # Examples
///
/// ```rust
/// use sm2_lab::{SecureRng, Sm2};
///
/// let sm2 = Sm2::default();
/// let mut rng = SecureRng::new();
/// let keys = sm2.generate_key_pair(&mut rng).unwrap();
///
/// let signature = sm2.sign(&mut rng, b"hello", keys.private_key()).unwrap();
/// assert!(sm2.verify(b"hello", &signature, keys.public_key()));
/// ```
#[derive(Clone, Debug)]
pub struct Sm2 {
    params: DomainParameters,
    config: Sm2Config,
}

impl Sm2 {
    /// Binds `params` to `config` after validating the configuration.
    pub fn new(params: DomainParameters, config: Sm2Config) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            curve = params.name(),
            hash = %config.hash,
            max_retries = config.max_retries,
            "sm2 context ready"
        );
        Ok(Self { params, config })
    }

    /// Returns the domain parameters.
    pub fn params(&self) -> &DomainParameters {
        &self.params
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Sm2Config {
        &self.config
    }

    /// Generates a key pair on this context's curve.
    pub fn generate_key_pair<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<KeyPair> {
        KeyPair::generate(&self.params, rng)
    }

    /// `k * P` with the configured multiplication algorithm.
    pub(crate) fn multiply(&self, k: &BigUint, point: &Point) -> Point {
        self.params
            .scalar_multiply_with(self.config.multiplication, k, point)
    }

    /// `k * G` with the configured multiplication algorithm.
    pub(crate) fn multiply_base(&self, k: &BigUint) -> Point {
        self.multiply(k, self.params.generator())
    }
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            params: DomainParameters::sm2(),
            config: Sm2Config::default(),
        }
    }
}
