//! Key pairs.

use std::fmt;
use std::hint::black_box;

use num_bigint::BigUint;
use num_traits::One;
use rand::{CryptoRng, RngCore};

use crate::primitives::crypto::rng::random_scalar;
use crate::{DomainParameters, Error, Point, Result};

/// Private signing and decryption key `d` in `[1, n-2]`.
///
/// `Debug` output is redacted so keys never end up in logs. The scalar's digits are
/// overwritten with zeros when the key is dropped; temporaries derived from it in
/// arithmetic are not.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(BigUint);

impl PrivateKey {
    /// Wraps a scalar after checking it lies in `[1, n-2]`.
    ///
    /// The upper bound keeps `1 + d` invertible modulo `n`.
    pub fn new(params: &DomainParameters, d: BigUint) -> Result<Self> {
        let upper = params.n() - BigUint::from(2u32);
        if d < BigUint::one() || d > upper {
            return Err(Error::InvalidKey(
                "private key must lie in [1, n-2]".to_string(),
            ));
        }
        Ok(Self(d))
    }

    /// Returns the secret scalar.
    pub fn scalar(&self) -> &BigUint {
        &self.0
    }

    /// Derives the public key `d * G`.
    pub fn public_key(&self, params: &DomainParameters) -> Point {
        params.scalar_multiply(&self.0, params.generator())
    }
}

impl PrivateKey {
    fn wipe(&mut self) {
        let words = self.0.bits().div_ceil(32) as usize;
        self.0.assign_from_slice(&vec![0u32; words]);
        black_box(&self.0);
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.wipe();
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Private key with its matching public point.
#[derive(Clone, Debug)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: Point,
}

impl KeyPair {
    /// Generates a key pair with `d` drawn uniformly from `[1, n-2]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientEntropy`] if the random source fails.
    pub fn generate<R: RngCore + CryptoRng>(
        params: &DomainParameters,
        rng: &mut R,
    ) -> Result<Self> {
        let upper = params.n() - BigUint::from(2u32);
        let d = random_scalar(rng, &BigUint::one(), &upper)?;
        Self::from_private_key(params, d)
    }

    /// Rebuilds a key pair from a known private scalar.
    pub fn from_private_key(params: &DomainParameters, d: BigUint) -> Result<Self> {
        let private_key = PrivateKey::new(params, d)?;
        let public_key = private_key.public_key(params);
        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// Returns the private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Returns the public key `d * G`.
    pub fn public_key(&self) -> &Point {
        &self.public_key
    }
}

/// Checks that a public key is a finite point on the curve.
pub fn validate_public_key(params: &DomainParameters, public_key: &Point) -> Result<()> {
    if public_key.is_identity() {
        return Err(Error::InvalidKey(
            "public key cannot be the identity".to_string(),
        ));
    }
    if !params.is_on_curve(public_key) {
        return Err(Error::PointNotOnCurve);
    }
    Ok(())
}
