use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use super::keys::validate_public_key;
use super::{PrivateKey, Sm2};
use crate::primitives::crypto::field::{mod_inverse, mod_sub, to_fixed_bytes};
use crate::primitives::crypto::rng::random_scalar;
use crate::{DomainParameters, Error, Point, Result};

/// Signature `(r, s)` with both components in `[1, n-1]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {
    /// Creates a signature after checking both components lie in `[1, n-1]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignatureFormat`] if either component is out of range.
    pub fn new(params: &DomainParameters, r: BigUint, s: BigUint) -> Result<Self> {
        let sig = Self { r, s };
        sig.validate(params)?;
        Ok(sig)
    }

    /// Checks both components lie in `[1, n-1]`.
    pub fn validate(&self, params: &DomainParameters) -> Result<()> {
        if !self.in_range(params.n()) {
            return Err(Error::InvalidSignatureFormat(
                "r and s must lie in [1, n-1]".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn from_parts(r: BigUint, s: BigUint) -> Self {
        Self { r, s }
    }

    /// Returns `r`.
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// Returns `s`.
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Encodes the signature as `r || s`, each padded to the scalar width.
    pub fn to_bytes(&self, params: &DomainParameters) -> Vec<u8> {
        let width = params.scalar_bytes();
        let mut out = to_fixed_bytes(&self.r, width);
        out.extend_from_slice(&to_fixed_bytes(&self.s, width));
        out
    }

    /// Decodes `r || s` and validates both components.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignatureFormat`] for a wrong length or an
    /// out-of-range component.
    pub fn from_bytes(params: &DomainParameters, bytes: &[u8]) -> Result<Self> {
        let width = params.scalar_bytes();
        if bytes.len() != 2 * width {
            return Err(Error::InvalidSignatureFormat(format!(
                "expected {} bytes, got {}",
                2 * width,
                bytes.len()
            )));
        }
        let (r, s) = bytes.split_at(width);
        Self::new(
            params,
            BigUint::from_bytes_be(r),
            BigUint::from_bytes_be(s),
        )
    }

    fn in_range(&self, n: &BigUint) -> bool {
        !self.r.is_zero() && &self.r < n && !self.s.is_zero() && &self.s < n
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:x}, {:x})", self.r, self.s)
    }
}

impl Sm2 {
    /// Computes `e = H(Z || message)` as an unreduced integer.
    ///
    /// Reduction modulo `n` happens in the arithmetic that consumes `e`.
    pub fn digest(&self, user_id: &[u8], message: &[u8]) -> BigUint {
        BigUint::from_bytes_be(&self.config().hash.digest(&[user_id, message]))
    }

    /// Signs `message` under the configured default user identity.
    pub fn sign<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &[u8],
        key: &PrivateKey,
    ) -> Result<Signature> {
        self.sign_with_user_id(rng, message, &self.config().user_id, key)
    }

    /// Signs `message` under an explicit user identity.
    ///
    /// Nonces are drawn from `[1, n-1]` and rejected when `r = 0`, `r + k = n` or
    /// `s = 0`. At most `max_retries` nonces are tried.
    ///
    /// # Errors
    ///
    /// - [`Error::RetryExhausted`] if every nonce in the budget was rejected
    /// - [`Error::InsufficientEntropy`] if the random source fails
    pub fn sign_with_user_id<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &[u8],
        user_id: &[u8],
        key: &PrivateKey,
    ) -> Result<Signature> {
        let e = self.digest(user_id, message);
        let upper = self.params().n() - BigUint::one();
        let max_retries = self.config().max_retries;

        for attempt in 1..=max_retries {
            let k = random_scalar(rng, &BigUint::one(), &upper)?;
            match self.sign_digest(&e, key, &k)? {
                Some(signature) => {
                    tracing::debug!(attempt, "signature produced");
                    return Ok(signature);
                }
                None => tracing::trace!(attempt, "nonce rejected"),
            }
        }

        tracing::warn!(attempts = max_retries, "signing retry budget exhausted");
        Err(Error::RetryExhausted {
            operation: "sign",
            attempts: max_retries,
        })
    }

    /// Signs with a caller-chosen nonce `k`.
    ///
    /// Reusing or leaking `k` discloses the private key; see
    /// [`analysis`](crate::analysis). Intended for reproducing those attacks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RejectedNonce`] if `k` is outside `[1, n-1]` or yields
    /// `r = 0`, `r + k = n` or `s = 0`.
    pub fn sign_with_nonce(
        &self,
        message: &[u8],
        user_id: &[u8],
        key: &PrivateKey,
        k: &BigUint,
    ) -> Result<Signature> {
        if k.is_zero() || k >= self.params().n() {
            return Err(Error::RejectedNonce);
        }
        let e = self.digest(user_id, message);
        self.sign_digest(&e, key, k)?.ok_or(Error::RejectedNonce)
    }

    /// Verifies a signature under the configured default user identity.
    pub fn verify(&self, message: &[u8], signature: &Signature, public_key: &Point) -> bool {
        self.verify_with_user_id(message, &self.config().user_id, signature, public_key)
    }

    /// Verifies a signature under an explicit user identity.
    ///
    /// Returns `false` for any invalid input: out-of-range components, an invalid
    /// public key, `r + s = 0 (mod n)` or a failed equation check.
    pub fn verify_with_user_id(
        &self,
        message: &[u8],
        user_id: &[u8],
        signature: &Signature,
        public_key: &Point,
    ) -> bool {
        let n = self.params().n();
        if !signature.in_range(n) {
            tracing::debug!("signature components out of range");
            return false;
        }
        if let Err(e) = validate_public_key(self.params(), public_key) {
            tracing::debug!("rejecting public key: {e}");
            return false;
        }

        let t = (&signature.r + &signature.s) % n;
        if t.is_zero() {
            return false;
        }

        let point = self.params().add(
            &self.multiply_base(&signature.s),
            &self.multiply(&t, public_key),
        );
        let Some(x1) = point.x() else {
            return false;
        };

        let e = self.digest(user_id, message);
        (e + x1) % n == signature.r
    }

    /// One signing attempt; `Ok(None)` means the nonce must be rejected.
    fn sign_digest(&self, e: &BigUint, key: &PrivateKey, k: &BigUint) -> Result<Option<Signature>> {
        let n = self.params().n();
        let d = key.scalar();

        let Some(x1) = self.multiply_base(k).x().cloned() else {
            return Ok(None);
        };

        let r = (e + x1) % n;
        if r.is_zero() || &(&r + k) == n {
            return Ok(None);
        }

        // s = (1 + d)^-1 * (k - r*d) mod n
        let inv = mod_inverse(&(d + BigUint::one()), n)?;
        let s = (inv * mod_sub(k, &((&r * d) % n), n)) % n;
        if s.is_zero() {
            return Ok(None);
        }

        Ok(Some(Signature { r, s }))
    }
}
