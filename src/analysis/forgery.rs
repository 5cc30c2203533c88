//! Existential forgery against prehashed ECDSA-style verification.
//!
//! Verification that accepts a digest without seeing the message lets anyone
//! fabricate `(digest, signature)` pairs for a public key. The forger picks the
//! signature first and the digest falls out of the algebra, so the forged
//! "message" is the digest bytes themselves. No message chosen in advance can be
//! forged this way.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use crate::primitives::crypto::field::{mod_inverse, to_fixed_bytes};
use crate::primitives::crypto::rng::random_scalar;
use crate::protocol::validate_public_key;
use crate::{DomainParameters, Error, Point, Result, Signature, Sm2};

/// Forged message and the signature fabricated for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForgedSignature {
    message: Vec<u8>,
    signature: Signature,
}

impl ForgedSignature {
    /// Big-endian encoding of the implied digest `e`, padded to the scalar width.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Returns the fabricated signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

/// Fabricates a signature that [`verify_prehashed`] accepts under `public_key`.
///
/// Draws `u, v` from `[1, n-1]`, sets `R = u*G + v*P`, `r = R.x mod n`,
/// `s = r * v^-1 mod n` and `e = r * u * v^-1 mod n`. The returned message is `e`
/// encoded literally.
///
/// # Errors
///
/// - [`Error::InvalidKey`] or [`Error::PointNotOnCurve`] for a bad public key
/// - [`Error::RetryExhausted`] if every draw gave `R = O` or `r = 0`
/// - [`Error::InsufficientEntropy`] if the random source fails
pub fn forge_signature<R: RngCore + CryptoRng>(
    sm2: &Sm2,
    rng: &mut R,
    public_key: &Point,
) -> Result<ForgedSignature> {
    let params = sm2.params();
    validate_public_key(params, public_key)?;

    let n = params.n();
    let upper = n - BigUint::one();
    let max_retries = sm2.config().max_retries;

    for attempt in 1..=max_retries {
        let u = random_scalar(rng, &BigUint::one(), &upper)?;
        let v = random_scalar(rng, &BigUint::one(), &upper)?;

        let point = params.add(&sm2.multiply_base(&u), &sm2.multiply(&v, public_key));
        let Some(x) = point.x() else {
            tracing::trace!(attempt, "u*G + v*P is the identity");
            continue;
        };
        let r = x % n;
        if r.is_zero() {
            tracing::trace!(attempt, "r is zero");
            continue;
        }

        let v_inv = mod_inverse(&v, n)?;
        let s = (&r * &v_inv) % n;
        let e = (&r * &u * &v_inv) % n;

        tracing::debug!(attempt, "signature forged");
        return Ok(ForgedSignature {
            message: to_fixed_bytes(&e, params.scalar_bytes()),
            signature: Signature::from_parts(r, s),
        });
    }

    tracing::warn!(attempts = max_retries, "forgery retry budget exhausted");
    Err(Error::RetryExhausted {
        operation: "forge",
        attempts: max_retries,
    })
}

/// ECDSA verification over a digest supplied as bytes.
///
/// The digest is read as a big-endian integer and reduced modulo `n`. Accepts iff
/// `((e*w)*G + (r*w)*P).x = r (mod n)` with `w = s^-1 mod n`.
pub fn verify_prehashed(
    params: &DomainParameters,
    digest: &[u8],
    signature: &Signature,
    public_key: &Point,
) -> bool {
    let n = params.n();
    if signature.validate(params).is_err() || validate_public_key(params, public_key).is_err() {
        return false;
    }

    let Ok(w) = mod_inverse(signature.s(), n) else {
        return false;
    };
    let e = BigUint::from_bytes_be(digest) % n;
    let u1 = (e * &w) % n;
    let u2 = (signature.r() * &w) % n;

    let point = params.add(
        &params.scalar_multiply(&u1, params.generator()),
        &params.scalar_multiply(&u2, public_key),
    );
    match point.x() {
        Some(x) => &(x % n) == signature.r(),
        None => false,
    }
}
