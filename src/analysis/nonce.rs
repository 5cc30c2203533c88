//! Private-key recovery from nonce misuse.
//!
//! Both recoveries solve the signing equation `s = (1 + d)^-1 * (k - r*d) mod n`
//! for `d`. Each one first checks that its inputs are consistent with the assumed
//! misuse and refuses to derive a key otherwise.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::primitives::crypto::field::{mod_inverse, mod_sub};
use crate::{Error, Result, Signature, Sm2};

/// Recovers the private key from a signature whose nonce `k` is known.
///
/// Computes `d = (k - s) * (s + r)^-1 mod n`.
///
/// # Errors
///
/// - [`Error::InvalidSignatureFormat`] if `r` or `s` is outside `[1, n-1]`
/// - [`Error::NonceMismatch`] if `k` did not produce this signature over `message`
/// - [`Error::Arithmetic`] if `s + r = 0 (mod n)`
pub fn recover_from_leaked_nonce(
    sm2: &Sm2,
    message: &[u8],
    user_id: &[u8],
    signature: &Signature,
    k: &BigUint,
) -> Result<BigUint> {
    let params = sm2.params();
    let n = params.n();
    signature.validate(params)?;
    let (r, s) = (signature.r(), signature.s());

    if k.is_zero() || k >= n {
        return Err(Error::NonceMismatch);
    }
    let x1 = params
        .scalar_multiply(k, params.generator())
        .x()
        .cloned()
        .ok_or(Error::NonceMismatch)?;
    let e = sm2.digest(user_id, message);
    if (e + x1) % n != *r {
        tracing::debug!("leaked nonce does not match the signature");
        return Err(Error::NonceMismatch);
    }

    let denominator = mod_inverse(&((s + r) % n), n)?;
    let d = (mod_sub(k, s, n) * denominator) % n;
    tracing::debug!("private key recovered from leaked nonce");
    Ok(d)
}

/// Recovers the private key from two signatures made with the same nonce.
///
/// Checks `(r1 - e1) = (r2 - e2) (mod n)` first, i.e. that both signatures imply
/// the same `x1 = (k*G).x`, then computes
/// `d = (s1 - s2) * ((r2 - r1) - (s1 - s2))^-1 mod n`.
///
/// # Errors
///
/// - [`Error::InvalidSignatureFormat`] if a component is outside `[1, n-1]`
/// - [`Error::NonceReuseHypothesisViolated`] if the signatures do not share a nonce
/// - [`Error::Arithmetic`] if the denominator vanishes, as it does for two copies
///   of the same signature
pub fn recover_from_reused_nonce(
    sm2: &Sm2,
    m1: &[u8],
    sig1: &Signature,
    m2: &[u8],
    sig2: &Signature,
    user_id: &[u8],
) -> Result<BigUint> {
    let n = sm2.params().n();
    sig1.validate(sm2.params())?;
    sig2.validate(sm2.params())?;
    let (r1, s1) = (sig1.r(), sig1.s());
    let (r2, s2) = (sig2.r(), sig2.s());

    let e1 = sm2.digest(user_id, m1);
    let e2 = sm2.digest(user_id, m2);
    if mod_sub(r1, &e1, n) != mod_sub(r2, &e2, n) {
        tracing::debug!("signatures imply different nonces");
        return Err(Error::NonceReuseHypothesisViolated);
    }

    let numerator = mod_sub(s1, s2, n);
    let denominator = mod_sub(&mod_sub(r2, r1, n), &numerator, n);
    if denominator.is_zero() {
        return Err(Error::Arithmetic(
            "reused-nonce denominator is zero".to_string(),
        ));
    }

    let d = (numerator * mod_inverse(&denominator, n)?) % n;
    tracing::debug!("private key recovered from reused nonce");
    Ok(d)
}
