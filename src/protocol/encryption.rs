//! Public-key encryption with ciphertext layout `C1 || C3 || C2`.
//!
//! - `C1 = k*G`, uncompressed
//! - `C3 = H(x2 || M || y2)`, the integrity tag
//! - `C2 = M xor KDF(x2 || y2)`

use num_bigint::BigUint;
use num_traits::One;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

use super::keys::validate_public_key;
use super::{PrivateKey, Sm2};
use crate::primitives::crypto::field::to_fixed_bytes;
use crate::primitives::crypto::rng::random_scalar;
use crate::primitives::curve::encoding::UNCOMPRESSED_TAG;
use crate::{Error, HashAlgorithm, Point, Result};

/// Expands `seed` into `ceil(bit_len / 8)` bytes.
///
/// Concatenates `H(seed || counter)` for a big-endian 32-bit counter starting at 1
/// and truncates the result.
///
/// # Errors
///
/// Returns [`Error::MessageTooLong`] if the output would need more than
/// `2^32 - 1` hash blocks.
pub fn kdf(hash: HashAlgorithm, seed: &[u8], bit_len: usize) -> Result<Vec<u8>> {
    let len = bit_len.div_ceil(8);
    let blocks = len.div_ceil(hash.output_size());
    if u32::try_from(blocks).is_err() {
        return Err(Error::MessageTooLong(len));
    }

    let mut out = Vec::with_capacity(blocks * hash.output_size());
    for counter in 1..=blocks as u32 {
        out.extend_from_slice(&hash.digest(&[seed, &counter.to_be_bytes()]));
    }
    out.truncate(len);
    Ok(out)
}

impl Sm2 {
    /// Encrypts `message` to `public_key`.
    ///
    /// Nonces for which `k*P` is the identity, or which give an all-zero keystream
    /// for a non-empty message, are discarded. At most `max_retries` are tried.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidKey`] or [`Error::PointNotOnCurve`] for a bad public key
    /// - [`Error::MessageTooLong`] if the keystream cannot be derived
    /// - [`Error::RetryExhausted`] if every nonce in the budget was rejected
    /// - [`Error::InsufficientEntropy`] if the random source fails
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &[u8],
        public_key: &Point,
    ) -> Result<Vec<u8>> {
        validate_public_key(self.params(), public_key)?;

        let hash = self.config().hash;
        let bit_len = message
            .len()
            .checked_mul(8)
            .ok_or(Error::MessageTooLong(message.len()))?;
        let upper = self.params().n() - BigUint::one();
        let max_retries = self.config().max_retries;

        for attempt in 1..=max_retries {
            let k = random_scalar(rng, &BigUint::one(), &upper)?;

            let Some((x2, y2)) = self.shared_coordinates(&self.multiply(&k, public_key)) else {
                tracing::trace!(attempt, "k*P is the identity");
                continue;
            };

            let keystream = kdf(hash, &[x2.as_slice(), y2.as_slice()].concat(), bit_len)?;
            if !message.is_empty() && keystream.iter().all(|&b| b == 0) {
                tracing::trace!(attempt, "all-zero keystream");
                continue;
            }

            let c1 = self.params().encode_uncompressed(&self.multiply_base(&k));
            let c3 = hash.digest(&[&x2, message, &y2]);

            let mut out = Vec::with_capacity(c1.len() + c3.len() + message.len());
            out.extend_from_slice(&c1);
            out.extend_from_slice(&c3);
            out.extend(xor(message, &keystream));

            tracing::debug!(attempt, len = out.len(), "message encrypted");
            return Ok(out);
        }

        tracing::warn!(attempts = max_retries, "encryption retry budget exhausted");
        Err(Error::RetryExhausted {
            operation: "encrypt",
            attempts: max_retries,
        })
    }

    /// Decrypts a `C1 || C3 || C2` ciphertext.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedCiphertext`] if the input is too short, `C1` has the wrong
    ///   tag, or `d*C1` is the identity
    /// - [`Error::PointNotOnCurve`] if `C1` is not on the curve
    /// - [`Error::DecryptionIntegrity`] if the recomputed tag differs from `C3`
    pub fn decrypt(&self, ciphertext: &[u8], key: &PrivateKey) -> Result<Vec<u8>> {
        let hash = self.config().hash;
        let c1_len = self.params().uncompressed_len();
        let tag_len = hash.output_size();

        if ciphertext.len() < c1_len + tag_len {
            return Err(Error::MalformedCiphertext(format!(
                "need at least {} bytes, got {}",
                c1_len + tag_len,
                ciphertext.len()
            )));
        }
        if ciphertext[0] != UNCOMPRESSED_TAG {
            return Err(Error::MalformedCiphertext(format!(
                "C1 tag byte is {:#04x}",
                ciphertext[0]
            )));
        }

        let (c1, rest) = ciphertext.split_at(c1_len);
        let (c3, c2) = rest.split_at(tag_len);

        let c1 = self.params().decode_uncompressed(c1)?;
        let (x2, y2) = self
            .shared_coordinates(&self.multiply(key.scalar(), &c1))
            .ok_or_else(|| Error::MalformedCiphertext("d*C1 is the identity".to_string()))?;

        let bit_len = c2
            .len()
            .checked_mul(8)
            .ok_or(Error::MessageTooLong(c2.len()))?;
        let keystream = kdf(hash, &[x2.as_slice(), y2.as_slice()].concat(), bit_len)?;
        let message = xor(c2, &keystream);

        let tag = hash.digest(&[&x2, &message, &y2]);
        if !bool::from(tag.as_slice().ct_eq(c3)) {
            tracing::debug!("ciphertext tag mismatch");
            return Err(Error::DecryptionIntegrity);
        }

        Ok(message)
    }

    /// Field-width encodings of a shared point's coordinates.
    fn shared_coordinates(&self, point: &Point) -> Option<(Vec<u8>, Vec<u8>)> {
        match point {
            Point::Identity => None,
            Point::Affine { x, y } => {
                let width = self.params().field_bytes();
                Some((to_fixed_bytes(x, width), to_fixed_bytes(y, width)))
            }
        }
    }
}

fn xor(data: &[u8], keystream: &[u8]) -> Vec<u8> {
    data.iter().zip(keystream).map(|(a, b)| a ^ b).collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;
    use crate::{DomainParameters, KeyPair, Sm2Config};

    fn setup() -> (Sm2, KeyPair, ChaCha20Rng) {
        let sm2 = Sm2::default();
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let keys = sm2.generate_key_pair(&mut rng).unwrap();
        (sm2, keys, rng)
    }

    #[test]
    fn kdf_first_block_is_hash_of_seed_and_counter_one() {
        let out = kdf(HashAlgorithm::Sha256, b"seed", 256).unwrap();
        let expected = HashAlgorithm::Sha256.digest(&[b"seed".as_slice(), &[0u8, 0, 0, 1]]);
        assert_eq!(out, expected);
    }

    #[test]
    fn kdf_truncates_to_requested_length() {
        let out = kdf(HashAlgorithm::Sha256, b"seed", 33 * 8).unwrap();
        assert_eq!(out.len(), 33);
        let second = HashAlgorithm::Sha256.digest(&[b"seed".as_slice(), &[0u8, 0, 0, 2]]);
        assert_eq!(out[32], second[0]);

        assert_eq!(kdf(HashAlgorithm::Sha256, b"seed", 12).unwrap().len(), 2);
        assert!(kdf(HashAlgorithm::Sha256, b"seed", 0).unwrap().is_empty());
    }

    #[test]
    fn kdf_prefix_is_stable() {
        let short = kdf(HashAlgorithm::Sha512, b"seed", 80 * 8).unwrap();
        let long = kdf(HashAlgorithm::Sha512, b"seed", 200 * 8).unwrap();
        assert_eq!(short[..], long[..80]);
    }

    #[test]
    fn encrypt_then_decrypt() {
        let (sm2, keys, mut rng) = setup();
        let message = b"encryption standard";
        let ct = sm2.encrypt(&mut rng, message, keys.public_key()).unwrap();
        assert_eq!(ct.len(), 65 + 32 + message.len());
        assert_eq!(ct[0], 0x04);
        assert_eq!(sm2.decrypt(&ct, keys.private_key()).unwrap(), message);
    }

    #[test]
    fn empty_message_round_trips() {
        let (sm2, keys, mut rng) = setup();
        let ct = sm2.encrypt(&mut rng, b"", keys.public_key()).unwrap();
        assert_eq!(ct.len(), 65 + 32);
        assert!(sm2.decrypt(&ct, keys.private_key()).unwrap().is_empty());
    }

    #[test]
    fn encryption_is_randomized() {
        let (sm2, keys, mut rng) = setup();
        let a = sm2.encrypt(&mut rng, b"same", keys.public_key()).unwrap();
        let b = sm2.encrypt(&mut rng, b"same", keys.public_key()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn tampered_payload_fails_integrity() {
        let (sm2, keys, mut rng) = setup();
        let mut ct = sm2.encrypt(&mut rng, b"attack at dawn", keys.public_key()).unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0x01;
        assert!(matches!(
            sm2.decrypt(&ct, keys.private_key()),
            Err(Error::DecryptionIntegrity)
        ));
    }

    #[test]
    fn tampered_tag_fails_integrity() {
        let (sm2, keys, mut rng) = setup();
        let mut ct = sm2.encrypt(&mut rng, b"attack at dawn", keys.public_key()).unwrap();
        ct[70] ^= 0x80;
        assert!(matches!(
            sm2.decrypt(&ct, keys.private_key()),
            Err(Error::DecryptionIntegrity)
        ));
    }

    #[test]
    fn wrong_key_fails_integrity() {
        let (sm2, keys, mut rng) = setup();
        let other = sm2.generate_key_pair(&mut rng).unwrap();
        let ct = sm2.encrypt(&mut rng, b"secret", keys.public_key()).unwrap();
        assert!(matches!(
            sm2.decrypt(&ct, other.private_key()),
            Err(Error::DecryptionIntegrity)
        ));
    }

    #[test]
    fn malformed_ciphertexts_are_rejected() {
        let (sm2, keys, mut rng) = setup();
        let ct = sm2.encrypt(&mut rng, b"secret", keys.public_key()).unwrap();

        assert!(matches!(
            sm2.decrypt(&ct[..96], keys.private_key()),
            Err(Error::MalformedCiphertext(_))
        ));

        let mut bad_tag = ct.clone();
        bad_tag[0] = 0x02;
        assert!(matches!(
            sm2.decrypt(&bad_tag, keys.private_key()),
            Err(Error::MalformedCiphertext(_))
        ));

        let mut off_curve = ct.clone();
        off_curve[64] ^= 0x01;
        assert!(matches!(
            sm2.decrypt(&off_curve, keys.private_key()),
            Err(Error::PointNotOnCurve)
        ));
    }

    #[test]
    fn encrypt_rejects_invalid_public_key() {
        let (sm2, _, mut rng) = setup();
        assert!(matches!(
            sm2.encrypt(&mut rng, b"x", &Point::Identity),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn tag_length_follows_hash() {
        let sm2 = Sm2::new(
            DomainParameters::sm2(),
            Sm2Config::default().with_hash(HashAlgorithm::Sha512),
        )
        .unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let keys = sm2.generate_key_pair(&mut rng).unwrap();
        let ct = sm2.encrypt(&mut rng, b"abc", keys.public_key()).unwrap();
        assert_eq!(ct.len(), 65 + 64 + 3);
        assert_eq!(sm2.decrypt(&ct, keys.private_key()).unwrap(), b"abc");
    }

    #[test]
    fn toy_curve_uses_field_width_encoding() {
        let params = DomainParameters::new(
            "toy",
            BigUint::from(17u32),
            BigUint::from(2u32),
            BigUint::from(2u32),
            BigUint::from(19u32),
            BigUint::from(5u32),
            BigUint::from(1u32),
        )
        .unwrap();
        let sm2 = Sm2::new(params, Sm2Config::default()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let keys = sm2.generate_key_pair(&mut rng).unwrap();
        let ct = sm2.encrypt(&mut rng, b"toy message", keys.public_key()).unwrap();
        assert_eq!(ct.len(), 3 + 32 + 11);
        assert_eq!(sm2.decrypt(&ct, keys.private_key()).unwrap(), b"toy message");
    }
}
