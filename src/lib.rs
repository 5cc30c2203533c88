//! SM2-style elliptic-curve signatures and encryption, plus the attacks that
//! follow from misusing them.
//!
//! The crate is organised in three layers:
//! - [`primitives`]: modular arithmetic, hashing, randomness and curve arithmetic
//! - [`protocol`]: key management, signing and public-key encryption
//! - [`analysis`]: nonce-misuse key recovery and existential forgery
//!
//! # Example
//!
//! ```rust
//! use sm2_lab::{SecureRng, Sm2};
//!
//! let sm2 = Sm2::default();
//! let mut rng = SecureRng::new();
//! let keys = sm2.generate_key_pair(&mut rng).unwrap();
//!
//! let ciphertext = sm2.encrypt(&mut rng, b"hello", keys.public_key()).unwrap();
//! let plaintext = sm2.decrypt(&ciphertext, keys.private_key()).unwrap();
//! assert_eq!(plaintext, b"hello");
//! ```

/// Nonce-misuse key recovery and signature forgery.
pub mod analysis;
/// Error types.
pub mod error;
/// Arithmetic and curve building blocks.
pub mod primitives;
/// Keys, signatures and encryption.
pub mod protocol;

pub use error::{Error, Result};
pub use primitives::{DomainParameters, HashAlgorithm, MultiplicationMethod, Point, SecureRng};
pub use protocol::{KeyPair, PrivateKey, Signature, Sm2, Sm2Config};
