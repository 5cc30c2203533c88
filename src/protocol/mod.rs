/// Scheme configuration and its loaders.
pub mod config;
/// The `Sm2` engine binding parameters to configuration.
pub mod context;
/// Public-key encryption and the key-derivation function.
pub mod encryption;
/// Private keys, key pairs and public-key validation.
pub mod keys;
/// Signing and verification.
pub mod signature;

pub use config::Sm2Config;
pub use context::Sm2;
pub use encryption::kdf;
pub use keys::{validate_public_key, KeyPair, PrivateKey};
pub use signature::Signature;
