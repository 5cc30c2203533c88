/// Modular arithmetic primitives.
pub mod field;
/// Hash function selection.
pub mod hash;
/// Cryptographically secure random number generation.
pub mod rng;

pub use field::{mod_inverse, mod_sub};
pub use hash::HashAlgorithm;
pub use rng::{random_scalar, SecureRng};
