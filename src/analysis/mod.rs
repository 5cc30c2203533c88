//! Attacks that follow from misusing the signature scheme.
//!
//! - **nonce**: key recovery from a leaked nonce or from two signatures sharing one
//! - **forgery**: existential forgery against verification over bare digests
//!
//! Every function here is a deterministic derivation over public data apart from
//! the forger's own random draws.

/// Existential forgery over prehashed digests.
pub mod forgery;
/// Private-key recovery from nonce misuse.
pub mod nonce;

pub use forgery::{forge_signature, verify_prehashed, ForgedSignature};
pub use nonce::{recover_from_leaked_nonce, recover_from_reused_nonce};
