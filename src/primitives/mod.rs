//! Core mathematical primitives for SM2.
//!
//! This module contains the building blocks every scheme in the crate runs on:
//! - **crypto**: modular arithmetic, hash selection and secure randomness
//! - **curve**: domain parameters, points, the group law and point encodings

/// Field arithmetic, hashing and randomness.
pub mod crypto;
/// Elliptic-curve arithmetic.
pub mod curve;

pub use crypto::{HashAlgorithm, SecureRng};
pub use curve::{DomainParameters, MultiplicationMethod, Point};
