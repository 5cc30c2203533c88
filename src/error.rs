//! Error types for SM2 operations

/// Main error types for the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The curve description is malformed.
    #[error("Invalid domain parameters: {0}")]
    InvalidDomainParameters(String),

    /// A modular inverse does not exist.
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// A signature component is outside `[1, n-1]` or has the wrong width.
    #[error("Invalid signature format: {0}")]
    InvalidSignatureFormat(String),

    /// A point does not satisfy the curve equation.
    #[error("Point is not on the curve")]
    PointNotOnCurve,

    /// A point encoding has the wrong length or tag byte.
    #[error("Invalid point encoding: {0}")]
    InvalidEncoding(String),

    /// A private or public key is out of range or degenerate.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A ciphertext cannot be parsed or yields a degenerate shared point.
    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// The ciphertext authentication tag does not match.
    #[error("Decryption integrity check failed")]
    DecryptionIntegrity,

    /// Reused-nonce recovery was given signatures that do not share a nonce.
    #[error("Signatures do not share a nonce")]
    NonceReuseHypothesisViolated,

    /// A supplied nonce does not reproduce the given signature.
    #[error("Nonce does not reproduce the signature")]
    NonceMismatch,

    /// A caller-supplied nonce falls into one of the signing rejection cases.
    #[error("Nonce rejected by the signing equation")]
    RejectedNonce,

    /// The random source failed or cannot produce usable samples.
    #[error("Insufficient entropy: {0}")]
    InsufficientEntropy(String),

    /// A rejection-sampling loop ran out of attempts.
    #[error("{operation} gave up after {attempts} attempts")]
    RetryExhausted {
        /// Name of the operation that was retried.
        operation: &'static str,
        /// Number of attempts made.
        attempts: u32,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The message is too long for the key-derivation counter.
    #[error("Message of {0} bytes is too long")]
    MessageTooLong(usize),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
