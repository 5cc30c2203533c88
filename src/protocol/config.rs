use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::primitives::curve::arithmetic::MAX_WINDOW_WIDTH;
use crate::{Error, HashAlgorithm, MultiplicationMethod, Result};

/// User identity prefixed to every signed message unless another one is given.
pub const DEFAULT_USER_ID: &[u8] = b"1234567812345678";

/// Default bound on nonce retries in signing, encryption and forgery.
pub const DEFAULT_MAX_RETRIES: u32 = 64;

/// Largest user identity whose bit length fits the 16-bit length field.
pub const MAX_USER_ID_BYTES: usize = 8191;

/// Scheme configuration.
///
/// Passed explicitly to [`Sm2::new`](crate::Sm2::new); nothing in the crate reads
/// configuration from ambient state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sm2Config {
    /// Digest used for signing, key derivation and the ciphertext tag.
    pub hash: HashAlgorithm,
    /// Identity tag `Z` prefixed to signed messages (hex in serialized form).
    #[serde(with = "hex_bytes")]
    pub user_id: Vec<u8>,
    /// Maximum nonce draws before a randomized operation gives up.
    pub max_retries: u32,
    /// Scalar multiplication algorithm.
    pub multiplication: MultiplicationMethod,
}

impl Default for Sm2Config {
    fn default() -> Self {
        Self {
            hash: HashAlgorithm::default(),
            user_id: DEFAULT_USER_ID.to_vec(),
            max_retries: DEFAULT_MAX_RETRIES,
            multiplication: MultiplicationMethod::default(),
        }
    }
}

impl Sm2Config {
    /// Replaces the hash algorithm.
    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    /// Replaces the default user identity.
    pub fn with_user_id(mut self, user_id: impl Into<Vec<u8>>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Replaces the retry bound.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Replaces the scalar multiplication algorithm.
    pub fn with_multiplication(mut self, multiplication: MultiplicationMethod) -> Self {
        self.multiplication = multiplication;
        self
    }

    /// Loads configuration from a TOML file and environment variables.
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables with `SM2_` prefix (e.g., `SM2_HASH=sha512`)
    /// 2. TOML configuration file (if exists)
    /// 3. Built-in defaults
    ///
    /// The TOML file path can be set via `SM2_CONFIG_PATH`. If not set, defaults to
    /// `./config/sm2.toml`. A missing file is silently skipped.
    ///
    /// # Errors
    /// Returns an error if a source is malformed or contains values of the wrong type.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> figment::error::Result<Self> {
        let config_path =
            std::env::var("SM2_CONFIG_PATH").unwrap_or_else(|_| "config/sm2.toml".to_string());

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("SM2_"))
            .extract()
    }

    /// Parses configuration from a TOML document layered over the defaults.
    #[allow(clippy::result_large_err)]
    pub fn from_toml_str(toml: &str) -> figment::error::Result<Self> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml))
            .extract()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if the retry bound is zero, the user identity
    /// is empty or longer than 8191 bytes, or a window width is outside `2..=8`.
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(Error::InvalidConfig(
                "max_retries cannot be zero".to_string(),
            ));
        }

        if self.user_id.is_empty() {
            return Err(Error::InvalidConfig("user_id cannot be empty".to_string()));
        }

        if self.user_id.len() > MAX_USER_ID_BYTES {
            return Err(Error::InvalidConfig(format!(
                "user_id is {} bytes, at most {MAX_USER_ID_BYTES} allowed",
                self.user_id.len()
            )));
        }

        if let MultiplicationMethod::Windowed { width } = self.multiplication {
            if !(2..=MAX_WINDOW_WIDTH).contains(&width) {
                return Err(Error::InvalidConfig(format!(
                    "window width {width} outside 2..={MAX_WINDOW_WIDTH}"
                )));
            }
        }

        Ok(())
    }
}

mod hex_bytes {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    /// Environment values made only of decimal digits arrive as integers and are
    /// read back from their digits. Leading zeros are lost that way, so such values
    /// must be quoted (`SM2_USER_ID='"0102"'`).
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(HexVisitor)
    }

    struct HexVisitor;

    impl HexVisitor {
        fn decode_digits<E: de::Error>(digits: String) -> Result<Vec<u8>, E> {
            hex::decode(&digits).map_err(|e| {
                E::custom(format!(
                    "hex value {digits} was read as a number ({e}); quote it to keep leading zeros"
                ))
            })
        }
    }

    impl Visitor<'_> for HexVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a hex string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            hex::decode(v).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Self::decode_digits(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            if v < 0 {
                return Err(E::invalid_value(de::Unexpected::Signed(v), &self));
            }
            Self::decode_digits(v.to_string())
        }
    }
}
