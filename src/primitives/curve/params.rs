//! Elliptic-curve domain parameters.
//!
//! A [`DomainParameters`] value describes the curve `y^2 = x^3 + ax + b (mod p)`, its
//! base point `G` and the order `n` of `G`. Values are validated on construction and
//! immutable afterwards, so they can be shared freely between threads.

use std::sync::OnceLock;

use num_bigint::BigUint;
use num_traits::Zero;

use super::Point;
use crate::primitives::crypto::field::{byte_width, is_probable_prime};
use crate::{Error, Result};

/// Prime modulus of the SM2 recommended curve.
const SM2_P: &str = "FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00000000FFFFFFFFFFFFFFFF";

/// Coefficient `a` of the SM2 recommended curve (`p - 3`).
const SM2_A: &str = "FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00000000FFFFFFFFFFFFFFFC";

/// Coefficient `b` of the SM2 recommended curve.
const SM2_B: &str = "28E9FA9E9D9F5E344D5A9E4BCF6509A7F39789F515AB8F92DDBCBD414D940E93";

/// Order of the SM2 base point.
const SM2_N: &str = "FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFF7203DF6B21C6052B53BBF40939D54123";

/// Base point x-coordinate.
const SM2_GX: &str = "32C4AE2C1F1981195F9904466A39C9948FE30BBFF2660BE1715A4589334C74C7";

/// Base point y-coordinate.
const SM2_GY: &str = "BC3736A2F4F6779C59BDCEE36B692153D0A9877CC62A474002DF32E52139F0A0";

static SM2: OnceLock<DomainParameters> = OnceLock::new();

/// Curve description shared by every operation in the crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainParameters {
    name: String,
    p: BigUint,
    a: BigUint,
    b: BigUint,
    n: BigUint,
    generator: Point,
    field_bytes: usize,
    scalar_bytes: usize,
}

impl DomainParameters {
    /// Creates validated domain parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDomainParameters`] if:
    /// - `p` is not an odd prime greater than 3
    /// - `a` or `b` is not reduced modulo `p`
    /// - the curve is singular (`4a^3 + 27b^2 = 0 mod p`)
    /// - `n` is not a prime of at least 3
    /// - the base point is not on the curve, or `n * G` is not the identity
    pub fn new(
        name: impl Into<String>,
        p: BigUint,
        a: BigUint,
        b: BigUint,
        n: BigUint,
        gx: BigUint,
        gy: BigUint,
    ) -> Result<Self> {
        let params = Self {
            name: name.into(),
            field_bytes: byte_width(&p),
            scalar_bytes: byte_width(&n),
            p,
            a,
            b,
            n,
            generator: Point::new(gx, gy),
        };
        params.validate()?;

        tracing::debug!(
            curve = %params.name,
            field_bits = params.p.bits(),
            "domain parameters validated"
        );
        Ok(params)
    }

    /// Creates validated domain parameters from big-endian hex strings.
    pub fn from_hex(
        name: impl Into<String>,
        p: &str,
        a: &str,
        b: &str,
        n: &str,
        gx: &str,
        gy: &str,
    ) -> Result<Self> {
        Self::new(
            name,
            parse_hex(p)?,
            parse_hex(a)?,
            parse_hex(b)?,
            parse_hex(n)?,
            parse_hex(gx)?,
            parse_hex(gy)?,
        )
    }

    /// The SM2 recommended 256-bit curve.
    ///
    /// Built and validated once per process, then cloned.
    pub fn sm2() -> Self {
        SM2.get_or_init(|| {
            Self::from_hex("sm2p256v1", SM2_P, SM2_A, SM2_B, SM2_N, SM2_GX, SM2_GY)
                .unwrap_or_else(|e| unreachable!("SM2 recommended parameters are valid: {e}"))
        })
        .clone()
    }

    fn validate(&self) -> Result<()> {
        let p = &self.p;

        if p <= &BigUint::from(3u32) || !p.bit(0) || !is_probable_prime(p) {
            return Err(Error::InvalidDomainParameters(
                "modulus p must be an odd prime greater than 3".to_string(),
            ));
        }

        if &self.a >= p || &self.b >= p {
            return Err(Error::InvalidDomainParameters(
                "coefficients a and b must be reduced modulo p".to_string(),
            ));
        }

        let a_cubed = self.a.modpow(&BigUint::from(3u32), p);
        let b_squared = (&self.b * &self.b) % p;
        let discriminant = (BigUint::from(4u32) * a_cubed + BigUint::from(27u32) * b_squared) % p;
        if discriminant.is_zero() {
            return Err(Error::InvalidDomainParameters(
                "curve is singular".to_string(),
            ));
        }

        if self.n < BigUint::from(3u32) || !is_probable_prime(&self.n) {
            return Err(Error::InvalidDomainParameters(
                "order n must be a prime of at least 3".to_string(),
            ));
        }

        if !self.is_on_curve(&self.generator) || self.generator.is_identity() {
            return Err(Error::InvalidDomainParameters(
                "base point is not a finite point on the curve".to_string(),
            ));
        }

        if !self.scalar_multiply(&self.n, &self.generator).is_identity() {
            return Err(Error::InvalidDomainParameters(
                "n is not the order of the base point".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the name of this curve.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the prime modulus `p`.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Returns the curve coefficient `a`.
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// Returns the curve coefficient `b`.
    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// Returns the order `n` of the base point.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Returns the base point `G`.
    pub fn generator(&self) -> &Point {
        &self.generator
    }

    /// Width in bytes of an encoded field element.
    pub fn field_bytes(&self) -> usize {
        self.field_bytes
    }

    /// Width in bytes of an encoded scalar.
    pub fn scalar_bytes(&self) -> usize {
        self.scalar_bytes
    }

    /// Length of an uncompressed point encoding (`0x04 || X || Y`).
    pub fn uncompressed_len(&self) -> usize {
        1 + 2 * self.field_bytes
    }
}

fn parse_hex(value: &str) -> Result<BigUint> {
    BigUint::parse_bytes(value.as_bytes(), 16).ok_or_else(|| {
        Error::InvalidDomainParameters(format!("'{value}' is not a hexadecimal integer"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u32) -> BigUint {
        BigUint::from(v)
    }

    fn toy(a: u32, b: u32, n: u32, gx: u32, gy: u32) -> Result<DomainParameters> {
        DomainParameters::new("toy", big(17), big(a), big(b), big(n), big(gx), big(gy))
    }

    #[test]
    fn sm2_parameters_are_valid() {
        let params = DomainParameters::sm2();
        assert_eq!(params.name(), "sm2p256v1");
        assert_eq!(params.field_bytes(), 32);
        assert_eq!(params.scalar_bytes(), 32);
        assert_eq!(params.uncompressed_len(), 65);
        assert_eq!(params.p() % big(4), big(3));
    }

    #[test]
    fn sm2_is_cached() {
        assert_eq!(DomainParameters::sm2(), DomainParameters::sm2());
    }

    #[test]
    fn toy_curve_is_valid() {
        let params = toy(2, 2, 19, 5, 1).unwrap();
        assert_eq!(params.field_bytes(), 1);
        assert_eq!(params.uncompressed_len(), 3);
    }

    #[test]
    fn rejects_singular_curve() {
        assert!(matches!(
            toy(0, 0, 19, 5, 1),
            Err(Error::InvalidDomainParameters(_))
        ));
    }

    #[test]
    fn rejects_base_point_off_curve() {
        assert!(matches!(
            toy(2, 2, 19, 5, 2),
            Err(Error::InvalidDomainParameters(_))
        ));
    }

    #[test]
    fn rejects_wrong_order() {
        assert!(matches!(
            toy(2, 2, 17, 5, 1),
            Err(Error::InvalidDomainParameters(_))
        ));
        assert!(matches!(
            toy(2, 2, 20, 5, 1),
            Err(Error::InvalidDomainParameters(_))
        ));
    }

    #[test]
    fn rejects_composite_modulus() {
        let result = DomainParameters::new("bad", big(15), big(2), big(2), big(19), big(5), big(1));
        assert!(matches!(result, Err(Error::InvalidDomainParameters(_))));
    }

    #[test]
    fn rejects_unreduced_coefficients() {
        assert!(matches!(
            toy(19, 2, 19, 5, 1),
            Err(Error::InvalidDomainParameters(_))
        ));
    }

    #[test]
    fn rejects_malformed_hex() {
        let result = DomainParameters::from_hex("bad", "zz", "2", "2", "13", "5", "1");
        assert!(matches!(result, Err(Error::InvalidDomainParameters(_))));
    }
}
