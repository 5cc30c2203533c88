//! SEC1-style point encodings.
//!
//! - uncompressed: `0x04 || X || Y`
//! - compressed: `0x02`/`0x03` (parity of `y`) `|| X`
//! - identity: the single byte `0x00`
//!
//! Coordinates are big-endian and padded to the field width.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use super::{DomainParameters, Point};
use crate::primitives::crypto::field::to_fixed_bytes;
use crate::{Error, Result};

/// Tag byte of the identity encoding.
pub const IDENTITY_TAG: u8 = 0x00;

/// Tag byte of a compressed point with even `y`.
pub const COMPRESSED_EVEN_TAG: u8 = 0x02;

/// Tag byte of a compressed point with odd `y`.
pub const COMPRESSED_ODD_TAG: u8 = 0x03;

/// Tag byte of an uncompressed point.
pub const UNCOMPRESSED_TAG: u8 = 0x04;

impl DomainParameters {
    /// Encodes a point as `0x04 || X || Y`; the identity encodes as `0x00`.
    pub fn encode_uncompressed(&self, point: &Point) -> Vec<u8> {
        match point {
            Point::Identity => vec![IDENTITY_TAG],
            Point::Affine { x, y } => {
                let mut out = Vec::with_capacity(self.uncompressed_len());
                out.push(UNCOMPRESSED_TAG);
                out.extend_from_slice(&to_fixed_bytes(x, self.field_bytes()));
                out.extend_from_slice(&to_fixed_bytes(y, self.field_bytes()));
                out
            }
        }
    }

    /// Decodes an uncompressed point and checks that it lies on the curve.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEncoding`] for a wrong length or tag byte and
    /// [`Error::PointNotOnCurve`] if the coordinates do not satisfy the curve equation.
    pub fn decode_uncompressed(&self, bytes: &[u8]) -> Result<Point> {
        if bytes == [IDENTITY_TAG] {
            return Ok(Point::Identity);
        }
        if bytes.len() != self.uncompressed_len() {
            return Err(Error::InvalidEncoding(format!(
                "expected {} bytes, got {}",
                self.uncompressed_len(),
                bytes.len()
            )));
        }
        if bytes[0] != UNCOMPRESSED_TAG {
            return Err(Error::InvalidEncoding(format!(
                "unsupported tag byte {:#04x}",
                bytes[0]
            )));
        }

        let width = self.field_bytes();
        let point = Point::new(
            BigUint::from_bytes_be(&bytes[1..1 + width]),
            BigUint::from_bytes_be(&bytes[1 + width..]),
        );
        if !self.is_on_curve(&point) {
            return Err(Error::PointNotOnCurve);
        }
        Ok(point)
    }

    /// Compresses a point to its x-coordinate and the parity of `y`.
    pub fn compress(&self, point: &Point) -> Vec<u8> {
        match point {
            Point::Identity => vec![IDENTITY_TAG],
            Point::Affine { x, y } => {
                let tag = if y.bit(0) {
                    COMPRESSED_ODD_TAG
                } else {
                    COMPRESSED_EVEN_TAG
                };
                let mut out = Vec::with_capacity(1 + self.field_bytes());
                out.push(tag);
                out.extend_from_slice(&to_fixed_bytes(x, self.field_bytes()));
                out
            }
        }
    }

    /// Recovers a point from its compressed form.
    ///
    /// The square root is computed as `alpha^((p+1)/4)`, which requires
    /// `p = 3 (mod 4)`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDomainParameters`] if `p != 3 (mod 4)`
    /// - [`Error::InvalidEncoding`] for a wrong length, tag byte, or unreduced `x`,
    ///   or an odd tag on a point whose `y` is zero
    /// - [`Error::PointNotOnCurve`] if `x^3 + ax + b` has no square root
    pub fn decompress(&self, bytes: &[u8]) -> Result<Point> {
        if bytes == [IDENTITY_TAG] {
            return Ok(Point::Identity);
        }

        let p = self.p();
        if p % 4u32 != BigUint::from(3u32) {
            return Err(Error::InvalidDomainParameters(
                "point decompression requires p = 3 (mod 4)".to_string(),
            ));
        }

        if bytes.len() != 1 + self.field_bytes() {
            return Err(Error::InvalidEncoding(format!(
                "expected {} bytes, got {}",
                1 + self.field_bytes(),
                bytes.len()
            )));
        }
        let want_odd = match bytes[0] {
            COMPRESSED_EVEN_TAG => false,
            COMPRESSED_ODD_TAG => true,
            tag => {
                return Err(Error::InvalidEncoding(format!(
                    "unsupported tag byte {tag:#04x}"
                )))
            }
        };

        let x = BigUint::from_bytes_be(&bytes[1..]);
        if &x >= p {
            return Err(Error::InvalidEncoding(
                "x-coordinate is not reduced modulo p".to_string(),
            ));
        }

        let alpha = (&x * &x * &x + self.a() * &x + self.b()) % p;
        let exponent = (p + BigUint::one()) >> 2usize;
        let mut y = alpha.modpow(&exponent, p);
        if y.bit(0) != want_odd {
            y = (p - y) % p;
        }

        let point = Point::new(x, y);
        if !self.is_on_curve(&point) {
            return Err(Error::PointNotOnCurve);
        }
        // y = 0 has no odd root, so only the even tag is canonical.
        if want_odd && point.y().is_some_and(|y| y.is_zero()) {
            return Err(Error::InvalidEncoding(
                "odd tag for a point with y = 0".to_string(),
            ));
        }
        Ok(point)
    }
}
