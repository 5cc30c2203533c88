//! Group law over affine points.
//!
//! All operations are pure functions of the domain parameters and their operands.
//! Operands are reduced modulo `p` before use, so every result has reduced
//! coordinates.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use super::{DomainParameters, Point};
use crate::primitives::crypto::field::{mod_inverse, mod_sub};

/// Largest supported window for windowed multiplication (a 256-entry table).
pub const MAX_WINDOW_WIDTH: u8 = 8;

/// Scalar multiplication algorithm.
///
/// All variants compute the same point; they differ only in operation count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum MultiplicationMethod {
    /// Binary double-and-add, least-significant bit first.
    #[default]
    DoubleAndAdd,
    /// Fixed windows over a table of the first `2^width` multiples.
    Windowed {
        /// Window width in bits.
        width: u8,
    },
    /// Non-adjacent form with digits in `{-1, 0, 1}`.
    Naf,
}

impl DomainParameters {
    /// Checks `y^2 = x^3 + ax + b (mod p)`. The identity is always on the curve.
    ///
    /// Coordinates that are not reduced modulo `p` are rejected.
    pub fn is_on_curve(&self, point: &Point) -> bool {
        let Point::Affine { x, y } = point else {
            return true;
        };
        let p = self.p();
        if x >= p || y >= p {
            return false;
        }

        let lhs = (y * y) % p;
        let rhs = (x * x * x + self.a() * x + self.b()) % p;
        lhs == rhs
    }

    /// Returns `-P`.
    pub fn negate(&self, point: &Point) -> Point {
        match self.reduced(point) {
            None => Point::Identity,
            Some((x, y)) => Point::new(x, mod_sub(&BigUint::zero(), &y, self.p())),
        }
    }

    /// Adds two points.
    pub fn add(&self, lhs: &Point, rhs: &Point) -> Point {
        let (px, py) = match self.reduced(lhs) {
            None => return self.reduced_point(rhs),
            Some(c) => c,
        };
        let (qx, qy) = match self.reduced(rhs) {
            None => return Point::new(px, py),
            Some(c) => c,
        };
        let p = self.p();

        if px == qx {
            if ((&py + &qy) % p).is_zero() {
                return Point::Identity;
            }
            return self.double(lhs);
        }

        let slope = (mod_sub(&qy, &py, p) * self.field_inverse(&mod_sub(&qx, &px, p))) % p;
        self.chord(&slope, &px, &qx, &py)
    }

    /// Doubles a point. Points with `y = 0` have order two and map to the identity.
    pub fn double(&self, point: &Point) -> Point {
        let Some((x, y)) = self.reduced(point) else {
            return Point::Identity;
        };
        if y.is_zero() {
            return Point::Identity;
        }

        let p = self.p();
        let numerator = (BigUint::from(3u32) * &x * &x + self.a()) % p;
        let slope = (numerator * self.field_inverse(&(BigUint::from(2u32) * &y))) % p;
        self.chord(&slope, &x, &x, &y)
    }

    /// Computes `k * P` with binary double-and-add, least-significant bit first.
    pub fn scalar_multiply(&self, k: &BigUint, point: &Point) -> Point {
        if k.is_zero() || point.is_identity() {
            return Point::Identity;
        }

        let mut result = Point::Identity;
        let mut addend = self.reduced_point(point);
        let bits = k.bits();
        for i in 0..bits {
            if k.bit(i) {
                result = self.add(&result, &addend);
            }
            if i + 1 < bits {
                addend = self.double(&addend);
            }
        }
        result
    }

    /// Computes `k * P` for a signed scalar; negative `k` multiplies `-P` by `|k|`.
    pub fn scalar_multiply_signed(&self, k: &BigInt, point: &Point) -> Point {
        match k.sign() {
            Sign::Minus => self.scalar_multiply(k.magnitude(), &self.negate(point)),
            _ => self.scalar_multiply(k.magnitude(), point),
        }
    }

    /// Computes `k * P` with fixed windows of `width` bits, most significant first.
    ///
    /// `width` is clamped to `1..=8`.
    pub fn scalar_multiply_windowed(&self, k: &BigUint, point: &Point, width: u8) -> Point {
        if k.is_zero() || point.is_identity() {
            return Point::Identity;
        }

        let width = u64::from(width.clamp(1, MAX_WINDOW_WIDTH));
        let size = 1usize << width;
        let mut table = Vec::with_capacity(size);
        table.push(Point::Identity);
        for i in 1..size {
            table.push(self.add(&table[i - 1], point));
        }

        let windows = k.bits().div_ceil(width);
        let mut result = Point::Identity;
        for window in (0..windows).rev() {
            for _ in 0..width {
                result = self.double(&result);
            }

            let mut digit = 0usize;
            for bit in (0..width).rev() {
                digit = (digit << 1) | usize::from(k.bit(window * width + bit));
            }
            if digit != 0 {
                result = self.add(&result, &table[digit]);
            }
        }
        result
    }

    /// Computes `k * P` from the non-adjacent form of `k`.
    pub fn scalar_multiply_naf(&self, k: &BigUint, point: &Point) -> Point {
        if k.is_zero() || point.is_identity() {
            return Point::Identity;
        }

        let negated = self.negate(point);
        let mut result = Point::Identity;
        for digit in naf_digits(k).iter().rev() {
            result = self.double(&result);
            match digit {
                1 => result = self.add(&result, point),
                -1 => result = self.add(&result, &negated),
                _ => {}
            }
        }
        result
    }

    /// Computes `k * P` with the selected algorithm.
    pub fn scalar_multiply_with(
        &self,
        method: MultiplicationMethod,
        k: &BigUint,
        point: &Point,
    ) -> Point {
        match method {
            MultiplicationMethod::DoubleAndAdd => self.scalar_multiply(k, point),
            MultiplicationMethod::Windowed { width } => {
                self.scalar_multiply_windowed(k, point, width)
            }
            MultiplicationMethod::Naf => self.scalar_multiply_naf(k, point),
        }
    }

    fn chord(&self, slope: &BigUint, x1: &BigUint, x2: &BigUint, y1: &BigUint) -> Point {
        let p = self.p();
        let x3 = mod_sub(&((slope * slope) % p), &(x1 + x2), p);
        let y3 = mod_sub(&((slope * mod_sub(x1, &x3, p)) % p), y1, p);
        Point::new(x3, y3)
    }

    fn field_inverse(&self, value: &BigUint) -> BigUint {
        mod_inverse(value, self.p())
            .unwrap_or_else(|e| unreachable!("p is prime and the operand is non-zero: {e}"))
    }

    fn reduced(&self, point: &Point) -> Option<(BigUint, BigUint)> {
        match point {
            Point::Identity => None,
            Point::Affine { x, y } => Some((x % self.p(), y % self.p())),
        }
    }

    fn reduced_point(&self, point: &Point) -> Point {
        match self.reduced(point) {
            None => Point::Identity,
            Some((x, y)) => Point::new(x, y),
        }
    }
}

/// Non-adjacent form of `k`, least-significant digit first.
fn naf_digits(k: &BigUint) -> Vec<i8> {
    let mut k = k.clone();
    let mut digits = Vec::with_capacity(k.bits() as usize + 1);
    while !k.is_zero() {
        if k.bit(0) {
            if k.bit(1) {
                digits.push(-1);
                k += 1u32;
            } else {
                digits.push(1);
                k -= 1u32;
            }
        } else {
            digits.push(0);
        }
        k >>= 1usize;
    }
    digits
}
