use std::fmt;

use num_bigint::BigUint;

/// Point on a short Weierstrass curve in affine coordinates.
///
/// The derived equality matches the group semantics: two identities are equal, an
/// identity never equals a finite point, and finite points compare coordinate-wise.
/// Points are plain values; every curve operation returns a new one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Point {
    /// The point at infinity, the neutral element of the group.
    #[default]
    Identity,
    /// A finite point `(x, y)` over `Z_p`.
    Affine {
        /// The x-coordinate.
        x: BigUint,
        /// The y-coordinate.
        y: BigUint,
    },
}

impl Point {
    /// Creates a finite point. Use [`DomainParameters::is_on_curve`] to validate it.
    ///
    /// [`DomainParameters::is_on_curve`]: crate::DomainParameters::is_on_curve
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Point::Affine { x, y }
    }

    /// Returns the neutral element.
    pub fn identity() -> Self {
        Point::Identity
    }

    /// Checks if this is the neutral element.
    pub fn is_identity(&self) -> bool {
        matches!(self, Point::Identity)
    }

    /// Returns the x-coordinate of a finite point.
    pub fn x(&self) -> Option<&BigUint> {
        match self {
            Point::Identity => None,
            Point::Affine { x, .. } => Some(x),
        }
    }

    /// Returns the y-coordinate of a finite point.
    pub fn y(&self) -> Option<&BigUint> {
        match self {
            Point::Identity => None,
            Point::Affine { y, .. } => Some(y),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Point::Identity => write!(f, "Point(identity)"),
            Point::Affine { x, y } => write!(f, "Point({x:#x}, {y:#x})"),
        }
    }
}
