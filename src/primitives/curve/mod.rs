/// Group law and scalar multiplication.
pub mod arithmetic;
/// Point encodings.
pub mod encoding;
/// Curve domain parameters.
pub mod params;
/// Affine point representation.
pub mod point;

pub use arithmetic::MultiplicationMethod;
pub use params::DomainParameters;
pub use point::Point;
