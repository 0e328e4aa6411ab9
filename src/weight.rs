//! Edge-weight abstraction.
//!
//! The engine is instantiated over a single floating-point weight type;
//! there is no runtime dispatch between precisions.

use core::fmt;
use core::iter::Sum;
use core::ops::{AddAssign, SubAssign};

use num_traits::Float;

/// Floating-point type carrying edge weights and modularity values.
///
/// Implemented for `f32` and `f64`. All arithmetic inside the engine
/// (vertex weights, cluster weights, modularity, move gains) happens in
/// this type.
pub trait Weight:
    Float + Sum + AddAssign + SubAssign + Send + Sync + fmt::Debug + fmt::Display + 'static
{
    /// Convert a configuration value (always given as `f64`) into the
    /// weight type.
    fn from_f64(value: f64) -> Self;
}

impl Weight for f32 {
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Weight for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }
}
