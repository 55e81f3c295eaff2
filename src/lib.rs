#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// #![warn(clippy::cargo)]

use std::fmt::{Debug, Display, LowerExp};

use ndarray::ScalarOperand;
use num_traits::{Float, NumCast};

pub mod basis;
pub mod config;
pub mod error;
pub mod math;
pub mod model;
pub mod polyfit;
pub mod report;
pub mod roots;
pub mod table;

#[cfg(test)]
pub(crate) mod test_utils;

pub use basis::Variant;
pub use error::{Error, Result};
pub use model::SteinhartHartModel;
pub use table::CalibrationTable;

/// Offset between the Celsius scale and absolute temperature
pub const TABS: f64 = -273.15;

/// Floating point scalar the fitting engine is generic over
///
/// Implemented for every type which satisfies the bounds, in practice `f32` and `f64`.
pub trait Real: Float + ScalarOperand + Debug + Display + LowerExp + Send + Sync {}

impl<T> Real for T where T: Float + ScalarOperand + Debug + Display + LowerExp + Send + Sync {}

/// Convert a constant into the working scalar type
///
/// # Panics
/// If `value` cannot be represented in `E`. Every constant the crate uses fits in an `f32`.
pub(crate) fn constant<E: Real>(value: f64) -> E {
    <E as NumCast>::from(value).expect("constant must fit in `E`")
}

/// The absolute-zero offset in the working scalar type
pub(crate) fn tabs<E: Real>() -> E {
    constant(TABS)
}

pub(crate) fn as_f64<E: Real>(value: E) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
