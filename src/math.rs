use ndarray::{Array2, ArrayView1};

use crate::Real;

/// Evaluate the polynomial with `coefficients` at `x` using Horner's scheme
///
/// Coefficients are stored lowest degree first, so `coefficients[i]` multiplies `x^i`. The
/// evaluation runs from the highest degree down, in a single multiply-add per coefficient.
///
/// # Examples
///
/// ```
/// use ndarray::arr1;
/// use steinhart_hart::math::value;
///
/// // 1 + 2x + 3x^2 at x = 2
/// let coefficients = arr1(&[1.0, 2.0, 3.0, 0.0]);
/// assert_eq!(value(coefficients.view(), 2.0), 17.0);
/// ```
pub fn value<E: Real>(coefficients: ArrayView1<E>, x: E) -> E {
    coefficients
        .iter()
        .rev()
        .fold(E::zero(), |acc, &coefficient| acc * x + coefficient)
}

/// Real cube root which keeps the sign of its argument
///
/// A generic power function is undefined for a negative base under a fractional exponent, so
/// the root is taken on the magnitude and the sign restored afterwards.
///
/// # Examples
///
/// ```
/// use steinhart_hart::math::signed_cbrt;
///
/// approx::assert_relative_eq!(signed_cbrt(-27.0), -3.0);
/// approx::assert_relative_eq!(signed_cbrt(8.0), 2.0);
/// ```
pub fn signed_cbrt<E: Real>(v: E) -> E {
    if v == E::zero() {
        return v;
    }
    let magnitude = v.abs().cbrt();
    if v < E::zero() {
        -magnitude
    } else {
        magnitude
    }
}

/// Generate the Vandermonde matrix of `degree` for observations `x`
///
/// The Vandermonde matrix is a (n x degree + 1) matrix. Each row of the matrix is a geometric
/// progression for an individual observation `x` from power `0` to `degree` inclusive, so
/// multiplying it with a coefficient vector evaluates that polynomial at every observation.
///
/// # Panics
///
/// The generator panics in the event that `degree` cannot be converted to `i32`. The fitting
/// engine never asks for more than a cubic so this does not need to be gracefully handled.
///
/// # Examples
///
/// ```
/// use steinhart_hart::math::vandermonde;
/// use ndarray::arr2;
///
/// let observations: Vec<f64> = vec![2., 3.];
/// let vander = vandermonde(&observations, 2);
///
/// let expected = arr2(&[[1., 2., 4.], [1., 3., 9.]]);
/// assert_eq!(vander, expected);
/// ```
pub fn vandermonde<E: Real>(x: &[E], degree: usize) -> Array2<E> {
    Array2::from_shape_fn((x.len(), degree + 1), |(ii, jj)| {
        x[ii].powi(i32::try_from(jj).expect("{jj} doesn't fit in `i32`"))
    })
}
