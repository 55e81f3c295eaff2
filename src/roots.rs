//! Closed form inversion of Steinhart-Hart polynomials
//!
//! Recovering resistance from temperature means solving `p(w) = 1/T` for `w = ln(R)`. For the
//! two term model this is linear, for the three and four term models it is a cubic solved by
//! Cardano's formula.
use tracing::debug;

use crate::error::{Error, Result};
use crate::math::signed_cbrt;
use crate::{constant, Real};

/// Solve `a1 w + a0 = 0` for `w`
///
/// # Errors
/// [`Error::Domain`] if `a1` is zero.
pub fn solve_linear<E: Real>(a0: E, a1: E) -> Result<E> {
    if a1 == E::zero() {
        return Err(Error::Domain(
            "linear coefficient is zero, the polynomial cannot be inverted".into(),
        ));
    }
    Ok(-a0 / a1)
}

/// The unique real root of `a3 w^3 + a2 w^2 + a1 w + a0 = 0`
///
/// The cubic is normalised and depressed with `w = t - b/3`, giving `t^3 + p t + q = 0`, which
/// Cardano's formula solves whenever the discriminant `q^2/4 + p^3/27` is non-negative. A
/// negative discriminant means three distinct real roots. That case is not resolved: there is no
/// rule here for which of the three is the physical resistance.
///
/// # Errors
/// [`Error::Domain`] if `a3` is zero, if the cubic has three distinct real roots, or if the
/// root is not finite.
pub fn solve_cubic<E: Real>([a0, a1, a2, a3]: [E; 4]) -> Result<E> {
    if a3 == E::zero() {
        return Err(Error::Domain(
            "cubic coefficient is zero, the polynomial cannot be inverted as a cubic".into(),
        ));
    }

    let two = constant::<E>(2.);
    let three = constant::<E>(3.);
    let four = constant::<E>(4.);
    let twenty_seven = constant::<E>(27.);

    let b = a2 / a3;
    let c = a1 / a3;
    let d = a0 / a3;

    let q = two * b.powi(3) / twenty_seven - b * c / three + d;
    let p = c - b * b / three;
    let discriminant = q * q / four + p.powi(3) / twenty_seven;
    debug!(%p, %q, %discriminant, "depressed cubic");

    if discriminant < E::zero() {
        return Err(Error::Domain(format!(
            "cubic has three real roots (discriminant {discriminant:e}), the inverse is ambiguous"
        )));
    }

    let root = discriminant.sqrt();
    let u = signed_cbrt(-q / two + root);
    let v = -signed_cbrt(q / two + root);
    let w = u + v - b / three;

    if !w.is_finite() {
        return Err(Error::Domain(format!(
            "cubic root is not finite (p = {p:e}, q = {q:e})"
        )));
    }
    Ok(w)
}
