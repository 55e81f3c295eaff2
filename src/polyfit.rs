//! Discrete least-squares fitting of Steinhart-Hart polynomials
//!
//! The calibration samples are mapped to `x = ln(R)` and `y = 1 / (T - TABS)`. The samples
//! induce an inner product on cubics in `x`
//!
//! $$
//!     \langle p, q \rangle = \sum_i p(x_i) q(x_i)
//! $$
//!
//! under which the canonical basis of the chosen [`Variant`] is orthonormalised by Gram-Schmidt.
//! Projecting `y` onto the orthonormal basis then gives the least-squares polynomial directly,
//! with no linear system to solve.
use ndarray::{Array1, Array2, ArrayView1};
use tracing::{debug, info, warn};

use crate::basis::{Variant, COEFFICIENTS};
use crate::error::{Error, Result};
use crate::math::{value, vandermonde};
use crate::table::CalibrationTable;
use crate::{tabs, Real};

/// Calibration samples in fitting coordinates
#[derive(Clone, Debug)]
pub struct Samples<E> {
    /// `ln(R)` for every sample
    x: Vec<E>,
    /// `1 / (T - TABS)` for every sample, the inverse absolute temperature
    y: Vec<E>,
}

impl<E: Real> Samples<E> {
    /// Map every row of `table` to fitting coordinates, in ascending temperature order
    pub fn from_table(table: &CalibrationTable<E>) -> Self {
        let (x, y) = table
            .iter()
            .map(|(temperature, resistance)| {
                (resistance.ln(), E::one() / (temperature - tabs()))
            })
            .unzip();
        Self { x, y }
    }

    pub fn x(&self) -> &[E] {
        &self.x
    }

    pub fn y(&self) -> &[E] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// The discrete inner product of polynomials `p` and `q` over the sample points
    pub fn inner_product(&self, p: ArrayView1<E>, q: ArrayView1<E>) -> E {
        self.x
            .iter()
            .fold(E::zero(), |acc, &xi| acc + value(p, xi) * value(q, xi))
    }

    /// The inner product of `p` with the observed inverse temperatures
    pub fn cross_term(&self, p: ArrayView1<E>) -> E {
        self.x
            .iter()
            .zip(&self.y)
            .fold(E::zero(), |acc, (&xi, &yi)| acc + yi * value(p, xi))
    }

    /// Sum of squared differences between `coefficients` evaluated at every `x` and `y`
    pub fn residual_sum_of_squares(&self, coefficients: ArrayView1<E>) -> E {
        self.residuals(coefficients)
            .fold(E::zero(), |acc, residual| acc + residual * residual)
    }

    fn residuals(&self, coefficients: ArrayView1<E>) -> impl Iterator<Item = E> + '_ {
        let fitted = vandermonde(&self.x, coefficients.len().saturating_sub(1)).dot(&coefficients);
        self.y
            .iter()
            .zip(fitted.into_raw_vec())
            .map(|(&yi, fi)| yi - fi)
    }
}

/// Orthonormalise the rows of `basis` under the sample inner product
///
/// Rows are processed in order. Each has its projection onto every earlier orthonormal row
/// removed, and is then scaled to unit norm.
///
/// # Errors
/// [`Error::DegenerateFit`] if a row has no component left after the projections are removed,
/// which happens when the samples are not distinct enough in `x` to span the basis.
pub fn orthonormalize<E: Real>(basis: &Array2<E>, samples: &Samples<E>) -> Result<Array2<E>> {
    let mut orthonormal: Array2<E> = Array2::zeros(basis.raw_dim());

    for (ii, canonical) in basis.outer_iter().enumerate() {
        let mut vector = canonical.to_owned();
        let initial_norm = samples.inner_product(vector.view(), vector.view());

        for previous in orthonormal.outer_iter().take(ii) {
            let factor = samples.inner_product(vector.view(), previous);
            vector.scaled_add(-factor, &previous);
        }

        // Cancellation leaves a residual of order epsilon relative to the initial vector when
        // the row lies in the span of the earlier ones
        let norm = samples.inner_product(vector.view(), vector.view());
        if !norm.is_finite() || norm <= E::epsilon() * initial_norm {
            warn!(
                basis_vector = ii,
                %norm,
                %initial_norm,
                "basis vector collapsed during orthonormalisation"
            );
            return Err(Error::DegenerateFit(format!(
                "basis vector {ii} has vanishing norm {norm:e} over {} samples; the samples \
                 are not distinct enough in ln(R) for this basis",
                samples.len()
            )));
        }

        let scale = norm.sqrt();
        vector.mapv_inplace(|coefficient| coefficient / scale);
        debug!(basis_vector = ii, %norm, "orthonormalised basis vector");
        orthonormal.row_mut(ii).assign(&vector);
    }

    Ok(orthonormal)
}

/// Project the observed inverse temperatures onto an orthonormal basis
///
/// The result is the best-fit polynomial in the span of `orthonormal`, as a zero padded
/// coefficient vector.
pub fn project<E: Real>(orthonormal: &Array2<E>, samples: &Samples<E>) -> Array1<E> {
    let mut solution = Array1::zeros(orthonormal.ncols());
    for vector in orthonormal.outer_iter() {
        let weight = samples.cross_term(vector);
        solution.scaled_add(weight, &vector);
    }
    solution
}

/// The outcome of fitting a variant to a set of samples
#[derive(Clone, Debug)]
pub struct FitResult<E> {
    variant: Variant,
    /// Rows are the orthonormalised basis vectors, in basis order
    orthonormal_basis: Array2<E>,
    /// Best-fit coefficients, lowest degree first
    solution: Array1<E>,
    residual_sum_of_squares: E,
    max_residual: E,
}

impl<E: Real> FitResult<E> {
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    pub const fn orthonormal_basis(&self) -> &Array2<E> {
        &self.orthonormal_basis
    }

    pub const fn solution(&self) -> &Array1<E> {
        &self.solution
    }

    /// `sum_i (y_i - p(x_i))^2` at the best fit, in `1/K^2`
    pub const fn residual_sum_of_squares(&self) -> E {
        self.residual_sum_of_squares
    }

    /// `max_i |y_i - p(x_i)|` at the best fit, in `1/K`
    pub const fn max_residual(&self) -> E {
        self.max_residual
    }
}

/// Fit the subspace spanned by `variant` to `samples` by discrete least squares
///
/// # Errors
/// [`Error::DegenerateFit`] if there are fewer samples than basis vectors, or if the samples do
/// not span the basis.
pub fn fit<E: Real>(samples: &Samples<E>, variant: Variant) -> Result<FitResult<E>> {
    if samples.len() < variant.dimension() {
        return Err(Error::DegenerateFit(format!(
            "the {variant} basis has dimension {} but only {} samples were provided",
            variant.dimension(),
            samples.len()
        )));
    }

    let basis = variant.canonical_basis();
    let orthonormal_basis = orthonormalize(&basis, samples)?;
    let solution = project(&orthonormal_basis, samples);
    debug_assert_eq!(solution.len(), COEFFICIENTS);

    let residual_sum_of_squares = samples.residual_sum_of_squares(solution.view());
    let max_residual = samples
        .residuals(solution.view())
        .fold(E::zero(), |acc, residual| acc.max(residual.abs()));

    info!(
        %variant,
        samples = samples.len(),
        %residual_sum_of_squares,
        "fitted Steinhart-Hart polynomial"
    );

    Ok(FitResult {
        variant,
        orthonormal_basis,
        solution,
        residual_sum_of_squares,
        max_residual,
    })
}
