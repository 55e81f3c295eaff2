use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::Real;

/// Number of coefficients in every Steinhart-Hart polynomial, degrees 0 through 3 in `ln(R)`
pub const COEFFICIENTS: usize = 4;

/// The subspace of cubics in `ln(R)` a model is fitted in
///
/// The variant is chosen once when a model is built. It fixes both the canonical basis handed to
/// the fitter and the algorithm used to invert the fitted polynomial.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// `1/T = a0 + a1 ln(R)`, the beta equation
    Simplified,
    /// `1/T = a0 + a1 ln(R) + a3 ln(R)^3`, the classic Steinhart-Hart equation
    Standard,
    /// The full cubic `1/T = a0 + a1 ln(R) + a2 ln(R)^2 + a3 ln(R)^3`
    Extended,
}

impl Variant {
    pub const ALL: [Self; 3] = [Self::Simplified, Self::Standard, Self::Extended];

    /// Degrees of `ln(R)` spanned by the variant, in basis order
    pub const fn degrees(self) -> &'static [usize] {
        match self {
            Self::Simplified => &[0, 1],
            Self::Standard => &[0, 1, 3],
            Self::Extended => &[0, 1, 2, 3],
        }
    }

    /// Number of basis vectors, and so the minimum number of samples a fit needs
    pub const fn dimension(self) -> usize {
        self.degrees().len()
    }

    /// The canonical monomial basis as a (dimension x 4) matrix
    ///
    /// Row `i` is the coefficient vector of the monomial `ln(R)^degrees[i]`, zero padded.
    pub fn canonical_basis<E: Real>(self) -> Array2<E> {
        let mut basis = Array2::zeros((self.dimension(), COEFFICIENTS));
        for (row, &degree) in self.degrees().iter().enumerate() {
            basis[[row, degree]] = E::one();
        }
        basis
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Simplified => "simplified",
            Self::Standard => "standard",
            Self::Extended => "extended",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown model variant `{s}`, expected one of simplified, standard, extended")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{Variant, COEFFICIENTS};

    use ndarray::{arr2, Array2};

    #[test]
    fn standard_basis_omits_the_quadratic_term() {
        let basis: Array2<f64> = Variant::Standard.canonical_basis();
        let expected = arr2(&[[1., 0., 0., 0.], [0., 1., 0., 0.], [0., 0., 0., 1.]]);
        assert_eq!(basis, expected);
        assert!(basis.column(2).iter().all(|&c| c == 0.));
    }

    #[test]
    fn extended_basis_is_the_identity() {
        let basis: Array2<f64> = Variant::Extended.canonical_basis();
        assert_eq!(basis, Array2::eye(COEFFICIENTS));
    }

    #[test]
    fn simplified_basis_spans_the_first_two_degrees() {
        let basis: Array2<f64> = Variant::Simplified.canonical_basis();
        assert_eq!(basis, arr2(&[[1., 0., 0., 0.], [0., 1., 0., 0.]]));
        assert_eq!(Variant::Simplified.dimension(), 2);
    }

    #[test]
    fn variants_parse_from_their_names() {
        for variant in Variant::ALL {
            assert_eq!(variant.to_string().parse::<Variant>().unwrap(), variant);
        }
        assert_eq!("Extended".parse::<Variant>().unwrap(), Variant::Extended);
        assert!("quadratic".parse::<Variant>().is_err());
    }
}
