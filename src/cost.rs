//! Cost functions and their gradients.
//!
//! A cost function scores a feed-forward pass against the expected output;
//! its gradient with respect to the network's output seeds the backprop walk.

use crate::{Error, Matrix, Result};

/// Outputs are clamped this far away from 0 and 1 before the cross-entropy
/// log/division, so a saturated output yields a large finite value instead of
/// NaN or infinity.
const CROSS_ENTROPY_CLAMP: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cost {
    /// `C = 0.5 * sum((o - e)^2)`, gradient `o - e`.
    #[default]
    Quadratic,
    /// `C = -sum(e * ln(o) + (1 - e) * ln(1 - o))`, gradient
    /// `(o - e) / ((1 - o) * o)`.
    CrossEntropy,
}

impl Cost {
    /// The scalar cost of `output` against `expected`.
    pub fn value(&self, output: &Matrix, expected: &Matrix) -> Result<f64> {
        check_shapes(output, expected)?;
        match self {
            Cost::Quadratic => {
                let sum_squares: f64 = output
                    .values()
                    .iter()
                    .zip(expected.values())
                    .map(|(o, e)| (o - e) * (o - e))
                    .sum();
                Ok(0.5 * sum_squares)
            }
            Cost::CrossEntropy => {
                let sum: f64 = output
                    .values()
                    .iter()
                    .zip(expected.values())
                    .map(|(&o, &e)| {
                        let o = clamp_unit(o);
                        e * o.ln() + (1.0 - e) * (1.0 - o).ln()
                    })
                    .sum();
                Ok(-sum)
            }
        }
    }

    /// The gradient of the cost with respect to each output component.
    pub fn gradient(&self, output: &Matrix, expected: &Matrix) -> Result<Matrix> {
        check_shapes(output, expected)?;
        match self {
            Cost::Quadratic => output.subtract(expected),
            Cost::CrossEntropy => {
                let mut result = output.clone();
                for (r, &e) in result.values_mut().iter_mut().zip(expected.values()) {
                    let o = clamp_unit(*r);
                    *r = (o - e) / ((1.0 - o) * o);
                }
                Ok(result)
            }
        }
    }
}

fn check_shapes(output: &Matrix, expected: &Matrix) -> Result<()> {
    if output.rows() != expected.rows() || output.columns() != expected.columns() {
        return Err(Error::MatrixDimensionMismatch {
            expected: output.rows(),
            got: expected.rows(),
        });
    }
    Ok(())
}

#[inline]
fn clamp_unit(o: f64) -> f64 {
    o.clamp(CROSS_ENTROPY_CLAMP, 1.0 - CROSS_ENTROPY_CLAMP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_cost_of_equal_vectors_is_exactly_zero() {
        let o = Matrix::column(&[0.2, 0.8, -1.0]).unwrap();
        assert_eq!(Cost::Quadratic.value(&o, &o).unwrap(), 0.0);

        let g = Cost::Quadratic.gradient(&o, &o).unwrap();
        assert!(g.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn quadratic_cost_matches_hand_computation() {
        let o = Matrix::column(&[1.0, 3.0]).unwrap();
        let e = Matrix::column(&[2.0, 1.0]).unwrap();
        // 0.5 * ((-1)^2 + 2^2) = 2.5
        assert!((Cost::Quadratic.value(&o, &e).unwrap() - 2.5).abs() < 1e-12);

        let g = Cost::Quadratic.gradient(&o, &e).unwrap();
        assert_eq!(g.to_column_vec().unwrap(), vec![-1.0, 2.0]);
    }

    #[test]
    fn cross_entropy_is_small_for_confident_correct_output() {
        let o = Matrix::column(&[0.99, 0.01]).unwrap();
        let e = Matrix::column(&[1.0, 0.0]).unwrap();
        let cost = Cost::CrossEntropy.value(&o, &e).unwrap();
        assert!(cost > 0.0 && cost < 0.05);
    }

    #[test]
    fn cross_entropy_stays_finite_at_saturation() {
        let o = Matrix::column(&[1.0, 0.0]).unwrap();
        let e = Matrix::column(&[0.0, 1.0]).unwrap();

        let cost = Cost::CrossEntropy.value(&o, &e).unwrap();
        assert!(cost.is_finite());
        assert!(cost > 10.0);

        let g = Cost::CrossEntropy.gradient(&o, &e).unwrap();
        assert!(g.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn cross_entropy_gradient_points_away_from_the_target() {
        let o = Matrix::column(&[0.7]).unwrap();
        let e = Matrix::column(&[1.0]).unwrap();
        let g = Cost::CrossEntropy.gradient(&o, &e).unwrap();
        // Output below target: gradient must be negative.
        assert!(g.get(0, 0) < 0.0);
        let expected = (0.7 - 1.0) / ((1.0 - 0.7) * 0.7);
        assert!((g.get(0, 0) - expected).abs() < 1e-12);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let o = Matrix::column(&[0.5, 0.5]).unwrap();
        let e = Matrix::column(&[1.0]).unwrap();
        assert!(Cost::Quadratic.value(&o, &e).is_err());
        assert!(Cost::CrossEntropy.gradient(&o, &e).is_err());
    }
}
