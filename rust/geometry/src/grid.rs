// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Strided control grids and tensor-product bezier evaluation.
//!
//! A grid of `i_count × j_count` scalar control values defines the bezier
//! function
//!
//! ```text
//! F(u, v) = Σ_i Σ_j B_i(u) B_j(v) P[i, j]
//! ```
//!
//! of degree `i_count - 1` in `u` and `j_count - 1` in `v`. The same values,
//! placed at uniform parameters `(i·du, j·dv)`, form the piecewise bilinear
//! control polygon that the cell-by-cell intersectors work on.

use smallvec::SmallVec;

use crate::bilinear::HyperbolaCoefficients;
use crate::error::{Error, Result};

/// Bernstein values (or derivatives) for one direction.
pub type Basis = SmallVec<[f64; 8]>;

/// A read-only view of scalar control values laid out with arbitrary strides.
#[derive(Debug, Clone, Copy)]
pub struct ControlGrid<'a> {
    values: &'a [f64],
    i_count: usize,
    i_stride: usize,
    j_count: usize,
    j_stride: usize,
}

impl<'a> ControlGrid<'a> {
    /// Wraps `values` so that `value(i, j) = values[i * i_stride + j * j_stride]`.
    pub fn new(
        values: &'a [f64],
        i_count: usize,
        i_stride: usize,
        j_count: usize,
        j_stride: usize,
    ) -> Result<Self> {
        if i_count < 2 || j_count < 2 {
            return Err(Error::InvalidGrid(format!(
                "need at least 2x2 control values, got {i_count}x{j_count}"
            )));
        }
        let last = (i_count - 1)
            .checked_mul(i_stride)
            .and_then(|di| {
                (j_count - 1)
                    .checked_mul(j_stride)
                    .and_then(|dj| di.checked_add(dj))
            })
            .ok_or_else(|| Error::InvalidGrid("stride overflow".to_string()))?;
        if last >= values.len() {
            return Err(Error::InvalidGrid(format!(
                "index {last} out of range for {} values",
                values.len()
            )));
        }
        Ok(Self {
            values,
            i_count,
            i_stride,
            j_count,
            j_stride,
        })
    }

    /// Row-major grid: `i` varies fastest.
    pub fn row_major(values: &'a [f64], i_count: usize, j_count: usize) -> Result<Self> {
        Self::new(values, i_count, 1, j_count, i_count)
    }

    #[inline]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.i_stride + j * self.j_stride]
    }

    pub fn counts(&self) -> (usize, usize) {
        (self.i_count, self.j_count)
    }

    /// Number of bilinear cells in each direction.
    pub fn cell_count(&self) -> (usize, usize) {
        (self.i_count - 1, self.j_count - 1)
    }

    /// Parametric width of one cell in `u`.
    pub fn du(&self) -> f64 {
        1.0 / (self.i_count - 1) as f64
    }

    /// Parametric height of one cell in `v`.
    pub fn dv(&self) -> f64 {
        1.0 / (self.j_count - 1) as f64
    }

    /// Bilinear coefficients of cell `(i, j)` after subtracting `level`.
    pub fn cell(&self, i: usize, j: usize, level: f64) -> HyperbolaCoefficients {
        HyperbolaCoefficients::from_corners(
            self.value(i, j) - level,
            self.value(i + 1, j) - level,
            self.value(i, j + 1) - level,
            self.value(i + 1, j + 1) - level,
        )
    }

    /// Evaluates the bezier function at `(u, v)`.
    pub fn evaluate(&self, u: f64, v: f64) -> f64 {
        let bu = bernstein(self.i_count - 1, u);
        let bv = bernstein(self.j_count - 1, v);
        self.contract(&bu, &bv)
    }

    /// Evaluates the bezier function and its partial derivatives.
    ///
    /// Returns `(f, df/du, df/dv)`.
    pub fn evaluate_with_derivatives(&self, u: f64, v: f64) -> (f64, f64, f64) {
        let (bu, dbu) = bernstein_with_derivative(self.i_count - 1, u);
        let (bv, dbv) = bernstein_with_derivative(self.j_count - 1, v);
        (
            self.contract(&bu, &bv),
            self.contract(&dbu, &bv),
            self.contract(&bu, &dbv),
        )
    }

    fn contract(&self, wu: &[f64], wv: &[f64]) -> f64 {
        let mut sum = 0.0;
        for (j, &bj) in wv.iter().enumerate() {
            let row: f64 = wu
                .iter()
                .enumerate()
                .map(|(i, &bi)| bi * self.value(i, j))
                .sum();
            sum += bj * row;
        }
        sum
    }
}

/// Bernstein basis values of the given degree at `t`.
pub fn bernstein(degree: usize, t: f64) -> Basis {
    let s = 1.0 - t;
    let mut basis = Basis::with_capacity(degree + 1);
    basis.push(1.0);
    for k in 1..=degree {
        basis.push(0.0);
        for i in (1..=k).rev() {
            basis[i] = s * basis[i] + t * basis[i - 1];
        }
        basis[0] *= s;
    }
    basis
}

/// Bernstein basis values and their derivatives with respect to `t`.
pub fn bernstein_with_derivative(degree: usize, t: f64) -> (Basis, Basis) {
    if degree == 0 {
        return (Basis::from_slice(&[1.0]), Basis::from_slice(&[0.0]));
    }
    let lower = bernstein(degree - 1, t);
    let n = degree as f64;
    let derivative = (0..=degree)
        .map(|i| {
            let left = if i > 0 { lower[i - 1] } else { 0.0 };
            let right = lower.get(i).copied().unwrap_or(0.0);
            n * (left - right)
        })
        .collect();
    (bernstein(degree, t), derivative)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn bernstein_partitions_unity() {
        for degree in 0..6 {
            for k in 0..=10 {
                let t = k as f64 / 10.0;
                let sum: f64 = bernstein(degree, t).iter().sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn cubic_basis_at_midpoint() {
        let b = bernstein(3, 0.5);
        assert_relative_eq!(b[0], 0.125);
        assert_relative_eq!(b[1], 0.375);
        assert_relative_eq!(b[2], 0.375);
        assert_relative_eq!(b[3], 0.125);
    }

    #[test]
    fn derivatives_sum_to_zero() {
        let (_, d) = bernstein_with_derivative(4, 0.3);
        let sum: f64 = d.iter().sum();
        assert_relative_eq!(sum, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_small_or_short_grids() {
        let values = [0.0; 4];
        assert!(ControlGrid::new(&values, 1, 1, 4, 1).is_err());
        assert!(ControlGrid::new(&values, 2, 1, 3, 2).is_err());
        assert!(ControlGrid::row_major(&values, 2, 2).is_ok());
    }

    #[test]
    fn strided_access() {
        // Column-major 3 x 2 grid.
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let grid = ControlGrid::new(&values, 3, 2, 2, 1).unwrap();
        assert_eq!(grid.value(0, 0), 0.0);
        assert_eq!(grid.value(0, 1), 1.0);
        assert_eq!(grid.value(2, 0), 4.0);
        assert_eq!(grid.cell_count(), (2, 1));
        assert_relative_eq!(grid.du(), 0.5);
        assert_relative_eq!(grid.dv(), 1.0);
    }

    #[test]
    fn quadratic_in_u_reproduces_square() {
        // u^2 = B_2(u); constant in v.
        let values = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
        let grid = ControlGrid::row_major(&values, 3, 2).unwrap();
        for k in 0..=8 {
            let u = k as f64 / 8.0;
            let (f, fu, fv) = grid.evaluate_with_derivatives(u, 0.7);
            assert_relative_eq!(f, u * u, epsilon = 1e-14);
            assert_relative_eq!(fu, 2.0 * u, epsilon = 1e-14);
            assert_relative_eq!(fv, 0.0, epsilon = 1e-14);
            assert_relative_eq!(grid.evaluate(u, 0.2), u * u, epsilon = 1e-14);
        }
    }

    #[test]
    fn uniform_control_values_reproduce_linear_function() {
        // Control values placed at uniform parameters reproduce u + 2v.
        let (ni, nj) = (4, 3);
        let mut values = Vec::new();
        for j in 0..nj {
            for i in 0..ni {
                values.push(i as f64 / 3.0 + 2.0 * j as f64 / 2.0);
            }
        }
        let grid = ControlGrid::row_major(&values, ni, nj).unwrap();
        let (f, fu, fv) = grid.evaluate_with_derivatives(0.25, 0.6);
        assert_relative_eq!(f, 0.25 + 1.2, epsilon = 1e-13);
        assert_relative_eq!(fu, 1.0, epsilon = 1e-13);
        assert_relative_eq!(fv, 2.0, epsilon = 1e-13);
    }
}
