// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Classification of implicit conics.

use nalgebra::Matrix3;

use crate::bilinear::{HyperbolaCoefficients, RELATIVE_ZERO};

/// What kind of point set an implicit conic describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConicClass {
    /// A real, non-degenerate ellipse.
    Ellipse,
    Parabola,
    /// A non-degenerate hyperbola (two branches).
    Hyperbola,
    /// Two distinct lines, crossing or parallel.
    LinePair,
    /// One line (including a doubled line).
    SingleLine,
    /// A single isolated point.
    Point,
    /// No real points.
    Empty,
    /// Every coefficient vanishes: every point satisfies the equation.
    Coincident,
}

impl ConicClass {
    /// `true` for the classes that consist of lines or points only.
    pub fn is_degenerate(self) -> bool {
        !matches!(self, Self::Ellipse | Self::Parabola | Self::Hyperbola)
    }
}

/// `xx·x² + xy·x·y + yy·y² + xw·x + yw·y + ww = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImplicitConic {
    pub xx: f64,
    pub xy: f64,
    pub yy: f64,
    pub xw: f64,
    pub yw: f64,
    pub ww: f64,
}

impl ImplicitConic {
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.xx * x * x + self.xy * x * y + self.yy * y * y + self.xw * x + self.yw * y + self.ww
    }

    /// Symmetric 3×3 matrix of the homogeneous form.
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.xx,
            0.5 * self.xy,
            0.5 * self.xw,
            0.5 * self.xy,
            self.yy,
            0.5 * self.yw,
            0.5 * self.xw,
            0.5 * self.yw,
            self.ww,
        )
    }

    fn max_abs(&self) -> f64 {
        [self.xx, self.xy, self.yy, self.xw, self.yw, self.ww]
            .iter()
            .fold(0.0, |m, v| m.max(v.abs()))
    }

    fn scaled(&self, factor: f64) -> Self {
        Self {
            xx: self.xx * factor,
            xy: self.xy * factor,
            yy: self.yy * factor,
            xw: self.xw * factor,
            yw: self.yw * factor,
            ww: self.ww * factor,
        }
    }

    /// Classifies the conic. Coefficients are normalized by the largest one
    /// before any tolerance test, so the result does not depend on scale.
    pub fn classify(&self) -> ConicClass {
        let scale = self.max_abs();
        if scale == 0.0 {
            return ConicClass::Coincident;
        }
        let q = self.scaled(1.0 / scale);
        let eps = RELATIVE_ZERO;

        if q.xx.abs() <= eps && q.xy.abs() <= eps && q.yy.abs() <= eps {
            return if q.xw.abs() <= eps && q.yw.abs() <= eps {
                ConicClass::Empty
            } else {
                ConicClass::SingleLine
            };
        }

        // The discriminant is quadratic in the coefficients.
        let disc = q.xy * q.xy - 4.0 * q.xx * q.yy;
        let disc_eps = eps * eps;
        let det = q.matrix().determinant();

        if det.abs() <= eps {
            if disc > disc_eps {
                ConicClass::LinePair
            } else if disc < -disc_eps {
                ConicClass::Point
            } else {
                q.classify_parallel_lines()
            }
        } else if disc < -disc_eps {
            // Real only if the determinant and the trace disagree in sign.
            if det * (q.xx + q.yy) < 0.0 {
                ConicClass::Ellipse
            } else {
                ConicClass::Empty
            }
        } else if disc > disc_eps {
            ConicClass::Hyperbola
        } else {
            ConicClass::Parabola
        }
    }

    /// Degenerate parabolic case: the quadratic part is `k·l²` for a linear
    /// form `l`, and the whole conic is a quadratic in `l`.
    fn classify_parallel_lines(&self) -> ConicClass {
        let (k, alpha) = if self.xx.abs() >= self.yy.abs() {
            // l = x + (xy / 2xx)·y
            (self.xx, self.xw)
        } else {
            // l = (xy / 2yy)·x + y
            (self.yy, self.yw)
        };
        let disc = alpha * alpha - 4.0 * k * self.ww;
        if disc > RELATIVE_ZERO {
            ConicClass::LinePair
        } else if disc < -RELATIVE_ZERO {
            ConicClass::Empty
        } else {
            ConicClass::SingleLine
        }
    }
}

impl HyperbolaCoefficients {
    /// Classifies the zero set of the bilinear function.
    ///
    /// Only `Hyperbola`, `LinePair`, `SingleLine`, `Empty` and `Coincident`
    /// can occur. Tolerances are relative to the largest coefficient, so a
    /// small twist `c` still gives a hyperbola.
    pub fn classify(&self) -> ConicClass {
        let scale = self.max_abs();
        if scale == 0.0 {
            return ConicClass::Coincident;
        }
        let eps = RELATIVE_ZERO * scale;

        if self.c.abs() <= eps {
            return if self.a.abs() <= eps && self.b.abs() <= eps {
                ConicClass::Empty
            } else {
                ConicClass::SingleLine
            };
        }
        // f = c·(s - s0)·(t - t0) - (a·b - c·f0) / c
        if (self.a * self.b - self.c * self.f0).abs() <= eps * scale {
            ConicClass::LinePair
        } else {
            ConicClass::Hyperbola
        }
    }
}

impl From<&HyperbolaCoefficients> for ImplicitConic {
    /// The zero set of a bilinear function, with `x = s` and `y = t`.
    fn from(f: &HyperbolaCoefficients) -> Self {
        Self {
            xx: 0.0,
            xy: f.c,
            yy: 0.0,
            xw: f.a,
            yw: f.b,
            ww: f.f0,
        }
    }
}
