// Copyright 2025 the Pathfit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use crate::common::de_casteljau;
use crate::{ParamCurve, ParamCurveDeriv, Point, QuadBez};

/// A single cubic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs, reason = "control points are self-explanatory")]
pub struct CubicBez {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, p3: P) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// The control polygon, in order.
    #[inline]
    pub fn points(&self) -> [Point; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// Is this cubic finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.points().iter().all(|p| p.is_finite())
    }

    /// Find a better parameter for `target` using one Newton-Raphson step.
    ///
    /// Starting from the guess `t`, this moves the parameter towards a
    /// minimum of the squared distance between the curve and `target`,
    /// using the first and second derivatives of the curve. When the
    /// step's denominator is zero to within [`MACHINE_EPSILON`], the
    /// guess is returned unchanged.
    ///
    /// [`MACHINE_EPSILON`]: crate::common::MACHINE_EPSILON
    pub fn newton_step(&self, target: Point, t: f64) -> f64 {
        let deriv = self.deriv();
        let deriv2 = deriv.deriv();
        let diff = self.eval(t) - target;
        let d1 = deriv.eval(t).to_vec2();
        let d2 = deriv2.eval(t).to_vec2();
        let df = d1.dot(d1) + diff.dot(d2);
        if crate::common::is_machine_zero(df) {
            t
        } else {
            t - diff.dot(d1) / df
        }
    }
}

impl ParamCurve for CubicBez {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        de_casteljau(self.points(), t)
    }

    #[inline]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline]
    fn end(&self) -> Point {
        self.p3
    }
}

impl ParamCurveDeriv for CubicBez {
    type DerivResult = QuadBez;

    #[inline]
    fn deriv(&self) -> QuadBez {
        QuadBez::new(
            (3.0 * (self.p1 - self.p0)).to_point(),
            (3.0 * (self.p2 - self.p1)).to_point(),
            (3.0 * (self.p3 - self.p2)).to_point(),
        )
    }
}
