// Copyright 2025 the Pathfit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting cubic Béziers to a sequence of points.
//!
//! This is the classic least-squares approach from Philip J. Schneider's
//! "An Algorithm for Automatically Fitting Digitized Curves" (Graphics
//! Gems, 1990). A range of points is given a chord-length parameterization,
//! the two inner control points are placed by solving a small linear system
//! with the end tangents held fixed, and the parameterization is refined by
//! Newton-Raphson iteration. When a range cannot be fit within the
//! tolerance it is split at the worst fitting point and both halves are fit
//! recursively.
//!
//! The result is greedy: it is usually compact, but it is not the minimum
//! number of segments that could represent the input.

use alloc::vec::Vec;
use core::fmt;

use log::{debug, trace};
use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;
use crate::common::MACHINE_EPSILON;
use crate::{BezPath, CubicBez, CurveSegment, ParamCurve, Point, Vec2};

/// The tolerance used by [`FitOptions::default`].
pub const DEFAULT_TOLERANCE: f64 = 2.5;

/// How many candidate curves are tried on one range before splitting it.
const MAX_ATTEMPTS: usize = 5;

/// Parameter values for one range of points.
///
/// Kept inline for short ranges, which is what deep recursion produces.
type Params = SmallVec<[f64; 32]>;

/// An error when fitting curves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FitError {
    /// The tolerance was zero, negative or NaN.
    InvalidTolerance(f64),
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitError::InvalidTolerance(tolerance) => {
                write!(f, "fit tolerance must be positive, got {tolerance}")
            }
        }
    }
}

impl core::error::Error for FitError {}

/// Options for [`fit_polyline`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitOptions {
    tolerance: f64,
    closed: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions {
            tolerance: DEFAULT_TOLERANCE,
            closed: false,
        }
    }
}

impl FitOptions {
    /// Set the error tolerance.
    ///
    /// This bounds the squared distance between each input point and the
    /// fitted curve, in the units of the input coordinates. The default is
    /// [`DEFAULT_TOLERANCE`].
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Treat the points as a closed ring.
    #[must_use]
    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    /// The configured error tolerance.
    pub fn get_tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Whether the points are treated as a closed ring.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// A sequence of points prepared for curve fitting.
///
/// Construction copies the input, dropping adjacent duplicates. For a
/// closed ring the copy is extended by one point at each end (the last
/// point in front, the first point behind) so the seam is fit like any
/// interior point; the two extra anchors are removed from the result of
/// [`fit`](PathFitter::fit).
///
/// # Examples
///
/// ```
/// use pathfit::{PathFitter, Point};
///
/// let points = (0..=20).map(|i| {
///     let x = i as f64;
///     Point::new(x, 0.05 * x * x)
/// });
/// let segments = PathFitter::new(points, false).fit(0.5).unwrap();
/// assert_eq!(segments.first().unwrap().point, Point::new(0.0, 0.0));
/// assert_eq!(segments.last().unwrap().point, Point::new(20.0, 20.0));
/// ```
#[derive(Clone, Debug)]
pub struct PathFitter {
    points: Vec<Point>,
    closed: bool,
}

impl PathFitter {
    /// Prepare `points` for fitting.
    pub fn new(points: impl IntoIterator<Item = Point>, closed: bool) -> PathFitter {
        let mut deduped: Vec<Point> = Vec::new();
        for p in points {
            if deduped.last() != Some(&p) {
                deduped.push(p);
            }
        }
        // A single point has no seam to wrap around.
        let closed = closed && deduped.len() > 1;
        if closed {
            if deduped.first() == deduped.last() {
                deduped.pop();
            }
            let last = deduped[deduped.len() - 1];
            deduped.insert(0, last);
            // The original first point is now at index 1.
            deduped.push(deduped[1]);
        }
        PathFitter {
            points: deduped,
            closed,
        }
    }

    /// The prepared points, including the wrap-around points of a closed ring.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Whether the points are fit as a closed ring.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Fit cubic Béziers to the points.
    ///
    /// `tolerance` bounds the squared distance between each point and the
    /// fitted curve. The first segment of an open result has no incoming
    /// handle; segments come out in the order of the input points.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::InvalidTolerance`] unless `tolerance` is
    /// strictly positive.
    pub fn fit(&self, tolerance: f64) -> Result<Vec<CurveSegment>, FitError> {
        if !(tolerance > 0.0) {
            return Err(FitError::InvalidTolerance(tolerance));
        }
        let Some(&first) = self.points.first() else {
            return Ok(Vec::new());
        };
        let mut segments = Vec::new();
        segments.push(CurveSegment::new(first));
        let n = self.points.len();
        if n > 1 {
            let tan1 = self.points[1] - self.points[0];
            let tan2 = self.points[n - 2] - self.points[n - 1];
            self.fit_cubic(&mut segments, tolerance, 0, n - 1, tan1, tan2);
            if self.closed {
                segments.remove(0);
                segments.pop();
            }
        }
        debug!(
            "fit {} points (closed: {}) at tolerance {} into {} segments",
            n,
            self.closed,
            tolerance,
            segments.len()
        );
        Ok(segments)
    }

    /// Fit the points `first..=last`, leaving with the given tangent directions.
    ///
    /// `tan1` points from `first` into the range and `tan2` from `last`
    /// back into the range; neither needs to be normalized.
    fn fit_cubic(
        &self,
        segments: &mut Vec<CurveSegment>,
        error: f64,
        first: usize,
        last: usize,
        tan1: Vec2,
        tan2: Vec2,
    ) {
        if last - first == 1 {
            let pt1 = self.points[first];
            let pt2 = self.points[last];
            let dist = pt1.distance(pt2) / 3.0;
            let curve = CubicBez::new(
                pt1,
                pt1 + tan1.normalize_to(dist),
                pt2 + tan2.normalize_to(dist),
                pt2,
            );
            add_curve(segments, &curve);
            return;
        }

        let mut u = self.chord_length_parameterize(first, last);
        let mut max_error = error.max(error * error);
        let mut split = first + (last - first + 1) / 2;
        let mut params_in_order = true;
        let mut worst = 0.0;

        for _ in 0..MAX_ATTEMPTS {
            let curve = self.generate_bezier(first, last, &u, tan1, tan2);
            let (max, index) = self.find_max_error(first, last, &curve, &u);
            if max < error && params_in_order {
                add_curve(segments, &curve);
                return;
            }
            split = index;
            worst = max;
            // Beyond this, reparameterizing is unlikely to bring the error down.
            if max >= max_error {
                break;
            }
            params_in_order = self.reparameterize(first, last, &mut u, &curve);
            max_error = max;
        }

        trace!("splitting {first}..={last} at {split}, squared error {worst}");
        let tan_center = self.points[split - 1] - self.points[split + 1];
        self.fit_cubic(segments, error, first, split, tan1, tan_center);
        self.fit_cubic(segments, error, split, last, -tan_center, tan2);
    }

    /// Place the inner control points by least squares.
    ///
    /// The end points are fixed at `first` and `last` and the handles are
    /// fixed in direction, so only the two handle lengths are solved for.
    fn generate_bezier(
        &self,
        first: usize,
        last: usize,
        u_prime: &[f64],
        tan1: Vec2,
        tan2: Vec2,
    ) -> CubicBez {
        let pt1 = self.points[first];
        let pt2 = self.points[last];
        let mut c = [[0.0; 2]; 2];
        let mut x = [0.0; 2];

        for (&u, &p) in u_prime.iter().zip(&self.points[first..=last]) {
            let t = 1.0 - u;
            let b = 3.0 * u * t;
            let b0 = t * t * t;
            let b1 = b * t;
            let b2 = b * u;
            let b3 = u * u * u;
            let a1 = tan1.normalize_to(b1);
            let a2 = tan2.normalize_to(b2);
            let tmp = p.to_vec2() - pt1.to_vec2() * (b0 + b1) - pt2.to_vec2() * (b2 + b3);
            c[0][0] += a1.dot(a1);
            c[0][1] += a1.dot(a2);
            c[1][1] += a2.dot(a2);
            x[0] += a1.dot(tmp);
            x[1] += a2.dot(tmp);
        }
        c[1][0] = c[0][1];

        let det_c0_c1 = c[0][0] * c[1][1] - c[1][0] * c[0][1];
        let (mut alpha1, mut alpha2);
        if det_c0_c1.abs() > MACHINE_EPSILON {
            // Cramer's rule
            let det_c0_x = c[0][0] * x[1] - c[1][0] * x[0];
            let det_x_c1 = x[0] * c[1][1] - x[1] * c[0][1];
            alpha1 = det_x_c1 / det_c0_c1;
            alpha2 = det_c0_x / det_c0_c1;
        } else {
            // Under-determined; assume both handles have the same length.
            let c0 = c[0][0] + c[0][1];
            let c1 = c[1][0] + c[1][1];
            alpha1 = if c0.abs() > MACHINE_EPSILON {
                x[0] / c0
            } else if c1.abs() > MACHINE_EPSILON {
                x[1] / c1
            } else {
                0.0
            };
            alpha2 = alpha1;
        }

        // Handles that are negative or vanishingly short would make the
        // Newton step degenerate, so fall back on the Wu/Barsky heuristic.
        let seg_length = pt2.distance(pt1);
        let eps = MACHINE_EPSILON * seg_length;
        let mut handles = None;
        if alpha1 < eps || alpha2 < eps {
            trace!("degenerate handles on {first}..={last}, using chord heuristic");
            alpha1 = seg_length / 3.0;
            alpha2 = alpha1;
        } else {
            // The control points must not cross over when projected onto the chord.
            let line = pt2 - pt1;
            let handle1 = tan1.normalize_to(alpha1);
            let handle2 = tan2.normalize_to(alpha2);
            if handle1.dot(line) - handle2.dot(line) > seg_length * seg_length {
                trace!("crossing handles on {first}..={last}, using chord heuristic");
                alpha1 = seg_length / 3.0;
                alpha2 = alpha1;
            } else {
                handles = Some((handle1, handle2));
            }
        }
        let (handle1, handle2) =
            handles.unwrap_or_else(|| (tan1.normalize_to(alpha1), tan2.normalize_to(alpha2)));

        CubicBez::new(pt1, pt1 + handle1, pt2 + handle2, pt2)
    }

    /// Refine the parameters of `first..=last` against `curve`.
    ///
    /// Returns `false` if the new parameters are no longer strictly
    /// increasing, in which case the points would be fit out of order.
    fn reparameterize(&self, first: usize, last: usize, u: &mut [f64], curve: &CubicBez) -> bool {
        for (ui, &p) in u.iter_mut().zip(&self.points[first..=last]) {
            *ui = curve.newton_step(p, *ui);
        }
        u.windows(2).all(|w| w[1] > w[0])
    }

    /// Assign parameters in `[0, 1]` proportional to the distance along the points.
    fn chord_length_parameterize(&self, first: usize, last: usize) -> Params {
        let mut u = Params::with_capacity(last - first + 1);
        u.push(0.0);
        let mut acc = 0.0;
        for pair in self.points[first..=last].windows(2) {
            acc += pair[1].distance(pair[0]);
            u.push(acc);
        }
        for ui in &mut u[1..] {
            *ui /= acc;
        }
        u
    }

    /// Find the largest squared distance between an interior point and `curve`.
    ///
    /// Returns the distance along with the index of the point.
    fn find_max_error(&self, first: usize, last: usize, curve: &CubicBez, u: &[f64]) -> (f64, usize) {
        let mut index = first + (last - first + 1) / 2;
        let mut max_dist = 0.0;
        for i in first + 1..last {
            let dist = curve.eval(u[i - first]).distance_squared(self.points[i]);
            if dist >= max_dist {
                max_dist = dist;
                index = i;
            }
        }
        (max_dist, index)
    }
}

/// Append `curve`, patching the outgoing handle of the segment it starts from.
fn add_curve(segments: &mut Vec<CurveSegment>, curve: &CubicBez) {
    if let Some(prev) = segments.last_mut() {
        prev.handle_out = curve.p1 - curve.p0;
    }
    segments.push(CurveSegment::with_handles(
        curve.p3,
        curve.p2 - curve.p3,
        Vec2::ZERO,
    ));
}

/// Fit cubic Béziers to a polyline and return them as a path.
///
/// This is [`PathFitter::fit`] followed by
/// [`BezPath::from_curve_segments`].
///
/// # Errors
///
/// Returns [`FitError::InvalidTolerance`] unless the configured tolerance
/// is strictly positive.
///
/// # Examples
///
/// ```
/// use pathfit::{fit_polyline, FitOptions, PathEl, Point};
///
/// let points = [(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)].map(Point::from);
/// let path = fit_polyline(&points, &FitOptions::default()).unwrap();
/// assert_eq!(path.elements().len(), 2);
/// assert!(matches!(path.elements()[1], PathEl::CurveTo(..)));
/// ```
pub fn fit_polyline(points: &[Point], options: &FitOptions) -> Result<BezPath, FitError> {
    let fitter = PathFitter::new(points.iter().copied(), options.closed);
    let segments = fitter.fit(options.tolerance)?;
    Ok(BezPath::from_curve_segments(&segments, fitter.is_closed()))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::{segment_cubics, PathEl};

    fn circle_points(n: usize, radius: f64) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let th = core::f64::consts::TAU * i as f64 / n as f64;
                Point::new(radius * th.cos(), radius * th.sin())
            })
            .collect()
    }

    /// Smallest distance from `p` to a dense sampling of the fitted curves.
    fn distance_to_curves(p: Point, segments: &[CurveSegment], closed: bool) -> f64 {
        const N: usize = 2000;
        let mut best = f64::INFINITY;
        for c in segment_cubics(segments, closed) {
            // The sampling gap is bounded by the control polygon's speed.
            let speed = 3.0 * (c.p1 - c.p0)
                .length()
                .max((c.p2 - c.p1).length())
                .max((c.p3 - c.p2).length());
            let gap = speed / (2 * N) as f64;
            for i in 0..=N {
                let d = c.eval(i as f64 / N as f64).distance(p);
                best = best.min(d - gap);
            }
        }
        best
    }

    #[test]
    fn rejects_bad_tolerance() {
        let fitter = PathFitter::new(circle_points(8, 10.0), false);
        assert_eq!(fitter.fit(0.0), Err(FitError::InvalidTolerance(0.0)));
        assert_eq!(fitter.fit(-1.0), Err(FitError::InvalidTolerance(-1.0)));
        assert!(fitter.fit(f64::NAN).is_err());
        let err = fit_polyline(&[], &FitOptions::default().tolerance(-2.0)).unwrap_err();
        assert_eq!(
            format!("{err}"),
            "fit tolerance must be positive, got -2"
        );
    }

    #[test]
    fn empty_input() {
        let fitter = PathFitter::new([], false);
        assert!(fitter.points().is_empty());
        assert!(fitter.fit(DEFAULT_TOLERANCE).unwrap().is_empty());
        let fitter = PathFitter::new([], true);
        assert!(fitter.fit(DEFAULT_TOLERANCE).unwrap().is_empty());
    }

    #[test]
    fn single_point() {
        let p = Point::new(3.0, 4.0);
        for closed in [false, true] {
            let segments = PathFitter::new([p, p, p], closed).fit(1.0).unwrap();
            assert_eq!(segments, vec![CurveSegment::new(p)]);
        }
    }

    #[test]
    fn two_points_use_thirds() {
        let p0 = Point::new(0.0, 0.0);
        let p1 = Point::new(30.0, 0.0);
        for tolerance in [1e-6, 1.0, 1e6] {
            let segments = PathFitter::new([p0, p1], false).fit(tolerance).unwrap();
            assert_eq!(segments.len(), 2);
            assert_eq!(segments[0].handle_in, Vec2::ZERO);
            assert_eq!(segments[0].handle_out, Vec2::new(10.0, 0.0));
            assert_eq!(segments[1].handle_in, Vec2::new(-10.0, 0.0));
            assert_eq!(segments[1].handle_out, Vec2::ZERO);
        }
    }

    #[test]
    fn dedups_adjacent_points() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let fitter = PathFitter::new([a, a, b, b, b, a], false);
        assert_eq!(fitter.points(), &[a, b, a]);
    }

    #[test]
    fn closed_extension() {
        let pts = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)].map(Point::from);
        let fitter = PathFitter::new(pts, true);
        assert!(fitter.is_closed());
        assert_eq!(fitter.points(), &[pts[2], pts[0], pts[1], pts[2], pts[0]]);
        // An explicitly closed ring has the same seam.
        let ring = [pts[0], pts[1], pts[2], pts[0]];
        assert_eq!(PathFitter::new(ring, true).points(), fitter.points());
    }

    #[test]
    fn collinear_points_fit_one_curve() {
        let pts: Vec<_> = (0..=10).map(|i| Point::new(i as f64, 0.5 * i as f64)).collect();
        for tolerance in [0.01, 2.5, 100.0] {
            let segments = PathFitter::new(pts.iter().copied(), false)
                .fit(tolerance)
                .unwrap();
            assert_eq!(segments.len(), 2);
            let chord = segments[1].point - segments[0].point;
            assert!(segments[0].handle_out.cross(chord).abs() < 1e-9);
            assert!(segments[1].handle_in.cross(chord).abs() < 1e-9);
            assert!(segments[0].handle_out.dot(chord) > 0.0);
            assert!(segments[1].handle_in.dot(chord) < 0.0);
        }
    }

    #[test]
    fn open_fit_stays_within_tolerance() {
        let pts: Vec<_> = (0..=80)
            .map(|i| {
                let x = i as f64;
                Point::new(x, 20.0 * (x * 0.15).sin())
            })
            .collect();
        for tolerance in [0.25, 1.0, 2.5] {
            let segments = PathFitter::new(pts.iter().copied(), false)
                .fit(tolerance)
                .unwrap();
            assert!(segments.len() >= 3, "a sine wave needs several curves");
            assert_eq!(segments[0].handle_in, Vec2::ZERO);
            assert_eq!(segments[0].point, pts[0]);
            assert_eq!(segments.last().unwrap().point, pts[80]);
            for &p in &pts {
                let d = distance_to_curves(p, &segments, false);
                assert!(d <= tolerance.sqrt() + 1e-9, "{p:?} is {d} away");
            }
        }
    }

    #[test]
    fn tighter_tolerance_needs_more_segments() {
        let pts: Vec<_> = (0..=80)
            .map(|i| {
                let x = i as f64;
                Point::new(x, 20.0 * (x * 0.15).sin())
            })
            .collect();
        let coarse = PathFitter::new(pts.iter().copied(), false).fit(10.0).unwrap();
        let fine = PathFitter::new(pts.iter().copied(), false).fit(0.01).unwrap();
        assert!(fine.len() > coarse.len());
    }

    #[test]
    fn closed_fit_drops_wrap_around_segments() {
        let pts = circle_points(24, 100.0);
        let closed = PathFitter::new(pts.iter().copied(), true);
        let segments = closed.fit(DEFAULT_TOLERANCE).unwrap();
        let open = PathFitter::new(closed.points().iter().copied(), false)
            .fit(DEFAULT_TOLERANCE)
            .unwrap();
        assert_eq!(segments.len(), open.len() - 2);
        assert_eq!(&segments[..], &open[1..open.len() - 1]);
        // The seam is smooth, so the first anchor keeps its incoming tangent.
        assert_ne!(segments[0].handle_in, Vec2::ZERO);
        assert_ne!(segments[segments.len() - 1].handle_out, Vec2::ZERO);
    }

    #[test]
    fn coincident_tangent_points() {
        // Going back and forth makes the tangent estimate at the turn zero.
        let pts = [(0.0, 0.0), (10.0, 0.0), (0.0, 0.0), (10.0, 0.0), (0.0, 0.0)].map(Point::from);
        let segments = PathFitter::new(pts, false).fit(0.1).unwrap();
        assert!(segments.len() >= 2);
        for s in &segments {
            assert!(s.point.is_finite());
            assert!(s.handle_in.is_finite());
            assert!(s.handle_out.is_finite());
        }
    }

    #[test]
    fn random_walks_keep_structure() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let n = rng.random_range(2..60);
            let mut p = Point::ORIGIN;
            let mut pts = Vec::with_capacity(n);
            for _ in 0..n {
                pts.push(p);
                p += Vec2::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0));
            }
            let tolerance = rng.random_range(0.1..5.0);
            let segments = PathFitter::new(pts.iter().copied(), false)
                .fit(tolerance)
                .unwrap();
            assert_eq!(segments[0].handle_in, Vec2::ZERO);
            assert_eq!(segments[0].point, pts[0]);
            assert_eq!(segments.last().unwrap().handle_out, Vec2::ZERO);
            // Anchors are input points, in input order.
            let mut next = 0;
            for s in &segments {
                let found = pts[next..].iter().position(|&q| q == s.point);
                next += found.expect("anchor is an input point");
                assert!(s.handle_in.is_finite() && s.handle_out.is_finite());
            }
            assert_eq!(next, n - 1);
        }
    }

    #[test]
    fn fit_polyline_builds_path() {
        let pts = circle_points(16, 50.0);
        let options = FitOptions::default().tolerance(1.0).closed(true);
        assert!(options.is_closed());
        assert_eq!(options.get_tolerance(), 1.0);
        let path = fit_polyline(&pts, &options).unwrap();
        let els = path.elements();
        assert!(matches!(els[0], PathEl::MoveTo(_)));
        assert!(matches!(els[els.len() - 1], PathEl::ClosePath));
    }
}
