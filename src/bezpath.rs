// Copyright 2025 the Pathfit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bézier paths (up to cubic), and conversion to and from curve segments.

use alloc::vec::Vec;

use crate::{CubicBez, CurveSegment, Point, QuadBez, Vec2};

/// A Bézier path, possibly with multiple subpaths.
///
/// This is the drawing representation that fitted [`CurveSegment`]s are
/// converted into, and which can be converted back.
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BezPath(Vec<PathEl>);

/// The element of a Bézier path.
///
/// A valid path has `MoveTo` at the beginning of each subpath.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEl {
    /// Move directly to the point without drawing anything, starting a new
    /// subpath.
    MoveTo(Point),
    /// Draw a line from the current location to the point.
    LineTo(Point),
    /// Draw a quadratic Bézier using the current location and the two points.
    QuadTo(Point, Point),
    /// Draw a cubic Bézier using the current location and the three points.
    CurveTo(Point, Point, Point),
    /// Close off the path.
    ClosePath,
}

impl BezPath {
    /// Create a new path.
    pub fn new() -> BezPath {
        BezPath::default()
    }

    /// Create a path from a vector of path elements.
    pub fn from_vec(v: Vec<PathEl>) -> BezPath {
        BezPath(v)
    }

    /// Push a generic path element onto the path.
    pub fn push(&mut self, el: PathEl) {
        self.0.push(el);
    }

    /// Push a "move to" element onto the path.
    pub fn move_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::MoveTo(p.into()));
    }

    /// Push a "line to" element onto the path.
    pub fn line_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::LineTo(p.into()));
    }

    /// Push a "quad to" element onto the path.
    pub fn quad_to<P: Into<Point>>(&mut self, p1: P, p2: P) {
        self.push(PathEl::QuadTo(p1.into(), p2.into()));
    }

    /// Push a "curve to" element onto the path.
    pub fn curve_to<P: Into<Point>>(&mut self, p1: P, p2: P, p3: P) {
        self.push(PathEl::CurveTo(p1.into(), p2.into(), p3.into()));
    }

    /// Push a "close path" element onto the path.
    pub fn close_path(&mut self) {
        self.push(PathEl::ClosePath);
    }

    /// Get the path elements.
    pub fn elements(&self) -> &[PathEl] {
        &self.0
    }

    /// Returns `true` if the path contains no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build a path drawing the given segments.
    ///
    /// See [`extend_curve_segments`](BezPath::extend_curve_segments).
    pub fn from_curve_segments(segments: &[CurveSegment], closed: bool) -> BezPath {
        let mut path = BezPath::new();
        path.extend_curve_segments(segments, closed, true);
        path
    }

    /// Append drawing commands for the given segments.
    ///
    /// A span between two anchors is drawn as a line when the handles
    /// facing each other across it are both zero, and as a cubic otherwise.
    /// A lone segment is drawn as a zero-length line so it stays visible.
    /// When `closed` is set, the span back to the first anchor is drawn and
    /// the subpath is closed.
    ///
    /// If `move_to_first` is false, the first anchor is assumed to be the
    /// current point already, which allows joining onto an open subpath.
    pub fn extend_curve_segments(
        &mut self,
        segments: &[CurveSegment],
        closed: bool,
        move_to_first: bool,
    ) {
        let Some(first) = segments.first() else {
            return;
        };
        if move_to_first {
            self.move_to(first.point);
        }
        if segments.len() == 1 {
            self.line_to(first.point);
        } else {
            for pair in segments.windows(2) {
                self.push_span(&pair[0], &pair[1]);
            }
            if closed {
                self.push_span(&segments[segments.len() - 1], first);
            }
        }
        if closed {
            self.close_path();
        }
    }

    fn push_span(&mut self, prev: &CurveSegment, seg: &CurveSegment) {
        if prev.is_line_to(seg) {
            self.line_to(seg.point);
        } else {
            self.curve_to(prev.handle_out_point(), seg.handle_in_point(), seg.point);
        }
    }

    /// Convert the path back into curve segments.
    ///
    /// Every subpath contributes its anchors in order; subpaths are
    /// concatenated. Quadratic elements are raised to cubics. A zero-length
    /// line only marks the start of a subpath, matching the way a lone
    /// segment is drawn. When a closed subpath ends on its starting point,
    /// the closing anchor is folded into the first one, so closed segment
    /// sequences survive a round trip through
    /// [`from_curve_segments`](BezPath::from_curve_segments).
    pub fn curve_segments(&self) -> Vec<CurveSegment> {
        let mut segments: Vec<CurveSegment> = Vec::new();
        // Index in `segments` where the open subpath starts, if it has one.
        let mut run_start = None;
        let mut current = Point::ORIGIN;
        for &el in &self.0 {
            match el {
                PathEl::MoveTo(p) => {
                    run_start = None;
                    current = p;
                }
                PathEl::LineTo(p) => {
                    let start = open_run(&mut segments, &mut run_start, current);
                    if p != current || segments.len() - 1 > start {
                        segments.push(CurveSegment::new(p));
                    }
                    current = p;
                }
                PathEl::QuadTo(p1, p2) => {
                    let c = QuadBez::new(current, p1, p2).raise();
                    push_cubic(&mut segments, &mut run_start, current, c);
                    current = p2;
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    let c = CubicBez::new(current, p1, p2, p3);
                    push_cubic(&mut segments, &mut run_start, current, c);
                    current = p3;
                }
                PathEl::ClosePath => {
                    if let Some(start) = run_start.take() {
                        fold_closing_anchor(&mut segments, start);
                        current = segments[start].point;
                    }
                }
            }
        }
        segments
    }
}

/// Start a run of segments at `current` unless one is open.
///
/// Returns the index of the run's first segment.
fn open_run(
    segments: &mut Vec<CurveSegment>,
    run_start: &mut Option<usize>,
    current: Point,
) -> usize {
    *run_start.get_or_insert_with(|| {
        segments.push(CurveSegment::new(current));
        segments.len() - 1
    })
}

fn push_cubic(
    segments: &mut Vec<CurveSegment>,
    run_start: &mut Option<usize>,
    current: Point,
    c: CubicBez,
) {
    open_run(segments, run_start, current);
    if let Some(prev) = segments.last_mut() {
        prev.handle_out = c.p1 - prev.point;
    }
    segments.push(CurveSegment::with_handles(c.p3, c.p2 - c.p3, Vec2::ZERO));
}

/// Merge the last anchor of a closed run into its first anchor when they coincide.
fn fold_closing_anchor(segments: &mut Vec<CurveSegment>, start: usize) {
    let last = segments.len() - 1;
    if last > start && segments[last].point == segments[start].point {
        let closing = segments.remove(last);
        segments[start].handle_in = closing.handle_in;
    }
}

impl<'a> IntoIterator for &'a BezPath {
    type Item = PathEl;
    type IntoIter = core::iter::Cloned<core::slice::Iter<'a, PathEl>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements().iter().cloned()
    }
}

impl FromIterator<PathEl> for BezPath {
    fn from_iter<T: IntoIterator<Item = PathEl>>(iter: T) -> Self {
        BezPath(iter.into_iter().collect())
    }
}

impl Extend<PathEl> for BezPath {
    fn extend<I: IntoIterator<Item = PathEl>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use crate::{BezPath, CurveSegment, PathEl, PathFitter, Point, Vec2};

    fn assert_segments_near(a: &[CurveSegment], b: &[CurveSegment]) {
        assert_eq!(a.len(), b.len(), "{a:?} vs {b:?}");
        for (sa, sb) in a.iter().zip(b) {
            assert_eq!(sa.point, sb.point);
            assert!((sa.handle_in - sb.handle_in).length() < 1e-9, "{sa:?} vs {sb:?}");
            assert!((sa.handle_out - sb.handle_out).length() < 1e-9, "{sa:?} vs {sb:?}");
        }
    }

    fn wave() -> Vec<Point> {
        (0..40)
            .map(|i| {
                let x = i as f64 * 2.5;
                Point::new(x, 15.0 * (x * 0.1).cos())
            })
            .collect()
    }

    #[test]
    fn lines_and_cubics() {
        let segs = [
            CurveSegment::new(Point::new(0.0, 0.0)),
            CurveSegment::with_handles(Point::new(10.0, 0.0), Vec2::ZERO, Vec2::new(0.0, 5.0)),
            CurveSegment::with_handles(Point::new(10.0, 10.0), Vec2::new(3.0, 0.0), Vec2::ZERO),
        ];
        let path = BezPath::from_curve_segments(&segs, false);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 0.0)),
                PathEl::CurveTo(
                    Point::new(10.0, 5.0),
                    Point::new(13.0, 10.0),
                    Point::new(10.0, 10.0)
                ),
            ]
        );
        assert_eq!(path.curve_segments(), segs);
    }

    #[test]
    fn closed_drawing_repeats_first_anchor() {
        let segs = [
            CurveSegment::new(Point::new(0.0, 0.0)),
            CurveSegment::new(Point::new(4.0, 0.0)),
            CurveSegment::new(Point::new(4.0, 3.0)),
        ];
        let path = BezPath::from_curve_segments(&segs, true);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(4.0, 0.0)),
                PathEl::LineTo(Point::new(4.0, 3.0)),
                PathEl::LineTo(Point::new(0.0, 0.0)),
                PathEl::ClosePath,
            ]
        );
        assert_eq!(path.curve_segments(), segs);
    }

    #[test]
    fn single_segment_is_a_dot() {
        let p = Point::new(2.0, 2.0);
        let path = BezPath::from_curve_segments(&[CurveSegment::new(p)], false);
        assert_eq!(path.elements(), &[PathEl::MoveTo(p), PathEl::LineTo(p)]);
        assert_eq!(path.curve_segments(), vec![CurveSegment::new(p)]);
        assert!(BezPath::from_curve_segments(&[], true).is_empty());
    }

    #[test]
    fn extend_without_move() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        let segs = [
            CurveSegment::new(Point::new(0.0, 0.0)),
            CurveSegment::new(Point::new(1.0, 1.0)),
        ];
        path.extend_curve_segments(&segs, false, false);
        assert_eq!(path.elements().len(), 2);
        assert_eq!(path.curve_segments(), segs);
    }

    #[test]
    fn open_fit_round_trips() {
        let segs = PathFitter::new(wave(), false).fit(0.5).unwrap();
        let path = BezPath::from_curve_segments(&segs, false);
        assert_segments_near(&path.curve_segments(), &segs);
    }

    #[test]
    fn closed_fit_round_trips() {
        let fitter = PathFitter::new(wave(), true);
        let segs = fitter.fit(0.5).unwrap();
        let path = BezPath::from_curve_segments(&segs, true);
        assert!(matches!(path.elements().last(), Some(PathEl::ClosePath)));
        assert_segments_near(&path.curve_segments(), &segs);
    }

    #[test]
    fn quads_are_raised() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.quad_to((3.0, 3.0), (6.0, 0.0));
        let segs = path.curve_segments();
        assert_eq!(segs.len(), 2);
        assert!((segs[0].handle_out - Vec2::new(2.0, 2.0)).length() < 1e-12);
        assert!((segs[1].handle_in - Vec2::new(-2.0, 2.0)).length() < 1e-12);
    }

    #[test]
    fn subpaths_are_concatenated() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((1.0, 0.0));
        path.move_to((5.0, 5.0));
        path.curve_to((6.0, 5.0), (7.0, 6.0), (7.0, 7.0));
        let segs = path.curve_segments();
        let points: Vec<_> = segs.iter().map(|s| s.point).collect();
        assert_eq!(
            points,
            [(0.0, 0.0), (1.0, 0.0), (5.0, 5.0), (7.0, 7.0)].map(Point::from)
        );
        assert_eq!(segs[1].handle_out, Vec2::ZERO);
        assert_eq!(segs[2].handle_out, Vec2::new(1.0, 0.0));
        assert_eq!(segs[3].handle_in, Vec2::new(0.0, -1.0));
    }
}
