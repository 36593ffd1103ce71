// Copyright 2025 the Pathfit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor points with tangent handles.

use crate::{CubicBez, Point, Vec2};

/// An anchor point of a fitted curve, with its two tangent handles.
///
/// The handles are offsets relative to [`point`](CurveSegment::point):
/// `handle_in` points towards the second control point of the curve that
/// ends here, `handle_out` towards the first control point of the curve
/// that starts here. A zero handle means there is no tangent on that side;
/// when both handles facing each other across a span are zero the span is
/// a straight line rather than a cubic.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveSegment {
    /// The anchor, which the curve passes through.
    pub point: Point,
    /// Offset from the anchor to the incoming control point.
    pub handle_in: Vec2,
    /// Offset from the anchor to the outgoing control point.
    pub handle_out: Vec2,
}

impl CurveSegment {
    /// A segment at `point` with no handles.
    #[inline]
    pub const fn new(point: Point) -> CurveSegment {
        CurveSegment {
            point,
            handle_in: Vec2::ZERO,
            handle_out: Vec2::ZERO,
        }
    }

    /// A segment at `point` with the given relative handles.
    #[inline]
    pub const fn with_handles(point: Point, handle_in: Vec2, handle_out: Vec2) -> CurveSegment {
        CurveSegment {
            point,
            handle_in,
            handle_out,
        }
    }

    /// The absolute position of the incoming control point.
    #[inline]
    pub fn handle_in_point(&self) -> Point {
        self.point + self.handle_in
    }

    /// The absolute position of the outgoing control point.
    #[inline]
    pub fn handle_out_point(&self) -> Point {
        self.point + self.handle_out
    }

    /// Whether the span from `self` to `next` is a straight line.
    #[inline]
    pub fn is_line_to(&self, next: &CurveSegment) -> bool {
        self.handle_out == Vec2::ZERO && next.handle_in == Vec2::ZERO
    }

    /// The cubic Bézier spanning from this anchor to `next`.
    #[inline]
    pub fn cubic_to(&self, next: &CurveSegment) -> CubicBez {
        CubicBez::new(
            self.point,
            self.handle_out_point(),
            next.handle_in_point(),
            next.point,
        )
    }
}

/// Iterate the cubic Béziers described by a sequence of segments.
///
/// For a closed sequence, the span from the last segment back to the first
/// is included.
pub fn segment_cubics(
    segments: &[CurveSegment],
    closed: bool,
) -> impl Iterator<Item = CubicBez> + '_ {
    let wrap = match (closed, segments.first(), segments.last()) {
        (true, Some(first), Some(last)) if segments.len() > 1 => Some(last.cubic_to(first)),
        _ => None,
    };
    segments
        .windows(2)
        .map(|pair| pair[0].cubic_to(&pair[1]))
        .chain(wrap)
}
