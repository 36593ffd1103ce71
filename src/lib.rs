// Copyright 2025 the Pathfit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting cubic Bézier curves to polylines.
//!
//! The pathfit library turns a sequence of sampled points, such as a
//! freehand stroke or a traced outline, into a compact chain of cubic
//! Béziers that stays within a given error tolerance of every point. The
//! result is a list of [`CurveSegment`]s (anchor points carrying relative
//! tangent handles), which can be drawn as a [`BezPath`] and written out as
//! SVG path data.
//!
//! # Examples
//!
//! Fitting a noisy arc:
//! ```
//! use pathfit::{BezPath, PathFitter, Point};
//!
//! let points: Vec<Point> = (0..=50)
//!     .map(|i| {
//!         let th = i as f64 * 0.05;
//!         let wobble = if i % 2 == 0 { 0.1 } else { -0.1 };
//!         Point::new((100.0 + wobble) * th.cos(), (100.0 + wobble) * th.sin())
//!     })
//!     .collect();
//! let segments = PathFitter::new(points.iter().copied(), false)
//!     .fit(1.0)
//!     .unwrap();
//! assert!(segments.len() < points.len() / 4);
//!
//! let path = BezPath::from_curve_segments(&segments, false);
//! assert!(path.to_svg().starts_with("M100.1 0C"));
//! ```
//!
//! Or in one step, with options:
//! ```
//! use pathfit::{fit_polyline, FitOptions, Point};
//!
//! let square = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)].map(Point::from);
//! let options = FitOptions::default().tolerance(0.5).closed(true);
//! let path = fit_polyline(&square, &options).unwrap();
//! assert!(path.to_svg().ends_with('Z'));
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate for
//! math functionality. The `std` feature is enabled by default, but can be
//! disabled, as long as the `libm` feature is enabled. This is useful for
//! `no_std` environments. The `alloc` crate is used regardless.
//!
//! Fitting reports what it did through the [`log`] facade, at `debug` level
//! per fit and `trace` level per split.
//!
//! [`libm`]: https://docs.rs/libm
//! [`log`]: https://docs.rs/log

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(
    clippy::many_single_char_names,
    clippy::excessive_precision,
    reason = "the fitting math follows the usual notation"
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("pathfit requires either the `std` or `libm` feature");

extern crate alloc;

mod bezpath;
pub mod common;
mod cubicbez;
mod fit;
mod line;
mod param_curve;
mod point;
mod quadbez;
mod segment;
mod svg;
mod vec2;

pub use crate::bezpath::*;
pub use crate::cubicbez::*;
pub use crate::fit::*;
pub use crate::line::*;
pub use crate::param_curve::*;
pub use crate::point::*;
pub use crate::quadbez::*;
pub use crate::segment::*;
pub use crate::svg::*;
pub use crate::vec2::*;
