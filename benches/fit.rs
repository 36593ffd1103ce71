//! Benchmarks of polyline fitting.

#![feature(test)]
extern crate test;
use test::Bencher;

use pathfit::{BezPath, PathFitter, Point};

/// A spiral with a small deterministic wobble, like a digitized stroke.
fn spiral(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let th = i as f64 * 0.05;
            let r = 20.0 + 4.0 * th + if i % 3 == 0 { 0.3 } else { -0.15 };
            Point::new(r * th.cos(), r * th.sin())
        })
        .collect()
}

#[bench]
fn bench_fit_open_500(b: &mut Bencher) {
    let fitter = PathFitter::new(spiral(500), false);
    b.iter(|| test::black_box(&fitter).fit(2.5));
}

#[bench]
fn bench_fit_open_500_tight(b: &mut Bencher) {
    let fitter = PathFitter::new(spiral(500), false);
    b.iter(|| test::black_box(&fitter).fit(0.01));
}

#[bench]
fn bench_fit_closed_500(b: &mut Bencher) {
    let fitter = PathFitter::new(spiral(500), true);
    b.iter(|| test::black_box(&fitter).fit(2.5));
}

#[bench]
fn bench_curve_segments(b: &mut Bencher) {
    let segments = PathFitter::new(spiral(500), false).fit(0.25).unwrap();
    let path = BezPath::from_curve_segments(&segments, false);
    b.iter(|| test::black_box(&path).curve_segments());
}
