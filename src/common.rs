// Copyright 2025 the Pathfit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations

#![allow(missing_docs)]

use crate::Point;

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident/$lfname:ident;
    )+) => {
        #[cfg(not(feature = "std"))]
        pub(crate) trait FloatFuncs : Sized {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f32 {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lfname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("pathfit requires either the `std` or `libm` feature")
            })+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("pathfit requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs/fabsf;
    fn hypot(self, other: Self) -> Self => hypot/hypotf;
    fn sqrt(self) -> Self => sqrt/sqrtf;
}

/// The threshold below which a value is treated as zero by the fitter.
///
/// Every near-zero test in curve fitting goes through this one constant:
/// the determinant of the least-squares system, its reduced row sums, the
/// degenerate handle length test (scaled by the chord length) and the
/// Newton-Raphson denominator. Changing it changes which curves are
/// accepted, and so the segments produced.
pub const MACHINE_EPSILON: f64 = 1.12e-16;

/// Whether `val` lies within [`MACHINE_EPSILON`] of zero.
#[inline]
pub fn is_machine_zero(val: f64) -> bool {
    (-MACHINE_EPSILON..=MACHINE_EPSILON).contains(&val)
}

/// Evaluate a Bézier control polygon of any length with de Casteljau's algorithm.
///
/// The polygon is consumed as scratch space; a polygon of `N` points
/// describes a curve of degree `N - 1`. An empty polygon evaluates to the
/// origin.
///
/// ```
/// use pathfit::common::de_casteljau;
/// use pathfit::Point;
///
/// let p = de_casteljau([Point::new(0.0, 0.0), Point::new(2.0, 4.0)], 0.25);
/// assert_eq!(p, Point::new(0.5, 1.0));
/// ```
pub fn de_casteljau<const N: usize>(mut polygon: [Point; N], t: f64) -> Point {
    let mt = 1.0 - t;
    for i in 1..N {
        for j in 0..N - i {
            polygon[j] = (polygon[j].to_vec2() * mt + polygon[j + 1].to_vec2() * t).to_point();
        }
    }
    polygon.first().copied().unwrap_or(Point::ORIGIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_zero() {
        assert!(is_machine_zero(0.0));
        assert!(is_machine_zero(-1e-16));
        assert!(is_machine_zero(MACHINE_EPSILON));
        assert!(!is_machine_zero(1e-15));
        assert!(!is_machine_zero(f64::NAN));
    }

    #[test]
    fn de_casteljau_degrees() {
        let p = Point::new(3.0, -1.0);
        assert_eq!(de_casteljau([p], 0.7), p);
        let q = de_casteljau(
            [
                Point::new(0.0, 0.0),
                Point::new(1.0, 2.0),
                Point::new(2.0, 0.0),
            ],
            0.5,
        );
        assert!((q.x - 1.0).abs() < 1e-12);
        assert!((q.y - 1.0).abs() < 1e-12);
        assert_eq!(de_casteljau::<0>([], 0.5), Point::ORIGIN);
    }
}
