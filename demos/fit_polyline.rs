// Copyright 2025 the Pathfit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fit curves to a noisy spiral and print the result as an SVG document.
//!
//! Run with `RUST_LOG=trace` to see each split the fitter makes. An optional
//! argument sets the tolerance.

use pathfit::{fit_polyline, FitOptions, Point};

fn main() {
    env_logger::init();
    let tolerance = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<f64>() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("bad tolerance {arg:?}: {e}");
                std::process::exit(1);
            }
        },
        None => 2.5,
    };

    let points: Vec<Point> = (0..400)
        .map(|i| {
            let th = i as f64 * 0.04;
            // Cheap deterministic noise.
            let noise = ((i * 7919) % 13) as f64 / 13.0 - 0.5;
            let r = 30.0 + 12.0 * th + noise;
            Point::new(300.0 + r * th.cos(), 300.0 + r * th.sin())
        })
        .collect();

    let options = FitOptions::default().tolerance(tolerance);
    let path = match fit_polyline(&points, &options) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let polyline: Vec<String> = points.iter().map(|p| format!("{},{}", p.x, p.y)).collect();
    println!("<svg width='600' height='600' xmlns='http://www.w3.org/2000/svg'>");
    println!(
        "  <polyline points='{}' fill='none' stroke='#ccc'/>",
        polyline.join(" ")
    );
    println!("  <path d='{}' fill='none' stroke='#000'/>", path.to_svg());
    println!("</svg>");
    eprintln!(
        "{} points fit with {} path elements",
        points.len(),
        path.elements().len()
    );
}
