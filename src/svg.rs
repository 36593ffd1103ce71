// Copyright 2025 the Pathfit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG path representation.

use alloc::string::String;
use core::fmt::{self, Write};

use arrayvec::ArrayVec;

use crate::{BezPath, PathEl, Point, Vec2};

impl BezPath {
    /// Convert the path to an SVG path string representation.
    ///
    /// The current implementation doesn't take any special care to produce a
    /// short string (reducing precision, using relative movement).
    ///
    /// # Examples
    ///
    /// ```
    /// use pathfit::BezPath;
    ///
    /// let mut path = BezPath::new();
    /// path.move_to((0.0, 0.0));
    /// path.curve_to((1.0, 2.0), (3.0, 2.0), (4.0, 0.0));
    /// path.close_path();
    /// assert_eq!(path.to_svg(), "M0 0C1 2 3 2 4 0Z");
    /// ```
    pub fn to_svg(&self) -> String {
        let mut result = String::new();
        self.write_to(&mut result)
            .expect("writing to a String doesn't fail");
        result
    }

    /// Write the SVG representation of this path to the provided buffer.
    ///
    /// # Errors
    ///
    /// Returns any error reported by the writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> fmt::Result {
        for el in self.elements() {
            match *el {
                PathEl::MoveTo(p) => write!(writer, "M{} {}", p.x, p.y)?,
                PathEl::LineTo(p) => write!(writer, "L{} {}", p.x, p.y)?,
                PathEl::QuadTo(p1, p2) => write!(writer, "Q{} {} {} {}", p1.x, p1.y, p2.x, p2.y)?,
                PathEl::CurveTo(p1, p2, p3) => write!(
                    writer,
                    "C{} {} {} {} {} {}",
                    p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
                )?,
                PathEl::ClosePath => write!(writer, "Z")?,
            }
        }
        Ok(())
    }

    /// Try to parse a bezier path from an SVG path element.
    ///
    /// The `M`, `L`, `Q`, `C` and `Z` commands are supported, in both
    /// absolute and relative forms, including implicit repetition of the
    /// previous command.
    ///
    /// # Errors
    ///
    /// Returns an [`SvgParseError`] describing the first problem found.
    pub fn from_svg(data: &str) -> Result<BezPath, SvgParseError> {
        let mut lexer = SvgLexer::new(data);
        let mut path = BezPath::new();
        let mut last_cmd = 0;
        let mut subpath_start = Point::ORIGIN;
        while let Some(c) = lexer.get_cmd(last_cmd) {
            let pts = match c {
                b'm' | b'M' | b'l' | b'L' => lexer.get_points::<1>(c)?,
                b'q' | b'Q' => lexer.get_points::<2>(c)?,
                b'c' | b'C' => lexer.get_points::<3>(c)?,
                b'z' | b'Z' => ArrayVec::new(),
                _ => return Err(SvgParseError::UnknownCommand(c as char)),
            };
            match c {
                b'm' | b'M' => {
                    path.move_to(pts[0]);
                    subpath_start = pts[0];
                    // Subsequent pairs are implicit line commands.
                    last_cmd = c - (b'M' - b'L');
                }
                b'l' | b'L' => {
                    path.line_to(pts[0]);
                    last_cmd = c;
                }
                b'q' | b'Q' => {
                    path.quad_to(pts[0], pts[1]);
                    last_cmd = c;
                }
                b'c' | b'C' => {
                    path.curve_to(pts[0], pts[1], pts[2]);
                    last_cmd = c;
                }
                _ => {
                    path.close_path();
                    lexer.last_pt = subpath_start;
                    last_cmd = 0;
                }
            }
            if let Some(&end) = pts.last() {
                lexer.last_pt = end;
            }
        }
        Ok(path)
    }
}

/// An error which can be returned when parsing an SVG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvgParseError {
    /// A number was expected.
    Wrong,
    /// The input string ended while still expecting input.
    UnexpectedEof,
    /// Encountered an unknown command letter.
    UnknownCommand(char),
}

impl fmt::Display for SvgParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvgParseError::Wrong => write!(f, "Unable to parse a number"),
            SvgParseError::UnexpectedEof => write!(f, "Unexpected EOF"),
            SvgParseError::UnknownCommand(letter) => write!(f, "Unknown command, \"{letter}\""),
        }
    }
}

impl core::error::Error for SvgParseError {}

struct SvgLexer<'a> {
    data: &'a str,
    ix: usize,
    last_pt: Point,
}

impl SvgLexer<'_> {
    fn new(data: &str) -> SvgLexer<'_> {
        SvgLexer {
            data,
            ix: 0,
            last_pt: Point::ORIGIN,
        }
    }

    fn skip_ws(&mut self) {
        while let Some(&c) = self.data.as_bytes().get(self.ix) {
            if !(c == b' ' || c == 9 || c == 10 || c == 12 || c == 13) {
                break;
            }
            self.ix += 1;
        }
    }

    fn get_cmd(&mut self, last_cmd: u8) -> Option<u8> {
        self.skip_ws();
        if let Some(c) = self.get_byte() {
            if c.is_ascii_lowercase() || c.is_ascii_uppercase() {
                return Some(c);
            } else if last_cmd != 0 && (c == b'-' || c == b'.' || c.is_ascii_digit()) {
                // Plausible number start
                self.unget();
                return Some(last_cmd);
            } else {
                self.unget();
            }
        }
        None
    }

    fn get_byte(&mut self) -> Option<u8> {
        self.data.as_bytes().get(self.ix).map(|&c| {
            self.ix += 1;
            c
        })
    }

    fn unget(&mut self) {
        self.ix -= 1;
    }

    fn get_number(&mut self) -> Result<f64, SvgParseError> {
        self.skip_ws();
        let start = self.ix;
        let c = self.get_byte().ok_or(SvgParseError::UnexpectedEof)?;
        if !(c == b'-' || c == b'+') {
            self.unget();
        }
        let mut digit_count = 0;
        let mut seen_period = false;
        while let Some(c) = self.get_byte() {
            if c.is_ascii_digit() {
                digit_count += 1;
            } else if c == b'.' && !seen_period {
                seen_period = true;
            } else {
                self.unget();
                break;
            }
        }
        if let Some(c) = self.get_byte() {
            if c == b'e' || c == b'E' {
                let mut c = self.get_byte().ok_or(SvgParseError::Wrong)?;
                if c == b'-' || c == b'+' {
                    c = self.get_byte().ok_or(SvgParseError::Wrong)?;
                }
                if !c.is_ascii_digit() {
                    return Err(SvgParseError::Wrong);
                }
                while let Some(c) = self.get_byte() {
                    if !c.is_ascii_digit() {
                        self.unget();
                        break;
                    }
                }
            } else {
                self.unget();
            }
        }
        if digit_count > 0 {
            self.data[start..self.ix]
                .parse()
                .map_err(|_| SvgParseError::Wrong)
        } else {
            Err(SvgParseError::Wrong)
        }
    }

    fn get_number_pair(&mut self) -> Result<Vec2, SvgParseError> {
        let x = self.get_number()?;
        self.opt_comma();
        let y = self.get_number()?;
        self.opt_comma();
        Ok(Vec2::new(x, y))
    }

    /// Read `N` coordinate pairs, resolving relative commands against the
    /// current point.
    fn get_points<const N: usize>(&mut self, cmd: u8) -> Result<ArrayVec<Point, 3>, SvgParseError> {
        let mut pts = ArrayVec::new();
        for _ in 0..N {
            let v = self.get_number_pair()?;
            let pt = if cmd.is_ascii_lowercase() {
                self.last_pt + v
            } else {
                v.to_point()
            };
            pts.push(pt);
        }
        Ok(pts)
    }

    fn opt_comma(&mut self) {
        self.skip_ws();
        if let Some(c) = self.get_byte() {
            if c != b',' {
                self.unget();
            }
        }
    }
}
