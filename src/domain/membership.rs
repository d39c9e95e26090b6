//! Membership functions.
//!
//! Piecewise-linear shapes mapping a crisp scalar to a degree in `[0, 1]`:
//! - `Trapezoid [a, b, c, d]`: ramps up on `a..b`, plateau on `b..=c`, ramps down on `c..d`
//! - `Triangle [a, b, c]`: ramps up on `a..b`, apex at `b`, ramps down on `b..c`
//!
//! Breakpoints must be finite and non-decreasing. Zero-width ramps (e.g. `a == b`)
//! are steps: the plateau (or apex) is checked before the outer bounds, so
//! `Trapezoid [0, 0, 30, 50]` evaluates to 1 at `x = 0`.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::SignalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Trapezoid,
    Triangle,
}

impl Shape {
    pub fn arity(self) -> usize {
        match self {
            Shape::Trapezoid => 4,
            Shape::Triangle => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Trapezoid => "trapezoid",
            Shape::Triangle => "triangle",
        }
    }
}

impl FromStr for Shape {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trapezoid" | "trapmf" => Ok(Shape::Trapezoid),
            "triangle" | "trimf" => Ok(Shape::Triangle),
            other => Err(SignalError::configuration(format!(
                "unknown membership shape '{}' (expected trapezoid or triangle)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MembershipFunction {
    Trapezoid { a: f64, b: f64, c: f64, d: f64 },
    Triangle { a: f64, b: f64, c: f64 },
}

impl MembershipFunction {
    pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> Result<Self, SignalError> {
        check_breakpoints(Shape::Trapezoid, &[a, b, c, d])?;
        Ok(MembershipFunction::Trapezoid { a, b, c, d })
    }

    pub fn triangle(a: f64, b: f64, c: f64) -> Result<Self, SignalError> {
        check_breakpoints(Shape::Triangle, &[a, b, c])?;
        Ok(MembershipFunction::Triangle { a, b, c })
    }

    /// Build from a shape and a breakpoint slice, validating arity and ordering.
    pub fn from_breakpoints(shape: Shape, points: &[f64]) -> Result<Self, SignalError> {
        check_breakpoints(shape, points)?;
        Ok(match shape {
            Shape::Trapezoid => MembershipFunction::Trapezoid {
                a: points[0],
                b: points[1],
                c: points[2],
                d: points[3],
            },
            Shape::Triangle => MembershipFunction::Triangle {
                a: points[0],
                b: points[1],
                c: points[2],
            },
        })
    }

    pub fn shape(&self) -> Shape {
        match self {
            MembershipFunction::Trapezoid { .. } => Shape::Trapezoid,
            MembershipFunction::Triangle { .. } => Shape::Triangle,
        }
    }

    pub fn breakpoints(&self) -> Vec<f64> {
        match *self {
            MembershipFunction::Trapezoid { a, b, c, d } => vec![a, b, c, d],
            MembershipFunction::Triangle { a, b, c } => vec![a, b, c],
        }
    }

    /// Degree of membership of `x`, always in `[0, 1]`. Non-finite input yields 0.
    pub fn evaluate(&self, x: f64) -> f64 {
        if !x.is_finite() {
            return 0.0;
        }
        match *self {
            MembershipFunction::Trapezoid { a, b, c, d } => {
                if x >= b && x <= c {
                    1.0
                } else if x <= a || x >= d {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
            MembershipFunction::Triangle { a, b, c } => {
                if x == b {
                    1.0
                } else if x <= a || x >= c {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
        }
    }
}

impl fmt::Display for MembershipFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.shape().name())?;
        for p in self.breakpoints() {
            write!(f, " {}", p)?;
        }
        Ok(())
    }
}

/// Parses `"<shape> p1 p2 ..."`, e.g. `"trapezoid 0 0 30 50"`.
impl FromStr for MembershipFunction {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let shape: Shape = parts
            .next()
            .ok_or_else(|| SignalError::configuration("empty membership definition"))?
            .parse()?;
        let points = parts
            .map(|p| {
                p.trim_matches(|c| c == '[' || c == ']' || c == ',')
                    .parse::<f64>()
                    .map_err(|_| {
                        SignalError::configuration(format!("invalid breakpoint '{}'", p))
                    })
            })
            .collect::<Result<Vec<f64>, SignalError>>()?;
        MembershipFunction::from_breakpoints(shape, &points)
    }
}

fn check_breakpoints(shape: Shape, points: &[f64]) -> Result<(), SignalError> {
    if points.len() != shape.arity() {
        return Err(SignalError::configuration(format!(
            "{} needs {} breakpoints, got {}",
            shape.name(),
            shape.arity(),
            points.len()
        )));
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Err(SignalError::configuration(format!(
            "{} breakpoints must be finite: {:?}",
            shape.name(),
            points
        )));
    }
    if points.windows(2).any(|w| w[0] > w[1]) {
        return Err(SignalError::configuration(format!(
            "{} breakpoints must be non-decreasing: {:?}",
            shape.name(),
            points
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn oversold() -> MembershipFunction {
        MembershipFunction::trapezoid(0.0, 0.0, 30.0, 50.0).unwrap()
    }

    #[test]
    fn left_shoulder_trapezoid() {
        let mf = oversold();
        assert_eq!(mf.evaluate(0.0), 1.0);
        assert_eq!(mf.evaluate(30.0), 1.0);
        assert_eq!(mf.evaluate(50.0), 0.0);
        assert_relative_eq!(mf.evaluate(40.0), 0.5);
    }

    #[test]
    fn trapezoid_decreasing_on_falling_edge() {
        let mf = oversold();
        let mut prev = mf.evaluate(30.0);
        for i in 1..=20 {
            let cur = mf.evaluate(30.0 + i as f64);
            assert!(cur < prev, "not decreasing at {}", 30 + i);
            prev = cur;
        }
    }

    #[test]
    fn right_shoulder_trapezoid() {
        let mf = MembershipFunction::trapezoid(50.0, 70.0, 100.0, 100.0).unwrap();
        assert_eq!(mf.evaluate(50.0), 0.0);
        assert_relative_eq!(mf.evaluate(60.0), 0.5);
        assert_eq!(mf.evaluate(70.0), 1.0);
        assert_eq!(mf.evaluate(100.0), 1.0);
        assert_eq!(mf.evaluate(100.5), 0.0);
    }

    #[test]
    fn trend_trapezoids_at_crisp_magnitudes() {
        let bearish = MembershipFunction::trapezoid(-1.0, -1.0, -0.5, 0.0).unwrap();
        let bullish = MembershipFunction::trapezoid(0.0, 0.5, 1.0, 1.0).unwrap();
        assert_eq!(bearish.evaluate(-1.0), 1.0);
        assert_eq!(bearish.evaluate(0.0), 0.0);
        assert_eq!(bullish.evaluate(1.0), 1.0);
        assert_eq!(bullish.evaluate(0.0), 0.0);
    }

    #[test]
    fn triangle_apex_and_ramps() {
        let mf = MembershipFunction::triangle(30.0, 50.0, 70.0).unwrap();
        assert_eq!(mf.evaluate(50.0), 1.0);
        assert_eq!(mf.evaluate(30.0), 0.0);
        assert_eq!(mf.evaluate(70.0), 0.0);
        assert_relative_eq!(mf.evaluate(40.0), 0.5);
        assert_relative_eq!(mf.evaluate(65.0), 0.25);
    }

    #[test]
    fn degenerate_triangle_is_a_spike() {
        let mf = MembershipFunction::triangle(5.0, 5.0, 5.0).unwrap();
        assert_eq!(mf.evaluate(5.0), 1.0);
        assert_eq!(mf.evaluate(4.999), 0.0);
        assert_eq!(mf.evaluate(5.001), 0.0);
    }

    #[test]
    fn degenerate_right_edge_steps_down() {
        let mf = MembershipFunction::trapezoid(0.0, 10.0, 20.0, 20.0).unwrap();
        assert_eq!(mf.evaluate(20.0), 1.0);
        assert_eq!(mf.evaluate(20.0001), 0.0);
    }

    #[test]
    fn non_finite_input_has_zero_membership() {
        let mf = oversold();
        assert_eq!(mf.evaluate(f64::NAN), 0.0);
        assert_eq!(mf.evaluate(f64::INFINITY), 0.0);
    }

    #[test]
    fn rejects_wrong_arity() {
        let err = MembershipFunction::from_breakpoints(Shape::Triangle, &[1.0, 2.0]).unwrap_err();
        assert!(err.to_string().contains("needs 3 breakpoints"));
    }

    #[test]
    fn rejects_non_monotonic() {
        assert!(MembershipFunction::trapezoid(0.0, 30.0, 20.0, 50.0).is_err());
        assert!(MembershipFunction::triangle(10.0, 5.0, 20.0).is_err());
    }

    #[test]
    fn rejects_non_finite_breakpoints() {
        assert!(MembershipFunction::triangle(0.0, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn parse_from_text() {
        let mf: MembershipFunction = "trapezoid -1 -1 -0.5 0".parse().unwrap();
        assert_eq!(
            mf,
            MembershipFunction::Trapezoid {
                a: -1.0,
                b: -1.0,
                c: -0.5,
                d: 0.0
            }
        );
        let mf: MembershipFunction = "trimf [30, 50, 70]".parse().unwrap();
        assert_eq!(mf.shape(), Shape::Triangle);
        assert_eq!(mf.breakpoints(), vec![30.0, 50.0, 70.0]);
    }

    #[test]
    fn parse_rejects_unknown_shape() {
        let err = "gaussian 0 1".parse::<MembershipFunction>().unwrap_err();
        assert!(err.to_string().contains("unknown membership shape"));
    }

    #[test]
    fn display_renders_parseable_text() {
        let mf = MembershipFunction::triangle(-0.5, 0.0, 0.5).unwrap();
        assert_eq!(mf.to_string(), "triangle -0.5 0 0.5");
        assert_eq!(mf.to_string().parse::<MembershipFunction>().unwrap(), mf);
    }

    fn sorted4() -> impl Strategy<Value = [f64; 4]> {
        prop::array::uniform4(-100.0f64..100.0).prop_map(|mut p| {
            p.sort_by(|a, b| a.partial_cmp(b).unwrap());
            p
        })
    }

    proptest! {
        #[test]
        fn degree_always_in_unit_interval(p in sorted4(), x in -200.0f64..200.0) {
            let mf = MembershipFunction::trapezoid(p[0], p[1], p[2], p[3]).unwrap();
            let y = mf.evaluate(x);
            prop_assert!((0.0..=1.0).contains(&y));
        }

        #[test]
        fn zero_outside_bounds(p in sorted4(), offset in 0.001f64..50.0) {
            let tri = MembershipFunction::triangle(p[0], p[1], p[2]).unwrap();
            prop_assert_eq!(tri.evaluate(p[0] - offset), 0.0);
            prop_assert_eq!(tri.evaluate(p[2] + offset), 0.0);
            let trap = MembershipFunction::trapezoid(p[0], p[1], p[2], p[3]).unwrap();
            prop_assert_eq!(trap.evaluate(p[0] - offset), 0.0);
            prop_assert_eq!(trap.evaluate(p[3] + offset), 0.0);
        }

        #[test]
        fn one_on_plateau(p in sorted4(), t in 0.0f64..=1.0) {
            let trap = MembershipFunction::trapezoid(p[0], p[1], p[2], p[3]).unwrap();
            let x = (p[1] + (p[2] - p[1]) * t).clamp(p[1], p[2]);
            prop_assert_eq!(trap.evaluate(x), 1.0);
        }
    }
}
