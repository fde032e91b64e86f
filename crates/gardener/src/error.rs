//! Errors surfaced by the curve construction.
//!
//! Every variant carries the offending inputs so callers can report them
//! without re-running the construction. Nothing is retried: the pipeline is
//! deterministic, so identical inputs fail identically.

use std::fmt;

use crate::extent::TransitionKind;
use crate::geom::Point;

#[derive(Clone, Debug, PartialEq)]
pub enum CurveError {
    /// Hull undefined: no foci, non-finite coordinates, all coincident, or
    /// three or more foci on one line (zero enclosed area).
    DegenerateInput { reason: &'static str, foci: Vec<Point> },
    /// Loop length is not a positive finite number.
    InvalidLoopLength { loop_length: f64 },
    /// The loop cannot be taut around the hull with any slack (`L <= P`).
    InsufficientSlack { loop_length: f64, perimeter: f64 },
    /// A transition root search did not bracket or did not converge.
    NonConvergentTransition {
        gap: usize,
        kind: TransitionKind,
        iterations: usize,
        bracket: (f64, f64),
    },
    /// The gaps facing the pencil on an arc are not one contiguous run.
    InconsistentTransitions { arc: usize, visible: Vec<usize> },
    /// Consecutive arcs disagree in position or tangent at their junction.
    JunctionMismatch {
        junction: usize,
        position_error: f64,
        tangent_error: f64,
    },
    /// The taut loop measured on the assembled curve is not the requested length.
    CurveLengthMismatch {
        expected: f64,
        measured: f64,
        arc: usize,
        point: Point,
    },
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveError::DegenerateInput { reason, foci } => {
                write!(f, "degenerate input ({} foci): {reason}", foci.len())
            }
            CurveError::InvalidLoopLength { loop_length } => {
                write!(f, "loop length {loop_length} is not a positive finite number")
            }
            CurveError::InsufficientSlack {
                loop_length,
                perimeter,
            } => write!(
                f,
                "loop length {loop_length} does not exceed hull perimeter {perimeter} (no slack)"
            ),
            CurveError::NonConvergentTransition {
                gap,
                kind,
                iterations,
                bracket,
            } => write!(
                f,
                "{kind:?} transition of gap {gap} did not converge after {iterations} iterations (bracket [{}, {}])",
                bracket.0, bracket.1
            ),
            CurveError::InconsistentTransitions { arc, visible } => write!(
                f,
                "arc {arc}: facing gaps {visible:?} are not one contiguous run"
            ),
            CurveError::JunctionMismatch {
                junction,
                position_error,
                tangent_error,
            } => write!(
                f,
                "junction {junction} is discontinuous (position error {position_error:e}, tangent error {tangent_error:e} rad)"
            ),
            CurveError::CurveLengthMismatch {
                expected,
                measured,
                arc,
                point,
            } => write!(
                f,
                "loop length {measured} at ({}, {}) on arc {arc} differs from {expected}",
                point.x, point.y
            ),
        }
    }
}

impl std::error::Error for CurveError {}
