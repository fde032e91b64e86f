//! Serializable views of a built curve for JSON output.

use gardener::api::{ArcSegment, Curve};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ArcSummary {
    pub first_gap: usize,
    pub gap_count: usize,
    /// Arc length from the curve start to this arc's start.
    pub offset: f64,
    /// Input indices of the two foci.
    pub foci: [usize; 2],
    pub string_sum: f64,
    pub theta_start: f64,
    pub theta_end: f64,
    pub length: f64,
    pub center: [f64; 2],
    pub semi_major: f64,
    pub semi_minor: f64,
    pub tilt: f64,
    pub eccentricity: f64,
}

impl ArcSummary {
    pub fn new(a: &ArcSegment, offset: f64) -> Self {
        Self {
            first_gap: a.first_gap,
            gap_count: a.gap_count,
            offset,
            foci: [a.foci.0.index, a.foci.1.index],
            string_sum: a.string_sum,
            theta_start: a.theta_start,
            theta_end: a.theta_end,
            length: a.length,
            center: [a.ellipse.center.x, a.ellipse.center.y],
            semi_major: a.ellipse.semi_major,
            semi_minor: a.ellipse.semi_minor,
            tilt: a.ellipse.tilt(),
            eccentricity: a.ellipse.eccentricity(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CurveSummary {
    pub version: &'static str,
    pub foci_in: usize,
    /// Input indices of the active hull, CCW from the anchor.
    pub active: Vec<usize>,
    pub perimeter: f64,
    pub loop_length: f64,
    pub slack: f64,
    pub total_length: f64,
    pub area: f64,
    pub arcs: Vec<ArcSummary>,
}

impl CurveSummary {
    pub fn new(curve: &Curve, foci_in: usize) -> Self {
        Self {
            version: gardener::VERSION,
            foci_in,
            active: curve.hull().vertices().iter().map(|f| f.index).collect(),
            perimeter: curve.hull().perimeter(),
            loop_length: curve.loop_length(),
            slack: curve.slack(),
            total_length: curve.total_length(),
            area: curve.area(),
            arcs: curve
                .arcs()
                .iter()
                .enumerate()
                .map(|(k, a)| ArcSummary::new(a, curve.arc_offset(k)))
                .collect(),
        }
    }
}

/// One row of a sweep: either a built curve's headline numbers or the error.
#[derive(Debug, Serialize)]
pub struct SweepRow {
    pub spec: String,
    pub loop_length: Option<f64>,
    pub arcs: Option<usize>,
    pub total_length: Option<f64>,
    pub area: Option<f64>,
    pub error: Option<String>,
}
