//! # Joint Stiffness (Cornwell Method)
//!
//! Stiffness constant for a bolted joint with two plates of the same
//! material, per the Cornwell empirical fit described by Norton for
//! eq 15.19 and tabulated in table 15-8.
//!
//! The table maps the aspect ratio `j = d_bolt / clamped_length` to four
//! cubic coefficients in the member-to-bolt modulus ratio. Lookup is an
//! index-based scan over the fixed, pre-sorted array with explicit
//! boundary clamping; ratios outside the published 0.1..2.0 range
//! saturate to the nearest row rather than extrapolating.

use crate::errors::{JointError, JointResult};

/// One row of the Cornwell coefficient table: aspect ratio and the four
/// polynomial coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornwellRow {
    pub j: f64,
    pub p0: f64,
    pub p1: f64,
    pub p2: f64,
    pub p3: f64,
}

const fn row(j: f64, p0: f64, p1: f64, p2: f64, p3: f64) -> CornwellRow {
    CornwellRow { j, p0, p1, p2, p3 }
}

/// Norton table 15-8, ordered ascending by `j`. Read-only.
pub static CORNWELL_TABLE: [CornwellRow; 14] = [
    row(0.10, 0.4389, -0.9197, 0.8901, -0.3187),
    row(0.20, 0.6118, -1.1715, 1.0875, -0.3806),
    row(0.30, 0.6932, -1.2426, 1.1177, -0.3845),
    row(0.40, 0.7351, -1.2612, 1.1111, -0.3779),
    row(0.50, 0.7580, -1.2632, 1.0979, -0.3708),
    row(0.60, 0.7709, -1.2600, 1.0851, -0.3647),
    row(0.70, 0.7773, -1.2543, 1.0735, -0.3595),
    row(0.80, 0.7800, -1.2503, 1.0672, -0.3571),
    row(0.90, 0.7797, -1.2458, 1.0620, -0.3552),
    row(1.00, 0.7774, -1.2413, 1.0577, -0.3537),
    row(1.25, 0.7667, -1.2333, 1.0548, -0.3535),
    row(1.50, 0.7518, -1.2264, 1.0554, -0.3550),
    row(1.75, 0.7350, -1.2202, 1.0581, -0.3574),
    row(2.00, 0.7175, -1.2133, 1.0604, -0.3596),
];

/// Row-selection tolerance: a ratio within this distance of a table row
/// reuses that row on both sides of the bracket.
const ROW_TOLERANCE: f64 = 0.01;

/// Locate the pair of table rows bracketing `j`.
///
/// Returns `(lower, upper)`, which are the same row when `j` lands on a
/// row (within tolerance) or saturates past either end of the table.
fn bracket_rows(j: f64) -> (&'static CornwellRow, &'static CornwellRow) {
    // Exact-row hit (inclusive tolerance) degenerates to that row
    if let Some(hit) = CORNWELL_TABLE
        .iter()
        .find(|r| (r.j - j).abs() <= ROW_TOLERANCE)
    {
        return (hit, hit);
    }

    let first = &CORNWELL_TABLE[0];
    let last = &CORNWELL_TABLE[CORNWELL_TABLE.len() - 1];
    if j < first.j {
        return (first, first);
    }
    if j > last.j {
        return (last, last);
    }

    // Interior: find the adjacent pair straddling j
    for pair in CORNWELL_TABLE.windows(2) {
        if pair[0].j < j && j < pair[1].j {
            return (&pair[0], &pair[1]);
        }
    }

    // Unreachable given the checks above; saturate rather than panic
    (last, last)
}

/// Linear interpolation through `(x1, y1)` and `(x2, y2)` evaluated at `x`.
/// Degenerates to `y1` when the interval is empty.
fn linterp(x1: f64, x2: f64, y1: f64, y2: f64, x: f64) -> f64 {
    if x2 == x1 {
        return y1;
    }
    let m = (y2 - y1) / (x2 - x1);
    (x - x1) * m + y1
}

/// Joint stiffness constant `c` for a bolted joint (Norton eq 15.19).
///
/// `c` is the fraction of an external load carried by the bolt; the
/// complement `1 - c` is carried by the clamped members.
///
/// # Arguments
///
/// * `d_bolt` - Bolt major diameter (mm or in)
/// * `clamped_length` - Total clamped (grip) length (mm or in)
/// * `e_member` - Member material elastic modulus
/// * `e_bolt` - Bolt material elastic modulus (same unit as `e_member`)
///
/// # Errors
///
/// `Domain` when `clamped_length` or `e_bolt` is zero or negative -
/// these indicate an invalid joint geometry, not a zero-stiffness joint.
pub fn joint_stiffness_constant(
    d_bolt: f64,
    clamped_length: f64,
    e_member: f64,
    e_bolt: f64,
) -> JointResult<f64> {
    if clamped_length <= 0.0 {
        return Err(JointError::domain(
            "joint_stiffness_constant",
            format!("Clamped length must be positive, got {}", clamped_length),
        ));
    }
    if e_bolt <= 0.0 {
        return Err(JointError::domain(
            "joint_stiffness_constant",
            format!("Bolt elastic modulus must be positive, got {}", e_bolt),
        ));
    }

    let j = d_bolt / clamped_length;
    let (lo, hi) = bracket_rows(j);

    let p0 = linterp(lo.j, hi.j, lo.p0, hi.p0, j);
    let p1 = linterp(lo.j, hi.j, lo.p1, hi.p1, j);
    let p2 = linterp(lo.j, hi.j, lo.p2, hi.p2, j);
    let p3 = linterp(lo.j, hi.j, lo.p3, hi.p3, j);

    let r = e_member / e_bolt;
    Ok(p3 * r.powi(3) + p2 * r.powi(2) + p1 * r + p0)
}

/// Split an external load between the bolt and the clamped members.
///
/// Returns `(bolt_load, member_load)`; the two always sum to `load`.
pub fn segregate_loads(c: f64, load: f64) -> (f64, f64) {
    (c * load, (1.0 - c) * load)
}

/// Spring constant of a bolt as two springs in series: the threaded and
/// unthreaded portions of the grip.
///
/// # Arguments
///
/// * `a_ts` - Tensile stress area of the threaded portion
/// * `a_cs` - Full cross-sectional area of the shank
/// * `l_unthreaded` - Unthreaded shank length within the grip
/// * `l_threaded` - Threaded length within the grip
/// * `e_bolt` - Bolt elastic modulus
pub fn bolt_stiffness(
    a_ts: f64,
    a_cs: f64,
    l_unthreaded: f64,
    l_threaded: f64,
    e_bolt: f64,
) -> JointResult<f64> {
    let denominator = a_cs * l_threaded + a_ts * l_unthreaded;
    if denominator <= 0.0 {
        return Err(JointError::domain(
            "bolt_stiffness",
            "Grip length and section areas must give a positive series denominator",
        ));
    }
    Ok(a_ts * a_cs * e_bolt / denominator)
}
