//! # Safety Factors
//!
//! Factor-of-safety checks for the bolt (yield under statically applied
//! tension) and the plate (bearing at the bolt holes).

use crate::errors::{JointError, JointResult};
use crate::fastener::stiffness::segregate_loads;

/// Factor of safety against yielding the bolt under a statically applied
/// tension load.
///
/// The bolt sees its share of the external load (per the joint stiffness
/// constant `c`) plus the full preload; the resulting stress over the
/// tensile area is compared against the yield strength.
///
/// # Arguments
///
/// * `c` - Joint stiffness constant (fraction of load carried by the bolt)
/// * `load` - External load applied to this bolt (N or lbf)
/// * `preload` - Preload applied to this bolt (N or lbf)
/// * `a_ts` - Tensile stress area (mm^2 or in^2)
/// * `bolt_yield` - Bolt yield strength (MPa or psi)
pub fn bolt_yield_safety_factor(
    c: f64,
    load: f64,
    preload: f64,
    a_ts: f64,
    bolt_yield: f64,
) -> JointResult<f64> {
    if a_ts <= 0.0 {
        return Err(JointError::domain(
            "bolt_yield_safety_factor",
            format!("Tensile stress area must be positive, got {}", a_ts),
        ));
    }

    let bolt_load = segregate_loads(c, load).0 + preload;
    let stress = bolt_load / a_ts;
    if stress <= 0.0 {
        return Err(JointError::domain(
            "bolt_yield_safety_factor",
            "Bolt carries no tension; factor of safety is undefined",
        ));
    }
    Ok(bolt_yield / stress)
}

/// Factor of safety against bearing failure of the plate at the bolt
/// holes.
///
/// Bearing stress is the load over the projected bearing area
/// `d * t * n`; allowable bearing stress is taken as `1.5 * sigma_y`.
///
/// # Arguments
///
/// * `load` - Total external load on the joint (N)
/// * `bolt_diameter` - Bolt major diameter (mm)
/// * `plate_thickness` - Plate thickness (mm)
/// * `num_bolts` - Number of bolts sharing the load
/// * `plate_yield` - Plate yield strength (MPa)
pub fn plate_bearing_safety_factor(
    load: f64,
    bolt_diameter: f64,
    plate_thickness: f64,
    num_bolts: u32,
    plate_yield: f64,
) -> JointResult<f64> {
    let bearing_area = bolt_diameter * plate_thickness * num_bolts as f64;
    if bearing_area <= 0.0 {
        return Err(JointError::domain(
            "plate_bearing_safety_factor",
            format!("Bearing area must be positive, got {}", bearing_area),
        ));
    }
    if load <= 0.0 {
        return Err(JointError::domain(
            "plate_bearing_safety_factor",
            "Bearing stress is undefined without a positive load",
        ));
    }

    let bearing_stress = load / bearing_area;
    Ok(1.5 * plate_yield / bearing_stress)
}
