//! # Joint Configuration and Results
//!
//! Core data types for a bolted-joint design task: the immutable
//! [`JointConfiguration`] describing the joint being designed, the
//! [`Candidate`] variable the search mutates, and the
//! [`SafetyFactorResult`] produced by each evaluation.
//!
//! All types are JSON-serializable so a design run can be stored or
//! replayed verbatim.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "load_n": 60000.0,
//!   "desired_safety_factor": 3.0,
//!   "preload_n": 150000.0,
//!   "pitch_mm": 1.5,
//!   "plate_thickness_mm": 10.0,
//!   "bolt_yield_strength_mpa": 940.0,
//!   "plate_yield_strength_mpa": 250.0,
//!   "bolt_elastic_modulus_gpa": 210.0,
//!   "plate_elastic_modulus_gpa": 210.0
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{JointError, JointResult};

/// Immutable description of a bolted joint design task.
///
/// Created once per task and passed by reference to every evaluation;
/// never mutated. Two plates of equal thickness and material are assumed
/// (total clamped length is `2 * plate_thickness_mm`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointConfiguration {
    /// External load applied to the joint (N)
    pub load_n: f64,

    /// Target factor of safety for both bolt and plate
    pub desired_safety_factor: f64,

    /// Total preload across the joint (N); split evenly per bolt
    pub preload_n: f64,

    /// Thread pitch (mm)
    pub pitch_mm: f64,

    /// Thickness of each clamped plate (mm)
    pub plate_thickness_mm: f64,

    /// Bolt material yield strength (MPa)
    pub bolt_yield_strength_mpa: f64,

    /// Plate material yield strength (MPa)
    pub plate_yield_strength_mpa: f64,

    /// Bolt elastic modulus (GPa)
    pub bolt_elastic_modulus_gpa: f64,

    /// Plate elastic modulus (GPa)
    pub plate_elastic_modulus_gpa: f64,
}

impl JointConfiguration {
    /// Validate configuration parameters.
    pub fn validate(&self) -> JointResult<()> {
        let positive = [
            ("load_n", self.load_n),
            ("desired_safety_factor", self.desired_safety_factor),
            ("pitch_mm", self.pitch_mm),
            ("plate_thickness_mm", self.plate_thickness_mm),
            ("bolt_yield_strength_mpa", self.bolt_yield_strength_mpa),
            ("plate_yield_strength_mpa", self.plate_yield_strength_mpa),
            ("bolt_elastic_modulus_gpa", self.bolt_elastic_modulus_gpa),
            ("plate_elastic_modulus_gpa", self.plate_elastic_modulus_gpa),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(JointError::invalid_input(
                    field,
                    value.to_string(),
                    "Value must be positive",
                ));
            }
        }
        if self.preload_n < 0.0 {
            return Err(JointError::invalid_input(
                "preload_n",
                self.preload_n.to_string(),
                "Preload cannot be negative",
            ));
        }
        Ok(())
    }

    /// Total clamped length: two plates of equal thickness (mm)
    pub fn clamped_length_mm(&self) -> f64 {
        2.0 * self.plate_thickness_mm
    }
}

/// The design variable the search mutates: a bolt count and major diameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Number of bolts in the pattern (>= 1)
    pub num_bolts: u32,

    /// Major diameter of each bolt (mm, > 0)
    pub bolt_diameter_mm: f64,
}

impl Candidate {
    pub fn new(num_bolts: u32, bolt_diameter_mm: f64) -> Self {
        Candidate {
            num_bolts,
            bolt_diameter_mm,
        }
    }

    /// Validate that the candidate can be evaluated at all.
    ///
    /// The physical model must never see a non-positive dimension, so every
    /// caller validates before invoking it.
    pub fn validate(&self) -> JointResult<()> {
        if self.num_bolts < 1 {
            return Err(JointError::domain(
                "candidate",
                "num_bolts must be at least 1",
            ));
        }
        if self.bolt_diameter_mm <= 0.0 {
            return Err(JointError::domain(
                "candidate",
                format!(
                    "bolt_diameter_mm must be positive, got {}",
                    self.bolt_diameter_mm
                ),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {} mm", self.num_bolts, self.bolt_diameter_mm)
    }
}

/// Acceptance bands around the desired safety factor.
///
/// Defaults match the original design intent: a tight band for the bolt
/// and a looser one for the plate bearing check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Half-width of the bolt FOS acceptance band
    pub bolt: f64,

    /// Half-width of the plate FOS acceptance band
    pub plate: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            bolt: 0.1,
            plate: 0.5,
        }
    }
}

impl Tolerances {
    /// A caller-supplied symmetric band applied to both factors.
    pub fn symmetric(half_width: f64) -> Self {
        Tolerances {
            bolt: half_width,
            plate: half_width,
        }
    }
}

/// Classification of a computed factor of safety against the target band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FosComparison {
    HigherThanDesired,
    LowerThanDesired,
    WithinAcceptableRange,
}

impl FosComparison {
    /// Classify `fos` against `desired` with the given half-width band.
    pub fn classify(fos: f64, desired: f64, half_width: f64) -> Self {
        if fos > desired + half_width {
            FosComparison::HigherThanDesired
        } else if fos < desired - half_width {
            FosComparison::LowerThanDesired
        } else {
            FosComparison::WithinAcceptableRange
        }
    }

    /// Phrase used in human-readable summaries
    pub fn phrase(&self) -> &'static str {
        match self {
            FosComparison::HigherThanDesired => "higher than desired",
            FosComparison::LowerThanDesired => "lower than desired",
            FosComparison::WithinAcceptableRange => "within acceptable range",
        }
    }
}

/// Result of evaluating one [`Candidate`] against a [`JointConfiguration`].
///
/// Immutable once produced. `bolt_diff` / `plate_diff` are the signed
/// distances from the target factor; `ok` is true when both fall within
/// their tolerance bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyFactorResult {
    /// Factor of safety against bolt yield
    pub bolt_fos: f64,

    /// Factor of safety against plate bearing failure
    pub plate_fos: f64,

    /// `bolt_fos - desired_safety_factor`
    pub bolt_diff: f64,

    /// `plate_fos - desired_safety_factor`
    pub plate_diff: f64,

    /// Bolt FOS classified against the tolerance band
    pub bolt_comparison: FosComparison,

    /// Plate FOS classified against the tolerance band
    pub plate_comparison: FosComparison,

    /// Both factors within tolerance
    pub ok: bool,
}

impl SafetyFactorResult {
    /// Derive a result from raw factors, the target, and tolerance bands.
    pub fn from_factors(
        bolt_fos: f64,
        plate_fos: f64,
        desired_safety_factor: f64,
        tolerances: Tolerances,
    ) -> Self {
        let bolt_diff = bolt_fos - desired_safety_factor;
        let plate_diff = plate_fos - desired_safety_factor;
        SafetyFactorResult {
            bolt_fos,
            plate_fos,
            bolt_diff,
            plate_diff,
            bolt_comparison: FosComparison::classify(
                bolt_fos,
                desired_safety_factor,
                tolerances.bolt,
            ),
            plate_comparison: FosComparison::classify(
                plate_fos,
                desired_safety_factor,
                tolerances.plate,
            ),
            ok: bolt_diff.abs() <= tolerances.bolt && plate_diff.abs() <= tolerances.plate,
        }
    }

    /// Human-readable one-line summary of the evaluation.
    pub fn summary(&self) -> String {
        format!(
            "The factor of safety for bolts is {:.2} ({}) and the factor of safety for plates is {:.2} ({}).",
            self.bolt_fos,
            self.bolt_comparison.phrase(),
            self.plate_fos,
            self.plate_comparison.phrase(),
        )
    }
}
