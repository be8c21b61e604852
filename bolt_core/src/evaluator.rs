//! # Evaluators
//!
//! One uniform contract over the two ways of judging a candidate design:
//! the closed-form analytical path (this crate's [`crate::fastener`]
//! model plus a bearing-stress check) and a delegated high-fidelity path
//! where an external structural-analysis capability supplies the plate
//! factor from a numerical stress field.
//!
//! Both implement [`Evaluate`]; callers can substitute one for the other
//! transparently. Errors are never swallowed here - a `Domain` error from
//! the physical model propagates unchanged.
//!
//! ## Example
//!
//! ```rust
//! use bolt_core::evaluator::{AnalyticalEvaluator, Evaluate};
//! use bolt_core::joint::{Candidate, JointConfiguration};
//!
//! let config = JointConfiguration {
//!     load_n: 60000.0,
//!     desired_safety_factor: 3.0,
//!     preload_n: 150000.0,
//!     pitch_mm: 1.5,
//!     plate_thickness_mm: 10.0,
//!     bolt_yield_strength_mpa: 940.0,
//!     plate_yield_strength_mpa: 250.0,
//!     bolt_elastic_modulus_gpa: 210.0,
//!     plate_elastic_modulus_gpa: 210.0,
//! };
//! let evaluator = AnalyticalEvaluator::default();
//! let result = evaluator.evaluate(&Candidate::new(4, 20.0), &config).unwrap();
//! assert!(result.bolt_fos > 0.0 && result.plate_fos > 0.0);
//! ```

use crate::errors::JointResult;
use crate::fastener::{
    bolt_yield_safety_factor, joint_stiffness_constant, plate_bearing_safety_factor,
    tensile_stress_area, ThreadSpec,
};
use crate::joint::{Candidate, JointConfiguration, SafetyFactorResult, Tolerances};

/// Capability interface for judging one candidate against a configuration.
///
/// Implementations must be pure with respect to their inputs: the same
/// `(candidate, config)` pair always yields the same result.
pub trait Evaluate {
    fn evaluate(
        &self,
        candidate: &Candidate,
        config: &JointConfiguration,
    ) -> JointResult<SafetyFactorResult>;

    /// Identifier recorded against each logged iteration.
    fn id(&self) -> &'static str {
        "evaluator"
    }
}

/// Closed-form evaluator: Cornwell joint stiffness, bolt yield check,
/// and plate bearing check.
#[derive(Debug, Clone, Default)]
pub struct AnalyticalEvaluator {
    pub tolerances: Tolerances,
}

impl AnalyticalEvaluator {
    pub fn new(tolerances: Tolerances) -> Self {
        AnalyticalEvaluator { tolerances }
    }

    /// Bolt factor of safety for one candidate. Shared with the
    /// high-fidelity evaluator, whose bolt path stays analytical.
    fn bolt_fos(&self, candidate: &Candidate, config: &JointConfiguration) -> JointResult<f64> {
        let n = candidate.num_bolts as f64;
        let load_per_bolt = config.load_n / n;
        let preload_per_bolt = config.preload_n / n;

        let threads = ThreadSpec::Metric {
            pitch_mm: config.pitch_mm,
        };
        let a_ts = tensile_stress_area(candidate.bolt_diameter_mm, &threads)?;

        // Moduli enter only as a ratio, so GPa is fine as-is
        let c = joint_stiffness_constant(
            candidate.bolt_diameter_mm,
            config.clamped_length_mm(),
            config.plate_elastic_modulus_gpa,
            config.bolt_elastic_modulus_gpa,
        )?;

        bolt_yield_safety_factor(
            c,
            load_per_bolt,
            preload_per_bolt,
            a_ts,
            config.bolt_yield_strength_mpa,
        )
    }
}

impl Evaluate for AnalyticalEvaluator {
    fn evaluate(
        &self,
        candidate: &Candidate,
        config: &JointConfiguration,
    ) -> JointResult<SafetyFactorResult> {
        candidate.validate()?;
        config.validate()?;

        let bolt_fos = self.bolt_fos(candidate, config)?;
        let plate_fos = plate_bearing_safety_factor(
            config.load_n,
            candidate.bolt_diameter_mm,
            config.plate_thickness_mm,
            candidate.num_bolts,
            config.plate_yield_strength_mpa,
        )?;

        Ok(SafetyFactorResult::from_factors(
            bolt_fos,
            plate_fos,
            config.desired_safety_factor,
            self.tolerances,
        ))
    }

    fn id(&self) -> &'static str {
        "analytical_fos_calculation"
    }
}

/// Plate geometry and loading handed to an external stress-analysis
/// capability. All lengths in metres; the standard two-plate lap-joint
/// test article (0.1 m x 0.2 m) with holes spaced evenly along the
/// length.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateAnalysisRequest {
    pub plate_thickness_m: f64,
    pub num_holes: u32,
    pub elastic_modulus_gpa: f64,
    pub yield_strength_mpa: f64,
    pub load_n: f64,
    pub hole_radius_m: f64,
    pub plate_length_m: f64,
    pub plate_width_m: f64,
    pub edge_margin_m: f64,
    pub hole_spacing_m: f64,
    pub hole_offset_from_bottom_m: f64,
    pub plate_gap_mm: f64,
    pub poissons_ratio: f64,
}

/// External numerical stress-analysis capability (out of scope for this
/// crate). May block for an unbounded time; no cancellation hook.
pub trait PlateStressAnalysis {
    fn plate_fos(&self, request: &PlateAnalysisRequest) -> JointResult<f64>;
}

/// High-fidelity evaluator: delegates the plate factor to an external
/// analysis capability; the bolt factor remains analytical.
#[derive(Debug, Clone)]
pub struct HighFidelityEvaluator<A: PlateStressAnalysis> {
    analysis: A,
    analytical: AnalyticalEvaluator,
}

impl<A: PlateStressAnalysis> HighFidelityEvaluator<A> {
    pub fn new(analysis: A, tolerances: Tolerances) -> Self {
        HighFidelityEvaluator {
            analysis,
            analytical: AnalyticalEvaluator::new(tolerances),
        }
    }

    /// Build the analysis request for one candidate.
    ///
    /// Dimensions follow the standard test article: margins and hole
    /// spacing distribute the pattern evenly along the plate length.
    fn request(&self, candidate: &Candidate, config: &JointConfiguration) -> PlateAnalysisRequest {
        let plate_length_m = 0.2;
        let plate_width_m = 0.1;
        let n = candidate.num_bolts as f64;
        PlateAnalysisRequest {
            plate_thickness_m: config.plate_thickness_mm / 1000.0,
            num_holes: candidate.num_bolts,
            elastic_modulus_gpa: config.plate_elastic_modulus_gpa,
            yield_strength_mpa: config.plate_yield_strength_mpa,
            load_n: config.load_n,
            hole_radius_m: candidate.bolt_diameter_mm / 2000.0,
            plate_length_m,
            plate_width_m,
            edge_margin_m: plate_length_m / (2.0 * n),
            hole_spacing_m: plate_length_m / n,
            hole_offset_from_bottom_m: 0.020,
            plate_gap_mm: 0.01,
            poissons_ratio: 0.3,
        }
    }
}

impl<A: PlateStressAnalysis> Evaluate for HighFidelityEvaluator<A> {
    fn evaluate(
        &self,
        candidate: &Candidate,
        config: &JointConfiguration,
    ) -> JointResult<SafetyFactorResult> {
        candidate.validate()?;
        config.validate()?;

        let bolt_fos = self.analytical.bolt_fos(candidate, config)?;
        let plate_fos = self.analysis.plate_fos(&self.request(candidate, config))?;

        Ok(SafetyFactorResult::from_factors(
            bolt_fos,
            plate_fos,
            config.desired_safety_factor,
            self.analytical.tolerances,
        ))
    }

    fn id(&self) -> &'static str {
        "fea_fos_calculation"
    }
}
