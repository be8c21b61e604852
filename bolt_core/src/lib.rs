//! # bolt_core - Bolted-Joint Design Engine
//!
//! `bolt_core` sizes bolted mechanical joints: given a joint
//! configuration (load, preload, materials, plate geometry) it finds a
//! bolt count and diameter that meet independent safety-factor targets
//! for both the bolts and the clamped plates.
//!
//! ## Design Philosophy
//!
//! - **Stateless physics**: the joint model is pure functions over a
//!   read-only coefficient table
//! - **Pure search**: the design search is a state-transition function
//!   over its own history, so runs can be checkpointed and replayed
//! - **JSON-First**: configurations, candidates, and results all
//!   implement Serialize/Deserialize
//! - **Auditable**: every evaluated candidate can be appended to a
//!   durable SQLite iteration log
//!
//! ## Quick Start
//!
//! ```rust
//! use bolt_core::evaluator::AnalyticalEvaluator;
//! use bolt_core::joint::JointConfiguration;
//! use bolt_core::search::SearchSettings;
//! use bolt_core::driver::run_design_search;
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
//!
//! let report = run_design_search(
//!     &config,
//!     &AnalyticalEvaluator::default(),
//!     &SearchSettings::default(),
//!     None,
//! ).unwrap();
//! println!("{:?}: {:?}", report.outcome.status, report.outcome.final_candidate);
//! ```
//!
//! ## Modules
//!
//! - [`joint`] - configuration, candidate, and result types
//! - [`fastener`] - thread geometry, joint stiffness, safety factors
//! - [`evaluator`] - analytical and high-fidelity evaluation behind one trait
//! - [`search`] - the bracket-and-bisect design search engine
//! - [`logstore`] - durable iteration log (SQLite, WAL)
//! - [`driver`] - the reference search loop
//! - [`errors`] - structured error types

pub mod driver;
pub mod errors;
pub mod evaluator;
pub mod fastener;
pub mod joint;
pub mod logstore;
pub mod search;

// Re-export commonly used types at crate root for convenience
pub use driver::{run_design_search, SearchReport};
pub use errors::{JointError, JointResult};
pub use evaluator::{AnalyticalEvaluator, Evaluate, HighFidelityEvaluator};
pub use joint::{Candidate, JointConfiguration, SafetyFactorResult, Tolerances};
pub use logstore::{IterationLog, IterationRecord};
pub use search::{next_candidate, SearchOutcome, SearchSettings, SearchStatus, SearchStep};
