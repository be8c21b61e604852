//! # Fastener Physical Model
//!
//! Closed-form and table-interpolated formulas for bolted joints, after
//! Norton's *Machine Design* chapter 15. Everything here is a pure
//! function over geometry and material properties; the only data is the
//! read-only Cornwell coefficient table in [`stiffness`].
//!
//! - [`thread`] - thread geometry and stress areas (eq 15.1)
//! - [`stiffness`] - joint stiffness constant (eq 15.19, table 15-8),
//!   load segregation, bolt spring constant
//! - [`safety`] - bolt yield and plate bearing safety factors

pub mod safety;
pub mod stiffness;
pub mod thread;

pub use safety::{bolt_yield_safety_factor, plate_bearing_safety_factor};
pub use stiffness::{bolt_stiffness, joint_stiffness_constant, segregate_loads};
pub use thread::{shear_area, tensile_stress_area, ThreadSpec};
