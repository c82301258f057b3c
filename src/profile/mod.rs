//! Fitness profile domain: intake answers, validation and plan computation.
//!
//! Everything here is pure. The dialog feeds validated answers in and gets a
//! deterministic [`Plan`] back.

pub mod model;
pub mod plan;
pub mod validation;

pub use model::{ActivityLevel, Biometrics, Gender, Goal, Plan, Profile};
pub use plan::compute_plan;
