//! Shift rostering with an exact mixed-integer solver.
//!
//! This library normalizes roster requests, builds a 0-1 model over eligible
//! (shift, employee) pairs, and minimizes wage cost plus soft penalties
//! under a time budget.

pub mod api;
pub mod audit;
#[cfg(feature = "console")]
pub mod console;
pub mod demo_data;
pub mod domain;
pub mod dto;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod solver;
