//! Clock Control Logic
//!
//! State machines and business logic for clock generation.
//! Implements the decision core of the multimode clock source.

pub mod calc;
pub mod controller;
pub mod remote;
pub mod reset;
pub mod synth;
