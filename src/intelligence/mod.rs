// ABOUTME: Assessment layer over resolved nutrient vectors
// ABOUTME: Glycemic lookup, deterministic grading, and food comparison
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! # Intelligence
//!
//! Everything downstream of resolution is pure and synchronous: the glycemic
//! lookup reads a compiled-in table, the grader is a function of the vector
//! and a few flags, and the comparison engine ranks already-graded foods.
//! None of these touch the network or the cache.

/// Deterministic comparison of graded foods
pub mod comparison;
/// Glycemic index/load lookup and meal aggregation
pub mod glycemic;
/// Overall, focus, satiety, and inflammatory grading
pub mod grader;

pub use comparison::{ComparisonEngine, GradedFood};
pub use glycemic::GlycemicLookup;
pub use grader::DeterministicGrader;
