// ABOUTME: Plain serializable value objects shared across the engine
// ABOUTME: Descriptors, nutrient vectors, resolution/grading/glycemic/comparison results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

/// Comparison results and margin bands
pub mod comparison;
/// Food descriptors, food types, and food groups
pub mod food;
/// Glycemic index/load results and bands
pub mod glycemic;
/// Grading results, wellness focuses, and bands
pub mod grading;
/// Canonical nutrient vector and field enumeration
pub mod nutrients;
/// Resolution results and provenance tags
pub mod resolution;

pub use comparison::{ComparisonMargin, ComparisonResult, FocusWinner};
pub use food::{FoodGroup, FoodType, IngredientSpec, NormalizedFoodDescriptor};
pub use glycemic::{GiBand, GiResult, GlBand, MealGiSummary};
pub use grading::{
    CompleteGradingResult, FocusGradeResult, InflammatoryBand, LetterGrade, SatietyBand,
    WellnessFocus,
};
pub use nutrients::{NutrientField, NutrientVector, UnitClass};
pub use resolution::{ResolutionResult, ResolutionSource, MIN_CACHEABLE_CONFIDENCE};
