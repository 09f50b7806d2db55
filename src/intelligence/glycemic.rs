// ABOUTME: Glycemic index/load lookup against a curated reference table
// ABOUTME: Exact-name match, food-group default fallback, carb-weighted meal aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! Glycemic lookup
//!
//! GI is only defined for carbohydrate sources, so every lookup is gated on
//! the serving actually containing carbohydrate. An exact name match against
//! the curated table earns high confidence; a food-group default is a coarse
//! estimate and earns half. Meal GI is a carbohydrate-mass-weighted average
//! (GI is not additive); meal GL sums directly (GL is).

use crate::cache::normalize_name;
use crate::models::food::FoodGroup;
use crate::models::glycemic::{GiBand, GiResult, GlBand, MealGiSummary};
use crate::models::nutrients::NutrientVector;

/// Servings below this much carbohydrate have no meaningful GI
pub const MIN_RELEVANT_CARBS_G: f64 = 5.0;

/// Confidence for an exact-name table hit
const EXACT_CONFIDENCE: f64 = 0.9;
/// Confidence for a food-group default
const CATEGORY_CONFIDENCE: f64 = 0.5;

/// Curated GI reference values, keyed by normalized food name.
///
/// Values follow the International Tables of Glycemic Index (glucose = 100).
const GI_TABLE: &[(&str, f64)] = &[
    ("white rice", 73.0),
    ("white rice cooked", 73.0),
    ("brown rice", 68.0),
    ("brown rice cooked", 68.0),
    ("white bread", 75.0),
    ("whole wheat bread", 74.0),
    ("sourdough bread", 53.0),
    ("bagel", 69.0),
    ("oatmeal", 55.0),
    ("rolled oats", 55.0),
    ("muesli", 57.0),
    ("cornflakes", 81.0),
    ("pasta", 49.0),
    ("spaghetti", 49.0),
    ("quinoa", 53.0),
    ("couscous", 65.0),
    ("sweet corn", 52.0),
    ("popcorn", 65.0),
    ("potato", 78.0),
    ("boiled potato", 78.0),
    ("mashed potato", 87.0),
    ("french fries", 63.0),
    ("sweet potato", 63.0),
    ("banana", 51.0),
    ("apple", 36.0),
    ("orange", 43.0),
    ("grapes", 59.0),
    ("mango", 51.0),
    ("pineapple", 59.0),
    ("watermelon", 76.0),
    ("strawberries", 41.0),
    ("dates", 42.0),
    ("raisins", 64.0),
    ("orange juice", 50.0),
    ("apple juice", 41.0),
    ("lentils", 32.0),
    ("chickpeas", 28.0),
    ("black beans", 30.0),
    ("kidney beans", 24.0),
    ("soy beans", 16.0),
    ("hummus", 6.0),
    ("milk", 39.0),
    ("yogurt", 41.0),
    ("greek yogurt", 11.0),
    ("ice cream", 51.0),
    ("honey", 61.0),
    ("table sugar", 65.0),
    ("chocolate", 40.0),
    ("milk chocolate", 43.0),
    ("carrots", 39.0),
    ("green peas", 39.0),
    ("pumpkin", 64.0),
];

/// Representative GI per food group, used when no exact entry exists
const fn category_default(group: FoodGroup) -> Option<f64> {
    match group {
        FoodGroup::Fruits => Some(50.0),
        FoodGroup::Vegetables => Some(40.0),
        FoodGroup::Grains => Some(70.0),
        FoodGroup::Dairy => Some(35.0),
        FoodGroup::Legumes => Some(30.0),
        FoodGroup::NutsSeeds => Some(20.0),
        FoodGroup::Sweets => Some(65.0),
        FoodGroup::Beverages => Some(55.0),
        FoodGroup::MixedDishes => Some(55.0),
        FoodGroup::ProteinFoods | FoodGroup::Other => None,
    }
}

/// Glycemic index/load lookup over the curated reference table
pub struct GlycemicLookup;

impl GlycemicLookup {
    /// Whether a serving contains enough carbohydrate for GI to apply
    #[must_use]
    pub fn has_relevant_gi(nutrition: &NutrientVector) -> bool {
        nutrition.carbohydrates_g >= MIN_RELEVANT_CARBS_G
    }

    /// Look up the GI/GL of one food serving.
    ///
    /// Returns `None` for carbohydrate-irrelevant servings and for foods with
    /// neither an exact table entry nor a food-group default.
    #[must_use]
    pub fn lookup(
        name: &str,
        nutrition: &NutrientVector,
        food_group: Option<FoodGroup>,
    ) -> Option<GiResult> {
        if !Self::has_relevant_gi(nutrition) {
            return None;
        }

        let normalized = normalize_name(name);
        let exact = GI_TABLE
            .iter()
            .find(|(entry, _)| *entry == normalized)
            .map(|&(_, gi)| gi);

        let (gi, confidence, exact_match) = match exact {
            Some(gi) => (gi, EXACT_CONFIDENCE, true),
            None => {
                let gi = food_group.and_then(category_default)?;
                (gi, CATEGORY_CONFIDENCE, false)
            }
        };

        // GL = GI x available carbohydrate (g) / 100, per serving
        let gl = gi * nutrition.carbohydrates_g / 100.0;
        Some(GiResult {
            gi,
            gl,
            gi_band: GiBand::from_gi(gi),
            gl_band: GlBand::from_gl(gl),
            confidence,
            exact_match,
        })
    }

    /// Carbohydrate-mass-weighted meal GI.
    ///
    /// Items without a GI or without carbohydrate are excluded from the
    /// weighting; when nothing contributes the meal GI is absent rather than
    /// a division by zero.
    #[must_use]
    pub fn calculate_meal_gi(items: &[(Option<GiResult>, f64)]) -> Option<f64> {
        let mut weighted = 0.0;
        let mut total_carbs = 0.0;
        for (gi, carbs_g) in items {
            if let Some(gi) = gi {
                if *carbs_g > 0.0 {
                    weighted += gi.gi * carbs_g;
                    total_carbs += carbs_g;
                }
            }
        }
        (total_carbs > 0.0).then(|| weighted / total_carbs)
    }

    /// Additive meal glycemic load
    #[must_use]
    pub fn calculate_meal_gl(items: &[(Option<GiResult>, f64)]) -> f64 {
        items
            .iter()
            .filter_map(|(gi, _)| gi.as_ref().map(|gi| gi.gl))
            .sum()
    }

    /// Aggregate a meal's per-item GI results into one summary.
    ///
    /// `items` pairs each item's lookup outcome with its per-serving
    /// carbohydrate mass in grams.
    #[must_use]
    pub fn summarize_meal(items: &[(Option<GiResult>, f64)]) -> MealGiSummary {
        let meal_gi = Self::calculate_meal_gi(items);
        let meal_gl = Self::calculate_meal_gl(items);
        MealGiSummary {
            meal_gi,
            meal_gi_band: meal_gi.map(GiBand::from_gi),
            meal_gl,
            meal_gl_band: GlBand::from_gl(meal_gl),
            contributing_items: items.iter().filter(|(gi, _)| gi.is_some()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carby(carbs_g: f64) -> NutrientVector {
        let mut nutrition = NutrientVector::zero();
        nutrition.carbohydrates_g = carbs_g;
        nutrition
    }

    #[test]
    fn test_exact_match_beats_category_default() {
        let result =
            GlycemicLookup::lookup("White Rice", &carby(28.0), Some(FoodGroup::Grains)).unwrap();
        assert!((result.gi - 73.0).abs() < f64::EPSILON);
        assert!(result.exact_match);
        assert!((result.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_category_default_is_low_confidence() {
        let result =
            GlycemicLookup::lookup("purple barley blend", &carby(30.0), Some(FoodGroup::Grains))
                .unwrap();
        assert!((result.gi - 70.0).abs() < f64::EPSILON);
        assert!(!result.exact_match);
        assert!((result.confidence - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_low_carb_food_is_gated_out() {
        assert!(GlycemicLookup::lookup("chicken breast", &carby(0.0), None).is_none());
        assert!(GlycemicLookup::lookup("white rice", &carby(4.9), Some(FoodGroup::Grains)).is_none());
    }

    #[test]
    fn test_glycemic_load_scales_with_carbs() {
        let result = GlycemicLookup::lookup("white rice", &carby(50.0), None).unwrap();
        assert!((result.gl - 36.5).abs() < 1e-9);
        assert_eq!(result.gl_band, GlBand::High);
    }

    #[test]
    fn test_meal_gi_is_carb_weighted() {
        let rice = GlycemicLookup::lookup("white rice", &carby(50.0), None);
        let apple = GlycemicLookup::lookup("apple", &carby(25.0), None);
        let meal_gi =
            GlycemicLookup::calculate_meal_gi(&[(rice, 50.0), (apple, 25.0)]).unwrap();
        // (73*50 + 36*25) / 75
        assert!((meal_gi - 60.666_666_666_666_664).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_carb_meal_has_no_gi() {
        let summary = GlycemicLookup::summarize_meal(&[(None, 0.0), (None, 0.0)]);
        assert!(summary.meal_gi.is_none());
        assert!(summary.meal_gi_band.is_none());
        assert!(summary.meal_gl.abs() < f64::EPSILON);
        assert_eq!(summary.contributing_items, 0);
    }
}
