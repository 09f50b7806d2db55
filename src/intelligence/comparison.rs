// ABOUTME: Deterministic comparison of graded foods: per-focus winners and nutrient leaders
// ABOUTME: Margin classification by score gap, lower-is-better handling for risk nutrients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! Comparison engine
//!
//! A pure, total function over already-graded foods. Winners are computed for
//! every focus, not just the caller's chosen one, so display layers can pivot
//! without re-ranking; the margin classifies the gap to the runner-up. Any
//! narrative attached downstream may describe the algorithmic winner but
//! never substitute a different one.

use crate::errors::{AppError, AppResult};
use crate::models::comparison::{ComparisonMargin, ComparisonResult, FocusWinner};
use crate::models::grading::{CompleteGradingResult, WellnessFocus};
use crate::models::nutrients::{NutrientField, NutrientVector};
use std::collections::HashMap;

/// Fields where less is better when comparing foods
const LOWER_IS_BETTER: &[NutrientField] = &[
    NutrientField::EnergyKcal,
    NutrientField::SodiumMg,
    NutrientField::SugarG,
    NutrientField::SaturatedFatG,
    NutrientField::TransFatG,
    NutrientField::CholesterolMg,
];

/// One food entering a comparison: its grading plus the per-serving vector it
/// was graded from
#[derive(Debug, Clone)]
pub struct GradedFood {
    /// Grading output for this food
    pub grading: CompleteGradingResult,
    /// Per-serving nutrient vector backing the grading
    pub nutrition: NutrientVector,
}

/// Deterministic comparison over graded foods
pub struct ComparisonEngine;

impl ComparisonEngine {
    /// Compare two or more graded foods.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when fewer than two foods are supplied.
    pub fn compare(foods: &[GradedFood], focus: WellnessFocus) -> AppResult<ComparisonResult> {
        if foods.len() < 2 {
            return Err(AppError::invalid_input(format!(
                "comparison requires at least 2 foods, got {}",
                foods.len()
            )));
        }

        let food_names: Vec<String> = foods
            .iter()
            .map(|food| food.grading.food_name.clone())
            .collect();

        let mut winners = HashMap::with_capacity(WellnessFocus::ALL.len());
        for &candidate_focus in WellnessFocus::ALL {
            if let Some(winner) = Self::focus_winner(foods, candidate_focus) {
                winners.insert(candidate_focus, winner);
            }
        }

        Ok(ComparisonResult {
            food_names,
            selected_focus: focus,
            winners,
            nutrient_leaders: Self::nutrient_leaders(foods),
        })
    }

    /// Winner and margin for one focus
    fn focus_winner(foods: &[GradedFood], focus: WellnessFocus) -> Option<FocusWinner> {
        let mut scored: Vec<(&str, f64)> = foods
            .iter()
            .filter_map(|food| {
                food.grading
                    .focus_grade(focus)
                    .map(|grade| (food.grading.food_name.as_str(), grade.score))
            })
            .collect();
        if scored.is_empty() {
            return None;
        }

        // descending by score; ties broken by name for determinism
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let (winner_name, winner_score) = scored[0];
        let gap = scored
            .get(1)
            .map_or(0.0, |(_, runner_up)| winner_score - runner_up);
        Some(FocusWinner {
            food_name: winner_name.to_owned(),
            score: winner_score,
            margin: ComparisonMargin::from_gap(gap),
        })
    }

    /// Per-nutrient leader across all fields, honoring the lower-is-better set
    fn nutrient_leaders(foods: &[GradedFood]) -> HashMap<NutrientField, String> {
        let mut leaders = HashMap::with_capacity(NutrientField::ALL.len());
        for &field in NutrientField::ALL {
            let lower_wins = LOWER_IS_BETTER.contains(&field);
            let leader = foods
                .iter()
                .map(|food| (food.grading.food_name.as_str(), food.nutrition.get(field)))
                .min_by(|a, b| {
                    let ordering = if lower_wins {
                        a.1.total_cmp(&b.1)
                    } else {
                        b.1.total_cmp(&a.1)
                    };
                    ordering.then_with(|| a.0.cmp(b.0))
                });
            if let Some((name, _)) = leader {
                leaders.insert(field, name.to_owned());
            }
        }
        leaders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GiAdjustmentConfig;
    use crate::intelligence::grader::DeterministicGrader;
    use crate::models::food::FoodGroup;

    fn graded(name: &str, nutrition: NutrientVector, group: FoodGroup) -> GradedFood {
        let grader = DeterministicGrader::new(GiAdjustmentConfig::default());
        let grading = grader.grade(name, &nutrition, 100.0, Some(group), false, None);
        GradedFood { grading, nutrition }
    }

    fn salmon() -> GradedFood {
        let mut n = NutrientVector::zero();
        n.energy_kcal = 208.0;
        n.protein_g = 20.4;
        n.fat_g = 13.4;
        n.saturated_fat_g = 3.1;
        n.omega3_g = 2.2;
        n.sodium_mg = 59.0;
        graded("salmon", n, FoodGroup::ProteinFoods)
    }

    fn candy() -> GradedFood {
        let mut n = NutrientVector::zero();
        n.energy_kcal = 390.0;
        n.carbohydrates_g = 98.0;
        n.sugar_g = 78.0;
        n.added_sugar_g = 78.0;
        graded("gummy bears", n, FoodGroup::Sweets)
    }

    #[test]
    fn test_single_food_is_rejected() {
        let err = ComparisonEngine::compare(&[salmon()], WellnessFocus::Balanced).unwrap_err();
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn test_all_ten_focuses_get_winners() {
        let result =
            ComparisonEngine::compare(&[salmon(), candy()], WellnessFocus::HeartHealth).unwrap();
        assert_eq!(result.winners.len(), WellnessFocus::ALL.len());
        assert_eq!(result.selected_focus, WellnessFocus::HeartHealth);
        let heart = result.selected_winner().unwrap();
        assert_eq!(heart.food_name, "salmon");
    }

    #[test]
    fn test_lower_is_better_fields_invert_leaders() {
        let result =
            ComparisonEngine::compare(&[salmon(), candy()], WellnessFocus::Balanced).unwrap();
        // candy has less sodium and less saturated fat, so it leads there
        assert_eq!(result.nutrient_leaders[&NutrientField::SodiumMg], "gummy bears");
        assert_eq!(
            result.nutrient_leaders[&NutrientField::SaturatedFatG],
            "gummy bears"
        );
        // salmon leads the higher-is-better protein field
        assert_eq!(result.nutrient_leaders[&NutrientField::ProteinG], "salmon");
        // and the lower-is-better energy field
        assert_eq!(result.nutrient_leaders[&NutrientField::EnergyKcal], "salmon");
    }

    #[test]
    fn test_margin_bands_classify_the_gap() {
        assert_eq!(ComparisonMargin::from_gap(30.0), ComparisonMargin::Decisive);
        assert_eq!(ComparisonMargin::from_gap(25.0), ComparisonMargin::Decisive);
        assert_eq!(ComparisonMargin::from_gap(18.0), ComparisonMargin::Moderate);
        assert_eq!(ComparisonMargin::from_gap(5.0), ComparisonMargin::Slight);
        assert_eq!(ComparisonMargin::from_gap(3.0), ComparisonMargin::Tie);
        assert_eq!(ComparisonMargin::from_gap(0.0), ComparisonMargin::Tie);
    }

    #[test]
    fn test_comparison_is_deterministic() {
        let foods = [salmon(), candy()];
        let a = ComparisonEngine::compare(&foods, WellnessFocus::GutHealth).unwrap();
        let b = ComparisonEngine::compare(&foods, WellnessFocus::GutHealth).unwrap();
        for focus in WellnessFocus::ALL {
            assert_eq!(a.winners[focus].food_name, b.winners[focus].food_name);
            assert_eq!(a.winners[focus].margin, b.winners[focus].margin);
        }
    }
}
