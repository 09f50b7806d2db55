// ABOUTME: Integration tests for glycemic lookup, deterministic grading, and comparison
// ABOUTME: Purity, band edges, GI adjustment clamping, meal GI aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use platewise_engine::config::GiAdjustmentConfig;
use platewise_engine::intelligence::{ComparisonEngine, DeterministicGrader, GlycemicLookup};
use platewise_engine::intelligence::comparison::GradedFood;
use platewise_engine::models::food::FoodGroup;
use platewise_engine::models::grading::{
    CompleteGradingResult, FocusGradeResult, LetterGrade, WellnessFocus,
};
use platewise_engine::models::comparison::ComparisonMargin;
use platewise_engine::models::NutrientVector;

fn oatmeal_per_100g() -> NutrientVector {
    let mut n = NutrientVector::zero();
    n.energy_kcal = 68.0;
    n.protein_g = 2.4;
    n.carbohydrates_g = 12.0;
    n.fiber_g = 1.7;
    n.sugar_g = 0.5;
    n.fat_g = 1.4;
    n.sodium_mg = 49.0;
    n.magnesium_mg = 26.0;
    n.iron_mg = 0.9;
    n.water_g = 84.0;
    n
}

fn grader() -> DeterministicGrader {
    DeterministicGrader::new(GiAdjustmentConfig::default())
}

#[test]
fn test_grading_same_vector_twice_is_identical() {
    let g = grader();
    let first = g.grade("oatmeal", &oatmeal_per_100g(), 100.0, Some(FoodGroup::Grains), false, None);
    let second = g.grade("oatmeal", &oatmeal_per_100g(), 100.0, Some(FoodGroup::Grains), false, None);

    assert_eq!(first.overall_score.to_bits(), second.overall_score.to_bits());
    assert_eq!(first.overall_grade, second.overall_grade);
    assert_eq!(first.satiety_band, second.satiety_band);
    assert_eq!(first.inflammatory_band, second.inflammatory_band);
    for (a, b) in first.focus_grades.iter().zip(&second.focus_grades) {
        assert_eq!(a.score.to_bits(), b.score.to_bits());
        assert_eq!(a.grade, b.grade);
        assert_eq!(a.pros, b.pros);
        assert_eq!(a.cons, b.cons);
    }
}

#[test]
fn test_gi_forty_gives_a_positive_adjustment() {
    let g = grader();
    let nutrition = oatmeal_per_100g();
    let gi = GlycemicLookup::lookup("apple", &nutrition, None).unwrap();
    assert!((gi.gi - 36.0).abs() < f64::EPSILON);

    // use a GI-40 synthetic result to hit the documented scenario exactly
    let gi40 = platewise_engine::models::glycemic::GiResult {
        gi: 40.0,
        gl: 4.8,
        gi_band: platewise_engine::models::glycemic::GiBand::Low,
        gl_band: platewise_engine::models::glycemic::GlBand::Low,
        confidence: 0.9,
        exact_match: true,
    };

    let plain = g.grade("oatmeal", &nutrition, 100.0, Some(FoodGroup::Grains), false, None);
    let adjusted = g.grade("oatmeal", &nutrition, 100.0, Some(FoodGroup::Grains), false, Some(&gi40));

    let before = plain
        .focus_grade(WellnessFocus::BloodSugarBalance)
        .unwrap()
        .score;
    let after = adjusted
        .focus_grade(WellnessFocus::BloodSugarBalance)
        .unwrap()
        .score;
    // low band at GI 40: bonus between +5 and +15
    assert!(after > before);
    assert!(after - before >= 5.0);
    assert!(after - before <= 15.0);

    // the weight-management focus receives the configured fraction
    let wm_before = plain
        .focus_grade(WellnessFocus::WeightManagement)
        .unwrap()
        .score;
    let wm_after = adjusted
        .focus_grade(WellnessFocus::WeightManagement)
        .unwrap()
        .score;
    let bs_delta = after - before;
    assert!(((wm_after - wm_before) - bs_delta * 0.6).abs() < 1e-9);
}

#[test]
fn test_gi_adjustment_clamps_at_one_hundred() {
    // widen the low band so the adjustment would overshoot the scale
    let config = GiAdjustmentConfig {
        low_band_max_bonus: 80.0,
        low_band_min_bonus: 60.0,
        ..GiAdjustmentConfig::default()
    };
    let g = DeterministicGrader::new(config);

    let mut lentils = NutrientVector::zero();
    lentils.carbohydrates_g = 20.0;
    lentils.fiber_g = 8.0;
    lentils.protein_g = 9.0;
    let gi = platewise_engine::models::glycemic::GiResult {
        gi: 40.0,
        gl: 8.0,
        gi_band: platewise_engine::models::glycemic::GiBand::Low,
        gl_band: platewise_engine::models::glycemic::GlBand::Low,
        confidence: 0.9,
        exact_match: true,
    };

    let result = g.grade("lentils", &lentils, 100.0, Some(FoodGroup::Legumes), false, Some(&gi));
    let score = result
        .focus_grade(WellnessFocus::BloodSugarBalance)
        .unwrap()
        .score;
    assert!((score - 100.0).abs() < f64::EPSILON);
    assert_eq!(
        result
            .focus_grade(WellnessFocus::BloodSugarBalance)
            .unwrap()
            .grade,
        LetterGrade::A
    );
}

#[test]
fn test_zero_carb_meal_has_no_meal_gi() {
    let mut steak = NutrientVector::zero();
    steak.protein_g = 26.0;
    steak.fat_g = 19.0;
    let mut eggs = NutrientVector::zero();
    eggs.protein_g = 13.0;
    eggs.fat_g = 11.0;
    eggs.carbohydrates_g = 1.1;

    let items = vec![
        (GlycemicLookup::lookup("steak", &steak, Some(FoodGroup::ProteinFoods)), steak.carbohydrates_g),
        (GlycemicLookup::lookup("eggs", &eggs, Some(FoodGroup::ProteinFoods)), eggs.carbohydrates_g),
    ];

    let summary = GlycemicLookup::summarize_meal(&items);
    assert!(summary.meal_gi.is_none());
    assert!(summary.meal_gi_band.is_none());
    assert!(summary.meal_gl.abs() < f64::EPSILON);
}

/// Build a graded food with a hand-set score for every focus
fn fixture_food(name: &str, score: f64) -> GradedFood {
    let focus_grades = WellnessFocus::ALL
        .iter()
        .map(|&focus| FocusGradeResult {
            focus,
            score,
            grade: LetterGrade::from_score(score),
            rationale: String::new(),
            pros: vec![],
            cons: vec![],
        })
        .collect();
    GradedFood {
        grading: CompleteGradingResult {
            food_name: name.to_owned(),
            overall_score: score,
            overall_grade: LetterGrade::from_score(score),
            focus_grades,
            satiety_score: 50.0,
            satiety_band: platewise_engine::models::grading::SatietyBand::from_score(50.0),
            inflammatory_index: 0.0,
            inflammatory_band:
                platewise_engine::models::grading::InflammatoryBand::from_index(0.0),
            gi_adjusted: false,
        },
        nutrition: NutrientVector::zero(),
    }
}

#[test]
fn test_three_point_gap_is_a_tie() {
    let result = ComparisonEngine::compare(
        &[fixture_food("greek salad", 71.0), fixture_food("cobb salad", 68.0)],
        WellnessFocus::Balanced,
    )
    .unwrap();

    let winner = result.selected_winner().unwrap();
    assert_eq!(winner.food_name, "greek salad");
    assert_eq!(winner.margin, ComparisonMargin::Tie);
}

#[test]
fn test_twenty_five_point_gap_is_decisive() {
    let result = ComparisonEngine::compare(
        &[fixture_food("lentil soup", 85.0), fixture_food("loaded fries", 60.0)],
        WellnessFocus::HeartHealth,
    )
    .unwrap();

    let winner = result.selected_winner().unwrap();
    assert_eq!(winner.food_name, "lentil soup");
    assert_eq!(winner.margin, ComparisonMargin::Decisive);
}

#[test]
fn test_comparison_ranks_real_gradings() {
    let g = grader();
    let oats = GradedFood {
        grading: g.grade("oatmeal", &oatmeal_per_100g(), 100.0, Some(FoodGroup::Grains), false, None),
        nutrition: oatmeal_per_100g(),
    };
    let mut candy_vec = NutrientVector::zero();
    candy_vec.energy_kcal = 390.0;
    candy_vec.carbohydrates_g = 98.0;
    candy_vec.sugar_g = 78.0;
    candy_vec.added_sugar_g = 78.0;
    let candy = GradedFood {
        grading: g.grade("gummy bears", &candy_vec, 100.0, Some(FoodGroup::Sweets), false, None),
        nutrition: candy_vec,
    };

    let result = ComparisonEngine::compare(
        &[oats.clone(), candy.clone()],
        WellnessFocus::BloodSugarBalance,
    )
    .unwrap();
    assert_eq!(result.selected_winner().unwrap().food_name, "oatmeal");
    assert_eq!(result.winners.len(), WellnessFocus::ALL.len());
}
