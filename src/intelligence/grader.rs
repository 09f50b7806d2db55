// ABOUTME: Deterministic health grading: overall grade, ten focus grades, satiety, inflammation
// ABOUTME: Pure synchronous scoring with optional glycemic adjustment of the carb-sensitive focuses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! Deterministic grader
//!
//! Everything here is a pure function of the nutrient vector plus a few flags:
//! no I/O, no randomness, no clock. The overall grade follows the Nutri-Score
//! points scheme (separate bands for beverages); each wellness focus applies
//! its own weighted threshold formula over the nutrients it cares about and
//! records which thresholds fired as pros/cons. When a confident GI result is
//! supplied, the three carbohydrate-sensitive focuses receive an additive
//! correction and their letters are re-derived.

use crate::config::GiAdjustmentConfig;
use crate::models::food::FoodGroup;
use crate::models::glycemic::{GiBand, GiResult};
use crate::models::grading::{
    CompleteGradingResult, FocusGradeResult, InflammatoryBand, LetterGrade, SatietyBand,
    WellnessFocus,
};
use crate::models::nutrients::NutrientVector;

/// Count how many thresholds a value has crossed (Nutri-Score point scale)
fn points(value: f64, thresholds: &[f64]) -> f64 {
    thresholds.iter().filter(|&&t| value > t).count() as f64
}

/// Nutri-Score negative-point thresholds for solid foods, per 100 g
const FOOD_ENERGY_KCAL: [f64; 10] = [
    80.0, 160.0, 240.0, 320.0, 400.0, 480.0, 560.0, 640.0, 720.0, 800.0,
];
const FOOD_SUGAR_G: [f64; 10] = [4.5, 9.0, 13.5, 18.0, 22.5, 27.0, 31.0, 36.0, 40.0, 45.0];
const SATURATED_FAT_G: [f64; 10] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
const SODIUM_MG: [f64; 10] = [
    90.0, 180.0, 270.0, 360.0, 450.0, 540.0, 630.0, 720.0, 810.0, 900.0,
];

/// Beverage bands are far stricter on energy and sugar
const BEVERAGE_ENERGY_KCAL: [f64; 10] = [
    7.2, 14.4, 21.6, 28.8, 36.0, 43.2, 50.4, 57.6, 64.8, 72.0,
];
const BEVERAGE_SUGAR_G: [f64; 10] = [1.5, 3.0, 4.5, 6.0, 7.5, 9.0, 10.5, 12.0, 13.5, 15.0];

/// Positive-point thresholds, per 100 g
const FIBER_G: [f64; 5] = [0.9, 1.9, 2.8, 3.7, 4.7];
const PROTEIN_G: [f64; 5] = [1.6, 3.2, 4.8, 6.4, 8.0];

/// Fruit/vegetable content proxy from the coarse food group (the engine has
/// no ingredient percentages to work from)
fn fruit_veg_points(food_group: Option<FoodGroup>) -> f64 {
    match food_group {
        Some(FoodGroup::Fruits | FoodGroup::Vegetables) => 5.0,
        Some(FoodGroup::Legumes | FoodGroup::NutsSeeds) => 2.0,
        _ => 0.0,
    }
}

/// Accumulates a focus score with its pros/cons commentary
struct FocusScore {
    score: f64,
    pros: Vec<String>,
    cons: Vec<String>,
}

impl FocusScore {
    fn new(base: f64) -> Self {
        Self {
            score: base,
            pros: Vec::new(),
            cons: Vec::new(),
        }
    }

    fn reward(&mut self, amount: f64, note: &str) {
        self.score += amount;
        self.pros.push(note.to_owned());
    }

    fn penalize(&mut self, amount: f64, note: &str) {
        self.score -= amount;
        self.cons.push(note.to_owned());
    }

    fn finish(self, focus: WellnessFocus, rationale: String) -> FocusGradeResult {
        let score = self.score.clamp(0.0, 100.0);
        FocusGradeResult {
            focus,
            score,
            grade: LetterGrade::from_score(score),
            rationale,
            pros: self.pros,
            cons: self.cons,
        }
    }
}

/// Deterministic grader over resolved nutrient vectors
pub struct DeterministicGrader {
    gi_config: GiAdjustmentConfig,
}

impl DeterministicGrader {
    /// Create a grader with the given GI-adjustment bands
    #[must_use]
    pub fn new(gi_config: GiAdjustmentConfig) -> Self {
        Self { gi_config }
    }

    /// Grade one food serving.
    ///
    /// `nutrition` describes `serving_mass_g`; densities are computed per
    /// 100 g internally. `gi` is applied only when its confidence clears the
    /// configured floor.
    #[must_use]
    pub fn grade(
        &self,
        food_name: &str,
        nutrition: &NutrientVector,
        serving_mass_g: f64,
        food_group: Option<FoodGroup>,
        is_beverage: bool,
        gi: Option<&GiResult>,
    ) -> CompleteGradingResult {
        let density = nutrition.per_100g(serving_mass_g);
        let overall_score = overall_score(&density, food_group, is_beverage);

        let mut focus_grades: Vec<FocusGradeResult> = WellnessFocus::ALL
            .iter()
            .map(|&focus| focus_grade(focus, &density, nutrition, overall_score))
            .collect();

        let satiety_score = satiety_score(&density);
        let inflammatory_index = inflammatory_index(&density);

        let gi_adjusted = match gi {
            Some(gi) if gi.confidence >= self.gi_config.min_gi_confidence => {
                self.apply_gi_adjustment(&mut focus_grades, gi);
                true
            }
            _ => false,
        };

        CompleteGradingResult {
            food_name: food_name.to_owned(),
            overall_score,
            overall_grade: LetterGrade::from_score(overall_score),
            focus_grades,
            satiety_score,
            satiety_band: SatietyBand::from_score(satiety_score),
            inflammatory_index,
            inflammatory_band: InflammatoryBand::from_index(inflammatory_index),
            gi_adjusted,
        }
    }

    /// Additive GI correction: full magnitude on blood-sugar balance, the
    /// configured fractions on weight management and energy/endurance.
    fn apply_gi_adjustment(&self, focus_grades: &mut [FocusGradeResult], gi: &GiResult) {
        let adjustment = self.gi_adjustment_magnitude(gi.gi);
        let weights = [
            (WellnessFocus::BloodSugarBalance, 1.0),
            (
                WellnessFocus::WeightManagement,
                self.gi_config.weight_management_factor,
            ),
            (
                WellnessFocus::EnergyEndurance,
                self.gi_config.energy_endurance_factor,
            ),
        ];

        for grade in focus_grades.iter_mut() {
            let Some(&(_, weight)) = weights.iter().find(|(focus, _)| *focus == grade.focus)
            else {
                continue;
            };
            grade.score = adjustment.mul_add(weight, grade.score).clamp(0.0, 100.0);
            grade.grade = LetterGrade::from_score(grade.score);
            let note = match GiBand::from_gi(gi.gi) {
                GiBand::Low => "low glycemic index",
                GiBand::Medium => "moderate glycemic index",
                GiBand::High => "high glycemic index",
            };
            if adjustment >= 0.0 {
                grade.pros.push(note.to_owned());
            } else {
                grade.cons.push(note.to_owned());
            }
        }
    }

    /// Signed score correction for a GI value, interpolated within the
    /// configured bands (bonus in the low band, penalty in the high band,
    /// crossover through the medium band).
    fn gi_adjustment_magnitude(&self, gi: f64) -> f64 {
        let c = &self.gi_config;
        match GiBand::from_gi(gi) {
            GiBand::Low => {
                let t = (gi / 55.0).clamp(0.0, 1.0);
                (c.low_band_min_bonus - c.low_band_max_bonus).mul_add(t, c.low_band_max_bonus)
            }
            GiBand::Medium => {
                let t = ((gi - 55.0) / 15.0).clamp(0.0, 1.0);
                (2.0 * t).mul_add(-c.medium_band_span, c.medium_band_span)
            }
            GiBand::High => {
                let t = ((gi - 70.0) / 40.0).clamp(0.0, 1.0);
                -((c.high_band_max_penalty - c.high_band_min_penalty)
                    .mul_add(t, c.high_band_min_penalty))
            }
        }
    }
}

/// Nutri-Score-style overall score on a 0-100 scale
fn overall_score(density: &NutrientVector, food_group: Option<FoodGroup>, is_beverage: bool) -> f64 {
    let (energy_bands, sugar_bands): (&[f64], &[f64]) = if is_beverage {
        (&BEVERAGE_ENERGY_KCAL, &BEVERAGE_SUGAR_G)
    } else {
        (&FOOD_ENERGY_KCAL, &FOOD_SUGAR_G)
    };

    let negative = points(density.energy_kcal, energy_bands)
        + points(density.sugar_g, sugar_bands)
        + points(density.saturated_fat_g, &SATURATED_FAT_G)
        + points(density.sodium_mg, &SODIUM_MG);
    let positive = points(density.fiber_g, &FIBER_G)
        + points(density.protein_g, &PROTEIN_G)
        + fruit_veg_points(food_group);

    // raw points run -15 (best) to 40 (worst); map onto 0-100 piecewise so
    // the letter cut points land on the published band edges
    // (A ≤ -1, B ≤ 2, C ≤ 10, D ≤ 18, worse below)
    let raw = negative - positive;
    let segments: [(f64, f64, f64, f64); 5] = [
        (-15.0, -1.0, 100.0, 80.0),
        (-1.0, 2.0, 80.0, 60.0),
        (2.0, 10.0, 60.0, 40.0),
        (10.0, 18.0, 40.0, 20.0),
        (18.0, 40.0, 20.0, 0.0),
    ];
    for (lo, hi, hi_score, lo_score) in segments {
        if raw <= hi {
            let t = ((raw - lo) / (hi - lo)).clamp(0.0, 1.0);
            return (hi_score - lo_score).mul_add(-t, hi_score).clamp(0.0, 100.0);
        }
    }
    0.0
}

/// Weighted formula for one wellness focus.
///
/// `density` is per 100 g; `serving` is the as-eaten vector, used where the
/// absolute amount matters more than the concentration (protein dose,
/// micronutrient dose).
#[allow(clippy::too_many_lines)]
fn focus_grade(
    focus: WellnessFocus,
    density: &NutrientVector,
    serving: &NutrientVector,
    overall: f64,
) -> FocusGradeResult {
    match focus {
        WellnessFocus::Balanced => {
            let mut s = FocusScore::new(overall);
            if density.protein_g >= 5.0 {
                s.reward(8.0, "meaningful protein content");
            }
            if density.fiber_g >= 3.0 {
                s.reward(8.0, "good fiber content");
            }
            if density.sugar_g > 10.0 {
                s.penalize(8.0, "high sugar density");
            }
            if density.sodium_mg > 400.0 {
                s.penalize(8.0, "high sodium density");
            }
            s.finish(focus, "overall nutrient balance".to_owned())
        }
        WellnessFocus::MuscleBuilding => {
            let mut s = FocusScore::new(30.0);
            let protein_dose = serving.protein_g;
            s.score += (protein_dose * 2.5).min(60.0);
            if protein_dose >= 20.0 {
                s.pros.push("substantial protein per serving".to_owned());
            } else if protein_dose < 5.0 {
                s.cons.push("little protein per serving".to_owned());
            }
            if serving.calcium_mg >= 200.0 {
                s.reward(5.0, "calcium supports training load");
            }
            if density.sugar_g > 20.0 {
                s.penalize(10.0, "sugar-heavy for a protein source");
            }
            s.finish(focus, "protein dose drives this focus".to_owned())
        }
        WellnessFocus::HeartHealth => {
            let mut s = FocusScore::new(70.0);
            if density.saturated_fat_g > 5.0 {
                s.penalize(15.0, "high saturated fat");
            }
            if density.saturated_fat_g > 10.0 {
                s.penalize(15.0, "very high saturated fat");
            }
            if density.trans_fat_g > 0.5 {
                s.penalize(20.0, "contains trans fat");
            }
            if density.sodium_mg > 400.0 {
                s.penalize(10.0, "high sodium");
            }
            if density.sodium_mg > 800.0 {
                s.penalize(10.0, "very high sodium");
            }
            if density.cholesterol_mg > 100.0 {
                s.penalize(10.0, "high cholesterol");
            }
            if density.fiber_g >= 3.0 {
                s.reward(10.0, "fiber supports healthy lipids");
            }
            if density.potassium_mg >= 300.0 {
                s.reward(10.0, "potassium-rich");
            }
            if density.omega3_g >= 0.5 {
                s.reward(10.0, "omega-3 fatty acids");
            }
            s.finish(focus, "saturated fat, sodium, and fiber dominate".to_owned())
        }
        WellnessFocus::EnergyEndurance => {
            let mut s = FocusScore::new(50.0);
            if (15.0..=60.0).contains(&density.carbohydrates_g) {
                s.reward(15.0, "useful carbohydrate fuel");
            }
            if density.fiber_g >= 2.0 {
                s.reward(5.0, "fiber slows the release");
            }
            if density.potassium_mg >= 300.0 {
                s.reward(5.0, "electrolyte support");
            }
            if serving.iron_mg >= 2.0 {
                s.reward(10.0, "iron supports oxygen transport");
            }
            if serving.vitamin_b6_mg >= 0.2 || serving.vitamin_b12_ug >= 0.5 {
                s.reward(10.0, "B vitamins support energy metabolism");
            }
            if density.sugar_g > 20.0 {
                s.penalize(10.0, "sugar spike then crash");
            }
            if density.fat_g > 20.0 {
                s.penalize(10.0, "fat-heavy, slow to digest");
            }
            s.finish(focus, "steady fuel and micronutrient support".to_owned())
        }
        WellnessFocus::WeightManagement => {
            let mut s = FocusScore::new(60.0);
            if density.energy_kcal < 150.0 {
                s.reward(15.0, "low energy density");
            }
            if density.energy_kcal > 300.0 {
                s.penalize(15.0, "energy-dense");
            }
            if density.fiber_g >= 3.0 {
                s.reward(15.0, "fiber aids fullness");
            }
            if density.protein_g >= 10.0 {
                s.reward(10.0, "protein aids fullness");
            }
            if density.sugar_g > 10.0 {
                s.penalize(10.0, "high sugar density");
            }
            if density.fat_g > 20.0 {
                s.penalize(10.0, "high fat density");
            }
            s.finish(focus, "energy density and satiety drivers".to_owned())
        }
        WellnessFocus::BrainFocus => {
            let mut s = FocusScore::new(50.0);
            if density.omega3_g >= 0.3 {
                s.reward(15.0, "omega-3 fatty acids");
            }
            if serving.vitamin_b12_ug >= 0.6 {
                s.reward(10.0, "vitamin B12");
            }
            if serving.folate_ug >= 40.0 {
                s.reward(10.0, "folate");
            }
            if serving.iron_mg >= 2.0 {
                s.reward(5.0, "iron");
            }
            if serving.zinc_mg >= 1.5 {
                s.reward(5.0, "zinc");
            }
            if density.sugar_g > 15.0 {
                s.penalize(10.0, "sugar impairs steady focus");
            }
            if density.trans_fat_g > 0.2 {
                s.penalize(15.0, "trans fat");
            }
            s.finish(focus, "omega-3 and B-vitamin driven".to_owned())
        }
        WellnessFocus::GutHealth => {
            let mut s = FocusScore::new(30.0);
            s.score += (density.fiber_g * 8.0).min(50.0);
            if density.fiber_g >= 3.0 {
                s.pros.push("fiber feeds the microbiome".to_owned());
            } else if density.fiber_g < 1.0 {
                s.cons.push("almost no fiber".to_owned());
            }
            if density.water_g >= 50.0 {
                s.reward(5.0, "high water content");
            }
            if density.added_sugar_g > 10.0 {
                s.penalize(10.0, "added sugar disrupts gut flora");
            }
            if density.saturated_fat_g > 8.0 {
                s.penalize(5.0, "saturated-fat heavy");
            }
            s.finish(focus, "fiber-dominated".to_owned())
        }
        WellnessFocus::BloodSugarBalance => {
            let mut s = FocusScore::new(60.0);
            if density.fiber_g >= 3.0 {
                s.reward(15.0, "fiber blunts the glucose response");
            }
            if density.protein_g >= 10.0 {
                s.reward(10.0, "protein slows absorption");
            }
            if density.sugar_g > 10.0 {
                s.penalize(15.0, "high sugar density");
            }
            if density.sugar_g > 20.0 {
                s.penalize(10.0, "very high sugar density");
            }
            if density.added_sugar_g > 5.0 {
                s.penalize(10.0, "added sugar");
            }
            if density.carbohydrates_g > 30.0 && density.fiber_g < 2.0 {
                s.penalize(10.0, "refined carbohydrate profile");
            }
            s.finish(focus, "sugar load and its buffers".to_owned())
        }
        WellnessFocus::BoneJointSupport => {
            let mut s = FocusScore::new(40.0);
            if serving.calcium_mg >= 100.0 {
                s.reward(15.0, "calcium source");
            }
            if serving.calcium_mg >= 300.0 {
                s.reward(10.0, "calcium-rich");
            }
            if serving.vitamin_d_ug >= 1.0 {
                s.reward(15.0, "vitamin D");
            }
            if serving.magnesium_mg >= 50.0 {
                s.reward(10.0, "magnesium");
            }
            if serving.phosphorus_mg >= 100.0 {
                s.reward(5.0, "phosphorus");
            }
            if serving.vitamin_k_ug >= 20.0 {
                s.reward(5.0, "vitamin K");
            }
            if density.sodium_mg > 600.0 {
                s.penalize(10.0, "sodium increases calcium loss");
            }
            s.finish(focus, "bone mineral and vitamin D driven".to_owned())
        }
        WellnessFocus::AntiInflammatory => {
            let index = inflammatory_index(density);
            let mut s = FocusScore::new((index.mul_add(-10.0, 50.0)).clamp(0.0, 100.0));
            if density.omega3_g >= 0.3 {
                s.pros.push("omega-3 fatty acids".to_owned());
            }
            if density.fiber_g >= 3.0 {
                s.pros.push("fiber".to_owned());
            }
            if density.saturated_fat_g > 5.0 {
                s.cons.push("saturated fat".to_owned());
            }
            if density.added_sugar_g > 5.0 {
                s.cons.push("added sugar".to_owned());
            }
            s.finish(focus, "derived from the inflammatory index".to_owned())
        }
    }
}

/// Satiety score from the three fullness drivers, per 100 g
fn satiety_score(density: &NutrientVector) -> f64 {
    let protein = density.protein_g * 2.5;
    let fiber = density.fiber_g * 4.0;
    let water = density.water_g * 0.4;
    (protein + fiber + water).clamp(0.0, 100.0)
}

/// DII-style inflammatory index, per 100 g. Positive is pro-inflammatory.
fn inflammatory_index(density: &NutrientVector) -> f64 {
    let pro = density.saturated_fat_g.mul_add(
        0.15,
        density.trans_fat_g.mul_add(
            1.5,
            density
                .added_sugar_g
                .mul_add(0.10, density.sugar_g.mul_add(0.05, density.sodium_mg * 0.002)),
        ),
    );
    let anti = density.fiber_g.mul_add(
        0.30,
        density.omega3_g.mul_add(
            1.0,
            density.vitamin_c_mg.mul_add(
                0.02,
                density
                    .vitamin_e_mg
                    .mul_add(0.10, density.magnesium_mg * 0.01),
            ),
        ),
    );
    pro - anti
}
