// ABOUTME: Grading value objects: wellness focuses, letter grades, satiety and inflammatory bands
// ABOUTME: FocusGradeResult and CompleteGradingResult produced by the deterministic grader
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use serde::{Deserialize, Serialize};
use std::fmt;

/// The ten personalization lenses a food is graded against
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WellnessFocus {
    /// General balanced nutrition
    Balanced,
    /// Protein-dominated, lenient on fat and calories
    MuscleBuilding,
    /// Penalizes saturated fat and sodium, rewards fiber and potassium
    HeartHealth,
    /// Sustained-energy carbohydrate quality
    EnergyEndurance,
    /// Energy density and satiety oriented
    WeightManagement,
    /// Omega-3, B vitamins, antioxidant micronutrients
    BrainFocus,
    /// Fiber-dominated
    GutHealth,
    /// Sugar load and glycemic quality
    BloodSugarBalance,
    /// Calcium, vitamin D/K, magnesium, protein
    BoneJointSupport,
    /// Pro-/anti-inflammatory nutrient balance
    AntiInflammatory,
}

impl WellnessFocus {
    /// Every focus, in a stable order
    pub const ALL: &'static [Self] = &[
        Self::Balanced,
        Self::MuscleBuilding,
        Self::HeartHealth,
        Self::EnergyEndurance,
        Self::WeightManagement,
        Self::BrainFocus,
        Self::GutHealth,
        Self::BloodSugarBalance,
        Self::BoneJointSupport,
        Self::AntiInflammatory,
    ];

    /// Stable snake_case name matching the serialized form
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::MuscleBuilding => "muscle_building",
            Self::HeartHealth => "heart_health",
            Self::EnergyEndurance => "energy_endurance",
            Self::WeightManagement => "weight_management",
            Self::BrainFocus => "brain_focus",
            Self::GutHealth => "gut_health",
            Self::BloodSugarBalance => "blood_sugar_balance",
            Self::BoneJointSupport => "bone_joint_support",
            Self::AntiInflammatory => "anti_inflammatory",
        }
    }
}

impl fmt::Display for WellnessFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Letter grade derived from a 0-100 score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum LetterGrade {
    /// 80-100
    A,
    /// 60-79
    B,
    /// 40-59
    C,
    /// 20-39
    D,
    /// 0-19
    F,
}

impl LetterGrade {
    /// Derive the letter for a score (clamped to [0, 100] first)
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        let score = score.clamp(0.0, 100.0);
        if score >= 80.0 {
            Self::A
        } else if score >= 60.0 {
            Self::B
        } else if score >= 40.0 {
            Self::C
        } else if score >= 20.0 {
            Self::D
        } else {
            Self::F
        }
    }
}

/// Satiety classification, from a protein/fiber/water weighted score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SatietyBand {
    /// Score < 20
    VeryLow,
    /// Score 20-39
    Low,
    /// Score 40-59
    Moderate,
    /// Score 60-79
    High,
    /// Score ≥ 80
    VeryHigh,
}

impl SatietyBand {
    /// Band a satiety score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        let score = score.clamp(0.0, 100.0);
        if score >= 80.0 {
            Self::VeryHigh
        } else if score >= 60.0 {
            Self::High
        } else if score >= 40.0 {
            Self::Moderate
        } else if score >= 20.0 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }
}

/// DII-style inflammatory classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InflammatoryBand {
    /// Index ≤ -1.0
    AntiInflammatory,
    /// Index in (-1.0, 1.0)
    Neutral,
    /// Index in [1.0, 3.0)
    MildlyInflammatory,
    /// Index ≥ 3.0
    Inflammatory,
}

impl InflammatoryBand {
    /// Band an inflammatory index value
    #[must_use]
    pub fn from_index(index: f64) -> Self {
        if index <= -1.0 {
            Self::AntiInflammatory
        } else if index < 1.0 {
            Self::Neutral
        } else if index < 3.0 {
            Self::MildlyInflammatory
        } else {
            Self::Inflammatory
        }
    }
}

/// Grade for one wellness focus, with explanation inputs
///
/// The pros/cons strings name the thresholds the food crossed; the
/// out-of-scope insight generator turns them into narrative text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusGradeResult {
    /// Focus this grade applies to
    pub focus: WellnessFocus,
    /// 0-100 score
    pub score: f64,
    /// Letter grade derived from the score
    pub grade: LetterGrade,
    /// One-line rationale
    pub rationale: String,
    /// Thresholds this food crossed favorably
    pub pros: Vec<String>,
    /// Thresholds this food crossed unfavorably
    pub cons: Vec<String>,
}

/// Complete deterministic health assessment for one food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteGradingResult {
    /// Food name the assessment describes
    pub food_name: String,
    /// Nutri-Score-style overall 0-100 score
    pub overall_score: f64,
    /// Overall letter grade
    pub overall_grade: LetterGrade,
    /// One grade per wellness focus, all ten present
    pub focus_grades: Vec<FocusGradeResult>,
    /// Satiety score 0-100
    pub satiety_score: f64,
    /// Satiety classification
    pub satiety_band: SatietyBand,
    /// DII-style inflammatory index
    pub inflammatory_index: f64,
    /// Inflammatory classification
    pub inflammatory_band: InflammatoryBand,
    /// Whether a glycemic adjustment was applied to the relevant focuses
    pub gi_adjusted: bool,
}

impl CompleteGradingResult {
    /// Look up the grade for one focus
    #[must_use]
    pub fn focus_grade(&self, focus: WellnessFocus) -> Option<&FocusGradeResult> {
        self.focus_grades.iter().find(|g| g.focus == focus)
    }
}
