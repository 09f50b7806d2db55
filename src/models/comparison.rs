// ABOUTME: Comparison value objects: per-focus winners, margin bands, nutrient leader map
// ABOUTME: Produced by the deterministic comparison engine over two or more graded foods
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use crate::models::grading::WellnessFocus;
use crate::models::nutrients::NutrientField;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Margin classification for the score gap between winner and runner-up
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMargin {
    /// Gap ≥ 25 points
    Decisive,
    /// Gap ≥ 15 points
    Moderate,
    /// Gap ≥ 5 points
    Slight,
    /// Gap < 5 points
    Tie,
}

impl ComparisonMargin {
    /// Classify a winner-to-runner-up score gap
    #[must_use]
    pub fn from_gap(gap: f64) -> Self {
        if gap >= 25.0 {
            Self::Decisive
        } else if gap >= 15.0 {
            Self::Moderate
        } else if gap >= 5.0 {
            Self::Slight
        } else {
            Self::Tie
        }
    }
}

/// Winner of one focus, with its margin over the runner-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusWinner {
    /// Name of the winning food
    pub food_name: String,
    /// Winning score on this focus
    pub score: f64,
    /// Margin over the runner-up
    pub margin: ComparisonMargin,
}

/// Deterministic comparison of two or more graded foods
///
/// Winners are computed for all ten focuses, not only the caller's selected
/// one; any narrative attached downstream may describe the algorithmic winner
/// but never substitute a different one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Names of the compared foods, in input order
    pub food_names: Vec<String>,
    /// The focus the caller asked about
    pub selected_focus: WellnessFocus,
    /// Winner and margin for every focus
    pub winners: HashMap<WellnessFocus, FocusWinner>,
    /// Per-nutrient leader (the food that "wins" each field)
    pub nutrient_leaders: HashMap<NutrientField, String>,
}

impl ComparisonResult {
    /// Winner of the caller's selected focus
    #[must_use]
    pub fn selected_winner(&self) -> Option<&FocusWinner> {
        self.winners.get(&self.selected_focus)
    }
}
