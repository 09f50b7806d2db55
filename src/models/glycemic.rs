// ABOUTME: Glycemic index and glycemic load value objects with standard band cut points
// ABOUTME: GiResult for single foods, MealGiSummary for carb-weighted meal aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use serde::{Deserialize, Serialize};

/// Glycemic index band (standard cut points: low ≤55, medium 56-69, high ≥70)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GiBand {
    /// GI ≤ 55
    Low,
    /// GI 56-69
    Medium,
    /// GI ≥ 70
    High,
}

impl GiBand {
    /// Classify a glycemic index value
    #[must_use]
    pub fn from_gi(gi: f64) -> Self {
        if gi <= 55.0 {
            Self::Low
        } else if gi < 70.0 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// Glycemic load band (low ≤10, medium 11-19, high ≥20)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GlBand {
    /// GL ≤ 10
    Low,
    /// GL 11-19
    Medium,
    /// GL ≥ 20
    High,
}

impl GlBand {
    /// Classify a glycemic load value
    #[must_use]
    pub fn from_gl(gl: f64) -> Self {
        if gl <= 10.0 {
            Self::Low
        } else if gl < 20.0 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// Glycemic lookup result for a single food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiResult {
    /// Glycemic index (glucose = 100 reference)
    pub gi: f64,
    /// Glycemic load for the carbohydrate amount actually consumed
    pub gl: f64,
    /// GI classification band
    pub gi_band: GiBand,
    /// GL classification band
    pub gl_band: GlBand,
    /// Lookup confidence in [0, 1]
    pub confidence: f64,
    /// True for an exact table match, false for a category default
    pub exact_match: bool,
}

/// Carb-weighted glycemic summary for a whole meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealGiSummary {
    /// Carbohydrate-mass-weighted average GI; `None` when no item carried
    /// enough carbohydrate to define one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_gi: Option<f64>,
    /// Band of `meal_gi`, when defined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_gi_band: Option<GiBand>,
    /// Sum of per-item glycemic loads (GL is additive, GI is not)
    pub meal_gl: f64,
    /// Band of `meal_gl`
    pub meal_gl_band: GlBand,
    /// Number of items that contributed to the weighting
    pub contributing_items: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gi_band_cut_points() {
        assert_eq!(GiBand::from_gi(55.0), GiBand::Low);
        assert_eq!(GiBand::from_gi(56.0), GiBand::Medium);
        assert_eq!(GiBand::from_gi(69.9), GiBand::Medium);
        assert_eq!(GiBand::from_gi(70.0), GiBand::High);
    }

    #[test]
    fn test_gl_band_cut_points() {
        assert_eq!(GlBand::from_gl(10.0), GlBand::Low);
        assert_eq!(GlBand::from_gl(11.0), GlBand::Medium);
        assert_eq!(GlBand::from_gl(20.0), GlBand::High);
    }
}
