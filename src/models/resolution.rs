// ABOUTME: Resolution result value objects shared by cache, adapters, and the orchestrator
// ABOUTME: ResolutionSource provenance tag and confidence-carrying ResolutionResult
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use crate::models::nutrients::NutrientVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum confidence a result must carry before it may be cached
pub const MIN_CACHEABLE_CONFIDENCE: f64 = 0.6;

/// Provenance of a resolved nutrient vector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Served from the resolution cache
    Cache,
    /// USDA FoodData Central (whole/generic foods)
    FoodDataCentral,
    /// Open Food Facts (packaged/labeled products)
    OpenFoodFacts,
    /// Nutritionix (restaurant/branded items)
    Nutritionix,
    /// Label data enriched with a secondary generic-food lookup
    Hybrid,
    /// Summed from independently resolved ingredients
    Decomposed,
    /// Placeholder produced when every source was exhausted; also the tag a
    /// hosted-model estimate would carry (estimation itself is out of scope)
    AiFallback,
}

impl ResolutionSource {
    /// Whether this source is backed by a reference database
    ///
    /// Database-backed results earn the long cache TTL; fallback results get
    /// the short one.
    #[must_use]
    pub const fn is_database_backed(self) -> bool {
        !matches!(self, Self::AiFallback)
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cache => "cache",
            Self::FoodDataCentral => "fooddata_central",
            Self::OpenFoodFacts => "open_food_facts",
            Self::Nutritionix => "nutritionix",
            Self::Hybrid => "hybrid",
            Self::Decomposed => "decomposed",
            Self::AiFallback => "ai_fallback",
        };
        write!(f, "{name}")
    }
}

/// A resolved per-serving nutrient composition with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Nutrient composition for `serving_mass_g`
    pub nutrition: NutrientVector,
    /// Where the data came from
    pub source: ResolutionSource,
    /// Match confidence in [0, 1]
    pub confidence: f64,
    /// Serving mass the vector describes, in grams
    pub serving_mass_g: f64,
}

impl ResolutionResult {
    /// Build a result, clamping confidence into [0, 1]
    #[must_use]
    pub fn new(
        nutrition: NutrientVector,
        source: ResolutionSource,
        confidence: f64,
        serving_mass_g: f64,
    ) -> Self {
        Self {
            nutrition,
            source,
            confidence: confidence.clamp(0.0, 1.0),
            serving_mass_g,
        }
    }

    /// Zero-valued, zero-confidence placeholder for the batch path
    ///
    /// Batch callers always receive a complete, summable result set; an
    /// exhausted cascade contributes this instead of an error.
    #[must_use]
    pub fn unresolved(serving_mass_g: f64) -> Self {
        Self {
            nutrition: NutrientVector::zero(),
            source: ResolutionSource::AiFallback,
            confidence: 0.0,
            serving_mass_g,
        }
    }

    /// Rescale the result to a new serving mass, keeping provenance
    #[must_use]
    pub fn rescaled_to(&self, target_mass_g: f64) -> Self {
        Self {
            nutrition: self
                .nutrition
                .scale_to_mass(self.serving_mass_g, target_mass_g),
            source: self.source,
            confidence: self.confidence,
            serving_mass_g: target_mass_g,
        }
    }

    /// Retag a stored result as served from the cache.
    ///
    /// Cached entries keep the provenance they were resolved with so the
    /// write-back TTL stays source-dependent; callers receiving a hit see
    /// [`ResolutionSource::Cache`] instead.
    #[must_use]
    pub fn served_from_cache(mut self) -> Self {
        self.source = ResolutionSource::Cache;
        self
    }

    /// Whether this result is confident enough to be written to the cache
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        self.confidence >= MIN_CACHEABLE_CONFIDENCE
    }
}
