// ABOUTME: Engine configuration supplied by the embedding service at construction time
// ABOUTME: Provider credentials, cache TTLs, concurrency caps, acceptance thresholds, GI bands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! # Engine Configuration
//!
//! The engine has no command-line or environment surface of its own; the
//! embedding service builds an [`EngineConfig`] and passes it in. Defaults
//! hold the documented literals; `validate()` rejects out-of-range values
//! before anything is constructed from them.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reference-database provider settings
    pub providers: ProvidersConfig,
    /// Resolution cache TTLs and sizing
    pub cache: CacheConfig,
    /// Orchestrator thresholds and concurrency caps
    pub resolver: ResolverConfig,
    /// Glycemic score-adjustment bands
    pub gi_adjustment: GiAdjustmentConfig,
}

impl EngineConfig {
    /// Validate the whole configuration tree
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` naming the first out-of-range value.
    pub fn validate(&self) -> AppResult<()> {
        self.resolver.validate()?;
        self.gi_adjustment.validate()?;
        self.cache.validate()
    }
}

/// Settings for the three external nutrition-reference providers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// USDA FoodData Central (whole/generic foods)
    pub fooddata: FoodDataApiConfig,
    /// Open Food Facts (packaged/labeled products)
    pub openfoodfacts: OpenFoodFactsApiConfig,
    /// Nutritionix (restaurant/branded items)
    pub nutritionix: NutritionixApiConfig,
}

/// USDA FoodData Central API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodDataApiConfig {
    /// Base URL (default: <https://api.nal.usda.gov/fdc/v1>)
    pub base_url: String,
    /// API key (free from the FDC signup page)
    pub api_key: String,
    /// Per-call network timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for FoodDataApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.nal.usda.gov/fdc/v1".to_owned(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Open Food Facts API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenFoodFactsApiConfig {
    /// Base URL (default: <https://world.openfoodfacts.org>)
    pub base_url: String,
    /// User-Agent the OFF terms of use require
    pub user_agent: String,
    /// Per-call network timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for OpenFoodFactsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://world.openfoodfacts.org".to_owned(),
            user_agent: "platewise-engine/0.1 (nutrition resolution)".to_owned(),
            timeout_secs: 10,
        }
    }
}

/// Nutritionix API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionixApiConfig {
    /// Base URL (default: <https://trackapi.nutritionix.com/v2>)
    pub base_url: String,
    /// Application ID header value
    pub app_id: String,
    /// Application key header value
    pub app_key: String,
    /// Per-call network timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for NutritionixApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://trackapi.nutritionix.com/v2".to_owned(),
            app_id: String::new(),
            app_key: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Resolution cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL for database-backed results (seconds, default 30 days)
    pub database_ttl_secs: u64,
    /// TTL for low-reliability fallback results (seconds, default 7 days)
    pub fallback_ttl_secs: u64,
    /// Maximum entries held by the in-memory store (LRU eviction)
    pub max_entries: usize,
    /// Background expiry sweep interval (seconds)
    pub cleanup_interval_secs: u64,
    /// Enable the background sweep task (disable in tests to avoid runtime
    /// conflicts)
    pub enable_background_cleanup: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            database_ttl_secs: 30 * 24 * 3600,
            fallback_ttl_secs: 7 * 24 * 3600,
            max_entries: 10_000,
            cleanup_interval_secs: 300,
            enable_background_cleanup: true,
        }
    }
}

impl CacheConfig {
    fn validate(&self) -> AppResult<()> {
        if self.fallback_ttl_secs > self.database_ttl_secs {
            return Err(AppError::config(format!(
                "fallback TTL ({}) must not exceed database TTL ({})",
                self.fallback_ttl_secs, self.database_ttl_secs
            )));
        }
        Ok(())
    }
}

/// Orchestrator thresholds and concurrency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Maximum concurrent calls in flight against any one adapter (2-3
    /// respects upstream per-minute rate limits)
    pub max_in_flight_per_adapter: usize,
    /// Acceptance threshold for the whole/generic-food adapter
    pub fooddata_min_confidence: f64,
    /// Acceptance threshold for the packaged-product adapter
    pub openfoodfacts_min_confidence: f64,
    /// Acceptance threshold for the restaurant/branded adapter
    pub nutritionix_min_confidence: f64,
    /// Multiplier applied to the averaged ingredient confidence of a
    /// decomposed dish (composition uncertainty)
    pub composition_confidence_penalty: f64,
    /// A packaged candidate missing at least this many micronutrient fields
    /// triggers the secondary generic-food enrichment lookup
    pub enrichment_missing_field_threshold: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_in_flight_per_adapter: 3,
            fooddata_min_confidence: 0.6,
            openfoodfacts_min_confidence: 0.65,
            nutritionix_min_confidence: 0.7,
            composition_confidence_penalty: 0.9,
            enrichment_missing_field_threshold: 5,
        }
    }
}

impl ResolverConfig {
    fn validate(&self) -> AppResult<()> {
        if self.max_in_flight_per_adapter == 0 {
            return Err(AppError::config("max_in_flight_per_adapter must be ≥ 1"));
        }
        for (name, value) in [
            ("fooddata_min_confidence", self.fooddata_min_confidence),
            (
                "openfoodfacts_min_confidence",
                self.openfoodfacts_min_confidence,
            ),
            ("nutritionix_min_confidence", self.nutritionix_min_confidence),
            (
                "composition_confidence_penalty",
                self.composition_confidence_penalty,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AppError::config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Glycemic score-adjustment bands
///
/// The interpolation constants are tunable; only the directional contract is
/// fixed (lower GI yields higher blood-sugar/weight/energy scores). Defaults
/// give low-GI foods +5..+15, medium-GI -5..+5, high-GI -5..-15.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiAdjustmentConfig {
    /// Minimum GI lookup confidence before any adjustment is applied
    pub min_gi_confidence: f64,
    /// Bonus at GI 0 (upper end of the low band)
    pub low_band_max_bonus: f64,
    /// Bonus at the low/medium boundary (GI 55)
    pub low_band_min_bonus: f64,
    /// Correction magnitude at the edges of the medium band (±)
    pub medium_band_span: f64,
    /// Penalty at the medium/high boundary (GI 70)
    pub high_band_min_penalty: f64,
    /// Penalty at and beyond GI 110
    pub high_band_max_penalty: f64,
    /// Fraction of the adjustment applied to the weight-management focus
    pub weight_management_factor: f64,
    /// Fraction of the adjustment applied to the energy/endurance focus
    pub energy_endurance_factor: f64,
}

impl Default for GiAdjustmentConfig {
    fn default() -> Self {
        Self {
            min_gi_confidence: 0.6,
            low_band_max_bonus: 15.0,
            low_band_min_bonus: 5.0,
            medium_band_span: 5.0,
            high_band_min_penalty: 5.0,
            high_band_max_penalty: 15.0,
            weight_management_factor: 0.6,
            energy_endurance_factor: 0.4,
        }
    }
}

impl GiAdjustmentConfig {
    fn validate(&self) -> AppResult<()> {
        if !(0.0..=1.0).contains(&self.min_gi_confidence) {
            return Err(AppError::config("min_gi_confidence must be in [0, 1]"));
        }
        if self.low_band_min_bonus > self.low_band_max_bonus {
            return Err(AppError::config(
                "low_band_min_bonus must not exceed low_band_max_bonus",
            ));
        }
        if self.high_band_min_penalty > self.high_band_max_penalty {
            return Err(AppError::config(
                "high_band_min_penalty must not exceed high_band_max_penalty",
            ));
        }
        Ok(())
    }
}
