// ABOUTME: Nutritionix adapter for restaurant and branded menu items
// ABOUTME: Natural-language nutrient endpoint with qualifier bias and bare-query retry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! Nutritionix adapter
//!
//! Best coverage for restaurant menu items and US branded foods. The
//! `/natural/nutrients` endpoint takes a free-text description and returns
//! fully parsed foods with an actual serving weight, which this adapter
//! preserves instead of assuming 100 g. When a restaurant qualifier finds
//! nothing the adapter retries once with the bare food name.

use super::confidence::match_confidence;
use super::{FoodCandidate, FoodQuery, SourceAdapter};
use crate::config::NutritionixApiConfig;
use crate::errors::{AppError, AppResult};
use crate::models::nutrients::NutrientVector;
use crate::models::resolution::ResolutionSource;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct NaturalQuery<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct NaturalResponse {
    #[serde(default)]
    foods: Vec<NaturalFood>,
}

#[derive(Debug, Deserialize, Default)]
struct NaturalFood {
    #[serde(default)]
    food_name: String,
    #[serde(default)]
    brand_name: Option<String>,
    #[serde(default)]
    serving_weight_grams: Option<f64>,
    #[serde(default)]
    nf_calories: Option<f64>,
    #[serde(default)]
    nf_protein: Option<f64>,
    #[serde(default)]
    nf_total_carbohydrate: Option<f64>,
    #[serde(default)]
    nf_dietary_fiber: Option<f64>,
    #[serde(default)]
    nf_sugars: Option<f64>,
    #[serde(default)]
    nf_total_fat: Option<f64>,
    #[serde(default)]
    nf_saturated_fat: Option<f64>,
    #[serde(default)]
    nf_cholesterol: Option<f64>,
    #[serde(default)]
    nf_sodium: Option<f64>,
    #[serde(default)]
    nf_potassium: Option<f64>,
}

impl NaturalFood {
    fn to_vector(&self) -> NutrientVector {
        let mut vector = NutrientVector::zero();
        vector.energy_kcal = self.nf_calories.unwrap_or(0.0).max(0.0);
        vector.protein_g = self.nf_protein.unwrap_or(0.0).max(0.0);
        vector.carbohydrates_g = self.nf_total_carbohydrate.unwrap_or(0.0).max(0.0);
        vector.fiber_g = self.nf_dietary_fiber.unwrap_or(0.0).max(0.0);
        vector.sugar_g = self.nf_sugars.unwrap_or(0.0).max(0.0);
        vector.fat_g = self.nf_total_fat.unwrap_or(0.0).max(0.0);
        vector.saturated_fat_g = self.nf_saturated_fat.unwrap_or(0.0).max(0.0);
        vector.cholesterol_mg = self.nf_cholesterol.unwrap_or(0.0).max(0.0);
        vector.sodium_mg = self.nf_sodium.unwrap_or(0.0).max(0.0);
        vector.potassium_mg = self.nf_potassium.unwrap_or(0.0).max(0.0);
        vector
    }

    fn display_name(&self) -> String {
        match &self.brand_name {
            Some(brand) if !brand.trim().is_empty() => format!("{brand} {}", self.food_name),
            _ => self.food_name.clone(),
        }
    }
}

/// Restaurant/branded adapter over the Nutritionix natural-language API
pub struct NutritionixAdapter {
    config: NutritionixApiConfig,
    http_client: reqwest::Client,
}

impl NutritionixAdapter {
    /// Create an adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the HTTP client cannot be built,
    /// since a default client would drop the configured timeout.
    pub fn new(config: NutritionixApiConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("Nutritionix HTTP client: {e}")))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    async fn fetch_natural(&self, query_text: &str) -> AppResult<NaturalResponse> {
        let url = format!("{}/natural/nutrients", self.config.base_url);
        let response = self
            .http_client
            .post(&url)
            .header("x-app-id", &self.config.app_id)
            .header("x-app-key", &self.config.app_key)
            .json(&NaturalQuery { query: query_text })
            .send()
            .await
            .map_err(|e| AppError::external_service("Nutritionix", e.to_string()))?;

        // Nutritionix answers 404 when the parser found no foods in the text
        if response.status().as_u16() == 404 {
            return Ok(NaturalResponse { foods: vec![] });
        }
        if response.status().as_u16() == 429 {
            return Err(AppError::rate_limited("Nutritionix"));
        }
        if !response.status().is_success() {
            return Err(AppError::external_service(
                "Nutritionix",
                format!("HTTP {}", response.status()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::external_service("Nutritionix", format!("JSON parse error: {e}")))
    }

    fn best_candidate(query_text: &str, foods: Vec<NaturalFood>) -> Option<FoodCandidate> {
        foods
            .into_iter()
            .filter_map(|food| {
                if food.food_name.trim().is_empty() {
                    return None;
                }
                let confidence = match_confidence(query_text, &food.display_name(), 0.0)?;
                let serving_mass_g = food.serving_weight_grams.filter(|w| *w > 0.0)?;
                Some(FoodCandidate {
                    nutrition: food.to_vector(),
                    confidence,
                    serving_mass_g,
                    matched_name: food.display_name(),
                    labeled_fields: None,
                })
            })
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

#[async_trait]
impl SourceAdapter for NutritionixAdapter {
    fn source(&self) -> ResolutionSource {
        ResolutionSource::Nutritionix
    }

    async fn search(&self, query: &FoodQuery) -> AppResult<Option<FoodCandidate>> {
        if query.name.trim().is_empty() {
            return Err(AppError::invalid_input("search query cannot be empty"));
        }

        let qualified_text = query.full_text();
        let response = self.fetch_natural(&qualified_text).await?;
        if let Some(candidate) = Self::best_candidate(&qualified_text, response.foods) {
            tracing::debug!(
                query = %qualified_text,
                matched = %candidate.matched_name,
                confidence = candidate.confidence,
                "nutritionix match"
            );
            return Ok(Some(candidate));
        }

        // the qualifier can over-constrain the natural-language parser
        if query.qualifier.is_some() {
            tracing::debug!(query = %query.name, "retrying nutritionix without qualifier");
            let response = self.fetch_natural(&query.name).await?;
            return Ok(Self::best_candidate(&query.name, response.foods));
        }

        Ok(None)
    }
}
