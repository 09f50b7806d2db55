// ABOUTME: Open Food Facts adapter for packaged/labeled products
// ABOUTME: Label-derived nutriments parsing with unit conversion and labeled-field tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! Open Food Facts adapter
//!
//! Crowd-sourced label data for packaged products. Records carry per-100 g
//! `nutriments` keyed by hyphenated label names; labels list far fewer
//! nutrients than a reference database, so each candidate tracks exactly
//! which fields came off the label. A field on the label (even at zero) is
//! authoritative; a field absent from the label is unset and may be filled
//! by enrichment downstream.

use super::confidence::match_confidence;
use super::{FoodCandidate, FoodQuery, SourceAdapter};
use crate::config::OpenFoodFactsApiConfig;
use crate::errors::{AppError, AppResult};
use crate::models::nutrients::{NutrientField, NutrientVector};
use crate::models::resolution::ResolutionSource;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Number of products to score per query
const SEARCH_PAGE_SIZE: u32 = 5;

/// Per-field boost once a record labels most of the macro panel
const COMPLETE_LABEL_BOOST: f64 = 0.03;
const COMPLETE_LABEL_FIELD_COUNT: usize = 7;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(default)]
    product_name: String,
    #[serde(default)]
    brands: String,
    #[serde(default)]
    nutriments: serde_json::Map<String, serde_json::Value>,
}

/// Map an OFF per-100g nutriment key onto a canonical field.
///
/// OFF reports sodium, salt, and cholesterol in grams; the canonical vector
/// holds milligrams, so those carry a 1000x factor.
fn field_for_nutriment(key: &str) -> Option<(NutrientField, f64)> {
    let mapping = match key {
        "energy-kcal_100g" => (NutrientField::EnergyKcal, 1.0),
        "proteins_100g" => (NutrientField::ProteinG, 1.0),
        "carbohydrates_100g" => (NutrientField::CarbohydratesG, 1.0),
        "fiber_100g" => (NutrientField::FiberG, 1.0),
        "sugars_100g" => (NutrientField::SugarG, 1.0),
        "added-sugars_100g" => (NutrientField::AddedSugarG, 1.0),
        "fat_100g" => (NutrientField::FatG, 1.0),
        "saturated-fat_100g" => (NutrientField::SaturatedFatG, 1.0),
        "monounsaturated-fat_100g" => (NutrientField::MonounsaturatedFatG, 1.0),
        "polyunsaturated-fat_100g" => (NutrientField::PolyunsaturatedFatG, 1.0),
        "trans-fat_100g" => (NutrientField::TransFatG, 1.0),
        "omega-3-fat_100g" => (NutrientField::Omega3G, 1.0),
        "cholesterol_100g" => (NutrientField::CholesterolMg, 1000.0),
        "sodium_100g" => (NutrientField::SodiumMg, 1000.0),
        "potassium_100g" => (NutrientField::PotassiumMg, 1000.0),
        "calcium_100g" => (NutrientField::CalciumMg, 1000.0),
        "iron_100g" => (NutrientField::IronMg, 1000.0),
        "magnesium_100g" => (NutrientField::MagnesiumMg, 1000.0),
        "zinc_100g" => (NutrientField::ZincMg, 1000.0),
        "phosphorus_100g" => (NutrientField::PhosphorusMg, 1000.0),
        "vitamin-c_100g" => (NutrientField::VitaminCMg, 1000.0),
        "caffeine_100g" => (NutrientField::CaffeineMg, 1000.0),
        "water_100g" => (NutrientField::WaterG, 1.0),
        _ => return None,
    };
    Some(mapping)
}

/// Parse a product's nutriments map into a vector plus the list of fields the
/// label actually declared.
fn vector_from_nutriments(
    nutriments: &serde_json::Map<String, serde_json::Value>,
) -> (NutrientVector, Vec<NutrientField>) {
    let mut vector = NutrientVector::zero();
    let mut labeled = Vec::new();
    for (key, value) in nutriments {
        let Some((field, factor)) = field_for_nutriment(key) else {
            continue;
        };
        let Some(amount) = value.as_f64() else {
            continue;
        };
        vector.set(field, amount * factor);
        labeled.push(field);
    }
    (vector, labeled)
}

/// Packaged-product adapter over Open Food Facts
pub struct OpenFoodFactsAdapter {
    config: OpenFoodFactsApiConfig,
    http_client: reqwest::Client,
}

impl OpenFoodFactsAdapter {
    /// Create an adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the HTTP client cannot be built;
    /// Open Food Facts requires the configured User-Agent on every call.
    pub fn new(config: OpenFoodFactsApiConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::config(format!("Open Food Facts HTTP client: {e}")))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    async fn fetch_search(&self, query_text: &str) -> AppResult<SearchResponse> {
        let url = format!("{}/cgi/search.pl", self.config.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("search_terms", query_text),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", &SEARCH_PAGE_SIZE.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::external_service("Open Food Facts", e.to_string()))?;

        if response.status().as_u16() == 429 {
            return Err(AppError::rate_limited("Open Food Facts"));
        }
        if !response.status().is_success() {
            return Err(AppError::external_service(
                "Open Food Facts",
                format!("HTTP {}", response.status()),
            ));
        }

        response.json().await.map_err(|e| {
            AppError::external_service("Open Food Facts", format!("JSON parse error: {e}"))
        })
    }

    fn best_candidate(query_text: &str, products: Vec<Product>) -> Option<FoodCandidate> {
        products
            .into_iter()
            .filter_map(|product| {
                if product.product_name.trim().is_empty() {
                    return None;
                }
                let (nutrition, labeled) = vector_from_nutriments(&product.nutriments);
                // labels with no parseable nutrients are useless matches
                if labeled.is_empty() {
                    return None;
                }
                let boost = if labeled.len() >= COMPLETE_LABEL_FIELD_COUNT {
                    COMPLETE_LABEL_BOOST
                } else {
                    0.0
                };
                let full_name = if product.brands.trim().is_empty() {
                    product.product_name.clone()
                } else {
                    format!("{} {}", product.brands, product.product_name)
                };
                let confidence = match_confidence(query_text, &full_name, boost)?;
                Some(FoodCandidate {
                    nutrition,
                    confidence,
                    serving_mass_g: 100.0,
                    matched_name: full_name,
                    labeled_fields: Some(labeled),
                })
            })
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

#[async_trait]
impl SourceAdapter for OpenFoodFactsAdapter {
    fn source(&self) -> ResolutionSource {
        ResolutionSource::OpenFoodFacts
    }

    async fn search(&self, query: &FoodQuery) -> AppResult<Option<FoodCandidate>> {
        if query.name.trim().is_empty() {
            return Err(AppError::invalid_input("search query cannot be empty"));
        }

        let query_text = query.full_text();
        let response = self.fetch_search(&query_text).await?;
        let candidate = Self::best_candidate(&query_text, response.products);

        if let Some(found) = &candidate {
            tracing::debug!(
                query = %query_text,
                matched = %found.matched_name,
                confidence = found.confidence,
                labeled = found.labeled_fields.as_ref().map_or(0, Vec::len),
                "openfoodfacts match"
            );
        }
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nutriments(pairs: &[(&str, f64)]) -> serde_json::Map<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), json!(v)))
            .collect()
    }

    #[test]
    fn test_sodium_converted_to_milligrams() {
        let (vector, labeled) = vector_from_nutriments(&nutriments(&[
            ("sodium_100g", 0.42),
            ("energy-kcal_100g", 480.0),
        ]));
        assert!((vector.sodium_mg - 420.0).abs() < f64::EPSILON);
        assert!((vector.energy_kcal - 480.0).abs() < f64::EPSILON);
        assert_eq!(labeled.len(), 2);
    }

    #[test]
    fn test_zero_on_label_is_still_labeled() {
        let (vector, labeled) = vector_from_nutriments(&nutriments(&[("sugars_100g", 0.0)]));
        assert!(vector.sugar_g.abs() < f64::EPSILON);
        assert!(labeled.contains(&NutrientField::SugarG));
    }

    #[test]
    fn test_unknown_keys_skipped() {
        let (_, labeled) =
            vector_from_nutriments(&nutriments(&[("nova-group_100g", 4.0), ("fat_100g", 9.0)]));
        assert_eq!(labeled, vec![NutrientField::FatG]);
    }

    #[test]
    fn test_empty_label_product_rejected() {
        let products = vec![Product {
            product_name: "Dark Chocolate".to_owned(),
            brands: String::new(),
            nutriments: serde_json::Map::new(),
        }];
        assert!(OpenFoodFactsAdapter::best_candidate("dark chocolate", products).is_none());
    }

    #[test]
    fn test_new_builds_client_from_default_config() {
        let adapter = OpenFoodFactsAdapter::new(OpenFoodFactsApiConfig::default());
        assert!(adapter.is_ok());
    }

    #[test]
    fn test_brand_participates_in_matching() {
        let products = vec![Product {
            product_name: "Crunchy Peanut Butter".to_owned(),
            brands: "Wildcrest".to_owned(),
            nutriments: nutriments(&[("fat_100g", 50.0), ("proteins_100g", 25.0)]),
        }];
        let candidate =
            OpenFoodFactsAdapter::best_candidate("wildcrest crunchy peanut butter", products)
                .unwrap();
        assert_eq!(candidate.matched_name, "Wildcrest Crunchy Peanut Butter");
        assert!(candidate.confidence >= 0.9);
    }
}
