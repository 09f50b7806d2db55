// ABOUTME: USDA FoodData Central adapter for whole and generic foods
// ABOUTME: Food search, nutrient-name mapping to the canonical vector, confidence scoring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! USDA `FoodData` Central adapter
//!
//! The most reliable source for single ingredients. Searches the free FDC
//! API (<https://fdc.nal.usda.gov/api-guide.html>) and maps its per-100 g
//! nutrient records onto the canonical [`NutrientVector`]. Foundation and
//! SR Legacy records earn a small completeness boost in confidence scoring.

use super::confidence::match_confidence;
use super::{FoodCandidate, FoodQuery, SourceAdapter};
use crate::config::FoodDataApiConfig;
use crate::errors::{AppError, AppResult};
use crate::models::nutrients::{NutrientField, NutrientVector};
use crate::models::resolution::ResolutionSource;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Number of search results to score per query
const SEARCH_PAGE_SIZE: u32 = 5;

/// FDC search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize)]
struct SearchFood {
    description: String,
    #[serde(rename = "dataType", default)]
    data_type: String,
    #[serde(rename = "foodNutrients", default)]
    food_nutrients: Vec<SearchNutrient>,
}

#[derive(Debug, Deserialize)]
struct SearchNutrient {
    #[serde(rename = "nutrientName", default)]
    nutrient_name: String,
    #[serde(rename = "unitName", default)]
    unit_name: String,
    #[serde(default)]
    value: f64,
}

/// Map an FDC nutrient name onto a canonical field
fn field_for_nutrient(name: &str, unit: &str) -> Option<NutrientField> {
    match name {
        // the search endpoint reports Energy in both kcal and kJ rows
        "Energy" if unit.eq_ignore_ascii_case("kcal") => Some(NutrientField::EnergyKcal),
        "Protein" => Some(NutrientField::ProteinG),
        "Carbohydrate, by difference" => Some(NutrientField::CarbohydratesG),
        "Fiber, total dietary" => Some(NutrientField::FiberG),
        "Sugars, total including NLEA" | "Total Sugars" => Some(NutrientField::SugarG),
        "Sugars, added" => Some(NutrientField::AddedSugarG),
        "Total lipid (fat)" => Some(NutrientField::FatG),
        "Fatty acids, total saturated" => Some(NutrientField::SaturatedFatG),
        "Fatty acids, total monounsaturated" => Some(NutrientField::MonounsaturatedFatG),
        "Fatty acids, total polyunsaturated" => Some(NutrientField::PolyunsaturatedFatG),
        "Fatty acids, total trans" => Some(NutrientField::TransFatG),
        "Cholesterol" => Some(NutrientField::CholesterolMg),
        "Sodium, Na" => Some(NutrientField::SodiumMg),
        "Potassium, K" => Some(NutrientField::PotassiumMg),
        "Calcium, Ca" => Some(NutrientField::CalciumMg),
        "Iron, Fe" => Some(NutrientField::IronMg),
        "Magnesium, Mg" => Some(NutrientField::MagnesiumMg),
        "Zinc, Zn" => Some(NutrientField::ZincMg),
        "Phosphorus, P" => Some(NutrientField::PhosphorusMg),
        "Selenium, Se" => Some(NutrientField::SeleniumUg),
        "Vitamin A, RAE" => Some(NutrientField::VitaminAUg),
        "Vitamin C, total ascorbic acid" => Some(NutrientField::VitaminCMg),
        "Vitamin D (D2 + D3)" => Some(NutrientField::VitaminDUg),
        "Vitamin E (alpha-tocopherol)" => Some(NutrientField::VitaminEMg),
        "Vitamin K (phylloquinone)" => Some(NutrientField::VitaminKUg),
        "Vitamin B-6" => Some(NutrientField::VitaminB6Mg),
        "Vitamin B-12" => Some(NutrientField::VitaminB12Ug),
        "Folate, total" => Some(NutrientField::FolateUg),
        "Caffeine" => Some(NutrientField::CaffeineMg),
        "Water" => Some(NutrientField::WaterG),
        _ => None,
    }
}

/// Build a per-100 g vector from an FDC nutrient list
fn vector_from_nutrients(nutrients: &[SearchNutrient]) -> NutrientVector {
    let mut vector = NutrientVector::zero();
    for nutrient in nutrients {
        if let Some(field) = field_for_nutrient(&nutrient.nutrient_name, &nutrient.unit_name) {
            vector.set(field, nutrient.value);
        }
    }
    vector
}

/// Completeness boost for curated FDC data types
fn completeness_boost(data_type: &str) -> f64 {
    match data_type {
        "Foundation" | "SR Legacy" => 0.05,
        "Survey (FNDDS)" => 0.03,
        _ => 0.0,
    }
}

/// Whole/generic-food adapter over USDA `FoodData` Central
pub struct FoodDataAdapter {
    config: FoodDataApiConfig,
    http_client: reqwest::Client,
}

impl FoodDataAdapter {
    /// Create an adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the HTTP client cannot be built,
    /// since a default client would drop the configured timeout.
    pub fn new(config: FoodDataApiConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("FoodData Central HTTP client: {e}")))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    async fn fetch_search(&self, query_text: &str) -> AppResult<SearchResponse> {
        let url = format!("{}/foods/search", self.config.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", query_text),
                ("pageSize", &SEARCH_PAGE_SIZE.to_string()),
                ("api_key", &self.config.api_key),
            ])
            .send()
            .await
            .map_err(|e| AppError::external_service("FoodData Central", e.to_string()))?;

        if response.status().as_u16() == 429 {
            return Err(AppError::rate_limited("FoodData Central"));
        }
        if !response.status().is_success() {
            return Err(AppError::external_service(
                "FoodData Central",
                format!("HTTP {}", response.status()),
            ));
        }

        response.json().await.map_err(|e| {
            AppError::external_service("FoodData Central", format!("JSON parse error: {e}"))
        })
    }

    /// Score and select the best candidate among the returned records
    fn best_candidate(query_text: &str, foods: Vec<SearchFood>) -> Option<FoodCandidate> {
        foods
            .into_iter()
            .filter_map(|food| {
                let boost = completeness_boost(&food.data_type);
                let confidence = match_confidence(query_text, &food.description, boost)?;
                Some(FoodCandidate {
                    nutrition: vector_from_nutrients(&food.food_nutrients),
                    confidence,
                    serving_mass_g: 100.0,
                    matched_name: food.description,
                    labeled_fields: None,
                })
            })
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

#[async_trait]
impl SourceAdapter for FoodDataAdapter {
    fn source(&self) -> ResolutionSource {
        ResolutionSource::FoodDataCentral
    }

    async fn search(&self, query: &FoodQuery) -> AppResult<Option<FoodCandidate>> {
        if query.name.trim().is_empty() {
            return Err(AppError::invalid_input("search query cannot be empty"));
        }

        let query_text = query.full_text();
        let response = self.fetch_search(&query_text).await?;
        let candidate = Self::best_candidate(&query_text, response.foods);

        if let Some(found) = &candidate {
            tracing::debug!(
                query = %query_text,
                matched = %found.matched_name,
                confidence = found.confidence,
                "fooddata match"
            );
        }
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nutrient(name: &str, unit: &str, value: f64) -> SearchNutrient {
        SearchNutrient {
            nutrient_name: name.to_owned(),
            unit_name: unit.to_owned(),
            value,
        }
    }

    #[test]
    fn test_nutrient_mapping_covers_macros_and_minerals() {
        let nutrients = vec![
            nutrient("Energy", "KCAL", 165.0),
            nutrient("Energy", "kJ", 690.0),
            nutrient("Protein", "G", 31.02),
            nutrient("Total lipid (fat)", "G", 3.57),
            nutrient("Sodium, Na", "MG", 74.0),
            nutrient("Unmapped exotic nutrient", "G", 9.9),
        ];
        let vector = vector_from_nutrients(&nutrients);
        assert!((vector.energy_kcal - 165.0).abs() < f64::EPSILON);
        assert!((vector.protein_g - 31.02).abs() < f64::EPSILON);
        assert!((vector.fat_g - 3.57).abs() < f64::EPSILON);
        assert!((vector.sodium_mg - 74.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kj_energy_row_is_ignored() {
        let vector = vector_from_nutrients(&[nutrient("Energy", "kJ", 690.0)]);
        assert!(vector.energy_kcal.abs() < f64::EPSILON);
    }

    #[test]
    fn test_best_candidate_prefers_higher_confidence() {
        let foods = vec![
            SearchFood {
                description: "Chicken, thigh, raw".to_owned(),
                data_type: "SR Legacy".to_owned(),
                food_nutrients: vec![],
            },
            SearchFood {
                description: "Chicken breast".to_owned(),
                data_type: "Foundation".to_owned(),
                food_nutrients: vec![],
            },
        ];
        let best = FoodDataAdapter::best_candidate("chicken breast", foods).unwrap();
        assert_eq!(best.matched_name, "Chicken breast");
    }

    #[test]
    fn test_no_overlap_yields_no_candidate() {
        let foods = vec![SearchFood {
            description: "Strawberry yogurt".to_owned(),
            data_type: "Branded".to_owned(),
            food_nutrients: vec![],
        }];
        assert!(FoodDataAdapter::best_candidate("grilled salmon", foods).is_none());
    }
}
