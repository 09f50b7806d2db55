// ABOUTME: Shared SourceAdapter interface over the three nutrition reference databases
// ABOUTME: FoodQuery/FoodCandidate types and bounded-concurrency batch searching
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! # Source Adapters
//!
//! Each external nutrition-reference provider is wrapped in one adapter
//! implementing [`SourceAdapter`]: free-text query in, candidate nutrient
//! vector with a match confidence and serving mass out. The orchestrator
//! holds an ordered list of adapter values per food type; adapters are
//! injected at construction so tests can substitute fakes.
//!
//! Batch calls against any one adapter are capped at a small concurrency
//! limit to respect upstream per-minute rate limits.

/// Match-confidence estimation shared by all adapters
pub mod confidence;
/// USDA FoodData Central adapter (whole/generic foods)
pub mod fooddata;
/// Nutritionix adapter (restaurant/branded items)
pub mod nutritionix;
/// Open Food Facts adapter (packaged/labeled products)
pub mod openfoodfacts;

use crate::errors::AppResult;
use crate::models::nutrients::{NutrientField, NutrientVector};
use crate::models::resolution::ResolutionSource;
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};

/// One adapter query: a food name plus an optional brand/restaurant qualifier
#[derive(Debug, Clone)]
pub struct FoodQuery {
    /// Food name to search for
    pub name: String,
    /// Brand or restaurant context, prepended by adapters that support it
    pub qualifier: Option<String>,
}

impl FoodQuery {
    /// Bare query
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualifier: None,
        }
    }

    /// Query biased by a brand/restaurant qualifier
    #[must_use]
    pub fn qualified(name: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualifier: Some(qualifier.into()),
        }
    }

    /// The query text with the qualifier prepended, when present
    #[must_use]
    pub fn full_text(&self) -> String {
        self.qualifier.as_ref().map_or_else(
            || self.name.clone(),
            |qualifier| format!("{qualifier} {}", self.name),
        )
    }
}

/// A candidate match returned by one adapter
#[derive(Debug, Clone)]
pub struct FoodCandidate {
    /// Possibly partial nutrient vector for `serving_mass_g`
    pub nutrition: NutrientVector,
    /// Match confidence in [0, 1]
    pub confidence: f64,
    /// Serving mass the vector describes, in grams
    pub serving_mass_g: f64,
    /// Name of the matched record, for reconciliation and logging
    pub matched_name: String,
    /// For label-backed adapters: which fields came directly off the label.
    /// Fields absent from this list were left unset (zero) and are fair game
    /// for enrichment; fields in it must never be overridden.
    pub labeled_fields: Option<Vec<NutrientField>>,
}

impl FoodCandidate {
    /// Whether a field may be filled by enrichment without contradicting
    /// label data
    #[must_use]
    pub fn field_is_unset(&self, field: NutrientField) -> bool {
        match &self.labeled_fields {
            Some(labeled) => !labeled.contains(&field),
            None => self.nutrition.get(field) == 0.0,
        }
    }
}

/// Common interface over the three nutrition reference databases
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Provenance tag for results produced by this adapter
    fn source(&self) -> ResolutionSource;

    /// Search for one food.
    ///
    /// `Ok(None)` means the database had no acceptable match (not an error);
    /// `Err` means the call itself failed and the cascade should advance.
    ///
    /// # Errors
    ///
    /// Returns an error if the network call or response decoding fails.
    async fn search(&self, query: &FoodQuery) -> AppResult<Option<FoodCandidate>>;

    /// Search many foods with at most `max_in_flight` concurrent calls.
    ///
    /// The output is aligned with `queries`; per-query failures occupy their
    /// slot rather than failing the batch.
    async fn search_batch(
        &self,
        queries: &[FoodQuery],
        max_in_flight: usize,
    ) -> Vec<AppResult<Option<FoodCandidate>>> {
        // Collect the futures up front; mapping lazily over the borrowed
        // slice does not satisfy the higher-ranked bound `buffered` needs
        // with a boxed trait future.
        let searches: Vec<_> = queries.iter().map(|query| self.search(query)).collect();
        stream::iter(searches)
            .buffered(max_in_flight.max(1))
            .collect()
            .await
    }
}
