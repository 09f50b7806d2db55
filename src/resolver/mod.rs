// ABOUTME: Resolution orchestrator: cache probe, adapter cascade, enrichment, decomposition
// ABOUTME: Single-item and batch meal resolution with provenance and confidence bookkeeping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! # Resolver Orchestrator
//!
//! Turns a [`NormalizedFoodDescriptor`] into a [`ResolutionResult`] by walking
//! a fixed pipeline: cache probe, then an ordered adapter cascade chosen by
//! food type, then (for sparse label data) a generic-food enrichment merge,
//! then composite decomposition when an ingredient breakdown exists. The first
//! acceptable answer short-circuits the rest.
//!
//! Adapters are injected at construction, so tests substitute fakes and no
//! network is ever touched outside the adapter implementations. The single
//! path surfaces an exhausted cascade as an error; the batch path never fails
//! partially and substitutes a zero-confidence placeholder instead.

use crate::adapters::{FoodCandidate, FoodQuery, SourceAdapter};
use crate::cache::{normalize_name, ResolutionCache};
use crate::config::ResolverConfig;
use crate::errors::{AppError, AppResult};
use crate::models::food::{FoodType, NormalizedFoodDescriptor};
use crate::models::nutrients::{NutrientField, NutrientVector};
use crate::models::resolution::{ResolutionResult, ResolutionSource};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;

/// Orchestrates cache, adapters, enrichment, and decomposition
pub struct ResolverOrchestrator {
    config: ResolverConfig,
    cache: ResolutionCache,
    fooddata: Arc<dyn SourceAdapter>,
    openfoodfacts: Arc<dyn SourceAdapter>,
    nutritionix: Arc<dyn SourceAdapter>,
}

impl ResolverOrchestrator {
    /// Build an orchestrator over injected adapters
    pub fn new(
        config: ResolverConfig,
        cache: ResolutionCache,
        fooddata: Arc<dyn SourceAdapter>,
        openfoodfacts: Arc<dyn SourceAdapter>,
        nutritionix: Arc<dyn SourceAdapter>,
    ) -> Self {
        Self {
            config,
            cache,
            fooddata,
            openfoodfacts,
            nutritionix,
        }
    }

    /// Ordered adapter cascade for a food type
    fn route(&self, food_type: FoodType) -> Vec<Arc<dyn SourceAdapter>> {
        match food_type {
            FoodType::WholeFood => {
                vec![Arc::clone(&self.fooddata), Arc::clone(&self.openfoodfacts)]
            }
            FoodType::BrandedPackaged => vec![
                Arc::clone(&self.openfoodfacts),
                Arc::clone(&self.nutritionix),
                Arc::clone(&self.fooddata),
            ],
            FoodType::RestaurantItem => vec![
                Arc::clone(&self.nutritionix),
                Arc::clone(&self.openfoodfacts),
            ],
            FoodType::HomemadeDish | FoodType::GenericDish => vec![
                Arc::clone(&self.fooddata),
                Arc::clone(&self.nutritionix),
                Arc::clone(&self.openfoodfacts),
            ],
        }
    }

    /// Acceptance threshold for candidates from a given source
    fn threshold_for(&self, source: ResolutionSource) -> f64 {
        match source {
            ResolutionSource::FoodDataCentral => self.config.fooddata_min_confidence,
            ResolutionSource::OpenFoodFacts => self.config.openfoodfacts_min_confidence,
            ResolutionSource::Nutritionix => self.config.nutritionix_min_confidence,
            _ => self.config.fooddata_min_confidence,
        }
    }

    fn query_for(descriptor: &NormalizedFoodDescriptor) -> FoodQuery {
        let qualifier = descriptor
            .brand
            .clone()
            .or_else(|| descriptor.restaurant.clone());
        match qualifier {
            Some(qualifier) => FoodQuery::qualified(descriptor.name.clone(), qualifier),
            None => FoodQuery::new(descriptor.name.clone()),
        }
    }

    /// Resolve one food to its per-serving nutrient composition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the descriptor violates its contract and
    /// `AllSourcesExhausted` when no source produced an acceptable match.
    pub async fn resolve(
        &self,
        descriptor: &NormalizedFoodDescriptor,
    ) -> AppResult<ResolutionResult> {
        descriptor.validate()?;

        if let Some(entry) = self
            .cache
            .get(&descriptor.name, descriptor.estimated_mass_g)
            .await
        {
            tracing::debug!(food = %descriptor.name, "resolved from cache");
            return Ok(entry
                .result
                .rescaled_to(descriptor.estimated_mass_g)
                .served_from_cache());
        }

        let query = Self::query_for(descriptor);
        if let Some(result) = self.run_cascade(descriptor, &query).await {
            self.cache.set(&descriptor.name, &result).await;
            return Ok(result);
        }

        if !descriptor.ingredients.is_empty() {
            if let Some(result) = self.decompose(descriptor).await {
                self.cache.set(&descriptor.name, &result).await;
                return Ok(result);
            }
        }

        Err(AppError::all_sources_exhausted(&descriptor.name))
    }

    /// Walk the adapter cascade, returning the first acceptable candidate
    /// rescaled to the descriptor's serving mass.
    async fn run_cascade(
        &self,
        descriptor: &NormalizedFoodDescriptor,
        query: &FoodQuery,
    ) -> Option<ResolutionResult> {
        for adapter in self.route(descriptor.food_type) {
            let source = adapter.source();
            let candidate = match adapter.search(query).await {
                Ok(Some(candidate)) => candidate,
                Ok(None) => {
                    tracing::debug!(food = %descriptor.name, %source, "no match, advancing cascade");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(food = %descriptor.name, %source, error = %e, "adapter failed, advancing cascade");
                    continue;
                }
            };

            let threshold = self.threshold_for(source);
            if candidate.confidence < threshold {
                tracing::debug!(
                    food = %descriptor.name,
                    %source,
                    confidence = candidate.confidence,
                    threshold,
                    "candidate below threshold, advancing cascade"
                );
                continue;
            }

            return Some(self.accept(descriptor, source, candidate).await);
        }
        None
    }

    /// Finalize an accepted candidate: enrich sparse label data, then rescale
    /// to the requested serving mass.
    async fn accept(
        &self,
        descriptor: &NormalizedFoodDescriptor,
        source: ResolutionSource,
        candidate: FoodCandidate,
    ) -> ResolutionResult {
        let (candidate, source) = if source == ResolutionSource::OpenFoodFacts {
            self.maybe_enrich(descriptor, candidate).await
        } else {
            (candidate, source)
        };

        let nutrition = candidate
            .nutrition
            .scale_to_mass(candidate.serving_mass_g, descriptor.estimated_mass_g);
        ResolutionResult::new(
            nutrition,
            source,
            candidate.confidence,
            descriptor.estimated_mass_g,
        )
    }

    /// Fill unset micronutrients of a sparse label candidate from a generic
    /// whole-food lookup. Fields the label declared (even at zero) are never
    /// touched; the merged confidence is the minimum of the two matches.
    async fn maybe_enrich(
        &self,
        descriptor: &NormalizedFoodDescriptor,
        mut candidate: FoodCandidate,
    ) -> (FoodCandidate, ResolutionSource) {
        let unset_count = NutrientField::ALL
            .iter()
            .filter(|&&field| candidate.field_is_unset(field))
            .count();
        if unset_count < self.config.enrichment_missing_field_threshold {
            return (candidate, ResolutionSource::OpenFoodFacts);
        }

        let generic = generic_name(&descriptor.name, descriptor.brand.as_deref());
        let lookup = self.fooddata.search(&FoodQuery::new(generic.clone())).await;
        let generic_candidate = match lookup {
            Ok(Some(found)) if found.confidence >= self.config.fooddata_min_confidence => found,
            Ok(_) => return (candidate, ResolutionSource::OpenFoodFacts),
            Err(e) => {
                tracing::debug!(food = %descriptor.name, error = %e, "enrichment lookup failed");
                return (candidate, ResolutionSource::OpenFoodFacts);
            }
        };

        // Both vectors must be on the same per-mass basis before merging
        let generic_per_100 = generic_candidate
            .nutrition
            .per_100g(generic_candidate.serving_mass_g);
        let label_per_100 = candidate.nutrition.per_100g(candidate.serving_mass_g);

        let mut merged = label_per_100;
        let mut filled = 0usize;
        for &field in NutrientField::ALL {
            if candidate.field_is_unset(field) && generic_per_100.get(field) > 0.0 {
                merged.set(field, generic_per_100.get(field));
                filled += 1;
            }
        }

        if filled == 0 {
            return (candidate, ResolutionSource::OpenFoodFacts);
        }

        tracing::debug!(
            food = %descriptor.name,
            generic = %generic,
            filled,
            "enriched label data with generic lookup"
        );
        candidate.nutrition = merged;
        candidate.serving_mass_g = 100.0;
        candidate.confidence = candidate.confidence.min(generic_candidate.confidence);
        (candidate, ResolutionSource::Hybrid)
    }

    /// Resolve a composite dish by resolving each ingredient independently
    /// and summing. Ingredients go through cache and cascade only (they carry
    /// no breakdown of their own); one unresolvable ingredient fails the
    /// decomposition.
    async fn decompose(&self, descriptor: &NormalizedFoodDescriptor) -> Option<ResolutionResult> {
        let mut parts = Vec::with_capacity(descriptor.ingredients.len());
        for ingredient in &descriptor.ingredients {
            if ingredient.estimated_mass_g <= 0.0 {
                tracing::warn!(
                    dish = %descriptor.name,
                    ingredient = %ingredient.name,
                    "non-positive ingredient mass, decomposition abandoned"
                );
                return None;
            }
            let part = NormalizedFoodDescriptor::whole_food(
                ingredient.name.clone(),
                ingredient.estimated_mass_g,
            );
            if let Some(entry) = self.cache.get(&part.name, part.estimated_mass_g).await {
                parts.push(entry.result.rescaled_to(part.estimated_mass_g));
                continue;
            }
            let query = FoodQuery::new(part.name.clone());
            match self.run_cascade(&part, &query).await {
                Some(resolved) => parts.push(resolved),
                None => {
                    tracing::debug!(
                        dish = %descriptor.name,
                        ingredient = %ingredient.name,
                        "ingredient unresolvable, decomposition abandoned"
                    );
                    return None;
                }
            }
        }

        let nutrition = NutrientVector::sum(parts.iter().map(|part| &part.nutrition));
        let mean_confidence =
            parts.iter().map(|part| part.confidence).sum::<f64>() / parts.len() as f64;
        let confidence = mean_confidence * self.config.composition_confidence_penalty;
        let total_mass: f64 = parts.iter().map(|part| part.serving_mass_g).sum();

        // The summed vector describes the ingredient masses; rescale to the
        // dish's stated serving mass when they disagree.
        let result = ResolutionResult::new(
            nutrition,
            ResolutionSource::Decomposed,
            confidence,
            total_mass,
        );
        Some(result.rescaled_to(descriptor.estimated_mass_g))
    }

    /// Resolve a whole meal.
    ///
    /// Always returns one result per descriptor, in order. Foods no source
    /// could resolve contribute a zero-vector, zero-confidence placeholder so
    /// the caller can still sum and grade the meal.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when any descriptor violates its contract.
    pub async fn resolve_meal(
        &self,
        descriptors: &[NormalizedFoodDescriptor],
    ) -> AppResult<Vec<ResolutionResult>> {
        for descriptor in descriptors {
            descriptor.validate()?;
        }

        let requests: Vec<(String, f64)> = descriptors
            .iter()
            .map(|d| (d.name.clone(), d.estimated_mass_g))
            .collect();
        let cached = self.cache.get_batch(&requests).await;

        let mut results: Vec<Option<ResolutionResult>> = descriptors
            .iter()
            .zip(cached)
            .map(|(descriptor, entry)| {
                entry.map(|entry| {
                    entry
                        .result
                        .rescaled_to(descriptor.estimated_mass_g)
                        .served_from_cache()
                })
            })
            .collect();
        let from_cache: Vec<bool> = results.iter().map(Option::is_some).collect();

        // Group cache misses by food type so each group hits its primary
        // adapter in one bounded batch.
        let mut groups: HashMap<FoodType, Vec<usize>> = HashMap::new();
        for (index, result) in results.iter().enumerate() {
            if result.is_none() {
                groups
                    .entry(descriptors[index].food_type)
                    .or_default()
                    .push(index);
            }
        }

        let group_futures = groups.iter().map(|(&food_type, indices)| {
            let queries: Vec<FoodQuery> = indices
                .iter()
                .map(|&index| Self::query_for(&descriptors[index]))
                .collect();
            async move {
                let adapters = self.route(food_type);
                let primary = Arc::clone(&adapters[0]);
                let batch = primary
                    .search_batch(&queries, self.config.max_in_flight_per_adapter)
                    .await;
                (food_type, batch)
            }
        });
        let batch_outcomes: HashMap<FoodType, Vec<AppResult<Option<FoodCandidate>>>> =
            join_all(group_futures).await.into_iter().collect();

        // Reconcile batch answers by exact normalized name; anything else is
        // a straggler handled on the single-item path.
        for (&food_type, indices) in &groups {
            let Some(batch) = batch_outcomes.get(&food_type) else {
                continue;
            };
            let primary_source = self.route(food_type)[0].source();
            for (slot, &index) in indices.iter().enumerate() {
                let descriptor = &descriptors[index];
                let candidate = match batch.get(slot) {
                    Some(Ok(Some(candidate))) => candidate,
                    _ => continue,
                };
                let accepted = candidate.confidence >= self.threshold_for(primary_source)
                    && normalize_name(&candidate.matched_name)
                        == normalize_name(&Self::query_for(descriptor).full_text());
                if accepted {
                    results[index] = Some(
                        self.accept(descriptor, primary_source, candidate.clone())
                            .await,
                    );
                }
            }
        }

        // Stragglers: full single-item pipeline, placeholder on exhaustion
        for (index, descriptor) in descriptors.iter().enumerate() {
            if results[index].is_some() {
                continue;
            }
            match self.resolve_uncached(descriptor).await {
                Some(result) => results[index] = Some(result),
                None => {
                    tracing::warn!(food = %descriptor.name, "meal item unresolvable, using placeholder");
                    results[index] =
                        Some(ResolutionResult::unresolved(descriptor.estimated_mass_g));
                }
            }
        }

        let resolved: Vec<ResolutionResult> = results.into_iter().flatten().collect();

        let writes: Vec<(String, ResolutionResult)> = descriptors
            .iter()
            .zip(&resolved)
            .enumerate()
            .filter(|(index, _)| !from_cache[*index])
            .map(|(_, (descriptor, result))| (descriptor.name.clone(), result.clone()))
            .collect();
        self.cache.set_batch(&writes).await;

        Ok(resolved)
    }

    /// Single-item pipeline minus the cache probe (the batch path has already
    /// probed) and minus the cache write (the batch path writes once at the
    /// end).
    async fn resolve_uncached(
        &self,
        descriptor: &NormalizedFoodDescriptor,
    ) -> Option<ResolutionResult> {
        let query = Self::query_for(descriptor);
        if let Some(result) = self.run_cascade(descriptor, &query).await {
            return Some(result);
        }
        if !descriptor.ingredients.is_empty() {
            return self.decompose(descriptor).await;
        }
        None
    }
}

/// Best-effort generic name for the enrichment lookup: the food name with
/// the brand tokens removed. Falls back to the full name when stripping
/// would leave nothing.
fn generic_name(name: &str, brand: Option<&str>) -> String {
    let Some(brand) = brand else {
        return name.to_owned();
    };
    let brand_norm = normalize_name(brand);
    let brand_tokens: Vec<&str> = brand_norm.split(' ').collect();
    let stripped = normalize_name(name)
        .split(' ')
        .filter(|token| !brand_tokens.contains(token))
        .collect::<Vec<_>>()
        .join(" ");
    if stripped.is_empty() {
        name.to_owned()
    } else {
        stripped
    }
}
