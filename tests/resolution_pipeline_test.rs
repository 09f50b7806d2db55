// ABOUTME: End-to-end resolution pipeline tests with injected fake adapters
// ABOUTME: Cascade routing, cache behavior, enrichment merge, serving-mass rescaling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use platewise_engine::adapters::{FoodCandidate, FoodQuery, SourceAdapter};
use platewise_engine::cache::{
    cache_key, memory::InMemoryStore, normalize_name, CacheStore, CachedEntry, ResolutionCache,
};
use platewise_engine::config::{CacheConfig, ResolverConfig};
use platewise_engine::errors::AppResult;
use platewise_engine::models::food::FoodType;
use platewise_engine::models::nutrients::{NutrientField, NutrientVector};
use platewise_engine::models::resolution::{ResolutionResult, ResolutionSource};
use platewise_engine::models::NormalizedFoodDescriptor;
use platewise_engine::resolver::ResolverOrchestrator;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Adapter fake with scripted per-query candidates and a call counter
struct ScriptedAdapter {
    source: ResolutionSource,
    answers: HashMap<String, FoodCandidate>,
    calls: AtomicUsize,
}

impl ScriptedAdapter {
    fn new(source: ResolutionSource, answers: Vec<(&str, FoodCandidate)>) -> Arc<Self> {
        Arc::new(Self {
            source,
            answers: answers
                .into_iter()
                .map(|(query, candidate)| (normalize_name(query), candidate))
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }

    fn empty(source: ResolutionSource) -> Arc<Self> {
        Self::new(source, vec![])
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceAdapter for ScriptedAdapter {
    fn source(&self) -> ResolutionSource {
        self.source
    }

    async fn search(&self, query: &FoodQuery) -> AppResult<Option<FoodCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .answers
            .get(&normalize_name(&query.full_text()))
            .cloned())
    }
}

fn per_100g_candidate(name: &str, confidence: f64, kcal: f64) -> FoodCandidate {
    let mut nutrition = NutrientVector::zero();
    nutrition.energy_kcal = kcal;
    FoodCandidate {
        nutrition,
        confidence,
        serving_mass_g: 100.0,
        matched_name: name.to_owned(),
        labeled_fields: None,
    }
}

fn test_cache_config() -> CacheConfig {
    CacheConfig {
        enable_background_cleanup: false,
        ..CacheConfig::default()
    }
}

fn build_resolver(
    fooddata: Arc<ScriptedAdapter>,
    openfoodfacts: Arc<ScriptedAdapter>,
    nutritionix: Arc<ScriptedAdapter>,
) -> (ResolverOrchestrator, Arc<InMemoryStore>) {
    let config = test_cache_config();
    let store = Arc::new(InMemoryStore::new(&config));
    let cache = ResolutionCache::new(Arc::clone(&store) as Arc<dyn CacheStore>, config);
    let resolver = ResolverOrchestrator::new(
        ResolverConfig::default(),
        cache,
        fooddata,
        openfoodfacts,
        nutritionix,
    );
    (resolver, store)
}

#[tokio::test]
async fn test_whole_food_resolves_and_rescales_to_serving_mass() {
    let fooddata = ScriptedAdapter::new(
        ResolutionSource::FoodDataCentral,
        vec![("apple", per_100g_candidate("apple", 0.95, 95.0))],
    );
    let (resolver, _store) = build_resolver(
        fooddata,
        ScriptedAdapter::empty(ResolutionSource::OpenFoodFacts),
        ScriptedAdapter::empty(ResolutionSource::Nutritionix),
    );

    let result = resolver
        .resolve(&NormalizedFoodDescriptor::whole_food("apple", 150.0))
        .await
        .unwrap();

    // 95 kcal per 100 g at 150 g
    assert!((result.nutrition.energy_kcal - 142.5).abs() < 1.0);
    assert!((result.serving_mass_g - 150.0).abs() < f64::EPSILON);
    assert_eq!(result.source, ResolutionSource::FoodDataCentral);
}

#[tokio::test]
async fn test_restaurant_items_route_to_nutritionix_first() {
    let fooddata = ScriptedAdapter::new(
        ResolutionSource::FoodDataCentral,
        vec![("veggie burger", per_100g_candidate("veggie burger", 0.9, 150.0))],
    );
    let nutritionix = ScriptedAdapter::new(
        ResolutionSource::Nutritionix,
        vec![("veggie burger", {
            let mut c = per_100g_candidate("veggie burger", 0.85, 250.0);
            c.serving_mass_g = 240.0;
            c
        })],
    );
    let (resolver, _store) = build_resolver(
        Arc::clone(&fooddata),
        ScriptedAdapter::empty(ResolutionSource::OpenFoodFacts),
        Arc::clone(&nutritionix),
    );

    let mut descriptor = NormalizedFoodDescriptor::whole_food("veggie burger", 240.0);
    descriptor.food_type = FoodType::RestaurantItem;

    let result = resolver.resolve(&descriptor).await.unwrap();
    assert_eq!(result.source, ResolutionSource::Nutritionix);
    assert_eq!(nutritionix.call_count(), 1);
    assert_eq!(fooddata.call_count(), 0);
}

#[tokio::test]
async fn test_resolved_result_round_trips_through_the_cache() {
    let fooddata = ScriptedAdapter::new(
        ResolutionSource::FoodDataCentral,
        vec![("banana", per_100g_candidate("banana", 0.95, 89.0))],
    );
    let (resolver, store) = build_resolver(
        Arc::clone(&fooddata),
        ScriptedAdapter::empty(ResolutionSource::OpenFoodFacts),
        ScriptedAdapter::empty(ResolutionSource::Nutritionix),
    );

    let descriptor = NormalizedFoodDescriptor::whole_food("banana", 100.0);
    let first = resolver.resolve(&descriptor).await.unwrap();
    assert_eq!(first.source, ResolutionSource::FoodDataCentral);
    assert_eq!(store.len().await.unwrap(), 1);

    let again = resolver.resolve(&descriptor).await.unwrap();
    assert_eq!(fooddata.call_count(), 1);
    assert!((again.nutrition.energy_kcal - 89.0).abs() < f64::EPSILON);
    // a hit is tagged as served from the cache, not with the stored provenance
    assert_eq!(again.source, ResolutionSource::Cache);
}

#[tokio::test]
async fn test_meal_cache_hits_are_tagged_as_cache() {
    let fooddata = ScriptedAdapter::new(
        ResolutionSource::FoodDataCentral,
        vec![("banana", per_100g_candidate("banana", 0.95, 89.0))],
    );
    let (resolver, _store) = build_resolver(
        fooddata,
        ScriptedAdapter::empty(ResolutionSource::OpenFoodFacts),
        ScriptedAdapter::empty(ResolutionSource::Nutritionix),
    );

    let meal = vec![NormalizedFoodDescriptor::whole_food("banana", 100.0)];
    let first = resolver.resolve_meal(&meal).await.unwrap();
    assert_eq!(first[0].source, ResolutionSource::FoodDataCentral);

    let again = resolver.resolve_meal(&meal).await.unwrap();
    assert_eq!(again[0].source, ResolutionSource::Cache);
    assert!((again[0].nutrition.energy_kcal - 89.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_expired_cache_entry_is_a_miss() {
    let config = test_cache_config();
    let store = Arc::new(InMemoryStore::new(&config));
    let cache = ResolutionCache::new(Arc::clone(&store) as Arc<dyn CacheStore>, config);

    let now = Utc::now();
    let stale = CachedEntry {
        result: ResolutionResult::new(
            NutrientVector::zero(),
            ResolutionSource::FoodDataCentral,
            0.9,
            100.0,
        ),
        query: "banana".to_owned(),
        created_at: now - ChronoDuration::days(31),
        expires_at: now - ChronoDuration::days(1),
        hit_count: 0,
    };
    store.set(&cache_key("banana", 100.0), stale).await.unwrap();

    assert!(cache.get("banana", 100.0).await.is_none());

    // the miss schedules removal of the stale entry in a detached task
    for _ in 0..50 {
        if store.len().await.unwrap() == 0 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(store.len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_low_confidence_results_are_never_cached() {
    let config = test_cache_config();
    let store = Arc::new(InMemoryStore::new(&config));
    let cache = ResolutionCache::new(Arc::clone(&store) as Arc<dyn CacheStore>, config);

    let weak = ResolutionResult::new(
        NutrientVector::zero(),
        ResolutionSource::Nutritionix,
        0.45,
        100.0,
    );
    cache.set("mystery wrap", &weak).await;
    assert_eq!(store.len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_sparse_label_is_enriched_from_generic_lookup() {
    // the label knows the macro panel only
    let mut label_nutrition = NutrientVector::zero();
    label_nutrition.energy_kcal = 450.0;
    label_nutrition.protein_g = 10.0;
    label_nutrition.carbohydrates_g = 60.0;
    label_nutrition.fat_g = 18.0;
    label_nutrition.sugar_g = 0.0; // label explicitly says zero sugar
    let label = FoodCandidate {
        nutrition: label_nutrition,
        confidence: 0.8,
        serving_mass_g: 100.0,
        matched_name: "Wildcrest granola".to_owned(),
        labeled_fields: Some(vec![
            NutrientField::EnergyKcal,
            NutrientField::ProteinG,
            NutrientField::CarbohydratesG,
            NutrientField::FatG,
            NutrientField::SugarG,
        ]),
    };

    // the generic reference record fills the micronutrient gaps
    let mut generic_nutrition = NutrientVector::zero();
    generic_nutrition.energy_kcal = 470.0; // must NOT override the label
    generic_nutrition.sugar_g = 22.0; // must NOT override a labeled zero
    generic_nutrition.fiber_g = 7.0;
    generic_nutrition.iron_mg = 2.4;
    generic_nutrition.magnesium_mg = 90.0;
    let generic = per_100g_candidate("granola", 0.7, 470.0);
    let generic = FoodCandidate {
        nutrition: generic_nutrition,
        ..generic
    };

    let openfoodfacts = ScriptedAdapter::new(
        ResolutionSource::OpenFoodFacts,
        vec![("Wildcrest granola", label)],
    );
    let fooddata = ScriptedAdapter::new(ResolutionSource::FoodDataCentral, vec![("granola", generic)]);
    let (resolver, _store) = build_resolver(
        fooddata,
        openfoodfacts,
        ScriptedAdapter::empty(ResolutionSource::Nutritionix),
    );

    let mut descriptor = NormalizedFoodDescriptor::whole_food("granola", 100.0);
    descriptor.food_type = FoodType::BrandedPackaged;
    descriptor.brand = Some("Wildcrest".to_owned());

    let result = resolver.resolve(&descriptor).await.unwrap();

    assert_eq!(result.source, ResolutionSource::Hybrid);
    // merged confidence is the minimum of the two matches
    assert!((result.confidence - 0.7).abs() < f64::EPSILON);
    // labeled fields kept, including the explicit zero
    assert!((result.nutrition.energy_kcal - 450.0).abs() < f64::EPSILON);
    assert!(result.nutrition.sugar_g.abs() < f64::EPSILON);
    // unset fields filled from the generic record
    assert!((result.nutrition.fiber_g - 7.0).abs() < f64::EPSILON);
    assert!((result.nutrition.iron_mg - 2.4).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_meal_resolution_always_returns_a_complete_set() {
    let fooddata = ScriptedAdapter::new(
        ResolutionSource::FoodDataCentral,
        vec![
            ("banana", per_100g_candidate("banana", 0.95, 89.0)),
            ("oatmeal", per_100g_candidate("oatmeal", 0.9, 68.0)),
        ],
    );
    let (resolver, _store) = build_resolver(
        fooddata,
        ScriptedAdapter::empty(ResolutionSource::OpenFoodFacts),
        ScriptedAdapter::empty(ResolutionSource::Nutritionix),
    );

    let meal = vec![
        NormalizedFoodDescriptor::whole_food("banana", 118.0),
        NormalizedFoodDescriptor::whole_food("oatmeal", 234.0),
        NormalizedFoodDescriptor::whole_food("grandmother's secret stew", 300.0),
    ];

    let results = resolver.resolve_meal(&meal).await.unwrap();
    assert_eq!(results.len(), 3);
    assert!(results[0].confidence > 0.0);
    assert!(results[1].confidence > 0.0);
    // the unresolvable item is a summable zero placeholder, not an error
    assert_eq!(results[2].source, ResolutionSource::AiFallback);
    assert!(results[2].nutrition.is_zero());
    assert!((results[2].serving_mass_g - 300.0).abs() < f64::EPSILON);

    // meal total stays computable
    let total = NutrientVector::sum(results.iter().map(|r| &r.nutrition));
    assert!(total.energy_kcal > 0.0);
}

#[tokio::test]
async fn test_adapter_batch_output_is_aligned_with_queries() {
    let adapter = ScriptedAdapter::new(
        ResolutionSource::FoodDataCentral,
        vec![
            ("banana", per_100g_candidate("banana", 0.95, 89.0)),
            ("oatmeal", per_100g_candidate("oatmeal", 0.9, 68.0)),
        ],
    );

    let queries = vec![
        FoodQuery::new("banana"),
        FoodQuery::new("kumquat casserole"),
        FoodQuery::new("oatmeal"),
    ];
    let results = adapter.search_batch(&queries, 2).await;

    assert_eq!(results.len(), 3);
    assert!(matches!(&results[0], Ok(Some(c)) if c.matched_name == "banana"));
    assert!(matches!(&results[1], Ok(None)));
    assert!(matches!(&results[2], Ok(Some(c)) if c.matched_name == "oatmeal"));
    assert_eq!(adapter.call_count(), 3);
}

#[tokio::test]
async fn test_scaling_is_linear_and_non_negative() {
    let mut nutrition = NutrientVector::zero();
    nutrition.energy_kcal = 200.0;
    nutrition.protein_g = 10.0;
    nutrition.sodium_mg = 300.0;

    let doubled = nutrition.scale_to_mass(100.0, 200.0);
    assert!((doubled.energy_kcal - 400.0).abs() < f64::EPSILON);
    assert!((doubled.protein_g - 20.0).abs() < f64::EPSILON);
    assert!((doubled.sodium_mg - 600.0).abs() < f64::EPSILON);

    let same = nutrition.scale_to_mass(100.0, 100.0);
    assert!((same.energy_kcal - nutrition.energy_kcal).abs() < f64::EPSILON);

    for &field in NutrientField::ALL {
        assert!(doubled.get(field) >= 0.0);
    }
}
