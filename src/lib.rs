// ABOUTME: Nutrition resolution, grading, and comparison engine
// ABOUTME: Library root wiring models, cache, adapters, resolver, and intelligence together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! # Platewise Engine
//!
//! Turns normalized food descriptors into per-serving nutrient vectors and
//! deterministic health assessments:
//!
//! - **Resolution**: cache probe, then an ordered cascade over three external
//!   nutrition reference databases chosen by food type, with label
//!   enrichment and composite decomposition ([`resolver::ResolverOrchestrator`]).
//! - **Assessment**: glycemic lookup, a Nutri-Score-style overall grade, ten
//!   wellness-focus grades, satiety and inflammatory classification
//!   ([`intelligence`]).
//! - **Comparison**: deterministic per-focus ranking of two or more graded
//!   foods ([`intelligence::ComparisonEngine`]).
//!
//! The engine is embedded by a host service: configuration comes in through
//! [`config::EngineConfig`], food identification happens upstream, and all
//! outputs are plain serializable value objects.
//!
//! ```no_run
//! use platewise_engine::adapters::fooddata::FoodDataAdapter;
//! use platewise_engine::adapters::nutritionix::NutritionixAdapter;
//! use platewise_engine::adapters::openfoodfacts::OpenFoodFactsAdapter;
//! use platewise_engine::cache::{memory::InMemoryStore, ResolutionCache};
//! use platewise_engine::config::EngineConfig;
//! use platewise_engine::models::NormalizedFoodDescriptor;
//! use platewise_engine::resolver::ResolverOrchestrator;
//! use std::sync::Arc;
//!
//! # async fn run() -> platewise_engine::errors::AppResult<()> {
//! let config = EngineConfig::default();
//! config.validate()?;
//!
//! let cache = ResolutionCache::new(
//!     Arc::new(InMemoryStore::new(&config.cache)),
//!     config.cache.clone(),
//! );
//! let resolver = ResolverOrchestrator::new(
//!     config.resolver.clone(),
//!     cache,
//!     Arc::new(FoodDataAdapter::new(config.providers.fooddata.clone())?),
//!     Arc::new(OpenFoodFactsAdapter::new(config.providers.openfoodfacts.clone())?),
//!     Arc::new(NutritionixAdapter::new(config.providers.nutritionix.clone())?),
//! );
//!
//! let banana = NormalizedFoodDescriptor::whole_food("banana", 118.0);
//! let resolved = resolver.resolve(&banana).await?;
//! println!("{} kcal", resolved.nutrition.energy_kcal);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

/// External nutrition-reference database adapters
pub mod adapters;
/// Resolution cache over a pluggable key-value store
pub mod cache;
/// Engine configuration supplied by the embedding service
pub mod config;
/// Unified error type and result alias
pub mod errors;
/// Glycemic lookup, grading, and comparison
pub mod intelligence;
/// Tracing subscriber setup for embedding hosts
pub mod logging;
/// Value objects: descriptors, nutrient vectors, results
pub mod models;
/// Resolution orchestrator
pub mod resolver;

pub use errors::{AppError, AppResult, ErrorCode};
pub use models::{NormalizedFoodDescriptor, NutrientVector};
