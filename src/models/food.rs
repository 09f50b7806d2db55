// ABOUTME: Food descriptor types consumed from the identification collaborator
// ABOUTME: NormalizedFoodDescriptor, FoodType routing tag, FoodGroup taxonomy, ingredient specs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Routing tag driving the adapter cascade for a food
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FoodType {
    /// Single whole/generic food (e.g., "banana", "chicken breast")
    WholeFood,
    /// Packaged product with a nutrition label
    BrandedPackaged,
    /// Restaurant or chain menu item
    RestaurantItem,
    /// Homemade dish with a known ingredient breakdown
    HomemadeDish,
    /// Generic prepared dish without a breakdown (e.g., "lasagna")
    GenericDish,
}

/// Coarse food-group taxonomy
///
/// Used by the glycemic category fallback and the grader's fruit/vegetable
/// content proxy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FoodGroup {
    /// Whole fruits and fruit-dominant foods
    Fruits,
    /// Vegetables, leafy greens, roots
    Vegetables,
    /// Breads, cereals, rice, pasta
    Grains,
    /// Meat, poultry, fish, eggs
    ProteinFoods,
    /// Milk, yogurt, cheese
    Dairy,
    /// Beans, lentils, peas
    Legumes,
    /// Nuts and seeds
    NutsSeeds,
    /// Desserts, candy, sweetened foods
    Sweets,
    /// Drinks of any kind
    Beverages,
    /// Composite/mixed dishes
    MixedDishes,
    /// Anything else
    Other,
}

/// One ingredient of a composite dish, with its estimated cooked mass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientSpec {
    /// Ingredient name as identified (e.g., "cooked white rice")
    pub name: String,
    /// Estimated mass contribution in grams
    pub estimated_mass_g: f64,
}

/// Normalized food descriptor produced by the identification collaborator
///
/// This is the engine's input contract: identification (photo, free text,
/// menu scan) happens upstream and is out of scope here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedFoodDescriptor {
    /// Food name, already normalized by the identifier
    pub name: String,
    /// Quantity in the stated unit (e.g., 1.5)
    pub quantity: f64,
    /// Unit the quantity was stated in (e.g., "cup", "piece")
    pub unit: String,
    /// Estimated total mass in grams (must be > 0)
    pub estimated_mass_g: f64,
    /// Routing tag for the adapter cascade
    pub food_type: FoodType,
    /// Brand context for packaged products
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Restaurant context for menu items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<String>,
    /// Cuisine context (e.g., "thai")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    /// Ingredient breakdown for composite dishes (empty when unknown)
    #[serde(default)]
    pub ingredients: Vec<IngredientSpec>,
    /// Coarse food group, when the identifier could tell
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_group: Option<FoodGroup>,
    /// Whether this item is a beverage (grading uses different point bands)
    #[serde(default)]
    pub is_beverage: bool,
    /// Identification confidence in [0, 1]
    pub identification_confidence: f64,
}

impl NormalizedFoodDescriptor {
    /// Minimal descriptor for a whole food of a given mass
    #[must_use]
    pub fn whole_food(name: impl Into<String>, estimated_mass_g: f64) -> Self {
        Self {
            name: name.into(),
            quantity: 1.0,
            unit: "serving".to_owned(),
            estimated_mass_g,
            food_type: FoodType::WholeFood,
            brand: None,
            restaurant: None,
            cuisine: None,
            ingredients: Vec::new(),
            food_group: None,
            is_beverage: false,
            identification_confidence: 1.0,
        }
    }

    /// Validate the invariants the identification contract promises
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the name is empty, the mass is not positive,
    /// or the identification confidence is outside [0, 1].
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::invalid_input("food name must not be empty"));
        }
        if self.estimated_mass_g <= 0.0 {
            return Err(AppError::invalid_input(format!(
                "estimated mass must be positive, got {} g for '{}'",
                self.estimated_mass_g, self.name
            )));
        }
        if !(0.0..=1.0).contains(&self.identification_confidence) {
            return Err(AppError::invalid_input(format!(
                "identification confidence must be in [0, 1], got {}",
                self.identification_confidence
            )));
        }
        Ok(())
    }
}
