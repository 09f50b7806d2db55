// ABOUTME: Canonical fixed-field nutrient vector and its arithmetic
// ABOUTME: Closed NutrientField enumeration, mass scaling with unit-class rounding, summation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! # Nutrient Vector
//!
//! `NutrientVector` is the canonical per-serving nutrient record every other
//! component consumes. It is a fixed-field struct over a closed, enumerated
//! set of nutrient keys (`NutrientField`), not a stringly-typed map:
//! "iterate over all nutrients" is iteration over `NutrientField::ALL`, a
//! compile-time list.
//!
//! Invariants:
//! - every field defaults to 0.0, never null; unresolved nutrients stay zero,
//! - values are clamped non-negative on write,
//! - mass scaling is linear and rounds per unit class: one decimal for
//!   gram-scale fields (and kcal), whole units for mg/µg-scale fields.

use serde::{Deserialize, Serialize};

/// Rounding class for a nutrient field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitClass {
    /// Gram-scale macros and kcal: rounded to one decimal
    GramScale,
    /// Milligram/microgram-scale minerals and vitamins: rounded to whole units
    WholeUnit,
}

macro_rules! nutrient_fields {
    ($( $variant:ident => $field:ident : $class:ident ),+ $(,)?) => {
        /// Closed set of nutrient keys carried by [`NutrientVector`]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum NutrientField {
            $(
                #[allow(missing_docs)]
                $variant,
            )+
        }

        impl NutrientField {
            /// Every nutrient field, in declaration order
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];

            /// Rounding class for this field
            #[must_use]
            pub const fn unit_class(self) -> UnitClass {
                match self {
                    $( Self::$variant => UnitClass::$class, )+
                }
            }

            /// Stable snake_case name, matching the serialized field name
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($field), )+
                }
            }
        }

        /// Canonical per-serving nutrient composition record
        ///
        /// All values are for the serving mass the containing
        /// [`ResolutionResult`](crate::models::resolution::ResolutionResult)
        /// declares (adapters produce per-100 g vectors internally).
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct NutrientVector {
            $(
                #[allow(missing_docs)]
                #[serde(default)]
                pub $field: f64,
            )+
        }

        impl NutrientVector {
            /// Read a field by key
            #[must_use]
            pub const fn get(&self, field: NutrientField) -> f64 {
                match field {
                    $( NutrientField::$variant => self.$field, )+
                }
            }

            /// Write a field by key, clamping negatives to zero
            pub fn set(&mut self, field: NutrientField, value: f64) {
                let value = value.max(0.0);
                match field {
                    $( NutrientField::$variant => self.$field = value, )+
                }
            }
        }
    };
}

nutrient_fields! {
    EnergyKcal => energy_kcal: GramScale,
    ProteinG => protein_g: GramScale,
    CarbohydratesG => carbohydrates_g: GramScale,
    FiberG => fiber_g: GramScale,
    SugarG => sugar_g: GramScale,
    AddedSugarG => added_sugar_g: GramScale,
    FatG => fat_g: GramScale,
    SaturatedFatG => saturated_fat_g: GramScale,
    MonounsaturatedFatG => monounsaturated_fat_g: GramScale,
    PolyunsaturatedFatG => polyunsaturated_fat_g: GramScale,
    TransFatG => trans_fat_g: GramScale,
    Omega3G => omega3_g: GramScale,
    WaterG => water_g: GramScale,
    CholesterolMg => cholesterol_mg: WholeUnit,
    SodiumMg => sodium_mg: WholeUnit,
    PotassiumMg => potassium_mg: WholeUnit,
    CalciumMg => calcium_mg: WholeUnit,
    IronMg => iron_mg: WholeUnit,
    MagnesiumMg => magnesium_mg: WholeUnit,
    ZincMg => zinc_mg: WholeUnit,
    PhosphorusMg => phosphorus_mg: WholeUnit,
    SeleniumUg => selenium_ug: WholeUnit,
    VitaminAUg => vitamin_a_ug: WholeUnit,
    VitaminCMg => vitamin_c_mg: WholeUnit,
    VitaminDUg => vitamin_d_ug: WholeUnit,
    VitaminEMg => vitamin_e_mg: WholeUnit,
    VitaminKUg => vitamin_k_ug: WholeUnit,
    VitaminB6Mg => vitamin_b6_mg: WholeUnit,
    VitaminB12Ug => vitamin_b12_ug: WholeUnit,
    FolateUg => folate_ug: WholeUnit,
    CaffeineMg => caffeine_mg: WholeUnit,
}

/// Round to one decimal place
#[must_use]
fn round_to_1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl NutrientVector {
    /// All-zero vector (same as `Default`)
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Linearly rescale this vector from one serving mass to another.
    ///
    /// Rounding is applied once, per unit class, after scaling. Rescaling to
    /// the same mass is an identity operation (no re-rounding), which keeps
    /// repeated scaling to the same target mass stable.
    #[must_use]
    pub fn scale_to_mass(&self, from_mass_g: f64, to_mass_g: f64) -> Self {
        if from_mass_g <= 0.0 || to_mass_g <= 0.0 {
            return Self::zero();
        }
        if (from_mass_g - to_mass_g).abs() < f64::EPSILON {
            return self.clone();
        }

        let ratio = to_mass_g / from_mass_g;
        let mut scaled = Self::zero();
        for &field in NutrientField::ALL {
            let raw = (self.get(field) * ratio).max(0.0);
            let rounded = match field.unit_class() {
                UnitClass::GramScale => round_to_1(raw),
                UnitClass::WholeUnit => raw.round(),
            };
            scaled.set(field, rounded);
        }
        scaled
    }

    /// Convenience: rescale a per-serving vector to a per-100 g basis
    #[must_use]
    pub fn per_100g(&self, serving_mass_g: f64) -> Self {
        self.scale_to_mass(serving_mass_g, 100.0)
    }

    /// Field-wise addition in place
    pub fn add(&mut self, other: &Self) {
        for &field in NutrientField::ALL {
            self.set(field, self.get(field) + other.get(field));
        }
    }

    /// Field-wise sum of many vectors
    #[must_use]
    pub fn sum<'a, I: IntoIterator<Item = &'a Self>>(vectors: I) -> Self {
        let mut total = Self::zero();
        for vector in vectors {
            total.add(vector);
        }
        total
    }

    /// Count of fields that are exactly zero
    #[must_use]
    pub fn zero_field_count(&self) -> usize {
        NutrientField::ALL
            .iter()
            .filter(|&&field| self.get(field) == 0.0)
            .count()
    }

    /// True when every field is zero
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.zero_field_count() == NutrientField::ALL.len()
    }
}
