//! Nutrition data types
//!
//! Field names follow the recognition service's JSON (`totalNutrition`,
//! `addedSugar`).

use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Nutrient amounts for a food or a whole meal
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionFacts {
    /// kcal
    #[serde(default)]
    pub calories: f64,
    /// grams
    #[serde(default)]
    pub carbs: f64,
    /// grams
    #[serde(default)]
    pub sugar: f64,
    /// grams
    #[serde(default)]
    pub added_sugar: f64,
    /// grams
    #[serde(default)]
    pub protein: f64,
    /// grams
    #[serde(default)]
    pub fat: f64,
    /// grams
    #[serde(default)]
    pub fiber: f64,
    /// milligrams
    #[serde(default)]
    pub sodium: f64,
}

impl NutritionFacts {
    /// Sum a set of nutrition facts
    pub fn total<'a>(items: impl IntoIterator<Item = &'a NutritionFacts>) -> NutritionFacts {
        items
            .into_iter()
            .fold(NutritionFacts::default(), |acc, n| acc + *n)
    }

    /// Every field rounded to one decimal place
    pub fn rounded(&self) -> NutritionFacts {
        let r = crate::report::round1;
        NutritionFacts {
            calories: r(self.calories),
            carbs: r(self.carbs),
            sugar: r(self.sugar),
            added_sugar: r(self.added_sugar),
            protein: r(self.protein),
            fat: r(self.fat),
            fiber: r(self.fiber),
            sodium: r(self.sodium),
        }
    }
}

impl Add for NutritionFacts {
    type Output = NutritionFacts;

    fn add(self, rhs: NutritionFacts) -> NutritionFacts {
        NutritionFacts {
            calories: self.calories + rhs.calories,
            carbs: self.carbs + rhs.carbs,
            sugar: self.sugar + rhs.sugar,
            added_sugar: self.added_sugar + rhs.added_sugar,
            protein: self.protein + rhs.protein,
            fat: self.fat + rhs.fat,
            fiber: self.fiber + rhs.fiber,
            sodium: self.sodium + rhs.sodium,
        }
    }
}

/// One recognised food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    /// Free-form portion, e.g. "150g"
    #[serde(default)]
    pub portion: String,
    pub nutrition: NutritionFacts,
}

/// Successful recognition payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionData {
    pub foods: Vec<FoodItem>,
    pub total_nutrition: NutritionFacts,
}

impl RecognitionData {
    /// Totals recomputed from the individual foods
    pub fn computed_total(&self) -> NutritionFacts {
        NutritionFacts::total(self.foods.iter().map(|f| &f.nutrition)).rounded()
    }
}

/// Raw service envelope: `{success, data?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RecognitionData>,
}

impl RecognitionResponse {
    pub fn ok(data: RecognitionData) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            data: None,
        }
    }

    /// Unwrap the envelope into a result
    pub fn into_result(self) -> Result<RecognitionData, super::RecognitionError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(super::RecognitionError::MissingData),
            (false, _) => Err(super::RecognitionError::Unsuccessful),
        }
    }
}
