//! Diabetes diet guide
//!
//! Static rule tables used to judge a recognised meal:
//! - Daily carbohydrate and sugar budgets per gender, 2000 kcal per day
//! - Glycaemic index (GI) per food, banded into low / medium / high
//! - Nutrient status against a target, with a ±20% normal band
//!
//! Budgets follow the Chinese Diabetes Society recommendations.

use crate::nutrition::types::{NutritionFacts, RecognitionData};
use serde::{Deserialize, Serialize};

/// Recommended carbohydrates per meal (g)
pub const PER_MEAL_CARBS: f64 = 50.0;
/// Assumed daily energy intake (kcal)
pub const DAILY_CALORIES: f64 = 2000.0;
/// Fiber a meal should reach at least (g)
pub const MIN_MEAL_FIBER: f64 = 3.0;
/// Highest GI still counted as low
pub const GI_LOW_MAX: u32 = 55;
/// Highest GI still counted as medium
pub const GI_MEDIUM_MAX: u32 = 70;
/// GI assumed for foods missing from the table
pub const DEFAULT_GI: u32 = 50;

/// GI by food name (lowercase)
const GI_TABLE: &[(&str, u32)] = &[
    ("rice", 83),
    ("steamed rice", 83),
    ("noodles", 81),
    ("steamed bun", 88),
    ("whole wheat bread", 50),
    ("apple", 36),
    ("banana", 52),
    ("potato", 62),
    ("sweet potato", 76),
    ("corn", 55),
    ("greens", 15),
    ("cucumber", 15),
    ("tomato", 15),
];

/// Whose daily budget to measure against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    /// Daily carbohydrate budget (g)
    pub fn daily_carbs(&self) -> f64 {
        match self {
            Gender::Male => 250.0,
            Gender::Female => 200.0,
        }
    }

    /// Daily sugar budget (g)
    pub fn daily_sugar(&self) -> f64 {
        match self {
            Gender::Male => 30.0,
            Gender::Female => 25.0,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

/// Glycaemic index band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiLevel {
    /// GI 55 or below
    Low,
    /// GI 56 to 70
    Medium,
    /// GI above 70
    High,
}

impl GiLevel {
    pub fn from_index(gi: u32) -> Self {
        if gi <= GI_LOW_MAX {
            GiLevel::Low
        } else if gi <= GI_MEDIUM_MAX {
            GiLevel::Medium
        } else {
            GiLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GiLevel::Low => "Low GI",
            GiLevel::Medium => "Medium GI",
            GiLevel::High => "High GI",
        }
    }
}

/// GI of a food by exact (case-insensitive) name, `DEFAULT_GI` if unknown
pub fn glycemic_index(food: &str) -> u32 {
    let name = food.trim().to_lowercase();
    GI_TABLE
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, gi)| *gi)
        .unwrap_or(DEFAULT_GI)
}

/// GI band of a food
pub fn gi_level(food: &str) -> GiLevel {
    GiLevel::from_index(glycemic_index(food))
}

/// Share of the daily budget a meal uses, in percent (unrounded)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyPercentage {
    pub carbs: f64,
    pub sugar: f64,
    pub calories: f64,
}

pub fn daily_percentage(nutrition: &NutritionFacts, gender: Gender) -> DailyPercentage {
    DailyPercentage {
        carbs: nutrition.carbs / gender.daily_carbs() * 100.0,
        sugar: nutrition.sugar / gender.daily_sugar() * 100.0,
        calories: nutrition.calories / DAILY_CALORIES * 100.0,
    }
}

/// Which side of a target matters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// A limit: too much and too little are both flagged
    Upper,
    /// A minimum: only too little is flagged
    Lower,
}

/// A nutrient amount relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientStatus {
    Low,
    Normal,
    High,
}

impl NutrientStatus {
    pub fn label(&self) -> &'static str {
        match self {
            NutrientStatus::Low => "Low",
            NutrientStatus::Normal => "Normal",
            NutrientStatus::High => "High",
        }
    }
}

/// Above 120% of `threshold` is high and below 80% is low. Minimums are never high.
pub fn nutrient_status(value: f64, threshold: f64, bound: Bound) -> NutrientStatus {
    match bound {
        Bound::Upper if value > threshold * 1.2 => NutrientStatus::High,
        _ if value < threshold * 0.8 => NutrientStatus::Low,
        _ => NutrientStatus::Normal,
    }
}

/// GI of one recognised food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodGi {
    pub name: String,
    pub gi: u32,
    pub level: GiLevel,
}

/// A recognised meal judged against the guide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealAssessment {
    pub gender: Gender,
    pub foods: Vec<FoodGi>,
    pub daily_percentage: DailyPercentage,
    /// Meal carbs against `PER_MEAL_CARBS`
    pub carbs: NutrientStatus,
    /// Meal fiber against `MIN_MEAL_FIBER`
    pub fiber: NutrientStatus,
}

impl MealAssessment {
    /// Judge the reported meal totals and each food's GI
    pub fn of(data: &RecognitionData, gender: Gender) -> Self {
        let total = &data.total_nutrition;

        let foods = data
            .foods
            .iter()
            .map(|food| {
                let gi = glycemic_index(&food.name);
                FoodGi {
                    name: food.name.clone(),
                    gi,
                    level: GiLevel::from_index(gi),
                }
            })
            .collect();

        Self {
            gender,
            foods,
            daily_percentage: daily_percentage(total, gender),
            carbs: nutrient_status(total.carbs, PER_MEAL_CARBS, Bound::Upper),
            fiber: nutrient_status(total.fiber, MIN_MEAL_FIBER, Bound::Lower),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::MockFoodRecognizer;

    #[test]
    fn test_gi_thresholds() {
        assert_eq!(GiLevel::from_index(15), GiLevel::Low);
        assert_eq!(GiLevel::from_index(55), GiLevel::Low);
        assert_eq!(GiLevel::from_index(56), GiLevel::Medium);
        assert_eq!(GiLevel::from_index(70), GiLevel::Medium);
        assert_eq!(GiLevel::from_index(71), GiLevel::High);
    }

    #[test]
    fn test_gi_lookup() {
        assert_eq!(glycemic_index("Steamed rice"), 83);
        assert_eq!(gi_level(" Potato "), GiLevel::Medium);
        assert_eq!(gi_level("apple"), GiLevel::Low);
        assert_eq!(gi_level("sweet potato"), GiLevel::High);

        // Unknown foods fall back to the default, which is low
        assert_eq!(glycemic_index("Braised pork"), DEFAULT_GI);
        assert_eq!(gi_level("Braised pork"), GiLevel::Low);
    }

    #[test]
    fn test_daily_percentage_by_gender() {
        let meal = NutritionFacts {
            calories: 500.0,
            carbs: 50.0,
            sugar: 5.0,
            ..Default::default()
        };

        let male = daily_percentage(&meal, Gender::Male);
        assert_eq!(male.carbs, 20.0);
        assert!((male.sugar - 16.666_666).abs() < 1e-4);
        assert_eq!(male.calories, 25.0);

        let female = daily_percentage(&meal, Gender::Female);
        assert_eq!(female.carbs, 25.0);
        assert_eq!(female.sugar, 20.0);
        assert_eq!(female.calories, 25.0);
    }

    #[test]
    fn test_nutrient_status_bands() {
        assert_eq!(nutrient_status(61.0, 50.0, Bound::Upper), NutrientStatus::High);
        assert_eq!(nutrient_status(60.0, 50.0, Bound::Upper), NutrientStatus::Normal);
        assert_eq!(nutrient_status(40.0, 50.0, Bound::Upper), NutrientStatus::Normal);
        assert_eq!(nutrient_status(39.0, 50.0, Bound::Upper), NutrientStatus::Low);

        assert_eq!(nutrient_status(100.0, 3.0, Bound::Lower), NutrientStatus::Normal);
        assert_eq!(nutrient_status(2.0, 3.0, Bound::Lower), NutrientStatus::Low);
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("m".parse::<Gender>().unwrap(), Gender::Male);
        assert!("other".parse::<Gender>().is_err());
        assert_eq!(Gender::default(), Gender::Male);
    }

    #[test]
    fn test_assess_sample_meal() {
        let meal = MockFoodRecognizer::sample_meal();
        let assessment = MealAssessment::of(&meal, Gender::Female);

        let levels: Vec<GiLevel> = assessment.foods.iter().map(|f| f.level).collect();
        assert_eq!(levels, vec![GiLevel::High, GiLevel::Low, GiLevel::Low]);
        assert_eq!(assessment.carbs, NutrientStatus::Normal);
        assert_eq!(assessment.fiber, NutrientStatus::Normal);
        assert!((assessment.daily_percentage.carbs - 25.1).abs() < 1e-9);

        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(json["gender"], "female");
        assert_eq!(json["foods"][0]["level"], "high");
    }
}
