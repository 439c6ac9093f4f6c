//! Nutrition Recognition
//!
//! The food-photo recognition capability, the nutrition totals it yields and
//! the diet guide used to judge a meal. Only a mock backend ships; a real
//! service plugs in behind [`FoodRecognizer`].

mod guide;
mod recognizer;
mod types;

pub use guide::{
    daily_percentage, gi_level, glycemic_index, nutrient_status, Bound, DailyPercentage, FoodGi,
    Gender, GiLevel, MealAssessment, NutrientStatus, DAILY_CALORIES, DEFAULT_GI, GI_LOW_MAX,
    GI_MEDIUM_MAX, MIN_MEAL_FIBER, PER_MEAL_CARBS,
};
pub use recognizer::{
    recognize_with_timeout, FoodRecognizer, ImageRef, MockFoodRecognizer, RecognitionError,
};
pub use types::{FoodItem, NutritionFacts, RecognitionData, RecognitionResponse};
