//! Food recognition capability
//!
//! Recognition is an opaque, slow, fallible external call. The core never
//! retries; callers decide.

use crate::nutrition::types::{FoodItem, NutritionFacts, RecognitionData};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Reference to a captured image (URI or path)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Errors from a recognition call
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// Service answered `success: false`
    #[error("Food recognition was unsuccessful")]
    Unsuccessful,

    /// Service answered `success: true` without a payload
    #[error("Food recognition returned no data")]
    MissingData,

    /// Image reference is empty
    #[error("Invalid image reference: {0:?}")]
    InvalidImage(String),

    /// Call exceeded its time budget
    #[error("Food recognition timed out after {0:?}")]
    Timeout(Duration),

    /// Transport or backend failure
    #[error("Recognition backend error: {0}")]
    Backend(String),
}

/// Something that can turn a food photo into nutrition data
#[async_trait]
pub trait FoodRecognizer: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Recognise the foods in `image`
    async fn recognize(&self, image: &ImageRef) -> Result<RecognitionData, RecognitionError>;
}

/// Run a recognition with an upper time bound
pub async fn recognize_with_timeout(
    recognizer: &dyn FoodRecognizer,
    image: &ImageRef,
    timeout: Duration,
) -> Result<RecognitionData, RecognitionError> {
    tracing::debug!(backend = recognizer.name(), image = image.as_str(), "Recognizing food");

    let result = tokio::time::timeout(timeout, recognizer.recognize(image))
        .await
        .map_err(|_| RecognitionError::Timeout(timeout))?;

    if let Err(ref e) = result {
        tracing::warn!(backend = recognizer.name(), error = %e, "Food recognition failed");
    }
    result
}

/// Stand-in recognizer returning a fixed meal after a delay
#[derive(Debug, Clone)]
pub struct MockFoodRecognizer {
    latency: Duration,
}

impl Default for MockFoodRecognizer {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(2000),
        }
    }
}

impl MockFoodRecognizer {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// The canned meal: rice, stir-fried greens, braised pork.
    ///
    /// Totals are the service's own figures, as a real backend would send
    /// them; they differ slightly from the sum of the foods (carbs 50.2 vs 49.9).
    pub fn sample_meal() -> RecognitionData {
        let foods = vec![
            FoodItem {
                name: "Steamed rice".to_string(),
                portion: "150g".to_string(),
                nutrition: NutritionFacts {
                    calories: 174.0,
                    carbs: 39.0,
                    sugar: 0.4,
                    added_sugar: 0.0,
                    protein: 3.5,
                    fat: 0.3,
                    fiber: 0.4,
                    sodium: 0.0,
                },
            },
            FoodItem {
                name: "Stir-fried greens".to_string(),
                portion: "100g".to_string(),
                nutrition: NutritionFacts {
                    calories: 34.0,
                    carbs: 6.7,
                    sugar: 1.2,
                    added_sugar: 0.0,
                    protein: 2.6,
                    fat: 0.4,
                    fiber: 2.8,
                    sodium: 57.0,
                },
            },
            FoodItem {
                name: "Braised pork".to_string(),
                portion: "50g".to_string(),
                nutrition: NutritionFacts {
                    calories: 135.0,
                    carbs: 4.2,
                    sugar: 1.5,
                    added_sugar: 0.0,
                    protein: 8.3,
                    fat: 10.1,
                    fiber: 0.0,
                    sodium: 43.0,
                },
            },
        ];

        RecognitionData {
            foods,
            total_nutrition: NutritionFacts {
                calories: 343.0,
                carbs: 50.2,
                sugar: 3.1,
                added_sugar: 0.0,
                protein: 14.4,
                fat: 10.8,
                fiber: 3.2,
                sodium: 100.0,
            },
        }
    }
}

#[async_trait]
impl FoodRecognizer for MockFoodRecognizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn recognize(&self, image: &ImageRef) -> Result<RecognitionData, RecognitionError> {
        if image.as_str().trim().is_empty() {
            return Err(RecognitionError::InvalidImage(image.0.clone()));
        }

        tokio::time::sleep(self.latency).await;
        Ok(Self::sample_meal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::RecognitionResponse;

    #[tokio::test]
    async fn test_mock_returns_sample_meal() {
        let recognizer = MockFoodRecognizer::new(Duration::from_millis(1));
        let data = recognizer
            .recognize(&ImageRef::new("file:///tmp/lunch.jpg"))
            .await
            .unwrap();

        assert_eq!(data.foods.len(), 3);
        assert_eq!(data.total_nutrition.calories, 343.0);
        assert_eq!(data.total_nutrition.carbs, 50.2);
        assert_eq!(data.total_nutrition.sodium, 100.0);

        // Reported totals are kept as sent; the derived sum is available separately
        let computed = data.computed_total();
        assert_eq!(computed.calories, 343.0);
        assert_eq!(computed.carbs, 49.9);
        assert_eq!(computed.protein, 14.4);
    }

    #[test]
    fn test_sample_meal_wire_shape() {
        let json = serde_json::to_value(RecognitionResponse::ok(MockFoodRecognizer::sample_meal()))
            .unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["totalNutrition"]["carbs"], 50.2);
        assert_eq!(json["data"]["totalNutrition"]["addedSugar"], 0.0);
        assert_eq!(json["data"]["foods"][1]["portion"], "100g");
    }

    #[tokio::test]
    async fn test_mock_rejects_empty_image() {
        let recognizer = MockFoodRecognizer::new(Duration::ZERO);
        let err = recognizer.recognize(&ImageRef::new("  ")).await.unwrap_err();
        assert!(matches!(err, RecognitionError::InvalidImage(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let recognizer = MockFoodRecognizer::new(Duration::from_millis(500));
        let err = recognize_with_timeout(
            &recognizer,
            &ImageRef::new("photo.jpg"),
            Duration::from_millis(10),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RecognitionError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_within_timeout() {
        let recognizer = MockFoodRecognizer::new(Duration::from_millis(1));
        let data = recognize_with_timeout(
            &recognizer,
            &ImageRef::new("photo.jpg"),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert!(!data.foods.is_empty());
    }
}
