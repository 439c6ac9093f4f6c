//! Food Recognition Routes
//!
//! - POST /api/v1/food/recognize - Recognise the foods in an image
//!
//! An unsuccessful recognition is not an HTTP error: the response is
//! `{"success": false}` and the caller decides whether to retry. A successful
//! one also carries an `assessment` of the meal against the diet guide.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{RecognizeRequest, RecognizeResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::nutrition::{
    recognize_with_timeout, ImageRef, MealAssessment, RecognitionError, RecognitionResponse,
};

/// POST /api/v1/food/recognize
pub async fn recognize_food(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecognizeRequest>,
) -> ApiResult<Json<RecognizeResponse>> {
    let image = ImageRef::new(req.image);
    let timeout = state.config.recognition_timeout();

    match recognize_with_timeout(state.recognizer.as_ref(), &image, timeout).await {
        Ok(data) => {
            tracing::info!(
                backend = state.recognizer.name(),
                foods = data.foods.len(),
                calories = data.total_nutrition.calories,
                "Food recognized"
            );
            let assessment = MealAssessment::of(&data, req.gender);
            Ok(Json(RecognizeResponse {
                result: RecognitionResponse::ok(data),
                assessment: Some(assessment),
            }))
        }
        Err(RecognitionError::Unsuccessful) | Err(RecognitionError::MissingData) => {
            Ok(Json(RecognizeResponse {
                result: RecognitionResponse::failed(),
                assessment: None,
            }))
        }
        Err(e) => Err(e.into()),
    }
}
