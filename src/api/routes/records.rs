//! Record Routes
//!
//! CRUD and window endpoints for glucose records.
//!
//! - GET /api/v1/records - All records, newest first
//! - GET /api/v1/records/today - Records since local midnight
//! - GET /api/v1/records/last7days - Records from the last seven days
//! - GET /api/v1/records/range?start=&end= - Records in an inclusive range
//! - GET /api/v1/records/new-id - Fresh record id
//! - POST /api/v1/records - Insert or overwrite a record
//! - PUT /api/v1/records/:id - Edit value, type or notes
//! - DELETE /api/v1/records/:id - Delete a record

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{
    CreateRecordRequest, DeleteRecordResponse, IdResponse, RangeParams, RecordDto,
    RecordListResponse, SaveRecordResponse, UpdateRecordRequest,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::query::QueryError;
use crate::storage::{GlucoseRecord, SaveOutcome};

/// GET /api/v1/records
///
/// Read failures are logged by the store and answered with an empty list.
pub async fn list_records(State(state): State<Arc<AppState>>) -> Json<RecordListResponse> {
    Json(RecordListResponse::new(state.store.get_all().await))
}

/// GET /api/v1/records/today
///
/// Uses the server's local time zone.
pub async fn today_records(State(state): State<Arc<AppState>>) -> Json<RecordListResponse> {
    Json(RecordListResponse::new(state.store.get_today_records().await))
}

/// GET /api/v1/records/last7days
pub async fn last_7_days_records(
    State(state): State<Arc<AppState>>,
) -> Json<RecordListResponse> {
    Json(RecordListResponse::new(
        state.store.get_last_7_days_records().await,
    ))
}

/// GET /api/v1/records/range?start=&end=
///
/// Both bounds are inclusive. An inverted range is rejected here even though
/// the filter itself would just return nothing.
pub async fn range_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> ApiResult<Json<RecordListResponse>> {
    if params.start > params.end {
        return Err(QueryError::InvalidTimeRange {
            start: params.start,
            end: params.end,
        }
        .into());
    }

    let records = state
        .store
        .get_records_by_date_range(params.start, params.end)
        .await;
    Ok(Json(RecordListResponse::new(records)))
}

/// GET /api/v1/records/new-id
pub async fn new_record_id(State(state): State<Arc<AppState>>) -> Json<IdResponse> {
    Json(IdResponse {
        id: state.store.generate_id(),
    })
}

/// POST /api/v1/records
///
/// Missing id and timestamp are filled in by the server. Saving an existing
/// id replaces that record.
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRecordRequest>,
) -> ApiResult<(StatusCode, Json<SaveRecordResponse>)> {
    let id = match req.id {
        Some(id) if id.trim().is_empty() => {
            return Err(ApiError::Validation("Record id cannot be empty".to_string()))
        }
        Some(id) => id,
        None => state.store.generate_id(),
    };
    let timestamp = req.timestamp.unwrap_or_else(|| state.now_ms());

    let record = GlucoseRecord::with_timestamp(id, req.value, req.kind, timestamp).notes(req.notes);

    let outcome = state.store.try_save(record.clone()).await?;

    tracing::info!(record_id = %record.id, value = record.value, outcome = ?outcome, "Record saved");

    let (status, label) = match outcome {
        SaveOutcome::Inserted => (StatusCode::CREATED, "inserted"),
        SaveOutcome::Updated => (StatusCode::OK, "updated"),
    };

    Ok((
        status,
        Json(SaveRecordResponse {
            status: label.to_string(),
            record: RecordDto::from(record),
        }),
    ))
}

/// PUT /api/v1/records/:id
///
/// Edits value, type and notes; the stored timestamp is kept.
pub async fn update_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRecordRequest>,
) -> ApiResult<Json<RecordDto>> {
    let updated = state
        .store
        .try_update(&id, |record| {
            if let Some(value) = req.value {
                record.value = value;
            }
            if let Some(kind) = req.kind {
                record.kind = kind;
            }
            if let Some(notes) = req.notes {
                record.notes = notes;
            }
        })
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Record with id {} not found", id)))?;

    tracing::info!(record_id = %id, value = updated.value, "Record updated");

    Ok(Json(RecordDto::from(updated)))
}

/// DELETE /api/v1/records/:id
///
/// Deleting an unknown id succeeds with `removed: false`.
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteRecordResponse>> {
    let removed = state.store.try_delete_by_id(&id).await?;

    tracing::info!(record_id = %id, removed, "Record delete requested");

    Ok(Json(DeleteRecordResponse { id, removed }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::ApiConfig;
    use crate::storage::{MealTiming, RecordStore};

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            Arc::new(RecordStore::in_memory()),
            ApiConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let state = test_state();

        let req = CreateRecordRequest {
            id: None,
            value: 6.2,
            kind: MealTiming::AfterMeal,
            timestamp: Some(1_000),
            notes: "lunch".to_string(),
        };
        let (status, Json(resp)) = create_record(State(state.clone()), Json(req))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(resp.status, "inserted");

        let Json(list) = list_records(State(state)).await;
        assert_eq!(list.total, 1);
        assert_eq!(list.records[0].record.notes, "lunch");
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let state = test_state();
        let req = UpdateRecordRequest {
            value: Some(5.0),
            kind: None,
            notes: None,
        };

        let err = update_record(State(state), Path("missing".to_string()), Json(req))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_inverted_range_rejected() {
        let state = test_state();
        let params = RangeParams { start: 10, end: 5 };

        let err = range_records(State(state), Query(params)).await.unwrap_err();
        assert!(matches!(err, ApiError::Query(QueryError::InvalidTimeRange { .. })));
    }
}
