//! Report Routes
//!
//! - GET /api/v1/report?window=today|7days|30days - Statistics, chart series and advisory

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Local;
use std::sync::Arc;

use crate::api::dto::ReportParams;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::query::ReportWindow;
use crate::report::Report;

/// GET /api/v1/report
///
/// Window defaults to the last seven days. Chart labels use the server's
/// local time zone. An unreadable store yields a no-data report.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> ApiResult<Json<Report>> {
    let window: ReportWindow = match params.window.as_deref() {
        Some(raw) => raw.parse()?,
        None => ReportWindow::default(),
    };

    let records = state.store.get_all().await;
    let report = Report::generate(&records, window, state.now_ms(), &Local);

    tracing::info!(
        window = %window,
        records = report.record_count,
        advisory = ?report.advisory,
        "Report generated"
    );

    Ok(Json(report))
}
