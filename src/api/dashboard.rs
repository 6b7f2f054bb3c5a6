//! Dashboard and alert endpoints.

use super::envelope::{ApiError, ApiResult, Envelope};
use super::{parse_optional_body, AppState, RangeModeQuery};
use crate::models::{Alert, DashboardSnapshot};
use axum::body::Bytes;
use axum::extract::{rejection::JsonRejection, Json, Query, State};
use serde::{Deserialize, Serialize};
use tracing::info;

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<RangeModeQuery>,
) -> ApiResult<DashboardSnapshot> {
    let (range, mode) = query.resolve()?;
    state.store.ensure_seed().await?;
    let snapshot = state.store.get_range(range, mode).await?;
    Ok(Envelope::ok(snapshot))
}

pub async fn refresh_dashboard(
    State(state): State<AppState>,
    Query(query): Query<RangeModeQuery>,
    body: Bytes,
) -> ApiResult<DashboardSnapshot> {
    let (range, mode) = query.or_body(parse_optional_body(&body)?).resolve()?;
    state.store.ensure_seed().await?;
    let snapshot = state.store.refresh_range(range, mode).await?;
    info!(%mode, %range, "🔄 Dashboard refreshed");
    Ok(Envelope::ok(snapshot))
}

pub async fn get_alerts(
    State(state): State<AppState>,
    Query(query): Query<RangeModeQuery>,
) -> ApiResult<Vec<Alert>> {
    let (range, mode) = query.resolve()?;
    state.store.ensure_seed().await?;
    let snapshot = state.store.get_range(range, mode).await?;
    Ok(Envelope::ok(snapshot.alerts))
}

#[derive(Debug, Deserialize)]
pub struct DismissRequest {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DismissResponse {
    pub dismissed: String,
}

pub async fn dismiss_alert(
    State(state): State<AppState>,
    body: Result<Json<DismissRequest>, JsonRejection>,
) -> ApiResult<DismissResponse> {
    let Json(req) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let id = req
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Alert id is required".to_string()))?;

    state.store.ensure_seed().await?;
    state.store.dismiss_alert(&id).await?;
    info!(alert_id = %id, "🔕 Alert dismissed");
    Ok(Envelope::ok(DismissResponse { dismissed: id }))
}
