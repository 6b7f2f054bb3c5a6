//! Quant analytics endpoints.

use super::envelope::{ApiResult, Envelope};
use super::{parse_optional_body, AppState, RangeModeQuery};
use crate::models::QuantSnapshot;
use axum::body::Bytes;
use axum::extract::{Query, State};
use tracing::info;

pub async fn get_quant(
    State(state): State<AppState>,
    Query(query): Query<RangeModeQuery>,
) -> ApiResult<QuantSnapshot> {
    let (range, mode) = query.resolve()?;
    state.store.ensure_seed().await?;
    let snapshot = state.store.get_quant(range, mode).await?;
    Ok(Envelope::ok(snapshot))
}

pub async fn refresh_quant(
    State(state): State<AppState>,
    Query(query): Query<RangeModeQuery>,
    body: Bytes,
) -> ApiResult<QuantSnapshot> {
    let (range, mode) = query.or_body(parse_optional_body(&body)?).resolve()?;
    state.store.ensure_seed().await?;
    let snapshot = state.store.refresh_quant(range, mode).await?;
    info!(%mode, %range, "🔄 Quant refreshed");
    Ok(Envelope::ok(snapshot))
}
