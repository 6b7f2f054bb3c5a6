//! Stateless market endpoints: screener and per-symbol intelligence.
//! Neither touches the state store.

use super::envelope::{ApiError, ApiResult, Envelope};
use crate::generators::{generate_intelligence, screen, ScreenerFilter};
use crate::models::{MarketIntelligence, ScreenerStock};
use axum::extract::Query;
use serde::Deserialize;

const DEFAULT_SYMBOL: &str = "AAPL";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenerQuery {
    pub pe_max: Option<String>,
    pub yield_min: Option<String>,
    pub rsi_min: Option<String>,
}

fn parse_threshold(name: &str, raw: Option<&str>) -> Result<Option<f64>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| ApiError::BadRequest(format!("{} must be a number, got '{}'", name, raw)))
}

impl ScreenerQuery {
    pub fn to_filter(&self) -> Result<ScreenerFilter, ApiError> {
        Ok(ScreenerFilter {
            pe_max: parse_threshold("peMax", self.pe_max.as_deref())?,
            yield_min: parse_threshold("yieldMin", self.yield_min.as_deref())?,
            rsi_min: parse_threshold("rsiMin", self.rsi_min.as_deref())?,
        })
    }
}

pub async fn get_screener(Query(query): Query<ScreenerQuery>) -> ApiResult<Vec<ScreenerStock>> {
    let filter = query.to_filter()?;
    Ok(Envelope::ok(screen(&filter)))
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub symbol: Option<String>,
}

pub async fn get_news(Query(query): Query<NewsQuery>) -> ApiResult<MarketIntelligence> {
    let symbol = query
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SYMBOL);
    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ApiError::BadRequest(format!("invalid symbol '{}'", symbol)));
    }
    Ok(Envelope::ok(generate_intelligence(symbol)))
}
