//! HTTP route layer.
//!
//! Thin dispatch from REST endpoints to [`DashboardStore`] operations. Every
//! response, success or failure, is wrapped in the `{success, data, error}`
//! envelope.
//!
//! # Endpoints
//!
//! - `GET  /api/dashboard`         - dashboard snapshot for `range`/`mode`
//! - `POST /api/dashboard/refresh` - regenerate one dashboard cell
//! - `GET  /api/alerts`            - non-dismissed alerts for `range`/`mode`
//! - `POST /api/alerts/dismiss`    - dismiss alert `{id}`
//! - `GET  /api/quant`             - quant snapshot for `range`/`mode`
//! - `POST /api/quant/refresh`     - regenerate one quant cell
//! - `GET  /api/screener`          - filtered stock list (`peMax`, `yieldMin`, `rsiMin`)
//! - `GET  /api/news`              - market intelligence for `symbol`
//! - `GET  /health`
//!
//! `range` defaults to `6M` and `mode` to `live`.

pub mod dashboard;
pub mod envelope;
pub mod market;
pub mod quant;

pub use envelope::{ApiError, ApiResult, Envelope};

use crate::middleware::request_logging;
use crate::models::{TimeRange, TradingMode};
use crate::store::DashboardStore;
use axum::{
    body::Bytes,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: DashboardStore,
}

impl AppState {
    pub fn new(store: DashboardStore) -> Self {
        Self { store }
    }
}

/// `range`/`mode` selector accepted as query string or JSON body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeModeQuery {
    pub range: Option<String>,
    pub mode: Option<String>,
}

impl RangeModeQuery {
    /// Query values win; missing ones are taken from `body`.
    pub fn or_body(self, body: Option<RangeModeQuery>) -> Self {
        let body = body.unwrap_or_default();
        Self {
            range: self.range.or(body.range),
            mode: self.mode.or(body.mode),
        }
    }

    pub fn resolve(&self) -> Result<(TimeRange, TradingMode), ApiError> {
        let range = match non_empty(&self.range) {
            Some(raw) => raw
                .parse::<TimeRange>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
            None => TimeRange::default(),
        };
        let mode = match non_empty(&self.mode) {
            Some(raw) => raw
                .parse::<TradingMode>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
            None => TradingMode::default(),
        };
        Ok((range, mode))
    }
}

/// Optional `{range, mode}` JSON body. An empty body means none was sent;
/// anything else must parse.
pub fn parse_optional_body(body: &Bytes) -> Result<Option<RangeModeQuery>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> Json<Envelope<HealthResponse>> {
    Envelope::ok(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route("/api/dashboard/refresh", post(dashboard::refresh_dashboard))
        .route("/api/alerts", get(dashboard::get_alerts))
        .route("/api/alerts/dismiss", post(dashboard::dismiss_alert))
        .route("/api/quant", get(quant::get_quant))
        .route("/api/quant/refresh", post(quant::refresh_quant))
        .route("/api/screener", get(market::get_screener))
        .route("/api/news", get(market::get_news))
        .with_state(state)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app() -> Router {
        create_router(AppState::new(DashboardStore::in_memory()))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_range_mode_defaults() {
        let (range, mode) = RangeModeQuery::default().resolve().unwrap();
        assert_eq!(range, TimeRange::SixMonths);
        assert_eq!(mode, TradingMode::Live);

        let q = RangeModeQuery {
            range: Some("".to_string()),
            mode: Some("paper".to_string()),
        };
        assert_eq!(q.resolve().unwrap(), (TimeRange::SixMonths, TradingMode::Paper));
    }

    #[test]
    fn test_query_overrides_body() {
        let query = RangeModeQuery {
            range: Some("1M".to_string()),
            mode: None,
        };
        let body = RangeModeQuery {
            range: Some("1Y".to_string()),
            mode: Some("paper".to_string()),
        };
        let merged = query.or_body(Some(body));
        assert_eq!(merged.resolve().unwrap(), (TimeRange::OneMonth, TradingMode::Paper));
    }

    #[test]
    fn test_optional_body_parsing() {
        assert!(parse_optional_body(&Bytes::new()).unwrap().is_none());
        assert!(parse_optional_body(&Bytes::from_static(b"  \n")).unwrap().is_none());

        let body = parse_optional_body(&Bytes::from_static(br#"{"range":"1Y"}"#))
            .unwrap()
            .unwrap();
        assert_eq!(body.range.as_deref(), Some("1Y"));
        assert!(body.mode.is_none());

        assert!(matches!(
            parse_optional_body(&Bytes::from_static(br#"{"range":"1M","mode":"paper""#)),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, body) = send(&app, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_dashboard_paper_one_month() {
        let app = test_app();
        let (status, body) = send(&app, get_req("/api/dashboard?range=1M&mode=paper")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["range"], "1M");
        assert_eq!(body["data"]["mode"], "paper");
        let rows = body["data"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 5);
        for row in rows {
            assert!(!row["miniSeries"].as_array().unwrap().is_empty());
            assert!(row["class"].is_string());
        }
    }

    #[tokio::test]
    async fn test_dashboard_defaults() {
        let app = test_app();
        let (status, body) = send(&app, get_req("/api/dashboard")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["range"], "6M");
        assert_eq!(body["data"]["mode"], "live");
    }

    #[tokio::test]
    async fn test_invalid_range_is_bad_request() {
        let app = test_app();
        let (status, body) = send(&app, get_req("/api/quant?range=2W")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("2W"));
    }

    #[tokio::test]
    async fn test_dismiss_without_id_is_rejected() {
        let app = test_app();
        let (_, before) = send(&app, get_req("/api/alerts")).await;

        let (status, body) = send(&app, post_json("/api/alerts/dismiss", "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());

        let (status, _) = send(&app, post_json("/api/alerts/dismiss", "not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, after) = send(&app, get_req("/api/alerts")).await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_dismiss_hides_alert() {
        let app = test_app();
        let (status, body) = send(&app, post_json("/api/alerts/dismiss", r#"{"id":"a2"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["dismissed"], "a2");

        let (_, alerts) = send(&app, get_req("/api/alerts?range=1Y&mode=paper")).await;
        let ids: Vec<&str> = alerts["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["a1", "a3", "a4"]);
    }

    #[tokio::test]
    async fn test_refresh_changes_only_requested_cell() {
        let app = test_app();
        let (_, other_before) = send(&app, get_req("/api/dashboard?range=3M&mode=live")).await;
        let (_, before) = send(&app, get_req("/api/dashboard?range=1M&mode=live")).await;

        let (status, refreshed) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/api/dashboard/refresh?range=1M&mode=live")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(refreshed["data"]["range"], "1M");
        assert_ne!(before["data"]["performance"], refreshed["data"]["performance"]);

        let (_, after) = send(&app, get_req("/api/dashboard?range=1M&mode=live")).await;
        assert_eq!(after, refreshed);
        let (_, other_after) = send(&app, get_req("/api/dashboard?range=3M&mode=live")).await;
        assert_eq!(other_before, other_after);
    }

    #[tokio::test]
    async fn test_refresh_rejects_garbled_body() {
        let app = test_app();
        let (_, dashboard_before) = send(&app, get_req("/api/dashboard")).await;
        let (_, quant_before) = send(&app, get_req("/api/quant")).await;

        for body in [r#"{"range":"1M","mode":"paper""#, "garbage"] {
            let (status, resp) = send(&app, post_json("/api/dashboard/refresh", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp["success"], false);

            let (status, _) = send(&app, post_json("/api/quant/refresh", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        let (_, dashboard_after) = send(&app, get_req("/api/dashboard")).await;
        let (_, quant_after) = send(&app, get_req("/api/quant")).await;
        assert_eq!(dashboard_before, dashboard_after);
        assert_eq!(quant_before, quant_after);
    }

    #[tokio::test]
    async fn test_dismiss_without_json_content_type_reports_rejection() {
        let app = test_app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/alerts/dismiss")
            .body(Body::from(r#"{"id":"a1"}"#))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = body["error"].as_str().unwrap();
        assert!(error.contains("Content-Type"));
        assert_ne!(error, "Alert id is required");

        let (status, body) = send(&app, post_json("/api/alerts/dismiss", r#"{"id":"  "}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Alert id is required");

        let (_, alerts) = send(&app, get_req("/api/alerts")).await;
        assert_eq!(alerts["data"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_quant_refresh_with_json_body() {
        let app = test_app();
        let (status, body) = send(
            &app,
            post_json("/api/quant/refresh", r#"{"range":"1Y","mode":"paper"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["range"], "1Y");
        assert_eq!(body["data"]["mode"], "paper");
        assert!(body["data"]["monteCarlo"]["10Y"]["median"].is_number());
    }

    #[tokio::test]
    async fn test_screener_filters() {
        let app = test_app();
        let (status, body) = send(&app, get_req("/api/screener?peMax=20&yieldMin=3")).await;
        assert_eq!(status, StatusCode::OK);
        for stock in body["data"].as_array().unwrap() {
            assert!(stock["peRatio"].as_f64().unwrap() <= 20.0);
            assert!(stock["dividendYield"].as_f64().unwrap() >= 3.0);
        }

        let (status, _) = send(&app, get_req("/api/screener?rsiMin=abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_news_for_symbol() {
        let app = test_app();
        let (status, body) = send(&app, get_req("/api/news?symbol=nvda")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["symbol"], "NVDA");
        assert!(!body["data"]["headlines"].as_array().unwrap().is_empty());

        let (_, default) = send(&app, get_req("/api/news")).await;
        assert_eq!(default["data"]["symbol"], "AAPL");

        let (status, _) = send(&app, get_req("/api/news?symbol=%3Cscript%3E")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
