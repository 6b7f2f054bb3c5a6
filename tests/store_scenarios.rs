//! Integration tests for the dashboard state store.
//!
//! These run the store against both the in-memory and the SQLite backend and
//! check the seed/read/refresh/dismiss behaviour end to end.

use std::sync::Arc;

use prismfin_backend::generators::{generate_dashboard, generate_quant};
use prismfin_backend::models::{TimeRange, TradingMode};
use prismfin_backend::store::{DashboardStore, KvStore, MemoryKv, SqliteKv, STATE_KEY};

fn sqlite_store(path: &std::path::Path) -> (DashboardStore, Arc<SqliteKv>) {
    let kv = Arc::new(SqliteKv::new(path).expect("Failed to open state database"));
    (DashboardStore::new(kv.clone()), kv)
}

#[tokio::test]
async fn seed_survives_restart_without_reseeding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prismfin_state.db");

    let (store, kv) = sqlite_store(&path);
    store.ensure_seed().await.unwrap();
    store.dismiss_alert("a3").await.unwrap();
    let before = serde_json::to_string(&kv.get(STATE_KEY).await.unwrap().unwrap()).unwrap();

    // Reopen the same file: the record exists, so seeding must be a no-op.
    let (reopened, kv2) = sqlite_store(&path);
    reopened.ensure_seed().await.unwrap();
    let after = serde_json::to_string(&kv2.get(STATE_KEY).await.unwrap().unwrap()).unwrap();
    assert_eq!(before, after);

    let snap = reopened
        .get_range(TimeRange::SixMonths, TradingMode::Live)
        .await
        .unwrap();
    assert!(snap.alerts.iter().all(|a| a.id != "a3"));
}

#[tokio::test]
async fn sqlite_backend_refresh_keeps_other_cells() {
    let dir = tempfile::tempdir().unwrap();
    let (store, kv) = sqlite_store(&dir.path().join("state.db"));
    store.ensure_seed().await.unwrap();

    let before = kv.get(STATE_KEY).await.unwrap().unwrap();
    let refreshed = store
        .refresh_quant(TimeRange::ThreeMonths, TradingMode::Live)
        .await
        .unwrap();
    let after = kv.get(STATE_KEY).await.unwrap().unwrap();

    assert_eq!(refreshed.range, TimeRange::ThreeMonths);
    assert_eq!(
        serde_json::to_string(&before.data_by_range).unwrap(),
        serde_json::to_string(&after.data_by_range).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&before.quant_by_range[&TradingMode::Paper]).unwrap(),
        serde_json::to_string(&after.quant_by_range[&TradingMode::Paper]).unwrap()
    );
    let live_after = &after.quant_by_range[&TradingMode::Live];
    let live_before = &before.quant_by_range[&TradingMode::Live];
    for range in [TimeRange::OneMonth, TimeRange::SixMonths, TimeRange::OneYear] {
        assert_eq!(
            serde_json::to_string(&live_before[&range]).unwrap(),
            serde_json::to_string(&live_after[&range]).unwrap()
        );
    }
    assert_ne!(
        serde_json::to_string(&live_before[&TimeRange::ThreeMonths]).unwrap(),
        serde_json::to_string(&live_after[&TimeRange::ThreeMonths]).unwrap()
    );
}

#[tokio::test]
async fn legacy_rows_are_back_filled_on_every_read() {
    let kv = Arc::new(MemoryKv::new());
    let store = DashboardStore::new(kv.clone());
    store.ensure_seed().await.unwrap();

    // Simulate a record written before rows carried metrics.
    let mut state = kv.get(STATE_KEY).await.unwrap().unwrap();
    let cell = state
        .data_by_range
        .get_mut(&TradingMode::Paper)
        .and_then(|m| m.get_mut(&TimeRange::OneMonth))
        .unwrap();
    for row in cell.rows.iter_mut() {
        row.sentiment = None;
        row.mini_series = None;
        row.asset_class = None;
        row.news = Some(Vec::new());
    }
    kv.put(STATE_KEY, &state).await.unwrap();

    let first = store
        .get_range(TimeRange::OneMonth, TradingMode::Paper)
        .await
        .unwrap();
    let second = store
        .get_range(TimeRange::OneMonth, TradingMode::Paper)
        .await
        .unwrap();
    assert_eq!(first, second);

    let aapl = first.rows.iter().find(|r| r.symbol == "AAPL").unwrap();
    assert_eq!(aapl.sentiment, Some(72));
    for row in &first.rows {
        assert!(row.mini_series.as_ref().is_some_and(|s| !s.is_empty()));
        assert!(row.asset_class.is_some());
        assert!(row.news.as_ref().is_some_and(|n| !n.is_empty()));
    }

    let stored = kv.get(STATE_KEY).await.unwrap().unwrap();
    let stored_rows = &stored.data_by_range[&TradingMode::Paper][&TimeRange::OneMonth].rows;
    assert!(stored_rows.iter().all(|r| r.sentiment.is_none()));
}

#[tokio::test]
async fn live_and_paper_universes_are_independent() {
    for range in TimeRange::ALL {
        let live = generate_dashboard(range, TradingMode::Live).unwrap();
        let paper = generate_dashboard(range, TradingMode::Paper).unwrap();
        assert_ne!(live.performance, paper.performance);

        let live_q = generate_quant(range, TradingMode::Live).unwrap();
        let paper_q = generate_quant(range, TradingMode::Paper).unwrap();
        assert_ne!(live_q.portfolio, paper_q.portfolio);
    }

    let store = DashboardStore::in_memory();
    store.ensure_seed().await.unwrap();
    let live = store
        .get_range(TimeRange::OneYear, TradingMode::Live)
        .await
        .unwrap();
    let paper = store
        .get_range(TimeRange::OneYear, TradingMode::Paper)
        .await
        .unwrap();
    assert_eq!(live.mode, TradingMode::Live);
    assert_eq!(paper.mode, TradingMode::Paper);
    assert_ne!(live.performance, paper.performance);
}

#[tokio::test]
async fn dismissals_accumulate_as_a_set() {
    let kv = Arc::new(MemoryKv::new());
    let store = DashboardStore::new(kv.clone());
    store.ensure_seed().await.unwrap();

    for id in ["a1", "a4", "a1", "custom-7", "a4"] {
        store.dismiss_alert(id).await.unwrap();
    }
    let state = kv.get(STATE_KEY).await.unwrap().unwrap();
    assert_eq!(state.dismissed_alert_ids, vec!["a1", "a4", "custom-7"]);

    let snap = store
        .get_range(TimeRange::ThreeMonths, TradingMode::Paper)
        .await
        .unwrap();
    let ids: Vec<_> = snap.alerts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a2", "a3"]);
}
