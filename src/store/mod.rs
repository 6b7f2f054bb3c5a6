//! Dashboard/quant state store.
//!
//! Owns the single persisted [`StoreState`] record (key `"main"`). Reads hand
//! back independent copies with back-fill and alert filtering applied;
//! refreshes and dismissals are read-modify-write over the whole record.
//!
//! Single writer is assumed. Two concurrent writers on the same key can lose
//! an update (last write wins); a later refresh repairs it.

pub mod backfill;
pub mod kv;
pub mod sqlite;

pub use kv::{KvStore, MemoryKv};
pub use sqlite::SqliteKv;

use crate::generators::{generate_dashboard, generate_quant};
use crate::models::{DashboardSnapshot, QuantSnapshot, StoreState, TimeRange, TradingMode};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Key of the one record per deployment.
pub const STATE_KEY: &str = "main";

/// Fully populated state: every mode x range for both tables, no dismissals.
pub fn initial_state() -> Result<StoreState> {
    let mut state = StoreState::default();
    for mode in TradingMode::ALL {
        let dashboards = state.data_by_range.entry(mode).or_default();
        for range in TimeRange::ALL {
            dashboards.insert(range, generate_dashboard(range, mode)?);
        }
        let quants = state.quant_by_range.entry(mode).or_default();
        for range in TimeRange::ALL {
            quants.insert(range, generate_quant(range, mode)?);
        }
    }
    Ok(state)
}

#[derive(Clone)]
pub struct DashboardStore {
    kv: Arc<dyn KvStore>,
}

impl DashboardStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKv::new()))
    }

    /// Create the record if it does not exist yet. Idempotent.
    pub async fn ensure_seed(&self) -> Result<()> {
        if self.kv.get(STATE_KEY).await?.is_some() {
            return Ok(());
        }
        let state = initial_state()?;
        self.kv.put(STATE_KEY, &state).await?;
        info!(
            key = STATE_KEY,
            modes = state.data_by_range.len(),
            ranges = TimeRange::ALL.len(),
            "🌱 Seeded dashboard state"
        );
        Ok(())
    }

    /// Current record as an owned copy, seeding on first access.
    pub async fn state(&self) -> Result<StoreState> {
        if let Some(state) = self.kv.get(STATE_KEY).await? {
            return Ok(state);
        }
        self.ensure_seed().await?;
        self.kv
            .get(STATE_KEY)
            .await?
            .ok_or_else(|| anyhow!("state record '{}' missing after seeding", STATE_KEY))
    }

    pub async fn get_range(
        &self,
        range: TimeRange,
        mode: TradingMode,
    ) -> Result<DashboardSnapshot> {
        let mut state = self.state().await?;
        let cell = state
            .data_by_range
            .get_mut(&mode)
            .and_then(|by_range| by_range.remove(&range));
        let mut snapshot = match cell {
            Some(snapshot) => snapshot,
            None => {
                debug!(%mode, %range, "dashboard cell missing, generating on the fly");
                generate_dashboard(range, mode)?
            }
        };

        backfill::backfill_rows(&mut snapshot.rows);
        let dismissed = &state.dismissed_alert_ids;
        snapshot.alerts.retain(|alert| !dismissed.contains(&alert.id));
        Ok(snapshot)
    }

    pub async fn get_quant(&self, range: TimeRange, mode: TradingMode) -> Result<QuantSnapshot> {
        let mut state = self.state().await?;
        let cell = state
            .quant_by_range
            .get_mut(&mode)
            .and_then(|by_range| by_range.remove(&range));
        match cell {
            Some(snapshot) => Ok(snapshot),
            None => {
                debug!(%mode, %range, "quant cell missing, generating on the fly");
                generate_quant(range, mode)
            }
        }
    }

    /// Regenerate one dashboard cell and return it as read back from storage.
    pub async fn refresh_range(
        &self,
        range: TimeRange,
        mode: TradingMode,
    ) -> Result<DashboardSnapshot> {
        let mut state = self.state().await?;
        let fresh = generate_dashboard(range, mode)?;
        state
            .data_by_range
            .entry(mode)
            .or_default()
            .insert(range, fresh);
        self.kv.put(STATE_KEY, &state).await?;
        debug!(%mode, %range, "dashboard cell refreshed");
        self.get_range(range, mode).await
    }

    /// Regenerate one quant cell and return it as read back from storage.
    pub async fn refresh_quant(
        &self,
        range: TimeRange,
        mode: TradingMode,
    ) -> Result<QuantSnapshot> {
        let mut state = self.state().await?;
        let fresh = generate_quant(range, mode)?;
        state
            .quant_by_range
            .entry(mode)
            .or_default()
            .insert(range, fresh);
        self.kv.put(STATE_KEY, &state).await?;
        debug!(%mode, %range, "quant cell refreshed");
        self.get_quant(range, mode).await
    }

    /// Add `alert_id` to the dismissed set; no write if already present.
    pub async fn dismiss_alert(&self, alert_id: &str) -> Result<()> {
        let mut state = self.state().await?;
        if state.dismissed_alert_ids.iter().any(|id| id == alert_id) {
            debug!(alert_id, "alert already dismissed");
            return Ok(());
        }
        state.dismissed_alert_ids.push(alert_id.to_string());
        self.kv.put(STATE_KEY, &state).await?;
        debug!(alert_id, "alert dismissed");
        Ok(())
    }
}
