//! Dashboard and quant data model.
//!
//! Everything here is plain data: serde derives for the wire/storage format
//! (camelCase JSON) and `Clone` for value-semantics copies out of the store.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Independent data universe selector.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    #[default]
    Live,
    Paper,
}

impl TradingMode {
    pub const ALL: [TradingMode; 2] = [TradingMode::Live, TradingMode::Paper];

    pub fn as_str(&self) -> &'static str {
        match self {
            TradingMode::Live => "live",
            TradingMode::Paper => "paper",
        }
    }
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(TradingMode::Live),
            "paper" => Ok(TradingMode::Paper),
            other => bail!("unknown mode '{}' (expected live or paper)", other),
        }
    }
}

/// Lookback window for generated series.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TimeRange {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    #[default]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::OneYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::OneMonth => "1M",
            TimeRange::ThreeMonths => "3M",
            TimeRange::SixMonths => "6M",
            TimeRange::OneYear => "1Y",
        }
    }

    /// Number of samples in a series covering this range.
    pub fn points(&self) -> usize {
        match self {
            TimeRange::OneMonth => 30,
            TimeRange::ThreeMonths => 13,
            TimeRange::SixMonths => 26,
            TimeRange::OneYear => 12,
        }
    }

    /// Days between consecutive samples.
    pub fn step_days(&self) -> i64 {
        match self {
            TimeRange::OneMonth => 1,
            TimeRange::ThreeMonths | TimeRange::SixMonths => 7,
            TimeRange::OneYear => 30,
        }
    }

    /// Fraction of a trading year covered by one sample.
    pub fn step_years(&self) -> f64 {
        self.step_days() as f64 / 365.0
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1M" => Ok(TimeRange::OneMonth),
            "3M" => Ok(TimeRange::ThreeMonths),
            "6M" => Ok(TimeRange::SixMonths),
            "1Y" => Ok(TimeRange::OneYear),
            other => bail!("unknown range '{}' (expected 1M, 3M, 6M or 1Y)", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub id: String,
    pub label: String,
    pub value: f64,
    pub delta_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub headline: String,
    pub source: String,
    /// -1.0 (bearish) to 1.0 (bullish).
    pub sentiment: f64,
    pub published_at: DateTime<Utc>,
}

/// Per-asset row of the holdings table.
///
/// Most metric fields are optional because snapshots persisted by older
/// builds may predate them; reads back-fill them from the reference rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRow {
    pub symbol: String,
    pub name: String,
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub asset_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ytd_pct: Option<f64>,
    /// 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mini_series: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news: Option<Vec<NewsItem>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Price,
    Sentiment,
    Risk,
    Rebalance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub message: String,
    pub priority: AlertPriority,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub range: TimeRange,
    pub mode: TradingMode,
    pub updated_at: DateTime<Utc>,
    pub kpis: Vec<Kpi>,
    pub performance: Vec<SeriesPoint>,
    pub cashflow: Vec<SeriesPoint>,
    pub rows: Vec<AssetRow>,
    pub alerts: Vec<Alert>,
}

/// Monte Carlo projection horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "10Y")]
    TenYears,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::OneYear, Horizon::FiveYears, Horizon::TenYears];

    pub fn years(&self) -> u32 {
        match self {
            Horizon::OneYear => 1,
            Horizon::FiveYears => 5,
            Horizon::TenYears => 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorAttribution {
    pub factor: String,
    pub exposure: f64,
    pub contribution_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloPoint {
    pub label: String,
    pub median: f64,
    pub p10: f64,
    pub p90: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloStats {
    pub median: f64,
    pub p10: f64,
    pub p90: f64,
    pub series: Vec<MonteCarloPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRewardPoint {
    pub symbol: String,
    pub volatility_pct: f64,
    pub return_pct: f64,
    pub sharpe: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBeta {
    pub symbol: String,
    pub beta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownData {
    pub series: Vec<SeriesPoint>,
    pub max_drawdown_pct: f64,
    pub recovery_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub symbols: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantSnapshot {
    pub range: TimeRange,
    pub mode: TradingMode,
    pub updated_at: DateTime<Utc>,
    pub portfolio: Vec<SeriesPoint>,
    pub benchmark: Vec<SeriesPoint>,
    pub factors: Vec<FactorAttribution>,
    pub monte_carlo: BTreeMap<Horizon, MonteCarloStats>,
    pub sharpe: Vec<SeriesPoint>,
    pub betas: Vec<AssetBeta>,
    pub risk_reward: Vec<RiskRewardPoint>,
    pub drawdown: DrawdownData,
    pub correlation: CorrelationMatrix,
}

pub type DashboardTable = BTreeMap<TradingMode, BTreeMap<TimeRange, DashboardSnapshot>>;
pub type QuantTable = BTreeMap<TradingMode, BTreeMap<TimeRange, QuantSnapshot>>;

/// The single persisted record behind the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    #[serde(default)]
    pub data_by_range: DashboardTable,
    #[serde(default)]
    pub quant_by_range: QuantTable,
    #[serde(default)]
    pub dismissed_alert_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenerStock {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub price: f64,
    pub pe_ratio: f64,
    pub dividend_yield: f64,
    pub rsi: f64,
    pub market_cap_b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Bearish,
    Neutral,
    Bullish,
}

impl SentimentLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => SentimentLabel::Bearish,
            40..=60 => SentimentLabel::Neutral,
            _ => SentimentLabel::Bullish,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIntelligence {
    pub symbol: String,
    pub sentiment_score: u8,
    pub sentiment_label: SentimentLabel,
    pub summary: String,
    pub headlines: Vec<NewsItem>,
    pub analyst_consensus: String,
    pub price_target: f64,
    pub generated_at: DateTime<Utc>,
}
