//! Canonical reference universe.
//!
//! Five fixed assets. Generated rows are perturbed around these values and
//! reads back-fill missing row fields from them.

use crate::models::{AssetRow, NewsItem};
use chrono::{DateTime, Utc};

pub struct ReferenceAsset {
    pub symbol: &'static str,
    pub name: &'static str,
    pub asset_class: &'static str,
    pub price: f64,
    pub change_pct: f64,
    pub ytd_pct: f64,
    pub sentiment: u8,
    pub pe_ratio: Option<f64>,
    pub rsi: f64,
    pub tags: &'static [&'static str],
    /// Portfolio weight, sums to 1.0 across the universe.
    pub weight: f64,
    pub beta: f64,
    /// Annualized volatility in percent.
    pub vol_pct: f64,
    /// Loading on the common market factor, used for correlations.
    pub market_loading: f64,
    pub headlines: &'static [(&'static str, &'static str, f64)],
}

pub const REFERENCE_ASSETS: [ReferenceAsset; 5] = [
    ReferenceAsset {
        symbol: "AAPL",
        name: "Apple Inc.",
        asset_class: "Equity",
        price: 189.84,
        change_pct: 1.24,
        ytd_pct: 12.6,
        sentiment: 72,
        pe_ratio: Some(29.4),
        rsi: 58.2,
        tags: &["Tech", "Mega Cap"],
        weight: 0.28,
        beta: 1.12,
        vol_pct: 24.0,
        market_loading: 0.82,
        headlines: &[
            ("Apple expands on-device AI features across product line", "Reuters", 0.6),
            ("Services revenue hits record as installed base grows", "Bloomberg", 0.5),
        ],
    },
    ReferenceAsset {
        symbol: "MSFT",
        name: "Microsoft Corp.",
        asset_class: "Equity",
        price: 415.50,
        change_pct: 0.82,
        ytd_pct: 18.3,
        sentiment: 78,
        pe_ratio: Some(35.1),
        rsi: 61.7,
        tags: &["Tech", "Cloud"],
        weight: 0.26,
        beta: 0.94,
        vol_pct: 21.0,
        market_loading: 0.85,
        headlines: &[
            ("Azure growth beats estimates on AI workloads", "CNBC", 0.7),
            ("Microsoft raises dividend for another year", "MarketWatch", 0.4),
        ],
    },
    ReferenceAsset {
        symbol: "NVDA",
        name: "NVIDIA Corp.",
        asset_class: "Equity",
        price: 875.28,
        change_pct: 3.15,
        ytd_pct: 76.8,
        sentiment: 84,
        pe_ratio: Some(68.9),
        rsi: 71.4,
        tags: &["Semis", "AI", "High Momentum"],
        weight: 0.18,
        beta: 1.68,
        vol_pct: 48.0,
        market_loading: 0.74,
        headlines: &[
            ("Data center demand keeps GPU supply tight", "Financial Times", 0.8),
            ("Analysts flag valuation risk after parabolic run", "Barron's", -0.3),
        ],
    },
    ReferenceAsset {
        symbol: "TSLA",
        name: "Tesla Inc.",
        asset_class: "Equity",
        price: 177.46,
        change_pct: -2.11,
        ytd_pct: -28.4,
        sentiment: 41,
        pe_ratio: Some(44.2),
        rsi: 38.9,
        tags: &["Auto", "EV", "High Volatility"],
        weight: 0.14,
        beta: 2.05,
        vol_pct: 56.0,
        market_loading: 0.61,
        headlines: &[
            ("Deliveries miss consensus amid price cuts", "Reuters", -0.6),
            ("Robotaxi timeline draws investor skepticism", "WSJ", -0.2),
        ],
    },
    ReferenceAsset {
        symbol: "BTC",
        name: "Bitcoin",
        asset_class: "Crypto",
        price: 64_250.0,
        change_pct: 2.48,
        ytd_pct: 51.9,
        sentiment: 66,
        pe_ratio: None,
        rsi: 63.5,
        tags: &["Crypto", "Store of Value"],
        weight: 0.14,
        beta: 1.45,
        vol_pct: 62.0,
        market_loading: 0.38,
        headlines: &[
            ("Spot ETF inflows extend weekly streak", "CoinDesk", 0.6),
            ("Halving cuts miner issuance", "The Block", 0.3),
        ],
    },
];

/// Fixed publication anchor so reference news is identical across reads.
const REFERENCE_NEWS_EPOCH: i64 = 1_717_200_000;

pub fn reference_asset(symbol: &str) -> Option<&'static ReferenceAsset> {
    REFERENCE_ASSETS
        .iter()
        .find(|a| a.symbol.eq_ignore_ascii_case(symbol))
}

impl ReferenceAsset {
    pub fn news(&self) -> Vec<NewsItem> {
        self.headlines
            .iter()
            .enumerate()
            .map(|(i, (headline, source, sentiment))| NewsItem {
                headline: headline.to_string(),
                source: source.to_string(),
                sentiment: *sentiment,
                published_at: DateTime::<Utc>::from_timestamp(
                    REFERENCE_NEWS_EPOCH - (i as i64) * 3_600,
                    0,
                )
                .unwrap_or_default(),
            })
            .collect()
    }

    /// Twelve-point sparkline sweeping from the start-of-year level to the
    /// current price.
    pub fn mini_series(&self) -> Vec<f64> {
        let start = self.price / (1.0 + self.ytd_pct / 100.0);
        (0..12)
            .map(|i| {
                let t = i as f64 / 11.0;
                let wiggle = (i as f64 * 1.3).sin() * 0.01 * self.price;
                let v = start + (self.price - start) * t + if i == 11 { 0.0 } else { wiggle };
                (v * 100.0).round() / 100.0
            })
            .collect()
    }

    pub fn to_row(&self) -> AssetRow {
        AssetRow {
            symbol: self.symbol.to_string(),
            name: self.name.to_string(),
            asset_class: Some(self.asset_class.to_string()),
            price: Some(self.price),
            change_pct: Some(self.change_pct),
            ytd_pct: Some(self.ytd_pct),
            sentiment: Some(self.sentiment),
            mini_series: Some(self.mini_series()),
            pe_ratio: self.pe_ratio,
            rsi: Some(self.rsi),
            tags: Some(self.tags.iter().map(|t| t.to_string()).collect()),
            news: Some(self.news()),
        }
    }
}

/// Reference rows in universe order.
pub fn reference_rows() -> Vec<AssetRow> {
    REFERENCE_ASSETS.iter().map(ReferenceAsset::to_row).collect()
}
