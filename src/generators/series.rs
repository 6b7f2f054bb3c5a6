//! Random-walk primitives shared by the dashboard and quant generators.

use crate::models::{SeriesPoint, TimeRange, TradingMode};
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::Normal;

/// Trading days per year, used to annualize per-step statistics.
pub const TRADING_DAYS: f64 = 252.0;

/// Annual risk-free rate applied to Sharpe calculations.
pub const RISK_FREE_RATE: f64 = 0.04;

/// Per-mode generation parameters. Live and paper are separate universes,
/// so they never share capital base or walk parameters.
#[derive(Debug, Clone, Copy)]
pub struct ModeProfile {
    pub base_capital: f64,
    pub annual_drift: f64,
    pub annual_vol: f64,
    pub benchmark_drift: f64,
    pub benchmark_vol: f64,
}

impl ModeProfile {
    pub fn for_mode(mode: TradingMode) -> Self {
        match mode {
            TradingMode::Live => Self {
                base_capital: 1_250_000.0,
                annual_drift: 0.11,
                annual_vol: 0.18,
                benchmark_drift: 0.08,
                benchmark_vol: 0.15,
            },
            TradingMode::Paper => Self {
                base_capital: 100_000.0,
                annual_drift: 0.14,
                annual_vol: 0.24,
                benchmark_drift: 0.08,
                benchmark_vol: 0.15,
            },
        }
    }

    /// (drift, volatility) for a single sample step of `range`.
    pub fn step_params(&self, range: TimeRange) -> (f64, f64) {
        let dt = range.step_years();
        (self.annual_drift * dt, self.annual_vol * dt.sqrt())
    }
}

pub fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).context("failed to build standard normal distribution")
}

/// ISO date labels for `range`, oldest first, ending at `end`.
pub fn date_labels(range: TimeRange, end: NaiveDate) -> Vec<String> {
    let n = range.points() as i64;
    let step = range.step_days();
    (0..n)
        .rev()
        .map(|i| (end - Duration::days(i * step)).format("%Y-%m-%d").to_string())
        .collect()
}

/// Geometric random walk of `n` values starting at `start`.
pub fn random_walk<R: Rng + ?Sized>(
    rng: &mut R,
    normal: &Normal,
    start: f64,
    drift: f64,
    vol: f64,
    n: usize,
) -> Vec<f64> {
    let mut out = Vec::with_capacity(n);
    let mut value = start;
    for i in 0..n {
        if i > 0 {
            let z = normal.sample(rng);
            value *= ((drift - 0.5 * vol * vol) + vol * z).exp();
        }
        out.push(value);
    }
    out
}

/// Simple returns between consecutive values.
pub fn step_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Percent change of every value relative to the first one.
pub fn cumulative_pct(values: &[f64]) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    if first == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v / first - 1.0) * 100.0).collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Annualized Sharpe ratio of per-step `returns` sampled every `step_years`.
pub fn sharpe_ratio(returns: &[f64], step_years: f64) -> f64 {
    let sd = std_dev(returns);
    if sd <= 0.0 || step_years <= 0.0 {
        return 0.0;
    }
    let excess = mean(returns) - RISK_FREE_RATE * step_years;
    excess / sd * (1.0 / step_years).sqrt()
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub fn to_points(labels: &[String], values: &[f64]) -> Vec<SeriesPoint> {
    labels
        .iter()
        .zip(values)
        .map(|(label, value)| SeriesPoint {
            label: label.clone(),
            value: round2(*value),
        })
        .collect()
}
