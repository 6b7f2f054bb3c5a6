//! Quant snapshot generation: benchmark comparison, factor attribution,
//! Monte Carlo projection bands, rolling Sharpe, normalized betas, drawdown
//! and correlations.

use super::reference::REFERENCE_ASSETS;
use super::series::{
    cumulative_pct, date_labels, random_walk, round2, sharpe_ratio, standard_normal,
    step_returns, to_points, ModeProfile, RISK_FREE_RATE,
};
use crate::models::{
    AssetBeta, CorrelationMatrix, DrawdownData, FactorAttribution, Horizon, MonteCarloPoint,
    MonteCarloStats, QuantSnapshot, RiskRewardPoint, SeriesPoint, TimeRange, TradingMode,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::ContinuousCDF;
use std::collections::BTreeMap;

/// (factor, base exposure, annual premium %)
const FACTORS: [(&str, f64, f64); 6] = [
    ("Market", 1.02, 6.5),
    ("Size", -0.18, 1.2),
    ("Value", -0.32, 2.1),
    ("Momentum", 0.41, 3.4),
    ("Quality", 0.27, 2.6),
    ("Low Volatility", -0.12, 1.8),
];

pub fn generate_quant(range: TimeRange, mode: TradingMode) -> Result<QuantSnapshot> {
    let mut rng = StdRng::from_entropy();
    generate_quant_with_rng(range, mode, &mut rng, Utc::now())
}

pub fn generate_quant_with_rng<R: Rng + ?Sized>(
    range: TimeRange,
    mode: TradingMode,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<QuantSnapshot> {
    let normal = standard_normal()?;
    let profile = ModeProfile::for_mode(mode);
    let (drift, vol) = profile.step_params(range);
    let dt = range.step_years();
    let n = range.points();
    let labels = date_labels(range, now.date_naive());

    let portfolio_values = random_walk(rng, &normal, profile.base_capital, drift, vol, n);
    let benchmark_values = random_walk(
        rng,
        &normal,
        profile.base_capital,
        profile.benchmark_drift * dt,
        profile.benchmark_vol * dt.sqrt(),
        n,
    );

    let last_value = portfolio_values
        .last()
        .copied()
        .unwrap_or(profile.base_capital);
    let mu = profile.annual_drift + rng.gen_range(-0.015..0.015);
    let monte_carlo = monte_carlo_bands(last_value, mu, profile.annual_vol)?;

    Ok(QuantSnapshot {
        range,
        mode,
        updated_at: now,
        portfolio: to_points(&labels, &cumulative_pct(&portfolio_values)),
        benchmark: to_points(&labels, &cumulative_pct(&benchmark_values)),
        factors: factor_attribution(rng),
        monte_carlo,
        sharpe: rolling_sharpe(&labels, &portfolio_values, dt),
        betas: normalized_betas(rng),
        risk_reward: risk_reward_points(rng),
        drawdown: drawdown(&labels, &portfolio_values, range.step_days()),
        correlation: correlation_matrix(rng),
    })
}

fn factor_attribution<R: Rng + ?Sized>(rng: &mut R) -> Vec<FactorAttribution> {
    FACTORS
        .iter()
        .map(|(factor, exposure, premium)| {
            let exposure = exposure + rng.gen_range(-0.08..0.08);
            let premium = premium * (1.0 + rng.gen_range(-0.3..0.3));
            FactorAttribution {
                factor: factor.to_string(),
                exposure: round2(exposure),
                contribution_pct: round2(exposure * premium),
            }
        })
        .collect()
}

/// Lognormal terminal-value quantiles per horizon with a yearly band series.
pub fn monte_carlo_bands(
    initial: f64,
    annual_drift: f64,
    annual_vol: f64,
) -> Result<BTreeMap<Horizon, MonteCarloStats>> {
    let normal = standard_normal()?;
    let z90 = normal.inverse_cdf(0.9);
    let log_drift = annual_drift - 0.5 * annual_vol * annual_vol;

    let quantiles = |years: f64| -> (f64, f64, f64) {
        let center = initial * (log_drift * years).exp();
        let spread = z90 * annual_vol * years.sqrt();
        (center, center * (-spread).exp(), center * spread.exp())
    };

    let mut out = BTreeMap::new();
    for horizon in Horizon::ALL {
        let series = (0..=horizon.years())
            .map(|year| {
                let (median, p10, p90) = quantiles(year as f64);
                MonteCarloPoint {
                    label: format!("Y{}", year),
                    median: round2(median),
                    p10: round2(p10),
                    p90: round2(p90),
                }
            })
            .collect();
        let (median, p10, p90) = quantiles(horizon.years() as f64);
        out.insert(
            horizon,
            MonteCarloStats {
                median: round2(median),
                p10: round2(p10),
                p90: round2(p90),
                series,
            },
        );
    }
    Ok(out)
}

/// Annualized Sharpe over a trailing window, one point per label once the
/// window is full.
pub fn rolling_sharpe(labels: &[String], values: &[f64], step_years: f64) -> Vec<SeriesPoint> {
    let returns = step_returns(values);
    let window = (returns.len() / 4).max(3);
    if returns.len() < window {
        return Vec::new();
    }
    (window..=returns.len())
        .map(|end| SeriesPoint {
            // returns[end - 1] is the move into values[end]
            label: labels.get(end).cloned().unwrap_or_default(),
            value: round2(sharpe_ratio(&returns[end - window..end], step_years)),
        })
        .collect()
}

/// Per-asset betas rescaled so the portfolio-weighted beta is exactly 1.0.
pub fn normalized_betas<R: Rng + ?Sized>(rng: &mut R) -> Vec<AssetBeta> {
    let raw: Vec<f64> = REFERENCE_ASSETS
        .iter()
        .map(|a| a.beta * (1.0 + rng.gen_range(-0.1..0.1)))
        .collect();
    let weighted: f64 = REFERENCE_ASSETS
        .iter()
        .zip(&raw)
        .map(|(a, b)| a.weight * b)
        .sum();
    let scale = if weighted > 0.0 { 1.0 / weighted } else { 1.0 };
    REFERENCE_ASSETS
        .iter()
        .zip(raw)
        .map(|(a, b)| AssetBeta {
            symbol: a.symbol.to_string(),
            beta: b * scale,
        })
        .collect()
}

fn risk_reward_points<R: Rng + ?Sized>(rng: &mut R) -> Vec<RiskRewardPoint> {
    REFERENCE_ASSETS
        .iter()
        .map(|a| {
            let vol = a.vol_pct * (1.0 + rng.gen_range(-0.1..0.1));
            let ret = a.ytd_pct * 0.6 + rng.gen_range(-5.0..5.0);
            let sharpe = if vol > 0.0 {
                (ret - RISK_FREE_RATE * 100.0) / vol
            } else {
                0.0
            };
            RiskRewardPoint {
                symbol: a.symbol.to_string(),
                volatility_pct: round2(vol),
                return_pct: round2(ret),
                sharpe: round2(sharpe),
            }
        })
        .collect()
}

/// Underwater curve (% below running peak), worst drawdown, and days from
/// the worst trough back to the prior peak (or to the end when unrecovered).
pub fn drawdown(labels: &[String], values: &[f64], step_days: i64) -> DrawdownData {
    let mut peak = f64::MIN;
    let mut series = Vec::with_capacity(values.len());
    let mut max_dd = 0.0_f64;
    let mut trough_idx = 0usize;
    let mut trough_peak = 0.0_f64;

    for (i, v) in values.iter().enumerate() {
        peak = peak.max(*v);
        let dd = if peak > 0.0 { (v / peak - 1.0) * 100.0 } else { 0.0 };
        if dd < max_dd {
            max_dd = dd;
            trough_idx = i;
            trough_peak = peak;
        }
        series.push(SeriesPoint {
            label: labels.get(i).cloned().unwrap_or_default(),
            value: round2(dd),
        });
    }

    let recovery_steps = if max_dd < 0.0 {
        values[trough_idx..]
            .iter()
            .position(|v| *v >= trough_peak)
            .unwrap_or(values.len() - 1 - trough_idx)
    } else {
        0
    };

    DrawdownData {
        series,
        max_drawdown_pct: round2(max_dd),
        recovery_days: (recovery_steps as i64 * step_days).max(0) as u32,
    }
}

/// One-factor correlation model: rho_ij = l_i * l_j, unit diagonal.
pub fn correlation_matrix<R: Rng + ?Sized>(rng: &mut R) -> CorrelationMatrix {
    let loadings: Vec<f64> = REFERENCE_ASSETS
        .iter()
        .map(|a| (a.market_loading + rng.gen_range(-0.05..0.05)).clamp(0.0, 0.99))
        .collect();
    let values = loadings
        .iter()
        .enumerate()
        .map(|(i, li)| {
            loadings
                .iter()
                .enumerate()
                .map(|(j, lj)| if i == j { 1.0 } else { round2(li * lj) })
                .collect()
        })
        .collect();
    CorrelationMatrix {
        symbols: REFERENCE_ASSETS.iter().map(|a| a.symbol.to_string()).collect(),
        values,
    }
}
