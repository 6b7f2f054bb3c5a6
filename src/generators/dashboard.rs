//! Dashboard snapshot generation.

use super::reference::{ReferenceAsset, REFERENCE_ASSETS};
use super::series::{
    cumulative_pct, date_labels, random_walk, round2, sharpe_ratio, standard_normal,
    step_returns, to_points, ModeProfile,
};
use crate::models::{
    Alert, AlertPriority, AlertType, AssetRow, DashboardSnapshot, Kpi, SeriesPoint, TimeRange,
    TradingMode,
};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

const MINI_SERIES_POINTS: usize = 12;

/// Generate a fresh snapshot from an entropy-seeded RNG.
pub fn generate_dashboard(range: TimeRange, mode: TradingMode) -> Result<DashboardSnapshot> {
    let mut rng = StdRng::from_entropy();
    generate_dashboard_with_rng(range, mode, &mut rng, Utc::now())
}

pub fn generate_dashboard_with_rng<R: Rng + ?Sized>(
    range: TimeRange,
    mode: TradingMode,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<DashboardSnapshot> {
    let normal = standard_normal()?;
    let profile = ModeProfile::for_mode(mode);
    let (drift, vol) = profile.step_params(range);
    let labels = date_labels(range, now.date_naive());

    let start = profile.base_capital * (1.0 + rng.gen_range(-0.03..0.03));
    let values = random_walk(rng, &normal, start, drift, vol, range.points());

    let kpis = build_kpis(&values, range);
    let cashflow = build_cashflow(rng, &labels, profile.base_capital);
    let rows: Vec<AssetRow> = REFERENCE_ASSETS
        .iter()
        .map(|asset| build_row(rng, &normal, asset))
        .collect();
    let alerts = build_alerts(mode, &rows, &kpis, now);

    Ok(DashboardSnapshot {
        range,
        mode,
        updated_at: now,
        kpis,
        performance: to_points(&labels, &values),
        cashflow,
        rows,
        alerts,
    })
}

fn pct_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        (to / from - 1.0) * 100.0
    }
}

fn build_kpis(values: &[f64], range: TimeRange) -> Vec<Kpi> {
    let last = values.last().copied().unwrap_or_default();
    let prev = if values.len() >= 2 {
        values[values.len() - 2]
    } else {
        last
    };
    let first = values.first().copied().unwrap_or_default();
    let returns = step_returns(values);
    let total_return = cumulative_pct(values).last().copied().unwrap_or_default();
    let wins = returns.iter().filter(|r| **r > 0.0).count();
    let win_rate = if returns.is_empty() {
        0.0
    } else {
        wins as f64 / returns.len() as f64 * 100.0
    };
    let sharpe = sharpe_ratio(&returns, range.step_years());

    vec![
        Kpi {
            id: "total_value".to_string(),
            label: "Portfolio Value".to_string(),
            value: round2(last),
            delta_pct: round2(pct_change(prev, last)),
        },
        Kpi {
            id: "day_pnl".to_string(),
            label: "Period P&L".to_string(),
            value: round2(last - prev),
            delta_pct: round2(pct_change(prev, last)),
        },
        Kpi {
            id: "total_return".to_string(),
            label: format!("Return ({})", range),
            value: round2(total_return),
            delta_pct: round2(pct_change(first, last)),
        },
        Kpi {
            id: "sharpe".to_string(),
            label: "Sharpe Ratio".to_string(),
            value: round2(sharpe),
            delta_pct: 0.0,
        },
        Kpi {
            id: "win_rate".to_string(),
            label: "Win Rate".to_string(),
            value: round2(win_rate),
            delta_pct: round2(win_rate - 50.0),
        },
    ]
}

fn build_cashflow<R: Rng + ?Sized>(
    rng: &mut R,
    labels: &[String],
    base_capital: f64,
) -> Vec<SeriesPoint> {
    labels
        .iter()
        .map(|label| SeriesPoint {
            label: label.clone(),
            value: round2(base_capital * rng.gen_range(-0.02..0.04)),
        })
        .collect()
}

fn build_row<R: Rng + ?Sized>(rng: &mut R, normal: &Normal, asset: &ReferenceAsset) -> AssetRow {
    let price = asset.price * (1.0 + rng.gen_range(-0.04..0.04));
    let daily_vol = asset.vol_pct / 100.0 / (252f64).sqrt();
    // Walk backwards from the end price so the sparkline terminates at `price`.
    let mut mini = random_walk(rng, normal, price, 0.0, daily_vol, MINI_SERIES_POINTS);
    mini.reverse();
    let sentiment = (asset.sentiment as i32 + rng.gen_range(-8..=8)).clamp(0, 100) as u8;

    AssetRow {
        symbol: asset.symbol.to_string(),
        name: asset.name.to_string(),
        asset_class: Some(asset.asset_class.to_string()),
        price: Some(round2(price)),
        change_pct: Some(round2(asset.change_pct + rng.gen_range(-1.5..1.5))),
        ytd_pct: Some(round2(asset.ytd_pct + rng.gen_range(-4.0..4.0))),
        sentiment: Some(sentiment),
        mini_series: Some(mini.into_iter().map(round2).collect()),
        pe_ratio: asset
            .pe_ratio
            .map(|pe| round2(pe * (1.0 + rng.gen_range(-0.05..0.05)))),
        rsi: Some(round2((asset.rsi + rng.gen_range(-6.0..6.0)).clamp(0.0, 100.0))),
        tags: Some(asset.tags.iter().map(|t| t.to_string()).collect()),
        news: Some(asset.news()),
    }
}

/// Alerts use stable ids (`a1`..`a4`) so a dismissal outlives regeneration.
fn build_alerts(
    mode: TradingMode,
    rows: &[AssetRow],
    kpis: &[Kpi],
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let mut alerts = Vec::with_capacity(4);

    let mover = rows.iter().max_by(|a, b| {
        let a = a.change_pct.unwrap_or_default().abs();
        let b = b.change_pct.unwrap_or_default().abs();
        a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
    });
    if let Some(row) = mover {
        let change = row.change_pct.unwrap_or_default();
        alerts.push(Alert {
            id: "a1".to_string(),
            alert_type: AlertType::Price,
            message: format!(
                "{} moved {:+.2}% today, the largest move in the portfolio",
                row.symbol, change
            ),
            priority: if change.abs() >= 3.0 {
                AlertPriority::High
            } else {
                AlertPriority::Medium
            },
            timestamp: now - Duration::minutes(5),
            asset_symbol: Some(row.symbol.clone()),
        });
    }

    let weakest = rows.iter().min_by_key(|r| r.sentiment.unwrap_or(50));
    if let Some(row) = weakest {
        let score = row.sentiment.unwrap_or(50);
        alerts.push(Alert {
            id: "a2".to_string(),
            alert_type: AlertType::Sentiment,
            message: format!(
                "{} has the weakest sentiment in the portfolio at {}/100",
                row.symbol, score
            ),
            priority: if score < 40 {
                AlertPriority::High
            } else {
                AlertPriority::Low
            },
            timestamp: now - Duration::minutes(32),
            asset_symbol: Some(row.symbol.clone()),
        });
    }

    let sharpe = kpis
        .iter()
        .find(|k| k.id == "sharpe")
        .map(|k| k.value)
        .unwrap_or_default();
    alerts.push(Alert {
        id: "a3".to_string(),
        alert_type: AlertType::Risk,
        message: format!("Risk-adjusted return is {:.2} Sharpe over the period", sharpe),
        priority: if sharpe < 0.5 {
            AlertPriority::High
        } else {
            AlertPriority::Medium
        },
        timestamp: now - Duration::hours(2),
        asset_symbol: None,
    });

    let message = match mode {
        TradingMode::Live => "Tech allocation exceeds target weight; consider rebalancing",
        TradingMode::Paper => "Paper portfolio drifted from model weights; rebalance simulation",
    };
    alerts.push(Alert {
        id: "a4".to_string(),
        alert_type: AlertType::Rebalance,
        message: message.to_string(),
        priority: AlertPriority::Low,
        timestamp: now - Duration::hours(6),
        asset_symbol: None,
    });

    alerts
}
