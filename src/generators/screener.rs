//! Stock screener over a fixed universe with generated fundamentals.

use super::series::round2;
use crate::models::ScreenerStock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// (symbol, name, sector, price, P/E, dividend yield %, market cap $B)
const UNIVERSE: [(&str, &str, &str, f64, f64, f64, f64); 15] = [
    ("AAPL", "Apple Inc.", "Technology", 189.84, 29.4, 0.52, 2950.0),
    ("MSFT", "Microsoft Corp.", "Technology", 415.50, 35.1, 0.72, 3090.0),
    ("NVDA", "NVIDIA Corp.", "Technology", 875.28, 68.9, 0.02, 2180.0),
    ("TSLA", "Tesla Inc.", "Consumer Discretionary", 177.46, 44.2, 0.0, 565.0),
    ("JPM", "JPMorgan Chase & Co.", "Financials", 198.47, 11.8, 2.31, 570.0),
    ("JNJ", "Johnson & Johnson", "Health Care", 152.30, 15.2, 3.12, 366.0),
    ("XOM", "Exxon Mobil Corp.", "Energy", 117.92, 13.4, 3.22, 468.0),
    ("KO", "Coca-Cola Co.", "Consumer Staples", 61.04, 24.3, 3.08, 263.0),
    ("PG", "Procter & Gamble Co.", "Consumer Staples", 165.10, 26.7, 2.41, 389.0),
    ("VZ", "Verizon Communications", "Communication Services", 40.22, 8.9, 6.61, 169.0),
    ("T", "AT&T Inc.", "Communication Services", 17.35, 9.6, 6.42, 124.0),
    ("PFE", "Pfizer Inc.", "Health Care", 28.45, 12.1, 5.89, 161.0),
    ("AMZN", "Amazon.com Inc.", "Consumer Discretionary", 182.41, 52.6, 0.0, 1890.0),
    ("O", "Realty Income Corp.", "Real Estate", 53.80, 41.5, 5.74, 46.0),
    ("CVX", "Chevron Corp.", "Energy", 156.77, 14.6, 4.15, 289.0),
];

/// Optional thresholds; an unset threshold does not filter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenerFilter {
    pub pe_max: Option<f64>,
    pub yield_min: Option<f64>,
    pub rsi_min: Option<f64>,
}

impl ScreenerFilter {
    pub fn matches(&self, stock: &ScreenerStock) -> bool {
        self.pe_max.map_or(true, |max| stock.pe_ratio <= max)
            && self.yield_min.map_or(true, |min| stock.dividend_yield >= min)
            && self.rsi_min.map_or(true, |min| stock.rsi >= min)
    }

    pub fn apply(&self, stocks: Vec<ScreenerStock>) -> Vec<ScreenerStock> {
        stocks.into_iter().filter(|s| self.matches(s)).collect()
    }
}

pub fn generate_universe() -> Vec<ScreenerStock> {
    generate_universe_with_rng(&mut StdRng::from_entropy())
}

pub fn generate_universe_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Vec<ScreenerStock> {
    let mut stocks: Vec<ScreenerStock> = UNIVERSE
        .iter()
        .map(|(symbol, name, sector, price, pe, dividend, cap)| ScreenerStock {
            symbol: symbol.to_string(),
            name: name.to_string(),
            sector: sector.to_string(),
            price: round2(price * (1.0 + rng.gen_range(-0.03..0.03))),
            pe_ratio: round2(pe * (1.0 + rng.gen_range(-0.08..0.08))),
            dividend_yield: round2((dividend * (1.0 + rng.gen_range(-0.1..0.1))).max(0.0)),
            rsi: round2(rng.gen_range(22.0..78.0)),
            market_cap_b: round2(cap * (1.0 + rng.gen_range(-0.03..0.03))),
        })
        .collect();
    stocks.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    stocks
}

/// Generate the universe and keep the stocks passing `filter`.
pub fn screen(filter: &ScreenerFilter) -> Vec<ScreenerStock> {
    filter.apply(generate_universe())
}
