//! Per-symbol market intelligence.

use super::reference::reference_asset;
use super::series::round2;
use crate::models::{MarketIntelligence, NewsItem, SentimentLabel};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SOURCES: [&str; 6] = [
    "Reuters",
    "Bloomberg",
    "Financial Times",
    "CNBC",
    "MarketWatch",
    "WSJ",
];

/// (template, sentiment) where `{name}` is replaced by the company name.
const TEMPLATES: [(&str, f64); 8] = [
    ("{name} beats quarterly earnings expectations", 0.7),
    ("Analysts upgrade {name} on margin expansion", 0.6),
    ("{name} announces expanded share buyback", 0.5),
    ("Institutional ownership of {name} rises", 0.3),
    ("{name} trades flat as sector rotates", 0.0),
    ("Regulators open review into {name} practices", -0.5),
    ("{name} guides below consensus for next quarter", -0.6),
    ("Short interest in {name} climbs", -0.3),
];

pub fn generate_intelligence(symbol: &str) -> MarketIntelligence {
    generate_intelligence_with_rng(symbol, &mut StdRng::from_entropy(), Utc::now())
}

pub fn generate_intelligence_with_rng<R: Rng + ?Sized>(
    symbol: &str,
    rng: &mut R,
    now: DateTime<Utc>,
) -> MarketIntelligence {
    let symbol = symbol.trim().to_ascii_uppercase();
    let reference = reference_asset(&symbol);
    let name = reference.map(|a| a.name.to_string()).unwrap_or_else(|| symbol.clone());
    let base_price = reference.map(|a| a.price).unwrap_or(100.0);

    let count = rng.gen_range(3..=5);
    let mut headlines: Vec<NewsItem> = TEMPLATES
        .choose_multiple(rng, count)
        .enumerate()
        .map(|(i, (template, sentiment))| NewsItem {
            headline: template.replace("{name}", &name),
            source: SOURCES.choose(rng).copied().unwrap_or("Reuters").to_string(),
            sentiment: *sentiment,
            published_at: now - Duration::minutes(45 * (i as i64 + 1)),
        })
        .collect();
    headlines.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let avg = headlines.iter().map(|h| h.sentiment).sum::<f64>() / headlines.len().max(1) as f64;
    let anchor = reference.map(|a| a.sentiment as f64).unwrap_or(50.0);
    let score = (anchor * 0.5 + (avg + 1.0) * 25.0).round().clamp(0.0, 100.0) as u8;
    let label = SentimentLabel::from_score(score);

    let (consensus, upside) = match label {
        SentimentLabel::Bullish => ("Buy", rng.gen_range(0.08..0.22)),
        SentimentLabel::Neutral => ("Hold", rng.gen_range(-0.03..0.08)),
        SentimentLabel::Bearish => ("Sell", rng.gen_range(-0.18..-0.02)),
    };

    let tone = match label {
        SentimentLabel::Bullish => "bullish",
        SentimentLabel::Neutral => "neutral",
        SentimentLabel::Bearish => "bearish",
    };

    MarketIntelligence {
        summary: format!(
            "{} coverage is {} with {} recent headlines and a {}/100 sentiment score",
            name,
            tone,
            headlines.len(),
            score
        ),
        symbol,
        sentiment_score: score,
        sentiment_label: label,
        headlines,
        analyst_consensus: consensus.to_string(),
        price_target: round2(base_price * (1.0 + upside)),
        generated_at: now,
    }
}
