//! Read-time back-fill of asset row fields.
//!
//! Snapshots persisted by earlier builds can miss fields the UI now expects.
//! Missing values are taken from the reference row with the same symbol.
//! Nothing computed here is written back to storage.
//!
//! A field counts as missing when it is absent, or for lists and strings,
//! empty. Numeric zero is a real value and is kept.

use crate::generators::reference_asset;
use crate::models::AssetRow;

pub fn backfill_rows(rows: &mut [AssetRow]) {
    for row in rows.iter_mut() {
        if let Some(asset) = reference_asset(&row.symbol) {
            backfill_row(row, &asset.to_row());
        }
    }
}

pub fn backfill_row(row: &mut AssetRow, reference: &AssetRow) {
    if row.news.as_ref().map_or(true, Vec::is_empty) {
        row.news = reference.news.clone();
    }
    if row.sentiment.is_none() {
        row.sentiment = reference.sentiment;
    }
    if row.mini_series.as_ref().map_or(true, Vec::is_empty) {
        row.mini_series = reference.mini_series.clone();
    }
    if row.asset_class.as_deref().map_or(true, str::is_empty) {
        row.asset_class = reference.asset_class.clone();
    }
    if row.price.is_none() {
        row.price = reference.price;
    }
    if row.change_pct.is_none() {
        row.change_pct = reference.change_pct;
    }
    if row.ytd_pct.is_none() {
        row.ytd_pct = reference.ytd_pct;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::reference_rows;

    fn bare_row(symbol: &str) -> AssetRow {
        AssetRow {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            asset_class: None,
            price: None,
            change_pct: None,
            ytd_pct: None,
            sentiment: None,
            mini_series: None,
            pe_ratio: None,
            rsi: None,
            tags: None,
            news: None,
        }
    }

    #[test]
    fn test_missing_fields_filled_from_reference() {
        let mut rows = vec![bare_row("AAPL")];
        backfill_rows(&mut rows);

        let reference = &reference_rows()[0];
        let row = &rows[0];
        assert_eq!(row.sentiment, Some(72));
        assert_eq!(row.price, reference.price);
        assert!(reference.change_pct.is_some() && reference.ytd_pct.is_some());
        assert_eq!(row.change_pct, reference.change_pct);
        assert_eq!(row.ytd_pct, reference.ytd_pct);
        assert_eq!(row.mini_series, reference.mini_series);
        assert_eq!(row.asset_class.as_deref(), Some("Equity"));
        assert!(row.news.as_ref().is_some_and(|n| !n.is_empty()));
        // fields outside the back-fill set stay untouched
        assert!(row.pe_ratio.is_none());
        assert!(row.tags.is_none());
    }

    #[test]
    fn test_empty_collections_count_as_missing() {
        let mut row = bare_row("NVDA");
        row.mini_series = Some(Vec::new());
        row.asset_class = Some(String::new());
        row.news = Some(Vec::new());
        backfill_rows(std::slice::from_mut(&mut row));
        assert_eq!(row.mini_series.as_ref().map(Vec::len), Some(12));
        assert_eq!(row.asset_class.as_deref(), Some("Equity"));
        assert_eq!(row.news.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_zero_values_are_kept() {
        let mut row = bare_row("TSLA");
        row.price = Some(0.0);
        row.change_pct = Some(0.0);
        row.ytd_pct = Some(0.0);
        row.sentiment = Some(0);
        backfill_rows(std::slice::from_mut(&mut row));
        assert_eq!(row.price, Some(0.0));
        assert_eq!(row.change_pct, Some(0.0));
        assert_eq!(row.ytd_pct, Some(0.0));
        assert_eq!(row.sentiment, Some(0));
    }

    #[test]
    fn test_unknown_symbol_untouched() {
        let mut rows = vec![bare_row("GME")];
        backfill_rows(&mut rows);
        assert_eq!(rows[0], bare_row("GME"));
    }
}
