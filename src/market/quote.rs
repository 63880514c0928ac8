//! Mapping snapshot and last-trade payloads to a [`PriceQuote`].

use crate::types::{PriceQuote, PriceSource, SnapshotExtract};
use serde::Deserialize;
use serde_json::{Number, Value};

#[derive(Deserialize, Debug)]
struct Trade {
    #[serde(default)]
    p: Option<f64>,
    #[serde(default)]
    t: Option<Number>,
}

#[derive(Deserialize, Debug)]
struct SnapshotBody {
    #[serde(default)]
    ticker: Option<SnapshotTicker>,
}

#[derive(Deserialize, Debug)]
struct SnapshotTicker {
    #[serde(default, rename = "lastTrade")]
    last_trade: Option<Trade>,
    #[serde(default)]
    day: Option<Value>,
    #[serde(default)]
    min: Option<Value>,
}

#[derive(Deserialize, Debug)]
struct LastTradeBody {
    #[serde(default)]
    results: Option<Trade>,
}

/// Use the snapshot's last trade, if it has a price.
pub fn quote_from_snapshot(ticker: &str, body: &Value) -> Option<PriceQuote> {
    let snapshot = SnapshotBody::deserialize(body).ok()?.ticker?;
    let trade = snapshot.last_trade?;
    let price = trade.p?;

    Some(PriceQuote {
        ticker: ticker.to_string(),
        price,
        as_of: trade.t,
        source: PriceSource::Snapshot,
        snapshot: Some(SnapshotExtract {
            day: snapshot.day,
            minute: snapshot.min,
        }),
    })
}

/// Use the last-trade endpoint's result, if it has a price.
pub fn quote_from_last_trade(ticker: &str, body: &Value) -> Option<PriceQuote> {
    let trade = LastTradeBody::deserialize(body).ok()?.results?;
    let price = trade.p?;

    Some(PriceQuote {
        ticker: ticker.to_string(),
        price,
        as_of: trade.t,
        source: PriceSource::LastTrade,
        snapshot: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_with_last_trade() {
        let body = json!({
            "status": "OK",
            "ticker": {
                "ticker": "AAPL",
                "lastTrade": {"p": 189.91, "t": 1_700_000_000_000_000_000_i64, "s": 100},
                "day": {"c": 189.5, "v": 1000},
                "min": {"c": 189.9}
            }
        });
        let quote = quote_from_snapshot("AAPL", &body).unwrap();
        assert_eq!(quote.price, 189.91);
        assert_eq!(quote.source, PriceSource::Snapshot);
        assert_eq!(quote.as_of, Some(Number::from(1_700_000_000_000_000_000_i64)));
        let extract = quote.snapshot.unwrap();
        assert_eq!(extract.day, Some(json!({"c": 189.5, "v": 1000})));
        assert_eq!(extract.minute, Some(json!({"c": 189.9})));
    }

    #[test]
    fn snapshot_without_day_or_minute_keeps_nulls() {
        let body = json!({"ticker": {"lastTrade": {"p": 10.0}}});
        let quote = quote_from_snapshot("X", &body).unwrap();
        assert_eq!(quote.as_of, None);
        assert_eq!(
            quote.snapshot,
            Some(SnapshotExtract {
                day: None,
                minute: None
            })
        );
    }

    #[test]
    fn snapshot_without_price_yields_nothing() {
        assert!(quote_from_snapshot("AAPL", &json!({"status": "NOT_FOUND"})).is_none());
        assert!(quote_from_snapshot("AAPL", &json!({"ticker": {"lastTrade": {}}})).is_none());
        assert!(quote_from_snapshot("AAPL", &json!({"ticker": {"day": {}}})).is_none());
    }

    #[test]
    fn last_trade_result() {
        let body = json!({"results": {"p": 42.5, "t": 1700000000123_i64}, "status": "OK"});
        let quote = quote_from_last_trade("MSFT", &body).unwrap();
        assert_eq!(quote.price, 42.5);
        assert_eq!(quote.source, PriceSource::LastTrade);
        assert_eq!(quote.snapshot, None);

        assert!(quote_from_last_trade("MSFT", &json!({"error": "nope"})).is_none());
    }
}
