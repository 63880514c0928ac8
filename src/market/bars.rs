//! Daily-bar payload cleaning and batch aggregation.
//!
//! The aggregates endpoint stamps every reply with request ids, pagination
//! tokens and counts. Those are removed so that repeating a query against
//! unchanged data produces a byte-identical body.

use crate::types::{BatchEnvelope, BatchResult, CloseMeta, RangeMeta, TickerError};
use crate::upstream::error_message;
use reqwest::StatusCode;
use serde_json::Value;

/// Top-level fields that differ between otherwise identical replies.
pub const VOLATILE_FIELDS: &[&str] = &["request_id", "next_url", "count"];

/// Per-bar fields that differ between otherwise identical replies.
pub const VOLATILE_BAR_FIELDS: &[&str] = &["request_id", "id"];

pub fn sanitize_aggregates(data: &mut Value) {
    let Some(obj) = data.as_object_mut() else {
        return;
    };
    for field in VOLATILE_FIELDS {
        obj.remove(*field);
    }
    if let Some(Value::Array(bars)) = obj.get_mut("results") {
        for bar in bars.iter_mut().filter_map(Value::as_object_mut) {
            for field in VOLATILE_BAR_FIELDS {
                bar.remove(*field);
            }
        }
    }
}

/// Close and timestamp of the last bar; `None` if there are no bars.
pub fn close_meta(data: &Value) -> Option<CloseMeta> {
    let last = data.get("results")?.as_array()?.last()?;
    Some(CloseMeta {
        latest_close: last.get("c").cloned(),
        latest_close_time: last.get("t").cloned(),
    })
}

/// Turn one aggregates reply into the ticker's batch entry.
pub fn bars_result(ticker: String, status: StatusCode, body: Option<Value>) -> BatchResult {
    if !status.is_success() {
        let error = error_message(body.as_ref(), status);
        return BatchResult::failed(ticker, status.as_u16(), None, error);
    }

    let Some(mut data) = body else {
        return BatchResult::failed(
            ticker,
            StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            None,
            "market-data provider returned a non-JSON body".into(),
        );
    };

    sanitize_aggregates(&mut data);
    match close_meta(&data) {
        Some(meta) => BatchResult {
            ticker,
            ok: true,
            status: status.as_u16(),
            data: Some(data),
            error: None,
            meta,
        },
        None => {
            let error = format!("No price data returned for {ticker}");
            BatchResult::failed(ticker, status.as_u16(), Some(data), error)
        }
    }
}

/// Fold per-ticker results into the response envelope and its status.
///
/// The batch fails only if no ticker succeeded; result order is kept.
pub fn summarize(
    results: Vec<BatchResult>,
    start_date: String,
    end_date: String,
) -> (StatusCode, BatchEnvelope) {
    let errors: Vec<TickerError> = results
        .iter()
        .filter(|r| !r.ok)
        .map(|r| TickerError {
            ticker: r.ticker.clone(),
            error: r.error.clone().unwrap_or_default(),
        })
        .collect();

    if results.iter().any(|r| r.ok) {
        let envelope = BatchEnvelope {
            ok: true,
            results,
            meta: Some(RangeMeta {
                start_date,
                end_date,
            }),
            errors,
        };
        (StatusCode::OK, envelope)
    } else {
        let envelope = BatchEnvelope {
            ok: false,
            results,
            meta: None,
            errors,
        };
        (StatusCode::BAD_GATEWAY, envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn polygon_reply(request_id: &str) -> Value {
        json!({
            "ticker": "AAPL",
            "queryCount": 2,
            "resultsCount": 2,
            "adjusted": true,
            "status": "OK",
            "request_id": request_id,
            "count": 2,
            "next_url": "https://api.polygon.io/v2/aggs/next?cursor=abc",
            "results": [
                {"c": 150.0, "t": 1_700_000_000_000_i64, "id": 1, "request_id": request_id},
                {"c": 152.5, "t": 1_700_086_400_000_i64, "id": 2}
            ]
        })
    }

    #[test]
    fn test_sanitize_strips_volatile_fields() {
        let mut data = polygon_reply("abc");
        sanitize_aggregates(&mut data);

        let obj = data.as_object().unwrap();
        for field in VOLATILE_FIELDS {
            assert!(!obj.contains_key(*field), "{field} should be removed");
        }
        for bar in data["results"].as_array().unwrap() {
            assert!(bar.get("id").is_none());
            assert!(bar.get("request_id").is_none());
            assert!(bar.get("c").is_some());
        }
        // provider fields outside the deny-list survive
        assert_eq!(data["resultsCount"], json!(2));
        assert_eq!(data["status"], json!("OK"));
    }

    #[test]
    fn test_sanitized_payloads_are_byte_identical() {
        let mut first = polygon_reply("req-1");
        let mut second = polygon_reply("req-2");
        sanitize_aggregates(&mut first);
        sanitize_aggregates(&mut second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_sanitize_ignores_non_objects() {
        let mut data = json!(["not", "an", "object"]);
        sanitize_aggregates(&mut data);
        assert_eq!(data, json!(["not", "an", "object"]));
    }

    #[test]
    fn test_meta_from_last_bar() {
        let result = bars_result("AAPL".into(), StatusCode::OK, Some(polygon_reply("x")));
        assert!(result.ok);
        assert_eq!(result.error, None);
        assert_eq!(result.meta.latest_close, Some(json!(152.5)));
        assert_eq!(result.meta.latest_close_time, Some(json!(1_700_086_400_000_i64)));
    }

    #[test]
    fn test_empty_results_is_a_failure() {
        let body = json!({"ticker": "ZZZZ", "resultsCount": 0, "status": "OK", "request_id": "x"});
        let result = bars_result("ZZZZ".into(), StatusCode::OK, Some(body));
        assert!(!result.ok);
        assert_eq!(result.status, 200);
        assert_eq!(
            result.error.as_deref(),
            Some("No price data returned for ZZZZ")
        );
        assert_eq!(result.meta, CloseMeta::default());
        assert!(result.data.unwrap().get("request_id").is_none());
    }

    #[test]
    fn test_upstream_error_is_carried() {
        let result = bars_result(
            "AAPL".into(),
            StatusCode::FORBIDDEN,
            Some(json!({"status": "ERROR", "error": "Unknown API Key"})),
        );
        assert!(!result.ok);
        assert_eq!(result.status, 403);
        assert_eq!(result.data, None);
        assert_eq!(result.error.as_deref(), Some("Unknown API Key"));

        let result = bars_result("AAPL".into(), StatusCode::NOT_FOUND, None);
        assert_eq!(result.error.as_deref(), Some("HTTP 404"));
    }

    #[test]
    fn test_summarize_partial_failure() {
        let ok = bars_result("AAPL".into(), StatusCode::OK, Some(polygon_reply("x")));
        let bad = BatchResult::failed("NOPE".into(), 404, None, "HTTP 404".into());
        let (status, envelope) = summarize(
            vec![bad, ok],
            "2024-01-01".into(),
            "2024-01-31".into(),
        );

        assert_eq!(status, StatusCode::OK);
        assert!(envelope.ok);
        assert_eq!(envelope.results[0].ticker, "NOPE");
        assert_eq!(envelope.results[1].ticker, "AAPL");
        assert_eq!(
            envelope.errors,
            vec![TickerError {
                ticker: "NOPE".into(),
                error: "HTTP 404".into()
            }]
        );
        assert!(envelope.meta.is_some());
    }

    #[test]
    fn test_summarize_total_failure() {
        let a = BatchResult::failed("A".into(), 500, None, "boom".into());
        let b = BatchResult::failed("B".into(), 404, None, "HTTP 404".into());
        let (status, envelope) = summarize(vec![a, b], "s".into(), "e".into());

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!envelope.ok);
        assert_eq!(envelope.errors.len(), 2);
        assert!(envelope.meta.is_none());
    }
}
