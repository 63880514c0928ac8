//! Pre-filter that keeps live-price questions away from the LLM.

use crate::types::ChatMessage;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Phrasing that signals the caller wants a quote rather than a conversation.
static PRICE_INTENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(price|quote|how much is|what is.*trading at|stock.*now|current.*price)\b")
        .expect("Invalid regex")
});

/// Returns true if the conversation reads like a request for a live price.
///
/// String `content` fields are joined with spaces and lowercased before
/// matching, so the phrase may span messages. Null or structured content is
/// skipped.
pub fn looks_like_price_question(messages: &[ChatMessage]) -> bool {
    let text = messages
        .iter()
        .filter_map(|m| m.get("content").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    PRICE_INTENT_REGEX.is_match(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(content: &str) -> ChatMessage {
        json!({"role": "user", "content": content})
    }

    #[test]
    fn test_flags_price_questions() {
        assert!(looks_like_price_question(&[user(
            "what's the current price of AAPL"
        )]));
        assert!(looks_like_price_question(&[user("Give me a QUOTE for MSFT")]));
        assert!(looks_like_price_question(&[user("How much is Tesla?")]));
        assert!(looks_like_price_question(&[user(
            "what is NVDA trading at today"
        )]));
        assert!(looks_like_price_question(&[user("is the stock up now?")]));
    }

    #[test]
    fn test_ignores_general_questions() {
        assert!(!looks_like_price_question(&[user(
            "Summarise the trend in this data for me"
        )]));
        assert!(!looks_like_price_question(&[user("Explain the P/E ratio")]));
        // word boundaries: "priceless" is not "price"
        assert!(!looks_like_price_question(&[user("That advice was priceless")]));
        assert!(!looks_like_price_question(&[]));
    }

    #[test]
    fn test_matches_across_messages() {
        let messages = [
            user("Tell me about the stock"),
            json!({"role": "assistant", "content": "Which one?"}),
            user("AAPL, right now"),
        ];
        assert!(looks_like_price_question(&messages));
    }

    #[test]
    fn test_skips_non_string_content() {
        let messages = [
            json!({"role": "assistant", "content": null, "tool_calls": []}),
            json!({"role": "user", "content": [{"type": "text", "text": "current price?"}]}),
            json!("not even an object"),
            user("Explain the P/E ratio"),
        ];
        assert!(!looks_like_price_question(&messages));

        let messages = [json!({"role": "tool", "content": null}), user("quote AAPL")];
        assert!(looks_like_price_question(&messages));
    }
}
