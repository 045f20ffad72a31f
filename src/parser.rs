//! Response repair parser
//!
//! The model is asked for bare JSON but regularly wraps it in code fences or
//! chatty prose. This module recovers a single JSON value from such text, or
//! fails with diagnostics. It never returns partially-valid data.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::{MalformedResponse, SNIPPET_CHARS, prefix, suffix};
use crate::{log_debug, log_error, log_warn};

static FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^```(?:json)?\s*\n?(.*?)\n?\s*```$").expect("fence pattern is valid")
});

/// Parse `raw` model output into `T`, tolerating fences and surrounding commentary
pub fn repair_parse<T>(raw: &str) -> Result<T, MalformedResponse>
where
    T: DeserializeOwned,
{
    log_debug!("Parser: repairing response of {} chars", raw.len());

    let body = strip_code_fence(raw.trim());

    let initial_error = match serde_json::from_str::<T>(body) {
        Ok(parsed) => return Ok(parsed),
        Err(e) => e.to_string(),
    };

    log_warn!(
        "Initial JSON parse failed ({}); attempting bracket-balanced extraction. start: {:?} end: {:?}",
        initial_error,
        prefix(body, SNIPPET_CHARS),
        suffix(body, SNIPPET_CHARS)
    );

    let Some(candidate) = extract_balanced(body) else {
        log_error!(
            "No balanced JSON structure found in response starting {:?}",
            prefix(raw, SNIPPET_CHARS)
        );
        return Err(MalformedResponse::new(raw, initial_error));
    };

    log_debug!(
        "Parser: extracted candidate of {} chars: {}",
        candidate.len(),
        prefix(candidate, 100)
    );

    serde_json::from_str::<T>(candidate).map_err(|e| {
        log_error!("Bracket-balanced JSON parse also failed: {}", e);
        MalformedResponse::new(raw, initial_error).with_candidate(candidate, e.to_string())
    })
}

/// Remove a surrounding ```` ``` ```` / ```` ```json ```` fence, if the whole text is one
pub fn strip_code_fence(text: &str) -> &str {
    FENCE_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str().trim())
        .filter(|body| !body.is_empty())
        .unwrap_or(text)
}

/// Slice of `text` spanning the first complete top-level `{...}` or `[...]`
///
/// The opening bracket is whichever of `{` / `[` comes first. Only brackets of
/// that kind are counted, and string contents are not special-cased.
pub fn extract_balanced(text: &str) -> Option<&str> {
    let curly = text.find('{');
    let square = text.find('[');

    let (start, open, close) = match (curly, square) {
        (Some(c), Some(s)) if s < c => (s, b'[', b']'),
        (Some(c), _) => (c, b'{', b'}'),
        (None, Some(s)) => (s, b'[', b']'),
        (None, None) => return None,
    };

    let mut balance: i64 = 0;
    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if *byte == open {
            balance += 1;
        } else if *byte == close {
            balance -= 1;
        }
        if balance == 0 {
            return Some(&text[start..=start + offset]);
        }
    }

    None
}
