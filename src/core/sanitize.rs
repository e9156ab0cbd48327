//! User-presentable error messages.
//!
//! Backend rejections are mapped to fixed messages for the statuses that can
//! leak authorization or infrastructure details. Operators can opt into the
//! raw text with `FORKAST_DEBUG_ERRORS`.

/// Environment flag enabling raw backend messages in sanitized errors.
pub const DEBUG_ERRORS_ENV: &str = "FORKAST_DEBUG_ERRORS";

/// Raw messages are cut to this many characters.
pub const MAX_MESSAGE_CHARS: usize = 200;

pub const REJECTED_CREDENTIALS_MESSAGE: &str =
    "Credentials rejected by Forkast. Generate a fresh API key and try again.";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Hold on a moment before retrying.";
pub const UNAVAILABLE_MESSAGE: &str = "Forkast is temporarily unavailable. Retry shortly.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Forkast request failed. Please try again.";

/// Read the debug flag from the environment (`1`, `true`, `yes`, `on`).
#[must_use]
pub fn debug_errors_enabled() -> bool {
    std::env::var(DEBUG_ERRORS_ENV)
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Collapse whitespace runs to single spaces and cut to [`MAX_MESSAGE_CHARS`].
fn condense(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_MESSAGE_CHARS)
        .collect()
}

/// Map a backend status and raw message to a safe message.
///
/// With `debug` set, the condensed raw message is appended instead of being
/// dropped.
#[must_use]
pub fn sanitize_message(status: Option<u16>, raw: &str, debug: bool) -> String {
    let condensed = condense(raw);

    let sanitized = match status {
        Some(401 | 403) => REJECTED_CREDENTIALS_MESSAGE.to_string(),
        Some(429) => RATE_LIMITED_MESSAGE.to_string(),
        Some(500 | 503) => UNAVAILABLE_MESSAGE.to_string(),
        _ if !condensed.is_empty() => condensed.clone(),
        _ => GENERIC_FAILURE_MESSAGE.to_string(),
    };

    if debug && !condensed.is_empty() && sanitized != condensed {
        return format!("{sanitized} ({condensed})");
    }

    sanitized
}
