//! Credential sanitizer
//!
//! Every string shown to the operator or written to the log goes through
//! [`sanitize`] first. It masks `X-Token-*` header fragments and any long
//! opaque run that looks like a bearer token, so a failed request body can
//! be surfaced without leaking operator credentials.

use regex::Regex;
use std::sync::LazyLock;

static SENSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:X-Token-[A-Za-z0-9_-]{4,}|X-Token:|token\b)\S*|[A-Za-z0-9_-]{20,}")
        .unwrap()
});

/// Mask suspected tokens and long opaque secrets in `input`.
///
/// `X-Token-...` occurrences become `[REDACTED_TOKEN]`; any other run of
/// 20 or more `[A-Za-z0-9_-]` characters becomes `[REDACTED]`.
pub fn sanitize(input: &str) -> String {
    SENSITIVE
        .replace_all(input, |caps: &regex::Captures<'_>| {
            let m = &caps[0];
            if m.len() >= 8 && m[..8].eq_ignore_ascii_case("x-token-") {
                "[REDACTED_TOKEN]"
            } else {
                "[REDACTED]"
            }
        })
        .into_owned()
}
