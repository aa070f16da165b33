//! Session bridge: browser cookies into the download client.
//!
//! Navigation (and challenge clearing) mutates the browser's cookie jar;
//! the download client must present the same session or the site serves it
//! the unauthenticated fallback. The bridge is a pure serialization step:
//! the controller snapshots the jar after each page transition and passes
//! the resulting header value into every download call, so there is no
//! shared mutable header state between the two clients.

use crate::browser::BrowserCookie;

/// Serializes a cookie snapshot into a `Cookie` header value.
///
/// Returns `None` for an empty snapshot so callers can omit the header
/// entirely rather than sending an empty one.
#[must_use]
pub fn cookie_header(cookies: &[BrowserCookie]) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    Some(
        cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_empty_snapshot_is_none() {
        assert_eq!(cookie_header(&[]), None);
    }

    #[test]
    fn test_cookie_header_single_cookie() {
        let cookies = [BrowserCookie::new("session", "abc123")];
        assert_eq!(cookie_header(&cookies).unwrap(), "session=abc123");
    }

    #[test]
    fn test_cookie_header_joins_in_snapshot_order() {
        let cookies = [
            BrowserCookie::new("session", "abc123"),
            BrowserCookie::new("age_ok", "1"),
        ];
        assert_eq!(
            cookie_header(&cookies).unwrap(),
            "session=abc123; age_ok=1"
        );
    }
}
