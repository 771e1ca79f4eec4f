//! HTML docs page → embedded JSON payload
//!
//! Reference pages are server-rendered and carry their whole data model in a
//! single `<script id="ssr-props">` blob, so a marker scan is enough.

use crate::error::ExtractError;

const OPEN_MARKER: &str = r#"<script id="ssr-props" type="application/json">"#;
const CLOSE_MARKER: &str = "</script>";

/// Return the raw bytes between the ssr-props script tags.
pub fn extract_ssr_props(html: &str) -> Result<&[u8], ExtractError> {
    let start = html.find(OPEN_MARKER).ok_or(ExtractError::NotFound)? + OPEN_MARKER.len();
    let len = html[start..]
        .find(CLOSE_MARKER)
        .ok_or(ExtractError::NotFound)?;
    Ok(html[start..start + len].as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_returns_payload_between_markers() {
        let html = r#"<html><body><script id="ssr-props" type="application/json">{"document":{}}</script></body></html>"#;
        assert_eq!(extract_ssr_props(html).unwrap(), br#"{"document":{}}"#);
    }

    #[test]
    fn extract_keeps_bytes_verbatim() {
        let payload = "{\n  \"a\": \"caf\u{e9} <b>\" }\n";
        let html = format!("<p>x</p>{OPEN_MARKER}{payload}{CLOSE_MARKER}<script>other()</script>");
        assert_eq!(extract_ssr_props(&html).unwrap(), payload.as_bytes());
    }

    #[test]
    fn extract_ignores_other_script_tags() {
        let html = format!(
            r#"<script type="application/json">{{"wrong":1}}</script>{OPEN_MARKER}{{"right":1}}{CLOSE_MARKER}"#
        );
        assert_eq!(extract_ssr_props(&html).unwrap(), br#"{"right":1}"#);
    }

    #[test]
    fn extract_fails_without_marker() {
        let html = "<html><script>var x = 1;</script></html>";
        assert_eq!(extract_ssr_props(html), Err(ExtractError::NotFound));
    }

    #[test]
    fn extract_fails_when_unterminated() {
        let html = format!("{OPEN_MARKER}{{\"document\":{{}}}}");
        assert_eq!(extract_ssr_props(&html), Err(ExtractError::NotFound));
    }

    #[test]
    fn extract_allows_empty_payload() {
        let html = format!("{OPEN_MARKER}{CLOSE_MARKER}");
        assert_eq!(extract_ssr_props(&html).unwrap(), b"");
    }
}
