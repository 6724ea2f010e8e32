//! Shared reqwest plumbing for the HTTP adapters.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

const PREVIEW_CHAR_LIMIT: usize = 160;

/// Build a client whose every request is bounded by `timeout`.
///
/// # Errors
///
/// Returns an error when the reqwest client cannot be constructed.
pub(crate) fn bounded_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Append path segments to `base`, keeping any path prefix it already has.
///
/// Returns `None` when `base` cannot carry a path (e.g. `mailto:` URLs).
pub(crate) fn join_segments<'a>(
    base: &Url,
    segments: impl IntoIterator<Item = &'a str>,
) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
    Some(url)
}

/// Describe a failed response by status plus a compact body preview.
pub(crate) fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}

/// Whitespace-collapsed body text, truncated for logs and error messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://viacep.com.br", vec!["ws", "01001000", "json", ""], "https://viacep.com.br/ws/01001000/json/")]
    #[case("https://viacep.com.br/", vec!["ws", "01001000", "json", ""], "https://viacep.com.br/ws/01001000/json/")]
    #[case("http://127.0.0.1:8081/resolve/", vec!["01001000"], "http://127.0.0.1:8081/resolve/01001000")]
    #[case("http://localhost:8081", vec!["a b"], "http://localhost:8081/a%20b")]
    fn joins_segments_onto_base(
        #[case] base: &str,
        #[case] segments: Vec<&str>,
        #[case] expected: &str,
    ) {
        let base = Url::parse(base).expect("valid base");
        let joined = join_segments(&base, segments).expect("base accepts paths");
        assert_eq!(joined.as_str(), expected);
    }

    #[test]
    fn cannot_join_onto_opaque_urls() {
        let base = Url::parse("mailto:ops@example.com").expect("valid url");
        assert!(join_segments(&base, ["x"]).is_none());
    }

    #[test]
    fn preview_collapses_whitespace_and_truncates() {
        let body = format!("  {}\n\t{}  ", "a".repeat(100), "b".repeat(100));
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHAR_LIMIT + 3);
        assert!(preview.contains("a b"));
    }

    #[rstest]
    #[case(b"", "status 503")]
    #[case(b"{\"error\": \"down\"}", "status 503: {\"error\": \"down\"}")]
    fn status_message_includes_preview(#[case] body: &[u8], #[case] expected: &str) {
        assert_eq!(status_message(StatusCode::SERVICE_UNAVAILABLE, body), expected);
    }
}
