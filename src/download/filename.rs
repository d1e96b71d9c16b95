//! Target file name derivation from a source URL.
//!
//! The local file is named after the URL's final path segment,
//! percent-decoded and sanitized so an encoded separator can never escape
//! the destination directory.

use url::Url;

/// Derives the target file name from the URL's final path segment.
///
/// Returns `None` when the URL has no usable segment (e.g. `https://host/`)
/// or the segment sanitizes to an empty string.
#[must_use]
pub fn target_name(url: &Url) -> Option<String> {
    let last = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())?;

    let decoded = urlencoding::decode(last).unwrap_or_else(|_| last.into());
    let name = sanitize(&decoded);
    (!name.is_empty()).then_some(name)
}

/// Replaces path separators and control characters, collapsing runs into a
/// single underscore. Keeps alphanumerics, `-`, `_` and `.`.
fn sanitize(value: &str) -> String {
    let mut out = String::new();
    let mut prev_sep = false;
    for ch in value.chars() {
        let mapped = match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\'' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') => c,
            _ => '_',
        };
        if mapped == '_' {
            if !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else {
            out.push(mapped);
            prev_sep = false;
        }
    }
    out.trim_matches(|c| c == '_' || c == '.').to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_target_name_last_segment() {
        let url = parse("https://data.binance.vision/data/spot/monthly/trades/BTCUSDT/BTCUSDT-trades-2017-12.zip");
        assert_eq!(
            target_name(&url).unwrap(),
            "BTCUSDT-trades-2017-12.zip"
        );
    }

    #[test]
    fn test_target_name_ignores_query() {
        let url = parse("https://example.test/data/2017-12.zip?token=abc");
        assert_eq!(target_name(&url).unwrap(), "2017-12.zip");
    }

    #[test]
    fn test_target_name_percent_decoded() {
        let url = parse("https://example.test/data/report%202017.csv");
        assert_eq!(target_name(&url).unwrap(), "report_2017.csv");
    }

    #[test]
    fn test_target_name_encoded_separator_sanitized() {
        // %2F decodes to '/', which must not produce a path component.
        let url = parse("https://example.test/..%2F..%2Fetc%2Fpasswd");
        let name = target_name(&url).unwrap();
        assert!(!name.contains('/'), "separator leaked into name: {name}");
    }

    #[test]
    fn test_target_name_missing_segment() {
        assert_eq!(target_name(&parse("https://example.test/")), None);
        assert_eq!(target_name(&parse("https://example.test")), None);
    }

    #[test]
    fn test_target_name_segment_of_only_separators() {
        let url = parse("https://example.test/%2F%2F");
        assert_eq!(target_name(&url), None);
    }
}
