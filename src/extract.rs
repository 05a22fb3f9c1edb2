use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

// ── Constants ────────────────────────────────────────────────────────────────

/// Version name of the Google Photos shared-album pattern.
pub const GOOGLE_PHOTOS_V1: &str = "lh3-pw-v1";

const TOKEN_CLASS: &str = "[A-Za-z0-9_-]*";

// ── Built-in patterns ────────────────────────────────────────────────────────

static BUILTIN_PATTERNS: Lazy<Vec<ImagePattern>> = Lazy::new(|| {
    vec![ImagePattern::new(GOOGLE_PHOTOS_V1, "lh3.googleusercontent.com", "pw").unwrap()]
});

// ── Image pattern ────────────────────────────────────────────────────────────

/// A named, swappable description of where album images live inside the page.
///
/// Album pages embed image URLs as JSON string literals inside inline script
/// data, so the regex is anchored on the surrounding double quotes and the
/// captured group is the bare URL.
#[derive(Debug, Clone)]
pub struct ImagePattern {
    version: String,
    host: String,
    path_prefix: String,
    regex: Regex,
}

impl ImagePattern {
    pub fn new(
        version: impl Into<String>,
        host: &str,
        path_prefix: &str,
    ) -> Result<Self, regex::Error> {
        let host = host.trim_matches('/').to_string();
        let path_prefix = path_prefix.trim_matches('/').to_string();
        let regex = Regex::new(&format!(
            r#""(https://{}/{}/{})""#,
            regex::escape(&host),
            regex::escape(&path_prefix),
            TOKEN_CLASS
        ))?;
        Ok(Self {
            version: version.into(),
            host,
            path_prefix,
            regex,
        })
    }

    /// Looks up one of the built-in patterns by version name.
    pub fn by_version(version: &str) -> Option<ImagePattern> {
        BUILTIN_PATTERNS
            .iter()
            .find(|p| p.version == version)
            .cloned()
    }

    pub fn google_photos() -> ImagePattern {
        BUILTIN_PATTERNS[0].clone()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }
}

// ── Extraction outcome ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found(Vec<String>),
    /// Nothing matched and the page carried no script data worth matching.
    Empty,
    /// Nothing matched although the page embeds inline script data; the host
    /// markup has likely moved away from the pattern.
    PossibleDrift,
}

// ── Public API ───────────────────────────────────────────────────────────────

pub fn extract_album(html: &str, pattern: &ImagePattern) -> Extraction {
    classify(html, extract_image_urls(html, pattern))
}

/// Returns every distinct image URL in `html`, in order of first appearance.
pub fn extract_image_urls(html: &str, pattern: &ImagePattern) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut urls = Vec::new();

    for caps in pattern.regex.captures_iter(html) {
        let Some(url) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if seen.insert(url) {
            urls.push(url.to_string());
        }
    }

    urls
}

pub fn classify(html: &str, urls: Vec<String>) -> Extraction {
    if !urls.is_empty() {
        return Extraction::Found(urls);
    }
    if has_inline_script_data(html) {
        Extraction::PossibleDrift
    } else {
        Extraction::Empty
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn has_inline_script_data(html: &str) -> bool {
    if html.trim().is_empty() {
        return false;
    }

    let document = Html::parse_document(html);
    let script_sel = Selector::parse("script").unwrap();
    document
        .select(&script_sel)
        .any(|el| el.text().any(|t| !t.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const AABB: &str = "https://lh3.googleusercontent.com/pw/AAbb12_-";
    const ZZYY: &str = "https://lh3.googleusercontent.com/pw/ZZyy99";

    fn quoted(url: &str) -> String {
        format!("\"{}\"", url)
    }

    #[test]
    fn repeated_urls_are_deduplicated_in_first_seen_order() {
        let html = format!(
            "<script>AF_initDataCallback({{data:[{a},{a},[{z}],{a}]}});</script>",
            a = quoted(AABB),
            z = quoted(ZZYY)
        );

        let urls = extract_image_urls(&html, &ImagePattern::google_photos());

        assert_eq!(urls, vec![AABB.to_string(), ZZYY.to_string()]);
    }

    #[test]
    fn order_follows_first_occurrence_not_frequency() {
        let html = format!(
            "[{z},{a},{a},{a},{z}]",
            a = quoted(AABB),
            z = quoted(ZZYY)
        );

        let urls = extract_image_urls(&html, &ImagePattern::google_photos());

        assert_eq!(urls, vec![ZZYY.to_string(), AABB.to_string()]);
    }

    #[test]
    fn extraction_is_deterministic() {
        let html = format!("{} {} {}", quoted(ZZYY), quoted(AABB), quoted(ZZYY));
        let pattern = ImagePattern::google_photos();

        assert_eq!(
            extract_image_urls(&html, &pattern),
            extract_image_urls(&html, &pattern)
        );
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let pattern = ImagePattern::google_photos();
        assert!(extract_image_urls("", &pattern).is_empty());
        assert_eq!(extract_album("", &pattern), Extraction::Empty);
    }

    #[test]
    fn tokens_with_disallowed_characters_are_excluded() {
        let html = concat!(
            r#"["https://lh3.googleusercontent.com/pw/AB CD","#,
            r#""https://lh3.googleusercontent.com/pw/AB/CD","#,
            r#""https://lh3.googleusercontent.com/pw/AB.jpg"]"#
        );

        assert!(extract_image_urls(html, &ImagePattern::google_photos()).is_empty());
    }

    #[test]
    fn unquoted_and_truncated_urls_are_ignored() {
        let html = concat!(
            "see https://lh3.googleusercontent.com/pw/Unquoted1 here ",
            r#""https://lh3.googleusercontent.com/pw/Truncated"#
        );

        assert!(extract_image_urls(html, &ImagePattern::google_photos()).is_empty());
    }

    #[test]
    fn bare_prefix_literal_is_extracted() {
        let html = r#"["https://lh3.googleusercontent.com/pw/","https://lh3.googleusercontent.com/pw/"]"#;

        assert_eq!(
            extract_image_urls(html, &ImagePattern::google_photos()),
            vec!["https://lh3.googleusercontent.com/pw/".to_string()]
        );
    }

    #[test]
    fn other_hosts_and_prefixes_do_not_match() {
        let html = concat!(
            r#""https://lh4.googleusercontent.com/pw/Abc","#,
            r#""https://lh3.googleusercontent.com/a/Abc","#,
            r#""http://lh3.googleusercontent.com/pw/Abc","#,
            r#""https://lh3xgoogleusercontent.com/pw/Abc""#
        );

        assert!(extract_image_urls(html, &ImagePattern::google_photos()).is_empty());
    }

    #[test]
    fn adjacent_literals_are_matched_separately() {
        let html = format!("{}{}", quoted(AABB), quoted(ZZYY));

        let urls = extract_image_urls(&html, &ImagePattern::google_photos());

        assert_eq!(urls, vec![AABB.to_string(), ZZYY.to_string()]);
    }

    #[test]
    fn custom_pattern_escapes_host_and_prefix() {
        let pattern = ImagePattern::new("test-v1", "img.example.com", "/albums/").unwrap();
        let html = r#""https://img.example.com/albums/x1" "https://imgxexample.com/albums/x2""#;

        assert_eq!(pattern.path_prefix(), "albums");
        assert_eq!(
            extract_image_urls(html, &pattern),
            vec!["https://img.example.com/albums/x1".to_string()]
        );
    }

    #[test]
    fn builtin_patterns_are_looked_up_by_version() {
        let pattern = ImagePattern::by_version(GOOGLE_PHOTOS_V1).unwrap();
        assert_eq!(pattern.host(), "lh3.googleusercontent.com");
        assert_eq!(pattern.path_prefix(), "pw");
        assert!(ImagePattern::by_version("lh3-pw-v0").is_none());
    }

    #[test]
    fn script_data_without_matches_signals_drift() {
        let html = r#"<html><head><script>window.data = ["https://cdn.example.com/photo"];</script></head><body></body></html>"#;

        assert_eq!(
            extract_album(html, &ImagePattern::google_photos()),
            Extraction::PossibleDrift
        );
    }

    #[test]
    fn plain_page_without_matches_is_empty() {
        let html = "<html><body><p>This album is private.</p><script></script></body></html>";

        assert_eq!(
            extract_album(html, &ImagePattern::google_photos()),
            Extraction::Empty
        );
    }

    #[test]
    fn matches_are_reported_as_found() {
        let html = format!("<script>[{}]</script>", quoted(AABB));

        assert_eq!(
            extract_album(&html, &ImagePattern::google_photos()),
            Extraction::Found(vec![AABB.to_string()])
        );
    }
}
