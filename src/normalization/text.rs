use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static HEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*m(?:etres)?").expect("hardcoded regex pattern is valid")
});

/// Collapse whitespace runs (including newlines) to single spaces and trim.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Height in metres from text like "Height: 850m" or "850 metres".
pub fn extract_height(text: &str) -> Option<i32> {
    HEIGHT_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_whitespace() {
        assert_eq!(clean_text("  Rocky\n\t  and   steep  "), "Rocky and steep");
        assert_eq!(clean_text("\n \t"), "");
    }

    #[test]
    fn height_variants() {
        assert_eq!(extract_height("Height: 850m"), Some(850));
        assert_eq!(extract_height("Height: 850 metres"), Some(850));
        assert_eq!(extract_height("HEIGHT: 627 M (2057ft)"), Some(627));
        assert_eq!(extract_height("Height: unknown"), None);
    }
}
