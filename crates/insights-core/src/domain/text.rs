//! Extraction of hashtags and mentions from post text.

use once_cell::sync::Lazy;
use regex::Regex;

static HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").expect("valid hashtag regex"));
static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w+)").expect("valid mention regex"));

/// Returns every `#tag` in `text`, without the leading `#`, in order of appearance.
#[must_use]
pub fn extract_hashtags(text: &str) -> Vec<String> {
    capture_all(&HASHTAG, text)
}

/// Returns every `@name` in `text`, without the leading `@`, in order of appearance.
#[must_use]
pub fn extract_mentions(text: &str) -> Vec<String> {
    capture_all(&MENTION, text)
}

fn capture_all(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_hashtags() {
        let text = "Launching today! #AI #startups and #AI again";
        assert_eq!(extract_hashtags(text), vec!["AI", "startups", "AI"]);
        assert!(extract_hashtags("no tags here").is_empty());
    }

    #[test]
    fn test_extract_mentions() {
        let text = "Thanks @jane_doe and @AcmeCorp!";
        assert_eq!(extract_mentions(text), vec!["jane_doe", "AcmeCorp"]);
    }

    #[test]
    fn test_hash_alone_is_not_a_tag() {
        assert!(extract_hashtags("# heading").is_empty());
    }
}
