//! Pure filter predicates.
//!
//! An empty filter string imposes no constraint and always passes.
//! Substring matches are case-insensitive.

pub fn sender_matches(filter: &str, from_header: &str) -> bool {
    filter.is_empty() || from_header.to_lowercase().contains(&filter.to_lowercase())
}

pub fn keyword_matches(filter: &str, body: &str) -> bool {
    filter.is_empty() || body.to_lowercase().contains(&filter.to_lowercase())
}

/// Closed lower bound on the message timestamp, in seconds since the epoch.
/// A missing timestamp passes: when the Date header cannot be read we fail
/// open rather than drop the message.
pub fn within_window(timestamp: Option<i64>, threshold: i64) -> bool {
    match timestamp {
        Some(ts) => ts >= threshold,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_always_pass() {
        assert!(sender_matches("", "anyone@example.com"));
        assert!(sender_matches("", ""));
        assert!(keyword_matches("", "any body"));
        assert!(keyword_matches("", ""));
    }

    #[test]
    fn sender_substring_is_case_insensitive() {
        assert!(sender_matches("alerts@", "Alerts@Example.COM"));
        assert!(sender_matches("ALERTS@", "noreply <alerts@example.com>"));
        assert!(!sender_matches("alerts@", "billing@example.com"));
    }

    #[test]
    fn keyword_substring_is_case_insensitive() {
        assert!(keyword_matches("urgent", "please review URGENT ticket"));
        assert!(!keyword_matches("urgent", "please review ticket"));
    }

    #[test]
    fn keyword_never_matches_empty_body() {
        assert!(!keyword_matches("urgent", ""));
    }

    #[test]
    fn window_is_a_closed_lower_bound() {
        assert!(within_window(Some(100), 100));
        assert!(within_window(Some(101), 100));
        assert!(!within_window(Some(99), 100));
    }

    #[test]
    fn missing_timestamp_fails_open() {
        assert!(within_window(None, i64::MAX));
    }
}
