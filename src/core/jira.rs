use std::sync::OnceLock;

use regex::Regex;

/// Anchored, case-insensitive ticket-key pattern: "Xen" followed by one or
/// more digits and nothing else.
fn issue_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^xen\d+$").expect("issue key pattern"))
}

/// Finds the first build tag that is a ticket key.
///
/// Whole-tag matches only ("Xenomorph" does not match); the tag is returned
/// with its original casing. `None` when no tag matches.
pub fn extract_issue_key(tags: &[String]) -> Option<&str> {
    tags.iter()
        .map(String::as_str)
        .find(|tag| issue_key_pattern().is_match(tag))
}

/// Whether a workflow status name represents completion.
pub fn is_done(status: &str) -> bool {
    status.eq_ignore_ascii_case("done")
}
