//! Cleanup target matching and deduplication.
//!
//! An event is a deletion target iff its title starts with one of the
//! fixed label prefixes the legacy tracker used when creating events.
//! Matching is exact and case-sensitive: a title a user has edited no
//! longer matches and the event is left alone.

use std::collections::HashSet;

use crate::event::CleanupEvent;

/// Title prefixes of events created by the legacy tracker.
pub const TRACKER_PATTERNS: [&str; 8] = [
    "PWD Expiration:",
    "ETA 9089 Filing:",
    "ETA 9089 Expiration:",
    "Ready to File:",
    "Recruitment Expires:",
    "I-140 Deadline:",
    "RFI Response Due:",
    "RFE Response Due:",
];

/// Returns true if a summary starts with any of the given prefixes.
pub fn matches_any_pattern(summary: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| summary.starts_with(p))
}

/// Filters events down to cleanup targets and drops duplicate ids.
///
/// The search terms overlap, so the same event routinely comes back from
/// several pattern queries. The first instance wins; input order is
/// preserved.
pub fn filter_and_dedupe(events: Vec<CleanupEvent>, patterns: &[&str]) -> Vec<CleanupEvent> {
    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|event| matches_any_pattern(&event.summary, patterns))
        .filter(|event| seen.insert(event.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventStart;
    use chrono::NaiveDate;

    fn event(id: &str, summary: &str) -> CleanupEvent {
        CleanupEvent::new(
            id,
            summary,
            EventStart::Date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
        )
    }

    #[test]
    fn matches_all_tracker_prefixes() {
        for pattern in TRACKER_PATTERNS {
            let summary = format!("{} Acme Corp", pattern);
            assert!(matches_any_pattern(&summary, &TRACKER_PATTERNS));
        }
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(!matches_any_pattern("pwd expiration: Acme", &TRACKER_PATTERNS));
        assert!(!matches_any_pattern("PWD EXPIRATION: Acme", &TRACKER_PATTERNS));
    }

    #[test]
    fn prefix_must_be_at_start() {
        assert!(!matches_any_pattern(
            "Reminder - PWD Expiration: Acme",
            &TRACKER_PATTERNS
        ));
    }

    #[test]
    fn non_matching_events_are_excluded() {
        let events = vec![event("a", "Team standup"), event("b", "Dentist")];
        assert!(filter_and_dedupe(events, &TRACKER_PATTERNS).is_empty());
    }

    #[test]
    fn duplicate_ids_collapse_to_first_instance() {
        let events = vec![
            event("a", "PWD Expiration: Acme"),
            event("a", "PWD Expiration: Acme"),
            event("b", "Unrelated"),
        ];
        let result = filter_and_dedupe(events, &TRACKER_PATTERNS);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "a");
    }

    #[test]
    fn order_is_first_seen() {
        let events = vec![
            event("x", "Ready to File: Beta LLC"),
            event("y", "I-140 Deadline: Gamma Inc"),
            event("x", "Ready to File: Beta LLC"),
        ];
        let result = filter_and_dedupe(events, &TRACKER_PATTERNS);
        let ids: Vec<&str> = result.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn same_id_matched_by_multiple_patterns_kept_once() {
        // A title can legitimately match only one prefix, but overlapping
        // free-text searches return the same event for different terms.
        let events = vec![
            event("a", "RFE Response Due: Acme"),
            event("a", "RFE Response Due: Acme"),
            event("a", "RFE Response Due: Acme"),
        ];
        assert_eq!(filter_and_dedupe(events, &TRACKER_PATTERNS).len(), 1);
    }
}
