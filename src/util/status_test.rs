use std::collections::HashSet;

use super::*;

const KNOWN: [DonationStatus; 6] = [
    DonationStatus::Pending,
    DonationStatus::Accepted,
    DonationStatus::Released,
    DonationStatus::PickedUp,
    DonationStatus::Denied,
    DonationStatus::Expired,
];

#[test]
fn known_statuses_have_distinct_non_empty_label_tone_pairs() {
    let mut seen = HashSet::new();
    for status in &KNOWN {
        let badge = project_status(status);
        assert!(!badge.label.is_empty(), "{status:?} has an empty label");
        assert!(seen.insert((badge.label.to_string(), badge.tone)), "{status:?} duplicates another badge");
    }
}

#[test]
fn pending_is_a_warning() {
    let badge = project_status(&DonationStatus::Pending);
    assert_eq!(badge.label, "Awaiting OSC response");
    assert_eq!(badge.tone, Tone::Warning);
    assert_eq!(badge.icon, StatusIcon::Clock);
}

#[test]
fn delivered_statuses_are_successes() {
    assert_eq!(project_status(&DonationStatus::Released).tone, Tone::Success);
    assert_eq!(project_status(&DonationStatus::PickedUp).tone, Tone::Success);
}

#[test]
fn denied_is_danger_and_expired_is_neutral() {
    assert_eq!(project_status(&DonationStatus::Denied).tone, Tone::Danger);
    assert_eq!(project_status(&DonationStatus::Expired).tone, Tone::Neutral);
}

#[test]
fn unknown_status_falls_back_to_raw_string() {
    let badge = project_status(&DonationStatus::from("awaiting_invoice"));
    assert_eq!(badge.label, "awaiting_invoice");
    assert_eq!(badge.tone, Tone::Neutral);
    assert_eq!(badge.icon, StatusIcon::AlertCircle);
}

#[test]
fn tone_classes_are_distinct() {
    let classes: HashSet<_> = [Tone::Warning, Tone::Info, Tone::Success, Tone::Danger, Tone::Neutral]
        .into_iter()
        .map(Tone::css_class)
        .collect();
    assert_eq!(classes.len(), 5);
}
