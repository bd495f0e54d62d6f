use chrono::{TimeZone, Utc};

use super::*;

fn donation(id: &str, code: &str, status: DonationStatus) -> DonationRecord {
    DonationRecord {
        id: id.to_owned(),
        security_code: code.to_owned(),
        status,
        created_at: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap(),
        accepted_at: None,
        released_at: None,
        picked_up_at: None,
        expires_at: None,
        restaurant: None,
        osc_id: None,
        osc_name: None,
        packages: Vec::new(),
    }
}

fn sample() -> DonationsState {
    DonationsState {
        items: vec![
            donation("d1", "AB12CD", DonationStatus::Accepted),
            donation("d2", "ZX98QW", DonationStatus::Pending),
            donation("d3", "AB77EF", DonationStatus::Released),
            donation("d4", "QQ11RR", DonationStatus::PickedUp),
            donation("d5", "AB00DN", DonationStatus::Denied),
        ],
        ..DonationsState::default()
    }
}

fn ids(list: &[DonationRecord]) -> Vec<&str> {
    list.iter().map(|d| d.id.as_str()).collect()
}

#[test]
fn groups_split_by_status() {
    let groups = sample().groups();
    assert_eq!(ids(&groups.accepted), ["d1"]);
    assert_eq!(ids(&groups.pending), ["d2"]);
    assert_eq!(ids(&groups.delivered), ["d3", "d4"]);
    assert_eq!(groups.matched, 5);
}

#[test]
fn search_is_case_insensitive_substring_of_code() {
    let mut state = sample();
    state.filter.search = " ab ".to_owned();
    assert_eq!(ids(&state.filtered()), ["d1", "d3", "d5"]);
    assert!(state.filter.is_active());
}

#[test]
fn status_filter_is_exact() {
    let mut state = sample();
    state.filter.status = Some(DonationStatus::PickedUp);
    let groups = state.groups();
    assert_eq!(ids(&groups.delivered), ["d4"]);
    assert!(groups.accepted.is_empty());
    assert_eq!(groups.matched, 1);
}

#[test]
fn empty_filter_matches_everything() {
    let state = sample();
    assert!(!state.filter.is_active());
    assert_eq!(state.filtered().len(), 5);
}

#[test]
fn has_accepted_ignores_filter() {
    let mut state = sample();
    state.filter.status = Some(DonationStatus::Pending);
    assert!(state.has_accepted());

    state.items.retain(|d| d.status != DonationStatus::Accepted);
    assert!(!state.has_accepted());
}

#[test]
fn select_value_parses_to_status() {
    assert_eq!(DonationFilter::status_from_select("all"), None);
    assert_eq!(DonationFilter::status_from_select(""), None);
    assert_eq!(DonationFilter::status_from_select("picked_up"), Some(DonationStatus::PickedUp));
}

#[test]
fn filterable_statuses_round_trip_through_select_values() {
    for status in &FILTERABLE_STATUSES {
        assert_eq!(DonationFilter::status_from_select(status.as_str()).as_ref(), Some(status));
    }
}
