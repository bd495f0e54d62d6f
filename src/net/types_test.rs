use super::*;

// =============================================================
// DonationStatus
// =============================================================

#[test]
fn donation_status_parses_known_wire_values() {
    assert_eq!(DonationStatus::from("pending"), DonationStatus::Pending);
    assert_eq!(DonationStatus::from("picked_up"), DonationStatus::PickedUp);
    assert_eq!(DonationStatus::from("expired"), DonationStatus::Expired);
}

#[test]
fn donation_status_keeps_unknown_strings() {
    let status: DonationStatus = serde_json::from_str("\"on_hold\"").unwrap();
    assert_eq!(status, DonationStatus::Unknown("on_hold".to_owned()));
    assert_eq!(status.as_str(), "on_hold");
    assert_eq!(serde_json::to_string(&status).unwrap(), "\"on_hold\"");
}

#[test]
fn donation_status_delivered_covers_released_and_picked_up() {
    assert!(DonationStatus::Released.is_delivered());
    assert!(DonationStatus::PickedUp.is_delivered());
    assert!(!DonationStatus::Accepted.is_delivered());
}

// =============================================================
// Session
// =============================================================

#[test]
fn session_decodes_without_expiry() {
    let session: Session = serde_json::from_value(serde_json::json!({
        "user": { "id": "u1", "email": "chef@example.com" },
        "access_token": "at",
        "refresh_token": "rt"
    }))
    .unwrap();
    assert_eq!(session.user_id(), "u1");
    assert!(!session.is_expired_at(i64::MAX));
}

#[test]
fn session_expiry_is_inclusive() {
    let session = Session {
        user: User { id: "u1".to_owned(), email: None },
        access_token: "at".to_owned(),
        refresh_token: "rt".to_owned(),
        expires_at: Some(100),
    };
    assert!(!session.is_expired_at(99));
    assert!(session.is_expired_at(100));
}

// =============================================================
// Donation payloads
// =============================================================

#[test]
fn details_payload_flattens_packages() {
    let wire: DonationDetailsWire = serde_json::from_value(serde_json::json!({
        "id": "d1",
        "status": "pending",
        "created_at": "2026-10-16T10:00:00+00:00",
        "restaurant": "Cantina Boa",
        "security_code": "AB12CD",
        "expires_at": "2026-10-16T14:00:00+00:00",
        "packages": [
            {
                "id": "p1",
                "quantity": 3,
                "status": "awaiting_donation",
                "created_at": "2026-10-16T09:00:00+00:00",
                "total_kg": 1.5,
                "item": { "id": "i1", "name": "Rice", "description": "", "unit": "kg" }
            }
        ]
    }))
    .unwrap();

    let record = DonationRecord::from(wire);
    assert_eq!(record.status, DonationStatus::Pending);
    assert_eq!(record.restaurant.as_deref(), Some("Cantina Boa"));
    assert!(record.expires_at.is_some());
    assert_eq!(record.packages.len(), 1);
    assert_eq!(record.packages[0].item_name, "Rice");
    assert_eq!(record.packages[0].unit, "kg");
    assert!((record.total_kg() - 1.5).abs() < f64::EPSILON);
}

#[test]
fn rest_row_flattens_osc_and_package_links() {
    let wire: DonationRowWire = serde_json::from_value(serde_json::json!({
        "id": "d2",
        "restaurant_id": "r1",
        "osc_id": "o1",
        "security_code": "ZZ99",
        "status": "accepted",
        "created_at": "2026-10-15T08:00:00.123456+00:00",
        "accepted_at": "2026-10-15T09:00:00+00:00",
        "osc": { "name": "Casa Esperança" },
        "packages": [
            { "package": { "id": "p1", "quantity": 2, "label_code": "PKG-1", "total_kg": 0.8, "item": { "name": "Bread", "unit": "unit" } } },
            { "package": null }
        ]
    }))
    .unwrap();

    let record = DonationRecord::from(wire);
    assert_eq!(record.osc_name.as_deref(), Some("Casa Esperança"));
    assert_eq!(record.restaurant.as_deref(), Some("r1"));
    assert!(record.accepted_at.is_some());
    assert_eq!(record.packages.len(), 1);
    assert_eq!(record.packages[0].label_code.as_deref(), Some("PKG-1"));
}

#[test]
fn package_without_item_gets_empty_name() {
    let wire: DetailPackageWire = serde_json::from_value(serde_json::json!({ "id": "p9", "quantity": 1 })).unwrap();
    let pkg = PackageSnapshot::from(wire);
    assert!(pkg.item_name.is_empty());
    assert_eq!(pkg.total_kg, None);
}

#[test]
fn package_weight_is_derived_when_missing() {
    let by_unit: DetailPackageWire = serde_json::from_value(serde_json::json!({
        "id": "p1", "quantity": 4, "item": { "name": "Bread", "unit": "unit", "unit_to_kg": 0.5 }
    }))
    .unwrap();
    assert_eq!(PackageSnapshot::from(by_unit).total_kg, Some(2.0));

    let by_kg: DetailPackageWire = serde_json::from_value(serde_json::json!({
        "id": "p2", "quantity": 1.25, "item": { "name": "Rice", "unit": "kg" }
    }))
    .unwrap();
    assert_eq!(PackageSnapshot::from(by_kg).total_kg, Some(1.25));
}
