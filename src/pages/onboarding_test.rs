use super::*;

#[test]
fn registration_normalizes_phone_and_cep() {
    assert_eq!(
        validate_registration("  Cantina Boa ", "(11) 99999-0000", "01001-000"),
        Ok(RestaurantRegistration {
            name: "Cantina Boa".to_owned(),
            phone: "11999990000".to_owned(),
            cep: "01001000".to_owned(),
        })
    );
}

#[test]
fn registration_requires_name() {
    assert_eq!(validate_registration("  ", "11999990000", "01001000"), Err("Enter the restaurant name."));
}

#[test]
fn registration_checks_phone_length() {
    assert_eq!(validate_registration("Cantina", "9999-0000", "01001000"), Err("Enter a phone number with area code."));
    assert!(validate_registration("Cantina", "(11) 3333-0000", "01001000").is_ok());
}

#[test]
fn registration_checks_cep_length() {
    assert_eq!(validate_registration("Cantina", "11999990000", "0100-100"), Err("Enter an 8-digit postal code (CEP)."));
}
