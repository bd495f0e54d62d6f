use super::*;

#[test]
fn error_toast_uses_server_message() {
    let toast = Toast::error("Could not release donation", &ApiError::new(Some(409), "Donation is not accepted"));
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Donation is not accepted");
    assert_eq!(toast.class(), "toast toast--error");
}

#[test]
fn error_toast_falls_back_to_generic_hint() {
    let toast = Toast::error("Could not release donation", &ApiError::new(None, "   "));
    assert_eq!(toast.message, GENERIC_FAILURE);
}

#[test]
fn success_toast_keeps_text() {
    let toast = Toast::success("Donation released!", "Hand the packages to the OSC.");
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.title, "Donation released!");
    assert_eq!(toast.class(), "toast toast--success");
}
