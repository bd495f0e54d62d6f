use std::cell::Cell;

use super::*;
use crate::net::types::AuthEvent;

fn signed_out() -> AuthChange {
    AuthChange { event: AuthEvent::SignedOut, session: None }
}

#[test]
fn emit_reaches_every_listener() {
    let registry = ListenerRegistry::new();
    let hits = Rc::new(Cell::new(0));

    let h1 = Rc::clone(&hits);
    let _a = registry.subscribe(Rc::new(move |_| h1.set(h1.get() + 1)));
    let h2 = Rc::clone(&hits);
    let _b = registry.subscribe(Rc::new(move |_| h2.set(h2.get() + 1)));

    registry.emit(&signed_out());
    assert_eq!(hits.get(), 2);
}

#[test]
fn unsubscribe_stops_delivery() {
    let registry = ListenerRegistry::new();
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    let sub = registry.subscribe(Rc::new(move |_| h.set(h.get() + 1)));

    sub.unsubscribe();
    registry.emit(&signed_out());

    assert_eq!(hits.get(), 0);
    assert!(registry.is_empty());
}

#[test]
fn dropping_subscription_only_removes_its_own_listener() {
    let registry = ListenerRegistry::new();
    let first = registry.subscribe(Rc::new(|_| {}));
    let _second = registry.subscribe(Rc::new(|_| {}));

    drop(first);
    assert_eq!(registry.len(), 1);
}

#[test]
fn subscription_outliving_registry_drops_cleanly() {
    let registry = ListenerRegistry::new();
    let sub = registry.subscribe(Rc::new(|_| {}));
    drop(registry);
    drop(sub);
}
