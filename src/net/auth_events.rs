//! In-process fan-out of auth-state changes.
//!
//! Listeners are held by id; dropping the returned `Subscription` removes the
//! listener, so a torn-down consumer cannot be called again.

#[cfg(test)]
#[path = "auth_events_test.rs"]
mod auth_events_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::types::AuthChange;

pub type AuthListener = Rc<dyn Fn(AuthChange)>;

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    listeners: Vec<(u64, AuthListener)>,
}

/// Registry of auth-state listeners shared by clones.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: AuthListener) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, listener));
        Subscription { id, registry: Rc::downgrade(&self.inner) }
    }

    /// Deliver `change` to every listener registered at call time.
    ///
    /// The listener list is copied first so listeners may subscribe or
    /// unsubscribe while being notified.
    pub fn emit(&self, change: &AuthChange) {
        let listeners: Vec<AuthListener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(change.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle to a registered listener. Unsubscribes on drop.
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<RegistryInner>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}
