//! Tagged messages between the injected page script and the core
//!
//! Listeners are registered on a shared channel and removed again through
//! the `Subscription` they return.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// Tag posted by the injected script when the user asks to view a document
pub const DOCUMENT_VIEW_SUBMIT: &str = "recap-document-view-submit";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageMessage {
    pub tag: String,
    #[serde(default)]
    pub payload: Value,
}

impl PageMessage {
    pub fn new(tag: &str, payload: Value) -> Self {
        Self {
            tag: tag.to_string(),
            payload,
        }
    }

    /// The message the injected script posts for a document-view submission
    pub fn document_view_submit(form_id: &str, nonce: Uuid) -> Self {
        Self::new(
            DOCUMENT_VIEW_SUBMIT,
            serde_json::json!({ "id": form_id, "nonce": nonce.to_string() }),
        )
    }

    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    pub fn nonce(&self) -> Option<Uuid> {
        self.payload_str("nonce").and_then(|raw| Uuid::parse_str(raw).ok())
    }
}

#[derive(Debug, Clone)]
struct Listener {
    id: u64,
    tag: String,
    nonce: Option<Uuid>,
}

impl Listener {
    fn accepts(&self, message: &PageMessage) -> bool {
        message.tag == self.tag
            && match self.nonce {
                Some(expected) => message.nonce() == Some(expected),
                None => true,
            }
    }
}

#[derive(Debug, Default)]
struct Registry {
    listeners: RefCell<Vec<Listener>>,
    next_id: Cell<u64>,
}

/// Page-wide message channel
#[derive(Debug, Default, Clone)]
pub struct MessageChannel {
    registry: Rc<Registry>,
}

impl MessageChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for `tag`; when `nonce` is set, only messages echoing it are accepted
    pub fn subscribe(&self, tag: &str, nonce: Option<Uuid>) -> Subscription {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id + 1);
        self.registry.listeners.borrow_mut().push(Listener {
            id,
            tag: tag.to_string(),
            nonce,
        });
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// True when some live listener would take this message
    pub fn matches(&self, message: &PageMessage) -> bool {
        self.registry
            .listeners
            .borrow()
            .iter()
            .any(|listener| listener.accepts(message))
    }

    pub fn listener_count(&self) -> usize {
        self.registry.listeners.borrow().len()
    }
}

/// Handle to a registered listener. Dropping or disposing it unregisters.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn dispose(self) {}

    fn remove(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .listeners
                .borrow_mut()
                .retain(|listener| listener.id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}
