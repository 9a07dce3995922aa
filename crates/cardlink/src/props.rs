//! Attribute and handler bundle for the card container
//!
//! A [`CardLinkProps`] is derived fresh from a [`CardLink`] each time the
//! host renders. It carries the container's `tabindex` and `role` and
//! binds the adapter's handlers under `mousedown`, `mouseup` and `keydown`.

use std::sync::Arc;

use cardlink_core::dom::{Document, NodeId};
use cardlink_core::events::{event_name, event_types, EventDispatcher, EventType};

use crate::card_link::CardLink;

/// Role announced for the container
pub const ROLE_LINK: &str = "link";

/// Event types the adapter handles on the container
const HANDLED_EVENTS: [EventType; 3] = [
    event_types::MOUSE_DOWN,
    event_types::MOUSE_UP,
    event_types::KEY_DOWN,
];

/// Derived container props
#[derive(Clone)]
pub struct CardLinkProps {
    /// `-1` when disabled, `0` otherwise
    pub tabindex: i32,
    /// Always `"link"`
    pub role: &'static str,
    card_link: Arc<CardLink>,
}

impl CardLinkProps {
    pub(crate) fn new(card_link: Arc<CardLink>) -> Self {
        Self {
            tabindex: card_link.tabindex(),
            role: ROLE_LINK,
            card_link,
        }
    }

    /// Attribute name/value pairs for the container
    pub fn attributes(&self) -> [(&'static str, String); 2] {
        [
            ("tabindex", self.tabindex.to_string()),
            ("role", self.role.to_string()),
        ]
    }

    /// DOM names of the bound events
    pub fn event_names(&self) -> impl Iterator<Item = &'static str> {
        HANDLED_EVENTS.into_iter().filter_map(event_name)
    }

    /// Bind the adapter's handlers to `container`
    pub fn attach(&self, dispatcher: &mut EventDispatcher, container: NodeId) {
        for event_type in HANDLED_EVENTS {
            let card_link = Arc::clone(&self.card_link);
            dispatcher.register(container, event_type, move |event, ctx| {
                card_link.handle_event(event, ctx);
            });
        }
    }

    /// Write `tabindex` and `role` onto `container`
    pub fn apply_attributes(&self, doc: &mut Document, container: NodeId) {
        for (name, value) in self.attributes() {
            doc.set_attribute(container, name, value);
        }
    }
}

impl std::fmt::Debug for CardLinkProps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardLinkProps")
            .field("tabindex", &self.tabindex)
            .field("role", &self.role)
            .field("events", &self.event_names().collect::<Vec<_>>())
            .finish()
    }
}
