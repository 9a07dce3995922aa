//! Event dispatch system
//!
//! Pointer and keyboard events delivered to elements of a [`Dom`], with
//! bubbling from the target element up through its ancestors.

use rustc_hash::FxHashMap;

use crate::dom::{Dom, NodeId};
use crate::selection::Selection;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const MOUSE_DOWN: EventType = 1;
    pub const MOUSE_UP: EventType = 2;
    pub const KEY_DOWN: EventType = 20;
}

/// DOM event name for an event type (`mousedown`, `mouseup`, `keydown`)
pub const fn event_name(event_type: EventType) -> Option<&'static str> {
    match event_type {
        event_types::MOUSE_DOWN => Some("mousedown"),
        event_types::MOUSE_UP => Some("mouseup"),
        event_types::KEY_DOWN => Some("keydown"),
        _ => None,
    }
}

/// Pointer button identifiers, numbered as `MouseEvent.button`
pub mod buttons {
    /// Main button, usually the left one
    pub const PRIMARY: u8 = 0;
    /// Wheel or middle button
    pub const AUXILIARY: u8 = 1;
    /// Usually the right button
    pub const SECONDARY: u8 = 2;
}

/// A UI event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    /// Element the event was originally delivered to
    pub target: NodeId,
    /// Element whose handler is currently running
    pub current_target: NodeId,
    pub data: EventData,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

/// Event-specific data
#[derive(Clone, Debug)]
pub enum EventData {
    Pointer { button: u8 },
    Key { key: KeyCode },
    None,
}

/// Virtual key codes (platform-agnostic)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);
}

impl Event {
    /// Create an event targeted at `target`
    pub fn new(event_type: EventType, target: NodeId, data: EventData) -> Self {
        Self {
            event_type,
            target,
            current_target: target,
            data,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Pointer press on `target`
    pub fn mouse_down(target: NodeId, button: u8) -> Self {
        Self::new(
            event_types::MOUSE_DOWN,
            target,
            EventData::Pointer { button },
        )
    }

    /// Pointer release on `target`
    pub fn mouse_up(target: NodeId, button: u8) -> Self {
        Self::new(
            event_types::MOUSE_UP,
            target,
            EventData::Pointer { button },
        )
    }

    /// Key press on `target`
    pub fn key_down(target: NodeId, key: KeyCode) -> Self {
        Self::new(event_types::KEY_DOWN, target, EventData::Key { key })
    }

    /// The pointer button, if this is a pointer event
    pub fn button(&self) -> Option<u8> {
        match self.data {
            EventData::Pointer { button } => Some(button),
            _ => None,
        }
    }

    /// The key code, if this is a keyboard event
    pub fn key(&self) -> Option<KeyCode> {
        match self.data {
            EventData::Key { key } => Some(key),
            _ => None,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Host surfaces readable from inside an event handler
#[derive(Clone, Copy)]
pub struct EventContext<'a> {
    pub dom: &'a dyn Dom,
    pub selection: &'a dyn Selection,
}

impl<'a> EventContext<'a> {
    pub fn new(dom: &'a dyn Dom, selection: &'a dyn Selection) -> Self {
        Self { dom, selection }
    }
}

/// Event handler function type
pub type EventHandler = Box<dyn Fn(&mut Event, &EventContext<'_>) + Send + Sync>;

/// Dispatches events to registered handlers
pub struct EventDispatcher {
    handlers: FxHashMap<(NodeId, EventType), Vec<EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Register an event handler for an element and event type
    pub fn register<F>(&mut self, node: NodeId, event_type: EventType, handler: F)
    where
        F: Fn(&mut Event, &EventContext<'_>) + Send + Sync + 'static,
    {
        self.handlers
            .entry((node, event_type))
            .or_default()
            .push(Box::new(handler));
    }

    /// Number of handlers registered for an element and event type
    pub fn handler_count(&self, node: NodeId, event_type: EventType) -> usize {
        self.handlers
            .get(&(node, event_type))
            .map_or(0, |handlers| handlers.len())
    }

    /// Dispatch an event, bubbling from its target to the root
    pub fn dispatch(&self, event: &mut Event, ctx: &EventContext<'_>) {
        let mut current = Some(event.target);

        while let Some(node) = current {
            if event.propagation_stopped {
                break;
            }
            event.current_target = node;

            if let Some(handlers) = self.handlers.get(&(node, event.event_type)) {
                for handler in handlers {
                    if event.propagation_stopped {
                        break;
                    }
                    handler(event, ctx);
                }
            }

            current = ctx.dom.parent(node);
        }

        // Leave current_target on the original target once dispatch is done
        event.current_target = event.target;
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{element, Document};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_event_name() {
        assert_eq!(event_name(event_types::MOUSE_DOWN), Some("mousedown"));
        assert_eq!(event_name(event_types::MOUSE_UP), Some("mouseup"));
        assert_eq!(event_name(event_types::KEY_DOWN), Some("keydown"));
        assert_eq!(event_name(999), None);
    }

    #[test]
    fn test_dispatch_bubbles_to_ancestors() {
        let mut doc = Document::new();
        let card = doc.create_element("div");
        let button = doc.create_element("button");
        doc.append_child(card, button);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(card, event_types::MOUSE_UP, move |event, _ctx| {
            seen_clone
                .lock()
                .unwrap()
                .push((event.target, event.current_target));
        });

        let mut event = Event::mouse_up(button, buttons::PRIMARY);
        dispatcher.dispatch(&mut event, &doc.context());

        assert_eq!(*seen.lock().unwrap(), vec![(button, card)]);
        assert_eq!(event.current_target, button);
    }

    #[test]
    fn test_stop_propagation_halts_bubbling() {
        let mut doc = Document::new();
        let card = doc.insert(element("div").child(element("a").attr("href", "/x")));
        let link = doc.children(card)[0];

        let reached_card = Arc::new(Mutex::new(false));
        let reached_clone = reached_card.clone();

        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(link, event_types::MOUSE_UP, |event, _ctx| {
            event.stop_propagation();
        });
        dispatcher.register(card, event_types::MOUSE_UP, move |_event, _ctx| {
            *reached_clone.lock().unwrap() = true;
        });

        let mut event = Event::mouse_up(link, buttons::PRIMARY);
        dispatcher.dispatch(&mut event, &doc.context());

        assert!(!*reached_card.lock().unwrap());
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let mut doc = Document::new();
        let card = doc.create_element("div");

        let order = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        for i in 0..2 {
            let order = order.clone();
            dispatcher.register(card, event_types::KEY_DOWN, move |_event, _ctx| {
                order.lock().unwrap().push(i);
            });
        }
        assert_eq!(dispatcher.handler_count(card, event_types::KEY_DOWN), 2);
        assert_eq!(dispatcher.handler_count(card, event_types::MOUSE_UP), 0);

        let mut event = Event::key_down(card, KeyCode::ENTER);
        dispatcher.dispatch(&mut event, &doc.context());
        assert_eq!(*order.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_event_accessors() {
        let mut doc = Document::new();
        let node = doc.create_element("div");

        let event = Event::mouse_down(node, buttons::SECONDARY);
        assert_eq!(event.button(), Some(buttons::SECONDARY));
        assert_eq!(event.key(), None);

        let event = Event::key_down(node, KeyCode::SPACE);
        assert_eq!(event.key(), Some(KeyCode::SPACE));
        assert_eq!(event.button(), None);
    }
}
