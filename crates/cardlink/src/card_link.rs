//! Card link interaction adapter
//!
//! Translates pointer and keyboard events on a container into navigation
//! requests for the container's inner link.
//!
//! A pointer gesture is tracked with a single pending press instant:
//! armed on a primary-button press, cleared on every primary-button
//! release. The release only counts as a click when it is quick, nothing is
//! selected, and it did not land on a nested interactive element.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use cardlink_core::clock::{Clock, SystemClock};
use cardlink_core::dom::{Dom, NodeId};
use cardlink_core::events::{buttons, event_types, Event, EventContext, KeyCode};
use cardlink_core::selector::Selector;
use tracing::{debug, trace, warn};

use crate::config::CardLinkConfig;
use crate::error::Result;
use crate::props::CardLinkProps;

/// Card link adapter bound to one container
pub struct CardLink {
    config: CardLinkConfig,
    /// `None` when the configured link selector failed to parse
    link_selector: Option<Selector>,
    clock: Arc<dyn Clock>,
    /// Instant of the primary-button press awaiting its release
    pressed_at: Mutex<Option<Instant>>,
}

impl CardLink {
    /// Create an adapter using the system clock
    ///
    /// An unparsable link selector is logged and leaves the adapter unable
    /// to resolve a destination; use [`CardLink::try_new`] to reject it instead.
    pub fn new(config: CardLinkConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an adapter, failing if the link selector does not parse
    pub fn try_new(config: CardLinkConfig) -> Result<Self> {
        let selector = Selector::parse(&config.link_selector)?;
        Ok(Self::from_parts(config, Some(selector), Arc::new(SystemClock)))
    }

    /// Create an adapter with a custom time source
    pub fn with_clock(config: CardLinkConfig, clock: Arc<dyn Clock>) -> Self {
        let selector = match Selector::parse(&config.link_selector) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!(
                    "Card link selector '{}' is invalid, navigation disabled: {}",
                    config.link_selector, e
                );
                None
            }
        };
        Self::from_parts(config, selector, clock)
    }

    fn from_parts(
        config: CardLinkConfig,
        link_selector: Option<Selector>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            link_selector,
            clock,
            pressed_at: Mutex::new(None),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &CardLinkConfig {
        &self.config
    }

    /// Check if the card is disabled
    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    /// Check if a primary-button press is awaiting its release
    pub fn is_armed(&self) -> bool {
        self.pressed_at().is_some()
    }

    /// `-1` when disabled, `0` otherwise
    pub fn tabindex(&self) -> i32 {
        if self.config.disabled {
            -1
        } else {
            0
        }
    }

    /// Derive a fresh props bundle for the container
    pub fn props(self: &Arc<Self>) -> CardLinkProps {
        CardLinkProps::new(Arc::clone(self))
    }

    /// Route an event to the matching handler
    pub fn handle_event(&self, event: &mut Event, ctx: &EventContext<'_>) {
        match event.event_type {
            event_types::MOUSE_DOWN => self.handle_mouse_down(event),
            event_types::MOUSE_UP => self.handle_mouse_up(event, ctx),
            event_types::KEY_DOWN => self.handle_key_down(event, ctx),
            _ => {}
        }
    }

    /// Arm the click gesture on a primary-button press
    pub fn handle_mouse_down(&self, event: &Event) {
        if self.config.disabled || event.button() != Some(buttons::PRIMARY) {
            return;
        }
        self.set_pressed_at(Some(self.clock.now()));
    }

    /// Complete the click gesture on a primary-button release
    pub fn handle_mouse_up(&self, event: &Event, ctx: &EventContext<'_>) {
        if self.config.disabled || event.button() != Some(buttons::PRIMARY) {
            return;
        }
        let Some(pressed_at) = self.take_pressed_at() else {
            return;
        };

        let elapsed = self.clock.now().saturating_duration_since(pressed_at);
        if elapsed >= self.config.click_threshold {
            trace!("Card link press held {:?}, not a click", elapsed);
            return;
        }
        if !ctx.selection.is_empty() {
            trace!("Card link release with active text selection, ignoring");
            return;
        }
        if ctx
            .dom
            .closest(event.target, Selector::interactive())
            .is_some()
        {
            trace!("Card link release on nested interactive element, ignoring");
            return;
        }

        self.navigate(event.current_target, ctx.dom);
    }

    /// Activate the card with Enter or Space
    pub fn handle_key_down(&self, event: &mut Event, ctx: &EventContext<'_>) {
        if self.config.disabled {
            return;
        }
        if !matches!(event.key(), Some(KeyCode::ENTER) | Some(KeyCode::SPACE)) {
            return;
        }

        event.prevent_default();
        self.navigate(event.current_target, ctx.dom);
    }

    /// The `href` of the first descendant of `container` matching the link selector
    ///
    /// Returns `None` when no link matches or its `href` is missing or empty.
    pub fn resolve_href(&self, container: NodeId, dom: &dyn Dom) -> Option<String> {
        let selector = self.link_selector.as_ref()?;
        let link = dom.query_selector(container, selector)?;
        dom.attribute(link, "href")
            .filter(|href| !href.is_empty())
            .map(str::to_string)
    }

    fn navigate(&self, container: NodeId, dom: &dyn Dom) {
        let Some(href) = self.resolve_href(container, dom) else {
            trace!("Card link has no inner link href, nothing to navigate to");
            return;
        };

        debug!("Card link navigating to {}", href);
        if let Some(ref on_navigate) = self.config.on_navigate {
            on_navigate(&href);
        }
    }

    fn pressed_at(&self) -> Option<Instant> {
        *self.pressed_at.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_pressed_at(&self, instant: Option<Instant>) {
        *self.pressed_at.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }

    fn take_pressed_at(&self) -> Option<Instant> {
        self.pressed_at
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }
}
