//! Card Link
//!
//! Makes a whole container ("card") behave as the link nested inside it,
//! while nested links, buttons and form controls keep their own clicks.
//!
//! - A quick primary-button press/release on the card reports the inner
//!   link's `href` through `on_navigate`
//! - Long presses and drag-to-select gestures are ignored
//! - Enter and Space activate the card from the keyboard
//! - The card is exposed as `role="link"` and joins the tab order unless disabled
//!
//! The adapter never navigates itself. It only reports the destination.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use cardlink::{CardLink, CardLinkConfig};
//! use cardlink_core::dom::{element, Document};
//! use cardlink_core::events::{buttons, Event, EventDispatcher};
//!
//! let mut doc = Document::new();
//! let card = doc.insert(
//!     element("div")
//!         .child(element("h3"))
//!         .child(element("a").attr("href", "/posts/1")),
//! );
//!
//! let visited = Arc::new(Mutex::new(Vec::new()));
//! let sink = visited.clone();
//! let card_link = Arc::new(CardLink::new(
//!     CardLinkConfig::default().on_navigate(move |href| sink.lock().unwrap().push(href.to_string())),
//! ));
//!
//! let mut dispatcher = EventDispatcher::new();
//! card_link.props().attach(&mut dispatcher, card);
//!
//! let title = doc.insert_into(card, element("p"));
//! dispatcher.dispatch(&mut Event::mouse_down(title, buttons::PRIMARY), &doc.context());
//! dispatcher.dispatch(&mut Event::mouse_up(title, buttons::PRIMARY), &doc.context());
//!
//! assert_eq!(*visited.lock().unwrap(), vec!["/posts/1".to_string()]);
//! ```

pub mod card_link;
pub mod config;
pub mod error;
pub mod props;

pub use card_link::CardLink;
pub use config::{CardLinkConfig, CardLinkOptions, NavigateHandler};
pub use error::{CardLinkError, Result};
pub use props::CardLinkProps;
