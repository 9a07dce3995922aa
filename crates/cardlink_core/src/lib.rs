//! Card Link Core
//!
//! Host-side primitives consumed by the card link adapter:
//!
//! - **Events**: pointer and keyboard events with bubbling dispatch
//! - **Element Tree**: a minimal DOM with parent/child traversal and attributes
//! - **Selectors**: a CSS selector subset for `closest` / `querySelector` lookups
//! - **Selection**: the current text selection
//! - **Clocks**: monotonic and manually driven time sources
//!
//! # Example
//!
//! ```rust
//! use cardlink_core::dom::{element, Document, Dom};
//! use cardlink_core::selector::Selector;
//!
//! let mut doc = Document::new();
//! let card = doc.insert(
//!     element("article")
//!         .attr("class", "card")
//!         .child(element("h3"))
//!         .child(element("a").attr("href", "/posts/1")),
//! );
//!
//! let links = Selector::parse("a[href]").unwrap();
//! let link = doc.query_selector(card, &links).unwrap();
//! assert_eq!(doc.attribute(link, "href"), Some("/posts/1"));
//! ```

pub mod clock;
pub mod dom;
pub mod error;
pub mod events;
pub mod selection;
pub mod selector;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dom::{element, Document, Dom, ElementSpec, NodeId};
pub use error::{Result, SelectorError};
pub use events::{Event, EventContext, EventData, EventDispatcher, EventType, KeyCode};
pub use selection::{Selection, TextSelection};
pub use selector::Selector;
