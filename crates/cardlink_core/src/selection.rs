//! Text selection state
//!
//! A press-and-drag inside a card selects text rather than clicking it.
//! Handlers read the current selection through the [`Selection`] trait so
//! hosts can back it with whatever tracks selection on their side.

/// Read access to the current text selection
pub trait Selection {
    /// The currently selected text, empty when nothing is selected
    fn selected_text(&self) -> &str;

    /// Check if nothing is selected
    fn is_empty(&self) -> bool {
        self.selected_text().is_empty()
    }
}

/// Text selection value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSelection {
    /// The currently selected text (if any)
    pub text: Option<String>,
}

impl TextSelection {
    /// Create an empty selection
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a new selection
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.text = None;
    }
}

impl Selection for TextSelection {
    fn selected_text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection() {
        let selection = TextSelection::empty();
        assert!(Selection::is_empty(&selection));
        assert_eq!(selection.selected_text(), "");
    }

    #[test]
    fn test_selection_with_empty_string_is_empty() {
        let selection = TextSelection::new("");
        assert_eq!(selection.text.as_deref(), Some(""));
        assert!(Selection::is_empty(&selection));
    }

    #[test]
    fn test_clear() {
        let mut selection = TextSelection::new("card title");
        assert!(!Selection::is_empty(&selection));
        assert_eq!(selection.selected_text(), "card title");

        selection.clear();
        assert!(Selection::is_empty(&selection));
        assert_eq!(selection.text, None);
    }
}
