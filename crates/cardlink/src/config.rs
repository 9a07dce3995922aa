//! Card link configuration
//!
//! [`CardLinkConfig`] is built in code. [`CardLinkOptions`] is the
//! serializable part of it (everything but the navigation callback) and can
//! be loaded from TOML:
//!
//! ```toml
//! link_selector = "a.card-title"
//! click_threshold = 250
//! disabled = false
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default selector for the inner link
pub const DEFAULT_LINK_SELECTOR: &str = "a";

/// Default maximum press duration still counted as a click, in milliseconds
pub const DEFAULT_CLICK_THRESHOLD_MS: u64 = 200;

/// Callback receiving the resolved `href`
pub type NavigateHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Card link configuration
#[derive(Clone)]
pub struct CardLinkConfig {
    /// Selector locating the inner link within the container
    pub link_selector: String,
    /// Presses held this long or longer are not clicks
    pub click_threshold: Duration,
    /// Suppresses every handler and removes the card from the tab order
    pub disabled: bool,
    /// Receives the destination when the card is activated
    pub on_navigate: Option<NavigateHandler>,
}

impl Default for CardLinkConfig {
    fn default() -> Self {
        Self {
            link_selector: DEFAULT_LINK_SELECTOR.to_string(),
            click_threshold: Duration::from_millis(DEFAULT_CLICK_THRESHOLD_MS),
            disabled: false,
            on_navigate: None,
        }
    }
}

impl fmt::Debug for CardLinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardLinkConfig")
            .field("link_selector", &self.link_selector)
            .field("click_threshold", &self.click_threshold)
            .field("disabled", &self.disabled)
            .field("on_navigate", &self.on_navigate.is_some())
            .finish()
    }
}

impl CardLinkConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inner link selector
    pub fn link_selector(mut self, selector: impl Into<String>) -> Self {
        self.link_selector = selector.into();
        self
    }

    /// Set the click threshold
    pub fn click_threshold(mut self, threshold: Duration) -> Self {
        self.click_threshold = threshold;
        self
    }

    /// Set the click threshold in milliseconds
    pub fn click_threshold_ms(self, millis: u64) -> Self {
        self.click_threshold(Duration::from_millis(millis))
    }

    /// Set whether the card is disabled
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the navigation callback
    pub fn on_navigate<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_navigate = Some(Arc::new(handler));
        self
    }

    /// The serializable part of this config
    pub fn options(&self) -> CardLinkOptions {
        CardLinkOptions {
            link_selector: self.link_selector.clone(),
            click_threshold: u64::try_from(self.click_threshold.as_millis()).unwrap_or(u64::MAX),
            disabled: self.disabled,
        }
    }
}

/// Serializable card link options
///
/// Every key is optional and falls back to the same default as
/// [`CardLinkConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CardLinkOptions {
    pub link_selector: String,
    /// Milliseconds
    pub click_threshold: u64,
    pub disabled: bool,
}

impl Default for CardLinkOptions {
    fn default() -> Self {
        Self {
            link_selector: DEFAULT_LINK_SELECTOR.to_string(),
            click_threshold: DEFAULT_CLICK_THRESHOLD_MS,
            disabled: false,
        }
    }
}

impl CardLinkOptions {
    /// Parse options from a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Build a config from these options, without a navigation callback
    pub fn into_config(self) -> CardLinkConfig {
        CardLinkConfig {
            link_selector: self.link_selector,
            click_threshold: Duration::from_millis(self.click_threshold),
            disabled: self.disabled,
            on_navigate: None,
        }
    }
}

impl From<CardLinkOptions> for CardLinkConfig {
    fn from(options: CardLinkOptions) -> Self {
        options.into_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CardLinkError;

    #[test]
    fn test_defaults() {
        let config = CardLinkConfig::default();
        assert_eq!(config.link_selector, "a");
        assert_eq!(config.click_threshold, Duration::from_millis(200));
        assert!(!config.disabled);
        assert!(config.on_navigate.is_none());
    }

    #[test]
    fn test_builder() {
        let config = CardLinkConfig::new()
            .link_selector("a.title")
            .click_threshold_ms(350)
            .disabled(true)
            .on_navigate(|_| {});

        assert_eq!(config.link_selector, "a.title");
        assert_eq!(config.click_threshold, Duration::from_millis(350));
        assert!(config.disabled);
        assert!(config.on_navigate.is_some());
    }

    #[test]
    fn test_debug_hides_callback() {
        let config = CardLinkConfig::new().on_navigate(|_| {});
        let debug = format!("{:?}", config);
        assert!(debug.contains("on_navigate: true"));
    }

    #[test]
    fn test_options_from_empty_toml_use_defaults() {
        let options = CardLinkOptions::from_toml_str("").unwrap();
        assert_eq!(options, CardLinkOptions::default());
    }

    #[test]
    fn test_options_from_toml() {
        let options = CardLinkOptions::from_toml_str(
            r#"
            link_selector = "a[data-primary]"
            click_threshold = 120
            "#,
        )
        .unwrap();

        assert_eq!(options.link_selector, "a[data-primary]");
        assert_eq!(options.click_threshold, 120);
        assert!(!options.disabled);

        let config: CardLinkConfig = options.into();
        assert_eq!(config.click_threshold, Duration::from_millis(120));
    }

    #[test]
    fn test_options_rejects_wrong_types() {
        let err = CardLinkOptions::from_toml_str("click_threshold = \"fast\"").unwrap_err();
        assert!(matches!(err, CardLinkError::Config(_)));
    }

    #[test]
    fn test_config_options_roundtrip_keeps_values() {
        let config = CardLinkConfig::new().link_selector("a.go").click_threshold_ms(90);
        let options = config.options();
        assert_eq!(options.link_selector, "a.go");
        assert_eq!(options.click_threshold, 90);

        let serialized = toml::to_string(&options).unwrap();
        assert_eq!(CardLinkOptions::from_toml_str(&serialized).unwrap(), options);
    }
}
