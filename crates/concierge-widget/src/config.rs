//! Widget configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Greeting shown (and persisted) when a conversation has no history yet.
pub const DEFAULT_GREETING: &str =
    "System online. I am your site concierge. How may I assist you today?";

/// Configuration for the widget core, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Serving origin of the widget backend, e.g. "https://widget.example"
    pub base_url: Option<String>,
    /// Origins allowed to exchange bridge messages with the widget
    pub allowed_origins: Vec<String>,
    /// First assistant message for an empty conversation
    pub greeting: Option<String>,
}

impl WidgetConfig {
    /// Load from a TOML file; missing or unparseable files fall back to
    /// defaults with a warning.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse widget config");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to read widget config");
                Self::default()
            }
        }
    }

    /// Resolve the backend base URL the way the embed surface does: the
    /// embed tag's explicit attribute wins, then the configured value, then
    /// the embed script's own origin, then the current page origin.
    pub fn resolve_base_url(
        &self,
        embed_attribute: Option<&str>,
        script_origin: Option<&str>,
        page_origin: &str,
    ) -> String {
        embed_attribute
            .or(self.base_url.as_deref())
            .or(script_origin)
            .unwrap_or(page_origin)
            .trim_end_matches('/')
            .to_string()
    }

    /// The greeting for a fresh conversation.
    pub fn greeting(&self) -> &str {
        self.greeting.as_deref().unwrap_or(DEFAULT_GREETING)
    }
}
