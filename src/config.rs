use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Substrings whose presence in the lower-cased markup marks a chat widget
pub const DEFAULT_KEYWORDS: &[&str] = &["inbox-chat", "chat-button", "chat_bubble", "chat_with_us"];

/// Tag names of custom elements used by common chat widgets
pub const DEFAULT_ELEMENT_TAGS: &[&str] = &[
    "chat-widget",
    "chatbot",
    "messenger-chat",
    "chat-bubble",
    "livechat",
    "chat-window",
];

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Chatbot indicators the classifier looks for.
///
/// Loaded from JSON as `{"keywords": [...], "element_tags": [...]}`; a missing
/// field falls back to the built-in set. Entries are lower-cased on load since
/// both scans compare against lower-case text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Signatures {
    #[serde(default = "default_keywords")]
    pub keywords: BTreeSet<String>,
    #[serde(default = "default_element_tags")]
    pub element_tags: BTreeSet<String>,
}

fn default_keywords() -> BTreeSet<String> {
    DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

fn default_element_tags() -> BTreeSet<String> {
    DEFAULT_ELEMENT_TAGS.iter().map(|s| s.to_string()).collect()
}

impl Default for Signatures {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            element_tags: default_element_tags(),
        }
    }
}

impl Signatures {
    /// Build a signature set from arbitrary keyword and tag lists
    pub fn new<K, T>(keywords: K, element_tags: T) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            keywords: keywords.into_iter().map(|k| k.as_ref().to_string()).collect(),
            element_tags: element_tags
                .into_iter()
                .map(|t| t.as_ref().to_string())
                .collect(),
        }
        .normalized()
    }

    /// Parse a signature set from JSON text
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let signatures: Signatures = serde_json::from_str(text)?;
        Ok(signatures.normalized())
    }

    /// Read a signature set from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::SignatureFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    // Lower-case and drop blank entries; a blank keyword would match every page.
    fn normalized(self) -> Self {
        let clean = |set: BTreeSet<String>| -> BTreeSet<String> {
            set.into_iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };
        Self {
            keywords: clean(self.keywords),
            element_tags: clean(self.element_tags),
        }
    }
}

/// Runtime settings for one batch run
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum number of fetch/classify pipelines in flight
    pub concurrency: usize,
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
    /// Proxy URL (e.g., http://proxy.example.com:8080)
    pub proxy: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builtin_sets() {
        let signatures = Signatures::default();
        assert!(signatures.keywords.contains("chat_with_us"));
        assert!(signatures.element_tags.contains("livechat"));
        assert_eq!(signatures.keywords.len(), 4);
        assert_eq!(signatures.element_tags.len(), 6);
    }

    #[test]
    fn json_fields_are_optional() {
        let signatures = Signatures::from_json(r#"{"keywords": ["Intercom-Launcher"]}"#).unwrap();
        assert_eq!(
            signatures.keywords.into_iter().collect::<Vec<_>>(),
            vec!["intercom-launcher".to_string()]
        );
        assert_eq!(signatures.element_tags, default_element_tags());
    }

    #[test]
    fn blank_entries_are_dropped() {
        let signatures = Signatures::new(["", "  ", "Zendesk"], ["CHAT-FRAME"]);
        assert_eq!(signatures.keywords.len(), 1);
        assert!(signatures.keywords.contains("zendesk"));
        assert!(signatures.element_tags.contains("chat-frame"));
    }

    #[test]
    fn example_signature_file_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("signatures.example.json");
        let signatures = Signatures::from_path(&path).unwrap();
        assert!(signatures.keywords.contains("intercom-launcher"));
        assert_eq!(signatures.element_tags, default_element_tags());
    }

    #[test]
    fn missing_signature_file_is_reported() {
        let err = Signatures::from_path(Path::new("/nonexistent/signatures.json")).unwrap_err();
        assert!(matches!(err, ConfigError::SignatureFile { .. }));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = Signatures::from_json("{\"keywords\": 12}").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSignatures(_)));
    }

    #[test]
    fn scan_config_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.proxy.is_none());
    }
}
