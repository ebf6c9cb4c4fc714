use std::collections::BTreeSet;

use serde::Serialize;

use crate::fetcher::FailureReason;

/// Classification of a single input URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedEntry {
    pub url: String,
    pub has_chatbot: bool,
    /// Set when the page could not be inspected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

impl ClassifiedEntry {
    pub fn classified(url: impl Into<String>, has_chatbot: bool) -> Self {
        Self {
            url: url.into(),
            has_chatbot,
            failure: None,
        }
    }

    pub fn failed(url: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            url: url.into(),
            has_chatbot: false,
            failure: Some(reason),
        }
    }
}

/// Summary counts for one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub with_chatbot: usize,
    pub failed: usize,
}

/// Every entry produced by one batch, in completion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    entries: Vec<ClassifiedEntry>,
}

impl ResultSet {
    pub fn new(entries: Vec<ClassifiedEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ClassifiedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// URLs whose page carried a chatbot indicator
    pub fn positive_urls(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.has_chatbot)
            .map(|entry| entry.url.as_str())
            .collect()
    }

    /// Positive URLs as a set, for order-insensitive comparison
    pub fn positive_set(&self) -> BTreeSet<&str> {
        self.positive_urls().into_iter().collect()
    }

    /// Entries that could not be fetched or classified
    pub fn failures(&self) -> impl Iterator<Item = &ClassifiedEntry> {
        self.entries.iter().filter(|entry| entry.failure.is_some())
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total: self.entries.len(),
            with_chatbot: self.entries.iter().filter(|e| e.has_chatbot).count(),
            failed: self.failures().count(),
        }
    }
}
