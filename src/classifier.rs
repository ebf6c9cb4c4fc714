//! Chatbot detection over raw HTML.
//!
//! Two independent checks, either of which is enough: a keyword scan over the
//! lower-cased markup, and a structural scan for elements whose tag name is a
//! known chat-widget element. Attributes (class, id) are never inspected by the
//! structural scan; they only count if a keyword appears verbatim in the markup.

use std::collections::BTreeSet;

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use regex::Regex;
use scraper::{Html, HtmlTreeSink, Node};

use crate::config::Signatures;
use crate::error::ConfigError;

/// Classifies page bodies against a fixed set of chatbot signatures
#[derive(Debug, Clone)]
pub struct Classifier {
    keyword_pattern: Option<Regex>,
    element_tags: BTreeSet<String>,
}

impl Classifier {
    pub fn new(signatures: &Signatures) -> Result<Self, ConfigError> {
        Ok(Self {
            keyword_pattern: keyword_pattern(&signatures.keywords)?,
            element_tags: signatures.element_tags.clone(),
        })
    }

    /// Returns true if the body carries any chatbot indicator
    pub fn classify(&self, body: &str) -> bool {
        if self.has_keyword(body) {
            return true;
        }
        self.has_chat_element(body)
    }

    /// Case-insensitive substring scan for any configured keyword
    pub fn has_keyword(&self, body: &str) -> bool {
        match &self.keyword_pattern {
            Some(pattern) => pattern.is_match(&body.to_lowercase()),
            None => false,
        }
    }

    /// Parses the body and looks for an element with a configured tag name
    pub fn has_chat_element(&self, body: &str) -> bool {
        if self.element_tags.is_empty() {
            return false;
        }

        let document = parse_without_scripting(body);
        document.tree.nodes().any(|node| match node.value() {
            Node::Element(element) => self.element_tags.contains(element.name()),
            _ => false,
        })
    }
}

impl Default for Classifier {
    fn default() -> Self {
        let signatures = Signatures::default();
        Self {
            // Built-in keywords are escaped literals, so the pattern always compiles.
            keyword_pattern: keyword_pattern(&signatures.keywords).ok().flatten(),
            element_tags: signatures.element_tags,
        }
    }
}

// With scripting disabled, <noscript> content is parsed as markup instead of raw text.
fn parse_without_scripting(body: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    parse_document(HtmlTreeSink::new(Html::new_document()), opts).one(body)
}

// One alternation over escaped keywords gives a single pass over the body.
fn keyword_pattern(keywords: &BTreeSet<String>) -> Result<Option<Regex>, regex::Error> {
    if keywords.is_empty() {
        return Ok(None);
    }
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).map(Some)
}
