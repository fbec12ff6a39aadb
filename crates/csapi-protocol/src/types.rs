//! Core CSAPI types used across the crate.

use serde::{Deserialize, Serialize};

/// A hyperlink to a related resource.
///
/// Links appear on collection descriptions and as query link templates.
/// They are carried through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    /// The URI of the linked resource.
    pub href: String,

    /// The relationship type (e.g., "self", "data", "deployments").
    #[serde(default)]
    pub rel: String,

    /// The media type of the linked resource.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// A human-readable title for the link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Whether the link is a URI template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,

    /// The language of the linked resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,
}

impl Link {
    /// Create a new link with required fields.
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            type_: None,
            title: None,
            templated: None,
            hreflang: None,
        }
    }

    /// Set the media type.
    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Mark as a URI template.
    pub fn templated(mut self) -> Self {
        self.templated = Some(true);
        self
    }
}
