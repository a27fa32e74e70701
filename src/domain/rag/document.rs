use serde::{Deserialize, Serialize};

/// Metadata attached to an indexed document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl DocumentMetadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            state: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Concatenated searchable metadata text, used by the state filter
    pub fn filter_text(&self) -> String {
        let mut text = self.state.clone().unwrap_or_default();
        text.push_str(&self.title);
        text.to_lowercase()
    }
}

/// A document as stored in the vector index, parallel to its embedding.
///
/// Immutable once indexed; the only way to change indexed content is a full
/// reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl IndexedDocument {
    pub fn new(text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// A structured record accepted by the bulk loader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub title: String,
    #[serde(default)]
    pub state: Option<String>,
    pub content: String,
}
