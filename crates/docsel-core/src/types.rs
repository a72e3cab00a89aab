//! Domain types shared by the normalizer, the engine and its front-ends.

use serde::{Deserialize, Serialize};

pub type DocumentUri = String;

/// Title given to citations whose source carries no usable title.
pub const UNTITLED_DOCUMENT: &str = "Untitled Document";
/// Type given to citations whose source carries no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Retrieval confidence band reported alongside a score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "HIGH" | "VERY_HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

/// One retrieved passage after normalization.
///
/// - `document_title`/`document_type`: always populated, defaulted once at
///   normalization time
/// - `uri`: stable document identity; `None` when the source had none
/// - `score`: back-end score as given, `0.0` when absent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Citation {
    pub text: String,
    pub document_title: String,
    pub document_type: String,
    pub uri: Option<DocumentUri>,
    pub score: f64,
    pub confidence: Option<Confidence>,
}

impl Citation {
    /// Citations without a URI cannot be deduplicated or selected.
    pub fn is_addressable(&self) -> bool {
        self.uri.is_some()
    }

    /// Score rendered as a percentage with one decimal, e.g. `"87.5%"`.
    pub fn relevance_percent(&self) -> String {
        format!("{:.1}%", self.score * 100.0)
    }
}

/// Aggregate of one or more citations sharing a URI.
///
/// `title`, `document_type` and `uri` come from the first citation seen for
/// the identity; later citations only extend `citations`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub title: String,
    pub document_type: String,
    pub uri: Option<DocumentUri>,
    pub citation_count: usize,
    pub citations: Vec<Citation>,
    pub selected: bool,
}

impl Document {
    pub fn from_citation(citation: Citation, selected: bool) -> Self {
        Self {
            title: citation.document_title.clone(),
            document_type: citation.document_type.clone(),
            uri: citation.uri.clone(),
            citation_count: 1,
            citations: vec![citation],
            selected,
        }
    }

    /// Appends a further citation of the same identity.
    pub fn absorb(&mut self, citation: Citation) {
        self.citation_count += 1;
        self.citations.push(citation);
    }

    /// Highest score among the document's citations.
    pub fn best_score(&self) -> f64 {
        self.citations
            .iter()
            .map(|c| c.score)
            .fold(0.0_f64, f64::max)
    }
}

/// Per-type aggregate: unique document count plus the filter flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DocumentTypeInfo {
    pub count: usize,
    pub selected: bool,
}

/// Read projection of a selected document handed to external consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedDocument {
    pub uri: DocumentUri,
    pub document_type: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// What the engine hands to the generation service.
///
/// `document_uris` is exactly the URI list of the current selections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    pub document_uris: Vec<DocumentUri>,
    pub messages: Vec<ChatMessage>,
}
