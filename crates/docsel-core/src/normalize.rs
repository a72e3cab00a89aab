//! Citation normalizer.
//!
//! Maps a [`RawCitation`] onto a [`Citation`] with a guaranteed title and
//! type. Field fallback order (first non-blank wins):
//! - title: `x-amz-kendra-document-title` -> `title` metadata -> item title -> [`UNTITLED_DOCUMENT`]
//! - type: `_category` -> `documentType` -> [`UNCATEGORIZED`]
//! - uri: kendra location -> s3 location -> `_source_uri` -> item uri
//! - text: content text / excerpt, else empty
use serde_json::Value;
use std::collections::HashMap;

use crate::raw::{
    meta_str, IndexQueryResult, KnowledgeBaseResult, RawCitation, RawContent, RawLocation, RawUriLocation,
    ATTR_DOCUMENT_TYPE, META_CATEGORY, META_KENDRA_CONFIDENCE, META_KENDRA_TITLE, META_SOURCE_URI, META_TITLE,
};
use crate::types::{Citation, Confidence, UNCATEGORIZED, UNTITLED_DOCUMENT};

fn first_present<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates.into_iter().flatten().find(|s| !s.trim().is_empty())
}

fn score_of(score: Option<f64>) -> f64 {
    score.unwrap_or(0.0)
}

/// Normalizes one raw record. Total: missing fields degrade to defaults.
pub fn normalize(raw: &RawCitation) -> Citation {
    match raw {
        RawCitation::KnowledgeBase(kb) => normalize_knowledge_base(kb),
        RawCitation::IndexQuery(item) => normalize_index_query(item),
    }
}

/// Normalizes a batch, preserving retrieval order.
pub fn normalize_all(raw: &[RawCitation]) -> Vec<Citation> {
    raw.iter().map(normalize).collect()
}

fn normalize_knowledge_base(kb: &KnowledgeBaseResult) -> Citation {
    let metadata = kb.metadata.as_ref();
    let location = kb.location.as_ref();
    let title = first_present([meta_str(metadata, META_KENDRA_TITLE), meta_str(metadata, META_TITLE)]);
    let doc_type = first_present([meta_str(metadata, META_CATEGORY), meta_str(metadata, ATTR_DOCUMENT_TYPE)]);
    let uri = first_present([
        location
            .and_then(|l| l.kendra_document_location.as_ref())
            .and_then(|l| l.uri.as_deref()),
        location.and_then(|l| l.s3_location.as_ref()).and_then(|l| l.uri.as_deref()),
        meta_str(metadata, META_SOURCE_URI),
    ]);
    Citation {
        text: kb.content.as_ref().and_then(|c| c.text.clone()).unwrap_or_default(),
        document_title: title.unwrap_or(UNTITLED_DOCUMENT).to_string(),
        document_type: doc_type.unwrap_or(UNCATEGORIZED).to_string(),
        uri: uri.map(str::to_string),
        score: score_of(kb.score),
        confidence: meta_str(metadata, META_KENDRA_CONFIDENCE).and_then(Confidence::parse),
    }
}

fn normalize_index_query(item: &IndexQueryResult) -> Citation {
    let attrs = item.document_attributes.as_ref();
    let title = first_present([
        meta_str(attrs, META_KENDRA_TITLE),
        meta_str(attrs, META_TITLE),
        item.title.as_deref(),
    ]);
    let doc_type = first_present([meta_str(attrs, META_CATEGORY), meta_str(attrs, ATTR_DOCUMENT_TYPE)]);
    let uri = first_present([meta_str(attrs, META_SOURCE_URI), item.uri.as_deref()]);
    Citation {
        text: item.excerpt.clone().unwrap_or_default(),
        document_title: title.unwrap_or(UNTITLED_DOCUMENT).to_string(),
        document_type: doc_type.unwrap_or(UNCATEGORIZED).to_string(),
        uri: uri.map(str::to_string),
        score: score_of(item.score),
        confidence: meta_str(attrs, META_KENDRA_CONFIDENCE).and_then(Confidence::parse),
    }
}

impl From<&Citation> for RawCitation {
    /// Re-encodes a normalized citation as a knowledge-base record.
    fn from(citation: &Citation) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(META_KENDRA_TITLE.to_string(), Value::from(citation.document_title.clone()));
        metadata.insert(META_CATEGORY.to_string(), Value::from(citation.document_type.clone()));
        if let Some(confidence) = citation.confidence {
            metadata.insert(META_KENDRA_CONFIDENCE.to_string(), Value::from(confidence.as_str()));
        }
        RawCitation::KnowledgeBase(KnowledgeBaseResult {
            content: Some(RawContent { text: Some(citation.text.clone()) }),
            location: citation.uri.as_ref().map(|uri| RawLocation {
                kendra_document_location: Some(RawUriLocation { uri: Some(uri.clone()) }),
                s3_location: None,
            }),
            metadata: Some(metadata),
            score: Some(citation.score),
        })
    }
}

impl Citation {
    /// Runs an already normalized citation through the normalizer again.
    /// Defaulting is idempotent, so this returns an equal value.
    pub fn renormalize(&self) -> Citation {
        normalize(&RawCitation::from(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kb(value: serde_json::Value) -> RawCitation {
        serde_json::from_value(value).expect("raw citation")
    }

    #[test]
    fn empty_record_gets_sentinels() {
        let c = normalize(&RawCitation::KnowledgeBase(KnowledgeBaseResult::default()));
        assert_eq!(c.document_title, UNTITLED_DOCUMENT);
        assert_eq!(c.document_type, UNCATEGORIZED);
        assert_eq!(c.uri, None);
        assert_eq!(c.text, "");
        assert_eq!(c.score, 0.0);
        assert_eq!(c.confidence, None);
    }

    #[test]
    fn kendra_title_wins_over_plain_title() {
        let c = normalize(&kb(json!({
            "source": "knowledge_base",
            "metadata": { "x-amz-kendra-document-title": "Tax Code", "title": "ignored" }
        })));
        assert_eq!(c.document_title, "Tax Code");
    }

    #[test]
    fn blank_fields_fall_through() {
        let c = normalize(&kb(json!({
            "source": "knowledge_base",
            "location": { "kendraDocumentLocation": { "uri": "  " } },
            "metadata": { "x-amz-kendra-document-title": "", "title": "Plain", "_category": " ",
                          "_source_uri": "s3://bucket/a.pdf" }
        })));
        assert_eq!(c.document_title, "Plain");
        assert_eq!(c.document_type, UNCATEGORIZED);
        assert_eq!(c.uri.as_deref(), Some("s3://bucket/a.pdf"));
    }

    #[test]
    fn non_string_metadata_is_ignored() {
        let c = normalize(&kb(json!({
            "source": "knowledge_base",
            "metadata": { "title": 42, "_category": ["Rule"] }
        })));
        assert_eq!(c.document_title, UNTITLED_DOCUMENT);
        assert_eq!(c.document_type, UNCATEGORIZED);
    }

    #[test]
    fn index_query_item_uses_excerpt_and_uri() {
        let c = normalize(&kb(json!({
            "source": "index_query",
            "title": "Form 540",
            "excerpt": "resident income",
            "uri": "https://example.org/540",
            "score": 0.5,
            "documentAttributes": { "_category": "Form", "x-amz-kendra-score-confidence": "medium" }
        })));
        assert_eq!(c.document_title, "Form 540");
        assert_eq!(c.document_type, "Form");
        assert_eq!(c.text, "resident income");
        assert_eq!(c.uri.as_deref(), Some("https://example.org/540"));
        assert_eq!(c.confidence, Some(Confidence::Medium));
        assert_eq!(c.relevance_percent(), "50.0%");
    }

    #[test]
    fn score_is_not_clamped() {
        let c = normalize(&kb(json!({ "source": "knowledge_base", "score": 1.7 })));
        assert_eq!(c.score, 1.7);
    }
}
