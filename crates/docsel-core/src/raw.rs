//! Raw citation records as returned by the retrieval back-ends.
//!
//! Every field is optional; [`crate::normalize`] turns these into
//! [`crate::types::Citation`] values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub type RawMetadata = HashMap<String, Value>;

pub const META_KENDRA_TITLE: &str = "x-amz-kendra-document-title";
pub const META_KENDRA_CONFIDENCE: &str = "x-amz-kendra-score-confidence";
pub const META_TITLE: &str = "title";
pub const META_CATEGORY: &str = "_category";
pub const META_SOURCE_URI: &str = "_source_uri";
pub const ATTR_DOCUMENT_TYPE: &str = "documentType";

/// A raw record from one of the supported retrieval back-ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RawCitation {
    /// Knowledge-base retrieval result (content + location + metadata).
    KnowledgeBase(KnowledgeBaseResult),
    /// Search-index query result item (title + excerpt + attributes).
    IndexQuery(IndexQueryResult),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<RawContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<RawLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RawMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kendra_document_location: Option<RawUriLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_location: Option<RawUriLocation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawUriLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndexQueryResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_attributes: Option<RawMetadata>,
}

/// String value of a metadata entry; non-string values are ignored.
pub fn meta_str<'a>(metadata: Option<&'a RawMetadata>, key: &str) -> Option<&'a str> {
    metadata?.get(key)?.as_str()
}
