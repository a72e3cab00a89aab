//! File-backed retrieval service.
//!
//! The fixture is a JSON object mapping search terms to arrays of raw
//! citations. Lookups trim and lowercase the term; unknown terms return no
//! citations.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::raw::RawCitation;
use crate::traits::RetrievalService;

#[derive(Debug, Clone, Default)]
pub struct FixtureRetrieval {
    entries: HashMap<String, Vec<RawCitation>>,
}

fn key_of(term: &str) -> String {
    term.trim().to_lowercase()
}

impl FixtureRetrieval {
    pub fn from_entries(entries: HashMap<String, Vec<RawCitation>>) -> Self {
        let entries = entries.into_iter().map(|(term, raw)| (key_of(&term), raw)).collect();
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::NotFound(format!("fixture file {}", path.display())));
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Operation(format!("reading {}: {}", path.display(), e)))?;
        let entries: HashMap<String, Vec<RawCitation>> = serde_json::from_str(&content)
            .map_err(|e| Error::Operation(format!("parsing {}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), terms = entries.len(), "loaded retrieval fixture");
        Ok(Self::from_entries(entries))
    }

    pub fn terms(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        terms.sort_unstable();
        terms
    }
}

impl RetrievalService for FixtureRetrieval {
    fn search(&self, term: &str) -> anyhow::Result<Vec<RawCitation>> {
        Ok(self.entries.get(&key_of(term)).cloned().unwrap_or_default())
    }
}
