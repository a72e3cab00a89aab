//! Selection ledger: documents the user has checked, kept across searches.
use indexmap::IndexMap;

use docsel_core::types::{Document, DocumentUri, SelectedDocument};

use crate::aggregate::DocumentMap;

/// URI -> snapshot of the document at the time it was selected.
///
/// Every entry has `selected == true`. Entries only ever enter through
/// [`SelectionLedger::select`], which callers reach with an addressable
/// document, so the ledger never holds a URI-less entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionLedger {
    entries: IndexMap<DocumentUri, Document>,
}

impl SelectionLedger {
    /// Inserts or overwrites the entry, forcing `selected`.
    pub fn select(&mut self, uri: impl Into<DocumentUri>, mut document: Document) {
        document.selected = true;
        self.entries.insert(uri.into(), document);
    }

    /// Removes the entry; unknown URIs are a no-op.
    pub fn deselect(&mut self, uri: &str) -> Option<Document> {
        self.entries.shift_remove(uri)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.entries.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentUri, &Document)> {
        self.entries.iter()
    }
}

/// Selected, addressable documents of the live aggregate, in its iteration
/// order. Callers that need a stable order sort themselves.
pub fn current_selections(documents: &DocumentMap) -> Vec<SelectedDocument> {
    documents
        .values()
        .filter(|doc| doc.selected)
        .filter_map(|doc| {
            doc.uri.as_ref().map(|uri| SelectedDocument {
                uri: uri.clone(),
                document_type: doc.document_type.clone(),
                title: doc.title.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsel_core::types::Citation;

    fn doc(uri: &str, title: &str) -> Document {
        Document::from_citation(
            Citation {
                text: String::new(),
                document_title: title.to_string(),
                document_type: "Guidance".to_string(),
                uri: Some(uri.to_string()),
                score: 0.0,
                confidence: None,
            },
            false,
        )
    }

    #[test]
    fn select_forces_selected_flag() {
        let mut ledger = SelectionLedger::default();
        ledger.select("A", doc("A", "Alpha"));
        assert!(ledger.contains("A"));
        assert!(ledger.iter().all(|(_, d)| d.selected));
    }

    #[test]
    fn select_overwrites_existing_entry() {
        let mut ledger = SelectionLedger::default();
        ledger.select("A", doc("A", "Old"));
        ledger.select("A", doc("A", "New"));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.iter().next().map(|(_, d)| d.title.as_str()), Some("New"));
    }

    #[test]
    fn deselect_unknown_is_noop() {
        let mut ledger = SelectionLedger::default();
        ledger.select("A", doc("A", "Alpha"));
        assert!(ledger.deselect("Z").is_none());
        assert_eq!(ledger.len(), 1);
        assert!(ledger.deselect("A").is_some());
        assert!(ledger.is_empty());
    }

    #[test]
    fn current_selections_follow_map_order() {
        let mut documents = DocumentMap::new();
        let mut b = doc("B", "Bravo");
        b.selected = true;
        documents.insert("B".to_string(), b);
        documents.insert("C".to_string(), doc("C", "Charlie"));
        let mut a = doc("A", "Alpha");
        a.selected = true;
        documents.insert("A".to_string(), a);

        let uris: Vec<String> = current_selections(&documents).into_iter().map(|s| s.uri).collect();
        assert_eq!(uris, vec!["B", "A"]);
    }
}
