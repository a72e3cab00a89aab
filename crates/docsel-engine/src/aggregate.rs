//! Folds a flat citation list into one [`Document`] per URI.
use indexmap::IndexMap;

use docsel_core::types::{Citation, Document, DocumentUri};

use crate::ledger::SelectionLedger;

/// Unique documents keyed by URI, in first-seen order.
///
/// Iteration order is stable but carries no meaning for display; the view
/// filter re-sorts.
pub type DocumentMap = IndexMap<DocumentUri, Document>;

/// Builds the document map for one search batch.
///
/// The map is seeded with every ledger entry, so selected documents survive
/// a batch that does not mention them. Citations without a URI are skipped
/// here; see [`unaddressable`].
pub fn aggregate(citations: &[Citation], carry_forward: &SelectionLedger) -> DocumentMap {
    let mut by_uri: DocumentMap = carry_forward.iter().map(|(uri, doc)| (uri.clone(), doc.clone())).collect();
    for citation in citations {
        let Some(uri) = citation.uri.clone() else { continue };
        by_uri
            .entry(uri)
            .and_modify(|doc| doc.absorb(citation.clone()))
            .or_insert_with_key(|uri| Document::from_citation(citation.clone(), carry_forward.contains(uri)));
    }
    tracing::debug!(
        citations = citations.len(),
        carried = carry_forward.len(),
        documents = by_uri.len(),
        "aggregated citations"
    );
    by_uri
}

/// Citations that carry no URI, in input order. They are shown individually
/// and can never be selected.
pub fn unaddressable(citations: &[Citation]) -> Vec<Citation> {
    citations.iter().filter(|c| !c.is_addressable()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cite(uri: Option<&str>, title: &str, doc_type: &str, text: &str) -> Citation {
        Citation {
            text: text.to_string(),
            document_title: title.to_string(),
            document_type: doc_type.to_string(),
            uri: uri.map(str::to_string),
            score: 0.5,
            confidence: None,
        }
    }

    #[test]
    fn duplicates_fold_into_one_document_in_input_order() {
        let citations: Vec<Citation> =
            (0..4).map(|i| cite(Some("A"), "Tax Guide", "Guidance", &format!("passage {i}"))).collect();
        let docs = aggregate(&citations, &SelectionLedger::default());
        assert_eq!(docs.len(), 1);
        let a = &docs["A"];
        assert_eq!(a.citation_count, 4);
        let texts: Vec<&str> = a.citations.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["passage 0", "passage 1", "passage 2", "passage 3"]);
        assert!(!a.selected);
    }

    #[test]
    fn first_citation_owns_title_and_type() {
        let citations = vec![cite(Some("A"), "First", "Statute", ""), cite(Some("A"), "Second", "Rule", "")];
        let docs = aggregate(&citations, &SelectionLedger::default());
        assert_eq!(docs["A"].title, "First");
        assert_eq!(docs["A"].document_type, "Statute");
    }

    #[test]
    fn uri_less_citations_create_no_document() {
        let citations = vec![cite(None, "Loose", "Guidance", "x"), cite(Some("B"), "Form", "Form", "y")];
        let docs = aggregate(&citations, &SelectionLedger::default());
        assert_eq!(docs.keys().collect::<Vec<_>>(), vec!["B"]);
        assert_eq!(unaddressable(&citations).len(), 1);
    }

    #[test]
    fn empty_batch_keeps_carried_documents() {
        let mut ledger = SelectionLedger::default();
        ledger.select("A", Document::from_citation(cite(Some("A"), "Tax Guide", "Guidance", ""), false));
        let docs = aggregate(&[], &ledger);
        assert_eq!(docs.len(), 1);
        assert!(docs["A"].selected);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let citations = vec![
            cite(Some("B"), "b", "Form", "1"),
            cite(None, "n", "Form", "2"),
            cite(Some("A"), "a", "Rule", "3"),
            cite(Some("B"), "b", "Form", "4"),
        ];
        let ledger = SelectionLedger::default();
        assert_eq!(aggregate(&citations, &ledger), aggregate(&citations, &ledger));
    }
}
