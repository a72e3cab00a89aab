use indexmap::IndexMap;

use docsel_core::types::DocumentTypeInfo;

use crate::aggregate::DocumentMap;

/// Document type -> unique document count and filter flag.
pub type TypeState = IndexMap<String, DocumentTypeInfo>;

/// Counts unique documents per type and carries filter flags over from
/// `prior`. Types with no document in `documents` are dropped.
pub fn count_types(documents: &DocumentMap, prior: &TypeState) -> TypeState {
    let mut types = TypeState::new();
    for doc in documents.values() {
        let info = types.entry(doc.document_type.clone()).or_insert_with(|| DocumentTypeInfo {
            count: 0,
            selected: prior.get(&doc.document_type).is_some_and(|p| p.selected),
        });
        info.count += 1;
    }
    types
}

/// True when at least one type filter is switched on.
pub fn has_active_filter(type_state: &TypeState) -> bool {
    type_state.values().any(|info| info.selected)
}
