//! Presentation ordering: selected documents first, then filtered results.
use serde::Serialize;

use docsel_core::types::Document;

use crate::aggregate::DocumentMap;
use crate::type_counter::{has_active_filter, TypeState};

/// The two rendered sections. Either may be empty, in which case the
/// front-end omits its heading.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct VisibleDocuments<'a> {
    /// Rendered under "Selected"; never affected by type filters.
    pub selected: Vec<&'a Document>,
    /// Rendered under "Results"; restricted to active types when any filter is on.
    pub unselected: Vec<&'a Document>,
}

impl VisibleDocuments<'_> {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.unselected.is_empty()
    }
}

pub fn compute_visible<'a>(documents: &'a DocumentMap, type_state: &TypeState) -> VisibleDocuments<'a> {
    let filtering = has_active_filter(type_state);
    let (mut selected, unselected): (Vec<&Document>, Vec<&Document>) =
        documents.values().partition(|doc| doc.selected);
    let mut unselected: Vec<&Document> = unselected
        .into_iter()
        .filter(|doc| !filtering || type_state.get(&doc.document_type).is_some_and(|t| t.selected))
        .collect();
    selected.sort_by(|a, b| a.title.cmp(&b.title));
    unselected.sort_by(|a, b| a.title.cmp(&b.title));
    VisibleDocuments { selected, unselected }
}
