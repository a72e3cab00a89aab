//! Explicit session state and the reducer that drives it.
//!
//! Every user or network event is a [`SessionEvent`]; [`reduce`] applies it
//! synchronously and returns the next [`SearchState`].
use docsel_core::normalize::normalize_all;
use docsel_core::raw::RawCitation;
use docsel_core::types::{ChatMessage, Citation, DocumentUri};
use docsel_core::{Error, Result};

use crate::aggregate::{aggregate, unaddressable, DocumentMap};
use crate::ledger::SelectionLedger;
use crate::type_counter::{count_types, TypeState};

/// Monotonic search request id. Only responses tagged with the latest
/// issued id are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl RequestId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationStatus {
    #[default]
    Idle,
    InProgress,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub documents: DocumentMap,
    pub unaddressable: Vec<Citation>,
    pub type_state: TypeState,
    pub ledger: SelectionLedger,
    pub latest_request: RequestId,
    pub last_term: Option<String>,
    pub searching: bool,
    pub generation: GenerationStatus,
    pub chat: Vec<ChatMessage>,
    /// Transient message for the front-end; replaced by the next event.
    pub notice: Option<String>,
}

#[derive(Debug)]
pub enum SessionEvent {
    SearchStarted { term: String },
    SearchCompleted { request: RequestId, outcome: Result<Vec<RawCitation>> },
    Cleared,
    DocumentToggled { uri: DocumentUri, checked: bool },
    TypeToggled { doc_type: String, checked: bool },
    GenerationStarted,
    GenerationCompleted { question: String, outcome: Result<String> },
}

impl SearchState {
    /// Replaces the aggregate with `citations` plus the carried selections.
    fn rebuild(&mut self, citations: &[Citation]) {
        self.documents = aggregate(citations, &self.ledger);
        self.unaddressable = unaddressable(citations);
        self.type_state = count_types(&self.documents, &self.type_state);
    }

    /// Why a generation cannot start right now, if it cannot.
    pub fn generation_blocker(&self) -> Option<&'static str> {
        if self.ledger.is_empty() {
            Some("no documents selected")
        } else if self.generation == GenerationStatus::InProgress {
            Some("generation already in progress")
        } else {
            None
        }
    }

    pub fn can_generate(&self) -> bool {
        self.generation_blocker().is_none()
    }
}

pub fn reduce(mut state: SearchState, event: SessionEvent) -> SearchState {
    state.notice = None;
    match event {
        SessionEvent::SearchStarted { term } => {
            let term = term.trim().to_string();
            if term.is_empty() {
                tracing::debug!("ignoring blank search term");
                return state;
            }
            state.latest_request = state.latest_request.next();
            state.last_term = Some(term);
            state.searching = true;
            tracing::debug!(request = state.latest_request.0, "search started");
        }
        SessionEvent::SearchCompleted { request, outcome } => {
            if request != state.latest_request {
                tracing::warn!(request = request.0, latest = state.latest_request.0, "dropping search response for a request not in flight");
                return state;
            }
            state.searching = false;
            match outcome {
                Ok(raw) => {
                    let citations = normalize_all(&raw);
                    state.rebuild(&citations);
                    tracing::info!(
                        citations = citations.len(),
                        documents = state.documents.len(),
                        types = state.type_state.len(),
                        "search completed"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "search failed, keeping selections only");
                    state.rebuild(&[]);
                    state.notice = Some(e.to_string());
                }
            }
        }
        SessionEvent::Cleared => {
            // Supersedes any in-flight search.
            state.latest_request = state.latest_request.next();
            state.last_term = None;
            state.searching = false;
            state.rebuild(&[]);
        }
        SessionEvent::DocumentToggled { uri, checked } => toggle_document(&mut state, &uri, checked),
        SessionEvent::TypeToggled { doc_type, checked } => match state.type_state.get_mut(&doc_type) {
            Some(info) => info.selected = checked,
            None => tracing::debug!(doc_type = %doc_type, "toggle for unknown document type ignored"),
        },
        SessionEvent::GenerationStarted => {
            match state.generation_blocker() {
                Some(reason) => state.notice = Some(Error::GenerationUnavailable(reason.to_string()).to_string()),
                None => state.generation = GenerationStatus::InProgress,
            }
        }
        SessionEvent::GenerationCompleted { question, outcome } => {
            state.generation = GenerationStatus::Idle;
            match outcome {
                Ok(answer) => {
                    state.chat.push(ChatMessage::user(question));
                    state.chat.push(ChatMessage::assistant(answer));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "generation failed");
                    state.notice = Some(e.to_string());
                }
            }
        }
    }
    state
}

fn toggle_document(state: &mut SearchState, uri: &str, checked: bool) {
    if !checked {
        state.ledger.deselect(uri);
        if let Some(doc) = state.documents.get_mut(uri) {
            doc.selected = false;
        }
        return;
    }
    match state.documents.get_mut(uri) {
        Some(doc) if state.ledger.contains(uri) => {
            // Live entry already holds snapshot + batch; keep the snapshot.
            doc.selected = true;
        }
        Some(doc) => {
            doc.selected = true;
            state.ledger.select(uri, doc.clone());
        }
        None => {
            tracing::debug!(uri, "selection of unknown document rejected");
            state.notice = Some(Error::Unselectable(uri.to_string()).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_term_issues_no_request() {
        let state = reduce(SearchState::default(), SessionEvent::SearchStarted { term: "   ".to_string() });
        assert_eq!(state.latest_request, RequestId(0));
        assert!(!state.searching);
    }

    #[test]
    fn generation_gated_on_selection() {
        let state = reduce(SearchState::default(), SessionEvent::GenerationStarted);
        assert_eq!(state.generation, GenerationStatus::Idle);
        assert!(state.notice.is_some());
        assert!(!state.can_generate());
    }

    #[test]
    fn unknown_type_toggle_is_ignored() {
        let state = reduce(
            SearchState::default(),
            SessionEvent::TypeToggled { doc_type: "Rule".to_string(), checked: true },
        );
        assert!(state.type_state.is_empty());
    }

    #[test]
    fn response_for_unissued_request_is_ignored() {
        let state = reduce(SearchState::default(), SessionEvent::SearchStarted { term: "tax".to_string() });
        let state = reduce(
            state,
            SessionEvent::SearchCompleted { request: RequestId(9), outcome: Ok(Vec::new()) },
        );
        assert_eq!(state.latest_request, RequestId(1));
        assert!(state.searching);
    }

    #[test]
    fn unknown_document_cannot_be_selected() {
        let state = reduce(
            SearchState::default(),
            SessionEvent::DocumentToggled { uri: "nowhere".to_string(), checked: true },
        );
        assert!(state.ledger.is_empty());
        assert!(state.notice.as_deref().is_some_and(|n| n.contains("nowhere")));
    }
}
