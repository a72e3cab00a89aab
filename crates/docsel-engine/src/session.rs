use std::mem;

use serde::Serialize;

use docsel_core::config::Settings;
use docsel_core::raw::RawCitation;
use docsel_core::traits::{GenerationService, RetrievalService};
use docsel_core::types::{Citation, SelectedDocument};
use docsel_core::{Error, Result};

use crate::ledger::current_selections;
use crate::prompt::PromptBuilder;
use crate::state::{reduce, RequestId, SearchState, SessionEvent};
use crate::type_counter::TypeState;
use crate::view::{compute_visible, VisibleDocuments};

/// Everything the presentation layer renders.
#[derive(Debug, Serialize)]
pub struct SessionView<'a> {
    #[serde(flatten)]
    pub documents: VisibleDocuments<'a>,
    pub type_state: &'a TypeState,
    pub unaddressable: &'a [Citation],
    pub notice: Option<&'a str>,
}

/// Connects the reducer to the retrieval and generation services.
///
/// Service calls are synchronous; `begin_search`/`complete_search` are
/// exposed separately for callers that perform the retrieval themselves.
pub struct Session<R, G>
where
    R: RetrievalService,
    G: GenerationService,
{
    retrieval: R,
    generation: G,
    prompt: PromptBuilder,
    max_results: usize,
    state: SearchState,
}

impl<R, G> Session<R, G>
where
    R: RetrievalService,
    G: GenerationService,
{
    pub fn new(retrieval: R, generation: G, settings: &Settings) -> Self {
        Self {
            retrieval,
            generation,
            prompt: PromptBuilder::new(
                settings.generation.base_prompt.clone(),
                settings.generation.max_context_chars,
            ),
            max_results: settings.retrieval.max_results,
            state: SearchState::default(),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    fn apply(&mut self, event: SessionEvent) {
        let state = mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    /// Registers a search; `None` when the term is blank.
    pub fn begin_search(&mut self, term: &str) -> Option<RequestId> {
        let before = self.state.latest_request;
        self.apply(SessionEvent::SearchStarted { term: term.to_string() });
        (self.state.latest_request != before).then_some(self.state.latest_request)
    }

    pub fn complete_search(&mut self, request: RequestId, outcome: Result<Vec<RawCitation>>) {
        let outcome = outcome.map(|mut raw| {
            raw.truncate(self.max_results);
            raw
        });
        self.apply(SessionEvent::SearchCompleted { request, outcome });
    }

    pub fn search(&mut self, term: &str) {
        let Some(request) = self.begin_search(term) else { return };
        let outcome = self
            .retrieval
            .search(term.trim())
            .map_err(|e| Error::Retrieval(e.to_string()));
        self.complete_search(request, outcome);
    }

    pub fn clear(&mut self) {
        self.apply(SessionEvent::Cleared);
    }

    pub fn toggle_document(&mut self, uri: &str, checked: bool) {
        self.apply(SessionEvent::DocumentToggled { uri: uri.to_string(), checked });
    }

    pub fn toggle_type(&mut self, doc_type: &str, checked: bool) {
        self.apply(SessionEvent::TypeToggled { doc_type: doc_type.to_string(), checked });
    }

    pub fn current_selections(&self) -> Vec<SelectedDocument> {
        current_selections(&self.state.documents)
    }

    /// Asks the generation service about the selected documents.
    ///
    /// Refused while nothing is selected or another generation is running.
    /// A service failure leaves selections untouched.
    pub fn generate(&mut self, question: &str) -> Result<String> {
        if let Some(reason) = self.state.generation_blocker() {
            self.apply(SessionEvent::GenerationStarted);
            return Err(Error::GenerationUnavailable(reason.to_string()));
        }
        let request = self.prompt.build(&self.state.documents, &self.state.chat, question);
        self.apply(SessionEvent::GenerationStarted);
        tracing::info!(documents = request.document_uris.len(), "generation requested");
        let outcome = self.generation.generate(&request).map_err(|e| e.to_string());
        self.apply(SessionEvent::GenerationCompleted {
            question: question.to_string(),
            outcome: outcome.clone().map_err(Error::Generation),
        });
        outcome.map_err(Error::Generation)
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            documents: compute_visible(&self.state.documents, &self.state.type_state),
            type_state: &self.state.type_state,
            unaddressable: &self.state.unaddressable,
            notice: self.state.notice.as_deref(),
        }
    }
}
