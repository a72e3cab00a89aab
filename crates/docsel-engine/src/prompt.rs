//! Builds the generation request from the current selections.
//!
//! The system prompt is the configured base prompt, extended with a
//! delimited context block made of the selected documents' passages, and is
//! prefixed onto the first user turn.
use std::collections::HashSet;

use docsel_core::types::{ChatMessage, ChatRole, GenerationRequest};

use crate::aggregate::DocumentMap;
use crate::ledger::current_selections;

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    base_prompt: String,
    max_context_chars: usize,
}

impl PromptBuilder {
    pub fn new(base_prompt: impl Into<String>, max_context_chars: usize) -> Self {
        Self { base_prompt: base_prompt.into(), max_context_chars }
    }

    /// Passage texts of the selected documents, in selection order, capped
    /// at `max_context_chars`. Blank and repeated passages are skipped.
    pub fn context_passages(&self, documents: &DocumentMap) -> Vec<String> {
        let mut passages = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut used = 0usize;
        for selection in current_selections(documents) {
            let Some(doc) = documents.get(&selection.uri) else { continue };
            for citation in &doc.citations {
                let text = citation.text.trim();
                if text.is_empty() || !seen.insert(text) {
                    continue;
                }
                let len = text.chars().count();
                if used + len > self.max_context_chars {
                    tracing::debug!(used, skipped = len, "context limit reached");
                    return passages;
                }
                used += len;
                passages.push(text.to_string());
            }
        }
        passages
    }

    pub fn system_prompt(&self, passages: &[String]) -> String {
        if passages.is_empty() {
            return self.base_prompt.clone();
        }
        format!(
            "{} Use the following context to inform your responses:\n\nContext:\n\n====\n{}\n====\n\nRemember to use this context to provide accurate and relevant information while maintaining a natural conversation.",
            self.base_prompt,
            passages.join("\n\n")
        )
    }

    /// Transcript plus the new question, with the system prompt prefixed
    /// onto the first user turn.
    pub fn build(&self, documents: &DocumentMap, transcript: &[ChatMessage], question: &str) -> GenerationRequest {
        let system = self.system_prompt(&self.context_passages(documents));
        let mut messages: Vec<ChatMessage> = transcript.to_vec();
        messages.push(ChatMessage::user(question));
        if messages.first().is_some_and(|m| m.role == ChatRole::User) {
            messages[0].content = format!("{}\n\n{}", system, messages[0].content);
        } else {
            messages.insert(0, ChatMessage::user(system));
        }
        GenerationRequest {
            document_uris: current_selections(documents).into_iter().map(|s| s.uri).collect(),
            messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsel_core::types::{Citation, Document};

    fn selected_doc(uri: &str, texts: &[&str]) -> Document {
        let mut citations = texts.iter().map(|t| Citation {
            text: t.to_string(),
            document_title: uri.to_string(),
            document_type: "Guidance".to_string(),
            uri: Some(uri.to_string()),
            score: 0.0,
            confidence: None,
        });
        let mut doc = Document::from_citation(citations.next().expect("one citation"), true);
        for c in citations {
            doc.absorb(c);
        }
        doc
    }

    #[test]
    fn no_selection_uses_bare_base_prompt() {
        let builder = PromptBuilder::new("You are a helpful assistant.", 1000);
        let request = builder.build(&DocumentMap::new(), &[], "hello");
        assert!(request.document_uris.is_empty());
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "You are a helpful assistant.\n\nhello");
    }

    #[test]
    fn context_block_lists_selected_passages() {
        let mut documents = DocumentMap::new();
        documents.insert("A".to_string(), selected_doc("A", &["first", " ", "second"]));
        let builder = PromptBuilder::new("Base.", 1000);
        let request = builder.build(&documents, &[], "q");
        assert_eq!(request.document_uris, vec!["A"]);
        assert!(request.messages[0].content.starts_with("Base. Use the following context"));
        assert!(request.messages[0].content.contains("====\nfirst\n\nsecond\n===="));
        assert!(request.messages[0].content.ends_with("\n\nq"));
    }

    #[test]
    fn context_is_capped() {
        let mut documents = DocumentMap::new();
        documents.insert("A".to_string(), selected_doc("A", &["aaaa", "bbbb", "cccc"]));
        let builder = PromptBuilder::new("Base.", 9);
        assert_eq!(builder.context_passages(&documents), vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn repeated_passages_sent_once() {
        let mut documents = DocumentMap::new();
        documents.insert("A".to_string(), selected_doc("A", &["a1", "a2", "a1 ", "a2"]));
        let builder = PromptBuilder::new("Base.", 4);
        assert_eq!(builder.context_passages(&documents), vec!["a1", "a2"]);
    }

    #[test]
    fn transcript_starting_with_assistant_gets_leading_user_turn() {
        let builder = PromptBuilder::new("Base.", 100);
        let transcript = vec![ChatMessage::assistant("hi there")];
        let request = builder.build(&DocumentMap::new(), &transcript, "q");
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0], ChatMessage::user("Base."));
        assert_eq!(request.messages[2], ChatMessage::user("q"));
    }
}
