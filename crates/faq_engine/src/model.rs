use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A served exchange. `question` holds the normalized query, not the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub question: String,
    pub answer: String,
}

impl InteractionRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum MatchSource {
    Faq(usize),
    Interaction(usize),
    Fallback,
}

impl MatchSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub answer: String,
    pub source: MatchSource,
    /// Similarity of the winning candidate, or of the best rejected one on fallback.
    pub score: f32,
    pub normalized_query: String,
}
