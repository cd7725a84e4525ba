use crate::language::{EnglishResource, LanguageResource};

/// Maps raw text to its canonical lemma sequence.
pub struct Normalizer {
    resource: Box<dyn LanguageResource + Send + Sync>,
}

impl Normalizer {
    pub fn new(resource: Box<dyn LanguageResource + Send + Sync>) -> Self {
        Self { resource }
    }

    /// Lower-cases, tokenizes and lemmatizes `text`, dropping stop words and
    /// punctuation. Never fails; text with nothing left normalizes to `""`.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();

        self.resource
            .tokenize(&lowered)
            .into_iter()
            .filter(|token| !self.resource.is_stop_word(token) && !is_punctuation(token))
            .map(|token| self.resource.lemma(&token))
            .filter(|lemma| !lemma.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Box::new(EnglishResource))
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer").finish_non_exhaustive()
    }
}

fn is_punctuation(token: &str) -> bool {
    token.chars().all(|c| !c.is_alphanumeric() && c != '_')
}
