use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::corpus::{load_curated, CorpusStore};
use crate::error::Result;
use crate::model::{FaqEntry, InteractionRecord, MatchSource, Reply};
use crate::normalize::Normalizer;
use crate::retrieval::{decide, top_match};
use crate::storage::{InteractionStore, JsonFileStore};
use crate::vectorize::VectorSpaceModel;

/// Owns the corpus and the vector space built over it.
///
/// [`FaqEngine::respond`] takes `&mut self`: every served query rebuilds the
/// model, so callers sharing an engine across threads must put it behind a
/// single lock.
#[derive(Debug)]
pub struct FaqEngine {
    config: EngineConfig,
    normalizer: Normalizer,
    corpus: CorpusStore,
    model: VectorSpaceModel,
}

impl FaqEngine {
    /// Opens the file-backed engine described by `config`. Missing or broken
    /// resources are replaced by defaults, never reported.
    pub fn open(config: EngineConfig) -> Result<Self> {
        let curated = load_curated(&config.faqs_path);
        let store = JsonFileStore::new(config.interactions_path.clone());
        Self::with_parts(config, Normalizer::default(), curated, Box::new(store))
    }

    pub fn with_parts(
        config: EngineConfig,
        normalizer: Normalizer,
        curated: Vec<FaqEntry>,
        store: Box<dyn InteractionStore + Send>,
    ) -> Result<Self> {
        config.validate()?;
        let mut engine = Self {
            config,
            normalizer,
            corpus: CorpusStore::new(curated, store),
            model: VectorSpaceModel::new(),
        };
        engine.rebuild();
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn curated(&self) -> &[FaqEntry] {
        self.corpus.curated()
    }

    pub fn interactions(&self) -> &[InteractionRecord] {
        self.corpus.interactions()
    }

    pub fn model(&self) -> &VectorSpaceModel {
        &self.model
    }

    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Answers `query` and learns from the exchange.
    pub fn respond(&mut self, query: &str) -> String {
        self.respond_detailed(query).answer
    }

    pub fn respond_detailed(&mut self, query: &str) -> Reply {
        let reply = self.best_match(query);

        info!(
            source = ?reply.source,
            score = reply.score,
            "served query"
        );

        if self.config.learn_fallbacks || !reply.source.is_fallback() {
            self.learn(InteractionRecord::new(
                reply.normalized_query.clone(),
                reply.answer.clone(),
            ));
        }

        reply
    }

    /// Scores `query` against the current corpus without recording anything.
    pub fn best_match(&self, query: &str) -> Reply {
        let normalized_query = self.normalizer.normalize(query);
        let query_vector = self.model.project(&normalized_query);

        let best_faq = top_match(&query_vector, self.model.faq_vectors());
        let best_interaction = top_match(&query_vector, self.model.interaction_vectors());
        let (source, score) = decide(best_faq, best_interaction, self.config.threshold);

        let answer = match source {
            MatchSource::Faq(idx) => self.corpus.curated()[idx].answer.clone(),
            MatchSource::Interaction(idx) => self.corpus.interactions()[idx].answer.clone(),
            MatchSource::Fallback => self.config.fallback_message.clone(),
        };

        Reply {
            answer,
            source,
            score,
            normalized_query,
        }
    }

    /// Appends `record` to the corpus and refits the vector space before
    /// returning. A failed write is logged; the record is still learned.
    pub fn learn(&mut self, record: InteractionRecord) {
        if let Err(err) = self.corpus.append(record) {
            warn!(error = %err, "failed to persist interaction log");
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let curated = self.corpus.curated().iter().map(|e| e.question.as_str());
        let interactions = self
            .corpus
            .interactions()
            .iter()
            .map(|r| r.question.as_str());
        self.model.rebuild(&self.normalizer, curated, interactions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FALLBACK_MESSAGE;
    use crate::corpus::seed_faqs;
    use crate::storage::MemoryStore;

    fn engine_with(curated: Vec<FaqEntry>) -> FaqEngine {
        FaqEngine::with_parts(
            EngineConfig::default(),
            Normalizer::default(),
            curated,
            Box::new(MemoryStore::default()),
        )
        .expect("engine")
    }

    #[test]
    fn answers_from_curated_entries() {
        let mut engine = engine_with(seed_faqs());
        let reply = engine.respond_detailed("Where can I track my order?");

        assert_eq!(reply.source, MatchSource::Faq(1));
        assert_eq!(
            reply.answer,
            "You can track your order using the tracking link sent to your email."
        );
        assert_eq!(reply.normalized_query, "track order");
    }

    #[test]
    fn empty_query_falls_back_and_is_learned() {
        let mut engine = engine_with(seed_faqs());
        let reply = engine.respond_detailed("");

        assert_eq!(reply.source, MatchSource::Fallback);
        assert_eq!(reply.answer, FALLBACK_MESSAGE);
        assert_eq!(reply.score, 0.0);
        assert_eq!(
            engine.interactions(),
            &[InteractionRecord::new("", FALLBACK_MESSAGE)]
        );
    }

    #[test]
    fn best_match_does_not_learn() {
        let engine = engine_with(seed_faqs());
        let reply = engine.best_match("What payment methods do you accept?");

        assert_eq!(reply.source, MatchSource::Faq(2));
        assert!(engine.interactions().is_empty());
    }

    #[test]
    fn learning_can_skip_fallbacks() {
        let config = EngineConfig {
            learn_fallbacks: false,
            ..EngineConfig::default()
        };
        let mut engine = FaqEngine::with_parts(
            config,
            Normalizer::default(),
            seed_faqs(),
            Box::new(MemoryStore::default()),
        )
        .expect("engine");

        engine.respond("xyzabc qwerty");
        assert!(engine.interactions().is_empty());

        engine.respond("What is the return policy?");
        assert_eq!(engine.interactions().len(), 1);
    }

    #[test]
    fn learned_terms_enter_the_vocabulary() {
        let mut engine = engine_with(seed_faqs());
        assert_eq!(engine.model().term_index("refund"), None);

        engine.respond("refund please");
        assert!(engine.model().term_index("refund").is_some());
        assert_eq!(engine.model().interaction_vectors().len(), 1);
    }

    #[test]
    fn empty_curated_set_uses_interactions_only() {
        let mut engine = FaqEngine::with_parts(
            EngineConfig::default(),
            Normalizer::default(),
            Vec::new(),
            Box::new(MemoryStore::with_records(vec![InteractionRecord::new(
                "shipping cost",
                "Shipping is free over $50.",
            )])),
        )
        .expect("engine");

        let reply = engine.respond_detailed("What does shipping cost?");
        assert_eq!(reply.source, MatchSource::Interaction(0));
        assert_eq!(reply.answer, "Shipping is free over $50.");
    }

    #[test]
    fn contractions_do_not_leak_stop_words_into_matching() {
        let mut engine = engine_with(seed_faqs());

        let first = engine.respond_detailed("What's the return policy?");
        assert_eq!(first.source, MatchSource::Faq(0));
        assert_eq!(first.normalized_query, "return policy");
        assert_eq!(engine.model().term_index("what"), None);

        let reply = engine.respond_detailed("What's your phone number?");
        assert_eq!(reply.source, MatchSource::Fallback);
        assert_eq!(reply.answer, FALLBACK_MESSAGE);
        assert_eq!(reply.score, 0.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig {
            threshold: -0.5,
            ..EngineConfig::default()
        };
        let result = FaqEngine::with_parts(
            config,
            Normalizer::default(),
            seed_faqs(),
            Box::new(MemoryStore::default()),
        );
        assert!(result.is_err());
    }
}
