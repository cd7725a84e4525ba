pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod eval;
pub mod language;
pub mod model;
pub mod normalize;
pub mod retrieval;
pub mod storage;
pub mod vectorize;

pub use config::{
    EngineConfig, DEFAULT_FAQS_PATH, DEFAULT_INTERACTIONS_PATH, DEFAULT_THRESHOLD,
    FALLBACK_MESSAGE,
};
pub use corpus::{load_curated, recover_interactions, seed_faqs, CorpusStore, SEED_FAQS};
pub use engine::FaqEngine;
pub use error::{EngineError, Result};
pub use eval::{evaluate_cases, load_eval_cases, EvalCase, EvalOutcome, EvalSummary};
pub use language::{EnglishResource, LanguageResource};
pub use model::{FaqEntry, InteractionRecord, MatchSource, Reply};
pub use normalize::Normalizer;
pub use retrieval::{cosine_similarity, decide, top_match};
pub use storage::{
    load_faqs_json, load_interactions_json, save_interactions_json, InteractionStore,
    JsonFileStore, MemoryStore,
};
pub use vectorize::{SparseVector, VectorSpaceModel};
