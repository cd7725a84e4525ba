use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{FaqEntry, InteractionRecord};
use crate::storage::{load_faqs_json, InteractionStore};

/// Curated entries used when no FAQ file is available.
pub const SEED_FAQS: [(&str, &str); 3] = [
    (
        "What is the return policy?",
        "You can return any item within 30 days of purchase.",
    ),
    (
        "How do I track my order?",
        "You can track your order using the tracking link sent to your email.",
    ),
    (
        "What payment methods are accepted?",
        "We accept credit cards, PayPal, and bank transfers.",
    ),
];

pub fn seed_faqs() -> Vec<FaqEntry> {
    SEED_FAQS
        .iter()
        .map(|(q, a)| FaqEntry::new(*q, *a))
        .collect()
}

/// Loads curated entries from `path`, falling back to [`SEED_FAQS`].
pub fn load_curated(path: &Path) -> Vec<FaqEntry> {
    match load_faqs_json(path) {
        Ok(entries) => entries,
        Err(err) if err.is_not_found() => {
            debug!(path = %path.display(), "no faq file, using seed entries");
            seed_faqs()
        }
        Err(err) => {
            warn!(error = %err, "unreadable faq file, using seed entries");
            seed_faqs()
        }
    }
}

/// Reads the persisted log from `store`. A missing log starts empty; an
/// unreadable one starts empty with a warning.
pub fn recover_interactions<S>(store: &S) -> Vec<InteractionRecord>
where
    S: InteractionStore + ?Sized,
{
    match store.load() {
        Ok(records) => records,
        Err(err) if err.is_not_found() => Vec::new(),
        Err(err) => {
            warn!(error = %err, "unreadable interaction log, starting empty");
            Vec::new()
        }
    }
}

/// Curated entries plus the append-only interaction log.
pub struct CorpusStore {
    curated: Vec<FaqEntry>,
    interactions: Vec<InteractionRecord>,
    store: Box<dyn InteractionStore + Send>,
}

impl CorpusStore {
    /// Reads the persisted log once through [`recover_interactions`].
    pub fn new(curated: Vec<FaqEntry>, store: Box<dyn InteractionStore + Send>) -> Self {
        let interactions = recover_interactions(&store);

        debug!(
            curated = curated.len(),
            interactions = interactions.len(),
            "corpus loaded"
        );

        Self {
            curated,
            interactions,
            store,
        }
    }

    pub fn curated(&self) -> &[FaqEntry] {
        &self.curated
    }

    pub fn interactions(&self) -> &[InteractionRecord] {
        &self.interactions
    }

    /// Appends `record` and writes the full log through to the store. The
    /// record stays in memory even when the write fails.
    pub fn append(&mut self, record: InteractionRecord) -> Result<()> {
        self.interactions.push(record);
        self.store.save(&self.interactions)
    }
}

impl std::fmt::Debug for CorpusStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusStore")
            .field("curated", &self.curated.len())
            .field("interactions", &self.interactions.len())
            .finish_non_exhaustive()
    }
}
