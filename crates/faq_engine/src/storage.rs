use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::{EngineError, Result};
use crate::model::{FaqEntry, InteractionRecord};

/// Reads a JSON object of `question -> answer`, keeping document order.
pub fn load_faqs_json(path: &Path) -> Result<Vec<FaqEntry>> {
    let file = File::open(path).map_err(|e| EngineError::io(path, e))?;
    let faqs: OrderedFaqs = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| EngineError::serde(path, e))?;
    Ok(faqs.0)
}

pub fn load_interactions_json(path: &Path) -> Result<Vec<InteractionRecord>> {
    let file = File::open(path).map_err(|e| EngineError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| EngineError::serde(path, e))
}

/// Rewrites the log through a sibling `.tmp` file renamed over `path`, so an
/// interrupted write never leaves a truncated log behind.
pub fn save_interactions_json(path: &Path, records: &[InteractionRecord]) -> Result<()> {
    let tmp_path = staging_path(path);
    let file = File::create(&tmp_path).map_err(|e| EngineError::io(&tmp_path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer(&mut writer, records).map_err(|e| EngineError::serde(&tmp_path, e))?;
    writer.flush().map_err(|e| EngineError::io(&tmp_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| EngineError::io(&tmp_path, e))?;

    fs::rename(&tmp_path, path).map_err(|e| EngineError::io(path, e))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Durable home of the interaction log.
pub trait InteractionStore {
    fn load(&self) -> Result<Vec<InteractionRecord>>;

    /// Replaces the persisted log with `records`.
    fn save(&mut self, records: &[InteractionRecord]) -> Result<()>;
}

impl InteractionStore for Box<dyn InteractionStore + Send> {
    fn load(&self) -> Result<Vec<InteractionRecord>> {
        (**self).load()
    }

    fn save(&mut self, records: &[InteractionRecord]) -> Result<()> {
        (**self).save(records)
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InteractionStore for JsonFileStore {
    fn load(&self) -> Result<Vec<InteractionRecord>> {
        load_interactions_json(&self.path)
    }

    fn save(&mut self, records: &[InteractionRecord]) -> Result<()> {
        save_interactions_json(&self.path, records)
    }
}

/// Keeps the log in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<InteractionRecord>,
}

impl MemoryStore {
    pub fn with_records(records: Vec<InteractionRecord>) -> Self {
        Self { records }
    }
}

impl InteractionStore for MemoryStore {
    fn load(&self) -> Result<Vec<InteractionRecord>> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[InteractionRecord]) -> Result<()> {
        self.records = records.to_vec();
        Ok(())
    }
}

struct OrderedFaqs(Vec<FaqEntry>);

impl<'de> Deserialize<'de> for OrderedFaqs {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FaqMapVisitor;

        impl<'de> Visitor<'de> for FaqMapVisitor {
            type Value = OrderedFaqs;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of question to answer")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<FaqEntry> = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((question, answer)) = map.next_entry::<String, String>()? {
                    // A repeated key keeps its first position and its last answer.
                    match entries.iter_mut().find(|e| e.question == question) {
                        Some(existing) => existing.answer = answer,
                        None => entries.push(FaqEntry { question, answer }),
                    }
                }
                Ok(OrderedFaqs(entries))
            }
        }

        deserializer.deserialize_map(FaqMapVisitor)
    }
}
