use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::engine::FaqEngine;
use crate::error::{EngineError, Result};
use crate::model::MatchSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalCase {
    pub case_id: String,
    pub question: String,
    /// `None` expects the fallback reply.
    #[serde(default)]
    pub expected_answer: Option<String>,
    #[serde(default)]
    pub min_similarity: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalOutcome {
    pub case_id: String,
    pub passed: bool,
    pub source: MatchSource,
    pub answer: String,
    pub score: f32,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f32,
    pub outcomes: Vec<EvalOutcome>,
}

pub fn load_eval_cases(path: &Path) -> Result<Vec<EvalCase>> {
    let file = File::open(path).map_err(|e| EngineError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| EngineError::serde(path, e))
}

fn case_passed(case: &EvalCase, source: MatchSource, answer: &str, score: f32) -> bool {
    let answer_ok = match &case.expected_answer {
        Some(expected) => !source.is_fallback() && answer == expected,
        None => source.is_fallback(),
    };

    answer_ok && case.min_similarity.map_or(true, |min| score >= min)
}

/// Runs every case against the engine's current corpus. Nothing is learned.
pub fn evaluate_cases(engine: &FaqEngine, cases: &[EvalCase]) -> EvalSummary {
    let mut outcomes = Vec::with_capacity(cases.len());

    for case in cases {
        let start = Instant::now();
        let reply = engine.best_match(&case.question);
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        outcomes.push(EvalOutcome {
            case_id: case.case_id.clone(),
            passed: case_passed(case, reply.source, &reply.answer, reply.score),
            source: reply.source,
            answer: reply.answer,
            score: reply.score,
            latency_ms,
        });
    }

    let total = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.passed).count();
    let failed = total.saturating_sub(passed);
    let pass_rate = if total == 0 {
        0.0
    } else {
        passed as f32 / total as f32
    };

    EvalSummary {
        total,
        passed,
        failed,
        pass_rate,
        outcomes,
    }
}
