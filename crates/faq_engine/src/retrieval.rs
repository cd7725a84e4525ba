use crate::model::MatchSource;
use crate::vectorize::SparseVector;

pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }

    let (na, nb) = (a.norm(), b.norm());
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        a.dot(b) / (na * nb)
    }
}

/// Most similar candidate in one pass. Only a strictly higher score replaces
/// the current best, so the lowest index wins a tie. `None` when there are no
/// candidates at all.
pub fn top_match(query: &SparseVector, candidates: &[SparseVector]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;

    for (idx, candidate) in candidates.iter().enumerate() {
        let score = cosine_similarity(query, candidate);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((idx, score)),
        }
    }

    best
}

/// Chooses between the best curated and the best learned candidate.
///
/// The curated candidate wins only with a strictly higher score; anything
/// scoring under `threshold`, or an empty learned set on the second branch,
/// falls back. Returns the chosen source and the score that decided it.
pub fn decide(
    best_faq: Option<(usize, f32)>,
    best_interaction: Option<(usize, f32)>,
    threshold: f32,
) -> (MatchSource, f32) {
    let faq_score = best_faq.map_or(0.0, |(_, s)| s);
    let interaction_score = best_interaction.map_or(0.0, |(_, s)| s);

    if faq_score > interaction_score {
        match best_faq {
            Some((idx, score)) if score >= threshold => (MatchSource::Faq(idx), score),
            _ => (MatchSource::Fallback, faq_score),
        }
    } else {
        match best_interaction {
            Some((idx, score)) if score >= threshold => (MatchSource::Interaction(idx), score),
            _ => (MatchSource::Fallback, interaction_score),
        }
    }
}
