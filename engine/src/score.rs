use std::collections::HashSet;

use crate::error::EngineError;
use crate::model::{JobPosting, MatchBreakdown, ResumeProfile};
use crate::tokenizer::normalize;

/// Fixed scoring policy. The defaults put 0.6 on description similarity and
/// weight the bonus sum so a saturated posting (similarity 1.0 and all three
/// bonuses at 1.0) reaches a raw score of exactly 1.0 before capping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub similarity: f64,
    pub bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self { similarity: 0.6, bonus: 0.4 / 3.0 }
    }
}

impl ScoringWeights {
    /// Startup-time validation. Weights must be finite, non-negative, and not
    /// all zero; anything else is a fatal configuration error, not a
    /// per-item one.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, w) in [("similarity", self.similarity), ("bonus", self.bonus)] {
            if !w.is_finite() {
                return Err(EngineError::Configuration(format!("{name} weight is not finite")));
            }
            if w < 0.0 {
                return Err(EngineError::Configuration(format!("{name} weight is negative: {w}")));
            }
        }
        if self.similarity == 0.0 && self.bonus == 0.0 {
            return Err(EngineError::Configuration("all weights are zero".into()));
        }
        Ok(())
    }
}

/// Set-overlap similarity: |intersection| / |union|. Robust to the length
/// mismatch between a long résumé and a short posting, and O(n) with sets.
/// Either side empty is 0.0, not NaN.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Fraction of the posting's declared skill tokens covered by the résumé's
/// keyword or skill sets. A posting that declares no skills earns nothing:
/// absence of signal is not rewarded.
pub fn skill_token_bonus(resume: &ResumeProfile, posting: &JobPosting) -> f64 {
    if posting.skills.is_empty() {
        return 0.0;
    }
    let hits = posting
        .skills
        .iter()
        .filter(|s| resume.keywords.contains(*s) || resume.skills.contains(*s))
        .count();
    hits as f64 / posting.skills.len() as f64
}

/// 1.0 when any normalized token of the posting's category appears among the
/// résumé keywords, else 0.0. No category, no bonus.
pub fn category_bonus(resume: &ResumeProfile, posting: &JobPosting) -> f64 {
    let Some(category) = posting.category.as_deref() else {
        return 0.0;
    };
    let tokens = normalize(category);
    if !tokens.is_empty() && tokens.iter().any(|t| resume.keywords.contains(t)) {
        1.0
    } else {
        0.0
    }
}

/// Overlap ratio between the posting title's tokens and the résumé keywords.
/// An empty or stopword-only title scores 0.0.
pub fn title_bonus(resume: &ResumeProfile, posting: &JobPosting) -> f64 {
    let title_tokens = normalize(&posting.title);
    if title_tokens.is_empty() {
        return 0.0;
    }
    let overlap = title_tokens
        .iter()
        .filter(|t| resume.keywords.contains(*t))
        .count();
    overlap as f64 / title_tokens.len() as f64
}

/// Composite scorer: description similarity plus the three bonus signals,
/// weighted, capped at 1.0, reported as an integer percentage.
///
/// Pure function of (profile, posting, weights): same inputs always yield the
/// same breakdown.
pub fn score_one(
    resume: &ResumeProfile,
    posting: &JobPosting,
    weights: &ScoringWeights,
) -> MatchBreakdown {
    let posting_tokens = normalize(&posting.description);
    let similarity_score = jaccard(&resume.keywords, &posting_tokens);

    let token_bonus = skill_token_bonus(resume, posting);
    let category_bonus = category_bonus(resume, posting);
    let title_bonus = title_bonus(resume, posting);
    let total_bonus = token_bonus + category_bonus + title_bonus;

    let raw = similarity_score * weights.similarity + total_bonus * weights.bonus;
    let match_percentage = (raw.clamp(0.0, 1.0) * 100.0).round() as u8;

    MatchBreakdown {
        similarity_score,
        token_bonus,
        category_bonus,
        title_bonus,
        total_bonus,
        match_percentage,
    }
}
