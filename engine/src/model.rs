use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::EngineError;
use crate::skills::extract_skills;
use crate::tokenizer::normalize;

/// Normalized token view of one candidate résumé.
///
/// Built once per résumé and passed into every scoring call; the engine never
/// reads ambient session state. Rebuild only when the underlying résumé text
/// changes.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeProfile {
    pub raw_text: String,
    /// Normalized skill tokens: caller-declared skills plus lexicon hits in
    /// the text. May be empty.
    pub skills: HashSet<String>,
    /// Normalized tokens of `raw_text`.
    pub keywords: HashSet<String>,
}

impl ResumeProfile {
    pub fn new(raw_text: impl Into<String>, declared_skills: &[String]) -> Self {
        let raw_text = raw_text.into();
        let keywords = normalize(&raw_text);
        let mut skills: HashSet<String> = declared_skills
            .iter()
            .flat_map(|s| normalize(s))
            .collect();
        skills.extend(extract_skills(&keywords));
        Self { raw_text, skills, keywords }
    }

    pub fn from_text(raw_text: impl Into<String>) -> Self {
        Self::new(raw_text, &[])
    }
}

/// One externally-sourced job listing.
///
/// Only `id`, `title`, `description`, `category` and `skills` feed the
/// scorer; the remaining fields are carried for display. Skill tokens are
/// expected normalized (the importer writes them that way).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub skills: HashSet<String>,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub posted_date: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
}

impl JobPosting {
    /// Record-level check used by the batch service. Scoring itself never
    /// fails; a record that cannot be keyed is the per-item failure case.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.id.trim().is_empty() {
            return Err(EngineError::InputData("posting id is empty".into()));
        }
        Ok(())
    }
}

/// Decomposition of one (résumé, posting) match score. Value object,
/// recomputed on every request and never persisted by the engine.
///
/// `total_bonus` is the uncapped sum of the three bonus components, so it
/// ranges over [0, 3]; capping happens once, at the weighted raw score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchBreakdown {
    pub similarity_score: f64,
    pub token_bonus: f64,
    pub category_bonus: f64,
    pub title_bonus: f64,
    pub total_bonus: f64,
    pub match_percentage: u8,
}

impl MatchBreakdown {
    /// Sentinel for postings that could not be scored at all.
    pub fn zero() -> Self {
        Self {
            similarity_score: 0.0,
            token_bonus: 0.0,
            category_bonus: 0.0,
            title_bonus: 0.0,
            total_bonus: 0.0,
            match_percentage: 0,
        }
    }
}

/// Per-posting batch result. `Failed` marks a record the service refused to
/// score; it still carries the zero sentinel so callers can render one row
/// per posting, and the note distinguishes "failed to score" from "scored
/// zero".
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchOutcome {
    Scored { breakdown: MatchBreakdown },
    Failed { breakdown: MatchBreakdown, error: String },
}

impl MatchOutcome {
    pub fn breakdown(&self) -> &MatchBreakdown {
        match self {
            MatchOutcome::Scored { breakdown } | MatchOutcome::Failed { breakdown, .. } => breakdown,
        }
    }

    pub fn match_percentage(&self) -> u8 {
        self.breakdown().match_percentage
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, MatchOutcome::Scored { .. })
    }
}
