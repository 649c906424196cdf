use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::model::{JobPosting, MatchBreakdown, MatchOutcome, ResumeProfile};
use crate::score::{score_one, ScoringWeights};

/// Score one résumé against a whole posting collection.
///
/// Every posting is visited exactly once and gets exactly one entry in the
/// returned map. A record that fails validation is reported as `Failed` with
/// the zero sentinel and an error note; the rest of the batch proceeds.
/// Posting ids are expected unique; on a duplicate the first outcome is kept.
pub fn match_all(
    resume: &ResumeProfile,
    postings: &[JobPosting],
    weights: &ScoringWeights,
) -> HashMap<String, MatchOutcome> {
    let mut outcomes: HashMap<String, MatchOutcome> = HashMap::with_capacity(postings.len());
    for posting in postings {
        let outcome = match posting.validate() {
            Ok(()) => MatchOutcome::Scored { breakdown: score_one(resume, posting, weights) },
            Err(err) => {
                tracing::warn!(title = %posting.title, %err, "posting rejected, reporting zero score");
                MatchOutcome::Failed { breakdown: MatchBreakdown::zero(), error: err.to_string() }
            }
        };
        match outcomes.entry(posting.id.clone()) {
            Entry::Occupied(_) => {
                tracing::warn!(id = %posting.id, "duplicate posting id in batch, keeping first outcome");
            }
            Entry::Vacant(slot) => {
                slot.insert(outcome);
            }
        }
    }
    tracing::debug!(postings = postings.len(), entries = outcomes.len(), "batch match complete");
    outcomes
}
