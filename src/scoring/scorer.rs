//! Weighted-sum scoring and ranking.

use super::weights::WeightMap;
use crate::normalize::NormalizedCatalog;
use std::cmp::Ordering;
use tracing::debug;

/// One candidate's weighted-sum score and its position in the ranking.
///
/// Lower scores are better. Ranks are 1-based and assigned after a full
/// deterministic sort (score ascending, then code).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreRecord {
    pub code: String,
    pub score: f64,
    pub rank: usize,
}

/// Scores and ranks every candidate of a normalized catalog.
///
/// Per candidate:
///
/// ```text
/// score = Σ(wᵢ · normᵢ) / Σ(wᵢ for metrics present on this candidate)
/// ```
///
/// Weights whose metric was not normalized for a candidate are left out of
/// both sums. Two candidates with different missing-metric patterns are
/// therefore scored over different weight bases; the comparison between them
/// is an approximation.
///
/// A candidate with no weighted metric present (or only zero weights) scores
/// `+∞` and ranks last, as does any score that comes out NaN.
///
/// Output order is total and depends only on the inputs: scores compare with
/// [`f64::total_cmp`] and ties break on code. Repeated runs produce
/// identical records.
pub fn score_weighted_sum(normalized: &NormalizedCatalog, weights: &WeightMap) -> Vec<ScoreRecord> {
    let mut records: Vec<ScoreRecord> = normalized
        .entries()
        .map(|(code, values)| {
            let mut weighted = 0.0;
            let mut total_weight = 0.0;
            for (metric, weight) in weights.iter() {
                if let Some(&value) = values.get(&metric) {
                    weighted += weight * value;
                    total_weight += weight;
                }
            }
            let score = if total_weight > 0.0 {
                weighted / total_weight
            } else {
                f64::INFINITY
            };
            // NaN would sort ahead of every finite score under total_cmp.
            let score = if score.is_nan() { f64::INFINITY } else { score };
            ScoreRecord {
                code: code.to_string(),
                score,
                rank: 0,
            }
        })
        .collect();

    records.sort_by(compare_records);
    for (i, record) in records.iter_mut().enumerate() {
        record.rank = i + 1;
    }

    debug!(
        candidates = records.len(),
        best = records.first().map(|r| r.code.as_str()).unwrap_or("-"),
        "weighted-sum ranking computed"
    );
    records
}

fn compare_records(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| a.code.cmp(&b.code))
}

/// Codes in ranked order.
pub fn ranked_codes(records: &[ScoreRecord]) -> Vec<String> {
    records.iter().map(|r| r.code.clone()).collect()
}
