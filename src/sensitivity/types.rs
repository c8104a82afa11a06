//! Sensitivity, what-if and robustness reports.

use crate::catalog::Metric;
use std::collections::BTreeMap;
use std::fmt;

/// Coarse reading of an impact score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImpactLevel {
    /// `impact_score <= 0.1`
    Low,
    /// `0.1 < impact_score <= 0.3`
    Medium,
    /// `impact_score > 0.3`
    High,
}

impl ImpactLevel {
    pub fn from_score(score: f64) -> Self {
        if score > 0.3 {
            ImpactLevel::High
        } else if score > 0.1 {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactLevel::Low => f.write_str("low"),
            ImpactLevel::Medium => f.write_str("medium"),
            ImpactLevel::High => f.write_str("high"),
        }
    }
}

/// How a ranking moved between a baseline and a rerun.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct RankingShift {
    pub rank_deltas: BTreeMap<String, i64>,
    pub impact_score: f64,
    pub dropped: Vec<String>,
    pub entered: Vec<String>,
}

impl RankingShift {
    /// Compares two rankings (codes, best first).
    ///
    /// Deltas are `new_rank − old_rank` for codes present in both. The
    /// impact score is `mean(|delta|) / (N − 1)` with `N` the baseline
    /// length, clipped to `[0, 1]`, and 0 when `N <= 1` or nothing overlaps.
    pub fn between(original: &[String], new: &[String]) -> Self {
        let new_pos: BTreeMap<&str, usize> = new
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        let old_pos: BTreeMap<&str, usize> = original
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let mut rank_deltas = BTreeMap::new();
        let mut dropped = Vec::new();
        for (old, code) in original.iter().enumerate() {
            match new_pos.get(code.as_str()) {
                Some(&new) => {
                    rank_deltas.insert(code.clone(), new as i64 - old as i64);
                }
                None => dropped.push(code.clone()),
            }
        }
        let entered = new
            .iter()
            .filter(|c| !old_pos.contains_key(c.as_str()))
            .cloned()
            .collect();

        let n = original.len();
        let impact_score = if n <= 1 || rank_deltas.is_empty() {
            0.0
        } else {
            let total: i64 = rank_deltas.values().map(|d| d.abs()).sum();
            let mean = total as f64 / rank_deltas.len() as f64;
            (mean / (n - 1) as f64).clamp(0.0, 1.0)
        };

        Self {
            rank_deltas,
            impact_score,
            dropped,
            entered,
        }
    }
}

/// Ranking stability under a relative shock to one parameter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensitivityResult {
    pub parameter: Metric,
    /// Catalog mean of the parameter before the shock.
    ///
    /// This is an aggregate over every candidate in the input catalog,
    /// infeasible ones included. It is not the value of any single
    /// candidate; read per-candidate values from the catalog itself.
    pub base_value: f64,
    /// Relative shock, e.g. `0.10` for +10%.
    pub shock_percentage: f64,
    /// Feasible codes, best first, before the shock.
    pub original_ranking: Vec<String>,
    /// Feasible codes, best first, after the shock.
    pub new_ranking: Vec<String>,
    /// `new_rank − old_rank` for candidates feasible in both runs.
    pub rank_deltas: BTreeMap<String, i64>,
    /// `mean(|delta|) / (N − 1)`, in `[0, 1]`.
    pub impact_score: f64,
    /// Feasible before the shock, infeasible after.
    pub dropped: Vec<String>,
    /// Infeasible before the shock, feasible after.
    pub entered: Vec<String>,
}

impl SensitivityResult {
    pub(crate) fn new(
        parameter: Metric,
        base_value: f64,
        shock_percentage: f64,
        original_ranking: Vec<String>,
        new_ranking: Vec<String>,
    ) -> Self {
        let shift = RankingShift::between(&original_ranking, &new_ranking);
        Self {
            parameter,
            base_value,
            shock_percentage,
            original_ranking,
            new_ranking,
            rank_deltas: shift.rank_deltas,
            impact_score: shift.impact_score,
            dropped: shift.dropped,
            entered: shift.entered,
        }
    }

    /// Baseline winner.
    pub fn original_top(&self) -> Option<&str> {
        self.original_ranking.first().map(String::as_str)
    }

    /// Winner after the shock.
    pub fn new_top(&self) -> Option<&str> {
        self.new_ranking.first().map(String::as_str)
    }

    /// Whether the shock changed the winner.
    pub fn top_changed(&self) -> bool {
        self.original_top() != self.new_top()
    }

    pub fn impact_level(&self) -> ImpactLevel {
        ImpactLevel::from_score(self.impact_score)
    }
}

impl fmt::Display for SensitivityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:+.1}%: {} impact (score {:.3})",
            self.parameter,
            self.shock_percentage * 100.0,
            self.impact_level(),
            self.impact_score
        )?;
        if self.top_changed() {
            write!(f, ", new best {}", self.new_top().unwrap_or("none"))?;
        }
        Ok(())
    }
}

/// Several shocks applied separately and together.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhatIfResult {
    /// One single-parameter result per shock, in input order.
    pub scenarios: Vec<SensitivityResult>,
    /// Every shock applied at once.
    pub shocks: Vec<(Metric, f64)>,
    pub original_ranking: Vec<String>,
    pub combined_ranking: Vec<String>,
    pub rank_deltas: BTreeMap<String, i64>,
    pub impact_score: f64,
    pub dropped: Vec<String>,
    pub entered: Vec<String>,
    /// Whether the winner differs under the combined scenario.
    pub top_changed: bool,
}

impl WhatIfResult {
    /// Sum of the single-parameter impact scores.
    pub fn total_impact(&self) -> f64 {
        self.scenarios.iter().map(|s| s.impact_score).sum()
    }

    /// Winner under the combined scenario.
    pub fn combined_top(&self) -> Option<&str> {
        self.combined_ranking.first().map(String::as_str)
    }
}

/// How stable the winner is under random weight perturbation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobustnessReport {
    pub trials: usize,
    /// Winner under the unperturbed weights.
    pub baseline_winner: String,
    /// Share of trials where the baseline winner stayed first, in `[0, 1]`.
    pub winner_stability: f64,
    /// Number of trials each candidate ranked first.
    pub win_counts: BTreeMap<String, usize>,
    /// Mean rank per candidate across trials.
    pub mean_rank: BTreeMap<String, f64>,
}

impl RobustnessReport {
    /// Candidate winning the most trials (lowest code on ties).
    pub fn most_frequent_winner(&self) -> Option<&str> {
        self.win_counts
            .iter()
            .fold(None, |best: Option<(&String, usize)>, (code, &n)| match best {
                Some((_, m)) if m >= n => best,
                _ => Some((code, n)),
            })
            .map(|(code, _)| code.as_str())
    }
}
