//! Immutable catalog and ingestion.

use super::candidate::{Candidate, RawRecord};
use super::metric::Metric;
use crate::error::{DecisionError, RecordProblem, Result, SchemaError};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Typical band for the constructibility index; values outside it are
/// reported as soft warnings.
const CONSTRUCTIBILITY_BAND: (f64, f64) = (1.0, 5.0);

/// An immutable collection of candidate solutions for one analysis session.
///
/// Candidates are held in code order behind an `Arc`, so cloning a catalog
/// is cheap and no handle can reach the others' storage mutably. Every
/// "modified" view (filtered subset, shocked copy) is a new `Catalog`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use u_tradeoff::catalog::{Catalog, Metric};
///
/// let record: BTreeMap<String, f64> = [
///     ("steel_tonnage", 92.0),
///     ("concrete_volume", 3820.0),
///     ("steel_cost", 138000.0),
///     ("concrete_cost", 305600.0),
///     ("manhours", 570.0),
///     ("duration_days", 63.0),
///     ("co2_tonnes", 505.0),
///     ("constructibility_index", 2.5),
///     ("bar_geometries", 210.0),
/// ]
/// .into_iter()
/// .map(|(k, v)| (k.to_string(), v))
/// .collect();
///
/// let catalog = Catalog::from_records([("TR_6_L10", record)]).unwrap();
/// assert_eq!(catalog.len(), 1);
/// assert_eq!(catalog.get("TR_6_L10").unwrap().value(Metric::TotalCost), 443600.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    candidates: Arc<[Candidate]>,
}

impl Catalog {
    /// Validates raw records and builds a catalog.
    ///
    /// Every record must contain all [`Metric::REQUIRED`] fields with finite,
    /// non-negative values and a positive `duration_days`. Problems are
    /// aggregated across the whole input before failing. Unrecognized extra
    /// fields are ignored.
    ///
    /// # Errors
    ///
    /// [`DecisionError::Schema`] listing every offending record.
    pub fn from_records<I, K>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, RawRecord)>,
        K: Into<String>,
    {
        let mut by_code: BTreeMap<String, RawRecord> = BTreeMap::new();
        let mut problems: BTreeMap<String, RecordProblem> = BTreeMap::new();

        for (code, record) in records {
            let code = code.into();
            if by_code.contains_key(&code) {
                problems
                    .entry(code.clone())
                    .or_insert_with(|| empty_problem(&code))
                    .invalid_fields
                    .push(("code", "appears more than once".into()));
                continue;
            }
            by_code.insert(code, record);
        }

        let mut candidates = Vec::with_capacity(by_code.len());
        for (code, record) in by_code {
            match validate_record(&code, &record) {
                Ok(required) => candidates.push(Candidate::from_validated(code, required)),
                Err(problem) => {
                    let entry = problems
                        .entry(code.clone())
                        .or_insert_with(|| empty_problem(&code));
                    entry.missing_fields.extend(problem.missing_fields);
                    entry.invalid_fields.extend(problem.invalid_fields);
                }
            }
        }

        if !problems.is_empty() {
            return Err(DecisionError::Schema(SchemaError {
                problems: problems.into_values().collect(),
            }));
        }

        debug!(candidates = candidates.len(), "catalog ingested");
        Ok(Self::from_candidates(candidates))
    }

    pub(crate) fn from_candidates(mut candidates: Vec<Candidate>) -> Self {
        candidates.sort_by(|a, b| a.code().cmp(b.code()));
        Self {
            candidates: candidates.into(),
        }
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the catalog holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates in code order.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Candidate codes in lexical order.
    pub fn codes(&self) -> Vec<&str> {
        self.candidates.iter().map(Candidate::code).collect()
    }

    /// Looks up a candidate by code.
    pub fn get(&self, code: &str) -> Option<&Candidate> {
        self.candidates
            .binary_search_by(|c| c.code().cmp(code))
            .ok()
            .map(|i| &self.candidates[i])
    }

    /// Whether a candidate with this code exists.
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// A new catalog restricted to the given codes. Unknown codes are ignored.
    pub fn subset<S: AsRef<str>>(&self, codes: &[S]) -> Catalog {
        let picked = self
            .candidates
            .iter()
            .filter(|c| codes.iter().any(|code| code.as_ref() == c.code()))
            .cloned()
            .collect();
        Self::from_candidates(picked)
    }

    /// A new catalog with `metric` multiplied by `factor` on every candidate.
    ///
    /// Derived metrics scale through their components. `self` is untouched.
    pub fn scaled(&self, metric: Metric, factor: f64) -> Catalog {
        let targets = metric.shock_targets();
        let scaled = self
            .candidates
            .iter()
            .map(|c| c.scaled(targets, factor))
            .collect();
        Self::from_candidates(scaled)
    }

    /// Mean of a metric across the catalog, or `None` when empty.
    pub fn mean(&self, metric: Metric) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let sum: f64 = self.iter().map(|c| c.value(metric)).sum();
        Some(sum / self.len() as f64)
    }

    /// `(min, max)` of a metric across the catalog, or `None` when empty.
    pub fn range(&self, metric: Metric) -> Option<(f64, f64)> {
        let mut values = self.iter().map(|c| c.value(metric));
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Descriptive statistics and soft warnings for the catalog.
    pub fn summary(&self) -> CatalogSummary {
        let mut warnings = Vec::new();
        for candidate in self.iter() {
            let ci = candidate.value(Metric::ConstructibilityIndex);
            if ci < CONSTRUCTIBILITY_BAND.0 || ci > CONSTRUCTIBILITY_BAND.1 {
                let msg = format!(
                    "{}: constructibility index {ci} outside typical range {}-{}",
                    candidate.code(),
                    CONSTRUCTIBILITY_BAND.0,
                    CONSTRUCTIBILITY_BAND.1
                );
                warn!("{msg}");
                warnings.push(msg);
            }
        }

        CatalogSummary {
            total_candidates: self.len(),
            total_cost_range: self.range(Metric::TotalCost),
            mean_duration_days: self.mean(Metric::DurationDays),
            mean_co2_tonnes: self.mean(Metric::Co2Tonnes),
            warnings,
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Descriptive statistics over a catalog.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogSummary {
    pub total_candidates: usize,
    /// `(min, max)` total cost; `None` for an empty catalog.
    pub total_cost_range: Option<(f64, f64)>,
    pub mean_duration_days: Option<f64>,
    pub mean_co2_tonnes: Option<f64>,
    /// Soft, non-fatal data quality findings.
    pub warnings: Vec<String>,
}

fn empty_problem(code: &str) -> RecordProblem {
    RecordProblem {
        code: code.to_string(),
        missing_fields: Vec::new(),
        invalid_fields: Vec::new(),
    }
}

fn validate_record(
    code: &str,
    record: &RawRecord,
) -> std::result::Result<[f64; 9], RecordProblem> {
    let mut problem = empty_problem(code);
    let mut values = [0.0; 9];

    for (slot, metric) in values.iter_mut().zip(Metric::REQUIRED) {
        let Some(&value) = record.get(metric.name()) else {
            problem.missing_fields.push(metric.name());
            continue;
        };
        if !value.is_finite() {
            problem
                .invalid_fields
                .push((metric.name(), format!("must be finite, got {value}")));
        } else if value < 0.0 {
            problem
                .invalid_fields
                .push((metric.name(), format!("must be non-negative, got {value}")));
        } else if metric == Metric::DurationDays && value <= 0.0 {
            problem
                .invalid_fields
                .push((metric.name(), format!("must be positive, got {value}")));
        }
        *slot = value;
    }

    if problem.missing_fields.is_empty() && problem.invalid_fields.is_empty() {
        Ok(values)
    } else {
        Err(problem)
    }
}
