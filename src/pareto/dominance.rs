//! Pareto dominance and fast non-dominated sorting.
//!
//! Objective vectors are oriented so that lower is better on every axis.
//! An axis holding `None` on either side is skipped for that pair.

/// Result of non-dominated sorting.
///
/// Each element of `ranks` is the front index of the objective vector at the
/// same position. Front 0 is the Pareto set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NondominatedSortResult {
    /// Front index for each vector (0 = non-dominated).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` holds the rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

/// Outcome of comparing two objective vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other (trade-off or identical profile).
    Neither,
}

/// Compares two objective vectors for Pareto dominance (minimization).
///
/// `a` dominates `b` when it is no worse on every comparable axis and
/// strictly better on at least one. Identical profiles yield
/// [`Dominance::Neither`].
///
/// ```
/// use u_tradeoff::pareto::{dominance_cmp, Dominance};
///
/// assert_eq!(dominance_cmp(&[Some(0.1), Some(0.2)], &[Some(0.3), Some(0.2)]), Dominance::Left);
/// assert_eq!(dominance_cmp(&[Some(0.1), Some(0.9)], &[Some(0.3), Some(0.2)]), Dominance::Neither);
/// // The second axis is missing on the right, so only the first counts.
/// assert_eq!(dominance_cmp(&[Some(0.5), Some(0.0)], &[Some(0.3), None]), Dominance::Right);
/// ```
pub fn dominance_cmp(a: &[Option<f64>], b: &[Option<f64>]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (va, vb) in a.iter().zip(b.iter()) {
        let (Some(va), Some(vb)) = (va, vb) else {
            continue;
        };
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Fast non-dominated sorting (Deb et al., 2002).
///
/// 1. Compare every pair once and record who dominates whom
/// 2. Vectors dominated by nobody form front 0
/// 3. Peel front 0 away and repeat for the next fronts
///
/// `O(m · n²)` for `n` vectors of `m` objectives. An empty input yields an
/// empty result.
///
/// ```
/// use u_tradeoff::pareto::non_dominated_sort;
///
/// let objectives = vec![
///     vec![Some(0.0), Some(1.0)],
///     vec![Some(0.5), Some(0.5)],
///     vec![Some(1.0), Some(0.0)],
///     vec![Some(0.8), Some(0.8)], // dominated by the middle point
/// ];
/// let result = non_dominated_sort(&objectives);
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// assert_eq!(result.fronts, vec![vec![0, 1, 2], vec![3]]);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<Option<f64>>]) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult::default();
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];
    let mut front_0 = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance_cmp(&objectives[i], &objectives[j]) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }

        // All comparisons involving i are done by now.
        if domination_count[i] == 0 {
            front_0.push(i);
        }
    }

    let mut fronts = vec![front_0];
    loop {
        let mut next_front = Vec::new();
        if let Some(current) = fronts.last() {
            for &i in current {
                for &j in &dominated_by[i] {
                    domination_count[j] -= 1;
                    if domination_count[j] == 0 {
                        ranks[j] = fronts.len();
                        next_front.push(j);
                    }
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        next_front.sort_unstable();
        fronts.push(next_front);
    }

    NondominatedSortResult { ranks, fronts }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_single_vector() {
        let result = non_dominated_sort(&[some(&[1.0, 2.0])]);
        assert_eq!(result.ranks, vec![0]);
        assert_eq!(result.fronts, vec![vec![0]]);
    }

    #[test]
    fn test_empty_input() {
        let result = non_dominated_sort(&[]);
        assert!(result.ranks.is_empty());
        assert!(result.fronts.is_empty());
    }

    #[test]
    fn test_clear_dominance_chain() {
        let objs = vec![some(&[1.0, 1.0]), some(&[2.0, 2.0]), some(&[3.0, 3.0])];
        let result = non_dominated_sort(&objs);
        assert_eq!(result.ranks, vec![0, 1, 2]);
        assert_eq!(result.fronts.len(), 3);
    }

    #[test]
    fn test_mixed_fronts() {
        let objs = vec![
            some(&[1.0, 5.0]),
            some(&[3.0, 3.0]),
            some(&[5.0, 1.0]),
            some(&[4.0, 4.0]), // dominated by (3,3)
            some(&[6.0, 6.0]), // dominated by (4,4) as well
        ];
        let result = non_dominated_sort(&objs);
        assert_eq!(result.ranks, vec![0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_identical_profiles_stay_together() {
        let objs = vec![some(&[2.0, 2.0]), some(&[2.0, 2.0]), some(&[2.0, 2.0])];
        let result = non_dominated_sort(&objs);
        assert!(result.ranks.iter().all(|&r| r == 0));
        assert_eq!(dominance_cmp(&objs[0], &objs[1]), Dominance::Neither);
    }

    #[test]
    fn test_missing_axis_skipped() {
        // Only the first axis is comparable.
        assert_eq!(
            dominance_cmp(&[Some(1.0), None], &[Some(2.0), Some(0.0)]),
            Dominance::Left
        );
        // Nothing comparable: neither dominates.
        assert_eq!(
            dominance_cmp(&[None, Some(1.0)], &[Some(0.0), None]),
            Dominance::Neither
        );
    }
}
