//! Aggregator
//!
//! Combines per-instance scores into per-configuration summary rows and ranks
//! them.

use solverbench_domain::{ConfigurationId, RunScore, SummaryRow};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Calculate arithmetic mean, `None` for no values
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Calculate median, `None` for no values
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[derive(Default)]
struct Accumulator {
    scored: usize,
    unscored: usize,
    objective: Vec<f64>,
    auc: Vec<f64>,
}

/// Build one ranked summary row per configuration.
///
/// Every configuration in `configurations` gets a row, even when none of the
/// given runs belongs to it. Means and medians only cover runs with both
/// scores, so a row with no scored run carries neither means nor a rank.
pub fn summarize<'a>(
    configurations: &BTreeSet<ConfigurationId>,
    runs: impl IntoIterator<Item = &'a RunScore>,
) -> Vec<SummaryRow> {
    let mut accumulators: BTreeMap<&ConfigurationId, Accumulator> = configurations
        .iter()
        .map(|configuration| (configuration, Accumulator::default()))
        .collect();

    for run in runs {
        let accumulator = accumulators.entry(&run.configuration).or_default();
        match (run.objective_score, run.auc_score) {
            (Some(objective), Some(auc)) => {
                accumulator.scored += 1;
                accumulator.objective.push(objective);
                accumulator.auc.push(auc);
            }
            _ => accumulator.unscored += 1,
        }
    }

    let rows = accumulators
        .into_iter()
        .map(|(configuration, acc)| SummaryRow {
            rank: None,
            configuration: configuration.clone(),
            scored: acc.scored,
            unscored: acc.unscored,
            mean_objective_score: mean(&acc.objective),
            median_objective_score: median(&acc.objective),
            mean_auc_score: mean(&acc.auc),
            median_auc_score: median(&acc.auc),
        })
        .collect();

    rank(rows)
}

/// Sort rows best first and assign competition ranks.
///
/// Rows are ordered by mean objective score, then mean AUC score, then
/// configuration id. Absent means sort after present ones. Rows with equal
/// means share a rank; rows without a scored run get no rank.
pub fn rank(mut rows: Vec<SummaryRow>) -> Vec<SummaryRow> {
    rows.sort_by(|a, b| {
        compare_optional(a.mean_objective_score, b.mean_objective_score)
            .then_with(|| compare_optional(a.mean_auc_score, b.mean_auc_score))
            .then_with(|| a.configuration.cmp(&b.configuration))
    });

    let mut previous: Option<(Option<f64>, Option<f64>, usize)> = None;
    for (position, row) in rows.iter_mut().enumerate() {
        if row.scored == 0 {
            row.rank = None;
            continue;
        }

        let key = (row.mean_objective_score, row.mean_auc_score);
        let rank = match previous {
            Some((objective, auc, rank)) if (objective, auc) == key => rank,
            _ => position + 1,
        };
        row.rank = Some(rank);
        previous = Some((key.0, key.1, rank));
    }

    rows
}

fn compare_optional(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solverbench_domain::{InstanceKey, RunStatus};

    fn run(configuration: &str, instance: &str, objective: Option<f64>, auc: Option<f64>) -> RunScore {
        RunScore {
            objective_score: objective,
            auc_score: auc,
            status: if objective.is_some() && auc.is_some() {
                RunStatus::Scored
            } else {
                RunStatus::Partial
            },
            ..RunScore::unscored(
                ConfigurationId::new(configuration),
                InstanceKey::new("p", instance),
                RunStatus::Unscored,
            )
        }
    }

    fn configurations(names: &[&str]) -> BTreeSet<ConfigurationId> {
        names.iter().map(|n| ConfigurationId::new(*n)).collect()
    }

    #[test]
    fn test_mean_and_median() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(mean(&values), Some(3.0));
        assert_eq!(median(&values), Some(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_summarize_counts_unscored() {
        let runs = vec![
            run("a", "i1", Some(0.0), Some(0.2)),
            run("a", "i2", Some(0.5), None),
            run("b", "i1", Some(1.0), Some(0.9)),
        ];
        let rows = summarize(&configurations(&["a", "b", "c"]), &runs);

        assert_eq!(rows.len(), 3);
        let a = &rows[0];
        assert_eq!(a.configuration.as_str(), "a");
        assert_eq!(a.scored, 1);
        assert_eq!(a.unscored, 1);
        assert_eq!(a.mean_objective_score, Some(0.0));
        assert_eq!(a.mean_auc_score, Some(0.2));
        assert_eq!(a.rank, Some(1));

        let c = &rows[2];
        assert_eq!(c.configuration.as_str(), "c");
        assert_eq!(c.scored, 0);
        assert_eq!(c.rank, None);
    }

    #[test]
    fn test_partial_runs_do_not_feed_means() {
        let runs = vec![
            run("a", "i1", Some(0.0), None),
            run("b", "i1", Some(0.0), None),
        ];
        let rows = summarize(&configurations(&["a", "b"]), &runs);

        for row in &rows {
            assert_eq!(row.scored, 0);
            assert_eq!(row.unscored, 1);
            assert_eq!(row.mean_objective_score, None);
            assert_eq!(row.median_objective_score, None);
            assert_eq!(row.rank, None);
        }
    }

    #[test]
    fn test_ties_share_rank() {
        let runs = vec![
            run("b", "i1", Some(0.5), Some(0.5)),
            run("a", "i1", Some(0.5), Some(0.5)),
            run("c", "i1", Some(0.6), Some(0.1)),
        ];
        let rows = summarize(&configurations(&["a", "b", "c"]), &runs);

        let ranks: Vec<(&str, Option<usize>)> = rows
            .iter()
            .map(|r| (r.configuration.as_str(), r.rank))
            .collect();
        assert_eq!(ranks, vec![("a", Some(1)), ("b", Some(1)), ("c", Some(3))]);
    }

    #[test]
    fn test_auc_breaks_objective_ties() {
        let runs = vec![
            run("a", "i1", Some(0.0), Some(0.8)),
            run("b", "i1", Some(0.0), Some(0.3)),
        ];
        let rows = summarize(&configurations(&["a", "b"]), &runs);
        assert_eq!(rows[0].configuration.as_str(), "b");
        assert_eq!(rows[1].rank, Some(2));
    }
}
