//! Repeated-run comparison of strategies.

use std::time::{Duration, Instant};

use log::info;
use serde::Serialize;

use super::config::SolverConfig;
use super::runner::{solve, StrategyKind};
use crate::domain::DomainSnapshot;
use crate::error::TimetableError;

/// Summary of several runs of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySummary {
    pub strategy: &'static str,
    /// Best cost of each run, in run order.
    pub costs: Vec<f64>,
    pub mean: f64,
    pub best: f64,
    pub worst: f64,
    /// Wall-clock time per run.
    #[serde(skip)]
    pub elapsed: Vec<Duration>,
}

impl StrategySummary {
    fn from_runs(strategy: &'static str, costs: Vec<f64>, elapsed: Vec<Duration>) -> Self {
        let n = costs.len().max(1) as f64;
        Self {
            strategy,
            mean: costs.iter().sum::<f64>() / n,
            best: costs.iter().copied().fold(f64::INFINITY, f64::min),
            worst: costs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            costs,
            elapsed,
        }
    }

    pub fn mean_elapsed(&self) -> Duration {
        if self.elapsed.is_empty() {
            return Duration::ZERO;
        }
        self.elapsed.iter().sum::<Duration>() / self.elapsed.len() as u32
    }
}

/// Runs every strategy `runs` times on the same snapshot.
///
/// Run `i` of every strategy uses seed `base + i`, where `base` is
/// `config.seed` or a random seed, so strategies are compared on the same
/// initial populations.
pub fn compare_strategies(
    snapshot: &DomainSnapshot,
    config: &SolverConfig,
    kinds: &[StrategyKind],
    runs: usize,
) -> Result<Vec<StrategySummary>, TimetableError> {
    let base = config.seed.unwrap_or_else(rand::random);
    let mut summaries = Vec::with_capacity(kinds.len());

    for kind in kinds {
        let mut costs = Vec::with_capacity(runs);
        let mut elapsed = Vec::with_capacity(runs);
        for run in 0..runs {
            let run_config = config.clone().with_seed(base.wrapping_add(run as u64));
            let start = Instant::now();
            let result = solve(snapshot, &run_config, *kind)?;
            elapsed.push(start.elapsed());
            costs.push(result.best_cost);
        }
        let summary = StrategySummary::from_runs(kind.name(), costs, elapsed);
        info!(
            "{}: mean {:.2}, best {:.2}, worst {:.2} over {} run(s)",
            summary.strategy, summary.mean, summary.best, summary.worst, runs
        );
        summaries.push(summary);
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbo::BboConfig;
    use crate::fixtures;
    use crate::gwo::GwoConfig;

    #[test]
    fn test_summary_statistics() {
        let s = StrategySummary::from_runs("x", vec![3.0, 1.0, 2.0], vec![Duration::from_millis(4); 3]);
        assert_eq!(s.mean, 2.0);
        assert_eq!(s.best, 1.0);
        assert_eq!(s.worst, 3.0);
        assert_eq!(s.mean_elapsed(), Duration::from_millis(4));
    }

    #[test]
    fn test_compare_both_strategies() {
        let snap = fixtures::scenario();
        let config = SolverConfig::fast()
            .with_population_size(10)
            .with_max_generations(5)
            .with_seed(3)
            .with_parallel(false);
        let kinds = [
            StrategyKind::Bbo(BboConfig::default()),
            StrategyKind::Gwo(GwoConfig::default()),
        ];
        let summaries = compare_strategies(&snap, &config, &kinds, 3).unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].strategy, "bbo");
        assert_eq!(summaries[1].strategy, "gwo");
        for s in &summaries {
            assert_eq!(s.costs.len(), 3);
            assert!(s.best <= s.mean + 1e-9 && s.mean <= s.worst + 1e-9);
        }
    }
}
