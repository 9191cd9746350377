//! Root parallelization: independent seeded searches from copies of the
//! root, merged once per worker by summing root-child statistics.

use rayon::prelude::*;
use rift_core::LaneState;

use crate::config::SearchConfig;
use crate::error::CoachError;
use crate::explain::{explain, MctsResult};
use crate::policy::EnemyModel;
use crate::search::{search, SearchOutcome};

const WORKER_SEED_MIX: u64 = 0xA076_1D64_78BD_642F;

fn worker_seed(base: u64, worker: u64) -> u64 {
    base ^ (worker.wrapping_add(1)).wrapping_mul(WORKER_SEED_MIX)
}

/// Run `workers` independent searches and recommend from the merged root.
/// The iteration budget is split across workers, so total root visits still
/// equal `config.iterations`.
pub fn recommend_parallel(
    state: &LaneState,
    config: &SearchConfig,
    model: EnemyModel,
    workers: usize,
) -> Result<MctsResult, CoachError> {
    if workers == 0 {
        return Err(CoachError::InvalidConfig(
            "workers must be positive".to_string(),
        ));
    }
    state.validate()?;
    config.validate()?;

    let base = config.iterations / workers;
    let remainder = config.iterations % workers;

    let outcomes: Vec<SearchOutcome> = (0..workers)
        .into_par_iter()
        .map(|worker| {
            let mut worker_config = config.clone();
            worker_config.iterations = base + usize::from(worker < remainder);
            search(
                state,
                &worker_config,
                model,
                worker_seed(config.seed, worker as u64),
            )
        })
        .collect::<Result<Vec<_>, CoachError>>()?;

    let mut iter = outcomes.into_iter();
    let Some(mut merged) = iter.next() else {
        return Err(CoachError::computation("no worker produced a result"));
    };
    let mut lines = vec![merged.principal_line.clone()];
    for outcome in iter {
        lines.push(outcome.principal_line.clone());
        merged.merge(&outcome);
    }

    // The merged statistics decide the recommendation. Keep the deepest
    // worker line that agrees with it for the sequence text.
    if let Some(best) = merged.best() {
        merged.principal_line = lines
            .into_iter()
            .filter(|line| line.first() == Some(&best.action))
            .max_by_key(|line| line.len())
            .unwrap_or_else(|| vec![best.action]);
    }

    Ok(explain(state, &merged))
}
