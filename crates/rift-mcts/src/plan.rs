//! Multi-step planning. Each step runs a fresh search, then projects the
//! state forward by executing the recommended action before re-rooting.

use rift_core::LaneState;
use rift_sim::DrawStream;

use crate::config::SearchConfig;
use crate::error::CoachError;
use crate::explain::{explain, PlanResult};
use crate::policy::{self, EnemyModel};
use crate::search::search;
use crate::step::step_with_enemy;

const STEP_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

fn step_seed(base: u64, step_index: u64) -> u64 {
    base ^ (step_index.wrapping_add(1)).wrapping_mul(STEP_SEED_MIX)
}

/// Produce an ordered plan of `steps` recommendations. `config.iterations`
/// is the per-step search budget.
pub fn plan(
    state: &LaneState,
    steps: usize,
    config: &SearchConfig,
    model: EnemyModel,
) -> Result<PlanResult, CoachError> {
    if steps == 0 {
        return Err(CoachError::InvalidConfig(
            "steps must be positive".to_string(),
        ));
    }
    state.validate()?;
    config.validate()?;

    let mut current = state.clone();
    let mut results = Vec::with_capacity(steps);
    for step_index in 0..steps {
        let seed = step_seed(config.seed, step_index as u64);
        let outcome = search(&current, config, model, seed)?;
        let result = explain(&current, &outcome);
        let chosen = result.recommended;
        results.push(result);

        // Project forward with a stream independent of the search's own.
        let mut draws = DrawStream::derive(seed, 1);
        let enemy_action = policy::enemy_response(model, &current, &mut draws);
        current = step_with_enemy(&current, chosen, enemy_action, model, &mut draws);
        if current.my_hp <= 0.0 {
            // Searching from a dead state is meaningless. Model the respawn
            // walk as a reset to lane at partial health.
            current.my_hp = current.my_hp_max * 0.5;
            current.my_position = rift_core::LanePosition::UnderTower;
        }
    }

    Ok(PlanResult { steps: results })
}
