//! Enemy policy: how the modeled opponent picks actions during expansion
//! and rollout. Three fidelities, from coin-flip laner to punish machine.

use rift_core::{
    ChampionId, JunglerLocation, LanePosition, LaneState, Phase, ValidationError, WavePosition,
};
use rift_sim::DrawStream;
use serde::{Deserialize, Serialize};

use crate::actions::{legal_actions, LaneAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyModel {
    /// Plays safely, trades occasionally.
    Average,
    /// Punishes every mistake.
    Optimal,
    /// Mostly farms.
    Passive,
}

impl EnemyModel {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "average" => Ok(EnemyModel::Average),
            "optimal" => Ok(EnemyModel::Optimal),
            "passive" => Ok(EnemyModel::Passive),
            other => Err(ValidationError::UnknownValue {
                field: "enemy_model",
                value: other.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnemyModel::Average => "average",
            EnemyModel::Optimal => "optimal",
            EnemyModel::Passive => "passive",
        }
    }
}

fn mirror_wave(wave: WavePosition) -> WavePosition {
    match wave {
        WavePosition::FrozenNearMe => WavePosition::Crashed,
        WavePosition::PushingToMe => WavePosition::SlowPushToThem,
        WavePosition::Middle => WavePosition::Middle,
        WavePosition::SlowPushToThem => WavePosition::PushingToMe,
        WavePosition::Crashed => WavePosition::FrozenNearMe,
    }
}

/// The lane seen from the opponent's side. Fields the opponent cannot
/// observe are filled with parity estimates.
pub fn mirror(state: &LaneState) -> LaneState {
    LaneState {
        my_champion: ChampionId::new(state.enemy_champion.as_str()),
        my_hp: state.enemy_hp,
        my_hp_max: state.enemy_hp_max,
        my_mana: state.enemy_mana_est,
        my_mana_max: state.enemy_mana_max,
        my_level: state.enemy_level,
        my_xp_to_next: state.my_xp_to_next,
        my_q_cd: state.enemy_q_cd_est,
        my_w_cd: state.enemy_w_cd_est,
        my_e_cd: state.enemy_e_cd_est,
        my_r_cd: state.enemy_r_cd_est,
        my_flash_cd: state.enemy_flash_cd_est,
        my_summ2_cd: 0.0,
        my_summ2_type: state.my_summ2_type,
        my_position: state.enemy_position,
        // Gold parity: assume the opponent farmed about as well.
        my_gold: state.my_gold,
        my_combat_power: state.enemy_combat_power,

        enemy_champion: ChampionId::new(state.my_champion.as_str()),
        enemy_hp: state.my_hp,
        enemy_hp_max: state.my_hp_max,
        enemy_mana_est: state.my_mana,
        enemy_mana_max: state.my_mana_max,
        enemy_level: state.my_level,
        enemy_q_cd_est: state.my_q_cd,
        enemy_w_cd_est: state.my_w_cd,
        enemy_e_cd_est: state.my_e_cd,
        enemy_r_cd_est: state.my_r_cd,
        enemy_flash_cd_est: state.my_flash_cd,
        enemy_position: state.my_position,
        enemy_combat_power: state.my_combat_power,

        my_minions: state.enemy_minions,
        enemy_minions: state.my_minions,
        wave_position: mirror_wave(state.wave_position),

        // The opponent has no better jungle information than we do.
        enemy_jg_last_seen: state.enemy_jg_last_seen,
        enemy_jg_location: JunglerLocation::Unknown,
        dragon_timer: state.dragon_timer,
        herald_timer: state.herald_timer,
        my_tower_hp: state.enemy_tower_hp,
        enemy_tower_hp: state.my_tower_hp,

        game_time: state.game_time,
    }
}

/// Action-frequency prior for an average laner, by phase.
fn prior_weight(action: LaneAction, phase: Phase) -> f64 {
    match action {
        LaneAction::FarmSafe => 3.0,
        LaneAction::PushWave => {
            if phase == Phase::Early {
                1.5
            } else {
                2.5
            }
        }
        LaneAction::FreezeWave => 1.2,
        LaneAction::ResetWave => 0.8,
        LaneAction::ShortTrade => 1.5,
        LaneAction::ExtendedTrade => 0.8,
        LaneAction::AllIn => 0.4,
        LaneAction::BackOff => 0.8,
        LaneAction::Recall => 0.6,
        LaneAction::WardRiver => 1.0,
        LaneAction::RequestGank => 0.5,
        LaneAction::RoamDragon | LaneAction::RoamHerald => {
            if phase == Phase::Early {
                0.3
            } else {
                0.8
            }
        }
    }
}

/// Deterministic one-ply value estimate of an action for the acting
/// player, used by the optimal policy and the rollout's own-action
/// heuristic. No draws are consumed.
pub fn greedy_value(state: &LaneState, action: LaneAction) -> f64 {
    let profile = action.profile();
    let power_edge =
        (state.my_combat_power - state.enemy_combat_power) / state.my_combat_power.max(1.0);

    match action {
        LaneAction::FarmSafe => 4.5 + 1.0,
        LaneAction::PushWave => 7.5 - 1.0 + state.my_mana_pct() * 0.01,
        LaneAction::FreezeWave => {
            3.75 + if state.wave_position == WavePosition::Middle { 4.0 } else { 0.0 }
        }
        LaneAction::ResetWave => {
            2.25 + if state.wave_position == WavePosition::SlowPushToThem { 2.0 } else { 0.0 }
        }
        LaneAction::ShortTrade | LaneAction::ExtendedTrade | LaneAction::AllIn => {
            let intensity = match action {
                LaneAction::ShortTrade => 0.15,
                LaneAction::ExtendedTrade => 0.35,
                _ => 0.65,
            };
            let my_dmg = state.my_combat_power * intensity;
            let enemy_return = state.enemy_combat_power * intensity * 0.6;
            let trade_pct = my_dmg / state.enemy_hp_max.max(1.0) * 100.0
                - enemy_return / state.my_hp_max.max(1.0) * 100.0;
            let kill = if my_dmg >= state.enemy_hp { 25.0 } else { 0.0 };
            trade_pct * 0.3 + kill + power_edge * 10.0 - profile.risk * state.gank_risk() * 15.0
        }
        LaneAction::BackOff => 1.0 + state.gank_risk() * 6.0,
        LaneAction::Recall => {
            state.my_gold * 0.002
                + (100.0 - state.my_hp_pct()) * 0.05
                + if state.wave_position == WavePosition::Crashed { 3.0 } else { -2.0 }
        }
        LaneAction::WardRiver => 2.0 + (state.enemy_jg_last_seen / 30.0).min(3.0),
        LaneAction::RequestGank => {
            1.5 + if state.enemy_position == LanePosition::Extended { 4.0 } else { 0.0 }
        }
        LaneAction::RoamDragon | LaneAction::RoamHerald => {
            2.0 + if state.wave_position == WavePosition::Crashed { 4.0 } else { -3.0 }
        }
    }
}

/// Pick the acting player's action from their own view of the lane.
/// Average and passive consume one draw; optimal is deterministic.
pub fn sample_action(
    model: EnemyModel,
    state: &LaneState,
    legal: &[LaneAction],
    draws: &mut DrawStream,
) -> LaneAction {
    match model {
        EnemyModel::Optimal => legal
            .iter()
            .copied()
            .max_by(|a, b| {
                greedy_value(state, *a)
                    .partial_cmp(&greedy_value(state, *b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(LaneAction::FarmSafe),
        EnemyModel::Average => {
            let phase = state.phase();
            let weighted: Vec<(LaneAction, f64)> = legal
                .iter()
                .map(|a| (*a, prior_weight(*a, phase)))
                .collect();
            *draws.weighted(&weighted)
        }
        EnemyModel::Passive => {
            let phase = state.phase();
            let weighted: Vec<(LaneAction, f64)> = legal
                .iter()
                .map(|a| {
                    let mut weight = prior_weight(*a, phase);
                    if a.is_aggressive() {
                        weight *= 0.2;
                    }
                    if a.profile().leaves_lane {
                        weight *= 0.5;
                    }
                    if matches!(a, LaneAction::FarmSafe | LaneAction::FreezeWave) {
                        weight *= 2.0;
                    }
                    (*a, weight)
                })
                .collect();
            *draws.weighted(&weighted)
        }
    }
}

/// The opponent's next action, chosen from their mirrored view.
pub fn enemy_response(
    model: EnemyModel,
    state: &LaneState,
    draws: &mut DrawStream,
) -> LaneAction {
    let from_their_side = mirror(state);
    let legal = legal_actions(&from_their_side);
    sample_action(model, &from_their_side, &legal, draws)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_and_rejects_unknown() {
        for model in [EnemyModel::Average, EnemyModel::Optimal, EnemyModel::Passive] {
            assert_eq!(EnemyModel::parse(model.as_str()).unwrap(), model);
        }
        assert!(EnemyModel::parse("feeding").is_err());
    }

    #[test]
    fn mirror_swaps_perspectives() {
        let mut state = LaneState::default();
        state.my_hp = 400.0;
        state.enemy_hp = 250.0;
        state.wave_position = WavePosition::PushingToMe;
        let mirrored = mirror(&state);
        assert_eq!(mirrored.my_hp, 250.0);
        assert_eq!(mirrored.enemy_hp, 400.0);
        assert_eq!(mirrored.wave_position, WavePosition::SlowPushToThem);
        assert_eq!(mirrored.my_champion.as_str(), state.enemy_champion.as_str());
    }

    #[test]
    fn optimal_is_deterministic() {
        let state = LaneState::default();
        let legal = legal_actions(&state);
        let mut a = DrawStream::from_seed(1);
        let mut b = DrawStream::from_seed(999);
        let first = sample_action(EnemyModel::Optimal, &state, &legal, &mut a);
        let second = sample_action(EnemyModel::Optimal, &state, &legal, &mut b);
        assert_eq!(first, second);
    }

    #[test]
    fn passive_rarely_picks_a_fight() {
        let state = LaneState::default();
        let legal = legal_actions(&state);
        let mut draws = DrawStream::from_seed(7);
        let mut aggressive = 0;
        for _ in 0..200 {
            if sample_action(EnemyModel::Passive, &state, &legal, &mut draws).is_aggressive() {
                aggressive += 1;
            }
        }
        assert!(aggressive < 40, "passive picked {aggressive}/200 fights");
    }

    #[test]
    fn optimal_takes_the_kill_when_enemy_is_low() {
        let mut state = LaneState::default();
        state.enemy_hp = 40.0;
        state.my_combat_power = 200.0;
        let legal = legal_actions(&state);
        let mut draws = DrawStream::from_seed(1);
        let choice = sample_action(EnemyModel::Optimal, &state, &legal, &mut draws);
        assert!(choice.is_aggressive(), "expected a fight, got {choice:?}");
    }
}
