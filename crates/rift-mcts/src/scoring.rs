//! Reward model: how the search judges a 20-second outcome. Positive is
//! good for the coached laner, negative is bad. Scores land roughly in
//! [-100, 100].

use rift_core::{LanePosition, LaneState, WavePosition};
use serde::{Deserialize, Serialize};

use crate::error::CoachError;

/// Tunable scalar weights for the transition score and horizon term.
/// Exposed through the search config so calibration never needs a code
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    pub death_penalty: f64,
    pub flash_death_penalty: f64,
    pub gold: f64,
    pub kill_bonus: f64,
    pub level_up: f64,
    pub hp_trade: f64,
    pub flash_burned: f64,
    pub flash_for_kill: f64,
    pub enemy_flash_burned: f64,
    pub wave_value: f64,
    pub cs_value: f64,
    pub gank_exposure: f64,
    pub oom_penalty: f64,
    pub tower_damage: f64,
    pub horizon_eval: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        RewardWeights {
            death_penalty: 80.0,
            flash_death_penalty: 10.0,
            gold: 0.05,
            kill_bonus: 25.0,
            level_up: 8.0,
            hp_trade: 0.3,
            flash_burned: 15.0,
            flash_for_kill: 3.0,
            enemy_flash_burned: 12.0,
            wave_value: 2.0,
            cs_value: 1.5,
            gank_exposure: 8.0,
            oom_penalty: 5.0,
            tower_damage: 0.5,
            horizon_eval: 0.3,
        }
    }
}

impl RewardWeights {
    pub(crate) fn validate(&self) -> Result<(), CoachError> {
        let fields = [
            ("death_penalty", self.death_penalty),
            ("flash_death_penalty", self.flash_death_penalty),
            ("gold", self.gold),
            ("kill_bonus", self.kill_bonus),
            ("level_up", self.level_up),
            ("hp_trade", self.hp_trade),
            ("flash_burned", self.flash_burned),
            ("flash_for_kill", self.flash_for_kill),
            ("enemy_flash_burned", self.enemy_flash_burned),
            ("wave_value", self.wave_value),
            ("cs_value", self.cs_value),
            ("gank_exposure", self.gank_exposure),
            ("oom_penalty", self.oom_penalty),
            ("tower_damage", self.tower_damage),
            ("horizon_eval", self.horizon_eval),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(CoachError::InvalidConfig(format!(
                    "reward weight {name} must be finite"
                )));
            }
        }
        Ok(())
    }
}

fn wave_score(wave: WavePosition) -> f64 {
    match wave {
        WavePosition::FrozenNearMe => 5.0,
        WavePosition::PushingToMe => 2.0,
        WavePosition::Middle => 0.0,
        WavePosition::SlowPushToThem => 1.0,
        WavePosition::Crashed => 3.0,
    }
}

/// Score the transition from `before` to `after`.
pub fn score_transition(before: &LaneState, after: &LaneState, w: &RewardWeights) -> f64 {
    // Dying dominates everything else.
    if after.my_hp <= 0.0 {
        let mut score = -w.death_penalty;
        if before.has_flash() {
            score -= w.flash_death_penalty;
        }
        return score;
    }

    let mut score = 0.0;

    score += (after.my_gold - before.my_gold) * w.gold;
    if after.enemy_hp <= 0.0 && before.enemy_hp > 0.0 {
        score += w.kill_bonus;
    }
    if after.my_level > before.my_level {
        score += w.level_up * (after.my_level - before.my_level) as f64;
    }

    // HP trading: did the enemy lose a bigger share than you?
    let my_lost_pct = (before.my_hp - after.my_hp) / before.my_hp_max * 100.0;
    let enemy_lost_pct = (before.enemy_hp - after.enemy_hp) / before.enemy_hp_max * 100.0;
    score += (enemy_lost_pct - my_lost_pct) * w.hp_trade;

    // Flash economy.
    if before.has_flash() && !after.has_flash() {
        if after.enemy_hp <= 0.0 {
            score -= w.flash_for_kill;
        } else {
            score -= w.flash_burned;
        }
    }
    if before.enemy_flash_cd_est <= 0.0 && after.enemy_flash_cd_est > 0.0 {
        score += w.enemy_flash_burned;
    }

    score += (wave_score(after.wave_position) - wave_score(before.wave_position)) * w.wave_value;

    let cs_gained = before.enemy_minions.saturating_sub(after.enemy_minions);
    score += cs_gained as f64 * w.cs_value;

    // Standing in gank range while the risk is live.
    if after.gank_risk() > 0.4
        && matches!(
            after.my_position,
            LanePosition::Extended | LanePosition::River
        )
    {
        score -= w.gank_exposure * after.gank_risk();
    }

    // Low health anywhere past your own side of the lane invites the next
    // gank or all-in.
    if after.my_hp_pct() < 30.0
        && !matches!(
            after.my_position,
            LanePosition::UnderTower | LanePosition::Safe
        )
    {
        score -= w.gank_exposure;
    }

    if after.my_mana_pct() < 15.0 && before.my_mana_pct() >= 15.0 {
        score -= w.oom_penalty;
    }

    let tower_damage = before.enemy_tower_hp - after.enemy_tower_hp;
    if tower_damage > 0.0 {
        score += tower_damage * w.tower_damage;
    }

    score
}

/// Static evaluation of a single state, used at the rollout horizon.
pub fn evaluate(state: &LaneState) -> f64 {
    let mut score = 0.0;

    score += (state.my_hp_pct() - state.enemy_hp_pct()) * 0.3;
    score += (state.my_level as f64 - state.enemy_level as f64) * 8.0;
    score += state.my_gold * 0.01;

    let my_ready = [state.my_q_cd, state.my_w_cd, state.my_e_cd, state.my_r_cd]
        .iter()
        .filter(|cd| **cd <= 0.0)
        .count() as f64;
    let enemy_ready = [
        state.enemy_q_cd_est,
        state.enemy_w_cd_est,
        state.enemy_e_cd_est,
        state.enemy_r_cd_est,
    ]
    .iter()
    .filter(|cd| **cd <= 0.0)
    .count() as f64;
    score += (my_ready - enemy_ready) * 3.0;

    if state.has_flash() && state.enemy_flash_cd_est > 0.0 {
        score += 8.0;
    } else if !state.has_flash() && state.enemy_flash_cd_est <= 0.0 {
        score -= 8.0;
    }

    match state.wave_position {
        WavePosition::FrozenNearMe => score += 6.0,
        WavePosition::Crashed => score += 3.0,
        _ => {}
    }

    score -= state.gank_risk() * 10.0;
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use rift_core::LaneState;

    #[test]
    fn death_dominates_any_gold_gain() {
        let before = LaneState::default();
        let mut after = before.clone();
        after.my_hp = 0.0;
        after.my_gold += 1000.0;
        let w = RewardWeights::default();
        assert!(score_transition(&before, &after, &w) <= -w.death_penalty);
    }

    #[test]
    fn kill_without_losses_scores_positive() {
        let before = LaneState::default();
        let mut after = before.clone();
        after.enemy_hp = 0.0;
        after.my_gold += 300.0;
        let w = RewardWeights::default();
        assert!(score_transition(&before, &after, &w) > w.kill_bonus);
    }

    #[test]
    fn burning_flash_for_nothing_is_worse_than_for_a_kill() {
        let before = LaneState::default();
        let mut flash_wasted = before.clone();
        flash_wasted.my_flash_cd = 300.0;
        let mut flash_kill = flash_wasted.clone();
        flash_kill.enemy_hp = 0.0;
        let w = RewardWeights::default();
        assert!(
            score_transition(&before, &flash_wasted, &w)
                < score_transition(&before, &flash_kill, &w)
        );
    }

    #[test]
    fn retreating_beats_holding_the_lane_at_low_health() {
        let before = LaneState {
            my_hp: 150.0,
            ..LaneState::default()
        };
        let mut held = before.clone();
        held.my_position = LanePosition::Middle;
        held.my_gold += 60.0;
        let mut retreated = before.clone();
        retreated.my_position = LanePosition::Safe;
        retreated.my_gold += 60.0;
        let w = RewardWeights::default();
        assert!(score_transition(&before, &retreated, &w) > score_transition(&before, &held, &w));
    }

    #[test]
    fn healthier_higher_level_state_evaluates_better() {
        let weak = LaneState::default();
        let mut strong = weak.clone();
        strong.my_level = 6;
        strong.my_gold += 800.0;
        assert!(evaluate(&strong) > evaluate(&weak));
    }
}
