//! 20-second forward model: `step` takes a lane state and an action and
//! returns the state one decision window later. Broad strokes only: did
//! HP change, did the wave move, did a cooldown come back up.

use rift_core::{JunglerLocation, LanePosition, LaneState, SummonerSpell, WavePosition};
use rift_sim::{resolve, Combatant, DrawStream, Engagement, EngagementResult, KILL_GOLD};

use crate::actions::LaneAction;
use crate::policy::EnemyModel;

pub const TICK_SECONDS: f64 = 20.0;
const GOLD_PER_SECOND: f64 = 1.9;
const CS_GOLD_AVG: f64 = 20.0;
const MANA_REGEN_PER_SEC: f64 = 1.5;

fn combatant_mine(s: &LaneState) -> Combatant {
    Combatant {
        combat_power: s.my_combat_power,
        level: s.my_level,
        hp: s.my_hp,
        hp_max: s.my_hp_max,
        mana: s.my_mana,
        mana_max: s.my_mana_max,
        // The gank window is modeled separately at the end of the tick.
        position_risk: 0.0,
    }
}

fn combatant_enemy(s: &LaneState) -> Combatant {
    Combatant {
        combat_power: s.enemy_combat_power,
        level: s.enemy_level,
        hp: s.enemy_hp,
        hp_max: s.enemy_hp_max,
        mana: s.enemy_mana_est,
        mana_max: s.enemy_mana_max,
        position_risk: 0.0,
    }
}

/// How hard the modeled enemy trades back, relative to the baseline.
fn enemy_return_scale(model: EnemyModel) -> f64 {
    match model {
        EnemyModel::Average => 1.0,
        EnemyModel::Optimal => 1.25,
        EnemyModel::Passive => 0.6,
    }
}

fn wave_advance(wave: WavePosition) -> WavePosition {
    match wave {
        WavePosition::FrozenNearMe => WavePosition::PushingToMe,
        WavePosition::PushingToMe => WavePosition::Middle,
        WavePosition::Middle => WavePosition::SlowPushToThem,
        WavePosition::SlowPushToThem => WavePosition::Crashed,
        WavePosition::Crashed => WavePosition::Crashed,
    }
}

/// Advance the lane 20 seconds under `action`. Every stochastic choice
/// consumes draws from `draws`, so a fixed stream replays identically.
pub fn step(
    state: &LaneState,
    action: LaneAction,
    model: EnemyModel,
    draws: &mut DrawStream,
) -> LaneState {
    let mut s = state.clone();

    // Passive ticks happen regardless of the action.
    s.game_time += TICK_SECONDS;
    if s.game_time > 110.0 {
        s.my_gold += GOLD_PER_SECOND * TICK_SECONDS;
    }
    s.my_mana = (s.my_mana + MANA_REGEN_PER_SEC * TICK_SECONDS).min(s.my_mana_max);
    s.enemy_mana_est =
        (s.enemy_mana_est + MANA_REGEN_PER_SEC * TICK_SECONDS).min(s.enemy_mana_max);
    for cd in [
        &mut s.my_q_cd,
        &mut s.my_w_cd,
        &mut s.my_e_cd,
        &mut s.my_r_cd,
        &mut s.my_flash_cd,
        &mut s.my_summ2_cd,
        &mut s.enemy_q_cd_est,
        &mut s.enemy_w_cd_est,
        &mut s.enemy_e_cd_est,
        &mut s.enemy_r_cd_est,
        &mut s.enemy_flash_cd_est,
    ] {
        *cd = (*cd - TICK_SECONDS).max(0.0);
    }
    s.enemy_jg_last_seen += TICK_SECONDS;
    s.dragon_timer = (s.dragon_timer - TICK_SECONDS).max(0.0);
    s.herald_timer = (s.herald_timer - TICK_SECONDS).max(0.0);

    match action {
        LaneAction::FarmSafe => farm_safe(&mut s, draws),
        LaneAction::PushWave => push_wave(&mut s, draws),
        LaneAction::FreezeWave => freeze_wave(&mut s, draws),
        LaneAction::ResetWave => reset_wave(&mut s, draws),
        LaneAction::ShortTrade => trade(&mut s, Engagement::Poke, model, draws),
        LaneAction::ExtendedTrade => trade(&mut s, Engagement::Trade, model, draws),
        LaneAction::AllIn => all_in(&mut s, model, draws),
        LaneAction::BackOff => back_off(&mut s, draws),
        LaneAction::Recall => recall(&mut s),
        LaneAction::WardRiver => ward_river(&mut s, draws),
        LaneAction::RequestGank => request_gank(&mut s, draws),
        LaneAction::RoamDragon | LaneAction::RoamHerald => roam_objective(&mut s, draws),
    }

    if s.my_hp > 0.0 {
        gank_check(&mut s, model, draws);
    }

    s
}

/// Advance the lane with the opponent's simultaneous action taken into
/// account. Trades already model the enemy's response; an aggressive
/// opponent additionally harasses a player who chose not to fight.
pub fn step_with_enemy(
    state: &LaneState,
    action: LaneAction,
    enemy_action: LaneAction,
    model: EnemyModel,
    draws: &mut DrawStream,
) -> LaneState {
    let mut next = step(state, action, model, draws);
    if enemy_action.is_aggressive() && !action.is_aggressive() && next.my_hp > 0.0 {
        let harass = state.enemy_combat_power * 0.08 * draws.range(0.7, 1.2);
        next.my_hp = (next.my_hp - harass).max(0.0);
    }
    next
}

fn take_cs(s: &mut LaneState, count: u32) {
    s.my_gold += count as f64 * CS_GOLD_AVG;
    s.enemy_minions = s.enemy_minions.saturating_sub(count);
}

fn farm_safe(s: &mut LaneState, draws: &mut DrawStream) {
    take_cs(s, draws.int_inclusive(2, 4));
    s.my_position = LanePosition::Safe;
    // Pure last-hitting lets the wave drift toward you.
    if s.wave_position == WavePosition::Middle {
        s.wave_position = WavePosition::PushingToMe;
    }
}

fn push_wave(s: &mut LaneState, draws: &mut DrawStream) {
    take_cs(s, draws.int_inclusive(4, 6));
    s.my_mana = (s.my_mana - 60.0).max(0.0);
    s.my_q_cd = 6.0;
    s.my_position = LanePosition::Middle;
    s.wave_position = wave_advance(s.wave_position);
}

fn freeze_wave(s: &mut LaneState, draws: &mut DrawStream) {
    take_cs(s, draws.int_inclusive(2, 3));
    if s.wave_position == WavePosition::Middle {
        s.wave_position = WavePosition::FrozenNearMe;
    }
    s.my_position = LanePosition::Safe;
}

fn reset_wave(s: &mut LaneState, draws: &mut DrawStream) {
    take_cs(s, draws.int_inclusive(1, 2));
    s.wave_position = WavePosition::PushingToMe;
    s.my_position = LanePosition::Safe;
}

fn back_off(s: &mut LaneState, draws: &mut DrawStream) {
    // Concede the wave for safety. A couple of last hits at most.
    take_cs(s, draws.int_inclusive(0, 2));
    s.my_position = LanePosition::UnderTower;
    if matches!(
        s.wave_position,
        WavePosition::Middle | WavePosition::SlowPushToThem
    ) {
        s.wave_position = WavePosition::PushingToMe;
    }
}

/// Short and extended trades share one shape; intensity and the cooldowns
/// spent differ.
fn trade(s: &mut LaneState, engagement: Engagement, model: EnemyModel, draws: &mut DrawStream) {
    let Ok(outcome) = resolve(&combatant_mine(s), &combatant_enemy(s), engagement, draws) else {
        return;
    };
    apply_trade(s, &outcome, model);

    match engagement {
        Engagement::Poke => {
            s.my_mana = (s.my_mana - 50.0).max(0.0);
            s.my_q_cd = 7.0;
            s.enemy_q_cd_est = 7.0;
            s.my_position = LanePosition::Middle;
            take_cs(s, draws.int_inclusive(1, 2));
        }
        _ => {
            s.my_mana = (s.my_mana - 100.0).max(0.0);
            s.my_q_cd = 7.0;
            s.my_w_cd = 10.0;
            s.enemy_q_cd_est = 7.0;
            s.enemy_w_cd_est = 10.0;
            s.my_position = LanePosition::Extended;
            take_cs(s, draws.int_inclusive(0, 1));
        }
    }
}

fn all_in(s: &mut LaneState, model: EnemyModel, draws: &mut DrawStream) {
    let mut mine = combatant_mine(s);
    // Ignite adds kill pressure to the commitment.
    if s.my_summ2_type == SummonerSpell::Ignite && s.my_summ2_cd <= 0.0 {
        mine.combat_power *= 1.12;
        s.my_summ2_cd = SummonerSpell::Ignite.cooldown();
    }
    let Ok(mut outcome) = resolve(&mine, &combatant_enemy(s), Engagement::AllIn, draws) else {
        return;
    };

    // A dying enemy with flash up sometimes escapes at a sliver.
    if outcome.result == EngagementResult::BDies
        && s.enemy_flash_cd_est <= 0.0
        && draws.chance(0.5)
    {
        outcome.result = EngagementResult::BWinsTrade;
        outcome.hp_delta_b = -(s.enemy_hp - 50.0_f64.min(s.enemy_hp));
        outcome.gold_delta_a -= KILL_GOLD;
        outcome.hp_delta_a *= 0.3;
        s.enemy_flash_cd_est = SummonerSpell::Flash.cooldown();
    }
    apply_trade(s, &outcome, model);

    s.my_mana = (s.my_mana - 150.0).max(0.0);
    s.my_q_cd = 7.0;
    s.my_w_cd = 10.0;
    s.my_e_cd = 12.0;
    if s.my_level >= 6 {
        s.my_r_cd = 80.0;
    }
    s.my_position = LanePosition::Extended;
}

fn apply_trade(s: &mut LaneState, outcome: &rift_sim::TradeOutcome, model: EnemyModel) {
    let return_scale = enemy_return_scale(model);
    s.my_hp = (s.my_hp + outcome.hp_delta_a * return_scale).max(0.0);
    s.enemy_hp = (s.enemy_hp + outcome.hp_delta_b).max(0.0);
    s.my_gold += outcome.gold_delta_a.max(0.0);
    if outcome.result == EngagementResult::ADies {
        s.my_hp = 0.0;
    }
    if outcome.result == EngagementResult::BDies {
        s.enemy_hp = 0.0;
    }
}

fn recall(s: &mut LaneState) {
    // Spend most of the gold on items. Roughly 400g per point of power.
    let item_value = s.my_gold * 0.7;
    s.my_combat_power += item_value / 400.0;
    s.my_gold -= item_value;
    s.my_hp = s.my_hp_max;
    s.my_mana = s.my_mana_max;
    s.wave_position = WavePosition::PushingToMe;
    s.my_position = LanePosition::Safe;
    // About one wave dies to the tower while away.
    s.enemy_minions = 6;
}

fn ward_river(s: &mut LaneState, draws: &mut DrawStream) {
    s.enemy_jg_last_seen = 0.0;
    s.enemy_jg_location = JunglerLocation::Unknown;
    s.my_position = LanePosition::Middle;
    take_cs(s, draws.int_inclusive(1, 2));
}

/// Ping the jungler and hold the lane for a setup. Sometimes the gank
/// arrives and flips the matchup.
fn request_gank(s: &mut LaneState, draws: &mut DrawStream) {
    take_cs(s, draws.int_inclusive(1, 2));
    s.my_position = LanePosition::Middle;

    if draws.chance(0.25) {
        let damage = s.my_combat_power * 0.8;
        if damage >= s.enemy_hp {
            if s.enemy_flash_cd_est <= 0.0 && draws.chance(0.4) {
                s.enemy_flash_cd_est = SummonerSpell::Flash.cooldown();
                s.enemy_hp = (s.enemy_hp * 0.3).max(1.0);
            } else {
                s.enemy_hp = 0.0;
                s.my_gold += KILL_GOLD;
            }
        } else {
            s.enemy_hp -= damage;
        }
    }
}

fn roam_objective(s: &mut LaneState, draws: &mut DrawStream) {
    s.wave_position = WavePosition::Crashed;
    s.my_position = LanePosition::River;
    if draws.chance(0.40) {
        s.my_gold += 200.0;
    }
}

/// End-of-tick gank exposure, scaled by positional risk and how sharp the
/// modeled enemy jungler is.
fn gank_check(s: &mut LaneState, model: EnemyModel, draws: &mut DrawStream) {
    let mut gank_chance = s.gank_risk() * 0.15;
    if model == EnemyModel::Optimal {
        gank_chance *= 1.5;
    }
    if !draws.chance(gank_chance) {
        return;
    }

    if s.has_flash() && draws.chance(0.6) {
        s.my_flash_cd = SummonerSpell::Flash.cooldown();
        s.my_hp = (s.my_hp - s.enemy_combat_power * 0.1).max(1.0);
        s.my_position = LanePosition::Safe;
    } else if draws.chance(0.4) {
        s.my_hp = 0.0;
    } else {
        s.my_hp = (s.my_hp - s.enemy_combat_power * 0.2).max(1.0);
        s.my_position = LanePosition::UnderTower;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rift_core::{LaneState, Phase};

    #[test]
    fn same_stream_same_next_state() {
        let state = LaneState::default();
        let mut a = DrawStream::from_seed(9);
        let mut b = DrawStream::from_seed(9);
        let next_a = step(&state, LaneAction::ShortTrade, EnemyModel::Average, &mut a);
        let next_b = step(&state, LaneAction::ShortTrade, EnemyModel::Average, &mut b);
        assert_eq!(next_a, next_b);
    }

    #[test]
    fn time_and_cooldowns_advance() {
        let mut state = LaneState::default();
        state.my_q_cd = 30.0;
        let mut draws = DrawStream::from_seed(1);
        let next = step(&state, LaneAction::FarmSafe, EnemyModel::Average, &mut draws);
        assert_eq!(next.game_time, state.game_time + TICK_SECONDS);
        assert_eq!(next.my_q_cd, 10.0);
    }

    #[test]
    fn hp_never_goes_negative() {
        let mut state = LaneState::default();
        state.my_hp = 30.0;
        state.enemy_combat_power = 400.0;
        state.my_position = rift_core::LanePosition::Extended;
        for seed in 0..200 {
            let mut draws = DrawStream::from_seed(seed);
            let next = step(&state, LaneAction::ExtendedTrade, EnemyModel::Optimal, &mut draws);
            assert!(next.my_hp >= 0.0);
            assert!(next.enemy_hp >= 0.0);
        }
    }

    #[test]
    fn recall_restores_pools_and_converts_gold() {
        let mut state = LaneState::default();
        state.my_hp = 100.0;
        state.my_gold = 2000.0;
        let power_before = state.my_combat_power;
        let mut draws = DrawStream::from_seed(4);
        let next = step(&state, LaneAction::Recall, EnemyModel::Average, &mut draws);
        assert_eq!(next.my_hp, next.my_hp_max);
        assert_eq!(next.my_mana, next.my_mana_max);
        assert!(next.my_combat_power > power_before);
        assert!(next.my_gold < state.my_gold);
    }

    #[test]
    fn push_wave_advances_the_wave_state() {
        let mut state = LaneState::default();
        state.wave_position = WavePosition::Middle;
        let mut draws = DrawStream::from_seed(2);
        let next = step(&state, LaneAction::PushWave, EnemyModel::Average, &mut draws);
        assert_eq!(next.wave_position, WavePosition::SlowPushToThem);
    }

    #[test]
    fn phase_is_recomputed_from_game_time() {
        let mut state = LaneState::default();
        state.game_time = 830.0;
        let mut draws = DrawStream::from_seed(3);
        let next = step(&state, LaneAction::FarmSafe, EnemyModel::Average, &mut draws);
        assert_eq!(next.phase(), Phase::Mid);
    }
}
