//! Turns raw search statistics into a plain-language recommendation:
//! what to do, why, what to watch, and what would change the plan.

use std::collections::BTreeMap;

use rift_core::{JunglerLocation, LaneState, WavePosition};
use serde::{Deserialize, Serialize};

use crate::actions::LaneAction;
use crate::search::SearchOutcome;

/// Per-action search statistics reported alongside the recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionScore {
    pub visits: u64,
    pub avg_score: f64,
    /// Share of total root visits, in percent. Sums to ~100 across actions.
    pub visit_pct: f64,
}

/// A single coaching recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MctsResult {
    /// The robust-child action, as an enum for programmatic callers.
    pub recommended: LaneAction,
    pub do_this: String,
    pub why: String,
    pub watch_for: String,
    pub plan_changes_if: String,
    pub next_2_min: String,
    pub position_advice: String,
    /// Qualitative label with the winning action's visit share embedded.
    pub confidence: String,
    pub action_scores: BTreeMap<String, ActionScore>,
    pub iterations_run: usize,
}

/// An ordered multi-step plan, one recommendation per step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResult {
    pub steps: Vec<MctsResult>,
}

pub(crate) fn explain(state: &LaneState, outcome: &SearchOutcome) -> MctsResult {
    let best = outcome.best();
    let second = outcome.second_best();
    let total = outcome.total_visits().max(1);

    let (recommended, share) = match best {
        Some(best) => (best.action, best.visits as f64 / total as f64),
        // No valid expansion happened. FarmSafe is always legal.
        None => (LaneAction::FarmSafe, 0.0),
    };

    let mut action_scores = BTreeMap::new();
    for child in &outcome.root_children {
        action_scores.insert(
            child.action.as_str().to_string(),
            ActionScore {
                visits: child.visits,
                avg_score: (child.avg_reward() * 100.0).round() / 100.0,
                visit_pct: (child.visits as f64 / total as f64 * 1000.0).round() / 10.0,
            },
        );
    }

    let line = if outcome.principal_line.is_empty() {
        vec![recommended]
    } else {
        outcome.principal_line.clone()
    };

    MctsResult {
        recommended,
        do_this: action_to_english(recommended, state),
        why: explain_why(recommended, state, share, outcome.iterations_run),
        watch_for: explain_watch(recommended, state),
        plan_changes_if: explain_changes(recommended, second.map(|s| s.action), state),
        next_2_min: explain_sequence(&line),
        position_advice: position_advice(state),
        confidence: confidence_label(share),
        action_scores,
        iterations_run: outcome.iterations_run,
    }
}

/// Fixed buckets over the winning action's visit share.
fn confidence_label(share: f64) -> String {
    let pct = (share * 100.0) as u32;
    if share >= 0.60 {
        format!("HIGH ({pct}%)")
    } else if share >= 0.35 {
        format!("MEDIUM ({pct}%)")
    } else {
        format!("LOW ({pct}%) - multiple options are close")
    }
}

fn action_to_english(action: LaneAction, state: &LaneState) -> String {
    match action {
        LaneAction::FarmSafe => {
            "Farm safely - just last-hit minions, don't push up".to_string()
        }
        LaneAction::PushWave => {
            "Push the wave hard - use your abilities on the minions".to_string()
        }
        LaneAction::FreezeWave => {
            "Freeze the wave - hold it near your tower so the enemy has to overextend for CS"
                .to_string()
        }
        LaneAction::ResetWave => {
            "Let the wave push to you - step back and let minions come to your side".to_string()
        }
        LaneAction::ShortTrade => format!(
            "Short trade - hit {}'s combo then back off immediately",
            state.my_champion.as_str()
        ),
        LaneAction::ExtendedTrade => {
            "Extended trade - stay in their face and use multiple ability rotations".to_string()
        }
        LaneAction::AllIn => format!(
            "GO ALL IN - commit everything to kill {}!",
            state.enemy_champion.as_str()
        ),
        LaneAction::BackOff => {
            "Back off - drop aggression and give up some CS to stay out of range".to_string()
        }
        LaneAction::Recall => {
            "Recall now - go back to base, buy items, and come back stronger".to_string()
        }
        LaneAction::WardRiver => {
            "Ward the river bush - you need vision to play aggressive safely".to_string()
        }
        LaneAction::RequestGank => {
            "Ping your jungler - set up the wave and your HP so a gank can land".to_string()
        }
        LaneAction::RoamDragon => {
            "Rotate to dragon - help your team secure the objective".to_string()
        }
        LaneAction::RoamHerald => {
            "Rotate to Rift Herald - help your team take it for tower plates".to_string()
        }
    }
}

fn explain_why(action: LaneAction, state: &LaneState, share: f64, iterations: usize) -> String {
    let mut reasons: Vec<String> = Vec::new();

    match action {
        LaneAction::ShortTrade | LaneAction::ExtendedTrade | LaneAction::AllIn => {
            if state.enemy_q_cd_est > 3.0 {
                reasons.push(format!(
                    "their Q is on cooldown (~{}s left), so they can't trade back as hard",
                    state.enemy_q_cd_est as i64
                ));
            }
            if state.my_hp_pct() > state.enemy_hp_pct() + 15.0 {
                reasons.push(format!(
                    "you're healthier ({}% vs their {}%)",
                    state.my_hp_pct() as i64,
                    state.enemy_hp_pct() as i64
                ));
            }
            if state.my_level > state.enemy_level {
                reasons.push(format!(
                    "you're level {} and they're only {} - your stats are higher",
                    state.my_level, state.enemy_level
                ));
            }
            if state.has_flash() && state.enemy_flash_cd_est > 0.0 {
                reasons.push("you have Flash and they don't - huge safety advantage".to_string());
            }
            if action == LaneAction::AllIn && state.has_ult() && !state.enemy_has_ult_est() {
                reasons.push(
                    "you have your ultimate and they don't - massive damage advantage".to_string(),
                );
            }
            if reasons.is_empty() {
                reasons.push(format!(
                    "the simulation found this wins {}% of the time",
                    (share * 100.0) as i64
                ));
            }
        }
        LaneAction::FarmSafe
        | LaneAction::FreezeWave
        | LaneAction::ResetWave
        | LaneAction::BackOff => {
            if state.my_hp_pct() < 40.0 {
                reasons.push(format!(
                    "you're low HP ({}%) - fighting would be risky",
                    state.my_hp_pct() as i64
                ));
            }
            if state.gank_risk() > 0.4 {
                reasons.push("there's a high chance the enemy jungler is nearby".to_string());
            }
            if state.enemy_combat_power > state.my_combat_power * 1.1 {
                reasons.push(
                    "the enemy has a stat advantage right now - better to farm and wait for items"
                        .to_string(),
                );
            }
            if reasons.is_empty() {
                reasons.push(
                    "it's the safest way to keep getting gold without risking anything"
                        .to_string(),
                );
            }
        }
        LaneAction::PushWave => {
            if matches!(
                state.wave_position,
                WavePosition::Middle | WavePosition::SlowPushToThem
            ) {
                reasons.push(
                    "pushing gives you a recall/roam window once the wave crashes into their tower"
                        .to_string(),
                );
            }
            reasons.push("you have enough mana to push without going OOM".to_string());
        }
        LaneAction::Recall => {
            reasons.push(format!(
                "you have {}g to spend on items",
                state.my_gold as i64
            ));
            if state.my_hp_pct() < 50.0 {
                reasons.push("and you're low on HP".to_string());
            }
            if state.wave_position == WavePosition::Crashed {
                reasons.push("the wave is crashed so you won't miss many minions".to_string());
            }
        }
        LaneAction::WardRiver => {
            reasons.push(format!(
                "enemy jungler hasn't been seen in {}s - you need vision",
                state.enemy_jg_last_seen as i64
            ));
        }
        LaneAction::RequestGank => {
            reasons.push(
                "the enemy is overextended enough that a gank should convert into a kill"
                    .to_string(),
            );
        }
        LaneAction::RoamDragon | LaneAction::RoamHerald => {
            reasons.push("the objective is up and your team can take it with your help".to_string());
        }
    }

    if reasons.is_empty() {
        reasons.push(format!(
            "the engine simulated {iterations} scenarios and this came out on top"
        ));
    }

    capitalize(&reasons.join(". ")) + "."
}

fn explain_watch(action: LaneAction, state: &LaneState) -> String {
    let mut warnings: Vec<String> = Vec::new();

    if state.gank_risk() > 0.3 {
        warnings.push("the minimap - enemy jungler could be heading your way".to_string());
    }
    if matches!(
        action,
        LaneAction::ShortTrade | LaneAction::ExtendedTrade | LaneAction::AllIn
    ) {
        warnings.push("enemy cooldowns - if they dodge your main ability, back off".to_string());
        if state.enemy_level == 5 {
            warnings.push(
                "they're about to hit level 6 (ultimate) - the matchup changes at that point"
                    .to_string(),
            );
        }
    }
    if action == LaneAction::Recall {
        warnings.push(
            "the wave position - make sure it's pushing away from you before you recall"
                .to_string(),
        );
    }
    if matches!(action, LaneAction::RoamDragon | LaneAction::RoamHerald) {
        warnings.push(
            "your wave - if you roam with a bad wave, the enemy mid will take your tower plates"
                .to_string(),
        );
    }
    if action == LaneAction::RequestGank {
        warnings.push(
            "your jungler's pathing - don't burn HP forcing a setup they can't reach".to_string(),
        );
    }

    if warnings.is_empty() {
        warnings.push("nothing specific - just play it out".to_string());
    }

    format!("Watch {}.", warnings.join("; "))
}

fn explain_changes(
    action: LaneAction,
    runner_up: Option<LaneAction>,
    state: &LaneState,
) -> String {
    let mut changes: Vec<String> = Vec::new();

    if state.my_level < 6 && state.enemy_level < 6 {
        changes.push(
            "they hit level 6 first - back off and farm safely until you catch up".to_string(),
        );
    }
    if state.enemy_jg_location == JunglerLocation::Unknown {
        changes.push(
            "enemy jungler shows on the opposite side of the map - that's your green light to play aggressive"
                .to_string(),
        );
    }
    if matches!(
        action,
        LaneAction::FarmSafe | LaneAction::FreezeWave | LaneAction::BackOff
    ) {
        changes.push(
            "your jungler pings they're coming to gank - get ready to follow up".to_string(),
        );
    }
    if action == LaneAction::AllIn {
        changes
            .push("they get a heal from their support or jungler - abort the all-in".to_string());
    }
    if let Some(runner_up) = runner_up {
        changes.push(format!(
            "the lane stops matching this read - the search's runner-up was to {}",
            sequence_phrase(runner_up)
        ));
    }

    if changes.is_empty() {
        changes.push("the enemy plays something unexpected - always be ready to adapt".to_string());
    }

    format!("Plan changes if: {}.", changes.join("; "))
}

fn explain_sequence(line: &[LaneAction]) -> String {
    let steps: Vec<&str> = line.iter().map(|a| sequence_phrase(*a)).collect();
    match steps.as_slice() {
        [] => String::new(),
        [only] => capitalize(only),
        [first, second] => format!("{} -> then {}", capitalize(first), second),
        [first, second, third, ..] => {
            format!("{} -> {} -> {}", capitalize(first), second, third)
        }
    }
}

fn sequence_phrase(action: LaneAction) -> &'static str {
    match action {
        LaneAction::FarmSafe => "farm safely",
        LaneAction::PushWave => "push the wave",
        LaneAction::FreezeWave => "freeze the wave",
        LaneAction::ResetWave => "let wave reset",
        LaneAction::ShortTrade => "take a short trade",
        LaneAction::ExtendedTrade => "go for an extended trade",
        LaneAction::AllIn => "all-in for the kill",
        LaneAction::BackOff => "back off",
        LaneAction::Recall => "recall to base",
        LaneAction::WardRiver => "ward river",
        LaneAction::RequestGank => "set up for a gank",
        LaneAction::RoamDragon => "rotate to dragon",
        LaneAction::RoamHerald => "rotate to herald",
    }
}

fn position_advice(state: &LaneState) -> String {
    if state.gank_risk() > 0.5 {
        "Stay near your tower - gank risk is high".to_string()
    } else if state.wave_position == WavePosition::FrozenNearMe {
        "Stay on the safe side of the wave - let them come to you".to_string()
    } else if state.wave_position == WavePosition::Crashed {
        "You can step up since the wave is at their tower".to_string()
    } else {
        "Stay in the middle of lane - balanced position".to_string()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
