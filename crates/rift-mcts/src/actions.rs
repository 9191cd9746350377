//! The action library: everything a laner can do in one 20-second window,
//! plus the legality filter applied before search.

use rift_core::{LanePosition, LaneState, ValidationError};
use serde::{Deserialize, Serialize};

/// One tactical choice for a 20-second window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneAction {
    FarmSafe,
    PushWave,
    FreezeWave,
    ResetWave,
    ShortTrade,
    ExtendedTrade,
    AllIn,
    BackOff,
    Recall,
    WardRiver,
    RequestGank,
    RoamDragon,
    RoamHerald,
}

impl LaneAction {
    pub const ALL: [LaneAction; 13] = [
        LaneAction::FarmSafe,
        LaneAction::PushWave,
        LaneAction::FreezeWave,
        LaneAction::ResetWave,
        LaneAction::ShortTrade,
        LaneAction::ExtendedTrade,
        LaneAction::AllIn,
        LaneAction::BackOff,
        LaneAction::Recall,
        LaneAction::WardRiver,
        LaneAction::RequestGank,
        LaneAction::RoamDragon,
        LaneAction::RoamHerald,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LaneAction::FarmSafe => "farm_safe",
            LaneAction::PushWave => "push_wave",
            LaneAction::FreezeWave => "freeze_wave",
            LaneAction::ResetWave => "reset_wave",
            LaneAction::ShortTrade => "short_trade",
            LaneAction::ExtendedTrade => "extended_trade",
            LaneAction::AllIn => "all_in",
            LaneAction::BackOff => "back_off",
            LaneAction::Recall => "recall",
            LaneAction::WardRiver => "ward_river",
            LaneAction::RequestGank => "request_gank",
            LaneAction::RoamDragon => "roam_dragon",
            LaneAction::RoamHerald => "roam_herald",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        LaneAction::ALL
            .into_iter()
            .find(|a| a.as_str() == value)
            .ok_or_else(|| ValidationError::UnknownValue {
                field: "lane_action",
                value: value.to_string(),
            })
    }

    /// Requirement and risk metadata for this action.
    pub fn profile(self) -> ActionProfile {
        match self {
            LaneAction::FarmSafe => ActionProfile::new(0.0, 0.0, false, 0.05, false),
            LaneAction::PushWave => ActionProfile::new(0.0, 15.0, true, 0.15, false),
            LaneAction::FreezeWave => ActionProfile::new(0.0, 0.0, false, 0.1, false),
            LaneAction::ResetWave => ActionProfile::new(0.0, 0.0, false, 0.05, false),
            LaneAction::ShortTrade => ActionProfile::new(25.0, 20.0, true, 0.3, false),
            LaneAction::ExtendedTrade => ActionProfile::new(40.0, 35.0, true, 0.5, false),
            LaneAction::AllIn => ActionProfile::new(50.0, 40.0, true, 0.8, false),
            LaneAction::BackOff => ActionProfile::new(0.0, 0.0, false, 0.02, false),
            LaneAction::Recall => ActionProfile::new(0.0, 0.0, false, 0.1, true),
            LaneAction::WardRiver => ActionProfile::new(0.0, 0.0, false, 0.15, false),
            // Holding the lane for a setup needs enough health to survive
            // the harass until the jungler arrives.
            LaneAction::RequestGank => ActionProfile::new(35.0, 0.0, false, 0.35, false),
            LaneAction::RoamDragon => ActionProfile::new(30.0, 0.0, false, 0.3, true),
            LaneAction::RoamHerald => ActionProfile::new(30.0, 0.0, false, 0.3, true),
        }
    }

    /// Trades and all-ins, the actions a passive opponent avoids.
    pub fn is_aggressive(self) -> bool {
        matches!(
            self,
            LaneAction::ShortTrade | LaneAction::ExtendedTrade | LaneAction::AllIn
        )
    }
}

/// What an action requires and risks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionProfile {
    pub min_hp_pct: f64,
    pub min_mana_pct: f64,
    pub requires_ability: bool,
    pub risk: f64,
    pub leaves_lane: bool,
}

impl ActionProfile {
    const fn new(
        min_hp_pct: f64,
        min_mana_pct: f64,
        requires_ability: bool,
        risk: f64,
        leaves_lane: bool,
    ) -> Self {
        ActionProfile {
            min_hp_pct,
            min_mana_pct,
            requires_ability,
            risk,
            leaves_lane,
        }
    }
}

/// Actions actually available from this state. FarmSafe is the guaranteed
/// fallback so the list is never empty.
pub fn legal_actions(state: &LaneState) -> Vec<LaneAction> {
    let mut legal = Vec::with_capacity(LaneAction::ALL.len());
    for action in LaneAction::ALL {
        let profile = action.profile();
        if state.my_hp_pct() < profile.min_hp_pct {
            continue;
        }
        if state.my_mana_pct() < profile.min_mana_pct {
            continue;
        }
        if profile.requires_ability && !state.has_basic_ability() {
            continue;
        }
        match action {
            // All-ins from under tower do not connect.
            LaneAction::AllIn if state.my_position == LanePosition::UnderTower => continue,
            // Recalling while extended hands over a free wave or a kill.
            LaneAction::Recall if state.my_position == LanePosition::Extended => continue,
            LaneAction::RoamDragon if state.dragon_timer > 30.0 => continue,
            LaneAction::RoamHerald if state.herald_timer > 30.0 => continue,
            _ => {}
        }
        legal.push(action);
    }
    if legal.is_empty() {
        legal.push(LaneAction::FarmSafe);
    }
    legal
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn all_in_needs_health_mana_and_an_ability() {
        let mut state = LaneState::default();
        let legal = legal_actions(&state);
        assert!(legal.contains(&LaneAction::AllIn));

        state.my_hp = state.my_hp_max * 0.2;
        let legal = legal_actions(&state);
        assert!(!legal.contains(&LaneAction::AllIn));
        assert!(!legal.contains(&LaneAction::ExtendedTrade));
    }

    #[test]
    fn recall_is_illegal_while_extended() {
        let mut state = LaneState::default();
        state.my_position = LanePosition::Extended;
        assert!(!legal_actions(&state).contains(&LaneAction::Recall));
        state.my_position = LanePosition::Safe;
        assert!(legal_actions(&state).contains(&LaneAction::Recall));
    }

    #[test]
    fn roams_wait_for_the_objective_timer() {
        let mut state = LaneState::default();
        state.dragon_timer = 120.0;
        state.herald_timer = 10.0;
        let legal = legal_actions(&state);
        assert!(!legal.contains(&LaneAction::RoamDragon));
        assert!(legal.contains(&LaneAction::RoamHerald));
    }

    #[test]
    fn request_gank_needs_health_to_hold_the_lane() {
        let mut state = LaneState::default();
        state.my_hp = state.my_hp_max * 0.2;
        assert!(!legal_actions(&state).contains(&LaneAction::RequestGank));
        state.my_hp = state.my_hp_max * 0.5;
        assert!(legal_actions(&state).contains(&LaneAction::RequestGank));
    }

    #[test]
    fn farm_safe_survives_the_worst_state() {
        let mut state = LaneState::default();
        state.my_hp = 1.0;
        state.my_mana = 0.0;
        state.my_q_cd = 10.0;
        state.my_w_cd = 10.0;
        state.my_e_cd = 10.0;
        let legal = legal_actions(&state);
        assert!(legal.contains(&LaneAction::FarmSafe));
    }

    #[test]
    fn parse_round_trips_every_action() {
        for action in LaneAction::ALL {
            assert_eq!(LaneAction::parse(action.as_str()).unwrap(), action);
        }
        assert!(LaneAction::parse("teleport_mid").is_err());
    }

    proptest! {
        #[test]
        fn legality_respects_resource_gates(
            hp_pct in 0.0f64..100.0,
            mana_pct in 0.0f64..100.0,
            q_cd in 0.0f64..20.0,
        ) {
            let state = LaneState {
                my_hp: 600.0 * hp_pct / 100.0,
                my_mana: 300.0 * mana_pct / 100.0,
                my_q_cd: q_cd,
                my_w_cd: 10.0,
                my_e_cd: 10.0,
                ..LaneState::default()
            };
            let legal = legal_actions(&state);
            prop_assert!(!legal.is_empty());
            for action in &legal {
                let profile = action.profile();
                if *action != LaneAction::FarmSafe {
                    prop_assert!(state.my_hp_pct() >= profile.min_hp_pct);
                    prop_assert!(state.my_mana_pct() >= profile.min_mana_pct);
                }
            }
        }
    }
}
