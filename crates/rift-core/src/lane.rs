use serde::{Deserialize, Serialize};

use crate::champion::{ChampionId, SummonerSpell};
use crate::error::ValidationError;

/// Phase boundaries in seconds of game time.
pub const EARLY_PHASE_END: f64 = 840.0;
pub const MID_PHASE_END: f64 = 1500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Game phase. Always derived from game time, never trusted from a caller.
pub enum Phase {
    Early,
    Mid,
    Late,
}

impl Phase {
    /// Derivation rule: early before 14:00, mid before 25:00, late after.
    pub fn from_game_time(game_time: f64) -> Phase {
        if game_time < EARLY_PHASE_END {
            Phase::Early
        } else if game_time < MID_PHASE_END {
            Phase::Mid
        } else {
            Phase::Late
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Where a laner stands relative to their own tower.
pub enum LanePosition {
    UnderTower,
    Safe,
    Middle,
    Extended,
    River,
}

impl LanePosition {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "under_tower" => Ok(LanePosition::UnderTower),
            "safe" => Ok(LanePosition::Safe),
            "middle" => Ok(LanePosition::Middle),
            "extended" => Ok(LanePosition::Extended),
            "river" => Ok(LanePosition::River),
            other => Err(ValidationError::UnknownValue {
                field: "lane_position",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Where the minion wave sits between the two towers.
pub enum WavePosition {
    FrozenNearMe,
    PushingToMe,
    Middle,
    SlowPushToThem,
    Crashed,
}

impl WavePosition {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "frozen_near_me" => Ok(WavePosition::FrozenNearMe),
            "pushing_to_me" => Ok(WavePosition::PushingToMe),
            "middle" => Ok(WavePosition::Middle),
            "slow_push_to_them" => Ok(WavePosition::SlowPushToThem),
            "crashed" => Ok(WavePosition::Crashed),
            other => Err(ValidationError::UnknownValue {
                field: "wave_position",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Last known enemy jungler quadrant.
pub enum JunglerLocation {
    Topside,
    Botside,
    Mid,
    Unknown,
}

impl JunglerLocation {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "topside" => Ok(JunglerLocation::Topside),
            "botside" => Ok(JunglerLocation::Botside),
            "mid" => Ok(JunglerLocation::Mid),
            "unknown" => Ok(JunglerLocation::Unknown),
            other => Err(ValidationError::UnknownValue {
                field: "jungler_location",
                value: other.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JunglerLocation::Topside => "topside",
            JunglerLocation::Botside => "botside",
            JunglerLocation::Mid => "mid",
            JunglerLocation::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Flat snapshot of one lane matchup: everything a laner knows (or can
/// estimate) for the next short decision window. Enemy resource and
/// cooldown fields are estimates rather than ground truth.
pub struct LaneState {
    // Own champion.
    pub my_champion: ChampionId,
    pub my_hp: f64,
    pub my_hp_max: f64,
    pub my_mana: f64,
    pub my_mana_max: f64,
    pub my_level: u32,
    pub my_xp_to_next: f64,
    pub my_q_cd: f64,
    pub my_w_cd: f64,
    pub my_e_cd: f64,
    pub my_r_cd: f64,
    pub my_flash_cd: f64,
    pub my_summ2_cd: f64,
    pub my_summ2_type: SummonerSpell,
    pub my_position: LanePosition,
    pub my_gold: f64,
    pub my_combat_power: f64,

    // Enemy laner (estimated where hidden).
    pub enemy_champion: ChampionId,
    pub enemy_hp: f64,
    pub enemy_hp_max: f64,
    pub enemy_mana_est: f64,
    pub enemy_mana_max: f64,
    pub enemy_level: u32,
    pub enemy_q_cd_est: f64,
    pub enemy_w_cd_est: f64,
    pub enemy_e_cd_est: f64,
    pub enemy_r_cd_est: f64,
    pub enemy_flash_cd_est: f64,
    pub enemy_position: LanePosition,
    pub enemy_combat_power: f64,

    // Wave state.
    pub my_minions: u32,
    pub enemy_minions: u32,
    pub wave_position: WavePosition,

    // Map context.
    pub enemy_jg_last_seen: f64,
    pub enemy_jg_location: JunglerLocation,
    pub dragon_timer: f64,
    pub herald_timer: f64,
    pub my_tower_hp: f64,
    pub enemy_tower_hp: f64,

    // Time.
    pub game_time: f64,
}

impl Default for LaneState {
    fn default() -> Self {
        LaneState {
            my_champion: ChampionId::from("Ahri"),
            my_hp: 600.0,
            my_hp_max: 600.0,
            my_mana: 300.0,
            my_mana_max: 300.0,
            my_level: 1,
            my_xp_to_next: 280.0,
            my_q_cd: 0.0,
            my_w_cd: 0.0,
            my_e_cd: 0.0,
            my_r_cd: 0.0,
            my_flash_cd: 0.0,
            my_summ2_cd: 0.0,
            my_summ2_type: SummonerSpell::Ignite,
            my_position: LanePosition::Middle,
            my_gold: 500.0,
            my_combat_power: 100.0,
            enemy_champion: ChampionId::from("Syndra"),
            enemy_hp: 600.0,
            enemy_hp_max: 600.0,
            enemy_mana_est: 300.0,
            enemy_mana_max: 300.0,
            enemy_level: 1,
            enemy_q_cd_est: 0.0,
            enemy_w_cd_est: 0.0,
            enemy_e_cd_est: 0.0,
            enemy_r_cd_est: 0.0,
            enemy_flash_cd_est: 0.0,
            enemy_position: LanePosition::Middle,
            enemy_combat_power: 100.0,
            my_minions: 6,
            enemy_minions: 6,
            wave_position: WavePosition::Middle,
            enemy_jg_last_seen: 999.0,
            enemy_jg_location: JunglerLocation::Unknown,
            dragon_timer: 300.0,
            herald_timer: 840.0,
            my_tower_hp: 100.0,
            enemy_tower_hp: 100.0,
            game_time: 90.0,
        }
    }
}

impl LaneState {
    /// Validate range invariants. The snapshot is rejected before any
    /// search work when a percentage, pool, cooldown, or level is out of
    /// bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.my_champion.resolve()?;
        self.enemy_champion.resolve()?;

        for (field, value) in [
            ("my_hp_max", self.my_hp_max),
            ("my_mana_max", self.my_mana_max),
            ("enemy_hp_max", self.enemy_hp_max),
            ("enemy_mana_max", self.enemy_mana_max),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ValidationError::NonPositivePool { field, value });
            }
        }

        for (field, value) in [
            ("my_tower_hp", self.my_tower_hp),
            ("enemy_tower_hp", self.enemy_tower_hp),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ValidationError::PercentOutOfRange { field, value });
            }
        }

        for (field, value) in [
            ("my_q_cd", self.my_q_cd),
            ("my_w_cd", self.my_w_cd),
            ("my_e_cd", self.my_e_cd),
            ("my_r_cd", self.my_r_cd),
            ("my_flash_cd", self.my_flash_cd),
            ("my_summ2_cd", self.my_summ2_cd),
            ("enemy_q_cd_est", self.enemy_q_cd_est),
            ("enemy_w_cd_est", self.enemy_w_cd_est),
            ("enemy_e_cd_est", self.enemy_e_cd_est),
            ("enemy_r_cd_est", self.enemy_r_cd_est),
            ("enemy_flash_cd_est", self.enemy_flash_cd_est),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ValidationError::NegativeCooldown { field, value });
            }
        }

        for (field, value) in [("my_level", self.my_level), ("enemy_level", self.enemy_level)] {
            if !(1..=18).contains(&value) {
                return Err(ValidationError::LevelOutOfRange { field, value });
            }
        }

        Ok(())
    }

    /// Current phase, recomputed from game time. A conflicting phase
    /// supplied by a caller is ignored by design.
    pub fn phase(&self) -> Phase {
        Phase::from_game_time(self.game_time)
    }

    pub fn my_hp_pct(&self) -> f64 {
        if self.my_hp_max > 0.0 {
            self.my_hp / self.my_hp_max * 100.0
        } else {
            0.0
        }
    }

    pub fn enemy_hp_pct(&self) -> f64 {
        if self.enemy_hp_max > 0.0 {
            self.enemy_hp / self.enemy_hp_max * 100.0
        } else {
            0.0
        }
    }

    pub fn my_mana_pct(&self) -> f64 {
        if self.my_mana_max > 0.0 {
            self.my_mana / self.my_mana_max * 100.0
        } else {
            0.0
        }
    }

    pub fn has_flash(&self) -> bool {
        self.my_flash_cd <= 0.0
    }

    pub fn has_ult(&self) -> bool {
        self.my_r_cd <= 0.0 && self.my_level >= 6
    }

    pub fn enemy_has_ult_est(&self) -> bool {
        self.enemy_r_cd_est <= 0.0 && self.enemy_level >= 6
    }

    pub fn has_basic_ability(&self) -> bool {
        self.my_q_cd <= 0.0 || self.my_w_cd <= 0.0 || self.my_e_cd <= 0.0
    }

    /// 0-1 estimate of how gankable the current position is: pushed-up
    /// positioning, stale jungler information, and a spent flash all raise
    /// the risk.
    pub fn gank_risk(&self) -> f64 {
        let mut risk: f64 = 0.0;
        match self.my_position {
            LanePosition::Extended => risk += 0.3,
            LanePosition::Middle => risk += 0.1,
            _ => {}
        }
        match self.enemy_jg_location {
            JunglerLocation::Unknown => risk += 0.2,
            JunglerLocation::Mid => risk += 0.4,
            _ => {}
        }
        if self.enemy_jg_last_seen > 30.0 {
            risk += 0.15;
        }
        if !self.has_flash() {
            risk += 0.2;
        }
        risk.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn phase_is_derived_from_game_time() {
        assert_eq!(Phase::from_game_time(0.0), Phase::Early);
        assert_eq!(Phase::from_game_time(839.9), Phase::Early);
        assert_eq!(Phase::from_game_time(840.0), Phase::Mid);
        assert_eq!(Phase::from_game_time(1499.9), Phase::Mid);
        assert_eq!(Phase::from_game_time(1500.0), Phase::Late);
    }

    #[test]
    fn default_state_validates() {
        LaneState::default().validate().expect("default is valid");
    }

    #[test]
    fn zero_hp_max_is_a_validation_error() {
        let state = LaneState {
            my_hp_max: 0.0,
            ..LaneState::default()
        };
        let err = state.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonPositivePool {
                field: "my_hp_max",
                ..
            }
        ));
    }

    #[test]
    fn negative_cooldown_is_a_validation_error() {
        let state = LaneState {
            my_q_cd: -1.0,
            ..LaneState::default()
        };
        assert!(matches!(
            state.validate().unwrap_err(),
            ValidationError::NegativeCooldown { field: "my_q_cd", .. }
        ));
    }

    #[test]
    fn tower_percentage_out_of_range_is_rejected() {
        let state = LaneState {
            enemy_tower_hp: 120.0,
            ..LaneState::default()
        };
        assert!(matches!(
            state.validate().unwrap_err(),
            ValidationError::PercentOutOfRange { .. }
        ));
    }

    #[test]
    fn jungler_location_parse_round_trips_and_rejects_unknown() {
        for location in [
            JunglerLocation::Topside,
            JunglerLocation::Botside,
            JunglerLocation::Mid,
            JunglerLocation::Unknown,
        ] {
            assert_eq!(JunglerLocation::parse(location.as_str()).unwrap(), location);
        }
        assert!(matches!(
            JunglerLocation::parse("base"),
            Err(ValidationError::UnknownValue {
                field: "jungler_location",
                ..
            })
        ));
    }

    #[test]
    fn gank_risk_rises_when_extended_without_vision() {
        let safe = LaneState {
            my_position: LanePosition::UnderTower,
            enemy_jg_location: JunglerLocation::Botside,
            enemy_jg_last_seen: 5.0,
            ..LaneState::default()
        };
        let exposed = LaneState {
            my_position: LanePosition::Extended,
            enemy_jg_location: JunglerLocation::Unknown,
            enemy_jg_last_seen: 120.0,
            my_flash_cd: 200.0,
            ..LaneState::default()
        };
        assert!(exposed.gank_risk() > safe.gank_risk());
        assert!(exposed.gank_risk() <= 1.0);
    }

    proptest! {
        #[test]
        fn gank_risk_is_always_a_probability(
            position in 0usize..5,
            jg in 0usize..4,
            last_seen in 0.0f64..600.0,
            flash_cd in 0.0f64..300.0,
        ) {
            let positions = [
                LanePosition::UnderTower,
                LanePosition::Safe,
                LanePosition::Middle,
                LanePosition::Extended,
                LanePosition::River,
            ];
            let locations = [
                JunglerLocation::Topside,
                JunglerLocation::Botside,
                JunglerLocation::Mid,
                JunglerLocation::Unknown,
            ];
            let state = LaneState {
                my_position: positions[position],
                enemy_jg_location: locations[jg],
                enemy_jg_last_seen: last_seen,
                my_flash_cd: flash_cd,
                ..LaneState::default()
            };
            let risk = state.gank_risk();
            prop_assert!((0.0..=1.0).contains(&risk));
        }

        #[test]
        fn phase_boundaries_are_exhaustive_and_ordered(game_time in 0.0f64..4000.0) {
            let phase = Phase::from_game_time(game_time);
            match phase {
                Phase::Early => prop_assert!(game_time < EARLY_PHASE_END),
                Phase::Mid => prop_assert!((EARLY_PHASE_END..MID_PHASE_END).contains(&game_time)),
                Phase::Late => prop_assert!(game_time >= MID_PHASE_END),
            }
        }
    }
}
