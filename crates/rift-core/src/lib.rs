//! Canonical data model for the Rift Engine: champion baseline tables,
//! draft types, and the lane-state snapshot shared by the match simulator
//! and the MCTS lane coach.

mod champion;
mod draft;
mod error;
mod lane;

pub use champion::{
    AbilitySlot, Archetype, BaseStat, ChampionId, ChampionProfile, CooldownTable, GrowthCurve,
    MAX_LEVEL, PASSIVE_GOLD_PER_MIN, ResourceType, SummonerSpell, XP_TO_LEVEL, champion,
    roster_size,
};
pub use draft::{DRAFT_SIZE, Draft, MatchRequest, Pick, Role, Side};
pub use error::ValidationError;
pub use lane::{
    EARLY_PHASE_END, JunglerLocation, LanePosition, LaneState, MID_PHASE_END, Phase, WavePosition,
};
