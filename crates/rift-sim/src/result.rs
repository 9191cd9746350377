//! Public output types for a simulated match.

use std::collections::BTreeMap;

use rift_core::Side;
use serde::{Deserialize, Serialize};

/// One gold-differential sample, recorded once per minute including minute 0.
/// Positive values favor blue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoldSample {
    pub minute: u32,
    pub blue_gold: f64,
    pub red_gold: f64,
    pub diff: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Kill,
    FlashBurned,
    TeamFight,
    Dragon,
    DragonSoul,
    Baron,
    Tower,
    ComebackGold,
    Nexus,
}

/// A timeline entry. Timestamps are in game seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub time: f64,
    pub kind: EventKind,
    pub description: String,
}

/// Per-minute narration for a single champion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionMinuteReport {
    pub minute: u32,
    pub action: String,
    pub reasoning: String,
    pub level: u32,
    pub kda: String,
    pub gold: f64,
    pub cs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScoreline {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub towers_taken: u32,
    pub dragons: u32,
    pub barons: u32,
}

/// Full output of one simulated match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub winner: Side,
    pub duration_minutes: u32,
    /// Blue's terminal win probability, derived from the time-integrated
    /// advantage signal. Always strictly inside (0, 1); the sampled winner
    /// may disagree with the favored side.
    pub blue_win_probability: f64,
    pub gold_curve: Vec<GoldSample>,
    pub timeline: Vec<GameEvent>,
    /// Keyed by a side-qualified label, e.g. `"BLUE Ahri (mid)"`, so mirror
    /// drafts keep both entries.
    pub champion_reports: BTreeMap<String, Vec<ChampionMinuteReport>>,
    pub blue_scoreline: TeamScoreline,
    pub red_scoreline: TeamScoreline,
}
