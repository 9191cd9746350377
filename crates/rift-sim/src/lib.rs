//! Deterministic minute-tick match simulator.
//!
//! [`simulate`] takes a validated [`rift_core::MatchRequest`] and plays the
//! match out one minute at a time: income, combat power, lane fights and
//! ganks, skirmishes, objectives, and tower pressure. Every random decision
//! consumes exactly one draw from a seeded [`DrawStream`], so a request is
//! fully reproducible from its seed.

pub mod draw;
pub mod error;
pub mod outcome;
mod report;
pub mod result;
mod sim;
mod state;

pub use draw::DrawStream;
pub use error::SimError;
pub use outcome::{
    Combatant, Engagement, EngagementResult, RiskEvent, TradeOutcome, resolve, win_probability,
    KILL_GOLD,
};
pub use result::{
    ChampionMinuteReport, EventKind, GameEvent, GoldSample, SimulationResult, TeamScoreline,
};
pub use sim::simulate;
