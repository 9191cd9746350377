//! MCTS lane coach for the Rift Engine.
//!
//! Given a [`LaneState`](rift_core::LaneState) snapshot, the coach searches
//! a tree of discrete lane actions against a modeled enemy policy and
//! returns a ranked recommendation with a confidence label and per-action
//! score breakdown. Recommendations can be chained into a multi-step plan,
//! and the root search can be split across worker threads.

pub mod actions;
pub mod config;
pub mod error;
pub mod explain;
mod node;
pub mod parallel;
pub mod plan;
pub mod policy;
pub mod scoring;
mod search;
pub mod step;

pub use actions::{ActionProfile, LaneAction, legal_actions};
pub use config::SearchConfig;
pub use error::CoachError;
pub use explain::{ActionScore, MctsResult, PlanResult};
pub use parallel::recommend_parallel;
pub use plan::plan;
pub use policy::EnemyModel;
pub use scoring::RewardWeights;
pub use search::recommend;
