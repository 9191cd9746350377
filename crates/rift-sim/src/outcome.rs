//! Stochastic outcome model: turns a state differential into sampled trade,
//! objective, and gank outcomes. Shared by the match simulator and the MCTS
//! forward step so both engines price risk the same way.

use serde::{Deserialize, Serialize};

use crate::draw::DrawStream;
use crate::error::SimError;

/// Base kill bounty before shutdown/comeback adjustments.
pub const KILL_GOLD: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Combat-relevant view of one participant. Both engines project their own
/// state representation into this before resolving an engagement.
pub struct Combatant {
    pub combat_power: f64,
    pub level: u32,
    pub hp: f64,
    pub hp_max: f64,
    pub mana: f64,
    pub mana_max: f64,
    /// 0-1 positional gank exposure (extended position, unknown jungler).
    pub position_risk: f64,
}

impl Combatant {
    fn validate(&self, label: &str) -> Result<(), SimError> {
        if self.hp_max <= 0.0 || self.mana_max <= 0.0 {
            return Err(SimError::computation(format!(
                "{label} has a non-positive resource pool (hp_max={}, mana_max={})",
                self.hp_max, self.mana_max
            )));
        }
        Ok(())
    }

    fn resource_fraction(&self) -> f64 {
        // Pools validated positive before use; no silent divide guards here.
        0.65 * (self.hp / self.hp_max) + 0.35 * (self.mana / self.mana_max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Intensity class of an engagement. Damage scales with commitment.
pub enum Engagement {
    Poke,
    Trade,
    AllIn,
    Skirmish,
    ObjectiveContest,
}

impl Engagement {
    fn intensity(self) -> f64 {
        match self {
            Engagement::Poke => 0.15,
            Engagement::Trade => 0.35,
            Engagement::AllIn => 0.65,
            Engagement::Skirmish => 0.45,
            Engagement::ObjectiveContest => 0.30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementResult {
    AWinsTrade,
    BWinsTrade,
    ADies,
    BDies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// A gank materialized against side A during the engagement window.
pub enum RiskEvent {
    GankEscapedWithFlash,
    GankEscaped,
    GankDeath,
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Resolved engagement: who came out ahead and the resource/gold swing.
/// HP deltas are clamped so no participant ends below zero; a would-be
/// negative HP becomes a death result instead.
pub struct TradeOutcome {
    pub result: EngagementResult,
    pub hp_delta_a: f64,
    pub hp_delta_b: f64,
    pub gold_delta_a: f64,
    pub gold_delta_b: f64,
    pub risk_event: Option<RiskEvent>,
}

/// Probability that A wins the engagement, from power/level/resource
/// differentials. Clamped away from certainty: even a heavy favorite can
/// lose a coin flip.
pub fn win_probability(a: &Combatant, b: &Combatant) -> f64 {
    let avg_power = ((a.combat_power + b.combat_power) / 2.0).max(1.0);
    let power_term = (a.combat_power - b.combat_power) / avg_power * 0.35;
    let level_term = (a.level as f64 - b.level as f64) * 0.05;
    let resource_term = (a.resource_fraction() - b.resource_fraction()) * 0.20;
    (0.5 + power_term + level_term + resource_term).clamp(0.08, 0.92)
}

/// Resolve one engagement between A and B.
///
/// Draw discipline: one draw picks the winner, one draw sets the damage
/// variance, one draw checks A's gank exposure (plus follow-up draws only
/// when a gank actually fires). A fixed stream therefore replays the exact
/// same outcome.
pub fn resolve(
    a: &Combatant,
    b: &Combatant,
    engagement: Engagement,
    draws: &mut DrawStream,
) -> Result<TradeOutcome, SimError> {
    a.validate("combatant A")?;
    b.validate("combatant B")?;

    let p_a = win_probability(a, b);
    let intensity = engagement.intensity();
    let a_wins = draws.chance(p_a);
    let variance = draws.range(0.8, 1.25);

    let (winner_power, loser_power) = if a_wins {
        (a.combat_power, b.combat_power)
    } else {
        (b.combat_power, a.combat_power)
    };
    let dealt = winner_power * intensity * variance;
    let returned = loser_power * intensity * 0.6 * variance;

    let (mut hp_delta_a, mut hp_delta_b) = if a_wins {
        (-returned, -dealt)
    } else {
        (-dealt, -returned)
    };

    // Clamp: HP never goes below zero; hitting zero is a death.
    hp_delta_a = hp_delta_a.max(-a.hp);
    hp_delta_b = hp_delta_b.max(-b.hp);

    let mut gold_delta_a = 0.0;
    let mut gold_delta_b = 0.0;
    let mut result = if a_wins {
        EngagementResult::AWinsTrade
    } else {
        EngagementResult::BWinsTrade
    };
    if a.hp + hp_delta_a <= 0.0 {
        result = EngagementResult::ADies;
        gold_delta_b += KILL_GOLD;
    } else if b.hp + hp_delta_b <= 0.0 {
        result = EngagementResult::BDies;
        gold_delta_a += KILL_GOLD;
    }

    // Positional risk on A's side: committed engagements from a bad spot
    // invite the enemy jungler.
    let mut risk_event = None;
    if result != EngagementResult::ADies {
        let gank_p = a.position_risk * intensity * 0.5;
        if draws.chance(gank_p) {
            let remaining = a.hp + hp_delta_a;
            let gank_damage = b.combat_power * 0.4 * draws.range(0.7, 1.2);
            if gank_damage >= remaining {
                // Flash-out check before the kill resolves.
                if draws.chance(0.45) {
                    let surviving = (remaining * 0.25).max(1.0);
                    hp_delta_a = -(a.hp - surviving);
                    risk_event = Some(RiskEvent::GankEscapedWithFlash);
                } else {
                    hp_delta_a = -a.hp;
                    result = EngagementResult::ADies;
                    gold_delta_b += KILL_GOLD;
                    risk_event = Some(RiskEvent::GankDeath);
                }
            } else {
                hp_delta_a -= gank_damage;
                hp_delta_a = hp_delta_a.max(-a.hp);
                risk_event = Some(RiskEvent::GankEscaped);
            }
        }
    }

    Ok(TradeOutcome {
        result,
        hp_delta_a,
        hp_delta_b,
        gold_delta_a,
        gold_delta_b,
        risk_event,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combatant(power: f64, level: u32, hp: f64) -> Combatant {
        Combatant {
            combat_power: power,
            level,
            hp,
            hp_max: 1000.0,
            mana: 400.0,
            mana_max: 400.0,
            position_risk: 0.0,
        }
    }

    #[test]
    fn zero_hp_max_is_a_computation_error() {
        let mut draws = DrawStream::from_seed(1);
        let bad = Combatant {
            hp_max: 0.0,
            ..combatant(100.0, 5, 500.0)
        };
        let err = resolve(&bad, &combatant(100.0, 5, 500.0), Engagement::Trade, &mut draws)
            .unwrap_err();
        assert!(matches!(err, SimError::Computation { .. }));
    }

    #[test]
    fn stronger_combatant_is_favored_but_not_certain() {
        let strong = combatant(300.0, 8, 900.0);
        let weak = combatant(150.0, 5, 400.0);
        let p = win_probability(&strong, &weak);
        assert!(p > 0.6);
        assert!(p <= 0.92);
        assert!(win_probability(&weak, &strong) >= 0.08);
    }

    #[test]
    fn hp_never_drops_below_zero() {
        for seed in 0..200 {
            let mut draws = DrawStream::from_seed(seed);
            let a = combatant(100.0, 3, 40.0);
            let b = combatant(400.0, 9, 950.0);
            let outcome = resolve(&a, &b, Engagement::AllIn, &mut draws).expect("resolves");
            assert!(a.hp + outcome.hp_delta_a >= 0.0);
            assert!(b.hp + outcome.hp_delta_b >= 0.0);
        }
    }

    #[test]
    fn lethal_outcome_reports_a_death_and_bounty() {
        let mut found_death = false;
        for seed in 0..400 {
            let mut draws = DrawStream::from_seed(seed);
            let a = combatant(100.0, 3, 30.0);
            let b = combatant(420.0, 9, 950.0);
            let outcome = resolve(&a, &b, Engagement::AllIn, &mut draws).expect("resolves");
            if outcome.result == EngagementResult::ADies {
                assert_eq!(a.hp + outcome.hp_delta_a, 0.0);
                assert!(outcome.gold_delta_b >= KILL_GOLD);
                found_death = true;
                break;
            }
        }
        assert!(found_death, "a 30 hp combatant should die in some seed");
    }

    #[test]
    fn identical_seed_resolves_identically() {
        let a = combatant(220.0, 6, 700.0);
        let b = combatant(180.0, 6, 600.0);
        let mut s1 = DrawStream::from_seed(77);
        let mut s2 = DrawStream::from_seed(77);
        let o1 = resolve(&a, &b, Engagement::Trade, &mut s1).expect("resolves");
        let o2 = resolve(&a, &b, Engagement::Trade, &mut s2).expect("resolves");
        assert_eq!(o1, o2);
    }

    #[test]
    fn risk_events_require_positional_exposure() {
        for seed in 0..100 {
            let mut draws = DrawStream::from_seed(seed);
            let a = combatant(200.0, 6, 800.0);
            let b = combatant(200.0, 6, 800.0);
            let outcome = resolve(&a, &b, Engagement::AllIn, &mut draws).expect("resolves");
            assert_eq!(outcome.risk_event, None);
        }
    }
}
