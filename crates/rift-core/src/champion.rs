use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const CHAMPION_TABLE_YAML: &str = include_str!("../data/champions.yaml");

/// Cumulative XP required to reach each level, indexed by level (1..=18).
/// Level 1 costs nothing; the table is monotonically increasing.
pub const XP_TO_LEVEL: [f64; 19] = [
    0.0, 0.0, 280.0, 660.0, 1140.0, 1720.0, 2400.0, 3180.0, 4060.0, 5040.0, 6120.0, 7300.0,
    8580.0, 9960.0, 11440.0, 13020.0, 14700.0, 16480.0, 18360.0,
];

/// Passive gold income per in-game minute (1.9 gold/sec after the early ramp).
pub const PASSIVE_GOLD_PER_MIN: f64 = 114.0;

pub const MAX_LEVEL: u32 = 18;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Opaque champion identifier. Resolved against the static roster table;
/// an id with no roster entry fails request validation.
pub struct ChampionId(String);

impl ChampionId {
    pub fn new(id: impl Into<String>) -> Self {
        ChampionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve this id against the roster, failing validation when absent.
    pub fn resolve(&self) -> Result<&'static ChampionProfile, ValidationError> {
        champion(self).ok_or_else(|| ValidationError::UnknownChampion {
            champion: self.0.clone(),
        })
    }
}

impl fmt::Display for ChampionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChampionId {
    fn from(value: &str) -> Self {
        ChampionId(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Broad champion class, used to flavor report text.
pub enum Archetype {
    Mage,
    Assassin,
    Fighter,
    Marksman,
    Support,
    Tank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Mana,
    Energy,
    Fury,
    Rage,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseStat {
    Hp,
    Mana,
    AttackDamage,
    Armor,
    MagicResist,
    AttackSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilitySlot {
    Q,
    W,
    E,
    R,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Base value plus linear per-level growth for the six tracked stats.
pub struct GrowthCurve {
    pub hp: f64,
    pub hp_per_level: f64,
    pub mana: f64,
    pub mana_per_level: f64,
    pub attack_damage: f64,
    pub attack_damage_per_level: f64,
    pub armor: f64,
    pub armor_per_level: f64,
    pub magic_resist: f64,
    pub magic_resist_per_level: f64,
    pub attack_speed: f64,
    pub attack_speed_per_level: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Per-rank cooldown tables. Basic abilities have 5 ranks, the ultimate 3.
pub struct CooldownTable {
    pub q: [f64; 5],
    pub w: [f64; 5],
    pub e: [f64; 5],
    pub r: [f64; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Static baseline record for one champion.
pub struct ChampionProfile {
    pub id: ChampionId,
    pub archetype: Archetype,
    pub resource: ResourceType,
    pub base: GrowthCurve,
    pub cooldowns: CooldownTable,
}

impl ChampionProfile {
    /// Evaluate a stat at a given level via linear growth.
    /// Levels are clamped into `[1, 18]`.
    pub fn stat_at_level(&self, stat: BaseStat, level: u32) -> f64 {
        let steps = (level.clamp(1, MAX_LEVEL) - 1) as f64;
        let (base, growth) = match stat {
            BaseStat::Hp => (self.base.hp, self.base.hp_per_level),
            BaseStat::Mana => (self.base.mana, self.base.mana_per_level),
            BaseStat::AttackDamage => (self.base.attack_damage, self.base.attack_damage_per_level),
            BaseStat::Armor => (self.base.armor, self.base.armor_per_level),
            BaseStat::MagicResist => (self.base.magic_resist, self.base.magic_resist_per_level),
            BaseStat::AttackSpeed => (self.base.attack_speed, self.base.attack_speed_per_level),
        };
        base + growth * steps
    }

    /// Cooldown of an ability at a rank. Ranks are clamped to the table;
    /// rank 0 (unlearned) reports the rank-1 cooldown.
    pub fn ability_cooldown(&self, slot: AbilitySlot, rank: u32) -> f64 {
        let idx = rank.saturating_sub(1) as usize;
        match slot {
            AbilitySlot::Q => self.cooldowns.q[idx.min(4)],
            AbilitySlot::W => self.cooldowns.w[idx.min(4)],
            AbilitySlot::E => self.cooldowns.e[idx.min(4)],
            AbilitySlot::R => self.cooldowns.r[idx.min(2)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Closed summoner spell enumeration with fixed cooldowns.
pub enum SummonerSpell {
    Flash,
    Ignite,
    Teleport,
    Barrier,
    Exhaust,
    Cleanse,
}

impl SummonerSpell {
    pub fn cooldown(self) -> f64 {
        match self {
            SummonerSpell::Flash => 300.0,
            SummonerSpell::Ignite => 180.0,
            SummonerSpell::Teleport => 360.0,
            SummonerSpell::Barrier => 180.0,
            SummonerSpell::Exhaust => 210.0,
            SummonerSpell::Cleanse => 210.0,
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "flash" => Ok(SummonerSpell::Flash),
            "ignite" => Ok(SummonerSpell::Ignite),
            "teleport" => Ok(SummonerSpell::Teleport),
            "barrier" => Ok(SummonerSpell::Barrier),
            "exhaust" => Ok(SummonerSpell::Exhaust),
            "cleanse" => Ok(SummonerSpell::Cleanse),
            other => Err(ValidationError::UnknownValue {
                field: "summoner_spell",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    champions: Vec<ChampionProfile>,
}

/// Process-wide read-only roster, parsed once at first use. Concurrent
/// readers need no locking; the table is never mutated after load.
static ROSTER: Lazy<HashMap<String, ChampionProfile>> = Lazy::new(|| {
    let file: RosterFile =
        serde_yaml::from_str(CHAMPION_TABLE_YAML).expect("embedded champion table must parse");
    file.champions
        .into_iter()
        .map(|c| (c.id.as_str().to_string(), c))
        .collect()
});

/// Look up a champion's static profile, `None` when the id is unknown.
pub fn champion(id: &ChampionId) -> Option<&'static ChampionProfile> {
    ROSTER.get(id.as_str())
}

/// Number of champions in the static roster.
pub fn roster_size() -> usize {
    ROSTER.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_parses_and_contains_known_champions() {
        assert!(roster_size() >= 10);
        let ahri = champion(&ChampionId::from("Ahri")).expect("Ahri is in the roster");
        assert_eq!(ahri.resource, ResourceType::Mana);
    }

    #[test]
    fn unknown_champion_fails_resolution() {
        let err = ChampionId::from("NotAChampion").resolve().unwrap_err();
        assert!(matches!(err, ValidationError::UnknownChampion { .. }));
    }

    #[test]
    fn stats_grow_linearly_with_level() {
        let ahri = champion(&ChampionId::from("Ahri")).expect("Ahri exists");
        let hp1 = ahri.stat_at_level(BaseStat::Hp, 1);
        let hp18 = ahri.stat_at_level(BaseStat::Hp, 18);
        assert_eq!(hp1, ahri.base.hp);
        assert!(hp18 > hp1);
        // Levels outside [1, 18] clamp rather than extrapolate.
        assert_eq!(ahri.stat_at_level(BaseStat::Hp, 40), hp18);
    }

    #[test]
    fn ultimate_cooldown_uses_three_rank_table() {
        let syndra = champion(&ChampionId::from("Syndra")).expect("Syndra exists");
        assert_eq!(syndra.ability_cooldown(AbilitySlot::R, 1), 100.0);
        assert_eq!(syndra.ability_cooldown(AbilitySlot::R, 3), 80.0);
        assert_eq!(syndra.ability_cooldown(AbilitySlot::R, 9), 80.0);
    }

    #[test]
    fn xp_table_is_monotonic() {
        for level in 2..=18 {
            assert!(XP_TO_LEVEL[level] > XP_TO_LEVEL[level - 1]);
        }
    }

    #[test]
    fn summoner_spell_parsing_rejects_unknown_values() {
        assert_eq!(SummonerSpell::parse("ignite").unwrap(), SummonerSpell::Ignite);
        let err = SummonerSpell::parse("revive").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownValue { .. }));
    }
}
