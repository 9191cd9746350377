use std::fmt;

use serde::{Deserialize, Serialize};

use crate::champion::ChampionId;
use crate::error::ValidationError;

pub const DRAFT_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Closed lane role enumeration. A draft assigns each role exactly once.
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Top => "top",
            Role::Jungle => "jungle",
            Role::Mid => "mid",
            Role::Adc => "adc",
            Role::Support => "support",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "top" => Ok(Role::Top),
            "jungle" => Ok(Role::Jungle),
            "mid" => Ok(Role::Mid),
            "adc" => Ok(Role::Adc),
            "support" => Ok(Role::Support),
            other => Err(ValidationError::UnknownValue {
                field: "role",
                value: other.to_string(),
            }),
        }
    }

    /// Average creep score per minute for this role.
    pub fn cs_per_min(self) -> f64 {
        match self {
            Role::Top => 7.0,
            Role::Jungle => 5.0,
            Role::Mid => 7.5,
            Role::Adc => 8.0,
            Role::Support => 1.2,
        }
    }

    /// Average gold per creep for this role.
    pub fn gold_per_cs(self) -> f64 {
        match self {
            Role::Top | Role::Mid => 20.0,
            Role::Jungle => 18.0,
            Role::Adc => 22.0,
            Role::Support => 10.0,
        }
    }

    /// Average XP income per minute for this role.
    pub fn xp_per_min(self) -> f64 {
        match self {
            Role::Top => 450.0,
            Role::Jungle => 420.0,
            Role::Mid => 480.0,
            Role::Adc => 400.0,
            Role::Support => 320.0,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Blue => "blue",
            Side::Red => "red",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One champion pick with its assigned role.
pub struct Pick {
    pub champion: ChampionId,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Exactly five picks with pairwise-distinct roles.
pub struct Draft {
    pub picks: Vec<Pick>,
}

impl Draft {
    pub fn new(picks: Vec<Pick>) -> Self {
        Draft { picks }
    }

    /// Validate pick count, role uniqueness, and champion existence.
    /// `side` only labels the error message.
    pub fn validate(&self, side: Side) -> Result<(), ValidationError> {
        if self.picks.len() != DRAFT_SIZE {
            return Err(ValidationError::WrongPickCount {
                side: side.to_string(),
                count: self.picks.len(),
            });
        }

        let mut seen: Vec<Role> = Vec::with_capacity(DRAFT_SIZE);
        for pick in &self.picks {
            if seen.contains(&pick.role) {
                return Err(ValidationError::DuplicateRole {
                    side: side.to_string(),
                    role: pick.role.to_string(),
                });
            }
            seen.push(pick.role);
            pick.champion.resolve()?;
        }

        Ok(())
    }

    pub fn pick_for_role(&self, role: Role) -> Option<&Pick> {
        self.picks.iter().find(|p| p.role == role)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A complete simulation request: two five-pick drafts plus the seed that
/// fixes every pseudorandom draw. Identical requests produce byte-identical
/// results.
pub struct MatchRequest {
    pub blue_team_id: String,
    pub red_team_id: String,
    pub blue: Draft,
    pub red: Draft,
    pub seed: u64,
}

impl MatchRequest {
    /// Validate both drafts. No simulation work happens on failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.blue.validate(Side::Blue)?;
        self.red.validate(Side::Red)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(champion: &str, role: Role) -> Pick {
        Pick {
            champion: ChampionId::from(champion),
            role,
        }
    }

    fn full_draft() -> Draft {
        Draft::new(vec![
            pick("Renekton", Role::Top),
            pick("LeeSin", Role::Jungle),
            pick("Ahri", Role::Mid),
            pick("Jinx", Role::Adc),
            pick("Thresh", Role::Support),
        ])
    }

    #[test]
    fn complete_draft_validates() {
        full_draft().validate(Side::Blue).expect("draft is valid");
    }

    #[test]
    fn short_draft_is_rejected() {
        let mut draft = full_draft();
        draft.picks.pop();
        let err = draft.validate(Side::Blue).unwrap_err();
        assert!(matches!(err, ValidationError::WrongPickCount { count: 4, .. }));
    }

    #[test]
    fn six_picks_are_rejected() {
        let mut draft = full_draft();
        draft.picks.push(pick("Orianna", Role::Mid));
        let err = draft.validate(Side::Red).unwrap_err();
        assert!(matches!(err, ValidationError::WrongPickCount { count: 6, .. }));
    }

    #[test]
    fn duplicate_role_is_rejected() {
        let mut draft = full_draft();
        draft.picks[4] = pick("Nautilus", Role::Mid);
        let err = draft.validate(Side::Blue).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateRole { .. }));
    }

    #[test]
    fn unknown_champion_is_rejected() {
        let mut draft = full_draft();
        draft.picks[2] = pick("Teemo", Role::Mid);
        let err = draft.validate(Side::Blue).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownChampion { .. }));
    }

    #[test]
    fn role_parsing_rejects_unknown_values() {
        assert_eq!(Role::parse("jungle").unwrap(), Role::Jungle);
        assert!(Role::parse("feeder").is_err());
    }
}
