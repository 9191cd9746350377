//! Internal mutable match state for the minute-tick simulator. Nothing in
//! this module escapes the simulation call; the public result types live in
//! `result`.

use rift_core::{
    BaseStat, ChampionId, ChampionProfile, MAX_LEVEL, Phase, Role, Side, XP_TO_LEVEL,
};

use crate::error::SimError;

pub(crate) const TOWERS_PER_TEAM: u32 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragonType {
    Infernal,
    Mountain,
    Ocean,
    Cloud,
    Hextech,
    Chemtech,
}

impl DragonType {
    pub(crate) const SPAWN_POOL: [DragonType; 6] = [
        DragonType::Infernal,
        DragonType::Mountain,
        DragonType::Ocean,
        DragonType::Cloud,
        DragonType::Hextech,
        DragonType::Chemtech,
    ];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            DragonType::Infernal => "infernal",
            DragonType::Mountain => "mountain",
            DragonType::Ocean => "ocean",
            DragonType::Cloud => "cloud",
            DragonType::Hextech => "hextech",
            DragonType::Chemtech => "chemtech",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ability {
    Q,
    W,
    E,
    R,
}

impl Ability {
    pub(crate) fn letter(self) -> &'static str {
        match self {
            Ability::Q => "Q",
            Ability::W => "W",
            Ability::E => "E",
            Ability::R => "R",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Player {
    pub champion: ChampionId,
    pub profile: &'static ChampionProfile,
    pub role: Role,
    pub side: Side,

    pub level: u32,
    pub gold: f64,
    pub cs: u32,
    pub xp: f64,

    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,

    /// Points invested per ability, Q/W/E/R order.
    pub skill_points: [u32; 4],
    pub skill_history: Vec<Ability>,

    pub alive: bool,
    pub respawn_at: f64,

    pub flash_cd: f64,
    pub tp_cd: f64,

    /// Effective power rating, refreshed every tick from level stats + gold.
    pub combat_power: f64,
}

impl Player {
    pub(crate) fn from_pick(
        champion: ChampionId,
        role: Role,
        side: Side,
    ) -> Result<Self, SimError> {
        let profile = champion.resolve()?;
        Ok(Player {
            champion,
            profile,
            role,
            side,
            level: 1,
            gold: 500.0,
            cs: 0,
            xp: 0.0,
            kills: 0,
            deaths: 0,
            assists: 0,
            skill_points: [0; 4],
            skill_history: Vec::new(),
            alive: true,
            respawn_at: 0.0,
            flash_cd: 0.0,
            tp_cd: 0.0,
            combat_power: 100.0,
        })
    }

    pub(crate) fn is_flash_up(&self) -> bool {
        self.flash_cd <= 0.0
    }

    pub(crate) fn kda(&self) -> String {
        format!("{}/{}/{}", self.kills, self.deaths, self.assists)
    }

    /// Allocate the next skill point: ultimate at 6/11/16, then Q > W > E.
    pub(crate) fn allocate_skill(&mut self) -> Ability {
        let ability = if matches!(self.level, 6 | 11 | 16) && self.skill_points[3] < 3 {
            self.skill_points[3] += 1;
            Ability::R
        } else if self.skill_points[0] < 5 {
            self.skill_points[0] += 1;
            Ability::Q
        } else if self.skill_points[1] < 5 {
            self.skill_points[1] += 1;
            Ability::W
        } else {
            self.skill_points[2] = (self.skill_points[2] + 1).min(5);
            Ability::E
        };
        self.skill_history.push(ability);
        ability
    }

    /// Refresh the effective power rating: effective HP scaled by
    /// resistances, auto-attack DPS, and a gold-as-items factor.
    pub(crate) fn refresh_combat_power(&mut self) {
        let ad = self.profile.stat_at_level(BaseStat::AttackDamage, self.level);
        let hp = self.profile.stat_at_level(BaseStat::Hp, self.level);
        let armor = self.profile.stat_at_level(BaseStat::Armor, self.level);
        let mr = self.profile.stat_at_level(BaseStat::MagicResist, self.level);
        let attack_speed = self.profile.stat_at_level(BaseStat::AttackSpeed, self.level);

        let effective_hp = hp * (1.0 + armor / 100.0) * (1.0 + mr / 100.0);
        let auto_dps = ad * attack_speed;
        let base_power = effective_hp / 50.0 + auto_dps * 3.0;
        let gold_bonus = self.gold / 400.0;
        self.combat_power = base_power + gold_bonus;
    }

    /// Grant XP and apply any level-ups, returning the abilities learned.
    pub(crate) fn gain_xp(&mut self, amount: f64) -> Vec<Ability> {
        self.xp += amount;
        let mut learned = Vec::new();
        while self.level < MAX_LEVEL && self.xp >= XP_TO_LEVEL[(self.level + 1) as usize] {
            self.level += 1;
            learned.push(self.allocate_skill());
        }
        learned
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Team {
    pub team_id: String,
    pub side: Side,
    pub players: Vec<Player>,

    pub towers_standing: u32,
    pub dragons_taken: Vec<DragonType>,
    pub dragon_soul: Option<DragonType>,
    pub barons_taken: u32,
    pub baron_buff_active: bool,
    pub baron_buff_expires: f64,
}

impl Team {
    pub(crate) fn new(team_id: String, side: Side, players: Vec<Player>) -> Self {
        Team {
            team_id,
            side,
            players,
            towers_standing: TOWERS_PER_TEAM,
            dragons_taken: Vec::new(),
            dragon_soul: None,
            barons_taken: 0,
            baron_buff_active: false,
            baron_buff_expires: 0.0,
        }
    }

    pub(crate) fn total_gold(&self) -> f64 {
        self.players.iter().map(|p| p.gold).sum()
    }

    pub(crate) fn total_kills(&self) -> u32 {
        self.players.iter().map(|p| p.kills).sum()
    }

    pub(crate) fn total_deaths(&self) -> u32 {
        self.players.iter().map(|p| p.deaths).sum()
    }

    pub(crate) fn total_assists(&self) -> u32 {
        self.players.iter().map(|p| p.assists).sum()
    }

    pub(crate) fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    pub(crate) fn player_index_by_role(&self, role: Role) -> Option<usize> {
        self.players.iter().position(|p| p.role == role)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MatchState {
    pub blue: Team,
    pub red: Team,

    pub game_time: f64,
    pub concluded: bool,

    pub next_dragon_spawn: f64,
    pub next_baron_spawn: f64,
    pub soul_point: usize,

    /// Consecutive ticks each side has held a tower-threat advantage.
    /// Towers only fall after the streak reaches the sustain requirement.
    pub tower_pressure_blue: u32,
    pub tower_pressure_red: u32,

    /// Running sum of the per-tick advantage signal and the tick count,
    /// forming the time-integrated win-probability signal.
    pub advantage_sum: f64,
    pub advantage_ticks: u32,
    /// Consecutive ticks the advantage signal exceeded the closing bound.
    pub closing_streak: u32,
}

impl MatchState {
    pub(crate) fn new(blue: Team, red: Team) -> Self {
        MatchState {
            blue,
            red,
            game_time: 0.0,
            concluded: false,
            next_dragon_spawn: 300.0,
            next_baron_spawn: 1200.0,
            soul_point: 4,
            tower_pressure_blue: 0,
            tower_pressure_red: 0,
            advantage_sum: 0.0,
            advantage_ticks: 0,
            closing_streak: 0,
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        Phase::from_game_time(self.game_time)
    }

    pub(crate) fn gold_diff(&self) -> f64 {
        self.blue.total_gold() - self.red.total_gold()
    }

    pub(crate) fn gold_advantage_for(&self, side: Side) -> f64 {
        match side {
            Side::Blue => self.gold_diff(),
            Side::Red => -self.gold_diff(),
        }
    }

    pub(crate) fn team(&self, side: Side) -> &Team {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }

    pub(crate) fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Blue => &mut self.blue,
            Side::Red => &mut self.red,
        }
    }

    /// Instantaneous advantage signal in (-1, 1), positive favoring blue.
    /// Blends gold, kill, tower, and dragon differentials.
    pub(crate) fn advantage_signal(&self) -> f64 {
        let gold_diff = self.gold_diff();
        let kill_diff = self.blue.total_kills() as f64 - self.red.total_kills() as f64;
        let tower_diff =
            self.blue.towers_standing as f64 - self.red.towers_standing as f64;
        let dragon_diff =
            self.blue.dragons_taken.len() as f64 - self.red.dragons_taken.len() as f64;

        let score = (gold_diff / 4500.0) * 0.60
            + (kill_diff / 16.0) * 0.25
            + (tower_diff / 5.0) * 0.28
            + (dragon_diff / 3.0) * 0.18;
        score.tanh()
    }

    /// Time-integrated advantage over the match so far.
    pub(crate) fn integrated_advantage(&self) -> f64 {
        if self.advantage_ticks == 0 {
            0.0
        } else {
            self.advantage_sum / self.advantage_ticks as f64
        }
    }
}
