//! Per-champion minute narration. Every row pairs what the champion did
//! this minute with a templated explanation of why.

use rift_core::{Phase, Role, Side};

use crate::result::ChampionMinuteReport;
use crate::sim::{Happening, KillContext, ObjectiveKind, PlayerRef};
use crate::state::{Ability, MatchState, Player};

/// Why this skill point was invested now.
fn skill_reason(role: Role, ability: Ability, phase: Phase) -> &'static str {
    if ability == Ability::R {
        return "Prioritized ultimate spike for all-in and objective fight threat.";
    }
    if role == Role::Jungle && ability == Ability::Q {
        return "Leveled main clear/burst tool to speed camps and improve gank damage.";
    }
    if matches!(role, Role::Top | Role::Mid | Role::Adc) && ability == Ability::Q {
        return "Maxed primary trading spell for stronger lane pressure.";
    }
    if role == Role::Support && matches!(ability, Ability::W | Ability::E) {
        return "Invested in utility to improve peel/engage windows.";
    }
    match phase {
        Phase::Early => "Added early skirmish value to contest lane priority.",
        Phase::Mid => "Shifted skill points into teamfight reliability.",
        Phase::Late => "Rounded build for late-game reliability and DPS uptime.",
    }
}

/// Abstract combo-style explanation for a kill.
fn combo_reason(role: Role, context: KillContext) -> &'static str {
    match context {
        KillContext::Gank => {
            "Used lane angle + CC chain to force a short burst combo before escape tools reset."
        }
        KillContext::CounterGank => {
            "Punished overcommit and flipped the play with faster target focus."
        }
        KillContext::LaneOutplay => {
            "Won cooldown trade timing and converted HP advantage into an all-in."
        }
        KillContext::LaneFight => {
            "Landed a clean trading pattern and finished in the minion/level window."
        }
        KillContext::TeamFight => match role {
            Role::Support => {
                "Committed engage/peel timing around priority carries in the 5v5."
            }
            Role::Adc => "Played front-to-back spacing and converted sustained DPS safely.",
            Role::Jungle => {
                "Entered after key cooldowns, then bursted target line with reset tempo."
            }
            _ => "Found a priority angle in the skirmish and chained damage during CC uptime.",
        },
    }
}

fn macro_default_action(player: &Player) -> (&'static str, &'static str) {
    if !player.alive {
        return (
            "Respawning",
            "Death timer window; next spawn is used to plan next setup and objective path.",
        );
    }
    match player.role {
        Role::Jungle => (
            "Full clear + lane hover",
            "Maintained camp tempo while tracking lane states for next gank path.",
        ),
        Role::Support => (
            "Vision + escort duty",
            "Controlled river entrances and shadowed carries for counter-engage.",
        ),
        _ => (
            "Wave control + farming",
            "Held lane tempo for XP/CS while waiting for a high-value trade window.",
        ),
    }
}

/// Build one minute row for a single champion from the events of that tick.
pub(crate) fn build_minute_report(
    state: &MatchState,
    who: PlayerRef,
    minute_events: &[Happening],
    learned: &[Ability],
) -> ChampionMinuteReport {
    let player = &state.team(who.0).players[who.1];
    let side = who.0;
    let mut actions: Vec<String> = Vec::new();
    let mut reasons: Vec<&'static str> = Vec::new();

    if !learned.is_empty() {
        let joined: Vec<&str> = learned.iter().map(|a| a.letter()).collect();
        actions.push(format!("Skilled up {}", joined.join("/")));
        for ability in learned {
            reasons.push(skill_reason(player.role, *ability, state.phase()));
        }
    }

    for event in minute_events {
        match *event {
            Happening::Kill {
                killer,
                victim,
                context,
                ..
            } => {
                if killer == who {
                    actions.push(format!("Secured kill ({})", context.as_str()));
                    reasons.push(combo_reason(player.role, context));
                } else if victim == who {
                    actions.push(format!("Died in {}", context.as_str()));
                    reasons.push("Was caught during enemy timing window and lost tempo.");
                }
            }
            Happening::FlashBurned { target } => {
                if target == who {
                    actions.push("Burned Flash defensively".to_string());
                    reasons.push("Traded summoner spell to deny kill conversion.");
                }
            }
            Happening::Objective { side: team, kind } => {
                if team == side && player.alive {
                    actions.push(format!("Rotated for {}", kind.as_str()));
                    reasons.push(match kind {
                        ObjectiveKind::Dragon => {
                            "Played objective tempo for stacking map win conditions."
                        }
                        ObjectiveKind::Baron => {
                            "Converted pressure into Baron control to force map collapse."
                        }
                        ObjectiveKind::Tower => {
                            "Converted lane pressure into structural gold and map space."
                        }
                    });
                }
            }
            Happening::ComebackGold { side: team, .. } => {
                if team == side {
                    actions.push("Collected comeback bounty gold".to_string());
                    reasons.push("Objective bounty reduced deficit and reopened fight options.");
                }
            }
            Happening::TeamFight { winner, .. } => {
                if player.alive {
                    if winner == side {
                        actions.push("Won teamfight".to_string());
                        reasons.push(
                            "Execution and target focus were cleaner in the engage window.",
                        );
                    } else {
                        actions.push("Lost teamfight".to_string());
                        reasons.push("Fight setup was weaker; conceded tempo and map access.");
                    }
                }
            }
        }
    }

    if actions.is_empty() {
        let (action, reason) = macro_default_action(player);
        actions.push(action.to_string());
        reasons.push(reason);
    }

    let gold_advantage = state.gold_advantage_for(side);
    if gold_advantage >= 2500.0 {
        reasons.push("Played lead-preserving tempo with safer objective setups.");
    } else if gold_advantage <= -2500.0 {
        reasons.push("Stayed on comeback script: lower-risk farm and selective fights.");
    } else {
        reasons.push("Game state was close; balanced farm, vision, and skirmish readiness.");
    }

    ChampionMinuteReport {
        minute: (state.game_time / 60.0) as u32,
        action: actions.join(" | "),
        reasoning: reasons.join(" "),
        level: player.level,
        kda: player.kda(),
        gold: (player.gold * 10.0).round() / 10.0,
        cs: player.cs,
    }
}

/// Side-qualified label used to key `champion_reports`, stable across
/// mirror drafts.
pub(crate) fn report_label(side: Side, player: &Player) -> String {
    let side_tag = match side {
        Side::Blue => "BLUE",
        Side::Red => "RED",
    };
    format!(
        "{} {} ({})",
        side_tag,
        player.champion.as_str(),
        player.role.as_str()
    )
}
