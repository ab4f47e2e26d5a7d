//! Turn narration text.
//!
//! The original service delegated narration to an external language model;
//! that collaborator stays outside this crate, so narration here is produced
//! from deterministic templates keyed by the requested [`NoteStyle`].

use crate::battle::resolver::AttackOutcome;
use crate::encounter::MonsterTemplate;
use schema::{BattleResultKind, NoteStyle, Side};

/// Narrates a single resolved attack.
pub fn narrate_attack(
    style: NoteStyle,
    turn_number: u32,
    actor_name: &str,
    target_name: &str,
    outcome: &AttackOutcome,
) -> String {
    let crit = if outcome.was_critical {
        " Critical hit!"
    } else {
        ""
    };
    let body = match style {
        NoteStyle::Comic => format!(
            "{} smacks {} for {} damage!{}",
            actor_name, target_name, outcome.damage, crit
        ),
        NoteStyle::Epic => format!(
            "{} strikes {} with a mighty blow, dealing {} damage.{}",
            actor_name, target_name, outcome.damage, crit
        ),
        NoteStyle::Somber => format!(
            "{} wounds {} for {} damage.{}",
            actor_name, target_name, outcome.damage, crit
        ),
    };
    format!(
        "Turn {}: {} (player HP: {}, enemy HP: {})",
        turn_number, body, outcome.player_hp, outcome.enemy_hp
    )
}

/// Opening line for a PvE encounter.
pub fn narrate_encounter(style: NoteStyle, monster: &MonsterTemplate) -> String {
    let stats = format!(
        "HP:{}, ATK:{}, DEF:{}, SPD:{}, CRIT:{}",
        monster.hp, monster.attack, monster.defense, monster.speed, monster.critical_rate_permille
    );
    match style {
        NoteStyle::Comic => format!("A wild {} ({}) jumps out!", monster.name, stats),
        NoteStyle::Epic => format!("{} ({}) bars the path ahead!", monster.name, stats),
        NoteStyle::Somber => format!("{} ({}) emerges from the gloom.", monster.name, stats),
    }
}

/// Opening line for a PvP battle.
pub fn narrate_versus(player_name: &str, enemy_name: &str) -> String {
    format!("{} challenges {}! The duel begins.", player_name, enemy_name)
}

/// Closing line once a battle reaches a terminal state.
pub fn narrate_result(style: NoteStyle, result: BattleResultKind) -> String {
    match (style, result) {
        (NoteStyle::Comic, BattleResultKind::Win) => "Victory! That went well.".to_string(),
        (NoteStyle::Comic, BattleResultKind::Lose) => {
            "Defeat... better luck next time!".to_string()
        }
        (NoteStyle::Comic, BattleResultKind::Draw) => {
            "Both sides collapse from exhaustion. A draw!".to_string()
        }
        (_, BattleResultKind::Win) => "Victory is yours.".to_string(),
        (_, BattleResultKind::Lose) => "You have been defeated.".to_string(),
        (_, BattleResultKind::Draw) => "Neither side prevails. A draw.".to_string(),
    }
}
