//! Drives one turn of an owned [`BattleSession`] through the resolution
//! algorithm, appending records and advancing the phase machine.

use crate::battle::narrator;
use crate::battle::resolver::{resolve_turn_math, TurnReport};
use crate::battle::state::{BattlePhase, BattleSession, TurnRecord, TurnRng};
use crate::config::BattleConfig;
use crate::errors::{BattleError, BattleResult};
use schema::{BattleCommand, Side};

/// Resolves one full turn of combat on the session.
///
/// Both sides act in speed order with the unified damage formula; the
/// submitted commands are recorded and narrated per attack. A session in a
/// terminal phase is rejected with `BattleAlreadyOver` without mutation.
/// Reaching the configured turn cap without a knockout forces a draw.
pub fn resolve_turn(
    session: &mut BattleSession,
    player_command: BattleCommand,
    enemy_command: BattleCommand,
    rng: &mut TurnRng,
    config: &BattleConfig,
) -> BattleResult<TurnReport> {
    if session.is_over() {
        return Err(BattleError::BattleAlreadyOver(session.battle_id));
    }
    if session.phase == BattlePhase::Created {
        session.phase = BattlePhase::InProgress;
    }

    let report = resolve_turn_math(
        &session.player.snapshot(),
        &session.enemy.snapshot(),
        session.turn_number,
        rng,
        config,
    );

    for attack in &report.attacks {
        let (actor_name, target_name, action) = match attack.actor {
            Side::Player => (
                session.player.name.clone(),
                session.enemy.name.clone(),
                player_command,
            ),
            Side::Enemy => (
                session.enemy.name.clone(),
                session.player.name.clone(),
                enemy_command,
            ),
        };
        let narration = narrator::narrate_attack(
            session.note_style,
            report.turn_number,
            &actor_name,
            &target_name,
            attack,
        );
        let resulting_hp = match attack.actor {
            Side::Player => attack.enemy_hp,
            Side::Enemy => attack.player_hp,
        };

        session.records.push(TurnRecord {
            battle_id: session.battle_id,
            turn_number: report.turn_number,
            actor_side: attack.actor,
            action,
            damage_dealt: attack.damage,
            was_critical: attack.was_critical,
            resulting_hp,
            narration: narration.clone(),
        });
        session.transcript.push(narration);

        session.player.hp = attack.player_hp;
        session.enemy.hp = attack.enemy_hp;
    }

    session.last_enemy_command = Some(enemy_command);

    match report.winner {
        Some(Side::Player) => session.phase = BattlePhase::Win,
        Some(Side::Enemy) => session.phase = BattlePhase::Lose,
        None => {
            if session.turn_number >= config.max_turns {
                // Turn cap reached with both sides standing: forced draw
                // instead of an unbounded loop.
                session.phase = BattlePhase::Draw;
            } else {
                session.turn_number += 1;
            }
        }
    }

    if let Some(result) = session.phase.result() {
        session
            .transcript
            .push(narrator::narrate_result(session.note_style, result));
    }

    session.touch();
    Ok(report)
}
