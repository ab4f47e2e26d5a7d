//! The PvE realtime session driver.
//!
//! One connection task owns one [`BattleSession`] and streams every resolved
//! attack over its channel at a fixed pace until the battle ends, then
//! persists the terminal record. The outbound channel is abstracted behind
//! [`TurnSink`] so the whole driver is testable without a socket; the server
//! adapts a WebSocket onto it. A sink failure means the client is gone: the
//! session is abandoned on the spot and nothing is persisted.

use crate::archive::{archive_with_retry, BattleLog};
use crate::battle::engine;
use crate::battle::narrator;
use crate::battle::state::{BattleSession, TurnRng};
use crate::combatant::Combatant;
use crate::context::BattleDeps;
use crate::encounter::EncounterRates;
use crate::errors::{BattleError, BattleResult};
use schema::{BattleCommand, BattleMode, BattleResultKind, EncounterRequest, NoteStyle,
    PveServerMessage};
use std::future::Future;
use std::str::FromStr;
use std::time::SystemTime;
use tracing::{debug, info};

/// The client side of the channel went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkClosed;

/// Outbound half of the realtime channel.
pub trait TurnSink {
    fn deliver(
        &mut self,
        message: &PveServerMessage,
    ) -> impl Future<Output = Result<(), SinkClosed>> + Send;
}

/// Structural validation of the first client frame. Nothing is mutated on
/// failure; the caller reports the error over the channel and keeps it open.
pub fn validate_request(request: &EncounterRequest) -> BattleResult<NoteStyle> {
    if request.character_id <= 0 {
        return Err(BattleError::InvalidRequest(
            "characterId must be a positive integer".to_string(),
        ));
    }
    if request.map_id <= 0 {
        return Err(BattleError::InvalidRequest(
            "mapId must be a positive integer".to_string(),
        ));
    }
    match &request.note_style {
        None => Ok(NoteStyle::default()),
        Some(raw) => NoteStyle::from_str(raw)
            .map_err(|_| BattleError::InvalidRequest(format!("unknown note style '{}'", raw))),
    }
}

/// Runs one full PvE encounter over the sink.
///
/// Returns `Err` only for failures that precede the battle (validation,
/// lookups); those are the caller's to report. Once the encounter message is
/// out, the driver resolves turns autonomously: a closed sink abandons the
/// session silently, a finished battle is archived and counted for quests.
pub async fn drive_encounter<S: TurnSink>(
    sink: &mut S,
    request: &EncounterRequest,
    deps: &BattleDeps,
    mut rng: TurnRng,
) -> BattleResult<()> {
    let style = validate_request(request)?;
    let character = deps.characters.character_by_id(request.character_id)?;

    let rates = EncounterRates::new(deps.config.normal_rate_permille);
    let kind = rates.roll_kind(&mut rng);
    let monster = deps.monsters.random_by_kind(kind)?;

    let mut session = BattleSession::new(
        BattleMode::Pve,
        character.user_id.clone(),
        None,
        character.character_id,
        monster.monster_id,
        Combatant::from_character(&character),
        Combatant::from_monster(&monster),
        style,
    );
    info!(
        battle_id = %session.battle_id,
        user_id = %session.user_id,
        map_id = request.map_id,
        monster = %monster.name,
        seed = rng.seed(),
        "pve encounter started"
    );

    let encounter_message = PveServerMessage::Encounter {
        monster_id: monster.monster_id,
        monster_name: monster.name.clone(),
        monster_kind: monster.kind,
        monster_hp: monster.hp,
        monster_attack: monster.attack,
        monster_defense: monster.defense,
        monster_speed: monster.speed,
        monster_critical_rate: monster.critical_rate_permille,
        image_ref: monster.image_ref.clone(),
    };
    if sink.deliver(&encounter_message).await.is_err() {
        debug!(battle_id = %session.battle_id, "channel closed before first turn; abandoned");
        return Ok(());
    }
    session
        .transcript
        .push(narrator::narrate_encounter(style, &monster));

    loop {
        let before = session.records.len();
        let report = engine::resolve_turn(
            &mut session,
            BattleCommand::Attack,
            BattleCommand::Attack,
            &mut rng,
            &deps.config,
        )?;

        for (attack, record) in report.attacks.iter().zip(&session.records[before..]) {
            let message = PveServerMessage::Turn {
                turn_number: record.turn_number,
                actor_side: record.actor_side,
                damage: record.damage_dealt,
                was_critical: record.was_critical,
                narration: record.narration.clone(),
                player_hp: attack.player_hp,
                enemy_hp: attack.enemy_hp,
            };
            if sink.deliver(&message).await.is_err() {
                info!(
                    battle_id = %session.battle_id,
                    turn = record.turn_number,
                    "channel closed mid-battle; session abandoned, nothing persisted"
                );
                return Ok(());
            }
        }

        if session.is_over() {
            break;
        }
        tokio::time::sleep(deps.config.turn_pace).await;
    }

    let result = session
        .phase
        .result()
        .unwrap_or(BattleResultKind::Draw);
    // The battle is complete at this point; a failed final frame no longer
    // abandons the result.
    let _ = sink
        .deliver(&PveServerMessage::End {
            result,
            battle_id: session.battle_id,
        })
        .await;

    let log = BattleLog {
        battle_id: session.battle_id,
        character_id: session.player_character_id,
        opponent_ref: session.opponent_ref,
        mode: BattleMode::Pve,
        result,
        turn_count: session.turn_number,
        started_at: session.started_at,
        ended_at: SystemTime::now(),
    };
    archive_with_retry(
        deps.archive.as_ref(),
        &log,
        &session.records,
        deps.config.archive_attempts,
    );
    deps.quests
        .battle_completed(&session.user_id, BattleMode::Pve);
    info!(battle_id = %session.battle_id, %result, "pve encounter finished");

    Ok(())
}
