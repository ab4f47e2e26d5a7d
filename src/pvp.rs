//! The PvP battle coordinator.
//!
//! PvP battles are request/response: the client starts a battle against a
//! matched opponent's character and then submits one command per turn. Every
//! live session sits in a keyed table; turn submissions for the same battle
//! serialize on a per-battle lock, while different battles never contend.
//! The opponent's side is played by a [`Behavior`] since the opposing user is
//! not connected for the exchange.

use crate::archive::{archive_with_retry, BattleLog, ResultNote};
use crate::battle::ai::{Behavior, RandomCommand};
use crate::battle::engine;
use crate::battle::narrator;
use crate::battle::state::{BattleSession, TurnRng};
use crate::combatant::Combatant;
use crate::context::BattleDeps;
use crate::errors::{BattleError, BattleResult};
use dashmap::DashMap;
use schema::{BattleCommand, BattleMode, BattleView, NoteStyle, StartBattleResponse};
use std::str::FromStr;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

struct PvpEntry {
    session: BattleSession,
    rng: TurnRng,
    archived: bool,
}

/// Owns every active PvP session. Cheap to share behind an [`Arc`]; all
/// methods take `&self`.
pub struct PvpCoordinator {
    battles: DashMap<Uuid, Arc<Mutex<PvpEntry>>>,
    deps: Arc<BattleDeps>,
    behavior: Box<dyn Behavior>,
}

impl PvpCoordinator {
    pub fn new(deps: Arc<BattleDeps>) -> Self {
        Self::with_behavior(deps, Box::new(RandomCommand))
    }

    pub fn with_behavior(deps: Arc<BattleDeps>, behavior: Box<dyn Behavior>) -> Self {
        Self {
            battles: DashMap::new(),
            deps,
            behavior,
        }
    }

    /// Creates a session between two characters and registers it in the
    /// table. The response carries the opening narration; no turn has
    /// resolved yet.
    pub fn start_battle(
        &self,
        my_character_id: i64,
        enemy_character_id: i64,
    ) -> BattleResult<StartBattleResponse> {
        let mine = self.deps.characters.character_by_id(my_character_id)?;
        let theirs = self.deps.characters.character_by_id(enemy_character_id)?;
        if mine.user_id == theirs.user_id {
            return Err(BattleError::InvalidRequest(
                "cannot battle your own character".to_string(),
            ));
        }

        let mut session = BattleSession::new(
            BattleMode::Pvp,
            mine.user_id.clone(),
            Some(theirs.user_id.clone()),
            mine.character_id,
            theirs.character_id,
            Combatant::from_character(&mine),
            Combatant::from_character(&theirs),
            NoteStyle::default(),
        );
        session.transcript.push(narrator::narrate_versus(
            &session.player.name,
            &session.enemy.name,
        ));

        let rng = TurnRng::new_random();
        info!(
            battle_id = %session.battle_id,
            user_id = %session.user_id,
            opponent = %theirs.user_id,
            seed = rng.seed(),
            "pvp battle started"
        );
        let response = StartBattleResponse {
            battle_id: session.battle_id,
            log: session.transcript.clone(),
        };
        self.battles.insert(
            session.battle_id,
            Arc::new(Mutex::new(PvpEntry {
                session,
                rng,
                archived: false,
            })),
        );
        Ok(response)
    }

    /// Submits one command for the player side and resolves the turn against
    /// the behavior-driven opponent. Submitting against a finished battle is
    /// not an error: the frozen view comes back unchanged, with no enemy
    /// command.
    pub async fn process_turn(&self, battle_id: Uuid, raw_command: &str) -> BattleResult<BattleView> {
        let command = BattleCommand::from_str(raw_command)
            .map_err(|_| BattleError::InvalidRequest(format!("unknown command '{}'", raw_command)))?;

        let entry = self
            .battles
            .get(&battle_id)
            .map(|guard| Arc::clone(guard.value()))
            .ok_or(BattleError::BattleNotFound(battle_id))?;
        // The dashmap guard is gone; only the per-battle lock is held across
        // the resolution.
        let mut entry = entry.lock().await;

        if entry.session.is_over() {
            debug!(%battle_id, "turn submitted against finished battle; frozen view");
            return Ok(frozen_view(&entry.session));
        }

        let enemy_command = self.behavior.decide_command(&entry.session);
        let PvpEntry { session, rng, .. } = &mut *entry;
        engine::resolve_turn(session, command, enemy_command, rng, &self.deps.config)?;

        if entry.session.is_over() && !entry.archived {
            self.finalize(&mut entry);
        }

        Ok(BattleView {
            battle_id,
            player_hp: entry.session.player.hp,
            enemy_hp: entry.session.enemy.hp,
            turn: entry.session.turn_number,
            logs: entry.session.transcript.clone(),
            battle_over: entry.session.is_over(),
            enemy_command: entry.session.last_enemy_command,
        })
    }

    /// Archives the terminal record and fans out notifications. Runs exactly
    /// once per battle under the entry lock.
    fn finalize(&self, entry: &mut PvpEntry) {
        let session = &entry.session;
        let result = match session.phase.result() {
            Some(result) => result,
            None => return,
        };

        let log = BattleLog {
            battle_id: session.battle_id,
            character_id: session.player_character_id,
            opponent_ref: session.opponent_ref,
            mode: BattleMode::Pvp,
            result,
            turn_count: session.turn_number,
            started_at: session.started_at,
            ended_at: SystemTime::now(),
        };
        let durable = archive_with_retry(
            self.deps.archive.as_ref(),
            &log,
            &session.records,
            self.deps.config.archive_attempts,
        );
        if !durable {
            warn!(battle_id = %session.battle_id, "pvp result served from memory only");
        }

        let my_summary = self
            .deps
            .characters
            .character_by_id(session.player_character_id)
            .ok()
            .map(|record| (&record).into());
        let their_summary = self
            .deps
            .characters
            .character_by_id(session.opponent_ref)
            .ok()
            .map(|record| (&record).into());

        self.deps.notifier.notify(ResultNote {
            recipient_user_id: session.user_id.clone(),
            result,
            opponent_summary: their_summary,
        });
        if let Some(opponent) = &session.opponent_user_id {
            self.deps.notifier.notify(ResultNote {
                recipient_user_id: opponent.clone(),
                result: result.inverted(),
                opponent_summary: my_summary,
            });
        }

        self.deps
            .quests
            .battle_completed(&session.user_id, BattleMode::Pvp);
        info!(battle_id = %session.battle_id, %result, "pvp battle finished");

        entry.archived = true;
    }

    pub fn battle_count(&self) -> usize {
        self.battles.len()
    }

    /// Evicts sessions idle past the configured timeout. Entries whose lock
    /// is held are mid-turn and therefore not idle; they are skipped and
    /// caught on a later sweep.
    pub fn sweep_idle(&self) -> usize {
        let timeout = self.deps.config.idle_timeout;
        let mut expired = Vec::new();
        for item in self.battles.iter() {
            if let Ok(entry) = item.value().try_lock() {
                if entry.session.idle_for() > timeout {
                    expired.push(*item.key());
                }
            }
        }
        for battle_id in &expired {
            if self.battles.remove(battle_id).is_some() {
                info!(%battle_id, "idle pvp session evicted");
            }
        }
        expired.len()
    }

    /// Runs the idle sweep on its configured interval until the coordinator
    /// is dropped by every other holder.
    pub fn spawn_sweeper(coordinator: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let interval = coordinator.deps.config.sweep_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = coordinator.sweep_idle();
                if evicted > 0 {
                    debug!(evicted, "pvp sweep pass complete");
                }
            }
        })
    }
}

fn frozen_view(session: &BattleSession) -> BattleView {
    BattleView {
        battle_id: session.battle_id,
        player_hp: session.player.hp,
        enemy_hp: session.enemy.hp,
        turn: session.turn_number,
        logs: session.transcript.clone(),
        battle_over: true,
        enemy_command: None,
    }
}
