//! Write-only collaborators invoked at battle conclusion: the battle/turn
//! archive, the result notifier, and the quest-progress sink.

use crate::battle::state::TurnRecord;
use crate::errors::{BattleError, BattleResult};
use schema::{BattleMode, BattleResultKind, CombatantSummary};
use std::sync::Mutex;
use std::time::SystemTime;
use tracing::warn;
use uuid::Uuid;

/// The terminal record of one completed battle. Created exactly once, at
/// conclusion, by the owning coordinator; never mutated afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleLog {
    pub battle_id: Uuid,
    pub character_id: i64,
    /// Monster id for PvE, character id for PvP.
    pub opponent_ref: i64,
    pub mode: BattleMode,
    pub result: BattleResultKind,
    pub turn_count: u32,
    pub started_at: SystemTime,
    pub ended_at: SystemTime,
}

/// Persistence sink for completed battles.
pub trait BattleArchive: Send + Sync {
    fn record_battle(&self, log: &BattleLog, turns: &[TurnRecord]) -> BattleResult<()>;
}

/// A battle-result notification addressed to one user.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultNote {
    pub recipient_user_id: String,
    pub result: BattleResultKind,
    pub opponent_summary: Option<CombatantSummary>,
}

/// Notification sink. Fire-and-forget from the coordinator's point of view.
pub trait ResultNotifier: Send + Sync {
    fn notify(&self, note: ResultNote);
}

/// Quest-progress sink, signalled once per completed battle.
pub trait QuestProgress: Send + Sync {
    fn battle_completed(&self, user_id: &str, mode: BattleMode);
}

/// Writes the terminal record with a bounded number of attempts. If every
/// attempt fails the in-memory result still stands for the caller; the
/// durability gap is logged for out-of-band reconciliation.
pub fn archive_with_retry(
    archive: &dyn BattleArchive,
    log: &BattleLog,
    turns: &[TurnRecord],
    attempts: u32,
) -> bool {
    for attempt in 1..=attempts.max(1) {
        match archive.record_battle(log, turns) {
            Ok(()) => return true,
            Err(err) => {
                warn!(
                    battle_id = %log.battle_id,
                    attempt,
                    error = %err,
                    "battle archive attempt failed"
                );
            }
        }
    }
    warn!(
        battle_id = %log.battle_id,
        "battle result not durable after all archive attempts"
    );
    false
}

/// In-memory archive used by tests and the demo server.
#[derive(Default)]
pub struct InMemoryArchive {
    logs: Mutex<Vec<BattleLog>>,
    turns: Mutex<Vec<TurnRecord>>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logs(&self) -> Vec<BattleLog> {
        self.logs.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn turns(&self) -> Vec<TurnRecord> {
        self.turns.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl BattleArchive for InMemoryArchive {
    fn record_battle(&self, log: &BattleLog, turns: &[TurnRecord]) -> BattleResult<()> {
        self.logs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(log.clone());
        self.turns
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(turns);
        Ok(())
    }
}

/// Notifier that records every note; doubles as the demo sink.
#[derive(Default)]
pub struct RecordingNotifier {
    notes: Mutex<Vec<ResultNote>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> Vec<ResultNote> {
        self.notes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ResultNotifier for RecordingNotifier {
    fn notify(&self, note: ResultNote) {
        self.notes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(note);
    }
}

/// Quest sink that counts completions per mode; doubles as the demo sink.
#[derive(Default)]
pub struct RecordingQuestProgress {
    completions: Mutex<Vec<(String, BattleMode)>>,
}

impl RecordingQuestProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completions(&self) -> Vec<(String, BattleMode)> {
        self.completions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl QuestProgress for RecordingQuestProgress {
    fn battle_completed(&self, user_id: &str, mode: BattleMode) {
        self.completions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((user_id.to_string(), mode));
    }
}

/// Archive that always fails; used to exercise the retry path in tests.
pub struct FailingArchive {
    pub calls: Mutex<u32>,
}

impl FailingArchive {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BattleArchive for FailingArchive {
    fn record_battle(&self, log: &BattleLog, _turns: &[TurnRecord]) -> BattleResult<()> {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Err(BattleError::ArchiveUnavailable(log.battle_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_log() -> BattleLog {
        BattleLog {
            battle_id: Uuid::new_v4(),
            character_id: 1,
            opponent_ref: 101,
            mode: BattleMode::Pve,
            result: BattleResultKind::Win,
            turn_count: 4,
            started_at: SystemTime::now(),
            ended_at: SystemTime::now(),
        }
    }

    #[test]
    fn successful_archive_returns_on_first_attempt() {
        let archive = InMemoryArchive::new();
        assert!(archive_with_retry(&archive, &sample_log(), &[], 3));
        assert_eq!(archive.logs().len(), 1);
    }

    #[test]
    fn retry_is_bounded_and_reports_the_gap() {
        let archive = FailingArchive::new();
        let durable = archive_with_retry(&archive, &sample_log(), &[], 3);
        assert!(!durable);
        assert_eq!(archive.call_count(), 3);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let archive = FailingArchive::new();
        archive_with_retry(&archive, &sample_log(), &[], 0);
        assert_eq!(archive.call_count(), 1);
    }
}
