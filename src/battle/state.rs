use crate::combatant::Combatant;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{BattleCommand, BattleMode, BattleResultKind, NoteStyle, Side};
use serde::{Deserialize, Serialize};
use std::time::{Instant, SystemTime};
use uuid::Uuid;

/// Lifecycle of one battle session.
///
/// `Created -> InProgress -> {Win, Lose, Draw}`. The terminal states are
/// absorbing: a session that reached one is never mutated again, and any
/// further turn submission is answered with the frozen state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    Created,
    InProgress,
    Win,
    Lose,
    Draw,
}

impl BattlePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BattlePhase::Win | BattlePhase::Lose | BattlePhase::Draw)
    }

    pub fn result(&self) -> Option<BattleResultKind> {
        match self {
            BattlePhase::Win => Some(BattleResultKind::Win),
            BattlePhase::Lose => Some(BattleResultKind::Lose),
            BattlePhase::Draw => Some(BattleResultKind::Draw),
            _ => None,
        }
    }
}

/// Append-only record of one resolved attack. One or two are produced per
/// turn (the slower side only acts if still standing).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TurnRecord {
    pub battle_id: Uuid,
    pub turn_number: u32,
    pub actor_side: Side,
    pub action: BattleCommand,
    pub damage_dealt: u32,
    pub was_critical: bool,
    pub resulting_hp: u32,
    pub narration: String,
}

/// The authoritative in-memory record of an in-progress battle.
///
/// Owned exclusively by its coordinator for its whole lifetime: PvE sessions
/// by the connection task driving them, PvP sessions by the coordinator's
/// keyed table. One mutation per resolved turn, immutable once terminal.
#[derive(Debug, Clone)]
pub struct BattleSession {
    pub battle_id: Uuid,
    pub mode: BattleMode,
    pub user_id: String,
    /// The opposing player's user id; only set for PvP.
    pub opponent_user_id: Option<String>,
    pub player_character_id: i64,
    /// Monster id for PvE, character id for PvP.
    pub opponent_ref: i64,
    pub player: Combatant,
    pub enemy: Combatant,
    pub turn_number: u32,
    pub phase: BattlePhase,
    pub note_style: NoteStyle,
    /// Ordered narration lines, accumulated for the client view.
    pub transcript: Vec<String>,
    /// One entry per resolved attack, persisted in batch at battle end.
    pub records: Vec<TurnRecord>,
    pub last_enemy_command: Option<BattleCommand>,
    pub started_at: SystemTime,
    pub last_activity: Instant,
}

impl BattleSession {
    pub fn new(
        mode: BattleMode,
        user_id: String,
        opponent_user_id: Option<String>,
        player_character_id: i64,
        opponent_ref: i64,
        player: Combatant,
        enemy: Combatant,
        note_style: NoteStyle,
    ) -> Self {
        Self {
            battle_id: Uuid::new_v4(),
            mode,
            user_id,
            opponent_user_id,
            player_character_id,
            opponent_ref,
            player,
            enemy,
            turn_number: 1,
            phase: BattlePhase::Created,
            note_style,
            transcript: Vec::new(),
            records: Vec::new(),
            last_enemy_command: None,
            started_at: SystemTime::now(),
            last_activity: Instant::now(),
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Marks activity for the idle sweep.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn idle_for(&self) -> std::time::Duration {
        self.last_activity.elapsed()
    }
}

/// Oracle of pre-drawn or seeded random outcomes in the 1..=1000 permille
/// range. Injecting a scripted sequence makes every combat path replayable
/// in tests; live battles draw from a seeded PRNG whose seed is logged at
/// session start for auditability.
#[derive(Debug, Clone)]
pub enum TurnRng {
    Scripted { outcomes: Vec<u16>, index: usize },
    Seeded { rng: StdRng, seed: u64 },
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u16>) -> Self {
        TurnRng::Scripted { outcomes, index: 0 }
    }

    pub fn from_seed(seed: u64) -> Self {
        TurnRng::Seeded {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn new_random() -> Self {
        Self::from_seed(rand::rng().random::<u64>())
    }

    /// The seed backing a live oracle, if any. Scripted oracles have none.
    pub fn seed(&self) -> Option<u64> {
        match self {
            TurnRng::Scripted { .. } => None,
            TurnRng::Seeded { seed, .. } => Some(*seed),
        }
    }

    /// Draws the next outcome in 1..=1000. `reason` names the draw so test
    /// failures point at the exact consumption site.
    pub fn next_permille(&mut self, reason: &str) -> u16 {
        match self {
            TurnRng::Scripted { outcomes, index } => {
                if *index >= outcomes.len() {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more outcomes.",
                        reason
                    );
                }
                let outcome = outcomes[*index];
                *index += 1;
                outcome
            }
            TurnRng::Seeded { rng, .. } => rng.random_range(1..=1000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn phase_terminality() {
        assert!(!BattlePhase::Created.is_terminal());
        assert!(!BattlePhase::InProgress.is_terminal());
        assert!(BattlePhase::Win.is_terminal());
        assert!(BattlePhase::Lose.is_terminal());
        assert!(BattlePhase::Draw.is_terminal());
        assert_eq!(BattlePhase::Win.result(), Some(BattleResultKind::Win));
        assert_eq!(BattlePhase::InProgress.result(), None);
    }

    #[test]
    fn scripted_rng_replays_in_order() {
        let mut rng = TurnRng::new_for_test(vec![7, 999, 1000]);
        assert_eq!(rng.next_permille("first"), 7);
        assert_eq!(rng.next_permille("second"), 999);
        assert_eq!(rng.next_permille("third"), 1000);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = TurnRng::from_seed(42);
        let mut b = TurnRng::from_seed(42);
        for _ in 0..32 {
            let draw = a.next_permille("a");
            assert_eq!(draw, b.next_permille("b"));
            assert!((1..=1000).contains(&draw));
        }
    }

    #[test]
    #[should_panic(expected = "TurnRng exhausted")]
    fn scripted_rng_panics_on_exhaustion() {
        let mut rng = TurnRng::new_for_test(vec![1]);
        rng.next_permille("only");
        rng.next_permille("one too many");
    }
}
