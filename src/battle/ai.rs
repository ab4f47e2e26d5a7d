//! A module for defining AI behaviors for battle opponents.

use crate::battle::state::BattleSession;
use rand::prelude::IndexedRandom;
use schema::BattleCommand;
use strum::IntoEnumIterator;

/// A trait for any system that can decide on a combat command for the enemy
/// seat. This is the seam where a smarter opponent policy plugs in.
pub trait Behavior: Send + Sync {
    /// Inspects the battle session and decides the enemy's next command.
    fn decide_command(&self, session: &BattleSession) -> BattleCommand;
}

/// The default opponent policy: attack every turn.
pub struct AlwaysAttack;

impl Behavior for AlwaysAttack {
    fn decide_command(&self, _session: &BattleSession) -> BattleCommand {
        BattleCommand::Attack
    }
}

/// Picks uniformly among all commands, like the original opponent did.
pub struct RandomCommand;

impl Behavior for RandomCommand {
    fn decide_command(&self, _session: &BattleSession) -> BattleCommand {
        let commands: Vec<BattleCommand> = BattleCommand::iter().collect();
        *commands
            .choose(&mut rand::rng())
            .unwrap_or(&BattleCommand::Attack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;
    use schema::{BattleMode, NoteStyle};

    fn sample_session() -> BattleSession {
        let fighter = Combatant {
            name: "Test".to_string(),
            hp: 10,
            max_hp: 10,
            attack: 5,
            defense: 5,
            speed: 5,
            critical_rate_permille: 0,
            grade_id: 1,
            image_ref: None,
        };
        BattleSession::new(
            BattleMode::Pvp,
            "user-a".to_string(),
            Some("user-b".to_string()),
            1,
            2,
            fighter.clone(),
            fighter,
            NoteStyle::Comic,
        )
    }

    #[test]
    fn always_attack_never_varies() {
        let session = sample_session();
        let policy = AlwaysAttack;
        for _ in 0..10 {
            assert_eq!(policy.decide_command(&session), BattleCommand::Attack);
        }
    }

    #[test]
    fn random_command_stays_within_the_command_set() {
        let session = sample_session();
        let policy = RandomCommand;
        for _ in 0..50 {
            // Any variant is fine; the draw must simply be a valid command.
            let _ = policy.decide_command(&session);
        }
    }
}
