//! Random opponent selection for PvP.

use crate::errors::{BattleError, BattleResult};
use crate::roster::{CharacterStore, OpponentPool};
use rand::prelude::IndexedRandom;
use schema::CombatantSummary;

/// Picks a uniformly random opponent from the eligible pool, never the
/// requester. An empty pool (single-user environment) is `NoOpponentAvailable`.
pub fn find_opponent(pool: &dyn OpponentPool, exclude_user: &str) -> BattleResult<String> {
    let candidates: Vec<String> = pool
        .eligible_users()
        .into_iter()
        .filter(|user| user != exclude_user)
        .collect();
    candidates
        .choose(&mut rand::rng())
        .cloned()
        .ok_or(BattleError::NoOpponentAvailable)
}

/// Matches an opponent and returns their character roster for the challenge
/// screen.
pub fn match_opponent(
    pool: &dyn OpponentPool,
    characters: &dyn CharacterStore,
    exclude_user: &str,
) -> BattleResult<(String, Vec<CombatantSummary>)> {
    let opponent = find_opponent(pool, exclude_user)?;
    let roster = characters
        .characters_by_user(&opponent)
        .iter()
        .map(CombatantSummary::from)
        .collect();
    Ok((opponent, roster))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::InMemoryRoster;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_user_pool_yields_no_opponent() {
        let roster = InMemoryRoster::new(vec![crate::roster::CharacterRecord {
            character_id: 1,
            user_id: "solo".to_string(),
            name: "Lone Hero".to_string(),
            hp: 50,
            attack: 10,
            defense: 10,
            speed: 10,
            critical_rate_permille: 100,
            grade_id: 1,
            image_ref: None,
        }]);
        assert_eq!(
            find_opponent(&roster, "solo").unwrap_err(),
            BattleError::NoOpponentAvailable
        );
    }

    #[test]
    fn requester_is_never_matched_with_themselves() {
        let roster = InMemoryRoster::seed_demo();
        for _ in 0..30 {
            let opponent = find_opponent(&roster, "brook").unwrap();
            assert_eq!(opponent, "ash");
        }
    }

    #[test]
    fn match_includes_the_opponent_roster() {
        let roster = InMemoryRoster::seed_demo();
        let (opponent, characters) = match_opponent(&roster, &roster, "ash").unwrap();
        assert_eq!(opponent, "brook");
        assert_eq!(characters.len(), 2);
    }
}
