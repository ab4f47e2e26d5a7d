//! Character lookup collaborators: the stats store behind both battle modes
//! and the eligible-user pool behind matchmaking.

use crate::errors::{BattleError, BattleResult};
use schema::CombatantSummary;
use serde::{Deserialize, Serialize};

/// A character's persisted stat record, as the external store hands it over.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CharacterRecord {
    pub character_id: i64,
    pub user_id: String,
    pub name: String,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub critical_rate_permille: u32,
    pub grade_id: u32,
    pub image_ref: Option<String>,
}

impl From<&CharacterRecord> for CombatantSummary {
    fn from(record: &CharacterRecord) -> Self {
        CombatantSummary {
            character_id: record.character_id,
            name: record.name.clone(),
            hp: record.hp,
            attack: record.attack,
            defense: record.defense,
            speed: record.speed,
            critical_rate: record.critical_rate_permille,
            grade_id: record.grade_id,
            image_ref: record.image_ref.clone(),
        }
    }
}

/// Read-only character lookup collaborator.
pub trait CharacterStore: Send + Sync {
    fn character_by_id(&self, character_id: i64) -> BattleResult<CharacterRecord>;
    fn characters_by_user(&self, user_id: &str) -> Vec<CharacterRecord>;
}

/// Read-only snapshot of users eligible for matchmaking.
pub trait OpponentPool: Send + Sync {
    fn eligible_users(&self) -> Vec<String>;
}

/// In-memory roster used by tests and the demo server. Implements both the
/// character store and the opponent pool over the same records.
pub struct InMemoryRoster {
    characters: Vec<CharacterRecord>,
}

impl InMemoryRoster {
    pub fn new(characters: Vec<CharacterRecord>) -> Self {
        Self { characters }
    }

    pub fn seed_demo() -> Self {
        Self::new(vec![
            CharacterRecord {
                character_id: 1,
                user_id: "ash".to_string(),
                name: "Ember Knight".to_string(),
                hp: 90,
                attack: 22,
                defense: 14,
                speed: 9,
                critical_rate_permille: 150,
                grade_id: 2,
                image_ref: Some("characters/ember-knight.png".to_string()),
            },
            CharacterRecord {
                character_id: 2,
                user_id: "brook".to_string(),
                name: "Gale Dancer".to_string(),
                hp: 70,
                attack: 18,
                defense: 8,
                speed: 16,
                critical_rate_permille: 220,
                grade_id: 2,
                image_ref: Some("characters/gale-dancer.png".to_string()),
            },
            CharacterRecord {
                character_id: 3,
                user_id: "brook".to_string(),
                name: "Stone Warden".to_string(),
                hp: 120,
                attack: 15,
                defense: 20,
                speed: 5,
                critical_rate_permille: 60,
                grade_id: 3,
                image_ref: Some("characters/stone-warden.png".to_string()),
            },
        ])
    }
}

impl CharacterStore for InMemoryRoster {
    fn character_by_id(&self, character_id: i64) -> BattleResult<CharacterRecord> {
        self.characters
            .iter()
            .find(|c| c.character_id == character_id)
            .cloned()
            .ok_or(BattleError::CharacterNotFound(character_id))
    }

    fn characters_by_user(&self, user_id: &str) -> Vec<CharacterRecord> {
        self.characters
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }
}

impl OpponentPool for InMemoryRoster {
    fn eligible_users(&self) -> Vec<String> {
        let mut users: Vec<String> = self.characters.iter().map(|c| c.user_id.clone()).collect();
        users.sort();
        users.dedup();
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_character_reports_not_found() {
        let roster = InMemoryRoster::seed_demo();
        assert_eq!(
            roster.character_by_id(999).unwrap_err(),
            BattleError::CharacterNotFound(999)
        );
    }

    #[test]
    fn eligible_users_are_deduplicated() {
        let roster = InMemoryRoster::seed_demo();
        assert_eq!(roster.eligible_users(), vec!["ash", "brook"]);
    }

    #[test]
    fn summary_preserves_the_stat_shape() {
        let roster = InMemoryRoster::seed_demo();
        let record = roster.character_by_id(1).unwrap();
        let summary = CombatantSummary::from(&record);
        assert_eq!(summary.name, "Ember Knight");
        assert_eq!(summary.hp, 90);
        assert_eq!(summary.critical_rate, 150);
    }
}
