//! PvE encounter construction: monster templates, encounter rates, and the
//! monster lookup seam.

use crate::battle::state::TurnRng;
use crate::errors::{BattleError, BattleResult};
use rand::prelude::IndexedRandom;
use schema::MonsterKind;
use serde::{Deserialize, Serialize};

/// A monster as stored in the bestiary, in the unified Combatant stat shape.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonsterTemplate {
    pub monster_id: i64,
    pub name: String,
    pub kind: MonsterKind,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub critical_rate_permille: u32,
    pub grade_id: u32,
    pub image_ref: Option<String>,
}

/// Encounter kind split. Normal encounters take `normal_permille` of draws
/// and bosses the remainder, matching the original's 98/2 default.
#[derive(Debug, Clone, Copy)]
pub struct EncounterRates {
    pub normal_permille: u16,
}

impl EncounterRates {
    pub fn new(normal_permille: u16) -> Self {
        Self {
            normal_permille: normal_permille.min(1000),
        }
    }

    pub fn roll_kind(&self, rng: &mut TurnRng) -> MonsterKind {
        let boss_permille = 1000 - self.normal_permille;
        if rng.next_permille("encounter kind roll") <= boss_permille {
            MonsterKind::Boss
        } else {
            MonsterKind::Normal
        }
    }
}

/// Read-only monster lookup collaborator.
pub trait MonsterStore: Send + Sync {
    /// Picks a random template of the given kind. An empty pool is a
    /// reported failure, never a panic.
    fn random_by_kind(&self, kind: MonsterKind) -> BattleResult<MonsterTemplate>;
}

/// In-memory bestiary used by tests and the demo server.
pub struct InMemoryMonsterStore {
    templates: Vec<MonsterTemplate>,
}

impl InMemoryMonsterStore {
    pub fn new(templates: Vec<MonsterTemplate>) -> Self {
        Self { templates }
    }

    pub fn seed_demo() -> Self {
        Self::new(vec![
            MonsterTemplate {
                monster_id: 101,
                name: "Moss Slime".to_string(),
                kind: MonsterKind::Normal,
                hp: 35,
                attack: 9,
                defense: 4,
                speed: 4,
                critical_rate_permille: 50,
                grade_id: 1,
                image_ref: Some("monsters/moss-slime.png".to_string()),
            },
            MonsterTemplate {
                monster_id: 102,
                name: "Cave Bat".to_string(),
                kind: MonsterKind::Normal,
                hp: 28,
                attack: 11,
                defense: 2,
                speed: 12,
                critical_rate_permille: 120,
                grade_id: 1,
                image_ref: Some("monsters/cave-bat.png".to_string()),
            },
            MonsterTemplate {
                monster_id: 201,
                name: "Obsidian Golem".to_string(),
                kind: MonsterKind::Boss,
                hp: 160,
                attack: 24,
                defense: 18,
                speed: 3,
                critical_rate_permille: 80,
                grade_id: 3,
                image_ref: Some("monsters/obsidian-golem.png".to_string()),
            },
        ])
    }
}

impl MonsterStore for InMemoryMonsterStore {
    fn random_by_kind(&self, kind: MonsterKind) -> BattleResult<MonsterTemplate> {
        let pool: Vec<&MonsterTemplate> =
            self.templates.iter().filter(|t| t.kind == kind).collect();
        pool.choose(&mut rand::rng())
            .map(|t| (*t).clone())
            .ok_or(BattleError::NoMonsterAvailable(kind))
    }
}
