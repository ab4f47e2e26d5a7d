use crate::encounter::MonsterTemplate;
use crate::roster::CharacterRecord;
use serde::{Deserialize, Serialize};

/// A participant in a battle: a player character or a monster, reduced to the
/// unified stat shape the resolver works with.
///
/// The invariant `0 <= hp <= max_hp` holds from construction on. A combatant
/// is never mutated by combat math directly; [`Combatant::apply_damage`]
/// returns the new HP and the owning session replaces the stored value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Combatant {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub critical_rate_permille: u32,
    pub grade_id: u32,
    pub image_ref: Option<String>,
}

/// Immutable stat tuple handed to the turn resolution algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatSnapshot {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub critical_rate_permille: u32,
}

impl Combatant {
    pub fn from_character(record: &CharacterRecord) -> Self {
        Self {
            name: record.name.clone(),
            hp: record.hp,
            max_hp: record.hp,
            attack: record.attack,
            defense: record.defense,
            speed: record.speed,
            critical_rate_permille: record.critical_rate_permille,
            grade_id: record.grade_id,
            image_ref: record.image_ref.clone(),
        }
    }

    pub fn from_monster(template: &MonsterTemplate) -> Self {
        Self {
            name: template.name.clone(),
            hp: template.hp,
            max_hp: template.hp,
            attack: template.attack,
            defense: template.defense,
            speed: template.speed,
            critical_rate_permille: template.critical_rate_permille,
            grade_id: template.grade_id,
            image_ref: template.image_ref.clone(),
        }
    }

    pub fn snapshot(&self) -> StatSnapshot {
        StatSnapshot {
            hp: self.hp,
            attack: self.attack,
            defense: self.defense,
            speed: self.speed,
            critical_rate_permille: self.critical_rate_permille,
        }
    }

    /// Damage application without side effects: returns the HP that results
    /// from taking `amount`, clamped at zero. The caller stores the result.
    pub fn apply_damage(&self, amount: u32) -> u32 {
        self.hp.saturating_sub(amount)
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_combatant(hp: u32) -> Combatant {
        Combatant {
            name: "Cinder Drake".to_string(),
            hp,
            max_hp: hp,
            attack: 30,
            defense: 12,
            speed: 8,
            critical_rate_permille: 150,
            grade_id: 2,
            image_ref: None,
        }
    }

    #[test]
    fn apply_damage_never_goes_negative() {
        let combatant = sample_combatant(25);
        assert_eq!(combatant.apply_damage(10), 15);
        assert_eq!(combatant.apply_damage(25), 0);
        assert_eq!(combatant.apply_damage(9999), 0);
    }

    #[test]
    fn apply_damage_does_not_mutate() {
        let combatant = sample_combatant(25);
        let _ = combatant.apply_damage(10);
        assert_eq!(combatant.hp, 25);
    }

    #[test]
    fn snapshot_mirrors_current_stats() {
        let mut combatant = sample_combatant(40);
        combatant.hp = 17;
        let snap = combatant.snapshot();
        assert_eq!(snap.hp, 17);
        assert_eq!(snap.attack, 30);
        assert_eq!(snap.critical_rate_permille, 150);
    }
}
