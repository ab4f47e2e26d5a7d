//! The turn resolution algorithm: pure combat math over two stat snapshots.
//!
//! Everything here is a function of its inputs plus the injected [`TurnRng`]
//! draws, so a scripted oracle reproduces any battle exactly.

use crate::battle::state::TurnRng;
use crate::combatant::StatSnapshot;
use crate::config::BattleConfig;
use schema::Side;

/// One resolved attack within a turn.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackOutcome {
    pub actor: Side,
    /// Damage before the critical multiplier.
    pub base_damage: u32,
    /// Final damage actually applied.
    pub damage: u32,
    pub was_critical: bool,
    /// Both sides' HP after this attack landed.
    pub player_hp: u32,
    pub enemy_hp: u32,
}

/// The outcome of one full turn: the faster side acts, then the slower side
/// if it is still standing.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub turn_number: u32,
    pub attacks: Vec<AttackOutcome>,
    /// Set when a side was reduced to zero HP this turn.
    pub winner: Option<Side>,
}

impl TurnReport {
    pub fn ended(&self) -> bool {
        self.winner.is_some()
    }
}

/// Acting order for one turn: higher speed first, the player seat first on a
/// tie so equal-speed battles replay identically for a given seed.
pub fn turn_order(player: &StatSnapshot, enemy: &StatSnapshot) -> [Side; 2] {
    if enemy.speed > player.speed {
        [Side::Enemy, Side::Player]
    } else {
        [Side::Player, Side::Enemy]
    }
}

/// `max(1, attack - defense * defense_factor)`. The floor keeps arbitrarily
/// high defense from zeroing out damage entirely.
pub fn raw_damage(attacker: &StatSnapshot, defender: &StatSnapshot, config: &BattleConfig) -> u32 {
    let mitigated = (defender.defense as f64 * config.defense_factor).floor() as i64;
    (attacker.attack as i64 - mitigated).max(1) as u32
}

/// Independent critical draw per attack: `critical_rate_permille / 1000`.
pub fn roll_critical(attacker: &StatSnapshot, rng: &mut TurnRng) -> bool {
    u32::from(rng.next_permille("critical hit check")) <= attacker.critical_rate_permille
}

/// Resolves one full turn of combat between two snapshots.
///
/// The faster combatant attacks first; if that attack reduces the defender to
/// zero HP the slower combatant does not act and the faster side wins
/// immediately. HP tracking here is local: callers replace their stored
/// combatant state from the reported outcomes.
pub fn resolve_turn_math(
    player: &StatSnapshot,
    enemy: &StatSnapshot,
    turn_number: u32,
    rng: &mut TurnRng,
    config: &BattleConfig,
) -> TurnReport {
    let mut player_hp = player.hp;
    let mut enemy_hp = enemy.hp;
    let mut attacks = Vec::with_capacity(2);
    let mut winner = None;

    for side in turn_order(player, enemy) {
        let (attacker, defender) = match side {
            Side::Player => (player, enemy),
            Side::Enemy => (enemy, player),
        };

        let base_damage = raw_damage(attacker, defender, config);
        let was_critical = roll_critical(attacker, rng);
        let damage = if was_critical {
            (base_damage as f64 * config.critical_multiplier).floor() as u32
        } else {
            base_damage
        };

        let defender_hp = match side {
            Side::Player => {
                enemy_hp = enemy_hp.saturating_sub(damage);
                enemy_hp
            }
            Side::Enemy => {
                player_hp = player_hp.saturating_sub(damage);
                player_hp
            }
        };

        attacks.push(AttackOutcome {
            actor: side,
            base_damage,
            damage,
            was_critical,
            player_hp,
            enemy_hp,
        });

        if defender_hp == 0 {
            winner = Some(side);
            break;
        }
    }

    TurnReport {
        turn_number,
        attacks,
        winner,
    }
}
