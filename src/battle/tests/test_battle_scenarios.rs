//! Multi-turn battle scenarios driven through the engine with scripted draws.

use crate::battle::engine::resolve_turn;
use crate::battle::state::{BattlePhase, BattleSession, TurnRng};
use crate::combatant::Combatant;
use crate::config::BattleConfig;
use pretty_assertions::assert_eq;
use schema::{BattleCommand, BattleMode, NoteStyle, Side};

fn fighter(name: &str, hp: u32, attack: u32, defense: u32, speed: u32, crit: u32) -> Combatant {
    Combatant {
        name: name.to_string(),
        hp,
        max_hp: hp,
        attack,
        defense,
        speed,
        critical_rate_permille: crit,
        grade_id: 1,
        image_ref: None,
    }
}

fn session_with(player: Combatant, enemy: Combatant) -> BattleSession {
    BattleSession::new(
        BattleMode::Pvp,
        "user-a".to_string(),
        Some("user-b".to_string()),
        1,
        2,
        player,
        enemy,
        NoteStyle::Comic,
    )
}

fn run_to_completion(session: &mut BattleSession, rng: &mut TurnRng, config: &BattleConfig) {
    while !session.is_over() {
        resolve_turn(
            session,
            BattleCommand::Attack,
            BattleCommand::Attack,
            rng,
            config,
        )
        .unwrap();
    }
}

#[test]
fn attrition_battle_grinds_to_a_win() {
    // Player hits for 20 - floor(8 * 0.5) = 16, enemy for 15 - floor(10 * 0.5) = 10.
    // 90 HP at 16 per turn falls on the player's sixth attack.
    let mut session = session_with(
        fighter("Hero", 100, 20, 10, 8, 0),
        fighter("Rival", 90, 15, 8, 6, 0),
    );
    let config = BattleConfig::default();
    let mut rng = TurnRng::new_for_test(vec![1000; 16]);

    run_to_completion(&mut session, &mut rng, &config);

    assert_eq!(session.phase, BattlePhase::Win);
    assert_eq!(session.turn_number, 6);
    assert_eq!(session.enemy.hp, 0);
    // Five full exchanges before the finishing blow.
    assert_eq!(session.player.hp, 100 - 5 * 10);
    assert_eq!(session.records.len(), 11);
    // Every record narrated, plus the closing result line.
    assert_eq!(session.transcript.len(), 12);
    assert!(session.records.iter().all(|r| !r.was_critical));
}

#[test]
fn critical_streak_decides_a_mirror_match() {
    // Identical fighters; the player seat acts first on the speed tie. The
    // script gives the player a critical every attack (draw 500 at rate 500)
    // and the enemy none (draw 501), so the player lands 30 per turn against
    // the enemy's 20 and finishes on turn four.
    let mut session = session_with(
        fighter("Hero", 100, 20, 0, 5, 500),
        fighter("Rival", 100, 20, 0, 5, 500),
    );
    let config = BattleConfig::default();
    let mut rng = TurnRng::new_for_test(vec![500, 501, 500, 501, 500, 501, 500]);

    run_to_completion(&mut session, &mut rng, &config);

    assert_eq!(session.phase, BattlePhase::Win);
    assert_eq!(session.turn_number, 4);
    assert_eq!(session.player.hp, 100 - 3 * 20);
    assert_eq!(session.records.len(), 7);
    for record in &session.records {
        match record.actor_side {
            Side::Player => {
                assert!(record.was_critical);
                assert_eq!(record.damage_dealt, 30);
            }
            Side::Enemy => {
                assert!(!record.was_critical);
                assert_eq!(record.damage_dealt, 20);
            }
        }
    }
}

#[test]
fn identical_seeds_replay_the_same_battle() {
    let config = BattleConfig::default();
    let make = || {
        session_with(
            fighter("Hero", 80, 14, 3, 9, 250),
            fighter("Rival", 70, 11, 6, 7, 250),
        )
    };

    let mut first = make();
    let mut first_rng = TurnRng::from_seed(99);
    run_to_completion(&mut first, &mut first_rng, &config);

    let mut second = make();
    let mut second_rng = TurnRng::from_seed(99);
    run_to_completion(&mut second, &mut second_rng, &config);

    assert_eq!(first.phase, second.phase);
    assert_eq!(first.turn_number, second.turn_number);
    assert_eq!(first.transcript, second.transcript);
    assert_eq!(first.records.len(), second.records.len());
    for (a, b) in first.records.iter().zip(&second.records) {
        assert_eq!(a.damage_dealt, b.damage_dealt);
        assert_eq!(a.was_critical, b.was_critical);
        assert_eq!(a.resulting_hp, b.resulting_hp);
    }
}
