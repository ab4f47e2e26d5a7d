//! Wire-level request and response shapes.
//!
//! PvE uses a persistent WebSocket channel: the client sends one
//! [`EncounterRequest`] frame and receives a stream of [`PveServerMessage`]
//! frames. PvP is a plain request/response surface keyed by `battleId`.

use crate::combat::{BattleCommand, BattleResultKind, MonsterKind, Side};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// First client frame on the PvE channel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncounterRequest {
    pub character_id: i64,
    pub map_id: i64,
    #[serde(default)]
    pub note_style: Option<String>,
}

/// Everything the server pushes over the PvE channel, tagged by `type`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PveServerMessage {
    /// Monster stats pushed once at encounter start so the client can render
    /// the enemy panel before any turn resolves.
    #[serde(rename_all = "camelCase")]
    Encounter {
        monster_id: i64,
        monster_name: String,
        monster_kind: MonsterKind,
        monster_hp: u32,
        monster_attack: u32,
        monster_defense: u32,
        monster_speed: u32,
        monster_critical_rate: u32,
        image_ref: Option<String>,
    },
    /// One resolved attack. A full turn produces one or two of these.
    #[serde(rename_all = "camelCase")]
    Turn {
        turn_number: u32,
        actor_side: Side,
        damage: u32,
        was_critical: bool,
        narration: String,
        player_hp: u32,
        enemy_hp: u32,
    },
    /// Terminal frame; nothing follows it for this encounter.
    #[serde(rename_all = "camelCase")]
    End {
        result: BattleResultKind,
        battle_id: Uuid,
    },
    /// Structural-validation failure. The channel stays open for a retry.
    #[serde(rename_all = "camelCase")]
    Error { message: String },
}

/// One character in an opponent's roster, as shown on the match screen and in
/// result notifications.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CombatantSummary {
    pub character_id: i64,
    pub name: String,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub critical_rate: u32,
    pub grade_id: u32,
    pub image_ref: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchOpponentResponse {
    pub opponent_id: String,
    pub characters: Vec<CombatantSummary>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartBattleRequest {
    pub my_character_id: i64,
    pub enemy_character_id: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartBattleResponse {
    pub battle_id: Uuid,
    pub log: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub command: String,
}

/// Full view of a PvP battle returned from every turn submission. Submitting
/// against a finished battle returns the frozen view with `enemy_command`
/// cleared.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BattleView {
    pub battle_id: Uuid,
    pub player_hp: u32,
    pub enemy_hp: u32,
    pub turn: u32,
    pub logs: Vec<String>,
    pub battle_over: bool,
    pub enemy_command: Option<BattleCommand>,
}
