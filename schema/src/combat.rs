use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Which seat a combatant occupies in a battle. The player seat always wins
/// speed ties so that replays of the same draw sequence order identically.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum BattleMode {
    Pve,
    Pvp,
}

/// Terminal outcome of a battle, from the initiating player's point of view.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum BattleResultKind {
    Win,
    Lose,
    Draw,
}

impl BattleResultKind {
    /// The same outcome as seen from the other seat. A draw stays a draw.
    pub fn inverted(&self) -> BattleResultKind {
        match self {
            BattleResultKind::Win => BattleResultKind::Lose,
            BattleResultKind::Lose => BattleResultKind::Win,
            BattleResultKind::Draw => BattleResultKind::Draw,
        }
    }
}

/// A combat command submitted for one turn. Parsing is the only validation a
/// client-submitted command receives; anything that parses is accepted.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum BattleCommand {
    Attack,
    Guard,
    Evade,
    Special,
}

/// Monster pool a PvE encounter draws from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MonsterKind {
    Normal,
    Boss,
}

/// Narration flavor requested by the client for PvE turn text.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum NoteStyle {
    #[default]
    Comic,
    Epic,
    Somber,
}
