pub mod archive;
pub mod battle;
pub mod combatant;
pub mod config;
pub mod context;
pub mod encounter;
pub mod errors;
pub mod matchmaker;
pub mod pve;
pub mod pvp;
pub mod roster;
pub mod server;

pub use battle::engine::resolve_turn;
pub use battle::state::{BattlePhase, BattleSession, TurnRecord, TurnRng};
pub use combatant::Combatant;
pub use context::BattleDeps;
pub use errors::{BattleError, BattleResult};
pub use schema::{
    BattleCommand, BattleMode, BattleResultKind, BattleView, EncounterRequest, MonsterKind,
    NoteStyle, PveServerMessage, Side,
};
