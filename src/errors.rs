use schema::MonsterKind;
use thiserror::Error;
use uuid::Uuid;

/// Main error type for the monster-arena battle service.
///
/// The taxonomy matters to callers: validation and not-found failures are
/// surfaced without mutating any state, `BattleAlreadyOver` is converted to
/// an idempotent frozen-state read at the coordinator boundary, and archive
/// failures are retried a bounded number of times before the durability gap
/// is logged for out-of-band reconciliation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BattleError {
    /// Malformed request shape. Nothing was mutated.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown battle id; the session table is unchanged.
    #[error("battle {0} not found")]
    BattleNotFound(Uuid),

    /// Character lookup failed.
    #[error("character {0} not found")]
    CharacterNotFound(i64),

    /// The monster pool for the requested kind is empty. Surfaced at
    /// encounter construction, never allowed to crash the session.
    #[error("no {0} monster is available")]
    NoMonsterAvailable(MonsterKind),

    /// The eligible opponent pool is empty (never self-match).
    #[error("no opponent available")]
    NoOpponentAvailable,

    /// A turn was submitted against a terminal session. Not an error to the
    /// API caller; the coordinator returns the frozen state instead.
    #[error("battle {0} is already over")]
    BattleAlreadyOver(Uuid),

    /// The persistence sink rejected the terminal record after all retries.
    #[error("archive rejected battle {0}")]
    ArchiveUnavailable(Uuid),
}

/// Type alias for Results using BattleError
pub type BattleResult<T> = Result<T, BattleError>;
