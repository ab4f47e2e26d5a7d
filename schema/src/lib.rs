// Monster Arena Schema - Shared type definitions
// This crate contains the core enums and wire-level message types that are
// shared between the monster-arena battle service and its clients, so that
// both sides of the PvE channel and the PvP request surface agree on shapes.

// Re-export the main types
pub use combat::*;
pub use messages::*;

pub mod combat;
pub mod messages;
