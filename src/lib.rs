//! A deterministic No-Limit Texas Hold'em rules engine.
//!
//! Covers dealing, betting rounds, side-pot partitioning, and hand
//! evaluation for a single table. Transport, matchmaking, and
//! persistence are left to callers; every mutation is a pure
//! `state -> Result<state, GameError>` function so embedding this in a
//! server loop, a CLI, or a test harness looks the same.

pub mod action;
pub mod card;
pub mod engine;
pub mod error;
pub mod eval;
pub mod pot;
pub mod table;

pub use action::{Action, ActionKind, ActionRecord, ActionTemplate};
pub use card::{Card, Deck, Rank, Suit};
pub use engine::{GameState, ShowdownResult, Stage};
pub use error::GameError;
pub use eval::{evaluate_best_hand, HandCategory, HandEvaluation};
pub use pot::{distribute, partition_pots, Pot, PotAward};
pub use table::{JoinConfig, Player, PlayerStatus, Table, TableConfig};
