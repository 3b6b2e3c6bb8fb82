use serde::{Deserialize, Serialize};

/// The kind of action a player takes during a betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

/// An action submitted by a player. `amount` is the seat's intended new
/// total round-contribution (not the incremental chips added), matching
/// how the engine tracks `round_contribution`, for `Bet` and `Raise`.
/// For `Call` it must equal the exact amount owed (`current_bet` minus
/// the seat's contribution so far this street) — the engine rejects any
/// other value rather than silently substituting the real figure, per
/// spec.md §6: a short stack must submit `AllIn` instead. `Fold`/`Check`/
/// `AllIn` are fully determined by table state, so the engine ignores
/// `amount` for those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub seat: usize,
    pub kind: ActionKind,
    pub amount: u64,
}

/// The set of actions legal for a seat right now, with the amounts that
/// bound each one. Returned by `GameState::legal_actions` so a caller
/// can render betting controls without duplicating the engine's rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTemplate {
    pub kind: ActionKind,
    /// For `Call`: the exact call amount. For `Bet`/`Raise`: the minimum
    /// legal total. For `AllIn`: the seat's full remaining stack. Unused
    /// for `Fold`/`Check`.
    pub min_amount: u64,
    /// For `Bet`/`Raise`: the maximum legal total (the seat's full
    /// stack, since this is no-limit). Unused otherwise.
    pub max_amount: u64,
}

/// A record of one action taken during a hand, kept for the hand
/// history / audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: usize,
    pub kind: ActionKind,
    pub amount: u64,
    pub stage: crate::engine::Stage,
}
