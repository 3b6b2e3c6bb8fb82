use crate::action::{Action, ActionKind, ActionRecord, ActionTemplate};
use crate::card::{Card, Deck};
use crate::error::GameError;
use crate::eval::{evaluate_best_hand, HandEvaluation};
use crate::pot::{self, Pot, PotAward};
use crate::table::{JoinConfig, PlayerStatus, Table, TableConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Where a hand currently stands. `Idle` is the resting state before the
/// first hand and `Showdown` is the resting state after a hand
/// completes, holding the board and results until `start_hand` is
/// called again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Idle,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Stage {
    fn next_street(self) -> Option<Stage> {
        match self {
            Stage::Preflop => Some(Stage::Flop),
            Stage::Flop => Some(Stage::Turn),
            Stage::Turn => Some(Stage::River),
            Stage::River => Some(Stage::Showdown),
            Stage::Idle | Stage::Showdown => None,
        }
    }
}

/// The outcome of running a completed hand to showdown: the pots that
/// were formed, who was awarded what from each, and the revealed hands
/// of everyone who went to showdown (empty when the hand ended by fold).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownResult {
    pub pots: Vec<Pot>,
    pub awards: Vec<PotAward>,
    pub hands: Vec<(usize, HandEvaluation)>,
}

/// The full state of one table: seating, the hand in progress (if any),
/// and the result of the most recently completed hand. Every public
/// method is copy-on-write: it clones `self`, mutates the clone, and
/// returns it on success, leaving the receiver untouched on error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub table: Table,
    pub stage: Stage,
    pub community: Vec<Card>,
    pub deck: Deck,
    pub current_seat: Option<usize>,
    pub current_bet: u64,
    pub min_raise: u64,
    pub history: Vec<ActionRecord>,
    pub last_result: Option<ShowdownResult>,
    pub hands_played: u64,
}

impl GameState {
    pub fn create_table(config: TableConfig) -> Self {
        debug!(max_seats = config.max_seats, "table created");
        Self {
            table: Table::new(config),
            stage: Stage::Idle,
            community: Vec::new(),
            deck: Deck::empty(),
            current_seat: None,
            current_bet: 0,
            min_raise: config.big_blind,
            history: Vec::new(),
            last_result: None,
            hands_played: 0,
        }
    }

    pub fn join(&self, join: JoinConfig) -> Result<Self, GameError> {
        let mut state = self.clone();
        state.table.join(join.clone())?;
        debug!(seat = ?join.seat, "player joined");
        Ok(state)
    }

    /// Removes a player. If a hand is active and the player is still
    /// contesting it (active or all-in), they're marked disconnected but
    /// keep their seat until the hand ends — an `Active` seat is folded
    /// in place since it has no further decision to make safely; an
    /// `AllIn` seat already has none, so its status is left alone.
    /// Otherwise the seat is freed immediately.
    pub fn leave(&self, id: &str) -> Result<Self, GameError> {
        let mut state = self.clone();
        // A hand stays "active" through `Showdown` too: its seats aren't
        // reset until `complete_hand` runs.
        let hand_active = state.stage != Stage::Idle;
        let still_contesting = hand_active
            && state
                .table
                .seat_of(id)
                .ok()
                .and_then(|seat| state.table.player(seat))
                .map(|p| matches!(p.status, PlayerStatus::Active | PlayerStatus::AllIn))
                .unwrap_or(false);
        if still_contesting {
            let seat = state.table.seat_of(id)?;
            if state.current_seat == Some(seat) {
                // Fold through the normal path first (while status is
                // still Active) so history/turn order advance correctly.
                state.apply_action_mut(Action {
                    seat,
                    kind: ActionKind::Fold,
                    amount: 0,
                })?;
                state.table.player_mut(seat).expect("seat still occupied").connected = false;
            } else {
                state.table.disconnect_and_fold(id)?;
            }
        } else {
            state.table.leave(id)?;
        }
        debug!(id, "player left");
        Ok(state)
    }

    /// Starts a new hand: deals hole cards, posts blinds, and sets the
    /// first seat to act. `seed` pins the shuffle for reproducible play;
    /// pass `None` for ordinary (non-deterministic) play.
    ///
    /// Requires no hand currently in progress (call [`GameState::complete_hand`]
    /// after a showdown first) and at least `min_players` connected,
    /// non-`Out` seats with chips.
    pub fn start_hand(&self, seed: Option<&str>) -> Result<Self, GameError> {
        if self.stage != Stage::Idle {
            return Err(GameError::InvalidAction);
        }
        let mut state = self.clone();
        // Eligibility is recomputed fresh every hand from `connected`/`stack`
        // alone: `Out` is a derived status, not a sticky one, so a player
        // who reconnects (or rebuys before the next deal) is eligible again
        // even though `join`'s reconnect path only flips `connected`.
        let eligible = state
            .table
            .occupied_seats()
            .iter()
            .filter(|&&s| {
                state
                    .table
                    .player(s)
                    .map(|p| p.connected && p.stack > 0)
                    .unwrap_or(false)
            })
            .count();
        if eligible < state.table.config.min_players {
            return Err(GameError::MinPlayersNotMet);
        }

        for seat in state.table.occupied_seats() {
            let player = state.table.player_mut(seat).expect("seat is occupied");
            player.hole_cards.clear();
            player.round_contribution = 0;
            player.hand_contribution = 0;
            player.acted = false;
            player.can_raise = true;
            player.status = if player.connected && player.stack > 0 {
                PlayerStatus::Active
            } else {
                PlayerStatus::Out
            };
        }

        state.community.clear();
        state.history.clear();
        state.last_result = None;
        state.deck = Deck::new(seed);

        let (sb_seat, bb_seat) = state.table.blind_positions()?;
        for _ in 0..2 {
            for seat in state.active_seats_from(state.table.button + 1) {
                let card = state.deck.draw().ok_or_else(|| {
                    GameError::Unknown("deck exhausted while dealing hole cards".into())
                })?;
                state
                    .table
                    .player_mut(seat)
                    .expect("active seat is occupied")
                    .hole_cards
                    .push(card);
            }
        }

        state.post_blind(sb_seat, state.table.config.small_blind);
        state.post_blind(bb_seat, state.table.config.big_blind);

        state.current_bet = state.table.config.big_blind;
        state.min_raise = state.table.config.big_blind;
        state.stage = Stage::Preflop;
        state.current_seat = state.table.next_active_seat_from(bb_seat + 1);
        debug!(sb = sb_seat, bb = bb_seat, "hand started");
        Ok(state)
    }

    /// Seats with `PlayerStatus::Active` at hand start, in seat order
    /// beginning at `from` and wrapping around the table.
    fn active_seats_from(&self, from: usize) -> Vec<usize> {
        let n = self.table.config.max_seats;
        if n == 0 {
            return Vec::new();
        }
        (0..n)
            .map(|offset| (from + offset) % n)
            .filter(|&seat| {
                self.table
                    .player(seat)
                    .map(|p| p.status == PlayerStatus::Active)
                    .unwrap_or(false)
            })
            .collect()
    }

    fn post_blind(&mut self, seat: usize, blind: u64) {
        let player = self
            .table
            .player_mut(seat)
            .expect("blind seat is occupied");
        let posted = blind.min(player.stack);
        player.stack -= posted;
        player.round_contribution += posted;
        player.hand_contribution += posted;
        if posted < blind {
            player.status = PlayerStatus::AllIn;
        }
    }

    /// The actions legal for `seat` right now. Errors if no hand is in
    /// progress or it is not that seat's turn.
    pub fn legal_actions(&self, seat: usize) -> Result<Vec<ActionTemplate>, GameError> {
        if !matches!(
            self.stage,
            Stage::Preflop | Stage::Flop | Stage::Turn | Stage::River
        ) {
            return Err(GameError::GameNotStarted);
        }
        if self.current_seat != Some(seat) {
            return Err(GameError::NotPlayersTurn);
        }
        let player = self.table.player(seat).ok_or(GameError::PlayerNotFound)?;
        let mut templates = vec![ActionTemplate {
            kind: ActionKind::Fold,
            min_amount: 0,
            max_amount: 0,
        }];

        let to_call = self.current_bet.saturating_sub(player.round_contribution);
        if to_call == 0 {
            templates.push(ActionTemplate {
                kind: ActionKind::Check,
                min_amount: 0,
                max_amount: 0,
            });
        } else if player.stack >= to_call {
            templates.push(ActionTemplate {
                kind: ActionKind::Call,
                min_amount: to_call,
                max_amount: to_call,
            });
        }

        if player.stack > to_call {
            if self.current_bet == 0 {
                templates.push(ActionTemplate {
                    kind: ActionKind::Bet,
                    min_amount: self.table.config.big_blind.min(player.stack),
                    max_amount: player.stack,
                });
            } else if player.can_raise {
                templates.push(ActionTemplate {
                    kind: ActionKind::Raise,
                    min_amount: self.current_bet + self.min_raise,
                    max_amount: player.round_contribution + player.stack,
                });
            }
        }

        if player.stack > 0 {
            templates.push(ActionTemplate {
                kind: ActionKind::AllIn,
                min_amount: player.round_contribution + player.stack,
                max_amount: player.round_contribution + player.stack,
            });
        }

        Ok(templates)
    }

    /// Applies one player's action, advancing the round, street, or hand
    /// as far as the new state allows. Returns `Err` with `self`
    /// untouched if the action is illegal.
    pub fn apply_action(&self, action: Action) -> Result<Self, GameError> {
        if !matches!(
            self.stage,
            Stage::Preflop | Stage::Flop | Stage::Turn | Stage::River
        ) {
            return Err(GameError::GameNotStarted);
        }
        if self.current_seat != Some(action.seat) {
            return Err(GameError::NotPlayersTurn);
        }
        let mut state = self.clone();
        state.apply_action_mut(action)?;
        Ok(state)
    }

    fn apply_action_mut(&mut self, action: Action) -> Result<(), GameError> {
        let seat = action.seat;
        {
            let player = self
                .table
                .player(seat)
                .ok_or(GameError::PlayerNotFound)?;
            if player.status != PlayerStatus::Active {
                return Err(GameError::InvalidAction);
            }
        }

        match action.kind {
            ActionKind::Fold => self.apply_fold(seat)?,
            ActionKind::Check => self.apply_check(seat)?,
            ActionKind::Call => self.apply_call(seat, action.amount)?,
            ActionKind::Bet => self.apply_bet(seat, action.amount)?,
            ActionKind::Raise => self.apply_raise(seat, action.amount)?,
            ActionKind::AllIn => self.apply_all_in(seat)?,
        }

        let recorded_amount = self
            .table
            .player(seat)
            .map(|p| p.round_contribution)
            .unwrap_or(0);
        self.history.push(ActionRecord {
            seat,
            kind: action.kind,
            amount: recorded_amount,
            stage: self.stage,
        });
        trace!(seat, kind = ?action.kind, "action applied");

        self.progress()
    }

    fn apply_fold(&mut self, seat: usize) -> Result<(), GameError> {
        let player = self.table.player_mut(seat).expect("validated above");
        player.status = PlayerStatus::Folded;
        player.acted = true;
        Ok(())
    }

    fn apply_check(&mut self, seat: usize) -> Result<(), GameError> {
        let current_bet = self.current_bet;
        let player = self.table.player_mut(seat).expect("validated above");
        if player.round_contribution != current_bet {
            return Err(GameError::InvalidAction);
        }
        player.acted = true;
        Ok(())
    }

    fn apply_call(&mut self, seat: usize, amount: u64) -> Result<(), GameError> {
        let current_bet = self.current_bet;
        let player = self.table.player_mut(seat).expect("validated above");
        let to_call = current_bet.saturating_sub(player.round_contribution);
        // A call must exactly match what's owed; a short stack must go
        // through `AllIn` instead rather than have the call silently
        // capped (spec.md §9's second Open Question resolution).
        if to_call == 0 || amount != to_call || player.stack < to_call {
            return Err(GameError::InvalidAction);
        }
        player.stack -= to_call;
        player.round_contribution += to_call;
        player.hand_contribution += to_call;
        player.acted = true;
        Ok(())
    }

    fn apply_bet(&mut self, seat: usize, target: u64) -> Result<(), GameError> {
        if self.current_bet != 0 {
            return Err(GameError::InvalidAction);
        }
        let big_blind = self.table.config.big_blind;
        let player = self.table.player_mut(seat).expect("validated above");
        if target < big_blind.min(player.stack) || target > player.stack {
            return Err(GameError::InvalidAction);
        }
        let delta = target;
        if delta > player.stack {
            return Err(GameError::InsufficientStack);
        }
        player.stack -= delta;
        player.round_contribution = target;
        player.hand_contribution += delta;
        player.acted = true;
        if player.stack == 0 {
            player.status = PlayerStatus::AllIn;
        }

        self.current_bet = target;
        self.min_raise = target.max(big_blind);
        self.reopen_for_others(seat);
        Ok(())
    }

    fn apply_raise(&mut self, seat: usize, target: u64) -> Result<(), GameError> {
        let current_bet = self.current_bet;
        let min_raise = self.min_raise;
        let player = self.table.player_mut(seat).expect("validated above");
        if !player.can_raise || target <= current_bet {
            return Err(GameError::InvalidAction);
        }
        let increment = target - current_bet;
        if increment < min_raise {
            return Err(GameError::InvalidAction);
        }
        let delta = target - player.round_contribution;
        if delta > player.stack {
            return Err(GameError::InsufficientStack);
        }
        player.stack -= delta;
        player.round_contribution = target;
        player.hand_contribution += delta;
        player.acted = true;
        if player.stack == 0 {
            player.status = PlayerStatus::AllIn;
        }

        self.current_bet = target;
        self.min_raise = increment;
        self.reopen_for_others(seat);
        Ok(())
    }

    fn apply_all_in(&mut self, seat: usize) -> Result<(), GameError> {
        let current_bet = self.current_bet;
        let min_raise = self.min_raise;
        let player = self.table.player_mut(seat).expect("validated above");
        let delta = player.stack;
        if delta == 0 {
            return Err(GameError::InvalidAction);
        }
        let target = player.round_contribution + delta;
        player.stack = 0;
        player.round_contribution = target;
        player.hand_contribution += delta;
        player.acted = true;
        player.status = PlayerStatus::AllIn;

        if current_bet == 0 {
            self.current_bet = target;
            self.min_raise = target.max(self.table.config.big_blind);
            self.reopen_for_others(seat);
        } else if target > current_bet {
            let increment = target - current_bet;
            self.current_bet = target;
            if increment >= min_raise {
                self.min_raise = increment;
                self.reopen_for_others(seat);
            } else {
                self.block_raises_for_others(seat);
            }
        }
        Ok(())
    }

    fn reopen_for_others(&mut self, raiser: usize) {
        for seat in self.table.occupied_seats() {
            if seat == raiser {
                continue;
            }
            if let Some(player) = self.table.player_mut(seat) {
                if player.status == PlayerStatus::Active {
                    player.acted = false;
                    player.can_raise = true;
                }
            }
        }
    }

    fn block_raises_for_others(&mut self, raiser: usize) {
        for seat in self.table.occupied_seats() {
            if seat == raiser {
                continue;
            }
            if let Some(player) = self.table.player_mut(seat) {
                if player.status == PlayerStatus::Active {
                    player.can_raise = false;
                }
            }
        }
    }

    /// Seats still contesting the current hand: dealt in and neither
    /// folded nor sitting out. Out/Waiting seats are occupied (spec.md
    /// §4.3 keeps them seated) but never joined this hand's pot, so they
    /// must not count toward the fold-win shortcut or showdown.
    fn contending_seats(&self) -> Vec<usize> {
        self.table
            .occupied_seats()
            .into_iter()
            .filter(|&s| {
                self.table
                    .player(s)
                    .map(|p| matches!(p.status, PlayerStatus::Active | PlayerStatus::AllIn))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Drives the state forward after an action: checks for a fold-win,
    /// advances to the next player, and rolls the street (or runs the
    /// hand out to showdown) once the round is settled.
    fn progress(&mut self) -> Result<(), GameError> {
        let contenders = self.contending_seats();

        if contenders.len() == 1 {
            self.current_seat = None;
            self.award_uncontested(contenders[0]);
            return Ok(());
        }

        self.current_seat = self.next_seat_to_act();
        while self.current_seat.is_none() && self.stage != Stage::Showdown {
            self.deal_next_street()?;
            self.current_seat = self.next_seat_to_act();
        }
        if self.stage == Stage::Showdown {
            self.run_showdown();
        }
        Ok(())
    }

    /// The next seat that still owes an action this round, or `None` if
    /// the round is settled (every contender has acted and matched the
    /// current bet, or is all-in).
    fn next_seat_to_act(&self) -> Option<usize> {
        let start = self.current_seat.map(|s| s + 1).unwrap_or(self.table.button + 1);
        let n = self.table.config.max_seats;
        if n == 0 {
            return None;
        }
        (0..n)
            .map(|offset| (start + offset) % n)
            .find(|&seat| {
                self.table
                    .player(seat)
                    .map(|p| {
                        p.status == PlayerStatus::Active
                            && (!p.acted || p.round_contribution != self.current_bet)
                    })
                    .unwrap_or(false)
            })
    }

    fn deal_next_street(&mut self) -> Result<(), GameError> {
        let next = self
            .stage
            .next_street()
            .ok_or_else(|| GameError::Unknown("no further street to deal".into()))?;
        let to_deal = match next {
            Stage::Flop => 3,
            Stage::Turn | Stage::River => 1,
            _ => 0,
        };
        if to_deal > 0 {
            self.deck
                .draw()
                .ok_or_else(|| GameError::Unknown("deck exhausted burning a card".into()))?;
        }
        for _ in 0..to_deal {
            let card = self
                .deck
                .draw()
                .ok_or_else(|| GameError::Unknown("deck exhausted dealing community cards".into()))?;
            self.community.push(card);
        }
        for seat in self.table.occupied_seats() {
            if let Some(player) = self.table.player_mut(seat) {
                if player.status == PlayerStatus::Active {
                    player.acted = false;
                    player.can_raise = true;
                }
                player.round_contribution = 0;
            }
        }
        self.current_bet = 0;
        self.min_raise = self.table.config.big_blind;
        self.stage = next;
        debug!(?next, community = self.community.len(), "street advanced");
        Ok(())
    }

    fn award_uncontested(&mut self, winner: usize) {
        while self.stage != Stage::Showdown {
            if self.stage.next_street().is_none() {
                break;
            }
            let _ = self.deal_next_street();
        }
        let total: u64 = self
            .table
            .occupied_seats()
            .iter()
            .filter_map(|&s| self.table.player(s))
            .map(|p| p.hand_contribution)
            .sum();
        let pot = Pot {
            amount: total,
            eligible_seats: std::iter::once(winner).collect(),
        };
        if let Some(player) = self.table.player_mut(winner) {
            player.stack += total;
        }
        self.stage = Stage::Showdown;
        self.last_result = Some(ShowdownResult {
            pots: vec![pot.clone()],
            awards: vec![PotAward {
                seat: winner,
                amount: total,
            }],
            hands: Vec::new(),
        });
        debug!(winner, total, "hand won uncontested");
        self.current_seat = None;
    }

    fn run_showdown(&mut self) {
        let hand_seats: Vec<usize> = self
            .table
            .occupied_seats()
            .into_iter()
            .filter(|&s| {
                self.table
                    .player(s)
                    .map(|p| {
                        matches!(
                            p.status,
                            PlayerStatus::Active | PlayerStatus::AllIn | PlayerStatus::Folded
                        )
                    })
                    .unwrap_or(false)
            })
            .collect();
        let contributions: Vec<(usize, u64)> = hand_seats
            .iter()
            .filter_map(|&s| self.table.player(s).map(|p| (s, p.hand_contribution)))
            .collect();
        let folded: HashSet<usize> = hand_seats
            .into_iter()
            .filter(|&s| {
                self.table
                    .player(s)
                    .map(|p| p.status == PlayerStatus::Folded)
                    .unwrap_or(false)
            })
            .collect();

        let pots = pot::partition_pots(&contributions, &folded);
        let showdown_seats: Vec<usize> = contributions
            .iter()
            .map(|&(s, _)| s)
            .filter(|s| !folded.contains(s))
            .collect();

        let hands: Vec<(usize, HandEvaluation)> = showdown_seats
            .iter()
            .map(|&seat| {
                let player = self.table.player(seat).expect("contender is seated");
                let mut all_cards = player.hole_cards.clone();
                all_cards.extend(self.community.iter().copied());
                (seat, evaluate_best_hand(&all_cards))
            })
            .collect();

        let mut awards: Vec<PotAward> = Vec::new();
        for pot in &pots {
            let winners = self.pot_winners(pot, &hands);
            for award in pot::distribute(pot, &winners) {
                if let Some(player) = self.table.player_mut(award.seat) {
                    player.stack += award.amount;
                }
                awards.push(award);
            }
        }

        debug!(pots = pots.len(), "showdown resolved");
        self.last_result = Some(ShowdownResult {
            pots,
            awards,
            hands,
        });
        self.current_seat = None;
    }

    /// The winners of a single pot, ordered starting from the seat
    /// immediately left of the button so `pot::distribute` hands odd
    /// chips out in the correct order.
    fn pot_winners(&self, pot: &Pot, hands: &[(usize, HandEvaluation)]) -> Vec<usize> {
        if pot.eligible_seats.len() == 1 {
            return pot.eligible_seats.iter().copied().collect();
        }
        let best = pot
            .eligible_seats
            .iter()
            .filter_map(|seat| hands.iter().find(|(s, _)| s == seat).map(|(_, e)| e))
            .max()
            .expect("a contested pot has at least one eligible hand");
        let n = self.table.config.max_seats.max(1);
        let mut winners: Vec<usize> = (0..n)
            .map(|offset| (self.table.button + 1 + offset) % n)
            .filter(|seat| pot.eligible_seats.contains(seat))
            .filter(|seat| {
                hands
                    .iter()
                    .find(|(s, _)| s == seat)
                    .map(|(_, e)| e == best)
                    .unwrap_or(false)
            })
            .collect();
        winners.dedup();
        winners
    }

    /// Resets the table for the next hand: `active`/`all-in`/`folded`
    /// seats return to `waiting` (`all-in` with an empty stack goes to
    /// `out` instead; `out` stays `out`), the button rotates to the next
    /// in-play seat, and the hand counter advances. A no-op (idempotent)
    /// if called when no hand has finished, i.e. `stage` is not
    /// `Showdown`.
    pub fn complete_hand(&self) -> Self {
        let mut state = self.clone();
        if state.stage != Stage::Showdown {
            return state;
        }
        for seat in state.table.occupied_seats() {
            if let Some(player) = state.table.player_mut(seat) {
                player.status = match player.status {
                    PlayerStatus::Active | PlayerStatus::Folded => PlayerStatus::Waiting,
                    PlayerStatus::AllIn => {
                        if player.stack > 0 {
                            PlayerStatus::Waiting
                        } else {
                            PlayerStatus::Out
                        }
                    }
                    PlayerStatus::Waiting | PlayerStatus::Out => player.status,
                };
            }
        }
        state.table.move_button();
        state.hands_played += 1;
        state.current_seat = None;
        state.stage = Stage::Idle;
        debug!(hands_played = state.hands_played, "hand completed");
        state
    }

    pub fn current_player(&self) -> Option<usize> {
        self.current_seat
    }

    pub fn current_pot_total(&self) -> u64 {
        self.table
            .occupied_seats()
            .iter()
            .filter_map(|&s| self.table.player(s))
            .map(|p| p.hand_contribution)
            .sum()
    }
}
