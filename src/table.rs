use crate::card::Card;
use crate::error::GameError;
use serde::{Deserialize, Serialize};

/// A player's standing relative to the current (or next) hand. Empty
/// seats are `None` in `Table::seats` rather than represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// Seated but not dealt into the hand currently in progress; will be
    /// dealt in once the next hand starts, provided they're connected
    /// and have chips.
    Waiting,
    /// Still holding cards and eligible to act or win.
    Active,
    /// Has folded this hand; out of the running but stack is untouched.
    Folded,
    /// Put in their entire remaining stack; no further action possible.
    AllIn,
    /// Busted (or disconnected at hand start) and excluded from dealing
    /// until they leave and rejoin, or reconnect with chips.
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub seat: usize,
    pub stack: u64,
    pub status: PlayerStatus,
    /// Whether the host currently has a live connection to this player.
    /// A disconnected player is skipped when dealing a new hand and
    /// forced to fold in place if one is already in progress.
    pub connected: bool,
    /// Chips committed so far in the current betting round (resets each street).
    pub round_contribution: u64,
    /// Chips committed so far in the whole hand (resets each hand, feeds pot math).
    pub hand_contribution: u64,
    /// True once this seat has acted since the last full bet/raise.
    pub acted: bool,
    /// False once this seat has only faced an incomplete raise it can't reopen.
    pub can_raise: bool,
    /// This seat's hole cards for the hand in progress; empty between hands.
    pub hole_cards: Vec<Card>,
}

impl Player {
    fn new(id: String, seat: usize, stack: u64) -> Self {
        Self {
            id,
            seat,
            stack,
            status: PlayerStatus::Waiting,
            connected: true,
            round_contribution: 0,
            hand_contribution: 0,
            acted: false,
            can_raise: true,
            hole_cards: Vec::new(),
        }
    }
}

/// Static table parameters, fixed for the table's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub max_seats: usize,
    pub min_players: usize,
    pub small_blind: u64,
    pub big_blind: u64,
}

/// Parameters for a single `Table::join` call. `seat` requests a
/// specific seat; `None` means "any open seat, lowest index first".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinConfig {
    pub id: String,
    pub seat: Option<usize>,
    pub buy_in: u64,
}

/// Seating and chip-stack bookkeeping, independent of any in-progress hand.
/// `GameState` wraps a `Table` and layers betting-round state on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub config: TableConfig,
    /// Seat-indexed; `None` means the seat is empty.
    pub seats: Vec<Option<Player>>,
    /// Seat index of the dealer button.
    pub button: usize,
}

impl Table {
    pub fn new(config: TableConfig) -> Self {
        Self {
            seats: vec![None; config.max_seats],
            button: 0,
            config,
        }
    }

    /// Joins a player to the table. If `join.id` already occupies a
    /// seat, this is a reconnect: the seat and its in-hand status are
    /// left untouched, only `connected` is set true. Otherwise the
    /// player is seated fresh, at `join.seat` if given and empty
    /// (`SeatTaken`/`InvalidSeat` on conflict) or else the lowest empty
    /// seat (`GameFull` if none remain).
    pub fn join(&mut self, join: JoinConfig) -> Result<(), GameError> {
        if let Some(player) = self
            .seats
            .iter_mut()
            .flatten()
            .find(|p| p.id == join.id)
        {
            player.connected = true;
            return Ok(());
        }

        let seat = match join.seat {
            Some(seat) => {
                if seat >= self.config.max_seats {
                    return Err(GameError::InvalidSeat);
                }
                if self.seats[seat].is_some() {
                    return Err(GameError::SeatTaken);
                }
                seat
            }
            None => self
                .seats
                .iter()
                .position(|p| p.is_none())
                .ok_or(GameError::GameFull)?,
        };
        self.seats[seat] = Some(Player::new(join.id, seat, join.buy_in));
        Ok(())
    }

    /// Removes a player's seat unconditionally. Used when no hand is
    /// active; during an active hand, callers should use
    /// [`Table::disconnect_and_fold`] instead so the seat survives to
    /// the end of the hand.
    pub fn leave(&mut self, id: &str) -> Result<(), GameError> {
        let seat = self.seat_of(id)?;
        self.seats[seat] = None;
        Ok(())
    }

    /// Marks a player disconnected and, if they still have a decision
    /// pending this hand, folds them in place without freeing their seat.
    /// An `AllIn` seat has no further decision to make, so disconnecting
    /// leaves its status untouched rather than forfeiting its locked-in
    /// equity.
    pub fn disconnect_and_fold(&mut self, id: &str) -> Result<(), GameError> {
        let seat = self.seat_of(id)?;
        let player = self.player_mut(seat).expect("seat_of found this seat");
        player.connected = false;
        if player.status == PlayerStatus::Active {
            player.status = PlayerStatus::Folded;
        }
        Ok(())
    }

    pub fn seat_of(&self, id: &str) -> Result<usize, GameError> {
        self.seats
            .iter()
            .flatten()
            .find(|p| p.id == id)
            .map(|p| p.seat)
            .ok_or(GameError::PlayerNotFound)
    }

    pub fn occupied_seats(&self) -> Vec<usize> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|_| i))
            .collect()
    }

    pub fn player_count(&self) -> usize {
        self.seats.iter().filter(|p| p.is_some()).count()
    }

    /// The next occupied seat at or after `from`, wrapping around the table.
    /// Returns `None` only if the table has no occupied seats at all.
    pub fn next_occupied_seat_from(&self, from: usize) -> Option<usize> {
        let n = self.config.max_seats;
        if n == 0 {
            return None;
        }
        (0..n)
            .map(|offset| (from + offset) % n)
            .find(|&seat| self.seats[seat].is_some())
    }

    /// The next seat at or after `from` whose occupant is still `Active`
    /// and connected (i.e. can be asked to act), wrapping around the table.
    pub fn next_active_seat_from(&self, from: usize) -> Option<usize> {
        let n = self.config.max_seats;
        if n == 0 {
            return None;
        }
        (0..n)
            .map(|offset| (from + offset) % n)
            .find(|&seat| {
                self.seats[seat]
                    .as_ref()
                    .map(|p| p.status == PlayerStatus::Active && p.connected)
                    .unwrap_or(false)
            })
    }

    /// Whether a seated player is still in play for hand-start purposes:
    /// connected, with chips on the way or already dealt in (`Waiting` or
    /// `Active`), as opposed to `Out` (busted/disconnected at deal time)
    /// or `Folded`/`AllIn`, which only occur mid-hand.
    fn is_in_play(player: &Player) -> bool {
        player.connected && matches!(player.status, PlayerStatus::Waiting | PlayerStatus::Active)
    }

    /// The next seat at or after `from` holding an in-play player, per
    /// [`Table::is_in_play`], wrapping around the table.
    pub fn next_in_play_seat_from(&self, from: usize) -> Option<usize> {
        let n = self.config.max_seats;
        if n == 0 {
            return None;
        }
        (0..n)
            .map(|offset| (from + offset) % n)
            .find(|&seat| {
                self.seats[seat]
                    .as_ref()
                    .map(Self::is_in_play)
                    .unwrap_or(false)
            })
    }

    /// Small blind and big blind seats for the current button, honoring
    /// the heads-up rule that the button posts the small blind.
    pub fn blind_positions(&self) -> Result<(usize, usize), GameError> {
        let in_play = self
            .seats
            .iter()
            .filter(|p| p.as_ref().map(Self::is_in_play).unwrap_or(false))
            .count();
        if in_play < 2 {
            return Err(GameError::MinPlayersNotMet);
        }
        if in_play == 2 {
            let sb = self.button;
            let bb = self
                .next_in_play_seat_from(sb + 1)
                .ok_or(GameError::MinPlayersNotMet)?;
            return Ok((sb, bb));
        }
        let sb = self
            .next_in_play_seat_from(self.button + 1)
            .ok_or(GameError::MinPlayersNotMet)?;
        let bb = self
            .next_in_play_seat_from(sb + 1)
            .ok_or(GameError::MinPlayersNotMet)?;
        Ok((sb, bb))
    }

    /// Advances the button to the next seat holding an in-play player.
    pub fn move_button(&mut self) {
        if let Some(next) = self.next_in_play_seat_from(self.button + 1) {
            self.button = next;
        }
    }

    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.seats.get(seat).and_then(|p| p.as_ref())
    }

    pub fn player_mut(&mut self, seat: usize) -> Option<&mut Player> {
        self.seats.get_mut(seat).and_then(|p| p.as_mut())
    }
}
