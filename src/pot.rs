use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single pot (main or side), formed by partitioning contributions at
/// the levels where players went all-in. Eligibility is the set of
/// seats still live for this pot's showdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: u64,
    pub eligible_seats: HashSet<usize>,
}

/// One seat's share of one pot's payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotAward {
    pub seat: usize,
    pub amount: u64,
}

/// Partitions per-seat hand contributions into main and side pots.
///
/// `contributions` is every seat that put money in this hand (folded
/// seats included, with zero or more chips — their money still counts
/// toward the pots they contributed to, they're just not eligible to
/// win). Pots are returned ordered from the main pot (broadest
/// eligibility) to the last side pot (narrowest).
pub fn partition_pots(contributions: &[(usize, u64)], folded: &HashSet<usize>) -> Vec<Pot> {
    let mut levels: Vec<u64> = contributions
        .iter()
        .map(|&(_, amount)| amount)
        .filter(|&a| a > 0)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots: Vec<Pot> = Vec::new();
    let mut floor = 0u64;
    for level in levels {
        let mut amount = 0u64;
        let mut eligible_seats = HashSet::new();
        for &(seat, contributed) in contributions {
            let slice = contributed.min(level).saturating_sub(floor);
            if slice > 0 {
                amount += slice;
                if contributed >= level && !folded.contains(&seat) {
                    eligible_seats.insert(seat);
                }
            }
        }
        floor = level;
        if amount == 0 {
            continue;
        }
        if eligible_seats.is_empty() {
            if let Some(prev) = pots.last_mut() {
                prev.amount += amount;
            } else {
                // Every contributor to this band folded; no pot can ever
                // be claimed from it, but the chips must still be
                // accounted for somewhere rather than vanish.
                pots.push(Pot {
                    amount,
                    eligible_seats,
                });
            }
            continue;
        }
        pots.push(Pot {
            amount,
            eligible_seats,
        });
    }
    pots
}

/// Splits one pot's amount among its winners (the eligible seats holding
/// the best hand), giving any odd chips to the winners closest to the
/// left of the button, in order.
///
/// `winners` must be seats present in `pot.eligible_seats`, already
/// ordered by proximity to the left of the button (closest first).
pub fn distribute(pot: &Pot, winners: &[usize]) -> Vec<PotAward> {
    assert!(!winners.is_empty(), "a pot must have at least one winner");
    let share = pot.amount / winners.len() as u64;
    let mut remainder = pot.amount % winners.len() as u64;
    winners
        .iter()
        .map(|&seat| {
            let bonus = if remainder > 0 {
                remainder -= 1;
                1
            } else {
                0
            };
            PotAward {
                seat,
                amount: share + bonus,
            }
        })
        .collect()
}
