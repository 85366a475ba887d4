//! Rank/suit frequency analysis over a card multiset.
//!
//! A double deck can hold the same face twice, so this keeps counts per
//! (suit, rank) rather than a presence bit. Presence masks are derived from
//! the counts and use the same 13-bit rank layout as the LUTs.

use crate::card::{Card, Rank, Suit};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct CardCounts {
    ranks: [u8; 13],
    suits: [[u8; 13]; 4],
}

impl CardCounts {
    #[inline(always)]
    pub const fn new() -> Self {
        Self { ranks: [0; 13], suits: [[0; 13]; 4] }
    }

    pub fn from_cards<'a, I: IntoIterator<Item = &'a Card>>(iter: I) -> Self {
        let mut c = Self::new();
        for card in iter {
            c.add(card);
        }
        c
    }

    #[inline(always)]
    pub fn add(&mut self, card: &Card) {
        self.ranks[card.rank.idx()] += 1;
        self.suits[card.suit.idx()][card.rank.idx()] += 1;
    }

    /// Removing a face that is not held is a no-op.
    #[inline(always)]
    pub fn remove(&mut self, card: &Card) {
        let (s, r) = (card.suit.idx(), card.rank.idx());
        if self.suits[s][r] > 0 {
            self.suits[s][r] -= 1;
            self.ranks[r] -= 1;
        }
    }

    #[inline(always)]
    pub const fn rank_count(&self, rank: Rank) -> u8 {
        self.ranks[rank.idx()]
    }

    #[inline(always)]
    pub const fn rank_counts(&self) -> &[u8; 13] {
        &self.ranks
    }

    #[inline(always)]
    pub const fn suit_rank_count(&self, suit: Suit, rank: Rank) -> u8 {
        self.suits[suit.idx()][rank.idx()]
    }

    #[inline(always)]
    pub const fn suit_rank_counts(&self, suit: Suit) -> &[u8; 13] {
        &self.suits[suit.idx()]
    }

    pub fn suit_count(&self, suit: Suit) -> usize {
        self.suits[suit.idx()].iter().map(|&n| n as usize).sum()
    }

    /// Ranks held at least once.
    #[inline(always)]
    pub fn rank_mask(&self) -> u16 {
        self.at_least(1)
    }

    /// Ranks held at least once in `suit`.
    pub fn suit_mask(&self, suit: Suit) -> u16 {
        mask_where(&self.suits[suit.idx()], |n| n > 0)
    }

    /// Ranks held `n` or more times.
    pub fn at_least(&self, n: u8) -> u16 {
        mask_where(&self.ranks, |c| c >= n)
    }

    /// Ranks held exactly `n` times.
    pub fn exactly(&self, n: u8) -> u16 {
        mask_where(&self.ranks, |c| c == n)
    }
}

#[inline(always)]
fn mask_where(counts: &[u8; 13], keep: impl Fn(u8) -> bool) -> u16 {
    counts
        .iter()
        .enumerate()
        .filter(|&(_, &n)| keep(n))
        .fold(0u16, |m, (i, _)| m | (1 << i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank::*, Suit::*};
    use crate::lut13::popcnt13;

    #[test]
    fn add_remove_tracks_duplicates() {
        let mut c = CardCounts::new();
        let a = Card::new(0, Ace, Spades);
        let b = Card::new(1, Ace, Spades);
        c.add(&a);
        c.add(&b);
        assert_eq!(c.suit_rank_count(Spades, Ace), 2);
        assert_eq!(c.rank_count(Ace), 2);

        c.remove(&a);
        assert_eq!(c.rank_count(Ace), 1);
        c.remove(&a);
        c.remove(&a);
        assert_eq!(c.rank_count(Ace), 0);
        assert_eq!(c, CardCounts::new());
    }

    #[test]
    fn multiplicity_masks() {
        let cards = [
            Card::new(0, Two, Clubs),
            Card::new(1, Two, Diamonds),
            Card::new(2, Two, Hearts),
            Card::new(3, Two, Spades),
            Card::new(4, Nine, Hearts),
            Card::new(5, Nine, Hearts),
            Card::new(6, King, Clubs),
        ];
        let c = CardCounts::from_cards(&cards);

        assert_eq!(popcnt13(c.at_least(2)), 2);
        assert_eq!(c.exactly(4), 1 << Two.idx());
        assert_eq!(c.exactly(2), 1 << Nine.idx());
        assert_eq!(c.suit_mask(Hearts), (1 << Two.idx()) | (1 << Nine.idx()));
        assert_eq!(c.suit_count(Hearts), 3);
        assert_eq!(popcnt13(c.rank_mask()), 3);
    }
}
