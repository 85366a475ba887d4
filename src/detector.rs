//! Candidate sub-hand enumeration.
//!
//! Every hand is built from deal indices, so two detections of the same face
//! from a double deck stay distinct hands with disjoint masks.
//!
//! Emission rules:
//! - of-a-kind: count 2 gives one pair; count c >= 3 gives the natural
//!   c-of-a-kind plus c variants of c-1 cards, each leaving out a different
//!   physical card. No deeper cascade.
//! - full house: every natural trips with every natural pair of another rank.
//! - two pair: every two natural pairs.
//! - flush: all C(n,5) subsets of a suit with n >= 5 cards. Subsets that run
//!   are tagged StraightFlush by evaluation.
//! - straight: cartesian product over each five-rank window (wheel included).
//!   Single-suit products are skipped; the flush pass already has them.
//! - 6..8 card straight flushes: cartesian product per suit over each run.

use itertools::Itertools;

use crate::card::{Card, Rank, Suit};
use crate::counts::CardCounts;
use crate::hand::Hand;
use crate::lut13::run_windows;

/// Largest deal a hand mask can address.
pub const MAX_CARDS: usize = 64;

/// Index tables over one card slice.
pub struct HandDetector<'a> {
    cards: &'a [Card],
    counts: CardCounts,
    by_rank: [Vec<usize>; 13],
    by_suit_rank: [[Vec<usize>; 13]; 4],
}

impl<'a> HandDetector<'a> {
    /// Cards past [`MAX_CARDS`] are ignored.
    pub fn new(cards: &'a [Card]) -> Self {
        let cards = &cards[..cards.len().min(MAX_CARDS)];
        let mut by_rank: [Vec<usize>; 13] = Default::default();
        let mut by_suit_rank: [[Vec<usize>; 13]; 4] = Default::default();
        for (i, c) in cards.iter().enumerate() {
            by_rank[c.rank.idx()].push(i);
            by_suit_rank[c.suit.idx()][c.rank.idx()].push(i);
        }
        Self { cards, counts: CardCounts::from_cards(cards), by_rank, by_suit_rank }
    }

    #[inline(always)]
    fn hand(&self, indices: &[usize]) -> Option<Hand> {
        Hand::from_indices(self.cards, indices)
    }

    /// Every multi-card candidate hand, in detection order.
    pub fn detect(&self) -> Vec<Hand> {
        if self.cards.len() < 2 {
            return Vec::new();
        }
        let mut out = self.of_a_kind();
        out.extend(self.full_houses());
        out.extend(self.two_pairs());
        out.extend(self.flushes());
        out.extend(self.straights());
        out.extend(self.long_straight_flushes());
        log::trace!("detected {} hands from {} cards", out.len(), self.cards.len());
        out
    }

    /// One single-card hand per card; the fallback front/middle material.
    pub fn singles(&self) -> Vec<Hand> {
        (0..self.cards.len()).filter_map(|i| self.hand(&[i])).collect()
    }

    pub fn of_a_kind(&self) -> Vec<Hand> {
        let mut out = Vec::new();
        for rank in Rank::ALL.iter().rev() {
            let idx = &self.by_rank[rank.idx()];
            match idx.len() {
                0 | 1 => {}
                2 => out.extend(self.hand(idx)),
                c => {
                    let natural = &idx[..c.min(8)];
                    out.extend(self.hand(natural));
                    for skip in 0..natural.len() {
                        let variant: Vec<usize> = natural
                            .iter()
                            .enumerate()
                            .filter(|&(k, _)| k != skip)
                            .map(|(_, &i)| i)
                            .collect();
                        out.extend(self.hand(&variant));
                    }
                }
            }
        }
        out
    }

    fn ranks_with_count(&self, n: usize) -> impl Iterator<Item = Rank> + Clone + '_ {
        Rank::ALL.into_iter().rev().filter(move |r| self.by_rank[r.idx()].len() == n)
    }

    pub fn full_houses(&self) -> Vec<Hand> {
        let mut out = Vec::new();
        for t in self.ranks_with_count(3) {
            for p in self.ranks_with_count(2) {
                let idx: Vec<usize> = self.by_rank[t.idx()]
                    .iter()
                    .chain(&self.by_rank[p.idx()])
                    .copied()
                    .collect();
                out.extend(self.hand(&idx));
            }
        }
        out
    }

    pub fn two_pairs(&self) -> Vec<Hand> {
        self.ranks_with_count(2)
            .tuple_combinations()
            .filter_map(|(hi, lo)| {
                let idx: Vec<usize> = self.by_rank[hi.idx()]
                    .iter()
                    .chain(&self.by_rank[lo.idx()])
                    .copied()
                    .collect();
                self.hand(&idx)
            })
            .collect()
    }

    pub fn flushes(&self) -> Vec<Hand> {
        let mut out = Vec::new();
        for suit in Suit::ALL {
            if self.counts.suit_count(suit) < 5 {
                continue;
            }
            let idx: Vec<usize> = (0..self.cards.len())
                .filter(|&i| self.cards[i].suit == suit)
                .collect();
            out.extend(idx.into_iter().combinations(5).filter_map(|c| self.hand(&c)));
        }
        out
    }

    pub fn straights(&self) -> Vec<Hand> {
        let mut out = Vec::new();
        for w in run_windows(5) {
            let ranks = w.ranks();
            if ranks.iter().any(|&r| self.by_rank[r as usize].is_empty()) {
                continue;
            }
            for combo in ranks
                .iter()
                .map(|&r| self.by_rank[r as usize].iter().copied())
                .multi_cartesian_product()
            {
                let suit = self.cards[combo[0]].suit;
                if combo.iter().all(|&i| self.cards[i].suit == suit) {
                    continue;
                }
                out.extend(self.hand(&combo));
            }
        }
        out
    }

    pub fn long_straight_flushes(&self) -> Vec<Hand> {
        let mut out = Vec::new();
        for len in 6..=8 {
            for suit in Suit::ALL {
                let per_rank = &self.by_suit_rank[suit.idx()];
                for w in run_windows(len) {
                    let ranks = w.ranks();
                    if ranks.iter().any(|&r| per_rank[r as usize].is_empty()) {
                        continue;
                    }
                    out.extend(
                        ranks
                            .iter()
                            .map(|&r| per_rank[r as usize].iter().copied())
                            .multi_cartesian_product()
                            .filter_map(|combo| self.hand(&combo)),
                    );
                }
            }
        }
        out
    }
}

/// Detected hands plus single cards, strongest first. This is the list the
/// arrangement search consumes.
pub fn searchable_hands(cards: &[Card]) -> Vec<Hand> {
    let detector = HandDetector::new(cards);
    let mut hands = detector.detect();
    hands.extend(detector.singles());
    crate::hand::sort_by_strength(&mut hands);
    hands
}
