//! Wild-card candidate reduction.
//!
//! A wild slot can become any of 52 faces (1326 face pairs for two slots).
//! Most of those cannot lead to a better arrangement, so a substitution is
//! kept only when it raises the count of at least one tracked category over
//! the fixed cards. The tracked list is a constructor argument.
//!
//! This is a heuristic: nothing proves the optimum survives the filter, and
//! the brute-force enumerators exist so that can be checked.

use std::collections::HashSet;

use crate::card::{Card, Rank, Suit};
use crate::counts::CardCounts;
use crate::error::ArrangeError;
use crate::lut13::{popcnt13, run_windows};

/// Non-wild cards expected beside one wild in a 17-card deal.
pub const ONE_WILD_FIXED: usize = 16;
/// Non-wild cards expected beside two wilds.
pub const TWO_WILD_FIXED: usize = 15;

/// A category whose count the generator watches.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TrackedCategory {
    /// Ranks held exactly `n` times.
    OfAKind(u8),
    /// Distinct five-card straights, counting each physical card choice.
    Straight,
    /// Distinct single-suit runs of exactly `len` cards.
    StraightFlush(u8),
    /// Natural trips times natural pairs of other ranks.
    FullHouse,
}

impl TrackedCategory {
    pub const DEFAULT: [TrackedCategory; 12] = [
        TrackedCategory::OfAKind(3),
        TrackedCategory::OfAKind(4),
        TrackedCategory::OfAKind(5),
        TrackedCategory::OfAKind(6),
        TrackedCategory::OfAKind(7),
        TrackedCategory::OfAKind(8),
        TrackedCategory::Straight,
        TrackedCategory::StraightFlush(5),
        TrackedCategory::StraightFlush(6),
        TrackedCategory::StraightFlush(7),
        TrackedCategory::StraightFlush(8),
        TrackedCategory::FullHouse,
    ];

    pub fn count(self, counts: &CardCounts) -> u64 {
        match self {
            TrackedCategory::OfAKind(n) => popcnt13(counts.exactly(n)) as u64,
            TrackedCategory::Straight => run_products(counts.rank_counts(), 5),
            TrackedCategory::StraightFlush(len) => Suit::ALL
                .iter()
                .map(|&s| run_products(counts.suit_rank_counts(s), len as usize))
                .sum(),
            TrackedCategory::FullHouse => {
                popcnt13(counts.exactly(3)) as u64 * popcnt13(counts.exactly(2)) as u64
            }
        }
    }

    #[inline(always)]
    pub const fn is_straight_flush(self) -> bool {
        matches!(self, TrackedCategory::StraightFlush(_))
    }
}

/// Sum over every `len`-rank run of the product of per-rank counts.
fn run_products(per_rank: &[u8; 13], len: usize) -> u64 {
    run_windows(len)
        .map(|w| w.ranks().iter().map(|&r| per_rank[r as usize] as u64).product::<u64>())
        .sum()
}

/// A proposed face for one wild slot and the categories it raises.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WildCandidate {
    pub card: Card,
    pub improvements: Vec<TrackedCategory>,
}

/// Faces for two wild slots, lower (rank, suit) first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WildPair {
    pub first: Card,
    pub second: Card,
}

#[inline(always)]
fn face_key(c: &Card) -> (Rank, Suit) {
    (c.rank, c.suit)
}

impl WildPair {
    /// Orders the faces canonically; slot ids follow their faces.
    pub fn new(a: Card, b: Card) -> Self {
        if face_key(&a) <= face_key(&b) {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Sorted rank+suit key, identical for both orders of the same faces.
    pub fn key(&self) -> [(Rank, Suit); 2] {
        [face_key(&self.first), face_key(&self.second)]
    }

    /// Reassign slot ids in canonical order.
    fn with_slots(self, slots: (u16, u16)) -> Self {
        Self {
            first: Card::substitute(slots.0, self.first.rank, self.first.suit),
            second: Card::substitute(slots.1, self.second.rank, self.second.suit),
        }
    }
}

#[derive(Clone, Debug)]
pub struct WildCandidateGenerator {
    tracked: Vec<TrackedCategory>,
}

impl Default for WildCandidateGenerator {
    fn default() -> Self {
        Self::new(TrackedCategory::DEFAULT)
    }
}

impl WildCandidateGenerator {
    pub fn new<T: Into<Vec<TrackedCategory>>>(tracked: T) -> Self {
        Self { tracked: tracked.into() }
    }

    pub fn tracked(&self) -> &[TrackedCategory] {
        &self.tracked
    }

    /// Candidates for one wild slot `slot` beside exactly 16 fixed cards.
    pub fn one_wild(&self, fixed: &[Card], slot: u16) -> Result<Vec<WildCandidate>, ArrangeError> {
        check_size(fixed, ONE_WILD_FIXED)?;
        let out = improving_faces(&self.tracked, &CardCounts::from_cards(fixed), slot);
        log::debug!("one wild: {} of 52 faces kept", out.len());
        Ok(out)
    }

    /// Candidate face pairs for two wild slots beside exactly 15 fixed cards.
    ///
    /// Union of same-suit rank pairs that raise a straight-flush count and
    /// nested single-slot candidates, deduplicated by face key. Both slots
    /// showing the same face is outside the brute-force space and skipped.
    pub fn two_wild(&self, fixed: &[Card], slots: (u16, u16)) -> Result<Vec<WildPair>, ArrangeError> {
        check_size(fixed, TWO_WILD_FIXED)?;
        let base = CardCounts::from_cards(fixed);

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut push = |pair: WildPair| {
            if seen.insert(pair.key()) {
                out.push(pair.with_slots(slots));
            }
        };

        let suited = self.suited_pairs(&base);
        let from_suited = suited.len();
        suited.into_iter().for_each(&mut push);

        for first in improving_faces(&self.tracked, &base, slots.0) {
            let mut counts = base;
            counts.add(&first.card);
            for second in improving_faces(&self.tracked, &counts, slots.1) {
                if face_key(&first.card) != face_key(&second.card) {
                    push(WildPair::new(first.card, second.card));
                }
            }
        }

        log::debug!("two wild: {} pairs kept ({} suited proposals)", out.len(), from_suited);
        Ok(out)
    }

    /// Same-suit pairs of ranks absent from that suit that raise a tracked
    /// straight-flush count. At most 4 x C(13,2) proposals.
    fn suited_pairs(&self, base: &CardCounts) -> Vec<WildPair> {
        let sf: Vec<TrackedCategory> =
            self.tracked.iter().copied().filter(|t| t.is_straight_flush()).collect();
        if sf.is_empty() {
            return Vec::new();
        }
        let before: Vec<u64> = sf.iter().map(|t| t.count(base)).collect();

        let mut out = Vec::new();
        for suit in Suit::ALL {
            let held = base.suit_mask(suit);
            let missing: Vec<Rank> =
                Rank::ALL.into_iter().filter(|r| held & (1 << r.idx()) == 0).collect();
            for (i, &r1) in missing.iter().enumerate() {
                for &r2 in &missing[i + 1..] {
                    let a = Card::substitute(0, r1, suit);
                    let b = Card::substitute(0, r2, suit);
                    let mut counts = *base;
                    counts.add(&a);
                    counts.add(&b);
                    if sf.iter().zip(&before).any(|(t, &b0)| t.count(&counts) > b0) {
                        out.push(WildPair::new(a, b));
                    }
                }
            }
        }
        out
    }
}

fn check_size(fixed: &[Card], expected: usize) -> Result<(), ArrangeError> {
    if fixed.len() != expected {
        return Err(ArrangeError::InvalidHandSize { expected, found: fixed.len() });
    }
    Ok(())
}

/// Faces that raise at least one tracked count over `base`.
fn improving_faces(tracked: &[TrackedCategory], base: &CardCounts, slot: u16) -> Vec<WildCandidate> {
    let before: Vec<u64> = tracked.iter().map(|t| t.count(base)).collect();
    let mut counts = *base;
    Card::all_faces(slot)
        .filter_map(|card| {
            counts.add(&card);
            let improvements: Vec<TrackedCategory> = tracked
                .iter()
                .zip(&before)
                .filter(|&(t, &b0)| t.count(&counts) > b0)
                .map(|(&t, _)| t)
                .collect();
            counts.remove(&card);
            (!improvements.is_empty()).then_some(WildCandidate { card, improvements })
        })
        .collect()
}

/// Every face for one slot.
pub fn brute_force_one(slot: u16) -> Vec<Card> {
    Card::all_faces(slot).collect()
}

/// Every unordered pair of distinct faces for two slots (1326 pairs).
pub fn brute_force_two(slots: (u16, u16)) -> Vec<WildPair> {
    let faces: Vec<Card> = Card::all_faces(0).collect();
    let mut out = Vec::with_capacity(1326);
    for (i, &a) in faces.iter().enumerate() {
        for &b in &faces[i + 1..] {
            out.push(WildPair::new(a, b).with_slots(slots));
        }
    }
    out
}
