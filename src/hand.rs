//! Positions, position sets, and detected hands.

use std::fmt;

use crate::card::Card;
use crate::evaluator::evaluate;
use crate::score::{Category, HandRank};

/// The three ranked positions, strongest to weakest.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Position {
    Back = 0,
    Middle = 1,
    Front = 2,
}

impl Position {
    pub const ALL: [Position; 3] = [Position::Back, Position::Middle, Position::Front];

    #[inline(always)]
    pub const fn idx(self) -> usize {
        self as usize
    }

    #[inline(always)]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Position::Back => "back",
            Position::Middle => "middle",
            Position::Front => "front",
        }
    }

    pub fn from_name(s: &str) -> Option<Position> {
        match s.trim().to_ascii_lowercase().as_str() {
            "back" => Some(Position::Back),
            "middle" => Some(Position::Middle),
            "front" => Some(Position::Front),
            _ => None,
        }
    }

    /// Card counts a completed hand may have in this position.
    pub const fn legal_sizes(self) -> &'static [usize] {
        match self {
            Position::Back => &[5, 6, 7, 8],
            Position::Middle => &[5, 6, 7],
            Position::Front => &[3, 5],
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Subset of {back, middle, front}.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct PositionSet(u8);

impl PositionSet {
    pub const NONE: PositionSet = PositionSet(0);
    pub const ALL: PositionSet = PositionSet(0b111);

    pub const fn of(positions: &[Position]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < positions.len() {
            bits |= positions[i].bit();
            i += 1;
        }
        PositionSet(bits)
    }

    #[inline(always)]
    pub const fn contains(self, p: Position) -> bool {
        self.0 & p.bit() != 0
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Position> {
        Position::ALL.into_iter().filter(move |&p| self.contains(p))
    }
}

/// Which positions a hand of `category` with `len` cards may occupy.
///
/// 1 card: front, middle. 2-card pair: all. 3 cards: front. 4-card two pair:
/// middle, back. 4-card of-a-kind: all. 5 cards: middle, back, plus front from
/// Straight up. 6..7 natural: middle, back. 8 natural: back.
pub fn eligible_positions(category: Category, len: usize) -> PositionSet {
    use Position::*;
    match len {
        1 => PositionSet::of(&[Front, Middle]),
        2 if category == Category::Pair => PositionSet::ALL,
        3 => PositionSet::of(&[Front]),
        4 if category == Category::TwoPair => PositionSet::of(&[Middle, Back]),
        4 if category.is_of_a_kind() => PositionSet::ALL,
        5 if category >= Category::Straight => PositionSet::ALL,
        5 => PositionSet::of(&[Middle, Back]),
        6 | 7 if category.natural_len() == Some(len) => PositionSet::of(&[Middle, Back]),
        8 if category.natural_len() == Some(8) => PositionSet::of(&[Back]),
        _ => PositionSet::NONE,
    }
}

/// Hands of 1, 2 or 4 cards still need kickers before they can be played.
#[inline(always)]
pub const fn is_incomplete_size(len: usize) -> bool {
    matches!(len, 1 | 2 | 4)
}

/// A candidate sub-hand of one deal.
///
/// `mask` has bit `i` set for the card at index `i` of the deal slice the hand
/// was detected from, so overlap between hands is one AND.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hand {
    pub cards: Vec<Card>,
    pub category: Category,
    pub rank: HandRank,
    pub incomplete: bool,
    pub positions: PositionSet,
    pub mask: u64,
}

impl Hand {
    /// Build from deal indices. `None` if the cards do not form a hand.
    pub fn from_indices(deal: &[Card], indices: &[usize]) -> Option<Hand> {
        let cards: Vec<Card> = indices.iter().map(|&i| deal[i]).collect();
        let mask = indices.iter().fold(0u64, |m, &i| m | (1u64 << i));
        Self::with_mask(cards, mask)
    }

    pub fn with_mask(cards: Vec<Card>, mask: u64) -> Option<Hand> {
        let eval = evaluate(&cards)?;
        let len = cards.len();
        Some(Hand {
            positions: eligible_positions(eval.category, len),
            incomplete: is_incomplete_size(len),
            category: eval.category,
            rank: eval.rank,
            cards,
            mask,
        })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[inline(always)]
    pub fn overlaps(&self, other: &Hand) -> bool {
        self.mask & other.mask != 0
    }

    /// Size after kicker completion in `position`.
    pub fn completed_len(&self, position: Position) -> usize {
        match (position, self.len()) {
            (Position::Front, n) if n <= 3 => 3,
            (Position::Front, 4) => 5,
            (_, n) if n < 5 => 5,
            (_, n) => n,
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, " {:?} {}", self.category, self.rank)
    }
}

/// Strongest first by hand_rank. Stable, so equal hands keep detection order.
pub fn sort_by_strength(hands: &mut [Hand]) {
    hands.sort_by(|a, b| b.rank.cmp(&a.rank));
}
