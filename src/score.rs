//! Hand categories and the hand_rank tuple.
//!
//! A `HandRank` is an ordered tuple: category code first, then tie-break
//! values (2..14). Tuples compare lexicographically with missing trailing
//! parts treated as 0, so `(2, 14)` sits below `(2, 14, 9)`.
//!
//! Packed layout: the 8 parts as big-endian bytes of a u64, unused parts 0.
//! Comparing the packed integers is the lexicographic comparison.

use std::cmp::Ordering;
use std::fmt;

/// Hand categories (higher is better). The discriminant is the tuple code.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Category {
    HighCard = 1,
    Pair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    FiveOfAKind = 10,
    SixCardStraightFlush = 11,
    SixOfAKind = 12,
    SevenCardStraightFlush = 13,
    SevenOfAKind = 14,
    EightCardStraightFlush = 15,
    EightOfAKind = 16,
}

impl Category {
    pub const ALL: [Category; 16] = [
        Category::HighCard,
        Category::Pair,
        Category::TwoPair,
        Category::ThreeOfAKind,
        Category::Straight,
        Category::Flush,
        Category::FullHouse,
        Category::FourOfAKind,
        Category::StraightFlush,
        Category::FiveOfAKind,
        Category::SixCardStraightFlush,
        Category::SixOfAKind,
        Category::SevenCardStraightFlush,
        Category::SevenOfAKind,
        Category::EightCardStraightFlush,
        Category::EightOfAKind,
    ];

    #[inline(always)]
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Category> {
        if code >= 1 && code <= 16 {
            Some(Self::ALL[(code - 1) as usize])
        } else {
            None
        }
    }

    /// `n` cards of one rank: 1 = high card .. 8 = eight of a kind.
    pub const fn of_a_kind(n: usize) -> Option<Category> {
        match n {
            1 => Some(Category::HighCard),
            2 => Some(Category::Pair),
            3 => Some(Category::ThreeOfAKind),
            4 => Some(Category::FourOfAKind),
            5 => Some(Category::FiveOfAKind),
            6 => Some(Category::SixOfAKind),
            7 => Some(Category::SevenOfAKind),
            8 => Some(Category::EightOfAKind),
            _ => None,
        }
    }

    /// A straight flush of exactly `len` cards.
    pub const fn straight_flush(len: usize) -> Option<Category> {
        match len {
            5 => Some(Category::StraightFlush),
            6 => Some(Category::SixCardStraightFlush),
            7 => Some(Category::SevenCardStraightFlush),
            8 => Some(Category::EightCardStraightFlush),
            _ => None,
        }
    }

    pub const fn is_straight_flush(self) -> bool {
        matches!(
            self,
            Category::StraightFlush
                | Category::SixCardStraightFlush
                | Category::SevenCardStraightFlush
                | Category::EightCardStraightFlush
        )
    }

    pub const fn is_of_a_kind(self) -> bool {
        matches!(
            self,
            Category::Pair
                | Category::ThreeOfAKind
                | Category::FourOfAKind
                | Category::FiveOfAKind
                | Category::SixOfAKind
                | Category::SevenOfAKind
                | Category::EightOfAKind
        )
    }

    /// Card count for categories that only exist at one size (5+ of a kind and
    /// every straight flush).
    pub const fn natural_len(self) -> Option<usize> {
        match self {
            Category::FiveOfAKind | Category::StraightFlush => Some(5),
            Category::SixOfAKind | Category::SixCardStraightFlush => Some(6),
            Category::SevenOfAKind | Category::SevenCardStraightFlush => Some(7),
            Category::EightOfAKind | Category::EightCardStraightFlush => Some(8),
            _ => None,
        }
    }
}

/// Ordered hand-strength tuple; at most 8 parts.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct HandRank {
    parts: [u8; 8],
    len: u8,
}

impl HandRank {
    pub const MAX_LEN: usize = 8;

    /// Category followed by tie-break values. Values beyond 7 are dropped.
    pub fn new(category: Category, values: &[u8]) -> Self {
        let mut parts = [0u8; 8];
        parts[0] = category.code();
        let n = values.len().min(Self::MAX_LEN - 1);
        parts[1..=n].copy_from_slice(&values[..n]);
        Self { parts, len: (n + 1) as u8 }
    }

    /// Raw tuple, e.g. from a probability table row. `None` if empty or too long.
    pub fn from_parts(raw: &[u8]) -> Option<Self> {
        if raw.is_empty() || raw.len() > Self::MAX_LEN {
            return None;
        }
        let mut parts = [0u8; 8];
        parts[..raw.len()].copy_from_slice(raw);
        Some(Self { parts, len: raw.len() as u8 })
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.parts[..self.len as usize]
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn code(&self) -> u8 {
        self.parts[0]
    }

    pub fn category(&self) -> Option<Category> {
        Category::from_code(self.parts[0])
    }

    /// First `n` parts (or the whole tuple if shorter).
    pub fn truncated(&self, n: usize) -> HandRank {
        let n = n.clamp(1, self.len());
        let mut parts = [0u8; 8];
        parts[..n].copy_from_slice(&self.parts[..n]);
        Self { parts, len: n as u8 }
    }

    #[inline(always)]
    pub fn packed(&self) -> u64 {
        u64::from_be_bytes(self.parts)
    }
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.packed().cmp(&other.packed()).then(self.len.cmp(&other.len))
    }
}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Renders as `(2, 14, 9)`, the form used by probability tables.
impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, p) in self.as_slice().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        f.write_str(")")
    }
}
