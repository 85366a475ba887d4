//! Win-probability model: (position, hand_rank) -> probability -> value.
//!
//! The backing table is read once and never mutated, so one model can be
//! shared across threads by reference. Lookups degrade in a fixed order:
//! exact tuple, first three parts, first two parts (category and primary
//! rank), a per-position category default, then a conservative constant.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::hand::{Hand, Position};
use crate::score::{Category, HandRank};

/// Probability used when every fallback tier misses.
pub const MISS_PROBABILITY: f64 = 0.001;

/// How a hand's value is derived from its win probability and points.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// probability x points
    #[default]
    ExpectedValue,
    /// probability alone
    WinProbability,
    /// points alone, as if every hand wins
    Points,
}

/// Which tier answered a lookup.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LookupTier {
    Exact,
    Truncated3,
    Truncated2,
    CategoryDefault,
    Miss,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Lookup {
    pub probability: f64,
    pub tier: LookupTier,
}

/// One row of the table.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProbabilityEntry {
    pub position: Position,
    pub rank: HandRank,
    pub wins: u64,
    pub total: u64,
    pub probability: f64,
}

// Category defaults, indexed by category code - 1. Non-decreasing per position.
const BACK_DEFAULTS: [f64; 16] = [
    0.02, 0.08, 0.18, 0.30, 0.42, 0.52, 0.66, 0.84, 0.90, 0.93, 0.95, 0.96, 0.97, 0.98, 0.99, 0.995,
];
const MIDDLE_DEFAULTS: [f64; 16] = [
    0.05, 0.20, 0.45, 0.62, 0.72, 0.80, 0.88, 0.95, 0.97, 0.98, 0.985, 0.99, 0.993, 0.996, 0.998,
    0.999,
];
const FRONT_DEFAULTS: [f64; 16] = [
    0.12, 0.45, 0.58, 0.89, 0.93, 0.95, 0.97, 0.99, 0.995, 0.998, 0.999, 0.999, 0.999, 0.999,
    0.999, 0.999,
];

/// Hard-coded probability for `category` in `position`.
pub fn category_default(position: Position, category: Category) -> f64 {
    let table = match position {
        Position::Back => &BACK_DEFAULTS,
        Position::Middle => &MIDDLE_DEFAULTS,
        Position::Front => &FRONT_DEFAULTS,
    };
    table[(category.code() - 1) as usize]
}

/// Points paid for winning `position` with a hand of `category` and `len` cards.
pub fn points(category: Category, len: usize, position: Position) -> f64 {
    use Category::*;
    let p = match position {
        Position::Front => match category {
            ThreeOfAKind if len == 3 => 3,
            Straight | Flush => 4,
            FullHouse => 5,
            FourOfAKind => 12,
            StraightFlush => 15,
            FiveOfAKind => 18,
            _ => 1,
        },
        Position::Middle => match category {
            FullHouse => 2,
            FourOfAKind => 8,
            StraightFlush => 10,
            FiveOfAKind => 12,
            SixCardStraightFlush => 16,
            SixOfAKind => 20,
            SevenCardStraightFlush => 22,
            SevenOfAKind => 28,
            _ => 1,
        },
        Position::Back => match category {
            FourOfAKind => 4,
            StraightFlush => 5,
            FiveOfAKind => 6,
            SixCardStraightFlush => 8,
            SixOfAKind => 10,
            SevenCardStraightFlush => 11,
            SevenOfAKind | EightCardStraightFlush => 14,
            EightOfAKind => 18,
            _ => 1,
        },
    };
    p as f64
}

#[derive(Debug, Clone)]
pub struct WinProbabilityModel {
    table: HashMap<(Position, HandRank), f64>,
    strategy: ScoringStrategy,
}

impl WinProbabilityModel {
    /// Later entries for the same key replace earlier ones.
    pub fn new<I: IntoIterator<Item = ProbabilityEntry>>(entries: I, strategy: ScoringStrategy) -> Self {
        let table = entries
            .into_iter()
            .map(|e| ((e.position, e.rank), e.probability.clamp(0.0, 1.0)))
            .collect();
        Self { table, strategy }
    }

    /// Model with no table; every lookup lands on the category default.
    pub fn fallback_only(strategy: ScoringStrategy) -> Self {
        Self { table: HashMap::new(), strategy }
    }

    pub fn from_csv_str(text: &str, strategy: ScoringStrategy) -> Result<Self, TableError> {
        Ok(Self::new(parse_table(text)?, strategy))
    }

    pub fn load<P: AsRef<Path>>(path: P, strategy: ScoringStrategy) -> Result<Self, TableError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| TableError::Io(path.to_path_buf(), e))?;
        let model = Self::from_csv_str(&text, strategy)?;
        log::info!("loaded {} probability entries from {}", model.len(), path.display());
        Ok(model)
    }

    #[inline(always)]
    pub fn strategy(&self) -> ScoringStrategy {
        self.strategy
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn lookup(&self, position: Position, rank: &HandRank) -> Lookup {
        let tiers = [
            (rank.len(), LookupTier::Exact),
            (3, LookupTier::Truncated3),
            (2, LookupTier::Truncated2),
        ];
        for (n, tier) in tiers {
            if n > rank.len() {
                continue;
            }
            if let Some(&p) = self.table.get(&(position, rank.truncated(n))) {
                return Lookup { probability: p, tier };
            }
        }
        match rank.category() {
            Some(cat) => Lookup {
                probability: category_default(position, cat),
                tier: LookupTier::CategoryDefault,
            },
            None => {
                log::debug!("probability lookup miss for {position} {rank}");
                Lookup { probability: MISS_PROBABILITY, tier: LookupTier::Miss }
            }
        }
    }

    #[inline]
    pub fn win_probability(&self, position: Position, rank: &HandRank) -> f64 {
        self.lookup(position, rank).probability
    }

    /// Win probability x points, whatever the strategy.
    pub fn expected_value(&self, position: Position, hand: &Hand) -> f64 {
        self.win_probability(position, &hand.rank) * points(hand.category, hand.len(), position)
    }

    /// The quantity the search maximises, per the configured strategy.
    pub fn value(&self, position: Position, hand: &Hand) -> f64 {
        match self.strategy {
            ScoringStrategy::ExpectedValue => self.expected_value(position, hand),
            ScoringStrategy::WinProbability => self.win_probability(position, &hand.rank),
            ScoringStrategy::Points => points(hand.category, hand.len(), position),
        }
    }
}

/// Parse table text. Malformed rows are logged and skipped; rows with a zero
/// sample total are dropped silently. A table with nothing usable is an error.
pub fn parse_table(text: &str) -> Result<Vec<ProbabilityEntry>, TableError> {
    let mut entries = Vec::new();
    let mut skipped = 0usize;
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || (i == 0 && line.to_ascii_lowercase().starts_with("position")) {
            continue;
        }
        match parse_row(i + 1, line) {
            Ok(Some(e)) => entries.push(e),
            Ok(None) => {}
            Err(e) => {
                skipped += 1;
                log::warn!("skipping probability row: {e}");
            }
        }
    }
    if entries.is_empty() {
        return Err(TableError::Empty);
    }
    if skipped > 0 {
        log::warn!("{skipped} malformed probability rows skipped");
    }
    Ok(entries)
}

fn parse_row(line_no: usize, line: &str) -> Result<Option<ProbabilityEntry>, TableError> {
    let err = |reason: &str| TableError::Parse { line: line_no, reason: reason.to_string() };

    let fields = split_csv(line);
    if fields.len() < 5 {
        return Err(err("expected 5 fields"));
    }
    let position = Position::from_name(&fields[0]).ok_or_else(|| err("unknown position"))?;
    let rank = parse_tuple(&fields[1]).ok_or_else(|| err("bad hand_rank tuple"))?;
    let wins: u64 = fields[2].trim().parse().map_err(|_| err("bad wins"))?;
    let total: u64 = fields[3].trim().parse().map_err(|_| err("bad total"))?;
    let probability: f64 = fields[4].trim().parse().map_err(|_| err("bad probability"))?;
    if !probability.is_finite() {
        return Err(err("probability is not finite"));
    }
    if total == 0 {
        return Ok(None);
    }
    Ok(Some(ProbabilityEntry {
        position,
        rank,
        wins,
        total,
        probability: probability.clamp(0.0, 1.0),
    }))
}

/// Comma split that keeps commas inside double quotes.
fn split_csv(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut quoted = false;
    for ch in line.chars() {
        match ch {
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut cur)),
            _ => cur.push(ch),
        }
    }
    fields.push(cur);
    fields
}

/// `(2, 14, 9)` -> HandRank.
fn parse_tuple(s: &str) -> Option<HandRank> {
    let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
    let parts: Option<Vec<u8>> = inner
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.parse().ok())
        .collect();
    HandRank::from_parts(&parts?)
}
