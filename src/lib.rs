//! Optimal arrangement engine for a 17-card, three-hand poker layout.
//!
//! A deal is split into back, middle and front hands. The engine detects
//! every scoring hand, values it per position, and searches for the legal
//! triple with the highest total. Up to two wild slots are resolved by
//! trying candidate faces.

pub mod card;
pub mod counts;
pub mod lut13;
pub mod score;
pub mod evaluator;
pub mod hand;
pub mod detector;
pub mod probability;
pub mod wild;
pub mod arrangement;
pub mod search;
pub mod solver;
pub mod batch;
pub mod config;
pub mod error;

pub use card::{parse_cards, Card, Deal, Dealt, Rank, Suit};
pub use counts::CardCounts;
pub use lut13::MASK13;
pub use score::{Category, HandRank};
pub use evaluator::{evaluate, Evaluation};
pub use hand::{Hand, Position, PositionSet};
pub use detector::{searchable_hands, HandDetector};
pub use probability::{ScoringStrategy, WinProbabilityModel};
pub use wild::{
    brute_force_one, brute_force_two, TrackedCategory, WildCandidate, WildCandidateGenerator, WildPair,
};
pub use arrangement::{Arrangement, Violation};
pub use search::{search, SearchLimits, SearchOutcome, SearchStatistics};
pub use solver::{Solution, Solver};
pub use config::{SolverConfig, WildResolution};
pub use error::{ArrangeError, ConfigError, TableError};
