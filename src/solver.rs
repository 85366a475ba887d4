//! Engine entry point: one deal in, best arrangement out.
//!
//! Wild slots are resolved before scoring. Each resolution is a separate
//! concrete deal that goes through detection and search, and the best
//! successful search wins (ties keep the earlier candidate).

use std::collections::HashSet;
use std::sync::Arc;

use crate::card::{Card, Dealt};
use crate::config::{SolverConfig, WildResolution};
use crate::detector::searchable_hands;
use crate::error::{ArrangeError, ConfigError};
use crate::probability::WinProbabilityModel;
use crate::search::{search, SearchOutcome, SearchStatistics};
use crate::wild::{brute_force_one, brute_force_two, WildCandidateGenerator, WildPair};

/// Best arrangement of a deal plus how it was reached.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Winning search; its statistics are summed over every candidate.
    pub outcome: SearchOutcome,
    /// Cards the wild slots became in the winning deal.
    pub substitutions: Vec<Card>,
    /// Concrete deals searched.
    pub candidates_evaluated: usize,
}

impl Solution {
    #[inline(always)]
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    #[inline(always)]
    pub fn score(&self) -> f64 {
        self.outcome.score
    }
}

#[derive(Clone, Debug)]
pub struct Solver {
    model: Arc<WinProbabilityModel>,
    config: SolverConfig,
    wilds: WildCandidateGenerator,
}

impl Solver {
    /// # Errors
    ///
    /// Returns an error if `config` fails [`SolverConfig::validate`].
    pub fn new(model: Arc<WinProbabilityModel>, config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { model, config, wilds: WildCandidateGenerator::default() })
    }

    /// Replace the wild candidate generator (and so its tracked categories).
    pub fn with_generator(mut self, wilds: WildCandidateGenerator) -> Self {
        self.wilds = wilds;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn model(&self) -> &WinProbabilityModel {
        &self.model
    }

    /// Search one concrete deal.
    pub fn solve_concrete(&self, cards: &[Card]) -> SearchOutcome {
        let hands = searchable_hands(cards);
        search(&hands, cards, &self.model, self.config.limits())
    }

    /// Solve a deal of `deal_size` slots holding at most two wilds.
    ///
    /// # Errors
    ///
    /// `InvalidHandSize` for a wrong slot count, `DuplicateCardId` when two
    /// slots share an id, `TooManyWilds` beyond two wild slots. A deal with
    /// no legal arrangement is not an error; see [`SearchOutcome::failure`].
    pub fn solve(&self, deal: &[Dealt]) -> Result<Solution, ArrangeError> {
        if deal.len() != self.config.deal_size {
            return Err(ArrangeError::InvalidHandSize {
                expected: self.config.deal_size,
                found: deal.len(),
            });
        }
        let mut ids = HashSet::with_capacity(deal.len());
        if let Some(d) = deal.iter().find(|d| !ids.insert(d.id())) {
            return Err(ArrangeError::DuplicateCardId(d.id()));
        }

        let fixed: Vec<Card> = deal
            .iter()
            .filter_map(|d| match d {
                Dealt::Card(c) => Some(*c),
                Dealt::Wild { .. } => None,
            })
            .collect();
        let slots: Vec<u16> = deal.iter().filter(|d| d.is_wild()).map(|d| d.id()).collect();

        let solution = match slots.as_slice() {
            [] => Solution {
                outcome: self.solve_concrete(&fixed),
                substitutions: Vec::new(),
                candidates_evaluated: 1,
            },
            &[slot] => {
                let faces = match self.config.wild_resolution {
                    WildResolution::Candidates => {
                        let c = self.wilds.one_wild(&fixed, slot)?;
                        if c.is_empty() {
                            log::debug!("no improving face for the wild, trying all 52");
                            brute_force_one(slot)
                        } else {
                            c.into_iter().map(|c| c.card).collect()
                        }
                    }
                    WildResolution::BruteForce => brute_force_one(slot),
                };
                self.best_of(&fixed, faces.into_iter().map(|c| vec![c]))
            }
            &[a, b] => {
                let pairs = match self.config.wild_resolution {
                    WildResolution::Candidates => {
                        let p = self.wilds.two_wild(&fixed, (a, b))?;
                        if p.is_empty() {
                            log::debug!("no improving face pair for the wilds, trying all 1326");
                            brute_force_two((a, b))
                        } else {
                            p
                        }
                    }
                    WildResolution::BruteForce => brute_force_two((a, b)),
                };
                self.best_of(&fixed, pairs.into_iter().map(|WildPair { first, second }| vec![first, second]))
            }
            more => return Err(ArrangeError::TooManyWilds(more.len())),
        };

        log::info!(
            "solved deal with {} wild(s): {} candidate(s), score {:.4}, explored {}, {:.2} ms",
            slots.len(),
            solution.candidates_evaluated,
            solution.score(),
            solution.outcome.statistics.explored_nodes,
            solution.outcome.statistics.search_time_ms,
        );
        Ok(solution)
    }

    fn best_of<I>(&self, fixed: &[Card], substitutions: I) -> Solution
    where
        I: IntoIterator<Item = Vec<Card>>,
    {
        let mut totals = SearchStatistics::default();
        let mut best: Option<(SearchOutcome, Vec<Card>)> = None;
        let mut evaluated = 0usize;

        let mut cards = fixed.to_vec();
        for subs in substitutions {
            cards.truncate(fixed.len());
            cards.extend_from_slice(&subs);
            let outcome = self.solve_concrete(&cards);
            evaluated += 1;
            totals.absorb(&outcome.statistics);

            let better = match &best {
                None => true,
                Some((b, _)) => {
                    outcome.is_success() && (!b.is_success() || outcome.score > b.score)
                }
            };
            if better {
                best = Some((outcome, subs));
            }
        }

        match best {
            Some((mut outcome, substitutions)) => {
                outcome.statistics = totals;
                Solution { outcome, substitutions, candidates_evaluated: evaluated }
            }
            None => Solution {
                outcome: SearchOutcome::failed(totals),
                substitutions: Vec::new(),
                candidates_evaluated: 0,
            },
        }
    }
}
