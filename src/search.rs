//! Branch-and-bound search for the best back/middle/front triple.
//!
//! `search` is a pure function of its inputs: the best-so-far and counters
//! live on its stack, so independent calls can run on any thread.
//!
//! Loop order follows the strength sort: back at index b, middle at m >= b,
//! front at f >= m, so a later position is never stronger by detected rank.
//! Before the front loop, the pair (b, m) is pruned when its value plus the
//! best front value at any index >= m cannot beat the current best. That
//! bound is a suffix maximum of the scored front values themselves, so it
//! holds for any scoring strategy.

use std::time::Instant;

use crate::arrangement::{assemble, Arrangement};
use crate::card::Card;
use crate::error::ArrangeError;
use crate::hand::{Hand, Position};
use crate::probability::WinProbabilityModel;

/// Early-exit ceilings. `None` means unbounded.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchLimits {
    /// Stop after this many explored front nodes.
    pub node_budget: Option<u64>,
    /// Stop as soon as a legal arrangement scores at least this much.
    pub score_ceiling: Option<f64>,
}

impl SearchLimits {
    pub const UNBOUNDED: SearchLimits = SearchLimits { node_budget: None, score_ceiling: None };
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self { node_budget: Some(crate::config::DEFAULT_NODE_BUDGET), score_ceiling: None }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SearchStatistics {
    /// Complete (back, middle, front) triples scored.
    pub explored_nodes: u64,
    /// (back, middle) pairs whose front loop was skipped by the bound.
    pub pruned_nodes: u64,
    /// Improving triples that failed kicker completion or validation.
    pub rejected: u64,
    pub search_time_ms: f64,
    /// A node budget or score ceiling ended the search before it was exhaustive.
    pub terminated_early: bool,
}

impl SearchStatistics {
    /// Fold another run's counters into this one.
    pub fn absorb(&mut self, other: &SearchStatistics) {
        self.explored_nodes += other.explored_nodes;
        self.pruned_nodes += other.pruned_nodes;
        self.rejected += other.rejected;
        self.search_time_ms += other.search_time_ms;
        self.terminated_early |= other.terminated_early;
    }
}

/// Result of one search. A missing arrangement is the failure result.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub arrangement: Option<Arrangement>,
    pub score: f64,
    pub statistics: SearchStatistics,
}

impl SearchOutcome {
    pub fn failed(statistics: SearchStatistics) -> Self {
        Self { arrangement: None, score: 0.0, statistics }
    }

    #[inline(always)]
    pub fn is_success(&self) -> bool {
        self.arrangement.is_some()
    }

    pub fn failure(&self) -> Option<ArrangeError> {
        match self.arrangement {
            Some(_) => None,
            None => Some(ArrangeError::NoLegalArrangement),
        }
    }

    pub fn into_result(self) -> Result<Arrangement, ArrangeError> {
        self.arrangement.ok_or(ArrangeError::NoLegalArrangement)
    }
}

/// Search `hands` (strongest first, detected from `deal`) for the best
/// legal arrangement under `model`.
pub fn search(
    hands: &[Hand],
    deal: &[Card],
    model: &WinProbabilityModel,
    limits: SearchLimits,
) -> SearchOutcome {
    let start = Instant::now();
    let n = hands.len();
    let mut stats = SearchStatistics::default();

    // value of each hand per position; None where ineligible
    let values: Vec<[Option<f64>; 3]> = hands
        .iter()
        .map(|h| {
            let mut v = [None; 3];
            for p in h.positions.iter() {
                v[p.idx()] = Some(model.value(p, h));
            }
            v
        })
        .collect();

    let mut front_best = vec![f64::NEG_INFINITY; n + 1];
    for i in (0..n).rev() {
        let here = values[i][Position::Front.idx()].unwrap_or(f64::NEG_INFINITY);
        front_best[i] = front_best[i + 1].max(here);
    }

    let budget_hit = |s: &SearchStatistics| limits.node_budget.is_some_and(|b| s.explored_nodes >= b);
    let ceiling_hit = |score: f64| limits.score_ceiling.is_some_and(|c| score >= c);

    let mut best_score = f64::NEG_INFINITY;
    let mut best: Option<Arrangement> = None;

    'back: for b in 0..n {
        let Some(vb) = values[b][Position::Back.idx()] else { continue };
        let back = &hands[b];

        for m in b..n {
            let Some(vm) = values[m][Position::Middle.idx()] else { continue };
            let middle = &hands[m];
            if middle.overlaps(back) {
                continue;
            }
            if vb + vm + front_best[m] <= best_score {
                stats.pruned_nodes += 1;
                continue;
            }

            for f in m..n {
                let Some(vf) = values[f][Position::Front.idx()] else { continue };
                let front = &hands[f];
                if front.overlaps(back) || front.overlaps(middle) {
                    continue;
                }
                let size = back.completed_len(Position::Back)
                    + middle.completed_len(Position::Middle)
                    + front.completed_len(Position::Front);
                if size > deal.len() {
                    continue;
                }

                stats.explored_nodes += 1;
                let total = vb + vm + vf;
                if total > best_score {
                    match assemble(deal, [back, middle, front], [vb, vm, vf]) {
                        Ok(arr) => {
                            log::trace!("new best {total:.4}: {back} | {middle} | {front}");
                            best_score = total;
                            best = Some(arr);
                            if ceiling_hit(best_score) {
                                stats.terminated_early = true;
                                break 'back;
                            }
                        }
                        Err(v) => {
                            log::trace!("rejected {back} | {middle} | {front}: {v}");
                            stats.rejected += 1;
                        }
                    }
                }
                if budget_hit(&stats) {
                    stats.terminated_early = true;
                    break 'back;
                }
            }
        }
    }

    stats.search_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    // Re-check before handing anything out.
    if let Some(arr) = &best {
        if let Err(v) = arr.validate() {
            log::warn!("discarding invalid arrangement: {v}");
            best = None;
        }
    }

    log::debug!(
        "search over {} hands: explored {}, pruned {}, rejected {}, {:.3} ms{}",
        n,
        stats.explored_nodes,
        stats.pruned_nodes,
        stats.rejected,
        stats.search_time_ms,
        if stats.terminated_early { " (early exit)" } else { "" }
    );

    match best {
        Some(arr) => SearchOutcome { score: arr.score, arrangement: Some(arr), statistics: stats },
        None => SearchOutcome::failed(stats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::parse_cards;
    use crate::detector::searchable_hands;
    use crate::probability::ScoringStrategy;
    use crate::score::Category;
    use std::collections::HashSet;

    const DEAL: &str = "Ac Ad Ah As Kc Kd Kh 2c 3d 4h 5s 6c 7d 8h 9s 10c Jd";

    fn run(deal: &str, strategy: ScoringStrategy, limits: SearchLimits) -> SearchOutcome {
        let cards = parse_cards(deal).unwrap();
        let hands = searchable_hands(&cards);
        search(&hands, &cards, &WinProbabilityModel::fallback_only(strategy), limits)
    }

    fn assert_legal(arr: &Arrangement) {
        let ids: Vec<u16> = arr.card_ids().collect();
        let unique: HashSet<u16> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len(), "hands must be disjoint");
        assert!([5, 6, 7, 8].contains(&arr.back.len()));
        assert!([5, 6, 7].contains(&arr.middle.len()));
        assert!([3, 5].contains(&arr.front.len()));
        assert!(arr.back.rank >= arr.middle.rank);
        assert!(arr.middle.rank >= arr.front.rank);
        for p in Position::ALL {
            let h = arr.hand(p);
            if h.len() >= 6 {
                assert_eq!(h.category.natural_len(), Some(h.len()));
            }
        }
        if arr.front.len() == 5 {
            assert!(arr.front.category >= Category::Straight);
        }
    }

    #[test]
    fn finds_a_legal_arrangement() {
        let out = run(DEAL, ScoringStrategy::ExpectedValue, SearchLimits::UNBOUNDED);
        let arr = out.arrangement.as_ref().unwrap();
        assert_legal(arr);
        assert_eq!(arr.card_ids().count() + arr.leftover.len(), 17);
        assert!((arr.score - arr.breakdown.iter().sum::<f64>()).abs() < 1e-12);
        assert!(!out.statistics.terminated_early);
        assert!(out.statistics.explored_nodes > 0);
    }

    #[test]
    fn points_strategy_plays_quads_in_front_behind_stronger_hands() {
        // straight flush back, four kings middle, four aces front is illegal
        // (front above middle), so aces go middle and kings front.
        let deal = "Ac Ad Ah As Kc Kd Kh Ks 5h 6h 7h 8h 9h 2c 3d Jd Qs";
        let out = run(deal, ScoringStrategy::Points, SearchLimits::UNBOUNDED);
        let arr = out.arrangement.unwrap();
        assert_legal(&arr);
        assert_eq!(arr.back.category, Category::StraightFlush);
        assert_eq!(arr.middle.category, Category::FourOfAKind);
        assert_eq!(arr.middle.rank.as_slice()[1], 14);
        assert_eq!(arr.front.category, Category::FourOfAKind);
        assert_eq!(arr.front.rank.as_slice()[1], 13);
        // back SF 5 + middle 4K 8 + front 4K 12
        assert_eq!(out.score, 25.0);
    }

    #[test]
    fn pruning_does_not_change_the_optimum() {
        let pruned = run(DEAL, ScoringStrategy::ExpectedValue, SearchLimits::UNBOUNDED);
        // brute force: every triple, no bound
        let cards = parse_cards(DEAL).unwrap();
        let hands = searchable_hands(&cards);
        let model = WinProbabilityModel::fallback_only(ScoringStrategy::ExpectedValue);
        let mut best = f64::NEG_INFINITY;
        for (b, back) in hands.iter().enumerate() {
            if !back.positions.contains(Position::Back) {
                continue;
            }
            for (m, middle) in hands.iter().enumerate().skip(b) {
                if !middle.positions.contains(Position::Middle) || middle.overlaps(back) {
                    continue;
                }
                for front in hands.iter().skip(m) {
                    if !front.positions.contains(Position::Front)
                        || front.overlaps(back)
                        || front.overlaps(middle)
                    {
                        continue;
                    }
                    let vals = [
                        model.value(Position::Back, back),
                        model.value(Position::Middle, middle),
                        model.value(Position::Front, front),
                    ];
                    if let Ok(arr) = assemble(&cards, [back, middle, front], vals) {
                        best = best.max(arr.score);
                    }
                }
            }
        }
        assert!((pruned.score - best).abs() < 1e-9);
        assert!(pruned.statistics.pruned_nodes > 0);
    }

    #[test]
    fn node_budget_is_reported() {
        let limits = SearchLimits { node_budget: Some(3), score_ceiling: None };
        let out = run(DEAL, ScoringStrategy::ExpectedValue, limits);
        assert!(out.statistics.terminated_early);
        assert_eq!(out.statistics.explored_nodes, 3);
    }

    #[test]
    fn empty_hand_list_is_a_failed_result() {
        let model = WinProbabilityModel::fallback_only(ScoringStrategy::ExpectedValue);
        let out = search(&[], &[], &model, SearchLimits::default());
        assert!(!out.is_success());
        assert_eq!(out.failure(), Some(ArrangeError::NoLegalArrangement));
        assert_eq!(out.into_result(), Err(ArrangeError::NoLegalArrangement));
    }
}
