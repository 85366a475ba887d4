//! Batch solving helpers.
//!
//! Deals are independent, so a batch is a plain map over `Solver::solve`.
//! The `*_sum` reductions skip collecting solutions, which keeps benchmarks
//! honest without an output buffer.

use crate::card::Dealt;
use crate::error::ArrangeError;
use crate::solver::{Solution, Solver};

/// Sequential: solve every deal, in order.
pub fn solve_all<D: AsRef<[Dealt]>>(solver: &Solver, deals: &[D]) -> Vec<Result<Solution, ArrangeError>> {
    deals.iter().map(|d| solver.solve(d.as_ref())).collect()
}

/// Sequential: sum of best scores. Failed searches and rejected deals add 0.
#[inline]
pub fn score_sum<D: AsRef<[Dealt]>>(solver: &Solver, deals: &[D]) -> f64 {
    deals
        .iter()
        .filter_map(|d| solver.solve(d.as_ref()).ok())
        .map(|s| s.score())
        .sum()
}

#[cfg(feature = "parallel")]
mod par {
    use super::*;
    use rayon::prelude::*;

    /// Parallel: solve every deal; output order matches input order.
    ///
    /// Worth it from a few dozen deals up; one solve is milliseconds.
    pub fn solve_all_par<D>(solver: &Solver, deals: &[D]) -> Vec<Result<Solution, ArrangeError>>
    where
        D: AsRef<[Dealt]> + Sync,
    {
        deals.par_iter().map(|d| solver.solve(d.as_ref())).collect()
    }

    pub fn score_sum_par<D>(solver: &Solver, deals: &[D]) -> f64
    where
        D: AsRef<[Dealt]> + Sync,
    {
        deals
            .par_iter()
            .filter_map(|d| solver.solve(d.as_ref()).ok())
            .map(|s| s.score())
            .sum()
    }
}

#[cfg(feature = "parallel")]
pub use par::{score_sum_par, solve_all_par};
