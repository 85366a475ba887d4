//! Completed back/middle/front triples: kicker filling and rule checks.

use thiserror::Error;

use crate::card::Card;
use crate::hand::{Hand, Position};
use crate::score::Category;

/// A broken arrangement rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{0} and {1} hands share card id {2}")]
    SharedCard(Position, Position, u16),

    #[error("{0} hand has {1} cards")]
    IllegalSize(Position, usize),

    #[error("{stronger} hand ranks below the {weaker} hand")]
    OutOfOrder { stronger: Position, weaker: Position },

    #[error("{0} hand of {1} cards is not a natural of-a-kind or straight flush")]
    NotNatural(Position, usize),

    #[error("five-card front hand ranks below a straight")]
    WeakFrontFive,

    #[error("not enough unused cards to complete the hands")]
    ShortOfKickers,
}

/// A legal arrangement of one deal.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrangement {
    pub back: Hand,
    pub middle: Hand,
    pub front: Hand,
    /// Sum of `breakdown`.
    pub score: f64,
    /// Value credited to back, middle, front (indexed by `Position::idx`).
    pub breakdown: [f64; 3],
    /// Cards of the deal left out of all three hands.
    pub leftover: Vec<Card>,
}

impl Arrangement {
    pub fn hand(&self, position: Position) -> &Hand {
        match position {
            Position::Back => &self.back,
            Position::Middle => &self.middle,
            Position::Front => &self.front,
        }
    }

    pub fn validate(&self) -> Result<(), Violation> {
        validate(&self.back, &self.middle, &self.front)
    }

    pub fn card_ids(&self) -> impl Iterator<Item = u16> + '_ {
        Position::ALL.into_iter().flat_map(|p| self.hand(p).cards.iter().map(|c| c.id))
    }
}

/// Check every arrangement rule on three completed hands.
pub fn validate(back: &Hand, middle: &Hand, front: &Hand) -> Result<(), Violation> {
    let hands = [(Position::Back, back), (Position::Middle, middle), (Position::Front, front)];

    for (i, &(pa, a)) in hands.iter().enumerate() {
        for &(pb, b) in &hands[i + 1..] {
            if let Some(c) = a.cards.iter().find(|c| b.cards.iter().any(|d| d.id == c.id)) {
                return Err(Violation::SharedCard(pa, pb, c.id));
            }
        }
    }

    for &(pos, h) in &hands {
        let len = h.len();
        if !pos.legal_sizes().contains(&len) {
            return Err(Violation::IllegalSize(pos, len));
        }
        if len >= 6 && h.category.natural_len() != Some(len) {
            return Err(Violation::NotNatural(pos, len));
        }
    }

    if front.len() == 5 && front.category < Category::Straight {
        return Err(Violation::WeakFrontFive);
    }

    if back.rank < middle.rank {
        return Err(Violation::OutOfOrder { stronger: Position::Back, weaker: Position::Middle });
    }
    if middle.rank < front.rank {
        return Err(Violation::OutOfOrder { stronger: Position::Middle, weaker: Position::Front });
    }
    Ok(())
}

/// Fill incomplete hands with unused deal cards, back first, then middle,
/// then front. Highest cards go first, and a kicker that would pair a rank
/// already in the hand is used only when nothing else is left. Returns the
/// re-evaluated hands and the leftover cards, or `None` if the deal runs out
/// or a filled hand no longer evaluates.
pub fn complete(
    deal: &[Card],
    back: &Hand,
    middle: &Hand,
    front: &Hand,
) -> Option<([Hand; 3], Vec<Card>)> {
    let mut used = back.mask | middle.mask | front.mask;
    let mut pool: Vec<usize> = (0..deal.len()).filter(|&i| used & (1u64 << i) == 0).collect();
    pool.sort_by(|&a, &b| deal[b].value().cmp(&deal[a].value()));

    let mut fill = |pos: Position, hand: &Hand| -> Option<Hand> {
        let need = hand.completed_len(pos).saturating_sub(hand.len());
        if need == 0 {
            return Some(hand.clone());
        }
        let mut cards = hand.cards.clone();
        let mut mask = hand.mask;
        for _ in 0..need {
            let fresh = pool
                .iter()
                .position(|&i| used & (1u64 << i) == 0 && cards.iter().all(|c| c.rank != deal[i].rank));
            let any = || pool.iter().position(|&i| used & (1u64 << i) == 0);
            let k = fresh.or_else(any)?;
            let i = pool[k];
            used |= 1u64 << i;
            mask |= 1u64 << i;
            cards.push(deal[i]);
        }
        Hand::with_mask(cards, mask)
    };

    let b = fill(Position::Back, back)?;
    let m = fill(Position::Middle, middle)?;
    let f = fill(Position::Front, front)?;

    let leftover = pool.iter().filter(|&&i| used & (1u64 << i) == 0).map(|&i| deal[i]).collect();
    Some(([b, m, f], leftover))
}

/// Complete, validate and package a scored triple.
pub fn assemble(
    deal: &[Card],
    hands: [&Hand; 3],
    breakdown: [f64; 3],
) -> Result<Arrangement, Violation> {
    let ([back, middle, front], leftover) =
        complete(deal, hands[0], hands[1], hands[2]).ok_or(Violation::ShortOfKickers)?;
    validate(&back, &middle, &front)?;
    Ok(Arrangement {
        back,
        middle,
        front,
        score: breakdown.iter().sum(),
        breakdown,
        leftover,
    })
}
