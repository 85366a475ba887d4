//! Hand evaluation for 1..8 concrete cards.
//!
//! Same approach as a bitboard evaluator: build rank counts, derive
//! multiplicity masks, decide the category from the masks, then emit the
//! hand_rank tuple. Hands of 6..8 cards only exist as a natural of-a-kind or
//! straight flush of exactly that size; anything else is not a hand.

use crate::card::{Card, Suit};
use crate::counts::CardCounts;
use crate::lut13::{hibit13, popcnt13, run_high13};
use crate::score::{Category, HandRank};

/// Category plus tuple of an evaluated card set.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Evaluation {
    pub category: Category,
    pub rank: HandRank,
}

impl Evaluation {
    #[inline(always)]
    fn new(category: Category, values: &[u8]) -> Self {
        Self { category, rank: HandRank::new(category, values) }
    }
}

/// Game values (2..14) of the ranks in `m`, highest first.
#[inline(always)]
fn values_desc(mut m: u16) -> impl Iterator<Item = u8> {
    std::iter::from_fn(move || {
        let hi = hibit13(m);
        if hi < 0 {
            return None;
        }
        m &= !(1u16 << (hi as u16));
        Some(hi as u8 + 2)
    })
}

#[inline(always)]
fn top_value(m: u16) -> u8 {
    (hibit13(m).max(0) as u8) + 2
}

/// Evaluate `cards` as one hand. `None` for an empty set, more than 8 cards,
/// or a 6..8 card set that is not a natural of-a-kind or straight flush.
pub fn evaluate(cards: &[Card]) -> Option<Evaluation> {
    let n = cards.len();
    if n == 0 || n > 8 {
        return None;
    }

    let counts = CardCounts::from_cards(cards);
    let ranks = counts.rank_mask();
    let distinct = popcnt13(ranks) as usize;
    let suited = Suit::ALL.iter().any(|&s| counts.suit_count(s) == n);

    // One rank: high card through eight of a kind
    if distinct == 1 {
        let cat = Category::of_a_kind(n)?;
        return Some(Evaluation::new(cat, &[top_value(ranks)]));
    }

    // Straight flush of any length 5..8
    if n >= 5 && suited && distinct == n {
        let high = run_high13(ranks);
        if high >= 0 {
            let cat = Category::straight_flush(n)?;
            let high = high as u8 + 2;
            return Some(Evaluation::new(cat, &[high, high - 1]));
        }
    }

    if n >= 6 {
        return None;
    }

    let ge4 = counts.at_least(4);
    let trips = counts.exactly(3);
    let pairs = counts.exactly(2);
    let singles = counts.exactly(1);

    if ge4 != 0 {
        let mut v = vec![top_value(ge4)];
        v.extend(values_desc(singles));
        return Some(Evaluation::new(Category::FourOfAKind, &v));
    }

    if trips != 0 && pairs != 0 {
        return Some(Evaluation::new(Category::FullHouse, &[top_value(trips), top_value(pairs)]));
    }

    if n == 5 {
        if suited {
            let mut v: Vec<u8> = cards.iter().map(|c| c.value()).collect();
            v.sort_unstable_by(|a, b| b.cmp(a));
            return Some(Evaluation::new(Category::Flush, &v));
        }
        if distinct == 5 {
            let high = run_high13(ranks);
            if high >= 0 {
                let high = high as u8 + 2;
                return Some(Evaluation::new(Category::Straight, &[high, high - 1]));
            }
        }
    }

    if trips != 0 {
        let mut v = vec![top_value(trips)];
        v.extend(values_desc(singles));
        return Some(Evaluation::new(Category::ThreeOfAKind, &v));
    }

    if popcnt13(pairs) >= 2 {
        let mut v: Vec<u8> = values_desc(pairs).take(2).collect();
        v.extend(values_desc(singles));
        return Some(Evaluation::new(Category::TwoPair, &v));
    }

    if pairs != 0 {
        let mut v = vec![top_value(pairs)];
        v.extend(values_desc(singles));
        return Some(Evaluation::new(Category::Pair, &v));
    }

    let v: Vec<u8> = values_desc(singles).collect();
    Some(Evaluation::new(Category::HighCard, &v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::parse_cards;

    fn eval(s: &str) -> Option<Evaluation> {
        evaluate(&parse_cards(s).unwrap())
    }

    fn tuple(s: &str) -> Vec<u8> {
        eval(s).unwrap().rank.as_slice().to_vec()
    }

    #[test]
    fn categories_basic() {
        assert_eq!(eval("T♠ J♠ Q♠ K♠ A♠").unwrap().category, Category::StraightFlush);
        assert_eq!(tuple("2c 2d 2h 2s Ac"), vec![8, 2, 14]);
        assert_eq!(tuple("Ac 2d 3h 4s 5c"), vec![5, 5, 4]);
        assert_eq!(tuple("9h 9d 9c 4s 4c"), vec![7, 9, 4]);
        assert_eq!(tuple("Kh Kd 7c 7s 2c"), vec![3, 13, 7, 2]);
        assert_eq!(tuple("Qh Qd 9c 3s 2c"), vec![2, 12, 9, 3, 2]);
        assert_eq!(tuple("Ah Jd 9c 3s 2c"), vec![1, 14, 11, 9, 3, 2]);
    }

    #[test]
    fn incomplete_hands() {
        assert_eq!(tuple("A♠"), vec![1, 14]);
        assert_eq!(tuple("Q♠ Q♦"), vec![2, 12]);
        assert_eq!(tuple("8c 8d 8h"), vec![4, 8]);
        assert_eq!(tuple("8c 8d 8h 8s"), vec![8, 8]);
        assert_eq!(tuple("Kc Kd 4h 4s"), vec![3, 13, 4]);
        assert_eq!(tuple("Kc Kd 4h"), vec![2, 13, 4]);
    }

    #[test]
    fn double_deck_flush_with_pair_is_a_flush() {
        let e = eval("A♠ A♠ K♠ 9♠ 4♠").unwrap();
        assert_eq!(e.category, Category::Flush);
        assert_eq!(e.rank.as_slice(), &[6, 14, 14, 13, 9, 4]);
    }

    #[test]
    fn large_hands_must_be_natural() {
        assert_eq!(eval("7c 7d 7h 7s 7c 7d").unwrap().category, Category::SixOfAKind);
        assert_eq!(
            eval("3h 4h 5h 6h 7h 8h 9h 10h").unwrap().category,
            Category::EightCardStraightFlush
        );
        assert_eq!(tuple("Ah 2h 3h 4h 5h 6h"), vec![11, 6, 5]);
        // five of a kind plus a kicker is not a hand
        assert!(eval("7c 7d 7h 7s 7c 2d").is_none());
        // run of six in mixed suits is not a hand
        assert!(eval("3h 4h 5h 6h 7h 8d").is_none());
        assert!(evaluate(&[]).is_none());
    }

    #[test]
    fn five_of_a_kind_beats_straight_flush() {
        let five = eval("Jc Jd Jh Js Jc").unwrap();
        let sf = eval("T♠ J♠ Q♠ K♠ A♠").unwrap();
        assert_eq!(five.category, Category::FiveOfAKind);
        assert!(five.rank > sf.rank);
    }
}
