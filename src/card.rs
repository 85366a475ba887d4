//! Card types (Suit/Rank/Card) and the dealt-slot wrapper.
//!
//! Cards come from a double deck, so two cards may share rank and suit.
//! Identity is the per-deal `id`, never the face.

use std::fmt;
use std::str::FromStr;

use crate::error::ArrangeError;

/// A playing card suit.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    #[inline(always)]
    pub const fn idx(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub const fn from_u8(x: u8) -> Suit {
        match x & 0x3 {
            0 => Suit::Clubs,
            1 => Suit::Diamonds,
            2 => Suit::Hearts,
            _ => Suit::Spades,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    fn from_char(c: char) -> Option<Suit> {
        match c {
            '♣' | 'c' | 'C' => Some(Suit::Clubs),
            '♦' | 'd' | 'D' => Some(Suit::Diamonds),
            '♥' | 'h' | 'H' => Some(Suit::Hearts),
            '♠' | 's' | 'S' => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// A playing card rank.
///
/// Stored as 0..12 (Two..Ace) so it indexes a 13-bit mask directly.
/// Hand-rank tuples use the game value 2..14 instead, see [`Rank::value`].
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Rank {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    #[inline(always)]
    pub const fn idx(self) -> usize {
        self as usize
    }

    /// Game value: Two = 2 .. Ace = 14.
    #[inline(always)]
    pub const fn value(self) -> u8 {
        self as u8 + 2
    }

    /// Convert 0..12 to a Rank (Two..Ace). Out-of-range input saturates to Ace.
    #[inline(always)]
    pub const fn from_u8(x: u8) -> Rank {
        match x {
            0 => Rank::Two,
            1 => Rank::Three,
            2 => Rank::Four,
            3 => Rank::Five,
            4 => Rank::Six,
            5 => Rank::Seven,
            6 => Rank::Eight,
            7 => Rank::Nine,
            8 => Rank::Ten,
            9 => Rank::Jack,
            10 => Rank::Queen,
            11 => Rank::King,
            _ => Rank::Ace,
        }
    }

    fn from_token(s: &str) -> Option<Rank> {
        let r = match s {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" | "t" => Rank::Ten,
            "J" | "j" => Rank::Jack,
            "Q" | "q" => Rank::Queen,
            "K" | "k" => Rank::King,
            "A" | "a" => Rank::Ace,
            _ => return None,
        };
        Some(r)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

/// A concrete card. `substituted` marks a card that stands in for a wild.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Card {
    pub id: u16,
    pub rank: Rank,
    pub suit: Suit,
    pub substituted: bool,
}

impl Card {
    #[inline(always)]
    pub const fn new(id: u16, rank: Rank, suit: Suit) -> Self {
        Self { id, rank, suit, substituted: false }
    }

    /// The card a wild slot becomes once resolved. Keeps the slot's id.
    #[inline(always)]
    pub const fn substitute(id: u16, rank: Rank, suit: Suit) -> Self {
        Self { id, rank, suit, substituted: true }
    }

    #[inline(always)]
    pub const fn value(self) -> u8 {
        self.rank.value()
    }

    /// Card with face index `face` (suit * 13 + rank). Input assumed < 52.
    #[inline(always)]
    pub const fn from_face(id: u16, face: u8) -> Self {
        Self::new(id, Rank::from_u8(face % 13), Suit::from_u8(face / 13))
    }

    /// All 52 distinct faces, each as a substitute for slot `id`.
    pub fn all_faces(id: u16) -> impl Iterator<Item = Card> {
        (0u8..52).map(move |f| {
            let c = Card::from_face(id, f);
            Card::substitute(id, c.rank, c.suit)
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

/// One slot of a deal: a concrete card or an unresolved wild.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Dealt {
    Card(Card),
    Wild { id: u16 },
}

impl Dealt {
    #[inline(always)]
    pub const fn id(self) -> u16 {
        match self {
            Dealt::Card(c) => c.id,
            Dealt::Wild { id } => id,
        }
    }

    #[inline(always)]
    pub const fn is_wild(self) -> bool {
        matches!(self, Dealt::Wild { .. })
    }

    /// Parse one token (`A♠`, `10h`, `Td`, `W`, `🃏`) and give it `id`.
    pub fn parse(token: &str, id: u16) -> Result<Dealt, ArrangeError> {
        let t = token.trim();
        if matches!(t, "W" | "w" | "WILD" | "wild" | "🃏" | "*") {
            return Ok(Dealt::Wild { id });
        }
        let bad = || ArrangeError::InvalidCardFormat(token.to_string());
        let suit_char = t.chars().last().ok_or_else(bad)?;
        let suit = Suit::from_char(suit_char).ok_or_else(bad)?;
        let rank = Rank::from_token(&t[..t.len() - suit_char.len_utf8()]).ok_or_else(bad)?;
        Ok(Dealt::Card(Card::new(id, rank, suit)))
    }
}

impl fmt::Display for Dealt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dealt::Card(c) => fmt::Display::fmt(c, f),
            Dealt::Wild { .. } => f.write_str("🃏"),
        }
    }
}

/// A whole deal parsed from text. Tokens are separated by whitespace or commas;
/// ids are assigned 0, 1, 2, .. in order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deal(pub Vec<Dealt>);

impl FromStr for Deal {
    type Err = ArrangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .enumerate()
            .map(|(i, t)| Dealt::parse(t, i as u16))
            .collect::<Result<Vec<_>, _>>()
            .map(Deal)
    }
}

/// Parse a list of concrete cards. Wild tokens are rejected.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, ArrangeError> {
    let Deal(slots) = s.parse()?;
    slots
        .into_iter()
        .map(|d| match d {
            Dealt::Card(c) => Ok(c),
            Dealt::Wild { .. } => Err(ArrangeError::InvalidCardFormat("wild".into())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Rank::*;
    use Suit::*;

    #[test]
    fn parses_unicode_and_ascii_tokens() {
        assert_eq!(Dealt::parse("A♠", 3).unwrap(), Dealt::Card(Card::new(3, Ace, Spades)));
        assert_eq!(Dealt::parse("10♥", 0).unwrap(), Dealt::Card(Card::new(0, Ten, Hearts)));
        assert_eq!(Dealt::parse("Td", 1).unwrap(), Dealt::Card(Card::new(1, Ten, Diamonds)));
        assert_eq!(Dealt::parse("kc", 2).unwrap(), Dealt::Card(Card::new(2, King, Clubs)));
        assert_eq!(Dealt::parse("🃏", 9).unwrap(), Dealt::Wild { id: 9 });
    }

    #[test]
    fn rejects_malformed_tokens() {
        for bad in ["", "1♠", "A", "Ax", "11h", "♠"] {
            assert!(
                matches!(Dealt::parse(bad, 0), Err(ArrangeError::InvalidCardFormat(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn deal_assigns_sequential_ids() {
        let Deal(d) = "A♠ A♠, W 2c".parse().unwrap();
        assert_eq!(d.len(), 4);
        assert_eq!(d.iter().map(|x| x.id()).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert!(d[2].is_wild());
        // double deck: same face, different identity
        assert_ne!(d[0], d[1]);
    }

    #[test]
    fn face_roundtrip_and_display() {
        for f in 0u8..52 {
            let c = Card::from_face(0, f);
            assert_eq!((c.suit as u8, c.rank as u8), (f / 13, f % 13));
        }
        assert_eq!(Card::new(0, Queen, Diamonds).to_string(), "Q♦");
        assert_eq!(Card::new(0, Ten, Clubs).value(), 10);
        assert_eq!(Card::all_faces(7).filter(|c| c.substituted && c.id == 7).count(), 52);
    }
}
