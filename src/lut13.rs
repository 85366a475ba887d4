//! LUTs for 13-bit rank masks (0..8191).
//!
//! - POPCNT13[mask]   -> number of set bits
//! - HIBIT13[mask]    -> highest set bit index (0..12) or -1
//! - RUN_HIGH13[mask] -> if the set bits form one run of consecutive ranks,
//!                       the index of its top rank, else -1. Ace may play low:
//!                       A2345 returns 3 (Five), A23456 returns 4, and so on.

pub const MASK13: u16 = (1u16 << 13) - 1;

const N: usize = 1 << 13;
const ACE_BIT: u16 = 1 << 12;

const fn popcount_u16(mut x: u16) -> u8 {
    let mut c: u8 = 0;
    while x != 0 {
        c += (x & 1) as u8;
        x >>= 1;
    }
    c
}

const fn hibit_index_u16(x: u16) -> i8 {
    if x == 0 {
        return -1;
    }
    let mut i: i8 = 12;
    while i >= 0 {
        if (x & (1u16 << (i as u16))) != 0 {
            return i;
        }
        i -= 1;
    }
    -1
}

const fn run_high_u16(mask: u16) -> i8 {
    if mask == 0 {
        return -1;
    }
    let low = mask.trailing_zeros() as u16;
    let shifted = mask >> low;
    if shifted & (shifted + 1) == 0 {
        return hibit_index_u16(mask);
    }
    // ace-low: Ace plus a run starting at Two
    if mask & ACE_BIT != 0 {
        let rest = mask & !ACE_BIT;
        if rest & 1 != 0 && rest & (rest + 1) == 0 {
            return hibit_index_u16(rest);
        }
    }
    -1
}

const fn build_popcnt13() -> [u8; N] {
    let mut arr = [0u8; N];
    let mut i: usize = 0;
    while i < N {
        arr[i] = popcount_u16(i as u16);
        i += 1;
    }
    arr
}

const fn build_hibit13() -> [i8; N] {
    let mut arr = [0i8; N];
    let mut i: usize = 0;
    while i < N {
        arr[i] = hibit_index_u16(i as u16);
        i += 1;
    }
    arr
}

const fn build_run_high13() -> [i8; N] {
    let mut arr = [0i8; N];
    let mut i: usize = 0;
    while i < N {
        arr[i] = run_high_u16(i as u16);
        i += 1;
    }
    arr
}

pub const POPCNT13: [u8; N] = build_popcnt13();
pub const HIBIT13: [i8; N] = build_hibit13();
pub const RUN_HIGH13: [i8; N] = build_run_high13();

#[inline(always)]
pub fn popcnt13(mask: u16) -> u8 {
    POPCNT13[(mask & MASK13) as usize]
}

#[inline(always)]
pub fn hibit13(mask: u16) -> i8 {
    HIBIT13[(mask & MASK13) as usize]
}

#[inline(always)]
pub fn run_high13(mask: u16) -> i8 {
    RUN_HIGH13[(mask & MASK13) as usize]
}

/// A run of `len` consecutive ranks.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RunWindow {
    pub mask: u16,
    /// Rank indices, top rank first. For ace-low runs the ace comes last.
    pub ranks: [u8; 8],
    pub len: usize,
}

impl RunWindow {
    #[inline(always)]
    pub fn ranks(&self) -> &[u8] {
        &self.ranks[..self.len]
    }
}

/// Every run of `len` (1..=8) ranks, strongest first; the ace-low run is last.
pub fn run_windows(len: usize) -> impl Iterator<Item = RunWindow> {
    let len = len.clamp(1, 8);
    let straight = (0..=(13 - len)).rev().map(move |low| {
        let mut ranks = [0u8; 8];
        for (i, r) in ranks.iter_mut().take(len).enumerate() {
            *r = (low + len - 1 - i) as u8;
        }
        RunWindow { mask: (((1u32 << len) - 1) << low) as u16, ranks, len }
    });
    let ace_low = (len >= 2).then(|| {
        let mut ranks = [0u8; 8];
        for (i, r) in ranks.iter_mut().take(len - 1).enumerate() {
            *r = (len - 2 - i) as u8;
        }
        ranks[len - 1] = 12;
        RunWindow { mask: ACE_BIT | ((1u16 << (len - 1)) - 1), ranks, len }
    });
    straight.chain(ace_low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popcnt_basic() {
        assert_eq!(popcnt13(0), 0);
        assert_eq!(popcnt13(1), 1);
        assert_eq!(popcnt13((1 << 12) | (1 << 0)), 2);
    }

    #[test]
    fn hibit_basic() {
        assert_eq!(hibit13(0), -1);
        assert_eq!(hibit13(1), 0);
        assert_eq!(hibit13(1 << 12), 12);
    }

    #[test]
    fn runs_and_wheel() {
        // Ten-J-Q-K-A => bits 8..12
        assert_eq!(run_high13(0b1_1111_0000_0000), 12);
        // A-2-3-4-5 => top rank is the Five
        assert_eq!(run_high13(ACE_BIT | 0b1111), 3);
        // A-2-3-4-5-6
        assert_eq!(run_high13(ACE_BIT | 0b1_1111), 4);
        // gap
        assert_eq!(run_high13(0b1_1011), -1);
        // wraparound K-A-2 is not a run
        assert_eq!(run_high13((1 << 11) | ACE_BIT | 1), -1);
    }

    #[test]
    fn window_counts() {
        // 9 regular five-rank windows plus the wheel
        assert_eq!(run_windows(5).count(), 10);
        assert_eq!(run_windows(8).count(), 7);
        let wheel = run_windows(5).last().unwrap();
        assert_eq!(wheel.ranks(), &[3, 2, 1, 0, 12]);
        for w in run_windows(6) {
            assert_eq!(popcnt13(w.mask) as usize, 6);
            assert_eq!(run_high13(w.mask), w.ranks[0] as i8);
        }
    }
}
