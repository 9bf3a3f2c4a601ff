//! Pencil marks as a 9-bit mask.

use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Candidate digits 1-9 packed into the low nine bits of a `u16`.
///
/// Serializes as a sorted digit array so persisted snapshots are stable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MarkSet(u16);

impl MarkSet {
    const MASK: u16 = 0x1ff;

    pub fn empty() -> Self {
        MarkSet(0)
    }

    pub fn from_raw(raw: u16) -> Self {
        MarkSet(raw & Self::MASK)
    }

    pub fn as_raw(&self) -> u16 {
        self.0
    }

    /// Build from a digit list; `None` if any digit is outside 1-9.
    pub fn from_digits(digits: &[u8]) -> Option<Self> {
        let mut set = MarkSet::empty();
        for &d in digits {
            if !(1..=9).contains(&d) {
                return None;
            }
            set.insert(d);
        }
        Some(set)
    }

    fn bit(digit: u8) -> u16 {
        debug_assert!((1..=9).contains(&digit));
        1 << (digit - 1)
    }

    pub fn contains(&self, digit: u8) -> bool {
        self.0 & Self::bit(digit) != 0
    }

    pub fn insert(&mut self, digit: u8) {
        self.0 |= Self::bit(digit);
    }

    pub fn remove(&mut self, digit: u8) {
        self.0 &= !Self::bit(digit);
    }

    pub fn toggle(&mut self, digit: u8) {
        self.0 ^= Self::bit(digit);
    }

    /// Copy of this set with `digit` flipped.
    pub fn toggled(&self, digit: u8) -> Self {
        let mut set = *self;
        set.toggle(digit);
        set
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Digits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> {
        let set = *self;
        (1..=9).filter(move |&d| set.contains(d))
    }

    /// Sorted digit list, as persisted.
    pub fn to_vec(&self) -> Vec<u8> {
        self.iter().collect()
    }
}

impl fmt::Debug for MarkSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MarkSet{:?}", self.to_vec())
    }
}

impl Serialize for MarkSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for MarkSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let digits = Vec::<u8>::deserialize(deserializer)?;
        MarkSet::from_digits(&digits).ok_or_else(|| D::Error::custom("pencil mark digits must be 1-9"))
    }
}
