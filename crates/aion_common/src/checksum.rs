//! Deterministic xor/shift checksum for invariant and round-trip testing.
//!
//! Unlike [`crate::hash::ContentHash`] (XXH3, used for cache invalidation),
//! this is a small stable 32-bit mixer used to cheaply assert that two
//! contexts (or the same context before/after a round-trip) agree on their
//! full set of bound cells, nets, wires and pips.

/// A running 32-bit checksum accumulator.
///
/// Values are folded in with an xor/shift mix so that the result depends on
/// both the value and the order it was folded in, matching the
/// `checksum()` scan order (sorted by [`crate::Ident`] index).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Checksum(u32);

impl Checksum {
    /// The checksum of an empty sequence (no cells, no nets, no bindings).
    pub const EMPTY: Checksum = Checksum(0x076f_4b6d);

    /// Starts a new checksum accumulator.
    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Folds a `u32` value into the checksum.
    pub fn fold_u32(mut self, value: u32) -> Self {
        let mut x = self.0 ^ value;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        self
    }

    /// Folds a `u64` value into the checksum (high word then low word).
    pub fn fold_u64(self, value: u64) -> Self {
        self.fold_u32((value >> 32) as u32).fold_u32(value as u32)
    }

    /// Folds a string's bytes into the checksum.
    pub fn fold_str(mut self, s: &str) -> Self {
        for chunk in s.as_bytes().chunks(4) {
            let mut buf = [0u8; 4];
            buf[..chunk.len()].copy_from_slice(chunk);
            self = self.fold_u32(u32::from_le_bytes(buf));
        }
        self
    }

    /// Returns the accumulated 32-bit checksum value.
    pub fn finish(self) -> u32 {
        self.0
    }
}

impl Default for Checksum {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_checksum_is_stable_constant() {
        let c = Checksum::new();
        assert_eq!(c.finish(), 0x076f_4b6d);
    }

    #[test]
    fn order_matters() {
        let a = Checksum::new().fold_u32(1).fold_u32(2);
        let b = Checksum::new().fold_u32(2).fold_u32(1);
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn deterministic_for_same_input() {
        let a = Checksum::new().fold_u32(42).fold_str("net0");
        let b = Checksum::new().fold_u32(42).fold_str("net0");
        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn different_input_different_checksum() {
        let a = Checksum::new().fold_str("net0");
        let b = Checksum::new().fold_str("net1");
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn fold_u64_splits_words() {
        let a = Checksum::new().fold_u64(0x1122_3344_5566_7788);
        let b = Checksum::new().fold_u32(0x1122_3344).fold_u32(0x5566_7788);
        assert_eq!(a.finish(), b.finish());
    }
}
