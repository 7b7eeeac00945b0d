//! Packed bitset of tape-entry status flags.
//!
//! Kept as a single `bitflags` type with named constructors for each
//! state-transition's status, rather than ad-hoc `|` chains at call sites
//! (see `SPEC_FULL.md` §9).

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct TapeStatus: u32 {
        const ENDPOINT       = 1 << 0;
        const ANCHOR_POINT   = 1 << 1;
        const ANCHOR_EXTEND  = 1 << 2;
        const FLIP_SOURCE    = 1 << 3;
        const ANCHOR_TYPE1   = 1 << 4;
        const FORCED_DEG2    = 1 << 5;
        const FORCED         = 1 << 6;
        const HAMILTONIAN    = 1 << 7;
        const TERMINATE      = 1 << 8;
    }
}

impl TapeStatus {
    pub fn endpoint() -> Self {
        Self::ENDPOINT
    }

    pub fn anchor_point() -> Self {
        Self::ANCHOR_POINT
    }

    pub fn anchor_extend() -> Self {
        Self::ANCHOR_POINT | Self::ANCHOR_EXTEND
    }

    pub fn anchor_extend_flip() -> Self {
        Self::ANCHOR_POINT | Self::FLIP_SOURCE | Self::ANCHOR_EXTEND
    }

    pub fn terminate() -> Self {
        Self::TERMINATE
    }

    pub fn hamiltonian() -> Self {
        Self::HAMILTONIAN
    }

    pub fn is_anchor_point(self) -> bool {
        self.contains(Self::ANCHOR_POINT)
    }

    pub fn is_terminate(self) -> bool {
        self.contains(Self::TERMINATE)
    }

    pub fn is_anchor_extend(self) -> bool {
        self.contains(Self::ANCHOR_EXTEND)
    }

    pub fn is_flip_source(self) -> bool {
        self.contains(Self::FLIP_SOURCE)
    }

    pub fn is_forced(self) -> bool {
        self.contains(Self::FORCED)
    }

    pub fn is_forced_deg2(self) -> bool {
        self.contains(Self::FORCED_DEG2)
    }

    pub fn is_endpoint(self) -> bool {
        self.contains(Self::ENDPOINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_extend_implies_anchor_point() {
        let s = TapeStatus::anchor_extend();
        assert!(s.is_anchor_point());
        assert!(s.is_anchor_extend());
        assert!(!s.is_flip_source());
    }

    #[test]
    fn anchor_extend_flip_sets_all_three_bits() {
        let s = TapeStatus::anchor_extend_flip();
        assert!(s.is_anchor_point());
        assert!(s.is_anchor_extend());
        assert!(s.is_flip_source());
    }

    #[test]
    fn terminate_and_hamiltonian_are_distinct_sentinels() {
        assert_ne!(TapeStatus::terminate(), TapeStatus::hamiltonian());
        assert!(TapeStatus::terminate().is_terminate());
        assert!(!TapeStatus::hamiltonian().is_terminate());
    }
}
