// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bootgate_common::SPX_ROOT_NUM_WORDS;

use crate::verify::SPX_SUCCESS;

/// Minimum pairwise Hamming distance a share table must satisfy.
pub const MIN_SHARE_HAMMING_DISTANCE: u32 = 5;

/// Hamming weight bounds on individual shares; a near-all-zeros or
/// near-all-ones share would be too easy to fault into. Public so the
/// offline table generator enforces the same bounds this validator does.
pub const MIN_SHARE_WEIGHT: u32 = 8;
pub const MAX_SHARE_WEIGHT: u32 = 24;

/// A table of precomputed share words whose word-wise XOR reconstructs the
/// success sentinel.
///
/// The shares replace a single-point "roots are equal" comparison: the
/// verification core folds one share into each root word, so the sentinel
/// only materializes if every word agreed. Tables are versioned
/// configuration data generated offline (`cargo xtask generate`), never
/// hand-edited; [`ShareTable::validate`] re-checks the invariant before a
/// table is accepted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShareTable([u32; SPX_ROOT_NUM_WORDS]);

/// Shares for producing the execution-permission contribution when
/// verification is enabled. The first three words were drawn at random and
/// the last is `SPX_SUCCESS ^ shares[0] ^ shares[1] ^ shares[2]`, so that
/// xor'ing all shares produces `SPX_SUCCESS`.
///
/// Generated with
/// $ cargo xtask generate --sentinel 0x103cb7ef --min-distance 5
///
/// Minimum Hamming distance: 11
/// Maximum Hamming distance: 18
/// Minimum Hamming weight: 14
/// Maximum Hamming weight: 19
pub const DEFAULT_SHARE_TABLE: ShareTable =
    ShareTable([0x9ae1_18d4, 0x1ee3_f3d1, 0x7ce4_dd26, 0xe8da_81cc]);

const _: () = assert!(DEFAULT_SHARE_TABLE.xor_all() == SPX_SUCCESS);

impl ShareTable {
    pub const fn new(words: [u32; SPX_ROOT_NUM_WORDS]) -> ShareTable {
        ShareTable(words)
    }

    pub const fn words(&self) -> &[u32; SPX_ROOT_NUM_WORDS] {
        &self.0
    }

    /// XOR of all shares; equals the sentinel for a valid table.
    pub const fn xor_all(&self) -> u32 {
        let mut acc = 0;
        let mut i = 0;
        while i < SPX_ROOT_NUM_WORDS {
            acc ^= self.0[i];
            i += 1;
        }
        acc
    }

    /// Checks the table invariants: the XOR of all shares reconstructs
    /// `sentinel`, every pair of shares is at least `min_distance` bit
    /// flips apart, and each share has a middling Hamming weight.
    pub fn validate(&self, sentinel: u32, min_distance: u32) -> bool {
        if self.xor_all() != sentinel {
            return false;
        }
        for (i, a) in self.0.iter().enumerate() {
            let weight = a.count_ones();
            if !(MIN_SHARE_WEIGHT..=MAX_SHARE_WEIGHT).contains(&weight) {
                return false;
            }
            for b in &self.0[i + 1..] {
                if (a ^ b).count_ones() < min_distance {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_validates() {
        assert!(DEFAULT_SHARE_TABLE.validate(SPX_SUCCESS, MIN_SHARE_HAMMING_DISTANCE));
    }

    #[test]
    fn wrong_sentinel_rejected() {
        assert!(!DEFAULT_SHARE_TABLE.validate(SPX_SUCCESS ^ 1, MIN_SHARE_HAMMING_DISTANCE));
    }

    #[test]
    fn close_shares_rejected() {
        // XOR invariant holds but two shares differ by a single bit.
        let a = 0x9ae1_18d4;
        let table = ShareTable::new([a, a ^ 1, 0x7ce4_dd26, SPX_SUCCESS ^ a ^ (a ^ 1) ^ 0x7ce4_dd26]);
        assert_eq!(table.xor_all(), SPX_SUCCESS);
        assert!(!table.validate(SPX_SUCCESS, MIN_SHARE_HAMMING_DISTANCE));
    }

    #[test]
    fn degenerate_weights_rejected() {
        // All-zero shares XOR to zero; force the last to the sentinel.
        let table = ShareTable::new([0, 0, 0, SPX_SUCCESS]);
        assert_eq!(table.xor_all(), SPX_SUCCESS);
        assert!(!table.validate(SPX_SUCCESS, MIN_SHARE_HAMMING_DISTANCE));
    }
}
