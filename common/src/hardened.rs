// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Primitives for hardening security decisions against fault injection.
//!
//! A voltage or clock glitch can flip a register bit or skip an
//! instruction. Code that gates execution on a comparison therefore must
//! not let the compiler fold that comparison away, must not encode the
//! outcome in a single flippable bit, and must re-check branch conditions
//! after taking the branch. These helpers are the building blocks for all
//! three.

use core::hint::black_box;

/// Optimization and fault barrier.
///
/// Forces the value to be treated as externally observable so the compiler
/// cannot prove two laundered reads equal, merge redundant checks, or
/// strength-reduce a comparison into a conditional the hardware can skip.
#[inline(always)]
pub fn launder<T: Copy>(value: T) -> T {
    black_box(value)
}

/// Branchless saturating transform: all-ones if `word` is nonzero, zero
/// otherwise.
///
/// A failed comparison folded through this transform differs from success
/// in every bit, so no small set of bit flips can convert one into the
/// other.
#[inline(always)]
pub const fn saturate(word: u32) -> u32 {
    let mut w = word;
    // Sets the MSB if `w` is nonzero, no change otherwise.
    w |= w.wrapping_neg();
    // Spreads the MSB to all bits.
    w |= (w >> 31).wrapping_neg();
    w
}

/// Check that two values are equal, trapping on mismatch.
///
/// Used after a branch to re-assert the condition the branch was taken
/// under; an instruction-skipping fault that lands in the wrong arm hits
/// the trap instead of continuing with a corrupted control flow.
#[inline(always)]
pub fn hardened_check_eq<T: Copy + PartialEq>(a: T, b: T) {
    if black_box(a) != b {
        hardened_trap();
    }
}

/// Non-resumable trap for control-flow-integrity violations.
///
/// Deliberately diverges instead of returning an error value: a value
/// could be raced against by a second glitch, a trap cannot. The workspace
/// profiles build with `panic = "abort"`, so in production this halts.
#[inline(never)]
pub fn hardened_trap() -> ! {
    panic!("control flow integrity violation");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturate_zero_is_zero() {
        assert_eq!(saturate(0), 0);
    }

    #[test]
    fn saturate_any_nonzero_is_all_ones() {
        // Every single-bit input must saturate, including the MSB.
        for bit in 0..32 {
            assert_eq!(saturate(1 << bit), u32::MAX);
        }
        assert_eq!(saturate(u32::MAX), u32::MAX);
        assert_eq!(saturate(0x8000_0001), u32::MAX);
        assert_eq!(saturate(0x0001_0000), u32::MAX);
    }

    #[test]
    fn check_eq_passes_on_equal() {
        hardened_check_eq(0xdead_beefu32, 0xdead_beef);
        hardened_check_eq(4usize, 4);
    }

    #[test]
    #[should_panic(expected = "control flow integrity violation")]
    fn check_eq_traps_on_mismatch() {
        hardened_check_eq(1u32, 2);
    }

    #[test]
    fn launder_is_identity() {
        assert_eq!(launder(0x1234_5678u32), 0x1234_5678);
    }
}
