// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bootgate_common::hardened::{hardened_check_eq, hardened_trap, launder};
use bootgate_common::LifecycleState;

/// Marker value meaning signature verification is not required.
///
/// Equal to [`SPX_SUCCESS`] so that the disabled path encodes to `Ok`
/// through the same result encoder as a passed verification. The equality
/// is asserted where the sentinel is defined, not assumed.
///
/// [`SPX_SUCCESS`]: crate::SPX_SUCCESS
pub const VERIFY_DISABLED: u32 = 0x103c_b7ef;

/// Marker value meaning signature verification is required.
///
/// Hamming distance 15 from [`VERIFY_DISABLED`]; the provisioning process
/// writes exactly one of the two patterns into config storage.
pub const VERIFY_ENABLED: u32 = 0x899a_ae85;

/// Word offset of the verification-enable marker in config storage.
pub const SPX_VERIFY_EN_WORD_OFFSET: usize = 0x2c;

/// Fuse-backed configuration storage.
///
/// Reads are synchronous with bounded latency; the stored enable word is
/// expected to already hold one of the two valid marker patterns. That is
/// a contract on provisioning and is not re-validated here.
pub trait ConfigStorage {
    fn read_config_word(&self, word_offset: usize) -> u32;
}

/// Decides whether signature verification is required for a lifecycle
/// state.
///
/// A replaceable strategy: production binds [`OtpEnable`], test harnesses
/// bind [`FixedEnable`]. No other component depends on which one is bound.
pub trait SpxEnable {
    /// Returns the enablement marker for `lc_state`.
    ///
    /// Diverges via the hardened trap for states outside the recognized
    /// set; an unrecognized state is evidence of an induced control-flow
    /// fault, not a normal input.
    fn verify_enabled(&self, lc_state: LifecycleState) -> u32;
}

/// Production enablement policy, reading the marker from fuse storage.
pub struct OtpEnable<C> {
    storage: C,
}

impl<C: ConfigStorage> OtpEnable<C> {
    pub const fn new(storage: C) -> OtpEnable<C> {
        OtpEnable { storage }
    }
}

impl<C: ConfigStorage> SpxEnable for OtpEnable<C> {
    fn verify_enabled(&self, lc_state: LifecycleState) -> u32 {
        match LifecycleState(launder(lc_state.0)) {
            LifecycleState::TEST => {
                hardened_check_eq(lc_state, LifecycleState::TEST);
                // Don't read fuses during manufacturing; verification is
                // off by default for test images.
                VERIFY_DISABLED
            }
            LifecycleState::DEV => {
                hardened_check_eq(lc_state, LifecycleState::DEV);
                self.storage.read_config_word(SPX_VERIFY_EN_WORD_OFFSET)
            }
            LifecycleState::PROD => {
                hardened_check_eq(lc_state, LifecycleState::PROD);
                self.storage.read_config_word(SPX_VERIFY_EN_WORD_OFFSET)
            }
            LifecycleState::PROD_END => {
                hardened_check_eq(lc_state, LifecycleState::PROD_END);
                self.storage.read_config_word(SPX_VERIFY_EN_WORD_OFFSET)
            }
            LifecycleState::RMA => {
                hardened_check_eq(lc_state, LifecycleState::RMA);
                self.storage.read_config_word(SPX_VERIFY_EN_WORD_OFFSET)
            }
            _ => hardened_trap(),
        }
    }
}

/// Enablement policy that always answers with a fixed marker, for test
/// harnesses that need to force verification on or off.
pub struct FixedEnable(pub u32);

impl SpxEnable for FixedEnable {
    fn verify_enabled(&self, _lc_state: LifecycleState) -> u32 {
        self.0
    }
}
