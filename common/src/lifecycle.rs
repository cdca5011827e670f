// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use derive_more::From;
use hubpack::SerializedSize;
use serde::{Deserialize, Serialize};

/// Device lifecycle state, as reported by the lifecycle controller at boot.
///
/// The five recognized states are sparsely encoded (pairwise Hamming
/// distance >= 13, regenerate with `cargo xtask` if the set ever changes)
/// so that a small number of bit flips cannot turn one recognized state
/// into another. Every other bit pattern is treated as evidence of
/// tampering, not as a recoverable error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, From, Serialize, Deserialize, SerializedSize)]
pub struct LifecycleState(pub u32);

impl LifecycleState {
    /// Manufacturing test state. Signature checks are not required here.
    pub const TEST: LifecycleState = LifecycleState(0x06ac_28cb);

    /// Development state.
    pub const DEV: LifecycleState = LifecycleState(0x0c65_d12a);

    /// Production state.
    pub const PROD: LifecycleState = LifecycleState(0x1407_fa15);

    /// End-of-production state.
    pub const PROD_END: LifecycleState = LifecycleState(0xadcc_9abe);

    /// Return-merchandise-authorization state.
    pub const RMA: LifecycleState = LifecycleState(0xe7d0_f0a0);
}
