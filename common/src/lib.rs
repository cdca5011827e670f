// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared types for the boot-time signature verification gate.

#![forbid(unsafe_code)]
#![cfg_attr(not(test), no_std)]

use derive_more::From;
use hubpack::SerializedSize;
use serde::{Deserialize, Serialize};
// Provides big array support for serde
use serde_big_array::BigArray;

pub mod hardened;
pub mod lifecycle;

pub use lifecycle::LifecycleState;

/// Size of a SPHINCS+-SHA2-128s signature in bytes.
pub const SPX_SIGNATURE_SIZE: usize = 7856;

/// Size of a SPHINCS+-SHA2-128s public key in bytes.
pub const SPX_PUBLIC_KEY_SIZE: usize = 32;

/// Number of 32-bit words in a SPHINCS+ root digest.
pub const SPX_ROOT_NUM_WORDS: usize = 4;

/// An opaque SPHINCS+ signature buffer, owned by the caller and read-only
/// to the verification core.
#[derive(Clone, PartialEq, Eq, From, Serialize, Deserialize, SerializedSize)]
pub struct SpxSignature(#[serde(with = "BigArray")] pub [u8; SPX_SIGNATURE_SIZE]);

/// An opaque SPHINCS+ public key buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, From, Serialize, Deserialize, SerializedSize)]
pub struct SpxPublicKey(pub [u8; SPX_PUBLIC_KEY_SIZE]);

/// A SPHINCS+ root digest, either derived from a public key or recovered
/// from a signature/message pair. Compared word by word.
#[derive(
    Default, Debug, Copy, Clone, PartialEq, Eq, From, Serialize, Deserialize, SerializedSize,
)]
pub struct SpxRoot(pub [u32; SPX_ROOT_NUM_WORDS]);

#[derive(
    Default, Debug, Copy, Clone, PartialEq, Eq, From, Serialize, Deserialize, SerializedSize,
)]
pub struct Sha256Digest(pub [u8; 32]);

/// Cumulative permission to execute code from flash.
///
/// Initialized once per boot and only ever XOR-combined by successive
/// signature checks; a check contributes its sentinel on success and a
/// saturated all-ones word on failure. The token is deliberately not
/// resettable: later checks cannot undo an earlier disagreement.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, SerializedSize)]
pub struct ExecToken(u32);

impl ExecToken {
    pub const fn new() -> ExecToken {
        ExecToken(0)
    }

    /// XOR a check's contribution into the token.
    pub fn combine(&mut self, contribution: u32) {
        self.0 ^= contribution;
    }

    pub const fn value(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_token_accumulates() {
        let mut token = ExecToken::new();
        token.combine(0x0f0f_0f0f);
        token.combine(0xf0f0_f0f0);
        assert_eq!(token.value(), 0xffff_ffff);
        token.combine(0xffff_ffff);
        assert_eq!(token.value(), 0);
    }
}
