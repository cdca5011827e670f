// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boot-time SPHINCS+ signature verification gate.
//!
//! This crate decides whether a stored firmware image may be executed. It
//! wraps an opaque SPHINCS+ primitive with a hardened decision layer: an
//! enablement policy keyed on lifecycle state and a fuse-stored marker, a
//! fault-resistant root comparison, and a result encoder that only
//! recognizes a single success sentinel. Each check XOR-accumulates its
//! contribution into a caller-owned [`ExecToken`]; the token grants
//! execution only if every check independently agreed.
//!
//! [`ExecToken`]: bootgate_common::ExecToken

#![forbid(unsafe_code)]
#![cfg_attr(not(test), no_std)]

mod domain;
mod enable;
mod error;
mod shares;
mod verify;

pub use domain::{domain_prefix, PREHASH_SHA256_DOMAIN_SEP, PURE_DOMAIN_SEP};
pub use enable::{
    ConfigStorage, FixedEnable, OtpEnable, SpxEnable, SPX_VERIFY_EN_WORD_OFFSET, VERIFY_DISABLED,
    VERIFY_ENABLED,
};
pub use error::Error;
pub use shares::{
    ShareTable, DEFAULT_SHARE_TABLE, MAX_SHARE_WEIGHT, MIN_SHARE_HAMMING_DISTANCE,
    MIN_SHARE_WEIGHT,
};
pub use verify::{
    success_to_ok, SpxEngine, SpxMessage, SpxSchemeId, SpxVerifier, VerifyRequest, SPX_SUCCESS,
};
