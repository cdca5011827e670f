// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Recoverable failures of the verification gate.
///
/// A corrupted lifecycle state is deliberately not represented here: it
/// trips the hardened trap instead of producing a value (see
/// `bootgate_common::hardened::hardened_trap`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// The signature did not verify, or the hardened comparison detected a
    /// disagreement. The caller must refuse to mark the image executable.
    BadSpxSignature,

    /// The requested scheme id is not supported, or the supplied message
    /// material does not match it. Nothing was mutated; safe to retry with
    /// a different configuration.
    BadSpxConfig,
}
