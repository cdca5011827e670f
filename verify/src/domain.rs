// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bootgate_common::hardened::hardened_trap;

use crate::verify::SpxSchemeId;

/// Domain-separation prefix for SPHINCS+ with no prehashing.
///
/// The prefix is the byte sequence `0x00 || len(ctx) || ctx`. Our context
/// is always the empty string, so the length byte is zero.
pub const PURE_DOMAIN_SEP: [u8; 2] = [0x00, 0x00];

/// Domain-separation prefix for SPHINCS+ with SHA-256 prehashing.
///
/// The prefix is `0x01 || len(ctx) || ctx || OID(PH)` where `ctx` is again
/// empty and `OID(PH)` is the DER-encoded object identifier of SHA-256.
pub const PREHASH_SHA256_DOMAIN_SEP: [u8; 13] = [
    0x01, 0x00, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
];

/// Returns the domain-separation prefix binding a signature to its scheme.
///
/// Only called after the verification core's scheme dispatch has accepted
/// the id; reaching the fallthrough arm means the dispatch itself was
/// corrupted, so it traps rather than erroring.
pub fn domain_prefix(scheme: SpxSchemeId) -> &'static [u8] {
    match scheme {
        SpxSchemeId::SHA2_128S => &PURE_DOMAIN_SEP,
        SpxSchemeId::SHA2_128S_PREHASH => &PREHASH_SHA256_DOMAIN_SEP,
        _ => hardened_trap(),
    }
}
