// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use derive_more::From;
use hubpack::SerializedSize;
use serde::{Deserialize, Serialize};

use bootgate_common::hardened::{hardened_check_eq, launder, saturate};
use bootgate_common::{
    ExecToken, LifecycleState, Sha256Digest, SpxPublicKey, SpxRoot, SpxSignature,
    SPX_ROOT_NUM_WORDS,
};

use crate::domain::domain_prefix;
use crate::enable::{SpxEnable, VERIFY_DISABLED};
use crate::error::Error;
use crate::shares::{ShareTable, MIN_SHARE_HAMMING_DISTANCE};

/// Identifies a supported SPHINCS+ scheme variant.
///
/// Values are sparse so that a faulted id lands outside the supported set
/// rather than on a neighboring scheme.
#[derive(Debug, Copy, Clone, PartialEq, Eq, From, Serialize, Deserialize, SerializedSize)]
pub struct SpxSchemeId(pub u32);

impl SpxSchemeId {
    /// SPHINCS+-SHA2-128s over the raw message.
    pub const SHA2_128S: SpxSchemeId = SpxSchemeId(0xb3db_df82);

    /// SPHINCS+-SHA2-128s over a SHA-256 digest of the message.
    pub const SHA2_128S_PREHASH: SpxSchemeId = SpxSchemeId(0x047e_09e6);
}

/// The success sentinel: the single word the result encoder maps to `Ok`.
///
/// Equal to the XOR of the default share table and to the disabled
/// enablement marker by construction. The first equality is asserted where
/// the table is defined and re-checked at verifier construction; the
/// second is asserted here.
pub const SPX_SUCCESS: u32 = 0x103c_b7ef;

const _: () = assert!(SPX_SUCCESS == VERIFY_DISABLED);

/// The opaque SPHINCS+ primitive, supplied by the platform.
///
/// The gate treats the tree traversal and one-time-signature math as a
/// black box; all it needs back is a candidate root to compare.
pub trait SpxEngine {
    /// Recovers the candidate root from a signature over the
    /// domain-separated message, processed in order: `domain_sep`,
    /// `msg_prefix_1`, `msg_prefix_2`, `msg`.
    fn recover_root(
        &self,
        signature: &SpxSignature,
        domain_sep: &[u8],
        msg_prefix_1: &[u8],
        msg_prefix_2: &[u8],
        msg: &[u8],
        key: &SpxPublicKey,
    ) -> Result<SpxRoot, Error>;

    /// Derives the expected root directly from the public key.
    fn public_key_root(&self, key: &SpxPublicKey) -> SpxRoot;
}

/// Message material for one verification.
#[derive(Debug, Copy, Clone)]
pub enum SpxMessage<'a> {
    /// The raw message, as up to three ordered parts that were
    /// concatenated for signing. Unused parts are empty slices.
    Pure {
        prefix_1: &'a [u8],
        prefix_2: &'a [u8],
        msg: &'a [u8],
    },

    /// A precomputed SHA-256 digest of the message.
    Prehash(&'a Sha256Digest),
}

/// One verification request. All buffers are caller-owned and read-only
/// for the duration of the call.
pub struct VerifyRequest<'a> {
    pub signature: &'a SpxSignature,
    pub key: &'a SpxPublicKey,
    pub scheme: SpxSchemeId,
    pub lc_state: LifecycleState,
    pub msg: SpxMessage<'a>,
}

/// The hardened verification gate.
///
/// Wires together the enablement policy, the opaque primitive, and a share
/// table. Both collaborators are injected so a harness can substitute
/// either without touching the comparison logic.
pub struct SpxVerifier<E, P> {
    engine: E,
    policy: P,
    shares: ShareTable,
}

impl<E: SpxEngine, P: SpxEnable> SpxVerifier<E, P> {
    /// Panics if the share table does not reconstruct [`SPX_SUCCESS`] or
    /// violates the Hamming constraints; a bad table would silently turn
    /// every verification into a failure (or worse, a constant), so it is
    /// rejected before the verifier exists.
    pub fn new(engine: E, policy: P, shares: ShareTable) -> SpxVerifier<E, P> {
        assert!(shares.validate(SPX_SUCCESS, MIN_SHARE_HAMMING_DISTANCE));
        SpxVerifier {
            engine,
            policy,
            shares,
        }
    }

    /// Verifies one signature and folds the outcome into `token`.
    ///
    /// When the enablement policy answers "disabled", the primitive is
    /// never invoked and the disabled marker itself is the token
    /// contribution. Otherwise the recovered root is compared against the
    /// expected root via the share table: the comparison runs backward
    /// over the root words with a saturating difference accumulator, so
    /// any single disagreement, or a fault perturbing one iteration,
    /// leaves an all-ones contribution instead of a value one bit flip
    /// away from the sentinel.
    ///
    /// The token is only ever XOR-combined, never overwritten: callers
    /// gate execution on the accumulated value, not on this function's
    /// return alone.
    pub fn verify(
        &self,
        request: &VerifyRequest<'_>,
        token: &mut ExecToken,
    ) -> Result<(), Error> {
        let spx_en = launder(self.policy.verify_enabled(request.lc_state));
        let result;
        if launder(spx_en) != VERIFY_DISABLED {
            let expected_root = self.engine.public_key_root(request.key);
            let mut actual_root = self.recover_root(request)?;

            // Reconciliation pass: if the roots agree, each word of
            // `actual_root` now equals the corresponding share exactly.
            let shares = self.shares.words();
            let mut i = 0;
            while launder(i) < SPX_ROOT_NUM_WORDS {
                actual_root.0[i] ^= expected_root.0[i] ^ shares[i];
                i += 1;
            }
            hardened_check_eq(i, SPX_ROOT_NUM_WORDS);

            // Saturating comparison pass, last word first. `diff` goes
            // all-ones at the first disagreeing word and the trailing OR
            // poisons the contribution for every word processed after it.
            let mut contribution: u32 = 0;
            let mut diff: u32 = 0;
            while launder(i) > 0 {
                i -= 1;
                diff |= actual_root.0[i] ^ shares[i];
                diff = saturate(diff);
                contribution ^= actual_root.0[i];
                contribution |= diff;
            }
            hardened_check_eq(i, 0);

            result = success_to_ok(contribution);
            token.combine(contribution);
        } else {
            hardened_check_eq(spx_en, VERIFY_DISABLED);
            token.combine(spx_en);
            // Re-read the policy and run its answer through the encoder;
            // the disabled marker equals the sentinel by construction.
            let marker = self.policy.verify_enabled(request.lc_state);
            result = success_to_ok(marker);
        }
        if result.is_err() {
            return Err(Error::BadSpxSignature);
        }
        result
    }

    /// Hardened scheme dispatch: each accepted branch re-asserts the id it
    /// matched on before handing off to the primitive.
    fn recover_root(&self, request: &VerifyRequest<'_>) -> Result<SpxRoot, Error> {
        if launder(request.scheme.0) == SpxSchemeId::SHA2_128S_PREHASH.0 {
            hardened_check_eq(request.scheme, SpxSchemeId::SHA2_128S_PREHASH);
            let SpxMessage::Prehash(digest) = request.msg else {
                return Err(Error::BadSpxConfig);
            };
            self.engine.recover_root(
                request.signature,
                domain_prefix(SpxSchemeId::SHA2_128S_PREHASH),
                &[],
                &[],
                &digest.0,
                request.key,
            )
        } else if launder(request.scheme.0) == SpxSchemeId::SHA2_128S.0 {
            hardened_check_eq(request.scheme, SpxSchemeId::SHA2_128S);
            let SpxMessage::Pure {
                prefix_1,
                prefix_2,
                msg,
            } = request.msg
            else {
                return Err(Error::BadSpxConfig);
            };
            self.engine.recover_root(
                request.signature,
                domain_prefix(SpxSchemeId::SHA2_128S),
                prefix_1,
                prefix_2,
                msg,
                request.key,
            )
        } else {
            // Unsupported SPHINCS+ configuration.
            Err(Error::BadSpxConfig)
        }
    }
}

/// Result encoder: maps an accumulated permission word to a result.
///
/// Exactly one input value encodes success; there are no partial-pattern
/// checks, just a single laundered equality re-asserted on the success
/// arm.
pub fn success_to_ok(word: u32) -> Result<(), Error> {
    if launder(word) == SPX_SUCCESS {
        hardened_check_eq(word, SPX_SUCCESS);
        return Ok(());
    }
    Err(Error::BadSpxSignature)
}
