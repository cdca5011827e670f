// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generates and validates the redundant share tables consumed by
//! `bootgate-verify`. Tables are configuration data: they are produced
//! here, reviewed, and pasted into the source as versioned constants,
//! never computed at runtime. The invariants enforced here are the same
//! constants `ShareTable::validate` checks at verifier construction.

use anyhow::{bail, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bootgate_common::SPX_ROOT_NUM_WORDS;
use bootgate_verify::{
    ShareTable, MAX_SHARE_WEIGHT, MIN_SHARE_HAMMING_DISTANCE, MIN_SHARE_WEIGHT,
};

#[derive(Parser)]
struct Xtask {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate a share table whose XOR reconstructs the sentinel
    Generate {
        /// Success sentinel, e.g. 0x103cb7ef
        #[clap(long, value_parser = parse_word)]
        sentinel: u32,
        /// Minimum pairwise Hamming distance between shares
        #[clap(long, default_value_t = MIN_SHARE_HAMMING_DISTANCE)]
        min_distance: u32,
        /// RNG seed, for reproducible tables
        #[clap(long)]
        seed: Option<u64>,
    },
    /// Re-check an existing table against the invariants
    Validate {
        #[clap(long, value_parser = parse_word)]
        sentinel: u32,
        #[clap(long, default_value_t = MIN_SHARE_HAMMING_DISTANCE)]
        min_distance: u32,
        /// The four share words
        #[clap(value_parser = parse_word, num_args = 4)]
        shares: Vec<u32>,
    },
}

fn parse_word(s: &str) -> Result<u32, std::num::ParseIntError> {
    if let Some(hex) = s.strip_prefix("0x") {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse()
    }
}

fn main() -> Result<()> {
    let xtask = Xtask::parse();
    match xtask.cmd {
        Command::Generate {
            sentinel,
            min_distance,
            seed,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let shares = generate(&mut rng, sentinel, min_distance);
            report(&shares, min_distance);
            println!("pub const DEFAULT_SHARE_TABLE: ShareTable = ShareTable([");
            for share in shares {
                println!("    {:#010x},", share);
            }
            println!("]);");
        }
        Command::Validate {
            sentinel,
            min_distance,
            shares,
        } => {
            let shares: [u32; SPX_ROOT_NUM_WORDS] = shares.try_into().map_err(|_| {
                anyhow::anyhow!("expected exactly {SPX_ROOT_NUM_WORDS} share words")
            })?;
            if let Err(reason) = check(&shares, sentinel, min_distance) {
                bail!("table rejected: {reason}");
            }
            report(&shares, min_distance);
            println!("table ok");
        }
    }
    Ok(())
}

/// Draw the first N-1 shares at random, derive the last so the XOR
/// invariant holds, and retry until the Hamming constraints pass.
fn generate(rng: &mut StdRng, sentinel: u32, min_distance: u32) -> [u32; SPX_ROOT_NUM_WORDS] {
    loop {
        let mut shares = [0u32; SPX_ROOT_NUM_WORDS];
        let mut acc = sentinel;
        for share in shares.iter_mut().take(SPX_ROOT_NUM_WORDS - 1) {
            *share = rng.gen();
            acc ^= *share;
        }
        shares[SPX_ROOT_NUM_WORDS - 1] = acc;
        if check(&shares, sentinel, min_distance).is_ok() {
            return shares;
        }
    }
}

/// Same invariants as `ShareTable::validate`, spelled out so a rejected
/// table gets a reason instead of a bare `false`.
fn check(
    shares: &[u32; SPX_ROOT_NUM_WORDS],
    sentinel: u32,
    min_distance: u32,
) -> Result<(), String> {
    let xor = shares.iter().fold(0, |acc, s| acc ^ s);
    if xor != sentinel {
        return Err(format!("XOR is {xor:#010x}, expected {sentinel:#010x}"));
    }
    for (i, a) in shares.iter().enumerate() {
        let weight = a.count_ones();
        if !(MIN_SHARE_WEIGHT..=MAX_SHARE_WEIGHT).contains(&weight) {
            return Err(format!("share {i} has degenerate weight {weight}"));
        }
        for (j, b) in shares.iter().enumerate().skip(i + 1) {
            let distance = (a ^ b).count_ones();
            if distance < min_distance {
                return Err(format!("shares {i} and {j} are only {distance} flips apart"));
            }
        }
    }
    // The runtime validator is the authority; disagreement here means the
    // detailed scan above has drifted from it.
    if !ShareTable::new(*shares).validate(sentinel, min_distance) {
        return Err("runtime validator disagrees with the generator checks".to_string());
    }
    Ok(())
}

fn report(shares: &[u32; SPX_ROOT_NUM_WORDS], min_distance: u32) {
    let mut distances = vec![];
    for (i, a) in shares.iter().enumerate() {
        for b in &shares[i + 1..] {
            distances.push((a ^ b).count_ones());
        }
    }
    let weights: Vec<u32> = shares.iter().map(|s| s.count_ones()).collect();
    println!("// Required minimum Hamming distance: {min_distance}");
    println!(
        "// Minimum Hamming distance: {}",
        distances.iter().min().unwrap()
    );
    println!(
        "// Maximum Hamming distance: {}",
        distances.iter().max().unwrap()
    );
    println!("// Minimum Hamming weight: {}", weights.iter().min().unwrap());
    println!("// Maximum Hamming weight: {}", weights.iter().max().unwrap());
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootgate_verify::{DEFAULT_SHARE_TABLE, SPX_SUCCESS};

    #[test]
    fn generated_tables_validate() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..16 {
            let sentinel = rng.gen();
            let shares = generate(&mut rng, sentinel, MIN_SHARE_HAMMING_DISTANCE);
            assert!(check(&shares, sentinel, MIN_SHARE_HAMMING_DISTANCE).is_ok());
            // And the runtime validator accepts what the generator emits.
            assert!(
                ShareTable::new(shares).validate(sentinel, MIN_SHARE_HAMMING_DISTANCE)
            );
        }
    }

    #[test]
    fn shipped_table_validates() {
        assert!(check(
            DEFAULT_SHARE_TABLE.words(),
            SPX_SUCCESS,
            MIN_SHARE_HAMMING_DISTANCE
        )
        .is_ok());
    }
}
