use solana_sdk::pubkey::Pubkey;

use crate::error::{GreeterError, Result};

/// Seed under which every payer's greeting account is derived.
pub const GREETING_SEED: &str = "hello";

/// Derives the greeting account address for `payer` with `create_with_seed`.
///
/// The address depends only on the three inputs, so it is recomputed on every
/// run instead of being stored.
pub fn derive_greeting_address(payer: &Pubkey, seed: &str, program_id: &Pubkey) -> Result<Pubkey> {
    Pubkey::create_with_seed(payer, seed, program_id).map_err(|source| GreeterError::InvalidSeed {
        seed: seed.to_string(),
        source,
    })
}
