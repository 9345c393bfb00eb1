#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint; // entrypoint where the Solana program process starts
pub mod instruction; // builder for the greeting instruction
pub mod processor; // where the greeting is applied to the account
pub mod state; // layout of the greeted account
