// state.rs
use thiserror::Error;

/// Raised when a buffer handed to [`decode`] is not exactly one record long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("greeting record must be {expected} bytes, got {actual}")]
pub struct RecordSizeError {
    pub expected: usize,
    pub actual: usize,
}

/// On-chain state of a greeted account: how many times it has been greeted.
///
/// Stored as a bare little-endian `u32`, no discriminator and no padding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GreetingAccount {
    pub counter: u32,
}

impl GreetingAccount {
    pub const LEN: usize = 4;

    /// Account size to allocate, taken from the encoded form of an empty record.
    pub fn space() -> usize {
        encode(0).len()
    }

    pub fn pack(&self) -> [u8; Self::LEN] {
        encode(self.counter)
    }

    pub fn unpack(data: &[u8]) -> Result<Self, RecordSizeError> {
        decode(data).map(|counter| Self { counter })
    }
}

pub fn encode(counter: u32) -> [u8; GreetingAccount::LEN] {
    counter.to_le_bytes()
}

pub fn decode(data: &[u8]) -> Result<u32, RecordSizeError> {
    let bytes: [u8; GreetingAccount::LEN] = data.try_into().map_err(|_| RecordSizeError {
        expected: GreetingAccount::LEN,
        actual: data.len(),
    })?;
    Ok(u32::from_le_bytes(bytes))
}
