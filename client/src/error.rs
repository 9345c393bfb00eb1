use std::fmt;
use std::path::PathBuf;

use greeting_program::state::RecordSizeError;
use solana_sdk::pubkey::{Pubkey, PubkeyError};
use thiserror::Error;

/// Error type returned by the transport behind [`crate::LedgerConnection`].
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Workflow stage a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fund,
    ValidateProgram,
    EnsureAccount,
    Greet,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fund => "fund payer",
            Stage::ValidateProgram => "validate program",
            Stage::EnsureAccount => "ensure greeting account",
            Stage::Greet => "greet",
            Stage::Report => "report",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum GreeterError {
    /// CLI config could not be read. Callers fall back to defaults.
    #[error("Failed to read CLI config at {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    #[error("Failed to connect to cluster at {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error(
        "Failed to read program keypair at '{path}': {reason}. \
         Program may need to be deployed with `solana program deploy target/deploy/greeting_program.so`"
    )]
    ProgramKeypairMissing { path: PathBuf, reason: String },

    #[error("Program {program_id} not found on cluster: {}", deploy_hint(.artifact))]
    ProgramNotDeployed {
        program_id: Pubkey,
        /// Built shared object, when one exists next to the keypair.
        artifact: Option<PathBuf>,
    },

    #[error("Program {0} is not executable")]
    ProgramNotExecutable(Pubkey),

    #[error("Funding facility refused to top up {payer} by {lamports} lamports: {source}")]
    FaucetUnavailable {
        payer: Pubkey,
        lamports: u64,
        #[source]
        source: TransportError,
    },

    #[error("Payer {payer} holds {balance} lamports after top-up, {required} required")]
    InsufficientFunds {
        payer: Pubkey,
        required: u64,
        balance: u64,
    },

    #[error("Cannot derive greeting address with seed {seed:?}: {source}")]
    InvalidSeed {
        seed: String,
        #[source]
        source: PubkeyError,
    },

    #[error(
        "Account {address} does not match the greeting layout: \
         owner {actual_owner} (expected {expected_owner}), \
         {actual_len} bytes (expected {expected_len})"
    )]
    AccountMismatch {
        address: Pubkey,
        expected_owner: Pubkey,
        actual_owner: Pubkey,
        expected_len: usize,
        actual_len: usize,
    },

    #[error("Invalid greeting record: {0}")]
    RecordSize(#[from] RecordSizeError),

    #[error("Cannot find the greeted account {0}")]
    AccountNotFound(Pubkey),

    #[error("Stage '{requires}' must complete first")]
    OutOfOrder { requires: Stage },

    #[error("RPC error during {stage}: {source}")]
    Rpc {
        stage: Stage,
        #[source]
        source: TransportError,
    },
}

fn deploy_hint(artifact: &Option<PathBuf>) -> String {
    match artifact {
        Some(path) => format!(
            "program needs to be deployed with `solana program deploy {}`",
            path.display()
        ),
        None => "program needs to be built and deployed".to_string(),
    }
}

impl GreeterError {
    pub(crate) fn rpc(stage: Stage) -> impl FnOnce(TransportError) -> Self {
        move |source| GreeterError::Rpc { stage, source }
    }
}

/// Result type alias for greeting client operations
pub type Result<T> = std::result::Result<T, GreeterError>;
