use greeting_program::state::GreetingAccount;
use solana_sdk::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey, signature::Signature};
use tracing::{debug, info};

use crate::connection::LedgerConnection;
use crate::error::{GreeterError, Result, Stage};

/// Signatures the payer should be able to afford on top of the account rent.
pub const FEE_MULTIPLIER: u64 = 100;

/// Lamports the payer needs to create the greeting account and keep sending
/// transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBudget {
    pub rent_exempt_minimum: u64,
    pub lamports_per_signature: u64,
}

impl FeeBudget {
    pub async fn fetch<C: LedgerConnection + ?Sized>(conn: &C, payer: &Pubkey) -> Result<Self> {
        let rent_exempt_minimum = conn
            .minimum_balance_for_rent_exemption(GreetingAccount::space())
            .await
            .map_err(GreeterError::rpc(Stage::Fund))?;
        let lamports_per_signature = conn
            .lamports_per_signature(payer)
            .await
            .map_err(GreeterError::rpc(Stage::Fund))?;
        Ok(Self {
            rent_exempt_minimum,
            lamports_per_signature,
        })
    }

    pub fn total(&self) -> u64 {
        self.rent_exempt_minimum
            .saturating_add(self.lamports_per_signature.saturating_mul(FEE_MULTIPLIER))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FundingState {
    Initial,
    Requesting { shortfall: u64 },
    AwaitingConfirmation { signature: Signature },
    Funded { balance: u64 },
}

/// A payer confirmed to hold at least the required balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Funded {
    pub balance: u64,
    /// Lamports requested from the faucet, zero when no top-up was needed.
    pub airdropped: u64,
}

/// Makes sure `payer` holds at least `required` lamports, requesting the
/// shortfall from the cluster faucet when it does not.
pub async fn ensure_funded<C: LedgerConnection + ?Sized>(
    conn: &C,
    payer: &Pubkey,
    required: u64,
) -> Result<Funded> {
    let mut state = FundingState::Initial;
    let mut airdropped = 0;
    loop {
        debug!(payer = %payer, ?state, "Funding");
        state = match state {
            FundingState::Initial => {
                let balance = query_balance(conn, payer).await?;
                if balance >= required {
                    FundingState::Funded { balance }
                } else {
                    FundingState::Requesting {
                        shortfall: required - balance,
                    }
                }
            }
            FundingState::Requesting { shortfall } => {
                let signature = conn
                    .request_airdrop(payer, shortfall)
                    .await
                    .map_err(|source| GreeterError::FaucetUnavailable {
                        payer: *payer,
                        lamports: shortfall,
                        source,
                    })?;
                airdropped = shortfall;
                FundingState::AwaitingConfirmation { signature }
            }
            FundingState::AwaitingConfirmation { signature } => {
                conn.confirm_signature(&signature)
                    .await
                    .map_err(|source| GreeterError::FaucetUnavailable {
                        payer: *payer,
                        lamports: airdropped,
                        source,
                    })?;
                let balance = query_balance(conn, payer).await?;
                if balance < required {
                    return Err(GreeterError::InsufficientFunds {
                        payer: *payer,
                        required,
                        balance,
                    });
                }
                FundingState::Funded { balance }
            }
            FundingState::Funded { balance } => {
                info!(
                    payer = %payer,
                    sol = balance as f64 / LAMPORTS_PER_SOL as f64,
                    "Using account to pay for fees"
                );
                return Ok(Funded {
                    balance,
                    airdropped,
                });
            }
        };
    }
}

async fn query_balance<C: LedgerConnection + ?Sized>(conn: &C, payer: &Pubkey) -> Result<u64> {
    conn.balance(payer)
        .await
        .map_err(GreeterError::rpc(Stage::Fund))
}
