use std::path::{Path, PathBuf};

use greeting_program::state::GreetingAccount;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use tracing::{debug, info};

use crate::address::derive_greeting_address;
use crate::config::{program_artifact_path, read_program_id};
use crate::connection::LedgerConnection;
use crate::error::{GreeterError, Result, Stage};
use crate::funding::{ensure_funded, FeeBudget, Funded};
use crate::instructions::{create_greeting_account, greet};

/// Outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreetingReport {
    pub greeted: Pubkey,
    pub counter: u32,
    /// Whether this run created the greeting account.
    pub created: bool,
}

/// Per-run context: everything the stages share lives here and is dropped
/// with it.
pub struct GreetingWorkflow<C> {
    connection: C,
    payer: Keypair,
    seed: String,
    program_id: Option<Pubkey>,
    greeted: Option<Pubkey>,
}

impl<C: LedgerConnection> GreetingWorkflow<C> {
    pub fn new(connection: C, payer: Keypair, seed: impl Into<String>) -> Self {
        Self {
            connection,
            payer,
            seed: seed.into(),
            program_id: None,
            greeted: None,
        }
    }

    /// Runs funding, program validation, account provisioning, the greeting
    /// and the report, in that order.
    pub async fn run(&mut self, program_keypair_path: &Path) -> Result<GreetingReport> {
        self.fund_payer().await?;
        self.check_program(program_keypair_path).await?;
        let created = self.ensure_greeting_account().await?;
        self.say_hello().await?;
        let counter = self.report_greetings().await?;
        Ok(GreetingReport {
            greeted: self.greeted()?,
            counter,
            created,
        })
    }

    pub async fn fund_payer(&self) -> Result<Funded> {
        let payer = self.payer.pubkey();
        let budget = FeeBudget::fetch(&self.connection, &payer).await?;
        debug!(
            rent_exempt_minimum = budget.rent_exempt_minimum,
            lamports_per_signature = budget.lamports_per_signature,
            required = budget.total(),
            "Computed fee budget"
        );
        ensure_funded(&self.connection, &payer, budget.total()).await
    }

    /// Reads the program id and checks the program is deployed and executable.
    pub async fn check_program(&mut self, program_keypair_path: &Path) -> Result<Pubkey> {
        let program_id = read_program_id(program_keypair_path)?;
        let program_info = self
            .connection
            .account(&program_id)
            .await
            .map_err(GreeterError::rpc(Stage::ValidateProgram))?;

        match program_info {
            None => {
                let artifact = program_artifact_path(program_keypair_path);
                return Err(GreeterError::ProgramNotDeployed {
                    program_id,
                    artifact: if_exists(artifact),
                });
            }
            Some(info) if !info.executable => {
                return Err(GreeterError::ProgramNotExecutable(program_id))
            }
            Some(_) => {}
        }

        info!(program_id = %program_id, "Using program");
        self.program_id = Some(program_id);
        Ok(program_id)
    }

    /// Creates the greeting account unless it already exists. Returns whether
    /// a creation transaction was sent.
    pub async fn ensure_greeting_account(&mut self) -> Result<bool> {
        let program_id = self.program_id()?;
        let payer = self.payer.pubkey();
        let greeted = derive_greeting_address(&payer, &self.seed, &program_id)?;
        self.greeted = Some(greeted);

        let existing = self
            .connection
            .account(&greeted)
            .await
            .map_err(GreeterError::rpc(Stage::EnsureAccount))?;
        if let Some(account) = existing {
            if account.owner != program_id || account.data.len() != GreetingAccount::space() {
                return Err(GreeterError::AccountMismatch {
                    address: greeted,
                    expected_owner: program_id,
                    actual_owner: account.owner,
                    expected_len: GreetingAccount::space(),
                    actual_len: account.data.len(),
                });
            }
            debug!(greeted = %greeted, "Greeting account already exists");
            return Ok(false);
        }

        info!(greeted = %greeted, "Creating account to say hello to");
        let lamports = self
            .connection
            .minimum_balance_for_rent_exemption(GreetingAccount::space())
            .await
            .map_err(GreeterError::rpc(Stage::EnsureAccount))?;
        let ix = create_greeting_account(&payer, &greeted, &self.seed, lamports, &program_id);
        let signature = self.send_and_confirm(ix, Stage::EnsureAccount).await?;
        debug!(greeted = %greeted, %signature, "Greeting account created");
        Ok(true)
    }

    pub async fn say_hello(&self) -> Result<Signature> {
        let greeted = self.greeted()?;
        info!(greeted = %greeted, "Saying hello");
        let ix = greet(&self.program_id()?, &greeted);
        self.send_and_confirm(ix, Stage::Greet).await
    }

    /// Reads back how many times the greeting account has been greeted.
    pub async fn report_greetings(&self) -> Result<u32> {
        let greeted = self.greeted()?;
        let account = self
            .connection
            .account(&greeted)
            .await
            .map_err(GreeterError::rpc(Stage::Report))?
            .ok_or(GreeterError::AccountNotFound(greeted))?;
        let greeting = GreetingAccount::unpack(&account.data)?;
        info!(
            greeted = %greeted,
            counter = greeting.counter,
            "Account has been greeted {} time(s)",
            greeting.counter
        );
        Ok(greeting.counter)
    }

    async fn send_and_confirm(&self, ix: Instruction, stage: Stage) -> Result<Signature> {
        let blockhash = self
            .connection
            .latest_blockhash()
            .await
            .map_err(GreeterError::rpc(stage))?;
        let tx = Transaction::new_signed_with_payer(
            &[ix],
            Some(&self.payer.pubkey()),
            &[&self.payer],
            blockhash,
        );
        self.connection
            .send_and_confirm_transaction(&tx)
            .await
            .map_err(GreeterError::rpc(stage))
    }

    fn program_id(&self) -> Result<Pubkey> {
        self.program_id.ok_or(GreeterError::OutOfOrder {
            requires: Stage::ValidateProgram,
        })
    }

    fn greeted(&self) -> Result<Pubkey> {
        self.greeted.ok_or(GreeterError::OutOfOrder {
            requires: Stage::EnsureAccount,
        })
    }
}

fn if_exists(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}
