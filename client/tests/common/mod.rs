#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use greeting_client::error::TransportError;
use greeting_client::{GreetingAccount, LedgerConnection};
use solana_sdk::{
    account::Account,
    hash::Hash,
    pubkey::Pubkey,
    rent::Rent,
    signature::{Keypair, Signature},
    signer::keypair::write_keypair_file,
    system_instruction::SystemInstruction,
    system_program,
    transaction::Transaction,
};

pub const LAMPORTS_PER_SIGNATURE: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faucet {
    /// Grants every request in full.
    Open,
    /// Refuses every request.
    Closed,
    /// Grants at most this many lamports per request.
    Capped(u64),
    /// Accepts requests but never confirms them.
    Unconfirmed,
}

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<Pubkey, Account>,
    airdrops: Vec<(Pubkey, u64)>,
    transactions: Vec<Transaction>,
    account_creations: usize,
}

/// Ledger held in memory, shared by clones so a test can inspect it after a
/// workflow consumed its own handle.
#[derive(Clone)]
pub struct InMemoryLedger {
    state: Arc<Mutex<LedgerState>>,
    faucet: Faucet,
}

impl InMemoryLedger {
    pub fn new(faucet: Faucet) -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState::default())),
            faucet,
        }
    }

    pub fn set_account(&self, pubkey: Pubkey, account: Account) {
        self.state.lock().unwrap().accounts.insert(pubkey, account);
    }

    pub fn remove_account(&self, pubkey: &Pubkey) {
        self.state.lock().unwrap().accounts.remove(pubkey);
    }

    pub fn get_account(&self, pubkey: &Pubkey) -> Option<Account> {
        self.state.lock().unwrap().accounts.get(pubkey).cloned()
    }

    pub fn fund(&self, pubkey: Pubkey, lamports: u64) {
        self.set_account(
            pubkey,
            Account {
                lamports,
                data: vec![],
                owner: system_program::id(),
                executable: false,
                rent_epoch: 0,
            },
        );
    }

    pub fn deploy(&self, program_id: Pubkey, executable: bool) {
        self.set_account(
            program_id,
            Account {
                lamports: 1_000_000_000,
                data: vec![1; 36],
                owner: solana_sdk::bpf_loader_upgradeable::id(),
                executable,
                rent_epoch: 0,
            },
        );
    }

    pub fn counter(&self, pubkey: &Pubkey) -> Option<u32> {
        self.get_account(pubkey)
            .map(|account| GreetingAccount::unpack(&account.data).unwrap().counter)
    }

    pub fn airdrops(&self) -> Vec<(Pubkey, u64)> {
        self.state.lock().unwrap().airdrops.clone()
    }

    pub fn transaction_count(&self) -> usize {
        self.state.lock().unwrap().transactions.len()
    }

    pub fn account_creations(&self) -> usize {
        self.state.lock().unwrap().account_creations
    }
}

impl LedgerState {
    fn debit(&mut self, pubkey: &Pubkey, lamports: u64) -> Result<(), TransportError> {
        let account = self
            .accounts
            .get_mut(pubkey)
            .ok_or("attempt to debit an account but found no record of a prior credit")?;
        account.lamports = account
            .lamports
            .checked_sub(lamports)
            .ok_or("insufficient funds")?;
        Ok(())
    }

    fn execute(&mut self, tx: &Transaction) -> Result<(), TransportError> {
        let keys = &tx.message.account_keys;
        let fee_payer = keys.first().ok_or("transaction has no fee payer")?;
        self.debit(fee_payer, LAMPORTS_PER_SIGNATURE * tx.signatures.len() as u64)?;

        for ix in &tx.message.instructions {
            let program_id = keys[ix.program_id_index as usize];
            let accounts: Vec<Pubkey> = ix.accounts.iter().map(|i| keys[*i as usize]).collect();

            if program_id == system_program::id() {
                match bincode::deserialize::<SystemInstruction>(&ix.data)? {
                    SystemInstruction::CreateAccountWithSeed {
                        base,
                        seed,
                        lamports,
                        space,
                        owner,
                    } => {
                        let address = Pubkey::create_with_seed(&base, &seed, &owner)?;
                        if address != accounts[1] {
                            return Err("create account with seed: address mismatch".into());
                        }
                        if self.accounts.contains_key(&address) {
                            return Err("account already in use".into());
                        }
                        self.debit(&accounts[0], lamports)?;
                        self.accounts.insert(
                            address,
                            Account {
                                lamports,
                                data: vec![0; space as usize],
                                owner,
                                executable: false,
                                rent_epoch: 0,
                            },
                        );
                        self.account_creations += 1;
                    }
                    other => return Err(format!("unsupported instruction {other:?}").into()),
                }
                continue;
            }

            let executable = self
                .accounts
                .get(&program_id)
                .map(|program| program.executable)
                .unwrap_or(false);
            if !executable {
                return Err("program is not executable".into());
            }
            let greeted = self
                .accounts
                .get_mut(&accounts[0])
                .ok_or("greeted account not found")?;
            if greeted.owner != program_id {
                return Err("incorrect program id".into());
            }
            let mut greeting = GreetingAccount::unpack(&greeted.data)?;
            greeting.counter = greeting.counter.checked_add(1).ok_or("overflow")?;
            greeted.data.copy_from_slice(&greeting.pack());
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerConnection for InMemoryLedger {
    async fn version(&self) -> Result<String, TransportError> {
        Ok("in-memory".to_string())
    }

    async fn balance(&self, pubkey: &Pubkey) -> Result<u64, TransportError> {
        Ok(self
            .get_account(pubkey)
            .map(|account| account.lamports)
            .unwrap_or(0))
    }

    async fn request_airdrop(
        &self,
        pubkey: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, TransportError> {
        let granted = match self.faucet {
            Faucet::Open | Faucet::Unconfirmed => lamports,
            Faucet::Closed => return Err("airdrop request failed: faucet unavailable".into()),
            Faucet::Capped(cap) => lamports.min(cap),
        };
        let mut state = self.state.lock().unwrap();
        state.airdrops.push((*pubkey, lamports));
        let account = state.accounts.entry(*pubkey).or_insert_with(|| Account {
            lamports: 0,
            data: vec![],
            owner: system_program::id(),
            executable: false,
            rent_epoch: 0,
        });
        account.lamports += granted;
        Ok(Signature::new_unique())
    }

    async fn confirm_signature(&self, signature: &Signature) -> Result<(), TransportError> {
        match self.faucet {
            Faucet::Unconfirmed => Err(format!("signature {signature} not confirmed").into()),
            _ => Ok(()),
        }
    }

    async fn account(&self, pubkey: &Pubkey) -> Result<Option<Account>, TransportError> {
        Ok(self.get_account(pubkey))
    }

    async fn minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, TransportError> {
        Ok(Rent::default().minimum_balance(data_len))
    }

    async fn lamports_per_signature(&self, _payer: &Pubkey) -> Result<u64, TransportError> {
        Ok(LAMPORTS_PER_SIGNATURE)
    }

    async fn latest_blockhash(&self) -> Result<Hash, TransportError> {
        Ok(Hash::new_unique())
    }

    async fn send_and_confirm_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<Signature, TransportError> {
        let mut state = self.state.lock().unwrap();
        // Apply against a copy so a failing instruction leaves nothing behind
        let snapshot = state.accounts.clone();
        if let Err(err) = state.execute(tx) {
            state.accounts = snapshot;
            return Err(err);
        }
        state.transactions.push(tx.clone());
        Ok(tx.signatures[0])
    }
}

/// Writes a fresh program keypair to a scratch file.
pub fn program_keypair_file() -> (Keypair, PathBuf) {
    let keypair = Keypair::new();
    let path = scratch_dir().join("greeting_program-keypair.json");
    write_keypair_file(&keypair, &path).unwrap();
    (keypair, path)
}

/// A path inside a fresh scratch directory that does not exist.
pub fn missing_program_keypair_file() -> PathBuf {
    scratch_dir().join("greeting_program-keypair.json")
}

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "greeting-client-{}-{}",
        std::process::id(),
        Pubkey::new_unique()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
