use greeting_program::state::GreetingAccount;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_instruction};

/// Creates the greeting account at its seed-derived address, funded and
/// based on `payer`, sized for one record and owned by the program.
pub fn create_greeting_account(
    payer: &Pubkey,
    greeted: &Pubkey,
    seed: &str,
    lamports: u64,
    program_id: &Pubkey,
) -> Instruction {
    system_instruction::create_account_with_seed(
        payer,
        greeted,
        payer,
        seed,
        lamports,
        GreetingAccount::space() as u64,
        program_id,
    )
}

pub use greeting_program::instruction::greet;
