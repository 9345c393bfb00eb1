use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::state::GreetingAccount;

// Instruction data is ignored: every instruction is a greeting.
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    _instruction_data: &[u8],
) -> ProgramResult {
    msg!("Instruction: Greet");
    process_greet(program_id, accounts)
}

pub fn process_greet(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let greeted_account = next_account_info(accounts_iter)?;

    // Only accounts created for this program may be greeted
    if greeted_account.owner != program_id {
        msg!(
            "Greeted account {} is owned by {}, expected {}",
            greeted_account.key,
            greeted_account.owner,
            program_id
        );
        return Err(ProgramError::IncorrectProgramId);
    }
    if !greeted_account.is_writable {
        msg!("Greeted account {} must be writable", greeted_account.key);
        return Err(ProgramError::InvalidAccountData);
    }

    let mut data = greeted_account.try_borrow_mut_data()?;
    let mut greeting = GreetingAccount::unpack(&data).map_err(|err| {
        msg!("{}", err);
        ProgramError::InvalidAccountData
    })?;
    greeting.counter = greeting
        .counter
        .checked_add(1)
        .ok_or(ProgramError::ArithmeticOverflow)?;
    data.copy_from_slice(&greeting.pack());

    msg!(
        "Greeted {} time(s) on {}",
        greeting.counter,
        greeted_account.key
    );
    Ok(())
}
