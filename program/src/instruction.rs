// instruction.rs
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

/// Builds the greeting instruction. Every instruction the program receives is a
/// greeting, so the payload is empty and the only account is the greeted one.
pub fn greet(program_id: &Pubkey, greeted: &Pubkey) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new(*greeted, false)],
        data: Vec::new(),
    }
}
