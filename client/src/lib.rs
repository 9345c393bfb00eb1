pub mod address;
pub mod config;
pub mod connection;
pub mod error;
pub mod funding;
pub mod instructions;
pub mod workflow;

pub use crate::address::{derive_greeting_address, GREETING_SEED};
pub use crate::connection::{LedgerConnection, RpcConnection};
pub use crate::error::{GreeterError, Result, Stage};
pub use crate::funding::{ensure_funded, FeeBudget, Funded};
pub use crate::workflow::{GreetingReport, GreetingWorkflow};
pub use greeting_program::state::{GreetingAccount, RecordSizeError};
