use std::path::PathBuf;

use clap::Parser;
use greeting_client::config::DEFAULT_PROGRAM_KEYPAIR_PATH;
use greeting_client::GREETING_SEED;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(long, help = "Solana CLI config file (defaults to ~/.config/solana/cli/config.yml)")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Solana cluster URL, overrides the CLI config")]
    pub url: Option<String>,
    #[arg(long, help = "Payer keypair file, overrides the CLI config")]
    pub keypair: Option<PathBuf>,
    #[arg(long, help = "Keypair file of the deployed greeting program")]
    pub program_keypair: Option<PathBuf>,
    #[arg(long, help = "Seed used to derive the greeting account")]
    pub seed: Option<String>,
}

pub fn get_config_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    std::env::var("GREETER_CONFIG")
        .ok()
        .map(PathBuf::from)
        .or(cli_path)
        .or_else(greeting_client::config::default_cli_config_path)
}

pub fn get_rpc_url(cli_url: Option<String>) -> Option<String> {
    std::env::var("GREETER_RPC_URL").ok().or(cli_url)
}

pub fn get_keypair_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    std::env::var("GREETER_KEYPAIR")
        .ok()
        .map(PathBuf::from)
        .or(cli_path)
}

pub fn get_program_keypair_path(cli_path: Option<PathBuf>) -> PathBuf {
    std::env::var("GREETER_PROGRAM_KEYPAIR")
        .ok()
        .map(PathBuf::from)
        .or(cli_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM_KEYPAIR_PATH))
}

pub fn get_seed(cli_seed: Option<String>) -> String {
    std::env::var("GREETER_SEED")
        .ok()
        .or(cli_seed)
        .unwrap_or_else(|| GREETING_SEED.to_string())
}
