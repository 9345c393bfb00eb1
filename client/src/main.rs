mod args;

use clap::Parser;
use greeting_client::config::{load_cli_config_or_warn, resolve_payer, resolve_rpc_url};
use greeting_client::{GreetingWorkflow, RpcConnection};
use solana_sdk::signature::Signer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{
    get_config_path, get_keypair_path, get_program_keypair_path, get_rpc_url, get_seed, Args,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let config_path = get_config_path(args.config);
    let program_keypair_path = get_program_keypair_path(args.program_keypair);
    let seed = get_seed(args.seed);

    info!("Let's say hello to a Solana account...");

    let cli_config = load_cli_config_or_warn(config_path.as_deref());
    let rpc_url = resolve_rpc_url(get_rpc_url(args.url), cli_config.as_ref());
    let connection = RpcConnection::connect(&rpc_url).await?;

    let payer = resolve_payer(get_keypair_path(args.keypair), cli_config.as_ref());
    info!(payer = %payer.pubkey(), "Payer resolved");

    let mut workflow = GreetingWorkflow::new(connection, payer, seed);
    let report = workflow.run(&program_keypair_path).await?;

    info!(
        greeted = %report.greeted,
        counter = report.counter,
        created = report.created,
        "Success"
    );
    Ok(())
}
