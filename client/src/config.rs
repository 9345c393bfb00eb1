use std::path::{Path, PathBuf};

use serde::Deserialize;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signer},
};
use tracing::{info, warn};

use crate::error::{GreeterError, Result};

pub const DEFAULT_RPC_URL: &str = "http://localhost:8899";
pub const DEFAULT_PROGRAM_KEYPAIR_PATH: &str = "target/deploy/greeting_program-keypair.json";
pub const PROGRAM_SO_NAME: &str = "greeting_program.so";

/// The keys this client reads from the Solana CLI config file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub json_rpc_url: Option<String>,
    #[serde(default)]
    pub keypair_path: Option<String>,
}

/// `~/.config/solana/cli/config.yml`
pub fn default_cli_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("solana").join("cli").join("config.yml"))
}

pub fn parse_cli_config(path: &Path, yaml: &str) -> Result<CliConfig> {
    serde_yaml::from_str(yaml).map_err(|err| GreeterError::ConfigRead {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

pub fn load_cli_config(path: &Path) -> Result<CliConfig> {
    let yaml = std::fs::read_to_string(path).map_err(|err| GreeterError::ConfigRead {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    parse_cli_config(path, &yaml)
}

/// Loads the CLI config, or `None` with a warning when it cannot be read.
pub fn load_cli_config_or_warn(path: Option<&Path>) -> Option<CliConfig> {
    let path = path?;
    match load_cli_config(path) {
        Ok(config) => Some(config),
        Err(err) => {
            warn!(error = %err, "Ignoring CLI config file");
            None
        }
    }
}

/// Explicit URL first, then the CLI config, then localhost.
pub fn resolve_rpc_url(explicit: Option<String>, cli_config: Option<&CliConfig>) -> String {
    if let Some(url) = explicit {
        return url;
    }
    match cli_config.and_then(|config| config.json_rpc_url.clone()) {
        Some(url) if !url.trim().is_empty() => url,
        _ => {
            warn!(
                fallback = DEFAULT_RPC_URL,
                "Failed to read RPC url from CLI config file, falling back to localhost"
            );
            DEFAULT_RPC_URL.to_string()
        }
    }
}

/// Payer from the explicit path or the CLI config. Anything unreadable falls
/// back to a fresh keypair that only lives for this run.
pub fn resolve_payer(explicit: Option<PathBuf>, cli_config: Option<&CliConfig>) -> Keypair {
    let path = explicit.or_else(|| {
        cli_config
            .and_then(|config| config.keypair_path.as_deref())
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    });

    let loaded = match path {
        Some(path) => read_keypair(&path).map_err(|reason| (path, reason)),
        None => Err((PathBuf::new(), "missing keypair path".to_string())),
    };
    match loaded {
        Ok(keypair) => keypair,
        Err((path, reason)) => {
            warn!(
                path = %path.display(),
                reason = %reason,
                "Failed to create keypair from CLI config file, falling back to new random keypair"
            );
            Keypair::new()
        }
    }
}

/// Reads the program id from its deploy keypair.
pub fn read_program_id(path: &Path) -> Result<Pubkey> {
    let program_id = read_keypair(path)
        .map_err(|reason| GreeterError::ProgramKeypairMissing {
            path: path.to_path_buf(),
            reason,
        })?
        .pubkey();
    info!(program_id = %program_id, "Loaded program keypair");
    Ok(program_id)
}

/// The shared object `solana program deploy` expects next to the keypair.
pub fn program_artifact_path(program_keypair_path: &Path) -> PathBuf {
    program_keypair_path.with_file_name(PROGRAM_SO_NAME)
}

fn read_keypair(path: &Path) -> std::result::Result<Keypair, String> {
    read_keypair_file(path).map_err(|err| err.to_string())
}
