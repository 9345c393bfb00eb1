use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, message::Message,
    pubkey::Pubkey, signature::Signature, transaction::Transaction,
};
use tracing::info;

use crate::error::{GreeterError, Result, TransportError};

/// The slice of cluster RPC the greeting workflow relies on.
#[async_trait]
pub trait LedgerConnection: Send + Sync {
    async fn version(&self) -> std::result::Result<String, TransportError>;

    async fn balance(&self, pubkey: &Pubkey) -> std::result::Result<u64, TransportError>;

    async fn request_airdrop(
        &self,
        pubkey: &Pubkey,
        lamports: u64,
    ) -> std::result::Result<Signature, TransportError>;

    /// Blocks until `signature` reaches the connection's commitment, or the
    /// transport gives up.
    async fn confirm_signature(
        &self,
        signature: &Signature,
    ) -> std::result::Result<(), TransportError>;

    async fn account(&self, pubkey: &Pubkey)
        -> std::result::Result<Option<Account>, TransportError>;

    async fn minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> std::result::Result<u64, TransportError>;

    /// Fee charged for one signature on a transaction built for `payer`.
    async fn lamports_per_signature(
        &self,
        payer: &Pubkey,
    ) -> std::result::Result<u64, TransportError>;

    async fn latest_blockhash(&self) -> std::result::Result<Hash, TransportError>;

    async fn send_and_confirm_transaction(
        &self,
        tx: &Transaction,
    ) -> std::result::Result<Signature, TransportError>;
}

/// [`LedgerConnection`] over the cluster's JSON RPC endpoint.
pub struct RpcConnection {
    rpc_client: RpcClient,
}

impl RpcConnection {
    /// Opens a client at `confirmed` commitment and checks the endpoint answers
    /// `getVersion`. No retries.
    pub async fn connect(url: &str) -> Result<Self> {
        let rpc_client =
            RpcClient::new_with_commitment(url.to_string(), CommitmentConfig::confirmed());
        let connection = Self { rpc_client };
        let version = connection
            .version()
            .await
            .map_err(|source| GreeterError::Connection {
                url: url.to_string(),
                source,
            })?;
        info!(url = %url, version = %version, "Connection to cluster established");
        Ok(connection)
    }
}

#[async_trait]
impl LedgerConnection for RpcConnection {
    async fn version(&self) -> std::result::Result<String, TransportError> {
        Ok(self.rpc_client.get_version().await?.solana_core)
    }

    async fn balance(&self, pubkey: &Pubkey) -> std::result::Result<u64, TransportError> {
        Ok(self.rpc_client.get_balance(pubkey).await?)
    }

    async fn request_airdrop(
        &self,
        pubkey: &Pubkey,
        lamports: u64,
    ) -> std::result::Result<Signature, TransportError> {
        Ok(self.rpc_client.request_airdrop(pubkey, lamports).await?)
    }

    async fn confirm_signature(
        &self,
        signature: &Signature,
    ) -> std::result::Result<(), TransportError> {
        Ok(self
            .rpc_client
            .poll_for_signature_with_commitment(signature, self.rpc_client.commitment())
            .await?)
    }

    async fn account(
        &self,
        pubkey: &Pubkey,
    ) -> std::result::Result<Option<Account>, TransportError> {
        Ok(self
            .rpc_client
            .get_account_with_commitment(pubkey, self.rpc_client.commitment())
            .await?
            .value)
    }

    async fn minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> std::result::Result<u64, TransportError> {
        Ok(self
            .rpc_client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await?)
    }

    async fn lamports_per_signature(
        &self,
        payer: &Pubkey,
    ) -> std::result::Result<u64, TransportError> {
        // An instruction-less message pays for exactly its one signature
        let blockhash = self.rpc_client.get_latest_blockhash().await?;
        let message = Message::new_with_blockhash(&[], Some(payer), &blockhash);
        Ok(self.rpc_client.get_fee_for_message(&message).await?)
    }

    async fn latest_blockhash(&self) -> std::result::Result<Hash, TransportError> {
        Ok(self.rpc_client.get_latest_blockhash().await?)
    }

    async fn send_and_confirm_transaction(
        &self,
        tx: &Transaction,
    ) -> std::result::Result<Signature, TransportError> {
        Ok(self.rpc_client.send_and_confirm_transaction(tx).await?)
    }
}
