// This file is part of txload.
//
// txload is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// txload is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with txload.
// If not, see https://www.gnu.org/licenses/.

use std::time::Duration;

use alloy_network::{ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types_eth::{BlockId, TransactionReceipt, TransactionRequest};
use txload_contracts::token;
use txload_provider::EvmProvider;
use txload_signer::SigningIdentity;

use crate::{Result, WorkloadError};

/// Tip paid on top of the base fee, 1.5 gwei
const DEFAULT_PRIORITY_FEE: u128 = 1_500_000_000;

/// A transaction accepted into the node's mempool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentTx {
    /// Nonce the transaction was signed with
    pub nonce: u64,
    /// Hash returned by the node
    pub tx_hash: TxHash,
}

/// A submitted, possibly not yet mined, token deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDeployment {
    /// Address the contract is created at once the deployment is mined
    pub address: Address,
    /// Hash of the deployment transaction
    pub tx_hash: TxHash,
    /// Nonce of the deployment transaction
    pub nonce: u64,
}

/// How to poll for a transaction receipt
#[derive(Debug, Clone, Copy)]
pub struct ReceiptPolling {
    /// Delay between receipt queries
    pub interval: Duration,
    /// Give up after this many queries. `None` waits indefinitely.
    pub max_polls: Option<u64>,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_polls: None,
        }
    }
}

/// Connection handle: a node provider paired with the signing identity that
/// authorizes every outgoing transaction
#[derive(Debug)]
pub struct Account<P> {
    provider: P,
    signer: SigningIdentity,
    chain_id: u64,
}

impl<P: EvmProvider> Account<P> {
    /// Connect a signing identity to a node
    ///
    /// Reads the node's chain id once and binds the identity to it.
    pub async fn connect(provider: P, signer: SigningIdentity) -> Result<Self> {
        let chain_id = provider.get_chain_id().await?;
        Ok(Self {
            provider,
            signer: signer.with_chain_id(chain_id),
            chain_id,
        })
    }

    /// Address of the signing identity
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Network identifier (chain id) read at connection time
    pub fn network(&self) -> u64 {
        self.chain_id
    }

    /// Current balance at the latest block
    pub async fn balance(&self) -> Result<U256> {
        Ok(self.provider.get_balance(self.address(), None).await?)
    }

    /// Number of transactions sent by this account as of the latest block
    pub async fn transaction_count(&self) -> Result<u64> {
        Ok(self
            .provider
            .get_transaction_count(self.address(), None)
            .await?)
    }

    /// Send `value` wei to `to` with empty call data
    pub async fn send_transfer(&self, to: Address, value: U256) -> Result<SentTx> {
        let tx = TransactionRequest::default().with_to(to).with_value(value);
        self.submit(tx).await
    }

    /// Deploy a new token minting `initial_supply` to this account
    ///
    /// Returns as soon as the node accepts the deployment. The returned address is
    /// derived from this account and the deployment nonce.
    pub async fn deploy_token(&self, initial_supply: U256) -> Result<PendingDeployment> {
        let tx = TransactionRequest::default().with_deploy_code(token::deploy_code(initial_supply));
        let sent = self.submit(tx).await?;
        Ok(PendingDeployment {
            address: self.address().create(sent.nonce),
            tx_hash: sent.tx_hash,
            nonce: sent.nonce,
        })
    }

    /// Call `transfer(to, amount)` on a deployed token
    pub async fn transfer_token(
        &self,
        token: Address,
        to: Address,
        amount: U256,
    ) -> Result<SentTx> {
        let tx = TransactionRequest::default()
            .with_to(token)
            .with_input(token::transfer_call(to, amount));
        self.submit(tx).await
    }

    /// Wait for a deployment to be mined and return the contract address from its receipt
    pub async fn wait_for_deployment(
        &self,
        deployment: &PendingDeployment,
        polling: ReceiptPolling,
    ) -> Result<Address> {
        let receipt = wait_for_receipt(&self.provider, deployment.tx_hash, polling).await?;
        if !receipt.status() {
            return Err(WorkloadError::DeploymentReverted(deployment.tx_hash));
        }
        receipt
            .contract_address
            .ok_or(WorkloadError::MissingContractAddress(deployment.tx_hash))
    }

    async fn submit(&self, tx: TransactionRequest) -> Result<SentTx> {
        let address = self.address();
        let nonce = self
            .provider
            .get_transaction_count(address, Some(BlockId::pending()))
            .await?;
        let fees = get_fees(&self.provider).await?;

        let mut tx = fees.apply(
            tx.with_from(address)
                .with_nonce(nonce)
                .with_chain_id(self.chain_id),
        );
        let gas_limit = self.provider.estimate_gas(&tx).await?;
        tx.set_gas_limit(gas_limit);

        let tx_bytes = self.signer.sign_tx_raw(tx).await?;
        let tx_hash = self.provider.send_raw_transaction(tx_bytes).await?;
        tracing::debug!(
            "transaction {tx_hash:?} sent with nonce {nonce}, gas limit {gas_limit}, {fees:?}"
        );

        Ok(SentTx { nonce, tx_hash })
    }
}

/// Fee fields of an outgoing transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fees {
    Eip1559 {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
    Legacy {
        gas_price: u128,
    },
}

impl Fees {
    fn apply(self, tx: TransactionRequest) -> TransactionRequest {
        match self {
            Fees::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => tx
                .with_max_fee_per_gas(max_fee_per_gas)
                .with_max_priority_fee_per_gas(max_priority_fee_per_gas),
            Fees::Legacy { gas_price } => tx.with_gas_price(gas_price),
        }
    }
}

/// EIP-1559 fees at twice the latest base fee plus the default tip, or a legacy gas
/// price from the node when its blocks carry no base fee
async fn get_fees<P: EvmProvider>(provider: &P) -> Result<Fees> {
    match provider.get_latest_base_fee().await? {
        Some(base_fee) => Ok(Fees::Eip1559 {
            max_fee_per_gas: base_fee.saturating_mul(2).saturating_add(DEFAULT_PRIORITY_FEE),
            max_priority_fee_per_gas: DEFAULT_PRIORITY_FEE,
        }),
        None => Ok(Fees::Legacy {
            gas_price: provider.get_gas_price().await?,
        }),
    }
}

async fn wait_for_receipt<P: EvmProvider>(
    provider: &P,
    tx_hash: TxHash,
    polling: ReceiptPolling,
) -> Result<TransactionReceipt> {
    let mut polls = 0;
    loop {
        polls += 1;
        if let Some(receipt) = provider.get_transaction_receipt(tx_hash).await? {
            return Ok(receipt);
        }
        if polling.max_polls.is_some_and(|max| polls >= max) {
            return Err(WorkloadError::NotMined { tx_hash, polls });
        }
        tracing::trace!("transaction {tx_hash:?} not mined yet, poll {polls}");
        tokio::time::sleep(polling.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use alloy_consensus::Transaction;
    use alloy_primitives::{address, Bytes, TxKind};
    use alloy_sol_types::SolCall;
    use txload_contracts::token::LoadToken;
    use txload_provider::{MockEvmProvider, ProviderError};

    use super::*;
    use crate::test_utils::{self, Submissions, BASE_FEE, CHAIN_ID, GAS_LIMIT, GAS_PRICE};

    const TO: Address = address!("000000000000000000000000000000000000dEaD");

    async fn connect(provider: MockEvmProvider) -> Account<MockEvmProvider> {
        Account::connect(provider, test_utils::identity())
            .await
            .unwrap()
    }

    fn provider_with_chain_id() -> MockEvmProvider {
        let mut provider = MockEvmProvider::new();
        provider
            .expect_get_chain_id()
            .once()
            .returning(|| Ok(CHAIN_ID));
        provider
    }

    #[tokio::test]
    async fn test_connect_binds_chain_id() {
        let account = connect(provider_with_chain_id()).await;
        assert_eq!(account.network(), CHAIN_ID);
        assert_eq!(account.address(), test_utils::DEV_ADDRESS);
        assert_eq!(account.signer.chain_id(), Some(CHAIN_ID));
    }

    #[tokio::test]
    async fn test_connect_error() {
        let mut provider = MockEvmProvider::new();
        provider
            .expect_get_chain_id()
            .returning(|| Err(ProviderError::Other(anyhow_err("connection refused"))));
        let res = Account::connect(provider, test_utils::identity()).await;
        assert!(matches!(res, Err(WorkloadError::Provider(_))));
    }

    #[tokio::test]
    async fn test_send_transfer() {
        let mut provider = provider_with_chain_id();
        let submissions = Submissions::install(&mut provider, 5);

        let account = connect(provider).await;
        let sent = account.send_transfer(TO, U256::from(42)).await.unwrap();
        assert_eq!(sent.nonce, 5);

        let txs = submissions.txs();
        assert_eq!(txs.len(), 1);
        let tx = &txs[0];
        assert!(tx.is_eip1559());
        assert_eq!(sent.tx_hash, *tx.tx_hash());
        assert_eq!(tx.kind(), TxKind::Call(TO));
        assert_eq!(tx.value(), U256::from(42));
        assert!(tx.input().is_empty());
        assert_eq!(tx.chain_id(), Some(CHAIN_ID));
        assert_eq!(tx.gas_limit(), GAS_LIMIT);
        assert_eq!(tx.max_fee_per_gas(), BASE_FEE * 2 + DEFAULT_PRIORITY_FEE);
        assert_eq!(tx.max_priority_fee_per_gas(), Some(DEFAULT_PRIORITY_FEE));
    }

    #[tokio::test]
    async fn test_send_transfer_without_base_fee() {
        let mut provider = provider_with_chain_id();
        let submissions = Submissions::install_pre_london(&mut provider, 5);

        let account = connect(provider).await;
        let sent = account.send_transfer(TO, U256::from(42)).await.unwrap();
        assert_eq!(sent.nonce, 5);

        let tx = &submissions.txs()[0];
        assert!(tx.is_legacy());
        assert_eq!(tx.gas_price(), Some(GAS_PRICE));
        assert_eq!(tx.chain_id(), Some(CHAIN_ID));
        assert_eq!(tx.kind(), TxKind::Call(TO));
        assert_eq!(tx.value(), U256::from(42));
    }

    #[tokio::test]
    async fn test_fees_from_base_fee() {
        let mut provider = MockEvmProvider::new();
        provider
            .expect_get_latest_base_fee()
            .returning(|| Ok(Some(10)));
        provider.expect_get_gas_price().never();

        assert_eq!(
            get_fees(&provider).await.unwrap(),
            Fees::Eip1559 {
                max_fee_per_gas: 20 + DEFAULT_PRIORITY_FEE,
                max_priority_fee_per_gas: DEFAULT_PRIORITY_FEE,
            }
        );
    }

    #[tokio::test]
    async fn test_legacy_fees_without_base_fee() {
        let mut provider = MockEvmProvider::new();
        provider.expect_get_latest_base_fee().returning(|| Ok(None));
        provider.expect_get_gas_price().once().returning(|| Ok(7));

        assert_eq!(get_fees(&provider).await.unwrap(), Fees::Legacy { gas_price: 7 });
    }

    #[tokio::test]
    async fn test_deploy_token_address_from_nonce() {
        let mut provider = provider_with_chain_id();
        let submissions = Submissions::install(&mut provider, 3);

        let account = connect(provider).await;
        let deployment = account.deploy_token(U256::from(1000)).await.unwrap();

        assert_eq!(deployment.nonce, 3);
        assert_eq!(deployment.address, test_utils::DEV_ADDRESS.create(3));

        let tx = &submissions.txs()[0];
        assert_eq!(tx.kind(), TxKind::Create);
        assert_eq!(tx.value(), U256::ZERO);
        assert_eq!(*tx.input(), token::deploy_code(U256::from(1000)));
    }

    #[tokio::test]
    async fn test_transfer_token_calldata() {
        let mut provider = provider_with_chain_id();
        let submissions = Submissions::install(&mut provider, 0);

        let token_address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let account = connect(provider).await;
        account
            .transfer_token(token_address, TO, U256::from(7))
            .await
            .unwrap();

        let tx = &submissions.txs()[0];
        assert_eq!(tx.kind(), TxKind::Call(token_address));
        assert_eq!(tx.value(), U256::ZERO);
        let call = LoadToken::transferCall::abi_decode(tx.input(), true).unwrap();
        assert_eq!(call.to, TO);
        assert_eq!(call.amount, U256::from(7));
    }

    #[tokio::test]
    async fn test_rejected_submission() {
        let mut provider = provider_with_chain_id();
        test_utils::set_nonce_and_fees(&mut provider, 0);
        provider
            .expect_send_raw_transaction()
            .once()
            .returning(|_: Bytes| Err(ProviderError::Other(anyhow_err("insufficient funds"))));

        let account = connect(provider).await;
        let res = account.send_transfer(TO, U256::from(1)).await;
        assert!(matches!(res, Err(WorkloadError::Provider(_))));
    }

    #[tokio::test]
    async fn test_wait_for_deployment() {
        let mut provider = provider_with_chain_id();
        let deployment = pending_deployment();
        let contract = deployment.address;

        let mut seq = mockall::Sequence::new();
        provider
            .expect_get_transaction_receipt()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        provider
            .expect_get_transaction_receipt()
            .once()
            .in_sequence(&mut seq)
            .returning(move |hash| Ok(Some(test_utils::receipt(hash, true, Some(contract)))));

        let account = connect(provider).await;
        let address = account
            .wait_for_deployment(&deployment, fast_polling(None))
            .await
            .unwrap();
        assert_eq!(address, contract);
    }

    #[tokio::test]
    async fn test_wait_for_reverted_deployment() {
        let mut provider = provider_with_chain_id();
        let deployment = pending_deployment();
        provider
            .expect_get_transaction_receipt()
            .returning(|hash| Ok(Some(test_utils::receipt(hash, false, None))));

        let account = connect(provider).await;
        let res = account
            .wait_for_deployment(&deployment, fast_polling(None))
            .await;
        assert!(
            matches!(res, Err(WorkloadError::DeploymentReverted(h)) if h == deployment.tx_hash)
        );
    }

    #[tokio::test]
    async fn test_wait_for_deployment_without_address() {
        let mut provider = provider_with_chain_id();
        let deployment = pending_deployment();
        provider
            .expect_get_transaction_receipt()
            .returning(|hash| Ok(Some(test_utils::receipt(hash, true, None))));

        let account = connect(provider).await;
        let res = account
            .wait_for_deployment(&deployment, fast_polling(None))
            .await;
        assert!(matches!(res, Err(WorkloadError::MissingContractAddress(_))));
    }

    #[tokio::test]
    async fn test_wait_for_deployment_max_polls() {
        let mut provider = provider_with_chain_id();
        let deployment = pending_deployment();
        provider
            .expect_get_transaction_receipt()
            .times(3)
            .returning(|_| Ok(None));

        let account = connect(provider).await;
        let res = account
            .wait_for_deployment(&deployment, fast_polling(Some(3)))
            .await;
        assert!(matches!(res, Err(WorkloadError::NotMined { polls: 3, .. })));
    }

    fn pending_deployment() -> PendingDeployment {
        PendingDeployment {
            address: test_utils::DEV_ADDRESS.create(0),
            tx_hash: TxHash::repeat_byte(1),
            nonce: 0,
        }
    }

    fn fast_polling(max_polls: Option<u64>) -> ReceiptPolling {
        ReceiptPolling {
            interval: Duration::from_millis(1),
            max_polls,
        }
    }

    fn anyhow_err(msg: &'static str) -> anyhow::Error {
        anyhow::anyhow!(msg)
    }
}
