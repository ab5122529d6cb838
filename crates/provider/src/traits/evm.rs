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

//! Trait for interacting with chain data and submitting transactions.

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_rpc_types_eth::{BlockId, TransactionReceipt, TransactionRequest};
#[cfg(feature = "test-utils")]
use mockall::automock;

use super::error::ProviderResult;

/// Trait for interacting with chain data and submitting transactions.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait EvmProvider: Send + Sync {
    /// Get the chain id reported by the node
    async fn get_chain_id(&self) -> ProviderResult<u64>;

    /// Get the balance of an address
    async fn get_balance(&self, address: Address, block: Option<BlockId>) -> ProviderResult<U256>;

    /// Get the nonce/transaction count of an address
    ///
    /// Pass `BlockId::pending()` to include transactions still in the node's mempool.
    async fn get_transaction_count(
        &self,
        address: Address,
        block: Option<BlockId>,
    ) -> ProviderResult<u64>;

    /// Get the legacy gas price as reported by the node's RPC
    async fn get_gas_price(&self) -> ProviderResult<u128>;

    /// Get the base fee of the latest block
    ///
    /// Returns `None` when the node's blocks carry no base fee, i.e. before London.
    async fn get_latest_base_fee(&self) -> ProviderResult<Option<u128>>;

    /// Estimate the gas required by a transaction
    async fn estimate_gas(&self, tx: &TransactionRequest) -> ProviderResult<u64>;

    /// Send a raw, signed transaction, returning its hash once the node accepts it
    async fn send_raw_transaction(&self, tx: Bytes) -> ProviderResult<TxHash>;

    /// Get transaction receipt by hash
    async fn get_transaction_receipt(
        &self,
        tx: TxHash,
    ) -> ProviderResult<Option<TransactionReceipt>>;
}
