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

use std::marker::PhantomData;

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::Provider as AlloyProvider;
use alloy_rpc_types_eth::{
    BlockId, BlockTransactionsKind, TransactionReceipt, TransactionRequest,
};
use alloy_transport::Transport;
use anyhow::Context;

use crate::{EvmProvider, ProviderResult};

/// Evm Provider implementation using [alloy-provider](https://github.com/alloy-rs/alloy-rs)
pub struct AlloyEvmProvider<AP, T> {
    inner: AP,
    _marker: PhantomData<T>,
}

impl<AP, T> AlloyEvmProvider<AP, T> {
    /// Create a new `AlloyEvmProvider`
    pub fn new(inner: AP) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<AP: Clone, T> Clone for AlloyEvmProvider<AP, T> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<AP, T> From<AP> for AlloyEvmProvider<AP, T>
where
    T: Transport + Clone,
    AP: AlloyProvider<T>,
{
    fn from(inner: AP) -> Self {
        Self::new(inner)
    }
}

#[async_trait::async_trait]
impl<AP, T> EvmProvider for AlloyEvmProvider<AP, T>
where
    T: Transport + Clone,
    AP: AlloyProvider<T>,
{
    async fn get_chain_id(&self) -> ProviderResult<u64> {
        Ok(self.inner.get_chain_id().await?)
    }

    async fn get_balance(&self, address: Address, block: Option<BlockId>) -> ProviderResult<U256> {
        let mut call = self.inner.get_balance(address);
        if let Some(block) = block {
            call = call.block_id(block);
        }

        Ok(call.await?)
    }

    async fn get_transaction_count(
        &self,
        address: Address,
        block: Option<BlockId>,
    ) -> ProviderResult<u64> {
        let mut call = self.inner.get_transaction_count(address);
        if let Some(block) = block {
            call = call.block_id(block);
        }

        Ok(call.await?)
    }

    async fn get_gas_price(&self) -> ProviderResult<u128> {
        Ok(self.inner.get_gas_price().await?)
    }

    async fn get_latest_base_fee(&self) -> ProviderResult<Option<u128>> {
        let block = self
            .inner
            .get_block(BlockId::latest(), BlockTransactionsKind::Hashes)
            .await?
            .context("latest block should exist")?;
        Ok(block.header.base_fee_per_gas.map(u128::from))
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> ProviderResult<u64> {
        Ok(self.inner.estimate_gas(tx).await?)
    }

    async fn send_raw_transaction(&self, tx: Bytes) -> ProviderResult<TxHash> {
        let pending = self.inner.send_raw_transaction(&tx).await?;
        Ok(*pending.tx_hash())
    }

    async fn get_transaction_receipt(
        &self,
        tx: TxHash,
    ) -> ProviderResult<Option<TransactionReceipt>> {
        Ok(self.inner.get_transaction_receipt(tx).await?)
    }
}
