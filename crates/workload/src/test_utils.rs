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

//! Shared fixtures for the workload tests

use std::sync::{Arc, Mutex};

use alloy_consensus::TxEnvelope;
use alloy_eips::eip2718::Decodable2718;
use alloy_primitives::{address, Address, Bytes, TxHash};
use alloy_rpc_types_eth::TransactionReceipt;
use secrecy::SecretString;
use serde_json::json;
use txload_provider::{MockEvmProvider, ProviderError};
use txload_signer::SigningIdentity;

// anvil development account 0
pub(crate) const DEV_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub(crate) const DEV_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

pub(crate) const CHAIN_ID: u64 = 1337;
pub(crate) const BASE_FEE: u128 = 1_000_000_000;
pub(crate) const GAS_PRICE: u128 = 3_000_000_000;
pub(crate) const GAS_LIMIT: u64 = 100_000;

pub(crate) fn identity() -> SigningIdentity {
    SigningIdentity::from_private_key(&SecretString::from(DEV_KEY.to_string())).unwrap()
}

/// Receipt as a node would return it over JSON-RPC
pub(crate) fn receipt(
    tx_hash: TxHash,
    status: bool,
    contract_address: Option<Address>,
) -> TransactionReceipt {
    serde_json::from_value(json!({
        "type": "0x2",
        "status": if status { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": TxHash::repeat_byte(0xbb),
        "blockNumber": "0x10",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": DEV_ADDRESS,
        "to": null,
        "contractAddress": contract_address,
    }))
    .unwrap()
}

/// Mock the reads every submission makes before signing
///
/// Only the pending transaction count is mocked here, so latest-block reads stay free
/// for tests to set up separately.
pub(crate) fn set_nonce_and_fees(provider: &mut MockEvmProvider, nonce: u64) {
    provider
        .expect_get_transaction_count()
        .withf(|_, block| block.is_some())
        .returning(move |_, _| Ok(nonce));
    set_fees(provider, Some(BASE_FEE));
}

/// `None` mocks a node whose blocks carry no base fee
fn set_fees(provider: &mut MockEvmProvider, base_fee: Option<u128>) {
    provider
        .expect_get_latest_base_fee()
        .returning(move || Ok(base_fee));
    provider.expect_get_gas_price().returning(|| Ok(GAS_PRICE));
    provider.expect_estimate_gas().returning(|_| Ok(GAS_LIMIT));
}

/// Records every raw transaction a mocked node accepts
///
/// The pending nonce advances with each accepted transaction, the way a node's
/// mempool would report it.
#[derive(Clone, Default)]
pub(crate) struct Submissions {
    txs: Arc<Mutex<Vec<TxEnvelope>>>,
}

impl Submissions {
    pub(crate) fn install(provider: &mut MockEvmProvider, start_nonce: u64) -> Self {
        Self::install_with(provider, start_nonce, Some(BASE_FEE), None)
    }

    /// Like `install`, on a node without a base fee
    pub(crate) fn install_pre_london(provider: &mut MockEvmProvider, start_nonce: u64) -> Self {
        Self::install_with(provider, start_nonce, None, None)
    }

    /// Like `install`, but the node rejects the submission at index `fail_at`
    pub(crate) fn install_failing_at(
        provider: &mut MockEvmProvider,
        start_nonce: u64,
        fail_at: usize,
    ) -> Self {
        Self::install_with(provider, start_nonce, Some(BASE_FEE), Some(fail_at))
    }

    fn install_with(
        provider: &mut MockEvmProvider,
        start_nonce: u64,
        base_fee: Option<u128>,
        fail_at: Option<usize>,
    ) -> Self {
        let submissions = Self::default();

        let txs = submissions.txs.clone();
        provider
            .expect_get_transaction_count()
            .withf(|_, block| block.is_some())
            .returning(move |_, _| Ok(start_nonce + txs.lock().unwrap().len() as u64));
        set_fees(provider, base_fee);

        let txs = submissions.txs.clone();
        let attempts = Arc::new(Mutex::new(0_usize));
        provider
            .expect_send_raw_transaction()
            .returning(move |raw: Bytes| {
                let mut attempts = attempts.lock().unwrap();
                let attempt = *attempts;
                *attempts += 1;
                if fail_at == Some(attempt) {
                    return Err(ProviderError::Other(anyhow::anyhow!("nonce too low")));
                }

                let tx = TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap();
                let hash = *tx.tx_hash();
                txs.lock().unwrap().push(tx);
                Ok(hash)
            });

        submissions
    }

    pub(crate) fn txs(&self) -> Vec<TxEnvelope> {
        self.txs.lock().unwrap().clone()
    }
}
