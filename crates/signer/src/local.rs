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

use std::fmt::{self, Debug};

use alloy_eips::eip2718::Encodable2718;
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

/// A private key and the address derived from it
///
/// Immutable once constructed. Binding a chain id produces a new identity whose
/// signatures are rejected for transactions on any other chain.
#[derive(Clone)]
pub struct SigningIdentity {
    signer: PrivateKeySigner,
    wallet: EthereumWallet,
}

impl Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SigningIdentity {{ address: {}, chain_id: {:?} }}",
            self.address(),
            self.chain_id()
        )
    }
}

impl SigningIdentity {
    /// Parse a hex encoded private key, with or without a `0x` prefix
    pub fn from_private_key(private_key: &SecretString) -> Result<Self> {
        let signer = private_key
            .expose_secret()
            .trim()
            .parse::<PrivateKeySigner>()?;
        Ok(Self::from_signer(signer))
    }

    fn from_signer(signer: PrivateKeySigner) -> Self {
        let wallet = EthereumWallet::from(signer.clone());
        Self { signer, wallet }
    }

    /// Bind the identity to a chain id
    pub fn with_chain_id(self, chain_id: u64) -> Self {
        Self::from_signer(self.signer.with_chain_id(Some(chain_id)))
    }

    /// Get the address of the identity
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the chain id the identity is bound to, if any
    pub fn chain_id(&self) -> Option<u64> {
        self.signer.chain_id()
    }

    /// Sign a fully populated transaction request and return the EIP-2718 encoded bytes
    ///
    /// Requests carrying EIP-1559 fees are signed as type 2 transactions, requests
    /// carrying only a gas price as legacy transactions.
    pub async fn sign_tx_raw(&self, tx: TransactionRequest) -> Result<Bytes> {
        let tx = tx.with_from(self.address());
        let complete = if tx.max_fee_per_gas.is_some() || tx.max_priority_fee_per_gas.is_some() {
            tx.complete_1559()
        } else {
            tx.complete_legacy()
        };
        complete.map_err(|missing| {
            Error::InvalidTransaction(format!("missing fields {}", missing.join(", ")))
        })?;

        let tx_envelope = tx.build(&self.wallet).await?;
        tracing::debug!(
            "signed transaction {:?} from {}",
            tx_envelope.tx_hash(),
            self.address()
        );

        let mut raw_tx = vec![];
        tx_envelope.encode_2718(&mut raw_tx);
        Ok(raw_tx.into())
    }
}
