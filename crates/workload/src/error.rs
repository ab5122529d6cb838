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

use alloy_primitives::TxHash;
use txload_provider::ProviderError;

/// Error type for the workload crate
#[derive(Debug, thiserror::Error)]
pub enum WorkloadError {
    /// Provider error
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    /// Signer error
    #[error("signer error: {0}")]
    Signer(#[from] txload_signer::Error),
    /// The deployment transaction was mined but reverted
    #[error("deployment transaction {0} reverted")]
    DeploymentReverted(TxHash),
    /// The deployment receipt does not carry a contract address
    #[error("receipt for deployment transaction {0} has no contract address")]
    MissingContractAddress(TxHash),
    /// No receipt was found within the configured number of polls
    #[error("transaction {tx_hash} not mined after {polls} receipt polls")]
    NotMined {
        /// Hash of the transaction being waited on
        tx_hash: TxHash,
        /// Number of receipt polls issued
        polls: u64,
    },
}

/// Result type for the workload crate
pub type Result<T> = std::result::Result<T, WorkloadError>;
