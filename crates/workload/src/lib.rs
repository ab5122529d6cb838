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

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]
//! The txload workload
//!
//! Sends plain transfers, deploys tokens and calls them from a single account,
//! strictly one submission at a time.

mod account;
pub use account::{Account, PendingDeployment, ReceiptPolling, SentTx};

mod error;
pub use error::{Result, WorkloadError};

mod workload;
pub use workload::{
    StatusReport, Workload, WorkloadPlan, DEPLOY_AND_TRANSFER_ROUNDS, DEPLOY_ONLY, DESTINATION,
    PLAIN_TRANSFERS, TOKEN_INITIAL_SUPPLY, TOKEN_TRANSFERS_PER_DEPLOYMENT, TRANSFER_AMOUNT,
};

#[cfg(test)]
mod test_utils;
