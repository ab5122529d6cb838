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

use std::fmt;

use alloy_primitives::{address, utils::format_ether, Address, U256};
use txload_provider::EvmProvider;

use crate::{
    account::{Account, ReceiptPolling},
    Result,
};

/// Recipient of every plain and token transfer
pub const DESTINATION: Address = address!("000000000000000000000000000000000000dEaD");

/// 0.0001 ether, the value of each plain transfer and the amount of each token transfer
pub const TRANSFER_AMOUNT: U256 = U256::from_limbs([100_000_000_000_000, 0, 0, 0]);

/// 1000 ether worth of token base units, minted to the deployer
pub const TOKEN_INITIAL_SUPPLY: U256 = U256::from_limbs([0x35c9_adc5_dea0_0000, 0x36, 0, 0]);

/// Number of plain transfers
pub const PLAIN_TRANSFERS: usize = 100;
/// Number of deploy-then-transfer rounds
pub const DEPLOY_AND_TRANSFER_ROUNDS: usize = 10;
/// Number of token transfers after each round's deployment
pub const TOKEN_TRANSFERS_PER_DEPLOYMENT: usize = 10;
/// Number of deployments submitted without waiting
pub const DEPLOY_ONLY: usize = 100;

/// Shape of a workload run
#[derive(Debug, Clone, Copy)]
pub struct WorkloadPlan {
    /// Plain transfers in the first phase
    pub plain_transfers: usize,
    /// Deployments in the second phase, each waited on
    pub deploy_and_transfer_rounds: usize,
    /// Token transfers after each second phase deployment
    pub token_transfers_per_deployment: usize,
    /// Deployments in the third phase, never waited on
    pub deploy_only: usize,
    /// Recipient of plain and token transfers
    pub destination: Address,
    /// Value of plain transfers and amount of token transfers
    pub transfer_amount: U256,
    /// Constructor amount of every deployed token
    pub token_initial_supply: U256,
    /// Receipt polling for second phase deployments
    pub receipt_polling: ReceiptPolling,
}

impl Default for WorkloadPlan {
    fn default() -> Self {
        Self {
            plain_transfers: PLAIN_TRANSFERS,
            deploy_and_transfer_rounds: DEPLOY_AND_TRANSFER_ROUNDS,
            token_transfers_per_deployment: TOKEN_TRANSFERS_PER_DEPLOYMENT,
            deploy_only: DEPLOY_ONLY,
            destination: DESTINATION,
            transfer_amount: TRANSFER_AMOUNT,
            token_initial_supply: TOKEN_INITIAL_SUPPLY,
            receipt_polling: ReceiptPolling::default(),
        }
    }
}

/// Account state printed before any submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Chain id
    pub network: u64,
    /// Account address
    pub address: Address,
    /// Balance in wei
    pub balance: U256,
    /// Transaction count at the latest block
    pub transaction_count: u64,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#########")?;
        writeln!(f, "network: {}", self.network)?;
        writeln!(f, "address: {}", self.address)?;
        writeln!(f, "balance: {}", format_ether(self.balance))?;
        writeln!(f, "transaction count: {}", self.transaction_count)?;
        write!(f, "#########")
    }
}

/// Drives the fixed transaction sequence from a single account
#[derive(Debug)]
pub struct Workload<P> {
    account: Account<P>,
    plan: WorkloadPlan,
}

impl<P: EvmProvider> Workload<P> {
    /// Create a new workload
    pub fn new(account: Account<P>, plan: WorkloadPlan) -> Self {
        Self { account, plan }
    }

    /// Run every phase in order
    ///
    /// Stops at the first failed read or submission.
    pub async fn run(&self) -> Result<()> {
        let report = self.report_status().await?;
        println!("{report}");

        self.plain_transfers().await?;
        self.deploy_and_transfer().await?;
        self.deploy_only().await?;

        println!("#### DONE ####");
        Ok(())
    }

    /// Read the account state
    pub async fn report_status(&self) -> Result<StatusReport> {
        Ok(StatusReport {
            network: self.account.network(),
            address: self.account.address(),
            balance: self.account.balance().await?,
            transaction_count: self.account.transaction_count().await?,
        })
    }

    async fn plain_transfers(&self) -> Result<()> {
        println!("*** One hundred transactions ****");
        tracing::info!(
            "sending {} transfers to {}",
            self.plan.plain_transfers,
            self.plan.destination
        );

        for i in 1..=self.plan.plain_transfers {
            let sent = self
                .account
                .send_transfer(self.plan.destination, self.plan.transfer_amount)
                .await?;
            println!("{} {i}", sent.nonce);
        }
        Ok(())
    }

    async fn deploy_and_transfer(&self) -> Result<()> {
        println!("\n*** Ten time ten transactions ****");
        tracing::info!(
            "deploying {} tokens with {} transfers each",
            self.plan.deploy_and_transfer_rounds,
            self.plan.token_transfers_per_deployment
        );

        for i in 1..=self.plan.deploy_and_transfer_rounds {
            let deployment = self
                .account
                .deploy_token(self.plan.token_initial_supply)
                .await?;
            let token = self
                .account
                .wait_for_deployment(&deployment, self.plan.receipt_polling)
                .await?;
            println!("{token} {i}");

            for j in 1..=self.plan.token_transfers_per_deployment {
                let sent = self
                    .account
                    .transfer_token(token, self.plan.destination, self.plan.transfer_amount)
                    .await?;
                println!("{} {i} {j}", sent.nonce);
            }
        }
        Ok(())
    }

    async fn deploy_only(&self) -> Result<()> {
        println!("\n*** One hundred contracts ****");
        tracing::info!("deploying {} tokens", self.plan.deploy_only);

        for i in 1..=self.plan.deploy_only {
            let deployment = self
                .account
                .deploy_token(self.plan.token_initial_supply)
                .await?;
            println!("{} {i}", deployment.address);
        }
        Ok(())
    }
}
