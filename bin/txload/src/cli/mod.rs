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

use std::io::{self, Write};

use anyhow::{bail, Context};
use clap::{Args, Parser};
use secrecy::SecretString;
use txload_provider::EvmProvider;
use txload_signer::SigningIdentity;
use txload_workload::{Account, Workload, WorkloadPlan};

mod tracing;

/// Main entry point for the CLI
///
/// Parses the CLI arguments, connects the account and runs the workload to completion.
pub async fn run() -> anyhow::Result<()> {
    let opt = Cli::parse();
    let _guard = tracing::configure_logging(&opt.logs)?;
    tracing::info!("Parsed CLI options: {:#?}", opt);

    let account = connect(
        &opt.connection,
        &mut io::stdout(),
        txload_provider::new_alloy_evm_provider,
    )
    .await?;

    Workload::new(account, WorkloadPlan::default()).run().await?;
    Ok(())
}

/// Build the signing account from the connection settings
///
/// When the private key or the endpoint is absent the missing configuration report
/// goes to `out` and neither the signer nor the provider is built.
async fn connect<P, F>(
    args: &ConnectionArgs,
    out: &mut impl Write,
    new_provider: F,
) -> anyhow::Result<Account<P>>
where
    P: EvmProvider,
    F: FnOnce(&str, u64) -> anyhow::Result<P>,
{
    let Some((private_key, rpc)) = args.required() else {
        writeln!(out, "{}", args.missing_report())?;
        bail!("missing private key or RPC endpoint");
    };

    let signer =
        SigningIdentity::from_private_key(private_key).context("should parse private key")?;
    let provider = new_provider(rpc, args.provider_client_timeout_seconds)?;
    let account = Account::connect(provider, signer)
        .await
        .context("should connect to node")?;
    tracing::info!("Connected {} to network {}", account.address(), account.network());

    Ok(account)
}

/// Converts a &str into a SecretString
pub(crate) fn parse_secret(s: &str) -> Result<SecretString, String> {
    Ok(s.into())
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Connection")]
pub struct ConnectionArgs {
    /// Private key of the account sending every transaction
    #[arg(
        long = "private_key",
        name = "private_key",
        env = "PRIVATE_KEY",
        value_parser = parse_secret
    )]
    private_key: Option<SecretString>,

    /// ETH Node HTTP URL to connect to
    #[arg(long = "rpc", name = "rpc", env = "RPC")]
    rpc: Option<String>,

    #[arg(
        long = "provider_client_timeout_seconds",
        name = "provider_client_timeout_seconds",
        env = "PROVIDER_CLIENT_TIMEOUT_SECONDS",
        default_value = "10"
    )]
    provider_client_timeout_seconds: u64,
}

impl ConnectionArgs {
    /// Both the private key and the endpoint, if both are set
    fn required(&self) -> Option<(&SecretString, &str)> {
        Some((self.private_key.as_ref()?, self.rpc.as_deref()?))
    }

    /// Both values as given followed by the failure line
    ///
    /// The private key itself is never printed.
    fn missing_report(&self) -> String {
        let private_key = if self.private_key.is_some() {
            "Some(<redacted>)"
        } else {
            "None"
        };
        format!(
            "{private_key}\n{:?}\n**** missing privateKey or RPC !! ****\n",
            self.rpc
        )
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Logging")]
pub struct LogsArgs {
    /// Log file
    ///
    /// If not provided, logs will be written to stderr
    #[arg(
        long = "log.file",
        name = "log.file",
        env = "LOG_FILE",
        default_value = None,
        global = true
    )]
    file: Option<String>,

    /// Log JSON
    ///
    /// If set, logs will be written in JSON format
    #[arg(
        long = "log.json",
        name = "log.json",
        env = "LOG_JSON",
        required = false,
        num_args = 0,
        global = true
    )]
    json: bool,
}

/// CLI options
#[derive(Debug, Parser)]
#[command(name = "txload", version, about)]
pub struct Cli {
    #[clap(flatten)]
    connection: ConnectionArgs,

    #[clap(flatten)]
    logs: LogsArgs,
}
