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

//! Sends a fixed burst of transfers and token deployments to an EVM node.
//!
//! `PRIVATE_KEY` and `RPC` may come from the environment or a `.env` file.

use dotenv::dotenv;

mod cli;

#[tokio::main]
async fn main() {
    dotenv().ok();
    if let Err(err) = cli::run().await {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
