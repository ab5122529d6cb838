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

//! Minimal ERC-20 style token deployed by the workload.
//!
//! Storage layout: `balances` mapping at slot 0, `totalSupply` at slot 1.
//! The constructor mints `initialSupply` to the deployer. `transfer` reverts
//! with `Error("Insufficient balance")` when the sender's balance is too low.

use alloy_primitives::{bytes, Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolConstructor};

use alloy_sol_macro::sol;

sol! {
    #[allow(missing_docs)]
    contract LoadToken {
        constructor(uint256 initialSupply);

        function totalSupply() external view returns (uint256);
        function balances(address account) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// Creation bytecode of [`LoadToken`], without constructor arguments.
///
/// The init code copies the trailing 32 byte constructor argument out of its own
/// code before storing the supply, so the ABI encoded `initialSupply` must be
/// appended (see [`deploy_code`]).
#[rustfmt::skip]
pub const LOAD_TOKEN_BYTECODE: Bytes = bytes!("6080604052348015600e575f5ffd5b506020602038035f395f51806001819055505f5f3373ffffffffffffffffffffffffffffffffffffffff1673ffffffffffffffffffffffffffffffffffffffff1681526020019081526020015f208190555061051f8061006d5f395ff3fe608060405234801561000f575f5ffd5b506004361061004a575f3560e01c806318160ddd1461004e57806327e235e31461006c57806370a082311461009c578063a9059cbb146100cc575b5f5ffd5b6100566100fc565b60405161006391906102a1565b60405180910390f35b61008660048036038101906100819190610318565b610102565b60405161009391906102a1565b60405180910390f35b6100b660048036038101906100b19190610318565b610116565b6040516100c391906102a1565b60405180910390f35b6100e660048036038101906100e1919061036d565b61015b565b6040516100f391906103c5565b60405180910390f35b60015481565b5f602052805f5260405f205f915090505481565b5f5f5f8373ffffffffffffffffffffffffffffffffffffffff1673ffffffffffffffffffffffffffffffffffffffff1681526020019081526020015f20549050919050565b5f815f5f3373ffffffffffffffffffffffffffffffffffffffff1673ffffffffffffffffffffffffffffffffffffffff1681526020019081526020015f205410156101db576040517f08c379a00000000000000000000000000000000000000000000000000000000081526004016101d290610438565b60405180910390fd5b815f5f3373ffffffffffffffffffffffffffffffffffffffff1673ffffffffffffffffffffffffffffffffffffffff1681526020019081526020015f205f8282546102269190610483565b92505081905550815f5f8573ffffffffffffffffffffffffffffffffffffffff1673ffffffffffffffffffffffffffffffffffffffff1681526020019081526020015f205f82825461027891906104b6565b925050819055506001905092915050565b5f819050919050565b61029b81610289565b82525050565b5f6020820190506102b45f830184610292565b92915050565b5f5ffd5b5f73ffffffffffffffffffffffffffffffffffffffff82169050919050565b5f6102e7826102be565b9050919050565b6102f7816102dd565b8114610301575f5ffd5b50565b5f81359050610312816102ee565b92915050565b5f6020828403121561032d5761032c6102ba565b5b5f61033a84828501610304565b91505092915050565b61034c81610289565b8114610356575f5ffd5b50565b5f8135905061036781610343565b92915050565b5f5f60408385031215610383576103826102ba565b5b5f61039085828601610304565b92505060206103a185828601610359565b9150509250929050565b5f8115159050919050565b6103bf816103ab565b82525050565b5f6020820190506103d85f8301846103b6565b92915050565b5f82825260208201905092915050565b7f496e73756666696369656e742062616c616e63650000000000000000000000005f82015250565b5f6104226014836103de565b915061042d826103ee565b602082019050919050565b5f6020820190508181035f83015261044f81610416565b9050919050565b7f4e487b71000000000000000000000000000000000000000000000000000000005f52601160045260245ffd5b5f61048d82610289565b915061049883610289565b92508282039050818111156104b0576104af610456565b5b92915050565b5f6104c082610289565b91506104cb83610289565b92508282019050808211156104e3576104e2610456565b5b9291505056fea2646970667358221220451e82a180ed304d8b01f029cf6b2976b0cc2d03eb535a89648a4ef6a6d6a73664736f6c634300081e0033");

/// Full deployment input for a [`LoadToken`] minting `initial_supply` to the deployer
pub fn deploy_code(initial_supply: U256) -> Bytes {
    let args = LoadToken::constructorCall {
        initialSupply: initial_supply,
    }
    .abi_encode();

    let mut code = Vec::with_capacity(LOAD_TOKEN_BYTECODE.len() + args.len());
    code.extend_from_slice(&LOAD_TOKEN_BYTECODE);
    code.extend_from_slice(&args);
    code.into()
}

/// Calldata for `transfer(to, amount)`
pub fn transfer_call(to: Address, amount: U256) -> Bytes {
    LoadToken::transferCall { to, amount }.abi_encode().into()
}
