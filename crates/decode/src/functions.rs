//! Decoding of individual low-level calls against the known token ABIs.
//!
//! Every low-level call gets a [`DecodedCall`] before validation runs, so
//! caller-supplied business rules can match on function names and arguments
//! instead of raw selectors. An unknown selector yields the `error` kind; it
//! is up to the validator to decide whether opaque calls are acceptable.

use alloy_primitives::{Address, U256, hex};
use alloy_sol_types::SolCall;
use opguard_primitives::{DecodedCall, LowLevelCall};
use serde_json::json;

mod erc20 {
    use alloy_sol_types::sol;

    sol! {
        function transfer(address to, uint256 amount) returns (bool);
        function approve(address spender, uint256 amount) returns (bool);
        function transferFrom(address from, address to, uint256 amount) returns (bool);
    }
}

mod erc721 {
    use alloy_sol_types::sol;

    sol! {
        function safeTransferFrom(address from, address to, uint256 tokenId);
        function safeTransferFrom(address from, address to, uint256 tokenId, bytes data);
        function setApprovalForAll(address operator, bool approved);
    }
}

mod erc1155 {
    use alloy_sol_types::sol;

    sol! {
        function safeTransferFrom(address from, address to, uint256 id, uint256 amount, bytes data);
        function safeBatchTransferFrom(address from, address to, uint256[] ids, uint256[] amounts, bytes data);
    }
}

/// Decodes a low-level call against the known function set.
///
/// Never fails the request: calls that do not match produce
/// [`DecodedCall::Error`] with a description of why.
pub fn decode_known_function(call: &LowLevelCall) -> DecodedCall {
    if call.data.is_empty() {
        return DecodedCall::Decoded {
            function: "nativeTransfer".to_string(),
            args: json!({
                "to": addr(call.to),
                "value": num(call.value),
            }),
        };
    }

    if call.data.len() < 4 {
        return DecodedCall::Error {
            message: format!("call data is {} bytes, shorter than a function selector", call.data.len()),
        };
    }

    let data = call.data.as_ref();
    let selector = [data[0], data[1], data[2], data[3]];

    let result = match selector {
        s if s == erc20::transferCall::SELECTOR => {
            erc20::transferCall::abi_decode(data).map(|c| DecodedCall::Decoded {
                function: "transfer".to_string(),
                args: json!({ "to": addr(c.to), "amount": num(c.amount) }),
            })
        }
        s if s == erc20::approveCall::SELECTOR => {
            erc20::approveCall::abi_decode(data).map(|c| DecodedCall::Decoded {
                function: "approve".to_string(),
                args: json!({ "spender": addr(c.spender), "amount": num(c.amount) }),
            })
        }
        s if s == erc20::transferFromCall::SELECTOR => {
            erc20::transferFromCall::abi_decode(data).map(|c| DecodedCall::Decoded {
                function: "transferFrom".to_string(),
                args: json!({ "from": addr(c.from), "to": addr(c.to), "amount": num(c.amount) }),
            })
        }
        s if s == erc721::safeTransferFrom_0Call::SELECTOR => {
            erc721::safeTransferFrom_0Call::abi_decode(data).map(|c| DecodedCall::Decoded {
                function: "safeTransferFrom".to_string(),
                args: json!({ "from": addr(c.from), "to": addr(c.to), "tokenId": num(c.tokenId) }),
            })
        }
        s if s == erc721::safeTransferFrom_1Call::SELECTOR => {
            erc721::safeTransferFrom_1Call::abi_decode(data).map(|c| DecodedCall::Decoded {
                function: "safeTransferFrom".to_string(),
                args: json!({
                    "from": addr(c.from),
                    "to": addr(c.to),
                    "tokenId": num(c.tokenId),
                    "data": format!("0x{}", hex::encode(&c.data)),
                }),
            })
        }
        s if s == erc721::setApprovalForAllCall::SELECTOR => {
            erc721::setApprovalForAllCall::abi_decode(data).map(|c| DecodedCall::Decoded {
                function: "setApprovalForAll".to_string(),
                args: json!({ "operator": addr(c.operator), "approved": c.approved }),
            })
        }
        s if s == erc1155::safeTransferFromCall::SELECTOR => {
            erc1155::safeTransferFromCall::abi_decode(data).map(|c| DecodedCall::Decoded {
                function: "safeTransferFrom".to_string(),
                args: json!({
                    "from": addr(c.from),
                    "to": addr(c.to),
                    "id": num(c.id),
                    "amount": num(c.amount),
                }),
            })
        }
        s if s == erc1155::safeBatchTransferFromCall::SELECTOR => {
            erc1155::safeBatchTransferFromCall::abi_decode(data).map(|c| DecodedCall::Decoded {
                function: "safeBatchTransferFrom".to_string(),
                args: json!({
                    "from": addr(c.from),
                    "to": addr(c.to),
                    "ids": c.ids.iter().map(|v| num(*v)).collect::<Vec<_>>(),
                    "amounts": c.amounts.iter().map(|v| num(*v)).collect::<Vec<_>>(),
                }),
            })
        }
        _ => {
            return DecodedCall::Error {
                message: format!("unknown function selector 0x{}", hex::encode(selector)),
            };
        }
    };

    match result {
        Ok(decoded) => decoded,
        Err(e) => DecodedCall::Error { message: format!("failed to decode arguments: {e}") },
    }
}

fn addr(address: Address) -> String {
    address.to_checksum(None)
}

// Decimal strings survive JSON round-trips for the full uint256 range.
fn num(value: U256) -> String {
    value.to_string()
}
