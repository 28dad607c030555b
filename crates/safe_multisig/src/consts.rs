use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

use networks::{gnosis, mainnet, sepolia};

use crate::error::{Error, Result};

/// Allowance module v0.1.0, deployed at the same address on every supported chain.
pub const ALLOWANCE_MODULE: Address = address!("cfbfac74c26f8647cbdb8c5caf80bb5b32e43134");

/// Pseudo-address standing for the chain's native coin.
pub const NATIVE_COIN_ADDRESS: Address = Address::ZERO;

pub mod networks {
    pub mod mainnet {
        pub const CHAIN_ID: u64 = 1;
        pub const NAME: &str = "mainnet";

        pub const NATIVE_COIN_NAME: &str = "Ether";
        pub const NATIVE_COIN_SYMBOL: &str = "ETH";
        pub const NATIVE_COIN_DECIMALS: u8 = 18;
        pub const NATIVE_COIN_LOGO: &str = "https://safe-transaction-assets.safe.global/chains/1/currency_logo.png";
    }

    pub mod sepolia {
        pub const CHAIN_ID: u64 = 11155111;
        pub const NAME: &str = "sepolia";

        pub const NATIVE_COIN_NAME: &str = "Sepolia Ether";
        pub const NATIVE_COIN_SYMBOL: &str = "ETH";
        pub const NATIVE_COIN_DECIMALS: u8 = 18;
        pub const NATIVE_COIN_LOGO: &str =
            "https://safe-transaction-assets.safe.global/chains/11155111/currency_logo.png";
    }

    pub mod gnosis {
        pub const CHAIN_ID: u64 = 100;
        pub const NAME: &str = "gnosis";

        pub const NATIVE_COIN_NAME: &str = "xDai";
        pub const NATIVE_COIN_SYMBOL: &str = "XDAI";
        pub const NATIVE_COIN_DECIMALS: u8 = 18;
        pub const NATIVE_COIN_LOGO: &str = "https://safe-transaction-assets.safe.global/chains/100/currency_logo.png";
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeCoin {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

/// Network level configuration needed to build transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub chain_id: u64,
    pub name: String,
    pub native_coin: NativeCoin,
    #[serde(default = "default_spending_limit_module")]
    pub spending_limit_module: Address,
}

fn default_spending_limit_module() -> Address {
    ALLOWANCE_MODULE
}

pub fn get_network_info(chain_id: u64) -> Result<NetworkInfo> {
    let (name, coin_name, symbol, decimals, logo) = match chain_id {
        mainnet::CHAIN_ID => (
            mainnet::NAME,
            mainnet::NATIVE_COIN_NAME,
            mainnet::NATIVE_COIN_SYMBOL,
            mainnet::NATIVE_COIN_DECIMALS,
            mainnet::NATIVE_COIN_LOGO,
        ),
        sepolia::CHAIN_ID => (
            sepolia::NAME,
            sepolia::NATIVE_COIN_NAME,
            sepolia::NATIVE_COIN_SYMBOL,
            sepolia::NATIVE_COIN_DECIMALS,
            sepolia::NATIVE_COIN_LOGO,
        ),
        gnosis::CHAIN_ID => (
            gnosis::NAME,
            gnosis::NATIVE_COIN_NAME,
            gnosis::NATIVE_COIN_SYMBOL,
            gnosis::NATIVE_COIN_DECIMALS,
            gnosis::NATIVE_COIN_LOGO,
        ),
        _ => return Err(Error::UnsupportedChain(chain_id)),
    };

    Ok(NetworkInfo {
        chain_id,
        name: name.to_string(),
        native_coin: NativeCoin {
            address: NATIVE_COIN_ADDRESS,
            name: coin_name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            logo_uri: Some(logo.to_string()),
        },
        spending_limit_module: ALLOWANCE_MODULE,
    })
}
