use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use safe_multisig::calls::erc20_transfer_calldata;

/// Handle on an ERC-20 token contract able to encode calls against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Erc20Binding {
    address: Address,
}

impl Erc20Binding {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn encode_transfer(&self, to: Address, amount: U256) -> Bytes {
        erc20_transfer_calldata(to, amount)
    }
}

/// Factory handing out [Erc20Binding]s for token addresses.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait Erc20Bindings: Send + Sync {
    async fn at(&self, token: Address) -> eyre::Result<Erc20Binding>;
}

/// Bindings built from the standard ERC-20 ABI, without contacting the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardErc20Bindings;

#[async_trait]
impl Erc20Bindings for StandardErc20Bindings {
    async fn at(&self, token: Address) -> eyre::Result<Erc20Binding> {
        Ok(Erc20Binding::new(token))
    }
}
