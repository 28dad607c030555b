//! Collaborators backed by an alloy provider.

use std::marker::PhantomData;

use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::Provider;
use alloy_transport::Transport;
use async_trait::async_trait;
use safe_multisig::contracts::AllowanceModule::{self, executeAllowanceTransferCall};
use tracing::trace;

use crate::{
    bindings::{Erc20Binding, Erc20Bindings},
    dispatcher::SpendingLimitModule,
};

/// Hands out token bindings only for addresses that hold contract code.
pub struct RpcErc20Bindings<P, T> {
    provider: P,
    _transport: PhantomData<fn() -> T>,
}

impl<P, T> RpcErc20Bindings<P, T> {
    pub fn new(provider: P) -> Self {
        Self { provider, _transport: PhantomData }
    }
}

#[async_trait]
impl<P, T> Erc20Bindings for RpcErc20Bindings<P, T>
where
    P: Provider<T> + Send + Sync,
    T: Transport + Clone,
{
    async fn at(&self, token: Address) -> eyre::Result<Erc20Binding> {
        let code = self.provider.get_code_at(token).await?;
        binding_for_code(token, &code)
    }
}

fn binding_for_code(token: Address, code: &Bytes) -> eyre::Result<Erc20Binding> {
    if code.is_empty() {
        eyre::bail!("No contract deployed at token address {token}");
    }

    Ok(Erc20Binding::new(token))
}

/// Allowance module reached through a provider that can sign for the delegate.
pub struct RpcAllowanceModule<P, T> {
    module: Address,
    provider: P,
    _transport: PhantomData<fn() -> T>,
}

impl<P, T> RpcAllowanceModule<P, T> {
    pub fn new(module: Address, provider: P) -> Self {
        Self { module, provider, _transport: PhantomData }
    }
}

#[async_trait]
impl<P, T> SpendingLimitModule for RpcAllowanceModule<P, T>
where
    P: Provider<T> + Send + Sync,
    T: Transport + Clone,
{
    async fn execute_allowance_transfer(
        &self,
        call: executeAllowanceTransferCall,
        from: Address,
    ) -> eyre::Result<TxHash> {
        let module = AllowanceModule::new(self.module, &self.provider);

        let pending = module.call_builder(&call).from(from).send().await?;
        let tx_hash = *pending.tx_hash();
        trace!(target: "send_funds::rpc", %tx_hash, module = %self.module, "Allowance transfer broadcast");

        Ok(tx_hash)
    }
}
