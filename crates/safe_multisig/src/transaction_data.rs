use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Notification shown by the queue while a transaction moves through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxNotificationKind {
    StandardTx,
}

/// Fee and nonce parameters of a Safe transaction.
///
/// `safe_*` fields apply to the Safe transaction itself, `eth_*` fields to the
/// Ethereum transaction that eventually executes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxParameters {
    pub safe_nonce: Option<u64>,
    pub safe_tx_gas: Option<u64>,
    pub eth_nonce: Option<u64>,
    pub eth_gas_limit: Option<u64>,
    pub eth_gas_price: Option<U256>,
}

/// Request accepted by the multisig transaction queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedTransactionRequest {
    pub safe_address: Address,
    pub to: Address,
    pub value_in_wei: U256,
    pub data: Bytes,
    pub nonce: Option<u64>,
    pub safe_tx_gas: Option<u64>,
    pub notification_kind: TxNotificationKind,
    pub fee_parameters: TxParameters,
}
