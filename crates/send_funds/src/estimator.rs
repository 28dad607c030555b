use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstimationStatus {
    #[default]
    Loading,
    Failure,
    Success,
}

/// Call to price: the encoded transfer's target and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimationRequest {
    pub to: Address,
    pub data: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
    pub gas_limit: u64,
    pub gas_price: U256,
    pub gas_cost_formatted: String,
    pub gas_price_formatted: String,
    pub execution_status: EstimationStatus,
    /// The operator's confirmation executes the transaction.
    pub is_execution: bool,
    /// The operator's confirmation creates the transaction.
    pub is_creation: bool,
    /// The confirmation is an off-chain signature and costs no gas.
    pub is_off_chain_signature: bool,
}

impl FeeEstimate {
    /// Stands in for an estimate that could not be computed.
    ///
    /// The confirmation kind of `previous` is kept. A review that never got an estimate
    /// is creating the transaction.
    pub fn failed(previous: &FeeEstimate) -> Self {
        let classified =
            previous.is_creation || previous.is_execution || previous.is_off_chain_signature;

        Self {
            execution_status: EstimationStatus::Failure,
            is_creation: previous.is_creation || !classified,
            is_execution: previous.is_execution,
            is_off_chain_signature: previous.is_off_chain_signature,
            ..Default::default()
        }
    }

    /// Text telling the operator what confirming will cost them.
    ///
    /// `None` while the estimate is loading.
    pub fn disclaimer(&self, native_coin_name: &str) -> Option<String> {
        let action = match self.execution_status {
            EstimationStatus::Loading => return None,
            _ if self.is_creation => "create",
            _ if self.is_execution => "execute",
            _ => "approve",
        };

        let mut text = format!(
            "You're about to {action} a transaction and will have to confirm it with your currently connected wallet."
        );
        let gas_cost = self.gas_cost_formatted.trim();
        if !self.is_off_chain_signature && !gas_cost.is_empty() {
            text.push_str(&format!(
                " Make sure you have {gas_cost} (fee price) {native_coin_name} in this wallet to fund this confirmation."
            ));
        }
        if self.execution_status == EstimationStatus::Failure {
            text.push_str(
                " This transaction will most likely fail. To save gas costs, avoid creating the transaction.",
            );
        }

        Some(text)
    }
}

/// Prices the encoded transfer. Safe to call repeatedly; stale answers are dropped by the
/// caller.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait FeeEstimator: Send + Sync {
    async fn estimate(&self, request: EstimationRequest) -> eyre::Result<FeeEstimate>;
}
