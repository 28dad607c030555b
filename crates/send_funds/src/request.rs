use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A transfer waiting to be reviewed, as produced by the previous step of the send flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub recipient_address: Address,
    /// Amount in human units, e.g. `"1.5"`.
    pub amount: String,
    /// Address of the token, or the native coin pseudo-address.
    pub token: String,
    #[serde(flatten)]
    pub kind: TransferKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "txType", rename_all = "camelCase")]
pub enum TransferKind {
    /// Queued multisig transaction, executed once enough owners confirm.
    Standard,
    /// Allowance transfer sent by a delegate holding a spending limit.
    SpendingLimit {
        #[serde(rename = "tokenSpendingLimit")]
        grant: SpendingLimitGrant,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingLimitGrant {
    pub delegate: Address,
}
