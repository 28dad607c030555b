use alloy_primitives::U256;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The amount could not be converted into the token's smallest unit.
    #[error("invalid amount `{amount}`: {reason}")]
    InvalidAmount { amount: String, reason: String },

    /// Allowance module amounts are `uint96`.
    #[error("amount {0} does not fit into uint96")]
    AmountOverflow(U256),

    #[error("chain ID {0} not supported")]
    UnsupportedChain(u64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
