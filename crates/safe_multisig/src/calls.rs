use alloy_primitives::{aliases::U96, ruint::UintTryFrom, Address, Bytes, U256};
use alloy_sol_types::SolCall;

use crate::{
    contracts::{AllowanceModule, IERC20},
    error::{Error, Result},
};

/// ABI-encodes `transfer(to, amount)` for an ERC-20 token.
pub fn erc20_transfer_calldata(to: Address, amount: U256) -> Bytes {
    IERC20::transferCall { to, amount }.abi_encode().into()
}

/// Builds the `executeAllowanceTransfer` call a delegate sends to the allowance module.
///
/// `token` is [Address::ZERO] when the limit is on the native coin. The delegate pays no
/// refund, so the payment token is zero, the payment is zero and the signature is empty
/// (the transaction is sent from the delegate itself).
pub fn execute_allowance_transfer_call(
    safe: Address,
    token: Address,
    to: Address,
    amount: U256,
    delegate: Address,
) -> Result<AllowanceModule::executeAllowanceTransferCall> {
    let amount = U96::uint_try_from(amount).map_err(|_| Error::AmountOverflow(amount))?;

    Ok(AllowanceModule::executeAllowanceTransferCall {
        safe,
        token,
        to,
        amount,
        paymentToken: Address::ZERO,
        payment: U96::ZERO,
        delegate,
        signature: Bytes::new(),
    })
}
