use alloy_sol_types::sol;

sol! {
    /// Safe module granting delegates a spending limit per token.
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract AllowanceModule {
        function executeAllowanceTransfer(
            address safe,
            address token,
            address payable to,
            uint96 amount,
            address paymentToken,
            uint96 payment,
            address delegate,
            bytes signature
        ) external;
    }
}
