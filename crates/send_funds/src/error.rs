use crate::parameters::EditMode;

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("there was an error trying to submit the transaction, the safe address was not found")]
    SafeAddressNotFound,

    #[error("token `{0}` has not been resolved")]
    TokenNotResolved(String),

    /// The transfer payload has not been produced for the current inputs.
    #[error("transaction data is not ready yet")]
    SubmissionDisabled,

    #[error("a submission is already in progress")]
    SubmissionInProgress,

    #[error("the review has been closed")]
    Closed,

    #[error("transaction parameters can not be changed while {0:?}")]
    NotEditing(EditMode),

    #[error(transparent)]
    Safe(#[from] safe_multisig::Error),

    #[error("failed to obtain a binding for the token: {0}")]
    TokenBinding(eyre::Report),

    #[error("the transaction queue rejected the transaction: {0}")]
    Queue(eyre::Report),

    #[error("allowance transfer failed: {0}")]
    AllowanceTransfer(eyre::Report),
}
