use alloy_primitives::{Address, TxHash};
use async_trait::async_trait;
use safe_multisig::{
    calls::execute_allowance_transfer_call,
    consts::NATIVE_COIN_ADDRESS,
    contracts::AllowanceModule::executeAllowanceTransferCall,
    transaction_data::{QueuedTransactionRequest, TxNotificationKind, TxParameters},
    utils::to_token_unit,
};
use tracing::{debug, error};

use crate::{
    encoder::EncodedTransfer,
    error::ReviewError,
    request::{SpendingLimitGrant, TransferKind, TransferRequest},
    token::ResolvedToken,
};

/// Entry point of the multisig transaction queue. Accepting a request does not mean it
/// was executed: confirmations and execution are tracked by the queue.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TransactionQueue: Send + Sync {
    async fn enqueue(&self, request: QueuedTransactionRequest) -> eyre::Result<()>;
}

/// The allowance module, called directly by a delegate.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait SpendingLimitModule: Send + Sync {
    /// Sends the call from `from` and returns as soon as the transaction hash is known.
    async fn execute_allowance_transfer(
        &self,
        call: executeAllowanceTransferCall,
        from: Address,
    ) -> eyre::Result<TxHash>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Handed to the transaction queue.
    Queued,
    /// Allowance transfer broadcast by the delegate.
    AllowanceTransferSent { tx_hash: TxHash },
}

/// Sends a reviewed transfer down one of two exclusive paths, picked by [TransferKind].
pub struct SubmissionDispatcher<Q, S> {
    queue: Q,
    spending_limit: S,
}

impl<Q, S> SubmissionDispatcher<Q, S>
where
    Q: TransactionQueue,
    S: SpendingLimitModule,
{
    pub fn new(queue: Q, spending_limit: S) -> Self {
        Self { queue, spending_limit }
    }

    pub async fn submit(
        &self,
        safe_address: Option<Address>,
        request: &TransferRequest,
        token: Option<&ResolvedToken>,
        encoded: &EncodedTransfer,
        parameters: TxParameters,
    ) -> Result<SubmissionOutcome, ReviewError> {
        let Some(safe_address) = safe_address else {
            error!(
                target: "send_funds::dispatcher",
                "There was an error trying to submit the transaction, the safe address was not found"
            );
            return Err(ReviewError::SafeAddressNotFound);
        };

        match &request.kind {
            TransferKind::SpendingLimit { grant } => {
                self.submit_allowance_transfer(safe_address, request, token, grant).await
            }
            TransferKind::Standard => self.submit_queued(safe_address, encoded, parameters).await,
        }
    }

    async fn submit_allowance_transfer(
        &self,
        safe_address: Address,
        request: &TransferRequest,
        token: Option<&ResolvedToken>,
        grant: &SpendingLimitGrant,
    ) -> Result<SubmissionOutcome, ReviewError> {
        let token = token.ok_or_else(|| ReviewError::TokenNotResolved(request.token.clone()))?;

        let limit_token = if token.is_native_coin { NATIVE_COIN_ADDRESS } else { token.address };
        let amount = to_token_unit(&request.amount, token.decimals)?;
        let call = execute_allowance_transfer_call(
            safe_address,
            limit_token,
            request.recipient_address,
            amount,
            grant.delegate,
        )?;

        let tx_hash = self
            .spending_limit
            .execute_allowance_transfer(call, grant.delegate)
            .await
            .map_err(|e| {
                error!(target: "send_funds::dispatcher", error = ?e, "Allowance transfer was rejected");
                ReviewError::AllowanceTransfer(e)
            })?;

        debug!(target: "send_funds::dispatcher", %tx_hash, "Allowance transfer sent");
        Ok(SubmissionOutcome::AllowanceTransferSent { tx_hash })
    }

    async fn submit_queued(
        &self,
        safe_address: Address,
        encoded: &EncodedTransfer,
        parameters: TxParameters,
    ) -> Result<SubmissionOutcome, ReviewError> {
        let request = QueuedTransactionRequest {
            safe_address,
            to: encoded.call_target,
            value_in_wei: encoded.value,
            data: encoded.call_data.clone(),
            nonce: parameters.safe_nonce,
            safe_tx_gas: parameters.safe_tx_gas,
            notification_kind: TxNotificationKind::StandardTx,
            fee_parameters: parameters,
        };

        self.queue.enqueue(request).await.map_err(ReviewError::Queue)?;

        debug!(target: "send_funds::dispatcher", %safe_address, "Transaction queued");
        Ok(SubmissionOutcome::Queued)
    }
}
