use alloy_primitives::Address;
use parking_lot::Mutex;
use safe_multisig::{consts::NetworkInfo, transaction_data::TxParameters};
use tracing::{debug, trace, warn};

use crate::{
    bindings::Erc20Bindings,
    dispatcher::{SpendingLimitModule, SubmissionDispatcher, SubmissionOutcome, TransactionQueue},
    encoder::{EncodingState, TransferEncoder, TransferInputs},
    error::ReviewError,
    estimator::{EstimationRequest, EstimationStatus, FeeEstimate, FeeEstimator},
    parameters::{EditMode, TxParameterEdit, TxParameterField, TxParametersReconciler},
    request::TransferRequest,
    token::{ResolvedToken, TokenRecord, TokenResolver},
};

/// What the host knows about the Safe the funds leave from.
#[derive(Debug, Clone, Default)]
pub struct SafeContext {
    pub safe_address: Option<Address>,
    pub tokens: Vec<TokenRecord>,
    /// Next Safe nonce, used as the default nonce of the queued transaction.
    pub safe_nonce: Option<u64>,
}

type Callback = Box<dyn Fn() + Send + Sync>;

pub struct ReviewCallbacks {
    on_close: Callback,
    on_prev: Callback,
}

impl ReviewCallbacks {
    pub fn new(
        on_close: impl Fn() + Send + Sync + 'static,
        on_prev: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self { on_close: Box::new(on_close), on_prev: Box::new(on_prev) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Open,
    Submitting,
    Closed,
}

/// Everything the host needs to render the review screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub recipient: Address,
    pub amount: String,
    pub token: Option<ResolvedToken>,
    pub tx_parameters: TxParameters,
    pub edit_mode: EditMode,
    pub fee_estimate: FeeEstimate,
    pub fee_disclaimer: Option<String>,
    /// Reason the transfer could not be encoded, if it could not.
    pub encoding_error: Option<String>,
    pub can_submit: bool,
}

/// The review step of the send funds flow.
///
/// [ReviewSendFunds::refresh] drives the pipeline: resolve the token, encode the transfer,
/// estimate its fee and feed the estimate into the transaction parameters. Any input
/// change (request, token list) must be followed by a refresh; results of runs that were
/// overtaken by a newer one, or that finish after the review closed, are dropped.
pub struct ReviewSendFunds<B, E, Q, S> {
    network: NetworkInfo,
    request: Mutex<TransferRequest>,
    context: Mutex<SafeContext>,
    resolver: Mutex<TokenResolver>,
    token: Mutex<Option<ResolvedToken>>,
    encoder: TransferEncoder<B>,
    estimator: E,
    fee_estimate: Mutex<FeeEstimate>,
    parameters: Mutex<TxParametersReconciler>,
    dispatcher: SubmissionDispatcher<Q, S>,
    callbacks: ReviewCallbacks,
    status: Mutex<Status>,
}

impl<B, E, Q, S> ReviewSendFunds<B, E, Q, S>
where
    B: Erc20Bindings,
    E: FeeEstimator,
    Q: TransactionQueue,
    S: SpendingLimitModule,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        network: NetworkInfo,
        request: TransferRequest,
        context: SafeContext,
        bindings: B,
        estimator: E,
        queue: Q,
        spending_limit: S,
        callbacks: ReviewCallbacks,
    ) -> Self {
        let parameters = TxParametersReconciler::new(TxParameters {
            safe_nonce: context.safe_nonce,
            ..Default::default()
        });

        Self {
            resolver: Mutex::new(TokenResolver::new(network.native_coin.clone())),
            encoder: TransferEncoder::new(bindings, network.native_coin.clone()),
            network,
            request: Mutex::new(request),
            context: Mutex::new(context),
            token: Mutex::new(None),
            estimator,
            fee_estimate: Mutex::new(FeeEstimate::default()),
            parameters: Mutex::new(parameters),
            dispatcher: SubmissionDispatcher::new(queue, spending_limit),
            callbacks,
            status: Mutex::new(Status::Open),
        }
    }

    pub fn encoder(&self) -> &TransferEncoder<B> {
        &self.encoder
    }

    pub fn is_closed(&self) -> bool {
        *self.status.lock() == Status::Closed
    }

    /// Re-runs the pipeline for the current inputs.
    pub async fn refresh(&self) -> Result<(), ReviewError> {
        self.ensure_open()?;

        let request = self.request.lock().clone();
        let inputs = self.transfer_inputs(&request);
        let retry_estimate =
            self.fee_estimate.lock().execution_status == EstimationStatus::Failure;
        if self.encoder.is_ready_for(&inputs) && !retry_estimate {
            trace!(target: "send_funds::review", "Transfer inputs unchanged");
            return Ok(());
        }

        let Some(encoded) = self.encoder.encode(&inputs).await else {
            return Ok(());
        };
        if self.is_closed() {
            return Ok(());
        }

        let previous = std::mem::take(&mut *self.fee_estimate.lock());
        let estimate = self
            .estimator
            .estimate(EstimationRequest {
                to: encoded.transfer.call_target,
                data: encoded.transfer.call_data.clone(),
            })
            .await;

        if !self.encoder.is_current(encoded.generation) || self.is_closed() {
            debug!(
                target: "send_funds::review",
                generation = encoded.generation,
                "Discarding fee estimate of a superseded transfer"
            );
            return Ok(());
        }

        let estimate = estimate.unwrap_or_else(|e| {
            warn!(target: "send_funds::review", error = ?e, "Failed to estimate transaction fee");
            FeeEstimate::failed(&previous)
        });
        self.parameters.lock().apply_fee_estimate(&estimate);
        *self.fee_estimate.lock() = estimate;

        Ok(())
    }

    pub async fn update_request(&self, request: TransferRequest) -> Result<(), ReviewError> {
        self.ensure_open()?;
        *self.request.lock() = request;
        self.refresh().await
    }

    pub async fn update_tokens(&self, tokens: Vec<TokenRecord>) -> Result<(), ReviewError> {
        self.ensure_open()?;
        self.context.lock().tokens = tokens;
        self.refresh().await
    }

    pub fn set_safe_nonce(&self, safe_nonce: Option<u64>) {
        self.context.lock().safe_nonce = safe_nonce;
        self.parameters.lock().set_safe_nonce_default(safe_nonce);
    }

    pub fn set_safe_address(&self, safe_address: Option<Address>) {
        self.context.lock().safe_address = safe_address;
    }

    pub fn toggle_edit_mode(&self) -> EditMode {
        self.parameters.lock().toggle_edit_mode()
    }

    pub fn edit_parameter(&self, edit: TxParameterEdit) -> Result<(), ReviewError> {
        self.parameters.lock().set(edit)
    }

    pub fn reset_parameter(&self, field: TxParameterField) -> Result<(), ReviewError> {
        self.parameters.lock().reset(field)
    }

    pub fn tx_parameters(&self) -> TxParameters {
        self.parameters.lock().effective()
    }

    pub fn fee_estimate(&self) -> FeeEstimate {
        self.fee_estimate.lock().clone()
    }

    /// Submission is possible once the transfer was encoded for the current inputs.
    pub fn can_submit(&self) -> bool {
        if *self.status.lock() != Status::Open {
            return false;
        }

        let request = self.request.lock().clone();
        self.encoder.current_for(&self.transfer_inputs(&request)).is_some()
    }

    pub fn summary(&self) -> ReviewSummary {
        let can_submit = self.can_submit();
        let request = self.request.lock().clone();
        let token = self.token.lock().clone();
        let fee_estimate = self.fee_estimate();
        let (tx_parameters, edit_mode) = {
            let parameters = self.parameters.lock();
            (parameters.effective(), parameters.mode())
        };
        let encoding_error = match self.encoder.state() {
            EncodingState::Failed { reason, .. } => Some(reason),
            _ => None,
        };

        ReviewSummary {
            recipient: request.recipient_address,
            amount: request.amount,
            token,
            tx_parameters,
            edit_mode,
            fee_disclaimer: fee_estimate.disclaimer(&self.network.native_coin.name),
            fee_estimate,
            encoding_error,
            can_submit,
        }
    }

    /// Submits the transfer with the effective transaction parameters.
    ///
    /// The review closes as soon as the queue accepts the transaction or the allowance
    /// transfer has a hash. On failure it stays open so the operator can retry.
    pub async fn submit(&self) -> Result<SubmissionOutcome, ReviewError> {
        let (request, inputs, encoded) = {
            let mut status = self.status.lock();
            match *status {
                Status::Closed => return Err(ReviewError::Closed),
                Status::Submitting => return Err(ReviewError::SubmissionInProgress),
                Status::Open => {}
            }

            // the encoding must belong to the request being submitted
            let request = self.request.lock().clone();
            let inputs = self.transfer_inputs(&request);
            let Some(encoded) = self.encoder.current_for(&inputs) else {
                return Err(ReviewError::SubmissionDisabled);
            };
            *status = Status::Submitting;

            (request, inputs, encoded)
        };

        let safe_address = self.context.lock().safe_address;
        let parameters = self.parameters.lock().effective();
        let result = self
            .dispatcher
            .submit(safe_address, &request, inputs.token.as_ref(), &encoded.transfer, parameters)
            .await;

        let closed_now = {
            let mut status = self.status.lock();
            match (&result, *status) {
                // closed by the operator while the submission was in flight
                (_, Status::Closed) => false,
                (Ok(_), _) => {
                    *status = Status::Closed;
                    true
                }
                (Err(_), _) => {
                    *status = Status::Open;
                    false
                }
            }
        };
        if closed_now {
            (self.callbacks.on_close)();
        }

        result
    }

    /// Goes back to the previous step of the send flow.
    pub fn back(&self) {
        (self.callbacks.on_prev)();
    }

    /// Closes the review. Work still in flight is discarded when it completes.
    pub fn close(&self) {
        let already_closed =
            std::mem::replace(&mut *self.status.lock(), Status::Closed) == Status::Closed;
        if !already_closed {
            (self.callbacks.on_close)();
        }
    }

    fn transfer_inputs(&self, request: &TransferRequest) -> TransferInputs {
        let token = {
            let context = self.context.lock();
            self.resolver.lock().resolve(&request.token, &context.tokens)
        };
        *self.token.lock() = token.clone();

        TransferInputs {
            recipient: request.recipient_address,
            amount: request.amount.clone(),
            token,
        }
    }

    fn ensure_open(&self) -> Result<(), ReviewError> {
        match *self.status.lock() {
            Status::Closed => Err(ReviewError::Closed),
            _ => Ok(()),
        }
    }
}
