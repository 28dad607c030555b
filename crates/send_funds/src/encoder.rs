use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::{Address, Bytes, U256};
use safe_multisig::{consts::NativeCoin, utils::to_token_unit};
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::{bindings::Erc20Bindings, error::ReviewError, token::ResolvedToken};

/// Everything the encoding depends on. A change in any field supersedes earlier encodings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInputs {
    pub recipient: Address,
    pub amount: String,
    pub token: Option<ResolvedToken>,
}

/// The call that actually moves the funds.
///
/// Native coin transfers call the recipient directly with `value` set and empty data.
/// Token transfers call the token contract with `transfer(recipient, amount)` and a zero
/// value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTransfer {
    pub call_target: Address,
    pub call_data: Bytes,
    pub value: U256,
}

/// An [EncodedTransfer] tagged with the encoding run that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub generation: u64,
    pub transfer: EncodedTransfer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EncodingState {
    /// Token not resolved yet, or an encoding run is in flight.
    #[default]
    Pending,
    Ready {
        generation: u64,
        inputs: TransferInputs,
        transfer: EncodedTransfer,
    },
    /// The last run failed; the reason is shown to the operator until the inputs change.
    Failed { generation: u64, reason: String },
}

impl EncodingState {
    pub fn is_ready(&self) -> bool {
        matches!(self, EncodingState::Ready { .. })
    }
}

/// Turns [TransferInputs] into an [EncodedTransfer].
///
/// Every call to [TransferEncoder::encode] starts a new generation. Only the most recent
/// generation may publish its result: a run that completes after a newer one started is
/// dropped, so a payload built for a previous recipient or amount never reaches the fee
/// estimator or the dispatcher.
pub struct TransferEncoder<B> {
    bindings: B,
    native_coin: NativeCoin,
    generation: AtomicU64,
    state: watch::Sender<EncodingState>,
}

impl<B> TransferEncoder<B>
where
    B: Erc20Bindings,
{
    pub fn new(bindings: B, native_coin: NativeCoin) -> Self {
        let (state, _) = watch::channel(EncodingState::Pending);

        Self {
            bindings,
            native_coin,
            generation: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<EncodingState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> EncodingState {
        self.state.borrow().clone()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// The published transfer, if the latest run succeeded.
    pub fn current(&self) -> Option<Encoded> {
        match &*self.state.borrow() {
            EncodingState::Ready { generation, transfer, .. } => Some(Encoded {
                generation: *generation,
                transfer: transfer.clone(),
            }),
            _ => None,
        }
    }

    /// The published transfer, only if it was built from exactly these inputs.
    pub fn current_for(&self, inputs: &TransferInputs) -> Option<Encoded> {
        match &*self.state.borrow() {
            EncodingState::Ready { generation, inputs: current, transfer } if current == inputs => {
                Some(Encoded { generation: *generation, transfer: transfer.clone() })
            }
            _ => None,
        }
    }

    /// Whether the published transfer was built from exactly these inputs.
    pub fn is_ready_for(&self, inputs: &TransferInputs) -> bool {
        matches!(&*self.state.borrow(), EncodingState::Ready { inputs: current, .. } if current == inputs)
    }

    /// Encodes the transfer for `inputs`.
    ///
    /// Returns `None` when the token is not resolved yet, when encoding failed, or when
    /// this run was superseded while waiting on the token binding.
    pub async fn encode(&self, inputs: &TransferInputs) -> Option<Encoded> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(EncodingState::Pending);

        let Some(token) = inputs.token.as_ref() else {
            trace!(target: "send_funds::encoder", generation, "Token not resolved, transfer data stays empty");
            return None;
        };

        let result = self.encode_transfer(inputs.recipient, &inputs.amount, token).await;

        let mut published = None;
        self.state.send_if_modified(|state| {
            if !self.is_current(generation) {
                return false;
            }

            *state = match &result {
                Ok(transfer) => {
                    published = Some(Encoded { generation, transfer: transfer.clone() });
                    EncodingState::Ready {
                        generation,
                        inputs: inputs.clone(),
                        transfer: transfer.clone(),
                    }
                }
                Err(e) => {
                    warn!(target: "send_funds::encoder", generation, error = %e, "Failed to encode transfer");
                    EncodingState::Failed { generation, reason: e.to_string() }
                }
            };
            true
        });

        if published.is_none() && !self.is_current(generation) {
            debug!(target: "send_funds::encoder", generation, "Discarding superseded transfer encoding");
        }

        published
    }

    async fn encode_transfer(
        &self,
        recipient: Address,
        amount: &str,
        token: &ResolvedToken,
    ) -> Result<EncodedTransfer, ReviewError> {
        if token.is_native_coin {
            // the value is sent by the Safe itself, there is nothing to call
            return Ok(EncodedTransfer {
                call_target: recipient,
                call_data: Bytes::new(),
                value: to_token_unit(amount, self.native_coin.decimals)?,
            });
        }

        let amount = to_token_unit(amount, token.decimals)?;
        let binding = self.bindings.at(token.address).await.map_err(ReviewError::TokenBinding)?;

        Ok(EncodedTransfer {
            call_target: binding.address(),
            call_data: binding.encode_transfer(recipient, amount),
            value: U256::ZERO,
        })
    }
}

#[cfg(test)]
mod test {
    use std::{sync::atomic::AtomicUsize, time::Duration};

    use alloy_primitives::address;
    use alloy_sol_types::SolCall;
    use async_trait::async_trait;
    use safe_multisig::{consts::get_network_info, contracts::IERC20};

    use super::*;
    use crate::bindings::{Erc20Binding, MockErc20Bindings, StandardErc20Bindings};

    const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
    const ALICE: Address = address!("3333333333333333333333333333333333333333");
    const BOB: Address = address!("5555555555555555555555555555555555555555");

    fn native_coin() -> NativeCoin {
        get_network_info(1).unwrap().native_coin
    }

    fn usdc() -> ResolvedToken {
        ResolvedToken {
            address: USDC,
            decimals: 6,
            symbol: "USDC".to_string(),
            display_name: "USD Coin".to_string(),
            logo_uri: None,
            is_native_coin: false,
        }
    }

    fn inputs(recipient: Address, amount: &str, token: Option<ResolvedToken>) -> TransferInputs {
        TransferInputs { recipient, amount: amount.to_string(), token }
    }

    /// Holds the first lookup back so a later one can overtake it.
    #[derive(Default)]
    struct FirstLookupDelayed {
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl Erc20Bindings for FirstLookupDelayed {
        async fn at(&self, token: Address) -> eyre::Result<Erc20Binding> {
            if self.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok(Erc20Binding::new(token))
        }
    }

    #[tokio::test]
    async fn native_transfer() {
        let encoder = TransferEncoder::new(StandardErc20Bindings, native_coin());
        let native = ResolvedToken::native(&native_coin());

        let encoded = encoder.encode(&inputs(ALICE, "1.5", Some(native))).await.unwrap();

        assert_eq!(encoded.transfer.call_target, ALICE);
        assert!(encoded.transfer.call_data.is_empty());
        assert_eq!(encoded.transfer.value, "1500000000000000000".parse::<U256>().unwrap());
        assert!(encoder.state().is_ready());
    }

    #[tokio::test]
    async fn token_transfer() {
        let encoder = TransferEncoder::new(StandardErc20Bindings, native_coin());

        let encoded = encoder.encode(&inputs(ALICE, "10", Some(usdc()))).await.unwrap();

        assert_eq!(encoded.transfer.call_target, USDC);
        assert_eq!(encoded.transfer.value, U256::ZERO);

        let call = IERC20::transferCall::abi_decode(&encoded.transfer.call_data, true).unwrap();
        assert_eq!(call.to, ALICE);
        assert_eq!(call.amount, U256::from(10_000_000u64));
    }

    #[tokio::test]
    async fn unresolved_token_stays_pending() {
        let mut bindings = MockErc20Bindings::new();
        bindings.expect_at().never();
        let encoder = TransferEncoder::new(bindings, native_coin());

        assert_eq!(encoder.encode(&inputs(ALICE, "10", None)).await, None);
        assert_eq!(encoder.state(), EncodingState::Pending);
        assert_eq!(encoder.current(), None);
    }

    #[tokio::test]
    async fn binding_failure_is_published() {
        let mut bindings = MockErc20Bindings::new();
        bindings.expect_at().returning(|_| Err(eyre::eyre!("no contract code")));
        let encoder = TransferEncoder::new(bindings, native_coin());

        assert_eq!(encoder.encode(&inputs(ALICE, "10", Some(usdc()))).await, None);
        match encoder.state() {
            EncodingState::Failed { reason, .. } => assert!(reason.contains("no contract code")),
            state => panic!("unexpected state {state:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_amount_is_published() {
        let encoder = TransferEncoder::new(StandardErc20Bindings, native_coin());

        assert_eq!(encoder.encode(&inputs(ALICE, "ten", Some(usdc()))).await, None);
        assert!(matches!(encoder.state(), EncodingState::Failed { .. }));
    }

    #[tokio::test]
    async fn excess_decimals_are_rejected() {
        let encoder = TransferEncoder::new(StandardErc20Bindings, native_coin());

        assert_eq!(encoder.encode(&inputs(ALICE, "0.0000001", Some(usdc()))).await, None);
        match encoder.state() {
            EncodingState::Failed { reason, .. } => assert!(reason.contains("decimal places")),
            state => panic!("unexpected state {state:?}"),
        }
        assert_eq!(encoder.current(), None);
    }

    #[tokio::test]
    async fn last_input_wins() {
        let encoder = TransferEncoder::new(FirstLookupDelayed::default(), native_coin());
        let mut updates = encoder.subscribe();

        let to_alice = inputs(ALICE, "10", Some(usdc()));
        let to_bob = inputs(BOB, "20", Some(usdc()));
        let (stale, latest) = tokio::join!(encoder.encode(&to_alice), encoder.encode(&to_bob));

        assert_eq!(stale, None);
        let latest = latest.unwrap();
        assert!(encoder.is_current(latest.generation));
        assert!(encoder.is_ready_for(&to_bob));
        assert!(!encoder.is_ready_for(&to_alice));

        let call = IERC20::transferCall::abi_decode(&latest.transfer.call_data, true).unwrap();
        assert_eq!(call.to, BOB);
        assert_eq!(call.amount, U256::from(20_000_000u64));

        assert!(updates.has_changed().unwrap());
        assert_eq!(encoder.current_for(&to_alice), None);
        assert_eq!(encoder.current_for(&to_bob), Some(latest.clone()));
        assert_eq!(encoder.current(), Some(latest));
    }
}
