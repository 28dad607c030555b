use std::collections::BTreeMap;

use alloy_primitives::U256;
use safe_multisig::transaction_data::TxParameters;
use tracing::trace;

use crate::{
    error::ReviewError,
    estimator::{EstimationStatus, FeeEstimate},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Viewing,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TxParameterField {
    SafeNonce,
    SafeTxGas,
    EthNonce,
    EthGasLimit,
    EthGasPrice,
}

/// A value the operator set explicitly. `None` clears the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxParameterEdit {
    SafeNonce(Option<u64>),
    SafeTxGas(Option<u64>),
    EthNonce(Option<u64>),
    EthGasLimit(Option<u64>),
    EthGasPrice(Option<U256>),
}

impl TxParameterEdit {
    pub fn field(&self) -> TxParameterField {
        match self {
            TxParameterEdit::SafeNonce(_) => TxParameterField::SafeNonce,
            TxParameterEdit::SafeTxGas(_) => TxParameterField::SafeTxGas,
            TxParameterEdit::EthNonce(_) => TxParameterField::EthNonce,
            TxParameterEdit::EthGasLimit(_) => TxParameterField::EthGasLimit,
            TxParameterEdit::EthGasPrice(_) => TxParameterField::EthGasPrice,
        }
    }

    fn apply(&self, parameters: &mut TxParameters) {
        match self {
            TxParameterEdit::SafeNonce(v) => parameters.safe_nonce = *v,
            TxParameterEdit::SafeTxGas(v) => parameters.safe_tx_gas = *v,
            TxParameterEdit::EthNonce(v) => parameters.eth_nonce = *v,
            TxParameterEdit::EthGasLimit(v) => parameters.eth_gas_limit = *v,
            TxParameterEdit::EthGasPrice(v) => parameters.eth_gas_price = *v,
        }
    }
}

/// Layers the operator's explicit edits over the defaults.
pub fn merge_parameters(
    defaults: &TxParameters,
    overrides: &BTreeMap<TxParameterField, TxParameterEdit>,
) -> TxParameters {
    let mut parameters = defaults.clone();
    for edit in overrides.values() {
        edit.apply(&mut parameters);
    }
    parameters
}

/// Transaction parameters shown on the review screen.
///
/// Defaults come from the fee estimate (gas limit and price) and from the host (Safe
/// nonce). Edits are only accepted in [EditMode::Editing] and are tracked per field: a
/// field the operator touched keeps its value across new estimates, untouched fields
/// follow the latest defaults. Leaving edit mode keeps the edits.
#[derive(Debug, Clone, Default)]
pub struct TxParametersReconciler {
    mode: EditMode,
    defaults: TxParameters,
    overrides: BTreeMap<TxParameterField, TxParameterEdit>,
}

impl TxParametersReconciler {
    pub fn new(defaults: TxParameters) -> Self {
        Self { defaults, ..Default::default() }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn toggle_edit_mode(&mut self) -> EditMode {
        self.mode = match self.mode {
            EditMode::Viewing => EditMode::Editing,
            EditMode::Editing => EditMode::Viewing,
        };
        trace!(target: "send_funds::parameters", mode = ?self.mode, "Toggled edit mode");
        self.mode
    }

    pub fn set(&mut self, edit: TxParameterEdit) -> Result<(), ReviewError> {
        self.ensure_editing()?;
        self.overrides.insert(edit.field(), edit);
        Ok(())
    }

    /// Drops the edit on `field`, which follows the defaults again.
    pub fn reset(&mut self, field: TxParameterField) -> Result<(), ReviewError> {
        self.ensure_editing()?;
        self.overrides.remove(&field);
        Ok(())
    }

    pub fn is_overridden(&self, field: TxParameterField) -> bool {
        self.overrides.contains_key(&field)
    }

    pub fn defaults(&self) -> &TxParameters {
        &self.defaults
    }

    pub fn set_safe_nonce_default(&mut self, safe_nonce: Option<u64>) {
        self.defaults.safe_nonce = safe_nonce;
    }

    /// Gas defaults follow the estimate. An estimate that did not succeed leaves them empty.
    pub fn apply_fee_estimate(&mut self, estimate: &FeeEstimate) {
        let succeeded = estimate.execution_status == EstimationStatus::Success;
        self.defaults.eth_gas_limit = succeeded.then_some(estimate.gas_limit);
        self.defaults.eth_gas_price = succeeded.then_some(estimate.gas_price);
    }

    /// The parameters the dispatcher receives.
    pub fn effective(&self) -> TxParameters {
        merge_parameters(&self.defaults, &self.overrides)
    }

    fn ensure_editing(&self) -> Result<(), ReviewError> {
        match self.mode {
            EditMode::Editing => Ok(()),
            mode => Err(ReviewError::NotEditing(mode)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn estimate(gas_limit: u64, gas_price: u64) -> FeeEstimate {
        FeeEstimate {
            gas_limit,
            gas_price: U256::from(gas_price),
            execution_status: EstimationStatus::Success,
            ..Default::default()
        }
    }

    #[test]
    fn viewing_shows_defaults() {
        let mut reconciler =
            TxParametersReconciler::new(TxParameters { safe_nonce: Some(7), ..Default::default() });
        reconciler.apply_fee_estimate(&estimate(21_000, 10));

        assert_eq!(reconciler.mode(), EditMode::Viewing);
        assert_eq!(
            reconciler.effective(),
            TxParameters {
                safe_nonce: Some(7),
                eth_gas_limit: Some(21_000),
                eth_gas_price: Some(U256::from(10u64)),
                ..Default::default()
            }
        );
    }

    #[test]
    fn failed_estimate_clears_gas_defaults() {
        let mut reconciler = TxParametersReconciler::default();
        reconciler.apply_fee_estimate(&estimate(21_000, 10));

        reconciler.apply_fee_estimate(&FeeEstimate::failed(&FeeEstimate::default()));

        let effective = reconciler.effective();
        assert_eq!(effective.eth_gas_limit, None);
        assert_eq!(effective.eth_gas_price, None);
    }

    #[test]
    fn edits_require_edit_mode() {
        let mut reconciler = TxParametersReconciler::default();

        assert!(matches!(
            reconciler.set(TxParameterEdit::SafeNonce(Some(1))),
            Err(ReviewError::NotEditing(EditMode::Viewing))
        ));
        assert!(reconciler.reset(TxParameterField::SafeNonce).is_err());
        assert_eq!(reconciler.effective(), TxParameters::default());
    }

    #[test]
    fn explicit_edit_survives_new_estimate() {
        let mut reconciler = TxParametersReconciler::default();
        reconciler.apply_fee_estimate(&estimate(21_000, 10));

        reconciler.toggle_edit_mode();
        reconciler.set(TxParameterEdit::EthGasPrice(Some(U256::from(99u64)))).unwrap();

        reconciler.apply_fee_estimate(&estimate(50_000, 12));

        let effective = reconciler.effective();
        assert_eq!(effective.eth_gas_price, Some(U256::from(99u64)));
        assert_eq!(effective.eth_gas_limit, Some(50_000));
        assert!(reconciler.is_overridden(TxParameterField::EthGasPrice));
        assert!(!reconciler.is_overridden(TxParameterField::EthGasLimit));
    }

    #[test]
    fn edits_kept_after_leaving_edit_mode() {
        let mut reconciler = TxParametersReconciler::default();

        reconciler.toggle_edit_mode();
        reconciler.set(TxParameterEdit::SafeTxGas(Some(60_000))).unwrap();
        assert_eq!(reconciler.toggle_edit_mode(), EditMode::Viewing);

        reconciler.apply_fee_estimate(&estimate(21_000, 10));
        assert_eq!(reconciler.effective().safe_tx_gas, Some(60_000));
    }

    #[test]
    fn cleared_field_stays_cleared() {
        let mut reconciler =
            TxParametersReconciler::new(TxParameters { safe_nonce: Some(3), ..Default::default() });

        reconciler.toggle_edit_mode();
        reconciler.set(TxParameterEdit::SafeNonce(None)).unwrap();
        reconciler.set_safe_nonce_default(Some(4));
        assert_eq!(reconciler.effective().safe_nonce, None);

        reconciler.reset(TxParameterField::SafeNonce).unwrap();
        assert_eq!(reconciler.effective().safe_nonce, Some(4));
    }
}
