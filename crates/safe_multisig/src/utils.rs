use alloy_primitives::{utils::parse_units, U256};

use crate::error::{Error, Result};

/// Converts a human readable amount (e.g. `"1.5"`) into the token's smallest unit.
pub fn to_token_unit(amount: &str, decimals: u8) -> Result<U256> {
    let trimmed = amount.trim();
    let invalid = |reason: &str| Error::InvalidAmount {
        amount: amount.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("amount is empty"));
    }
    if trimmed.starts_with('-') {
        return Err(invalid("amount is negative"));
    }
    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.trim_end_matches('0').len() > decimals as usize {
            return Err(invalid(&format!("more than {decimals} decimal places")));
        }
    }

    let parsed = parse_units(trimmed, decimals).map_err(|e| invalid(&e.to_string()))?;

    Ok(parsed.get_absolute())
}
