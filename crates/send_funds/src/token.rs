use alloy_primitives::Address;
use safe_multisig::consts::NativeCoin;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A token held by the Safe, as listed by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub logo_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    pub display_name: String,
    pub logo_uri: Option<String>,
    pub is_native_coin: bool,
}

impl ResolvedToken {
    fn from_record(record: &TokenRecord, native_coin: &NativeCoin) -> Self {
        Self {
            address: record.address,
            decimals: record.decimals,
            symbol: record.symbol.clone(),
            display_name: record.name.clone(),
            logo_uri: record.logo_uri.clone(),
            is_native_coin: record.address == native_coin.address,
        }
    }

    pub fn native(native_coin: &NativeCoin) -> Self {
        Self {
            address: native_coin.address,
            decimals: native_coin.decimals,
            symbol: native_coin.symbol.clone(),
            display_name: native_coin.name.clone(),
            logo_uri: native_coin.logo_uri.clone(),
            is_native_coin: true,
        }
    }
}

/// Finds the token matching `identifier` (case-insensitively) in the Safe's token list.
///
/// Falls back to the native coin when the identifier is the native coin pseudo-address
/// but the list does not carry it. `None` means "not resolved yet", not a failure.
pub fn find_token(
    identifier: &str,
    tokens: &[TokenRecord],
    native_coin: &NativeCoin,
) -> Option<ResolvedToken> {
    let address: Address = identifier.trim().parse().ok()?;

    tokens
        .iter()
        .find(|token| token.address == address)
        .map(|token| ResolvedToken::from_record(token, native_coin))
        .or_else(|| (address == native_coin.address).then(|| ResolvedToken::native(native_coin)))
}

struct Resolution {
    identifier: String,
    tokens: Vec<TokenRecord>,
    token: Option<ResolvedToken>,
}

/// Memoizing wrapper around [find_token]: the token is only looked up again when the
/// identifier or the token list change.
pub struct TokenResolver {
    native_coin: NativeCoin,
    last: Option<Resolution>,
}

impl TokenResolver {
    pub fn new(native_coin: NativeCoin) -> Self {
        Self { native_coin, last: None }
    }

    pub fn resolve(&mut self, identifier: &str, tokens: &[TokenRecord]) -> Option<ResolvedToken> {
        if let Some(last) = &self.last {
            if last.identifier == identifier && last.tokens == tokens {
                return last.token.clone();
            }
        }

        let token = find_token(identifier, tokens, &self.native_coin);
        trace!(target: "send_funds::token", identifier, resolved = token.is_some(), "Resolved token");

        self.last = Some(Resolution {
            identifier: identifier.to_string(),
            tokens: tokens.to_vec(),
            token: token.clone(),
        });

        token
    }
}
