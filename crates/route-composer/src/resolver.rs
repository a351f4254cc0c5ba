//! Token Resolution
//!
//! Address to metadata lookup. Resolution never fails: unknown tokens become
//! placeholder descriptors so an unlisted token cannot blank the route panel.

use composer_core::{constants::PLACEHOLDER_SYMBOL, Address};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::state::{TokenDescriptor, TokenInfo};

/// Pure address to metadata lookup.
pub trait TokenResolver {
    fn resolve(&self, address: &Address) -> Option<TokenInfo>;
}

impl<F> TokenResolver for F
where
    F: Fn(&Address) -> Option<TokenInfo>,
{
    fn resolve(&self, address: &Address) -> Option<TokenInfo> {
        self(address)
    }
}

/// Resolve `address`, substituting a placeholder for unknown tokens.
pub fn resolve_or_placeholder<R: TokenResolver + ?Sized>(
    resolver: &R,
    address: &Address,
    placeholder_symbol: &str,
) -> TokenDescriptor {
    match resolver.resolve(address) {
        Some(info) => TokenDescriptor {
            address: address.clone(),
            symbol: info.symbol,
            decimals: info.decimals,
            logo: info.logo,
        },
        None => {
            tracing::debug!("No metadata for token {}, using placeholder", address);
            placeholder(address, placeholder_symbol)
        }
    }
}

/// Descriptor used when metadata is unavailable.
pub fn placeholder(address: &Address, symbol: &str) -> TokenDescriptor {
    TokenDescriptor {
        address: address.clone(),
        symbol: if symbol.is_empty() {
            PLACEHOLDER_SYMBOL.to_string()
        } else {
            symbol.to_string()
        },
        decimals: 0,
        logo: None,
    }
}

/// One entry of a token list document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenListEntry {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// In-memory token list keyed by canonical address.
///
/// Serializes as a JSON array of entries; later duplicates replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TokenListEntry>", into = "Vec<TokenListEntry>")]
pub struct TokenList {
    tokens: IndexMap<Address, TokenInfo>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: impl Into<Address>, info: TokenInfo) {
        self.tokens.insert(address.into(), info);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn entries(&self) -> Vec<TokenListEntry> {
        self.tokens
            .iter()
            .map(|(address, info)| TokenListEntry {
                address: address.clone(),
                symbol: info.symbol.clone(),
                decimals: info.decimals,
                logo: info.logo.clone(),
            })
            .collect()
    }
}

impl TokenResolver for TokenList {
    fn resolve(&self, address: &Address) -> Option<TokenInfo> {
        self.tokens.get(address).cloned()
    }
}

impl From<Vec<TokenListEntry>> for TokenList {
    fn from(entries: Vec<TokenListEntry>) -> Self {
        let mut list = TokenList::new();
        for entry in entries {
            list.insert(
                entry.address,
                TokenInfo {
                    symbol: entry.symbol,
                    decimals: entry.decimals,
                    logo: entry.logo,
                },
            );
        }
        list
    }
}

impl From<TokenList> for Vec<TokenListEntry> {
    fn from(list: TokenList) -> Self {
        list.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usdc() -> TokenInfo {
        TokenInfo {
            symbol: "USDC".to_string(),
            decimals: 6,
            logo: Some("https://tokens.example/usdc.png".to_string()),
        }
    }

    #[test]
    fn test_token_list_resolves_case_insensitively() {
        let mut list = TokenList::new();
        list.insert("0xA0B8", usdc());

        let found = list.resolve(&Address::new("0xa0b8")).unwrap();
        assert_eq!(found.symbol, "USDC");
        assert_eq!(found.decimals, 6);
    }

    #[test]
    fn test_placeholder_for_unknown_token() {
        let list = TokenList::new();
        let addr = Address::new("0xdead");
        let desc = resolve_or_placeholder(&list, &addr, PLACEHOLDER_SYMBOL);
        assert_eq!(desc.symbol, "--");
        assert_eq!(desc.decimals, 0);
        assert_eq!(desc.logo, None);
        assert_eq!(desc.address, addr);
    }

    #[test]
    fn test_empty_placeholder_symbol_falls_back() {
        let desc = placeholder(&Address::new("0x1"), "");
        assert_eq!(desc.symbol, PLACEHOLDER_SYMBOL);
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |a: &Address| (a.as_str() == "0xa0b8").then(usdc);
        let desc = resolve_or_placeholder(&resolver, &Address::new("0xA0B8"), "--");
        assert_eq!(desc.symbol, "USDC");
        let desc = resolve_or_placeholder(&resolver, &Address::new("0xbeef"), "?");
        assert_eq!(desc.symbol, "?");
    }

    #[test]
    fn test_token_list_json() {
        let json = r#"[
            {"address": "0xA0B8", "symbol": "USDC", "decimals": 6},
            {"address": "0xC02A", "symbol": "WETH", "decimals": 18, "logo": "weth.png"}
        ]"#;
        let list: TokenList = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.resolve(&Address::new("0xc02a")).unwrap().logo.as_deref(),
            Some("weth.png")
        );

        let back = serde_json::to_value(&list).unwrap();
        assert_eq!(back[0]["address"], "0xa0b8");
        assert!(back[0].get("logo").is_none());
    }
}
