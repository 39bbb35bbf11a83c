// ./src/whitelist.rs

use std::collections::HashSet;

use crate::network::{AddressError, NetworkConfig};
use crate::types::AccountId;

/// Optional allow-list of accounts served by the approver. Empty allows all.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    accounts: HashSet<AccountId>,
}

impl Whitelist {
    pub fn new(accounts: impl IntoIterator<Item = AccountId>) -> Self {
        Self { accounts: accounts.into_iter().collect() }
    }

    /// Parses configured entries in the network's textual account form.
    pub fn from_config<S: AsRef<str>>(
        network: &NetworkConfig,
        entries: &[S],
    ) -> Result<Self, AddressError> {
        let accounts = entries
            .iter()
            .map(|entry| network.parse_account(entry.as_ref().trim()))
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(Self { accounts })
    }

    pub fn allows(&self, account: &AccountId) -> bool {
        self.is_empty() || self.accounts.contains(account)
    }

    pub fn len(&self) -> usize { self.accounts.len() }

    pub fn is_empty(&self) -> bool { self.accounts.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::AddressStyle;

    #[test]
    fn test_empty_whitelist_allows_everyone() {
        assert!(Whitelist::default().allows(&AccountId([7u8; 20])));
    }

    #[test]
    fn test_whitelist_membership() {
        let network = NetworkConfig::for_chain("Binance-Chain-Ganges", AddressStyle::Bech32).unwrap();
        let list =
            Whitelist::from_config(&network, &["tbnb1vu8vu6jxqtwy5cc3kc6wj2fljsm5k0qqpwt3sn"]).unwrap();
        let alice: AccountId = "0x670ece6a4602dc4a6311b634e9293f94374b3c00".parse().unwrap();
        let bob: AccountId = "0x599a27d81f9b8d6a0a3e5a80a21c5630a01fa127".parse().unwrap();
        assert!(list.allows(&alice));
        assert!(!list.allows(&bob));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_bad_entry_is_rejected() {
        let network = NetworkConfig::for_chain("Binance-Chain-Ganges", AddressStyle::Bech32).unwrap();
        assert!(Whitelist::from_config(&network, &["not-an-address"]).is_err());
    }
}
