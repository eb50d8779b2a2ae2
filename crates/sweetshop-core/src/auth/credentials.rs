use keyring::Entry;

use super::storage::{StoreResult, TokenStore};

/// Keychain service name
const SERVICE_NAME: &str = "sweetshop";

/// Account the token is filed under
const TOKEN_ACCOUNT: &str = "token";

/// Keeps the bearer token in the OS keychain
pub struct KeyringTokenStore {
    service: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self) -> StoreResult<Entry> {
        Ok(Entry::new(&self.service, TOKEN_ACCOUNT)?)
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> StoreResult<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> StoreResult<()> {
        self.entry()?.set_password(token)?;
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn kind(&self) -> &'static str {
        "keyring"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Talks to the real OS keychain, so it is opt-in:
    // cargo test -p sweetshop-core -- --ignored keyring
    #[test]
    #[ignore = "needs an OS keychain"]
    fn test_keyring_store_roundtrip() {
        let store = KeyringTokenStore::with_service("sweetshop-test");
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);

        store.save("tok1").unwrap();
        // A second instance reads the same entry, as after a restart
        let reopened = KeyringTokenStore::with_service("sweetshop-test");
        assert_eq!(reopened.load().unwrap().as_deref(), Some("tok1"));

        reopened.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
