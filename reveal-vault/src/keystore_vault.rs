//! Secure-store backed vault with transparent record migration
//!
//! Secrets live under a per-wallet key as a small versioned JSON record
//! protected by an access policy. Wallets created by older app versions
//! kept the raw secret unprotected under a legacy key; the first load of
//! such a wallet rewrites it as a current record and removes the legacy
//! entry.

use crate::{
    AccessPolicy, AuthPrompt, Result, SecretVaultClient, SecureStore, StoreResult, VaultError,
    WalletId, WalletSecret,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use zeroize::{Zeroize, Zeroizing};

/// Version written into current records
pub const CURRENT_RECORD_VERSION: u8 = 1;

/// Storage keys for one wallet's secret
#[derive(Debug, Clone)]
pub struct SecretLocator {
    key_prefix: String,
}

impl SecretLocator {
    /// Create locator for a wallet
    pub fn new(wallet_id: &WalletId) -> Self {
        Self {
            key_prefix: format!("reveal_wallet_{}", wallet_id),
        }
    }

    /// Key of the current (versioned, protected) record
    pub fn current_key(&self) -> String {
        format!("{}_secret", self.key_prefix)
    }

    /// Key of the pre-migration (raw, unprotected) record
    pub fn legacy_key(&self) -> String {
        format!("{}_secret_legacy", self.key_prefix)
    }
}

/// Vault configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystoreVaultConfig {
    /// Policy applied when rewriting legacy records and saving secrets
    pub migration_policy: AccessPolicy,
    /// Reason shown in the OS authentication prompt
    pub prompt_reason: String,
}

impl Default for KeystoreVaultConfig {
    fn default() -> Self {
        Self {
            migration_policy: AccessPolicy::BiometryOrPasscode,
            prompt_reason: "Authenticate to reveal your secret".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct StoredSecret {
    version: u8,
    secret: String,
    policy: AccessPolicy,
}

impl StoredSecret {
    fn encode(&self) -> Result<Zeroizing<Vec<u8>>> {
        serde_json::to_vec(self)
            .map(Zeroizing::new)
            .map_err(|e| VaultError::unknown(format!("record encoding failed: {:?}", e.classify())))
    }
}

impl Drop for StoredSecret {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

/// Vault backed by a [`SecureStore`]
pub struct KeystoreVault {
    store: Arc<dyn SecureStore>,
    config: KeystoreVaultConfig,
}

impl KeystoreVault {
    /// Create vault over a platform store
    pub fn new(store: Arc<dyn SecureStore>) -> Self {
        Self::with_config(store, KeystoreVaultConfig::default())
    }

    /// Create vault with custom configuration
    pub fn with_config(store: Arc<dyn SecureStore>, config: KeystoreVaultConfig) -> Self {
        Self { store, config }
    }

    /// Get configuration
    pub fn config(&self) -> &KeystoreVaultConfig {
        &self.config
    }

    /// Store a secret as a current record under the configured policy
    pub async fn save_secret(&self, wallet_id: &WalletId, secret: &WalletSecret) -> Result<()> {
        if secret.is_empty() {
            return Err(VaultError::StorageCorrupt(
                "refusing to store an empty secret".to_string(),
            ));
        }
        let store = Arc::clone(&self.store);
        let policy = self.config.migration_policy;
        let wallet_id = wallet_id.clone();
        let record = StoredSecret {
            version: CURRENT_RECORD_VERSION,
            secret: secret.expose().to_string(),
            policy: policy.effective_for(&store.capabilities()),
        };
        tokio::task::spawn_blocking(move || {
            let encoded = record.encode()?;
            let key = SecretLocator::new(&wallet_id).current_key();
            store.write(&key, &encoded, record.policy).into_vault()?;
            tracing::info!("Stored secret record for wallet {}", wallet_id);
            Ok(())
        })
        .await
        .map_err(VaultError::unknown)?
    }
}

#[async_trait]
impl SecretVaultClient for KeystoreVault {
    async fn load_secret(&self, wallet_id: &WalletId) -> Result<WalletSecret> {
        let store = Arc::clone(&self.store);
        let config = self.config.clone();
        let wallet_id = wallet_id.clone();
        tokio::task::spawn_blocking(move || load_and_migrate(store.as_ref(), &config, &wallet_id))
            .await
            .map_err(VaultError::unknown)?
    }
}

fn load_and_migrate(
    store: &dyn SecureStore,
    config: &KeystoreVaultConfig,
    wallet_id: &WalletId,
) -> Result<WalletSecret> {
    let locator = SecretLocator::new(wallet_id);
    let prompt = AuthPrompt::new(config.prompt_reason.as_str());

    if let Some(bytes) = store.read(&locator.current_key(), &prompt).into_vault()? {
        tracing::debug!("Loaded current secret record for wallet {}", wallet_id);
        return decode_current(&bytes);
    }

    let Some(bytes) = store.read(&locator.legacy_key(), &prompt).into_vault()? else {
        return Err(VaultError::SecretNotFound(wallet_id.to_string()));
    };
    let secret = decode_legacy(&bytes)?;
    migrate(store, config, &locator, wallet_id, &secret);
    Ok(secret)
}

fn decode_current(bytes: &[u8]) -> Result<WalletSecret> {
    // serde_json messages can quote input, so only position info is kept
    let mut record: StoredSecret = serde_json::from_slice(bytes).map_err(|e| {
        VaultError::StorageCorrupt(format!(
            "undecodable record ({:?} at line {} column {})",
            e.classify(),
            e.line(),
            e.column()
        ))
    })?;

    if record.version != CURRENT_RECORD_VERSION {
        return Err(VaultError::StorageCorrupt(format!(
            "unsupported record version {}",
            record.version
        )));
    }
    if record.secret.trim().is_empty() {
        return Err(VaultError::StorageCorrupt("record holds an empty secret".to_string()));
    }

    Ok(WalletSecret::new(std::mem::take(&mut record.secret)))
}

fn decode_legacy(bytes: &[u8]) -> Result<WalletSecret> {
    let text = std::str::from_utf8(bytes).map_err(|_| {
        VaultError::StorageCorrupt("legacy record is not valid UTF-8".to_string())
    })?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(VaultError::StorageCorrupt("legacy record is empty".to_string()));
    }
    Ok(WalletSecret::new(trimmed))
}

/// Best effort: a failed rewrite leaves the legacy record in place and the
/// caller still gets the secret.
fn migrate(
    store: &dyn SecureStore,
    config: &KeystoreVaultConfig,
    locator: &SecretLocator,
    wallet_id: &WalletId,
    secret: &WalletSecret,
) {
    let policy = config.migration_policy.effective_for(&store.capabilities());
    let record = StoredSecret {
        version: CURRENT_RECORD_VERSION,
        secret: secret.expose().to_string(),
        policy,
    };
    let encoded = match record.encode() {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::warn!("Secret migration skipped for wallet {}: {}", wallet_id, e);
            return;
        }
    };

    match store.write(&locator.current_key(), &encoded, policy) {
        StoreResult::Success(()) => {}
        other => {
            tracing::warn!(
                "Secret migration write failed for wallet {} ({})",
                wallet_id,
                other.outcome_label()
            );
            return;
        }
    }

    if let StoreResult::Error(e) = store.delete(&locator.legacy_key()) {
        tracing::warn!("Legacy secret record not removed for wallet {}: {}", wallet_id, e);
    }

    tracing::info!("Migrated legacy secret record for wallet {}", wallet_id);
}
