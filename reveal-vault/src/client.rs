//! Vault client contract

use crate::{Result, WalletId, WalletSecret};
use async_trait::async_trait;
use std::sync::Arc;

/// Source of plaintext wallet secrets
///
/// Implementations sit on top of platform secure storage and biometric
/// authentication.
///
/// - The call may suspend for as long as the OS prompt stays open.
/// - Any required record migration happens before returning.
/// - The plaintext is never cached: the caller owns the returned secret.
/// - This is the only operation allowed to raise an authentication prompt.
#[async_trait]
pub trait SecretVaultClient: Send + Sync {
    /// Load (and migrate if needed) the secret for `wallet_id`
    async fn load_secret(&self, wallet_id: &WalletId) -> Result<WalletSecret>;
}

#[async_trait]
impl<T> SecretVaultClient for Arc<T>
where
    T: SecretVaultClient + ?Sized,
{
    async fn load_secret(&self, wallet_id: &WalletId) -> Result<WalletSecret> {
        (**self).load_secret(wallet_id).await
    }
}
