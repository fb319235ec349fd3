//! Secret vault client for the wallet reveal flow
//!
//! Thin contract over the platform secure storage and biometric
//! authentication services. Given a wallet id, the vault retrieves the
//! plaintext seed phrase or private key, migrating legacy records on the
//! way, and fails with a typed [`VaultError`] when authentication is denied
//! or unavailable, or when storage is missing or corrupt.
//!
//! ## Security Features
//!
//! - **Zeroization**: every plaintext buffer is wrapped in `Zeroizing`
//! - **Redacted Debug**: [`WalletSecret`] never prints its contents
//! - **No caching**: the vault hands ownership of the secret to the caller
//! - **Prompt isolation**: [`SecretVaultClient::load_secret`] is the only
//!   operation that may raise an OS authentication prompt

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod keystore_vault;
pub mod mock;
pub mod secret;
pub mod store;

pub use client::SecretVaultClient;
pub use error::{BoxError, Result, StoreError, VaultError, VaultErrorKind};
pub use keystore_vault::{KeystoreVault, KeystoreVaultConfig, SecretLocator, CURRENT_RECORD_VERSION};
pub use mock::{AuthOutcome, MockSecureStore};
pub use secret::{WalletId, WalletSecret};
pub use store::{
    AccessPolicy, AuthPrompt, Platform, SecureStore, StoreCapabilities, StoreResult,
};
