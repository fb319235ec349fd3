//! Wallet secret reveal flow
//!
//! Drives the "show recovery phrase / private key" screen: loads the secret
//! from a [`SecretVaultClient`] behind biometric authentication, classifies
//! it, and exposes a small state machine the UI renders from.
//!
//! ## Guarantees
//!
//! - One vault call in flight per mount; duplicate triggers are no-ops
//! - A load never applies after teardown or a wallet change
//! - Secrets are zeroized when hidden, replaced, or torn down
//! - Vault errors are reported through [`FailureReporter`], never shown raw

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cancel;
pub mod classify;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod messages;
pub mod report;
pub mod state;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use cancel::CancelToken;
pub use classify::{
    classify, classify_str, inspect_mnemonic, is_private_key_hex, MnemonicCheck, WalletType,
    MNEMONIC_WORD_COUNTS, WORD_LISTS,
};
pub use config::{RevealConfig, ANDROID_STARTUP_DELAY_MS};
pub use controller::{RevealController, RevealControllerBuilder};
pub use error::{Error, Result};
pub use events::{RevealEvent, RevealSubscription, EVENT_CHANNEL_CAPACITY};
pub use messages::RevealView;
pub use report::{FailureReporter, TracingReporter};
pub use state::{RevealPhase, RevealState, WalletRecord};

pub use reveal_vault::{Platform, SecretVaultClient, VaultError, VaultErrorKind, WalletId, WalletSecret};
