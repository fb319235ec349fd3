//! Keystore vault tests against the mock secure store
//!
//! Tests cover:
//! - Loading current records with and without prompts
//! - Legacy record migration (and failed migration writes)
//! - Mapping of prompt outcomes and policy mismatches to vault errors
//! - Storage-layer failures

use reveal_vault::{
    AccessPolicy, AuthOutcome, KeystoreVault, KeystoreVaultConfig, MockSecureStore, Platform,
    SecretLocator, SecretVaultClient, StoreCapabilities, StoreError, VaultErrorKind, WalletId,
    WalletSecret,
};
use std::sync::Arc;

const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const KEY_HEX: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

fn setup() -> (Arc<MockSecureStore>, KeystoreVault) {
    let store = Arc::new(MockSecureStore::new());
    let vault = KeystoreVault::new(store.clone());
    (store, vault)
}

fn android_without_biometrics() -> StoreCapabilities {
    StoreCapabilities {
        platform: Platform::Android,
        has_biometrics: false,
        has_passcode: true,
    }
}

#[tokio::test]
async fn test_save_then_load_prompts_once() {
    let (store, vault) = setup();
    let wallet = WalletId::from("w1");

    vault
        .save_secret(&wallet, &WalletSecret::new(PHRASE))
        .await
        .unwrap();
    let secret = vault.load_secret(&wallet).await.unwrap();

    assert_eq!(secret.expose(), PHRASE);
    assert_eq!(store.prompt_count(), 1);
    assert_eq!(
        store.policy_of(&SecretLocator::new(&wallet).current_key()),
        Some(AccessPolicy::BiometryOrPasscode)
    );
}

#[tokio::test]
async fn test_missing_secret() {
    let (_store, vault) = setup();
    let err = vault.load_secret(&WalletId::from("ghost")).await.unwrap_err();
    assert_eq!(err.kind(), VaultErrorKind::SecretNotFound);
    assert!(err.to_string().contains("ghost"));
}

#[tokio::test]
async fn test_cancel_and_fail_are_denied() {
    let (store, vault) = setup();
    let wallet = WalletId::from("w2");
    vault
        .save_secret(&wallet, &WalletSecret::new(KEY_HEX))
        .await
        .unwrap();

    store.push_outcome(AuthOutcome::Cancel);
    store.push_outcome(AuthOutcome::Fail);

    let first = vault.load_secret(&wallet).await.unwrap_err();
    let second = vault.load_secret(&wallet).await.unwrap_err();
    assert_eq!(first.kind(), VaultErrorKind::AuthenticationDenied);
    assert_eq!(second.kind(), VaultErrorKind::AuthenticationDenied);

    // Queue exhausted: next prompt approves
    assert_eq!(vault.load_secret(&wallet).await.unwrap().expose(), KEY_HEX);
    assert_eq!(store.prompt_count(), 3);
}

#[tokio::test]
async fn test_biometric_only_record_on_device_without_biometrics() {
    let store = Arc::new(MockSecureStore::with_capabilities(android_without_biometrics()));
    let vault = KeystoreVault::new(store.clone());
    let wallet = WalletId::from("w3");
    let record = format!(
        r#"{{"version":1,"secret":"{}","policy":"biometry_only"}}"#,
        KEY_HEX
    );
    store.insert(
        &SecretLocator::new(&wallet).current_key(),
        record.as_bytes(),
        AccessPolicy::BiometryOnly,
    );

    let err = vault.load_secret(&wallet).await.unwrap_err();
    assert_eq!(err.kind(), VaultErrorKind::AuthenticationUnavailable);
    assert!(!err.is_recoverable());
    assert_eq!(store.prompt_count(), 0);
}

#[tokio::test]
async fn test_legacy_record_is_migrated() {
    let (store, vault) = setup();
    let wallet = WalletId::from("legacy");
    let locator = SecretLocator::new(&wallet);
    store.insert(
        &locator.legacy_key(),
        format!("{}\n", PHRASE).as_bytes(),
        AccessPolicy::Unprotected,
    );

    let secret = vault.load_secret(&wallet).await.unwrap();
    assert_eq!(secret.expose(), PHRASE);
    assert!(!store.contains(&locator.legacy_key()));
    assert_eq!(
        store.policy_of(&locator.current_key()),
        Some(AccessPolicy::BiometryOrPasscode)
    );
    assert_eq!(store.prompt_count(), 0);

    // Second load reads the migrated record behind a prompt
    let again = vault.load_secret(&wallet).await.unwrap();
    assert_eq!(again.expose(), PHRASE);
    assert_eq!(store.prompt_count(), 1);
}

#[tokio::test]
async fn test_failed_migration_keeps_legacy_record() {
    let (store, vault) = setup();
    let wallet = WalletId::from("legacy-ro");
    let locator = SecretLocator::new(&wallet);
    store.insert(&locator.legacy_key(), KEY_HEX.as_bytes(), AccessPolicy::Unprotected);
    store.set_write_fault(Some(StoreError::Io("read-only keychain".into())));

    let secret = vault.load_secret(&wallet).await.unwrap();
    assert_eq!(secret.expose(), KEY_HEX);
    assert!(store.contains(&locator.legacy_key()));
    assert!(!store.contains(&locator.current_key()));
}

#[tokio::test]
async fn test_migration_downgrades_biometric_only_policy() {
    let store = Arc::new(MockSecureStore::with_capabilities(android_without_biometrics()));
    let vault = KeystoreVault::with_config(
        store.clone(),
        KeystoreVaultConfig {
            migration_policy: AccessPolicy::BiometryOnly,
            ..KeystoreVaultConfig::default()
        },
    );
    let wallet = WalletId::from("downgrade");
    let locator = SecretLocator::new(&wallet);
    store.insert(&locator.legacy_key(), KEY_HEX.as_bytes(), AccessPolicy::Unprotected);

    vault.load_secret(&wallet).await.unwrap();
    assert_eq!(
        store.policy_of(&locator.current_key()),
        Some(AccessPolicy::BiometryOrPasscode)
    );
}

#[tokio::test]
async fn test_corrupt_and_io_failures() {
    let (store, vault) = setup();
    let wallet = WalletId::from("broken");
    store.insert(
        &SecretLocator::new(&wallet).current_key(),
        b"not json at all",
        AccessPolicy::BiometryOrPasscode,
    );
    let err = vault.load_secret(&wallet).await.unwrap_err();
    assert_eq!(err.kind(), VaultErrorKind::StorageCorrupt);

    store.fail_next_read(StoreError::Platform {
        code: -34018,
        message: "missing entitlement".into(),
    });
    let err = vault.load_secret(&wallet).await.unwrap_err();
    assert_eq!(err.kind(), VaultErrorKind::Unknown);
    assert!(err.cause_chain().iter().any(|c| c.contains("-34018")));
}

#[tokio::test]
async fn test_empty_secret_is_not_saved() {
    let (store, vault) = setup();
    let wallet = WalletId::from("empty");
    let err = vault
        .save_secret(&wallet, &WalletSecret::new("   "))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), VaultErrorKind::StorageCorrupt);
    assert!(!store.contains(&SecretLocator::new(&wallet).current_key()));
}
