//! Test doubles for the reveal flow

use crate::FailureReporter;
use async_trait::async_trait;
use parking_lot::Mutex;
use reveal_vault::{SecretVaultClient, VaultError, VaultErrorKind, WalletId, WalletSecret};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{watch, Notify};

struct Step {
    gate: Option<Arc<Notify>>,
    response: Result<String, VaultError>,
}

/// Releases a held vault response
#[derive(Clone)]
pub struct VaultGate(Arc<Notify>);

impl VaultGate {
    /// Let the held response complete
    pub fn release(&self) {
        self.0.notify_one();
    }
}

/// Vault that plays back scripted responses in order.
///
/// Once the script is exhausted every load fails with `SecretNotFound`.
pub struct ScriptedVault {
    script: Mutex<VecDeque<Step>>,
    requested: Mutex<Vec<WalletId>>,
    calls: watch::Sender<usize>,
}

impl Default for ScriptedVault {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedVault {
    /// Create vault with an empty script
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requested: Mutex::new(Vec::new()),
            calls: watch::channel(0).0,
        }
    }

    /// Queue a successful load
    pub fn push_secret(&self, secret: &str) {
        self.push(None, Ok(secret.to_string()));
    }

    /// Queue a failed load
    pub fn push_error(&self, error: VaultError) {
        self.push(None, Err(error));
    }

    /// Queue a successful load that waits for [`VaultGate::release`]
    pub fn push_held_secret(&self, secret: &str) -> VaultGate {
        let gate = Arc::new(Notify::new());
        self.push(Some(Arc::clone(&gate)), Ok(secret.to_string()));
        VaultGate(gate)
    }

    /// Queue a failed load that waits for [`VaultGate::release`]
    pub fn push_held_error(&self, error: VaultError) -> VaultGate {
        let gate = Arc::new(Notify::new());
        self.push(Some(Arc::clone(&gate)), Err(error));
        VaultGate(gate)
    }

    /// Number of loads requested so far
    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }

    /// Wallet ids requested, in order
    pub fn requested(&self) -> Vec<WalletId> {
        self.requested.lock().clone()
    }

    /// Wait until at least `count` loads have been requested
    pub async fn wait_for_calls(&self, count: usize) {
        let mut rx = self.calls.subscribe();
        let _ = rx.wait_for(|calls| *calls >= count).await;
    }

    fn push(&self, gate: Option<Arc<Notify>>, response: Result<String, VaultError>) {
        self.script.lock().push_back(Step { gate, response });
    }
}

#[async_trait]
impl SecretVaultClient for ScriptedVault {
    async fn load_secret(&self, wallet_id: &WalletId) -> reveal_vault::Result<WalletSecret> {
        self.requested.lock().push(wallet_id.clone());
        self.calls.send_modify(|calls| *calls += 1);

        let step = self.script.lock().pop_front();
        let Some(step) = step else {
            return Err(VaultError::SecretNotFound(wallet_id.to_string()));
        };
        if let Some(gate) = step.gate {
            gate.notified().await;
        }
        step.response.map(WalletSecret::new)
    }
}

/// Reporter that records what it was given
#[derive(Default)]
pub struct RecordingReporter {
    captured: Mutex<Vec<(WalletId, VaultErrorKind, Vec<String>)>>,
}

impl RecordingReporter {
    /// Create empty reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Reported (wallet, kind) pairs
    pub fn kinds(&self) -> Vec<(WalletId, VaultErrorKind)> {
        self.captured
            .lock()
            .iter()
            .map(|(id, kind, _)| (id.clone(), *kind))
            .collect()
    }

    /// Cause chains of every report
    pub fn causes(&self) -> Vec<Vec<String>> {
        self.captured
            .lock()
            .iter()
            .map(|(_, _, causes)| causes.clone())
            .collect()
    }
}

impl FailureReporter for RecordingReporter {
    fn capture(&self, wallet_id: &WalletId, error: &VaultError) {
        self.captured
            .lock()
            .push((wallet_id.clone(), error.kind(), error.cause_chain()));
    }
}
