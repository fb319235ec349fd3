//! In-memory secure store for testing and platforms without native integration

use crate::{AccessPolicy, AuthPrompt, SecureStore, StoreCapabilities, StoreError, StoreResult};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use zeroize::Zeroizing;

/// Scripted result of the next authentication prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// User authenticates successfully
    Approve,
    /// User dismisses the prompt
    Cancel,
    /// Biometric / passcode check fails
    Fail,
}

struct Entry {
    value: Zeroizing<Vec<u8>>,
    policy: AccessPolicy,
}

/// Mock secure store
///
/// Enforces access policies against its configured capabilities and plays
/// back a queue of prompt outcomes (approving once the queue is empty).
pub struct MockSecureStore {
    capabilities: RwLock<StoreCapabilities>,
    entries: RwLock<HashMap<String, Entry>>,
    outcomes: Mutex<VecDeque<AuthOutcome>>,
    read_faults: Mutex<VecDeque<StoreError>>,
    write_fault: Mutex<Option<StoreError>>,
    prompts: AtomicUsize,
}

impl MockSecureStore {
    /// Create a store with biometrics and passcode available
    pub fn new() -> Self {
        Self::with_capabilities(StoreCapabilities {
            has_biometrics: true,
            has_passcode: true,
            ..StoreCapabilities::default()
        })
    }

    /// Create with custom capabilities (for testing)
    pub fn with_capabilities(capabilities: StoreCapabilities) -> Self {
        Self {
            capabilities: RwLock::new(capabilities),
            entries: RwLock::new(HashMap::new()),
            outcomes: Mutex::new(VecDeque::new()),
            read_faults: Mutex::new(VecDeque::new()),
            write_fault: Mutex::new(None),
            prompts: AtomicUsize::new(0),
        }
    }

    /// Replace device capabilities (e.g. user removed enrolled fingerprints)
    pub fn set_capabilities(&self, capabilities: StoreCapabilities) {
        *self.capabilities.write() = capabilities;
    }

    /// Insert a raw entry, bypassing any encoding
    pub fn insert(&self, key: &str, value: &[u8], policy: AccessPolicy) {
        self.entries.write().insert(
            key.to_string(),
            Entry {
                value: Zeroizing::new(value.to_vec()),
                policy,
            },
        );
    }

    /// Check whether an entry exists
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Policy of a stored entry
    pub fn policy_of(&self, key: &str) -> Option<AccessPolicy> {
        self.entries.read().get(key).map(|e| e.policy)
    }

    /// Queue the outcome of the next prompt
    pub fn push_outcome(&self, outcome: AuthOutcome) {
        self.outcomes.lock().push_back(outcome);
    }

    /// Fail the next read with `error` before any policy check
    pub fn fail_next_read(&self, error: StoreError) {
        self.read_faults.lock().push_back(error);
    }

    /// Fail every write until cleared with `None`
    pub fn set_write_fault(&self, error: Option<StoreError>) {
        *self.write_fault.lock() = error;
    }

    /// Number of prompts raised so far
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl Default for MockSecureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureStore for MockSecureStore {
    fn capabilities(&self) -> StoreCapabilities {
        self.capabilities.read().clone()
    }

    fn read(&self, key: &str, prompt: &AuthPrompt) -> StoreResult<Option<Zeroizing<Vec<u8>>>> {
        if let Some(fault) = self.read_faults.lock().pop_front() {
            return StoreResult::Error(fault);
        }

        let entries = self.entries.read();
        let Some(entry) = entries.get(key) else {
            return StoreResult::Success(None);
        };

        if !entry.policy.is_satisfiable(&self.capabilities()) {
            return StoreResult::NotAvailable;
        }

        if entry.policy.requires_prompt() {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            tracing::debug!("Mock auth prompt: {}", prompt.reason());
            let outcome = self
                .outcomes
                .lock()
                .pop_front()
                .unwrap_or(AuthOutcome::Approve);
            match outcome {
                AuthOutcome::Approve => {}
                AuthOutcome::Cancel => return StoreResult::Cancelled,
                AuthOutcome::Fail => return StoreResult::AuthFailed,
            }
        }

        StoreResult::Success(Some(entry.value.clone()))
    }

    fn write(&self, key: &str, value: &[u8], policy: AccessPolicy) -> StoreResult<()> {
        if let Some(fault) = self.write_fault.lock().clone() {
            return StoreResult::Error(fault);
        }
        if !policy.is_satisfiable(&self.capabilities()) {
            return StoreResult::NotAvailable;
        }
        self.insert(key, value, policy);
        StoreResult::Success(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries.write().remove(key);
        StoreResult::Success(())
    }
}
