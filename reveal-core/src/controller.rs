//! Secret reveal controller
//!
//! Owns the reveal state machine for one mounted wallet:
//!
//! ```text
//! Hidden        --start-->   Loading
//! Loading       --success--> Revealed(secret, classify(secret))
//! Loading       --denied | unknown-->                       BiometricGate
//! Loading       --unavailable | not found | corrupt-->      Unavailable
//! BiometricGate --retry-->   Loading
//! Revealed      --reset-->   Hidden
//! ```
//!
//! `Unavailable` is terminal until the flow is remounted. Invalid calls are
//! no-ops and return the current phase; the controller never surfaces vault
//! errors to its callers.
//!
//! Loads run on a spawned task tagged with the mount generation. Teardown
//! and wallet changes bump the generation and cancel the task, so a result
//! that arrives late is dropped instead of being applied.

use crate::cancel::CancelToken;
use crate::events::{event_channel, RevealEvent, RevealSubscription};
use crate::messages::RevealView;
use crate::{
    classify, inspect_mnemonic, FailureReporter, MnemonicCheck, RevealConfig, RevealPhase,
    RevealState, TracingReporter, WalletRecord, WalletType,
};
use parking_lot::Mutex;
use reveal_vault::{SecretVaultClient, VaultError, WalletId, WalletSecret};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Start,
    Retry,
}

impl Trigger {
    fn source_phase(&self) -> RevealPhase {
        match self {
            Trigger::Start => RevealPhase::Hidden,
            Trigger::Retry => RevealPhase::BiometricGate,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Start => write!(f, "start"),
            Trigger::Retry => write!(f, "retry"),
        }
    }
}

struct Mount {
    record: WalletRecord,
    state: RevealState,
    generation: u64,
    cancel: CancelToken,
    torn_down: bool,
}

impl Mount {
    fn type_hint(&self) -> Option<WalletType> {
        match self.state.phase() {
            RevealPhase::Revealed(wallet_type) => Some(wallet_type),
            _ => self.record.wallet_type,
        }
    }
}

struct Inner {
    vault: Arc<dyn SecretVaultClient>,
    config: RevealConfig,
    reporter: Arc<dyn FailureReporter>,
    mount: Mutex<Mount>,
    phase_tx: watch::Sender<RevealPhase>,
    events: broadcast::Sender<RevealEvent>,
}

impl Inner {
    /// Replace the state; the previous state (and any secret) drops here.
    fn set_state(&self, mount: &mut Mount, state: RevealState) {
        let phase = state.phase();
        let previous = std::mem::replace(&mut mount.state, state);
        drop(previous);
        self.phase_tx.send_replace(phase);
    }

    fn emit(&self, event: RevealEvent) {
        if self.events.send(event).is_err() {
            debug!("No listeners for {:?}", event);
        }
    }

    fn complete(&self, generation: u64, outcome: Result<WalletSecret, VaultError>) {
        let mut mount = self.mount.lock();
        if mount.torn_down || mount.generation != generation || !mount.state.phase().is_loading()
        {
            debug!("Discarding stale secret load for wallet {}", mount.record.id);
            return;
        }
        let wallet_id = mount.record.id.clone();

        let outcome = match outcome {
            Ok(secret) if secret.is_empty() => Err(VaultError::StorageCorrupt(
                "vault returned an empty secret".to_string(),
            )),
            other => other,
        };

        match outcome {
            Ok(secret) => {
                let wallet_type = classify(&secret);
                if wallet_type == WalletType::Mnemonic {
                    let check = inspect_mnemonic(secret.expose());
                    if check != MnemonicCheck::Valid {
                        warn!("Phrase for wallet {} does not validate: {:?}", wallet_id, check);
                    }
                }
                mount.record.wallet_type = Some(wallet_type);
                self.set_state(&mut mount, RevealState::Revealed { secret, wallet_type });
                drop(mount);

                info!("Secret revealed for wallet {} ({})", wallet_id, wallet_type);
                self.emit(RevealEvent::WalletTypeIdentified(wallet_type));
                self.emit(RevealEvent::SecretLoaded(true));
            }
            Err(error) => {
                let next = if error.is_recoverable() {
                    RevealState::BiometricGate
                } else {
                    RevealState::Unavailable
                };
                self.set_state(&mut mount, next);
                drop(mount);

                info!("Secret not revealed for wallet {} ({})", wallet_id, error.kind());
                self.reporter.capture(&wallet_id, &error);
                self.emit(RevealEvent::SecretLoaded(false));
            }
        }
    }
}

struct LoadTask {
    inner: Weak<Inner>,
    vault: Arc<dyn SecretVaultClient>,
    wallet_id: WalletId,
    generation: u64,
    cancel: CancelToken,
    delay: Duration,
}

impl LoadTask {
    async fn run(self) {
        let LoadTask {
            inner,
            vault,
            wallet_id,
            generation,
            cancel,
            delay,
        } = self;

        if !delay.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Startup delay cancelled for wallet {}", wallet_id);
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
        if cancel.is_cancelled() {
            return;
        }

        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Secret load abandoned for wallet {}", wallet_id);
                return;
            }
            outcome = vault.load_secret(&wallet_id) => outcome,
        };

        match inner.upgrade() {
            Some(inner) => inner.complete(generation, outcome),
            None => debug!("Reveal flow for wallet {} dropped before load finished", wallet_id),
        }
    }
}

/// Builder for [`RevealController`]
pub struct RevealControllerBuilder {
    record: WalletRecord,
    vault: Arc<dyn SecretVaultClient>,
    config: RevealConfig,
    reporter: Arc<dyn FailureReporter>,
}

impl RevealControllerBuilder {
    /// Set configuration (default: no startup delay)
    pub fn config(mut self, config: RevealConfig) -> Self {
        self.config = config;
        self
    }

    /// Set failure reporter (default: [`TracingReporter`])
    pub fn reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Build the controller in `Hidden`
    pub fn build(self) -> RevealController {
        let (phase_tx, _) = watch::channel(RevealPhase::Hidden);
        RevealController {
            inner: Arc::new(Inner {
                vault: self.vault,
                config: self.config,
                reporter: self.reporter,
                mount: Mutex::new(Mount {
                    record: self.record,
                    state: RevealState::Hidden,
                    generation: 0,
                    cancel: CancelToken::new(),
                    torn_down: false,
                }),
                phase_tx,
                events: event_channel(),
            }),
        }
    }
}

/// Reveal flow for one mounted wallet.
///
/// Dropping the controller tears it down.
pub struct RevealController {
    inner: Arc<Inner>,
}

impl RevealController {
    /// Create controller with the given configuration
    pub fn new(
        record: WalletRecord,
        vault: Arc<dyn SecretVaultClient>,
        config: RevealConfig,
    ) -> Self {
        Self::builder(record, vault).config(config).build()
    }

    /// Start building a controller
    pub fn builder(record: WalletRecord, vault: Arc<dyn SecretVaultClient>) -> RevealControllerBuilder {
        RevealControllerBuilder {
            record,
            vault,
            config: RevealConfig::default(),
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Get current phase
    pub fn phase(&self) -> RevealPhase {
        self.inner.mount.lock().state.phase()
    }

    /// Wallet this flow is mounted for
    pub fn wallet_id(&self) -> WalletId {
        self.inner.mount.lock().record.id.clone()
    }

    /// Best known wallet type: the classified type once revealed, otherwise
    /// the type stored with the wallet record
    pub fn wallet_type_hint(&self) -> Option<WalletType> {
        self.inner.mount.lock().type_hint()
    }

    /// Get configuration
    pub fn config(&self) -> &RevealConfig {
        &self.inner.config
    }

    /// View model for the current phase
    pub fn view(&self) -> RevealView {
        let mount = self.inner.mount.lock();
        mount.state.phase().render(mount.type_hint())
    }

    /// Subscribe to phase changes
    pub fn subscribe(&self) -> RevealSubscription {
        RevealSubscription::new(self.inner.phase_tx.subscribe())
    }

    /// Subscribe to load notifications
    pub fn events(&self) -> broadcast::Receiver<RevealEvent> {
        self.inner.events.subscribe()
    }

    /// Run `f` against the revealed secret, if any.
    ///
    /// The flow is locked while `f` runs; `f` must not call back into the
    /// controller.
    pub fn with_secret<R>(&self, f: impl FnOnce(&WalletSecret, WalletType) -> R) -> Option<R> {
        let mount = self.inner.mount.lock();
        let RevealPhase::Revealed(wallet_type) = mount.state.phase() else {
            return None;
        };
        mount.state.secret().map(|secret| f(secret, wallet_type))
    }

    /// Begin loading from `Hidden`, after the configured startup delay.
    ///
    /// Must be called within a Tokio runtime. No-op in any other phase.
    pub fn start(&self) -> RevealPhase {
        self.begin_load(Trigger::Start)
    }

    /// User-initiated retry from `BiometricGate`; loads immediately.
    /// No-op in any other phase.
    pub fn retry(&self) -> RevealPhase {
        self.begin_load(Trigger::Retry)
    }

    /// Hide a revealed secret, releasing it. No-op in any other phase.
    pub fn reset(&self) -> RevealPhase {
        let mut mount = self.inner.mount.lock();
        match mount.state.phase() {
            RevealPhase::Revealed(_) => {
                self.inner.set_state(&mut mount, RevealState::Hidden);
                info!("Secret hidden for wallet {}", mount.record.id);
                RevealPhase::Hidden
            }
            phase => {
                debug!("Ignoring reset for wallet {} in phase {:?}", mount.record.id, phase);
                phase
            }
        }
    }

    /// Remount for a different wallet: cancels any pending load, releases
    /// any held secret and returns to `Hidden`. Call [`Self::start`] to load.
    pub fn set_wallet(&self, record: WalletRecord) -> RevealPhase {
        let mut mount = self.inner.mount.lock();
        mount.cancel.cancel();
        mount.cancel = CancelToken::new();
        mount.generation = mount.generation.wrapping_add(1);
        mount.torn_down = false;
        info!("Reveal flow remounted: wallet {} -> {}", mount.record.id, record.id);
        mount.record = record;
        self.inner.set_state(&mut mount, RevealState::Hidden);
        RevealPhase::Hidden
    }

    /// Unmount: cancel the startup timer and any in-flight load, release any
    /// held secret and return to `Hidden`. Later calls to `start`/`retry`
    /// are ignored.
    pub fn teardown(&self) {
        let mut mount = self.inner.mount.lock();
        if mount.torn_down {
            return;
        }
        mount.torn_down = true;
        mount.generation = mount.generation.wrapping_add(1);
        mount.cancel.cancel();
        self.inner.set_state(&mut mount, RevealState::Hidden);
        debug!("Reveal flow torn down for wallet {}", mount.record.id);
    }

    /// Whether [`Self::teardown`] has run for the current mount
    pub fn is_torn_down(&self) -> bool {
        self.inner.mount.lock().torn_down
    }

    /// Wait until the flow is not loading and return that phase
    pub async fn settled(&self) -> RevealPhase {
        let mut subscription = self.subscribe();
        match subscription.wait_for(|phase| !phase.is_loading()).await {
            Some(phase) => phase,
            None => self.phase(),
        }
    }

    fn begin_load(&self, trigger: Trigger) -> RevealPhase {
        let mut mount = self.inner.mount.lock();
        let phase = mount.state.phase();
        if mount.torn_down || phase != trigger.source_phase() {
            debug!(
                "Ignoring {} for wallet {} in phase {:?}",
                trigger, mount.record.id, phase
            );
            return phase;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(
                    "Cannot load secret for wallet {} outside a Tokio runtime: {}",
                    mount.record.id, e
                );
                return phase;
            }
        };

        let delay = match trigger {
            Trigger::Start => self.inner.config.startup_delay(),
            Trigger::Retry => Duration::ZERO,
        };
        let task = LoadTask {
            inner: Arc::downgrade(&self.inner),
            vault: Arc::clone(&self.inner.vault),
            wallet_id: mount.record.id.clone(),
            generation: mount.generation,
            cancel: mount.cancel.clone(),
            delay,
        };

        self.inner.set_state(&mut mount, RevealState::Loading);
        info!(
            "Loading secret for wallet {} ({}, delay {:?})",
            mount.record.id, trigger, delay
        );
        runtime.spawn(task.run());
        RevealPhase::Loading
    }
}

impl Drop for RevealController {
    fn drop(&mut self) {
        self.teardown();
    }
}
