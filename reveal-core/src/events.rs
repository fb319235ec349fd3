//! Notifications emitted by the reveal flow
//!
//! Fire-and-forget: nothing in the controller waits on a subscriber, and a
//! missing or lagging subscriber never affects state.

use crate::{RevealPhase, WalletType};
use tokio::sync::{broadcast, watch};

/// Event channel capacity
pub const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Side-channel notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// A load finished; `true` only when a secret is now revealed
    SecretLoaded(bool),
    /// A loaded secret was classified
    WalletTypeIdentified(WalletType),
}

/// Subscription to phase changes of one controller
pub struct RevealSubscription {
    rx: watch::Receiver<RevealPhase>,
}

impl RevealSubscription {
    pub(crate) fn new(rx: watch::Receiver<RevealPhase>) -> Self {
        Self { rx }
    }

    /// Current phase
    pub fn current(&self) -> RevealPhase {
        *self.rx.borrow()
    }

    /// Wait for the next phase change. `None` once the controller is gone.
    pub async fn changed(&mut self) -> Option<RevealPhase> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// Wait until the phase satisfies `predicate` (checked immediately first).
    /// `None` once the controller is gone.
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Option<RevealPhase>
    where
        F: FnMut(RevealPhase) -> bool,
    {
        self.rx
            .wait_for(|phase| predicate(*phase))
            .await
            .ok()
            .map(|phase| *phase)
    }
}

pub(crate) fn event_channel() -> broadcast::Sender<RevealEvent> {
    broadcast::channel(EVENT_CHANNEL_CAPACITY).0
}
