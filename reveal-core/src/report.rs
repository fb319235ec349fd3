//! Failure reporting to telemetry collaborators

use reveal_vault::{VaultError, WalletId};

/// Receives every vault failure seen by a controller, with its full cause
/// chain. Nothing reported here is ever shown to the user.
pub trait FailureReporter: Send + Sync {
    /// Record a failed load
    fn capture(&self, wallet_id: &WalletId, error: &VaultError);
}

/// Reporter that writes failures to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn capture(&self, wallet_id: &WalletId, error: &VaultError) {
        tracing::warn!(
            wallet_id = %wallet_id,
            kind = %error.kind(),
            causes = ?error.cause_chain(),
            "Error while trying to reveal secret"
        );
    }
}
