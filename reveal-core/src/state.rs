//! Reveal flow state

use crate::WalletType;
use reveal_vault::{WalletId, WalletSecret};

/// State of the reveal flow for one wallet.
///
/// Only [`RevealState::Revealed`] holds a secret. Replacing the state drops
/// (and zeroizes) the previous secret.
#[derive(Debug)]
pub enum RevealState {
    /// Nothing shown
    Hidden,
    /// Waiting for the startup delay or the vault
    Loading,
    /// Authentication was denied or failed unexpectedly; user may retry
    BiometricGate,
    /// Secret loaded and classified
    Revealed {
        /// The plaintext secret
        secret: WalletSecret,
        /// Classification of `secret`
        wallet_type: WalletType,
    },
    /// Secret cannot be shown on this device for this mount
    Unavailable,
}

impl RevealState {
    /// Secret-free projection of this state
    pub fn phase(&self) -> RevealPhase {
        match self {
            RevealState::Hidden => RevealPhase::Hidden,
            RevealState::Loading => RevealPhase::Loading,
            RevealState::BiometricGate => RevealPhase::BiometricGate,
            RevealState::Revealed { wallet_type, .. } => RevealPhase::Revealed(*wallet_type),
            RevealState::Unavailable => RevealPhase::Unavailable,
        }
    }

    /// Held secret, if revealed
    pub fn secret(&self) -> Option<&WalletSecret> {
        match self {
            RevealState::Revealed { secret, .. } => Some(secret),
            _ => None,
        }
    }
}

/// Copyable view of [`RevealState`] without the secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    /// Nothing shown
    Hidden,
    /// Loading indicator
    Loading,
    /// Retry-authentication prompt
    BiometricGate,
    /// Secret visible
    Revealed(WalletType),
    /// Static cannot-reveal message
    Unavailable,
}

impl RevealPhase {
    /// Whether a load is in flight (or scheduled)
    pub fn is_loading(&self) -> bool {
        matches!(self, RevealPhase::Loading)
    }

    /// Whether the controller holds a secret in this phase
    pub fn holds_secret(&self) -> bool {
        matches!(self, RevealPhase::Revealed(_))
    }

    /// No transition leaves this phase for the current mount
    pub fn is_terminal(&self) -> bool {
        matches!(self, RevealPhase::Unavailable)
    }
}

/// The wallet a reveal flow is mounted for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletRecord {
    /// Wallet id passed to the vault
    pub id: WalletId,
    /// Type stored with the wallet, used for labels before the first load
    pub wallet_type: Option<WalletType>,
}

impl WalletRecord {
    /// Create record without a stored type
    pub fn new(id: impl Into<WalletId>) -> Self {
        Self {
            id: id.into(),
            wallet_type: None,
        }
    }

    /// Set the stored wallet type
    pub fn with_type(mut self, wallet_type: WalletType) -> Self {
        self.wallet_type = Some(wallet_type);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_projection() {
        let revealed = RevealState::Revealed {
            secret: WalletSecret::new("0xabc"),
            wallet_type: WalletType::PrivateKey,
        };
        assert_eq!(revealed.phase(), RevealPhase::Revealed(WalletType::PrivateKey));
        assert!(revealed.phase().holds_secret());
        assert!(revealed.secret().is_some());

        for state in [
            RevealState::Hidden,
            RevealState::Loading,
            RevealState::BiometricGate,
            RevealState::Unavailable,
        ] {
            assert!(state.secret().is_none());
            assert!(!state.phase().holds_secret());
        }
    }

    #[test]
    fn test_revealed_debug_is_redacted() {
        let revealed = RevealState::Revealed {
            secret: WalletSecret::new("hunter2 words"),
            wallet_type: WalletType::PrivateKey,
        };
        assert!(!format!("{:?}", revealed).contains("hunter2"));
    }

    #[test]
    fn test_terminal_phase() {
        assert!(RevealPhase::Unavailable.is_terminal());
        assert!(!RevealPhase::BiometricGate.is_terminal());
        assert!(RevealPhase::Loading.is_loading());
    }

    #[test]
    fn test_wallet_record() {
        let record = WalletRecord::new("w1").with_type(WalletType::Mnemonic);
        assert_eq!(record.id.as_str(), "w1");
        assert_eq!(record.wallet_type, Some(WalletType::Mnemonic));
    }
}
