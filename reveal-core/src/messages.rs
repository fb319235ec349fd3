//! User-facing copy and the view model handed to the renderer
//!
//! Failure copy is static: raw error text never reaches a view.

use crate::{RevealPhase, WalletType};

/// Caption above the revealed secret
pub const FOR_YOUR_EYES_ONLY: &str = "For your eyes only";

/// Warning under the revealed secret
pub const ANYONE_WHO_HAS_THESE: &str =
    "Anyone who has these words can access your entire wallet!";

/// Copy action label
pub const COPY_TO_CLIPBOARD: &str = "Copy to clipboard";

/// Shown when the secret cannot be revealed on this device
pub const CANNOT_REVEAL: &str = "Your account has been secured with biometric data, like \
     fingerprint or face identification. To see your recovery phrase, turn on biometrics \
     in your phone's settings.";

/// Retry prompt text for a wallet type
pub fn authenticate_prompt(wallet_type: WalletType) -> String {
    format!(
        "You need to authenticate in order to access your recovery {}",
        wallet_type.label()
    )
}

/// Retry button label for a wallet type
pub fn show_recovery_button(wallet_type: WalletType) -> String {
    format!("Show Recovery {}", wallet_type.title())
}

/// What the renderer should draw for a phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealView {
    /// Draw nothing
    Nothing,
    /// Loading indicator
    Spinner,
    /// Retry-authentication prompt with a button
    AuthenticatePrompt {
        /// Prompt text
        message: String,
        /// Button label
        button: String,
    },
    /// The secret card plus copy affordance
    Secret {
        /// Wallet type of the secret
        wallet_type: WalletType,
        /// Caption
        caption: &'static str,
        /// Warning
        warning: &'static str,
    },
    /// Static explanation, no retry
    CannotReveal {
        /// Message
        message: &'static str,
    },
}

impl RevealPhase {
    /// View model for this phase.
    ///
    /// `type_hint` labels the retry prompt before a secret has been
    /// classified; without one the prompt talks about a phrase.
    pub fn render(&self, type_hint: Option<WalletType>) -> RevealView {
        match self {
            RevealPhase::Hidden => RevealView::Nothing,
            RevealPhase::Loading => RevealView::Spinner,
            RevealPhase::BiometricGate => {
                let wallet_type = type_hint.unwrap_or(WalletType::Mnemonic);
                RevealView::AuthenticatePrompt {
                    message: authenticate_prompt(wallet_type),
                    button: show_recovery_button(wallet_type),
                }
            }
            RevealPhase::Revealed(wallet_type) => RevealView::Secret {
                wallet_type: *wallet_type,
                caption: FOR_YOUR_EYES_ONLY,
                warning: ANYONE_WHO_HAS_THESE,
            },
            RevealPhase::Unavailable => RevealView::CannotReveal {
                message: CANNOT_REVEAL,
            },
        }
    }
}
