//! Error types
//!
//! Failure taxonomy for secret loading. Every variant is classified as
//! recoverable (the user may authenticate again) or terminal for the
//! current session.

use std::fmt;

/// Boxed underlying cause carried by [`VaultError::Unknown`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type
pub type Result<T> = std::result::Result<T, VaultError>;

/// Vault errors
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// User cancelled or failed the authentication prompt
    #[error("Authentication denied")]
    AuthenticationDenied,

    /// The access policy the secret was stored with cannot be satisfied on
    /// this device (e.g. biometric-only entry with no biometrics enrolled)
    #[error("Authentication unavailable: {0}")]
    AuthenticationUnavailable(String),

    /// No secret is stored for the wallet
    #[error("Secret not found for wallet {0}")]
    SecretNotFound(String),

    /// Stored record could not be decoded
    #[error("Storage corrupt: {0}")]
    StorageCorrupt(String),

    /// Anything else, with the underlying cause for diagnostics
    #[error("Unknown vault error")]
    Unknown(#[source] BoxError),
}

impl VaultError {
    /// Wrap an arbitrary cause as [`VaultError::Unknown`]
    pub fn unknown<E>(cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        VaultError::Unknown(cause.into())
    }

    /// Get the error kind
    pub fn kind(&self) -> VaultErrorKind {
        match self {
            VaultError::AuthenticationDenied => VaultErrorKind::AuthenticationDenied,
            VaultError::AuthenticationUnavailable(_) => VaultErrorKind::AuthenticationUnavailable,
            VaultError::SecretNotFound(_) => VaultErrorKind::SecretNotFound,
            VaultError::StorageCorrupt(_) => VaultErrorKind::StorageCorrupt,
            VaultError::Unknown(_) => VaultErrorKind::Unknown,
        }
    }

    /// Whether the user may retry authentication after this error
    pub fn is_recoverable(&self) -> bool {
        self.kind().is_recoverable()
    }

    /// Get user-friendly error message
    ///
    /// Never contains cause text; only one of two static messages.
    pub fn user_message(&self) -> &'static str {
        if self.is_recoverable() {
            "Authentication is required to reveal this secret. Please try again."
        } else {
            "This secret cannot be revealed on this device. Please check your device settings."
        }
    }

    /// Collect the display text of every error in the source chain,
    /// starting with this one. Used for diagnostics only.
    pub fn cause_chain(&self) -> Vec<String> {
        let mut chain = vec![self.to_string()];
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            chain.push(err.to_string());
            source = err.source();
        }
        chain
    }
}

/// Error kinds for classification and telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VaultErrorKind {
    /// User cancelled or failed authentication
    AuthenticationDenied,
    /// Device cannot satisfy the stored access policy
    AuthenticationUnavailable,
    /// Secret missing
    SecretNotFound,
    /// Secret undecodable
    StorageCorrupt,
    /// Unclassified failure
    Unknown,
}

impl VaultErrorKind {
    /// Denied and unknown failures share the retry path; the rest are
    /// terminal for the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VaultErrorKind::AuthenticationDenied | VaultErrorKind::Unknown
        )
    }
}

impl fmt::Display for VaultErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultErrorKind::AuthenticationDenied => write!(f, "AuthenticationDenied"),
            VaultErrorKind::AuthenticationUnavailable => write!(f, "AuthenticationUnavailable"),
            VaultErrorKind::SecretNotFound => write!(f, "SecretNotFound"),
            VaultErrorKind::StorageCorrupt => write!(f, "StorageCorrupt"),
            VaultErrorKind::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Errors raised by a [`crate::SecureStore`] implementation
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Native platform call failed
    #[error("Platform error {code}: {message}")]
    Platform {
        /// Platform status code (OSStatus, keystore error code, ...)
        code: i32,
        /// Platform message
        message: String,
    },

    /// I/O failure in the backing store
    #[error("Storage I/O error: {0}")]
    Io(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_grouping() {
        assert!(VaultError::AuthenticationDenied.is_recoverable());
        assert!(VaultError::unknown(StoreError::Other("boom".into())).is_recoverable());
        assert!(!VaultError::AuthenticationUnavailable("no sensor".into()).is_recoverable());
        assert!(!VaultError::SecretNotFound("w1".into()).is_recoverable());
        assert!(!VaultError::StorageCorrupt("bad json".into()).is_recoverable());
    }

    #[test]
    fn test_unknown_keeps_cause() {
        let err = VaultError::unknown(StoreError::Platform {
            code: -25300,
            message: "item not accessible".into(),
        });
        let chain = err.cause_chain();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0], "Unknown vault error");
        assert!(chain[1].contains("-25300"));
        assert_eq!(chain.iter().filter(|c| c.contains("-25300")).count(), 1);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_user_messages_are_static() {
        let denied = VaultError::AuthenticationDenied.user_message();
        let corrupt = VaultError::StorageCorrupt("line 1 column 3".into()).user_message();
        assert!(denied.contains("try again"));
        assert!(corrupt.contains("cannot be revealed"));
        assert!(!corrupt.contains("column"));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(VaultErrorKind::SecretNotFound.to_string(), "SecretNotFound");
        assert_eq!(
            VaultError::AuthenticationDenied.kind().to_string(),
            "AuthenticationDenied"
        );
    }
}
