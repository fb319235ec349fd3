//! Platform secure storage abstraction
//!
//! Unified interface to platform-specific secret storage:
//! - Android: Keystore-backed encrypted preferences
//! - iOS/macOS: Keychain with access control flags
//! - Desktop: OS credential store
//!
//! Implementations are provided by the host application over FFI. Calls are
//! blocking and may raise an authentication prompt.

use crate::{StoreError, VaultError};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Supported platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android
    Android,
    /// iOS
    Ios,
    /// macOS
    MacOs,
    /// Windows
    Windows,
    /// Linux
    Linux,
    /// Unknown platform
    Unknown,
}

impl Platform {
    /// Detect current platform at runtime
    pub fn current() -> Self {
        #[cfg(target_os = "android")]
        return Platform::Android;

        #[cfg(target_os = "ios")]
        return Platform::Ios;

        #[cfg(target_os = "macos")]
        return Platform::MacOs;

        #[cfg(target_os = "windows")]
        return Platform::Windows;

        #[cfg(target_os = "linux")]
        return Platform::Linux;

        #[cfg(not(any(
            target_os = "android",
            target_os = "ios",
            target_os = "macos",
            target_os = "windows",
            target_os = "linux"
        )))]
        return Platform::Unknown;
    }

    /// Parse a platform name (case-insensitive)
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "android" => Platform::Android,
            "ios" => Platform::Ios,
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            _ => Platform::Unknown,
        }
    }
}

/// Device capabilities relevant to unlocking stored secrets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCapabilities {
    /// Platform name
    pub platform: Platform,
    /// Biometrics enrolled and usable
    pub has_biometrics: bool,
    /// Device passcode / PIN set
    pub has_passcode: bool,
}

impl Default for StoreCapabilities {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
            has_biometrics: false,
            has_passcode: false,
        }
    }
}

/// Access control attached to a stored entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPolicy {
    /// Readable without a prompt (legacy records only)
    Unprotected,
    /// Biometrics, falling back to the device passcode
    BiometryOrPasscode,
    /// Biometrics with no passcode fallback
    BiometryOnly,
}

impl AccessPolicy {
    /// Whether reading an entry with this policy raises a prompt
    pub fn requires_prompt(&self) -> bool {
        !matches!(self, AccessPolicy::Unprotected)
    }

    /// Whether a device with `caps` can ever satisfy this policy
    pub fn is_satisfiable(&self, caps: &StoreCapabilities) -> bool {
        match self {
            AccessPolicy::Unprotected => true,
            AccessPolicy::BiometryOrPasscode => caps.has_biometrics || caps.has_passcode,
            AccessPolicy::BiometryOnly => caps.has_biometrics,
        }
    }

    /// Strongest policy at or below `self` that `caps` can satisfy.
    ///
    /// Used when writing, so a migrated record never becomes unreadable.
    pub fn effective_for(&self, caps: &StoreCapabilities) -> AccessPolicy {
        match self {
            AccessPolicy::BiometryOnly if !caps.has_biometrics => {
                AccessPolicy::BiometryOrPasscode
            }
            policy => *policy,
        }
    }
}

/// Text shown in the OS authentication prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPrompt {
    reason: String,
}

impl AuthPrompt {
    /// Create a prompt with the given reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Prompt reason
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Store result for operations that may require user interaction
#[derive(Debug)]
pub enum StoreResult<T> {
    /// Success
    Success(T),
    /// User cancelled authentication
    Cancelled,
    /// Authentication failed (wrong biometric, etc.)
    AuthFailed,
    /// The entry's access policy cannot be satisfied on this device
    NotAvailable,
    /// Error occurred
    Error(StoreError),
}

impl<T> StoreResult<T> {
    /// Short label for logging
    pub fn outcome_label(&self) -> &'static str {
        match self {
            StoreResult::Success(_) => "success",
            StoreResult::Cancelled => "cancelled",
            StoreResult::AuthFailed => "auth_failed",
            StoreResult::NotAvailable => "not_available",
            StoreResult::Error(_) => "error",
        }
    }

    /// Check for success
    pub fn is_success(&self) -> bool {
        matches!(self, StoreResult::Success(_))
    }

    /// Map platform outcomes onto the vault taxonomy
    pub fn into_vault(self) -> Result<T, VaultError> {
        match self {
            StoreResult::Success(value) => Ok(value),
            StoreResult::Cancelled | StoreResult::AuthFailed => {
                Err(VaultError::AuthenticationDenied)
            }
            StoreResult::NotAvailable => Err(VaultError::AuthenticationUnavailable(
                "stored access policy cannot be satisfied on this device".to_string(),
            )),
            StoreResult::Error(e) => Err(VaultError::unknown(e)),
        }
    }
}

impl<T> From<Result<T, StoreError>> for StoreResult<T> {
    fn from(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(v) => StoreResult::Success(v),
            Err(e) => StoreResult::Error(e),
        }
    }
}

/// Platform secure storage
///
/// FFI implementations bridge to native code. Every method is blocking;
/// async callers must move calls off the runtime threads.
pub trait SecureStore: Send + Sync {
    /// Get platform capabilities
    fn capabilities(&self) -> StoreCapabilities;

    /// Read an entry, prompting for authentication if its policy requires
    /// it. Returns `Success(None)` when no entry exists under `key`.
    fn read(&self, key: &str, prompt: &AuthPrompt) -> StoreResult<Option<Zeroizing<Vec<u8>>>>;

    /// Write (or overwrite) an entry with the given access policy
    fn write(&self, key: &str, value: &[u8], policy: AccessPolicy) -> StoreResult<()>;

    /// Delete an entry. Deleting a missing entry succeeds.
    fn delete(&self, key: &str) -> StoreResult<()>;
}
