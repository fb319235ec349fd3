//! Wallet-type classification
//!
//! The type of a wallet is derived from the shape of its decrypted secret:
//! a canonical-length run of words is a mnemonic, anything else is treated
//! as a private key. Classification never fails so that a successfully
//! loaded secret always has something to render.

use bip39::{Language, Mnemonic};
use reveal_vault::WalletSecret;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

/// Word counts of standard mnemonics
pub const MNEMONIC_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Word lists a phrase is checked against
pub const WORD_LISTS: [Language; 8] = [
    Language::English,
    Language::SimplifiedChinese,
    Language::TraditionalChinese,
    Language::French,
    Language::Italian,
    Language::Japanese,
    Language::Korean,
    Language::Spanish,
];

/// Kind of secret backing a wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletType {
    /// Seed phrase
    Mnemonic,
    /// Raw private key
    PrivateKey,
}

impl WalletType {
    /// Lowercase label used inside sentences ("phrase" / "key")
    pub fn label(&self) -> &'static str {
        match self {
            WalletType::Mnemonic => "phrase",
            WalletType::PrivateKey => "key",
        }
    }

    /// Capitalized label used on buttons
    pub fn title(&self) -> &'static str {
        match self {
            WalletType::Mnemonic => "Phrase",
            WalletType::PrivateKey => "Key",
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletType::Mnemonic => write!(f, "Mnemonic"),
            WalletType::PrivateKey => write!(f, "PrivateKey"),
        }
    }
}

/// Classify a loaded secret
pub fn classify(secret: &WalletSecret) -> WalletType {
    classify_str(secret.expose())
}

/// Classify a plaintext secret.
///
/// Word-list membership is not required: a phrase with a misspelt word is
/// still shown as a phrase. Words may be in any script.
pub fn classify_str(secret: &str) -> WalletType {
    let mut count = 0usize;
    for word in secret.split_whitespace() {
        if !word.chars().all(is_word_char) {
            return WalletType::PrivateKey;
        }
        count += 1;
        if count > MNEMONIC_WORD_COUNTS[MNEMONIC_WORD_COUNTS.len() - 1] {
            return WalletType::PrivateKey;
        }
    }

    if MNEMONIC_WORD_COUNTS.contains(&count) {
        WalletType::Mnemonic
    } else {
        WalletType::PrivateKey
    }
}

/// Letters plus the combining marks left by NFKD decomposition of accented
/// Latin letters and voiced kana
fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '\u{300}'..='\u{36f}' | '\u{3099}'..='\u{309a}')
}

/// Whether `secret` is a 32-byte hex private key, with or without `0x`
pub fn is_private_key_hex(secret: &str) -> bool {
    let trimmed = secret.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() != 64 {
        return false;
    }
    hex::decode(digits)
        .map(Zeroizing::new)
        .map(|bytes| bytes.len() == 32)
        .unwrap_or(false)
}

/// Result of checking a phrase against the BIP-39 word lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicCheck {
    /// Known words, valid checksum
    Valid,
    /// Not a standard word count
    BadWordCount(usize),
    /// Number of words missing from the closest word list
    UnknownWords(usize),
    /// All words known but the checksum does not match
    InvalidChecksum,
}

/// Check a phrase against the BIP-39 word lists in [`WORD_LISTS`].
///
/// Diagnostic only; it never changes the classification.
pub fn inspect_mnemonic(secret: &str) -> MnemonicCheck {
    let words: Zeroizing<Vec<String>> =
        Zeroizing::new(secret.split_whitespace().map(str::to_lowercase).collect());

    if !MNEMONIC_WORD_COUNTS.contains(&words.len()) {
        return MnemonicCheck::BadWordCount(words.len());
    }

    let missing_from = |language: Language| {
        words
            .iter()
            .filter(|w| language.find_word(w).is_none())
            .count()
    };
    let candidates: Vec<Language> = WORD_LISTS
        .into_iter()
        .filter(|language| missing_from(*language) == 0)
        .collect();
    if candidates.is_empty() {
        let closest = WORD_LISTS
            .into_iter()
            .map(missing_from)
            .min()
            .unwrap_or(words.len());
        return MnemonicCheck::UnknownWords(closest);
    }

    // Chinese lists share characters, so every matching list is tried
    let phrase = Zeroizing::new(words.join(" "));
    if candidates
        .into_iter()
        .any(|language| Mnemonic::parse_in_normalized(language, &phrase).is_ok())
    {
        MnemonicCheck::Valid
    } else {
        MnemonicCheck::InvalidChecksum
    }
}
