//! Type-safe wrappers using the new-type pattern.
//!
//! This module provides validated wrappers for the various inputs to the
//! signing engine to prevent common errors and improve API safety.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use zeroize::Zeroize;

use crate::domain::constants;
use crate::infra::error::{SignError, SignResult};

/// Passphrase protecting a PKCS#12 container.
///
/// An empty passphrase is valid and means "no passphrase". The inner
/// string is wiped on drop and never printed.
#[derive(Clone, Default)]
pub struct Passphrase(String);

impl Passphrase {
    #[must_use]
    pub fn new(passphrase: impl Into<String>) -> Self {
        Passphrase(passphrase.into())
    }

    /// Get the passphrase for handing to the container decryptor.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for Passphrase {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

// Don't expose the passphrase through Debug/Display to avoid accidental logging
impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Passphrase([REDACTED])")
    }
}

impl fmt::Display for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[PASSPHRASE REDACTED]")
    }
}

/// Trigger payload scanned from a QR code, of the form `autopen:<hash>`.
///
/// The engine only requires the part after the first colon to be non-empty;
/// the full payload string is handed verbatim to the credential's sign
/// operation as the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerPayload(String);

impl TriggerPayload {
    pub fn new(payload: impl AsRef<str>) -> SignResult<Self> {
        let payload = payload.as_ref();
        let Some((scheme, rest)) = payload.split_once(':') else {
            return Err(SignError::Validation(format!(
                "Trigger payload missing ':' separator: {payload}"
            )));
        };
        if scheme != constants::TRIGGER_SCHEME {
            return Err(SignError::Validation(format!(
                "Trigger payload must use the '{}' scheme, got: {scheme}",
                constants::TRIGGER_SCHEME
            )));
        }
        if rest.is_empty() {
            return Err(SignError::Validation(
                "Trigger payload hash part is empty".to_string(),
            ));
        }
        Ok(TriggerPayload(payload.to_string()))
    }

    /// The full payload string, passed unchanged to `CredentialSigner::sign`.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }

    /// The opaque hash part after the scheme prefix.
    #[must_use]
    pub fn hash_part(&self) -> &str {
        self.0.split_once(':').map(|(_, rest)| rest).unwrap_or("")
    }
}

impl FromStr for TriggerPayload {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for TriggerPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// PDF date string in the `D:YYYYMMDDHHmmSS` form used by signature
/// dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfDate(DateTime<Utc>);

impl PdfDate {
    #[must_use]
    pub fn new(time: DateTime<Utc>) -> Self {
        PdfDate(time)
    }

    /// Render the date for a signature dictionary entry.
    #[must_use]
    pub fn to_pdf_string(&self) -> String {
        self.0.format("D:%Y%m%d%H%M%SZ").to_string()
    }

    /// Parse a `D:YYYYMMDDHHmmSS` string, ignoring any timezone suffix.
    pub fn parse(value: &str) -> SignResult<Self> {
        let digits = value.strip_prefix("D:").unwrap_or(value);
        if digits.len() < 14 || !digits[..14].bytes().all(|b| b.is_ascii_digit()) {
            return Err(SignError::Validation(format!(
                "Invalid PDF date string: {value}"
            )));
        }
        let naive = NaiveDateTime::parse_from_str(&digits[..14], "%Y%m%d%H%M%S")
            .map_err(|e| SignError::Validation(format!("Invalid PDF date {value}: {e}")))?;
        Ok(PdfDate(naive.and_utc()))
    }

    #[must_use]
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for PdfDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_pdf_string())
    }
}
