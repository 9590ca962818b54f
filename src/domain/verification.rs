//! Verification reporting domain types.
//!
//! Aggregates what the verification parser extracts from a signed document:
//! signature dictionary metadata and embedded certificate details. The
//! report is a plain serializable record for display or logging; it does
//! not attest cryptographic validity (see `is_valid` below).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::pdf::ByteRange;

/// Certificate details extracted from the embedded CMS structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateInfo {
    /// Issuer distinguished name as key/value pairs (e.g. `CN`, `O`).
    pub issuer: BTreeMap<String, String>,
    /// Subject distinguished name as key/value pairs.
    pub subject: BTreeMap<String, String>,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub serial_number: Option<String>,
}

/// Result of inspecting a signed document.
///
/// Produced fresh per verification call and never mutated afterward.
/// `is_valid` reports structural parseability only: the engine does not
/// recompute the digest over the declared byte range, so a report with
/// `is_valid == true` still requires cryptographic validation by the
/// caller if tamper evidence matters.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureReport {
    pub signature_exists: bool,
    pub is_valid: bool,
    pub signer_name: String,
    pub reason: String,
    pub location: Option<String>,
    pub contact_info: Option<String>,
    pub signing_time: DateTime<Utc>,
    pub sub_filter: Option<String>,
    pub digest_algorithm: Option<String>,
    #[serde(serialize_with = "serialize_byte_range")]
    pub byte_range: Option<ByteRange>,
    pub certificate: Option<CertificateInfo>,
}

fn serialize_byte_range<S>(range: &Option<ByteRange>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match range {
        Some(r) => serializer.serialize_some(&r.0),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn report_serializes_to_json() {
        let report = SignatureReport {
            signature_exists: true,
            is_valid: true,
            signer_name: "Test Signer".into(),
            reason: "Testing signature".into(),
            location: Some("Test Location".into()),
            contact_info: None,
            signing_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            sub_filter: Some("/adbe.pkcs7.detached".into()),
            digest_algorithm: Some("SHA-256".into()),
            byte_range: Some(ByteRange([0, 100, 200, 50])),
            certificate: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["signer_name"], "Test Signer");
        assert_eq!(json["byte_range"][2], 200);
    }
}
