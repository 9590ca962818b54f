//! Authenticated attribute builder service.
//!
//! Constructs the three signed attributes of a detached CMS signature
//! (content-type, signing-time, message-digest) in canonical SET order,
//! and produces both encodings the assembly needs: the `SET OF` form that
//! is hashed and signed, and the `[0] IMPLICIT` form embedded inside
//! `SignerInfo`. The two must carry identical content; a parity check
//! guards against divergence.

use chrono::{DateTime, Utc};

use crate::domain::cms::der::{encode_len, wrap};
use crate::domain::cms::{SignedAttributeLogical, SignedAttributesCanonical};
use crate::domain::constants;
use crate::infra::error::{SignError, SignResult};

/// Output of the attribute build process.
pub struct AttributeBuildOutput {
    /// Canonical SET OF authenticated attributes (to be signed) DER.
    pub set_der: Vec<u8>,
    /// The `[0] IMPLICIT` wrapper used inside `SignerInfo`.
    pub embedding_der: Vec<u8>,
    /// Individual attribute DER blobs in canonical order.
    pub raw_attributes: Vec<SignedAttributeLogical>,
}

pub struct AttributeBuilderService;

impl Default for AttributeBuilderService {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeBuilderService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the authenticated attributes over a content digest.
    pub fn build(
        &self,
        content_digest: &[u8],
        signing_time: DateTime<Utc>,
    ) -> SignResult<AttributeBuildOutput> {
        let attrs = vec![
            SignedAttributeLogical {
                oid: "1.2.840.113549.1.9.3".to_string(),
                der: encode_attribute(
                    constants::PKCS9_CONTENT_TYPE_OID,
                    &wrap(constants::ASN1_OID_TAG, constants::PKCS7_DATA_OID),
                ),
            },
            SignedAttributeLogical {
                oid: "1.2.840.113549.1.9.5".to_string(),
                der: encode_attribute(
                    constants::PKCS9_SIGNING_TIME_OID,
                    &encode_utc_time(signing_time),
                ),
            },
            SignedAttributeLogical {
                oid: "1.2.840.113549.1.9.4".to_string(),
                der: encode_attribute(
                    constants::PKCS9_MESSAGE_DIGEST_OID,
                    &wrap(constants::ASN1_OCTET_STRING_TAG, content_digest),
                ),
            },
        ];

        let canonical = SignedAttributesCanonical::new(attrs);
        let content = canonical.concatenated_der();

        let set_der = wrap(constants::ASN1_SET_TAG, content);
        let embedding_der = wrap(constants::ASN1_CONTEXT_0_IMPLICIT_TAG, content);

        // SET and [0] IMPLICIT must differ only in the leading tag byte.
        if set_der[1..] != embedding_der[1..] {
            return Err(SignError::Cryptographic(
                "SET DER and [0] IMPLICIT DER content mismatch".to_string(),
            ));
        }

        Ok(AttributeBuildOutput {
            set_der,
            embedding_der,
            raw_attributes: canonical.ordered().to_vec(),
        })
    }
}

/// Encode one Attribute: `SEQUENCE { attrType OID, attrValues SET { value } }`.
fn encode_attribute(oid: &[u8], value_der: &[u8]) -> Vec<u8> {
    let mut content = Vec::new();
    content.push(constants::ASN1_OID_TAG);
    content.extend_from_slice(&encode_len(oid.len()));
    content.extend_from_slice(oid);
    content.extend_from_slice(&wrap(constants::ASN1_SET_TAG, value_der));
    wrap(constants::ASN1_SEQUENCE_TAG, &content)
}

/// Encode a UTCTime value (`YYMMDDHHMMSSZ`).
fn encode_utc_time(time: DateTime<Utc>) -> Vec<u8> {
    let time_str = time.format("%y%m%d%H%M%SZ").to_string();
    wrap(constants::ASN1_UTC_TIME_TAG, time_str.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn build_output() -> AttributeBuildOutput {
        let digest = [0x11u8; 32];
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        AttributeBuilderService::new().build(&digest, time).unwrap()
    }

    #[test]
    fn builds_three_attributes() {
        let out = build_output();
        assert_eq!(out.raw_attributes.len(), 3);
        assert!(out.set_der.starts_with(&[0x31]));
        assert!(out.embedding_der.starts_with(&[0xa0]));
    }

    #[test]
    fn set_and_embedding_share_content() {
        let out = build_output();
        assert_eq!(out.set_der[1..], out.embedding_der[1..]);
    }

    #[test]
    fn utc_time_is_thirteen_chars() {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let encoded = encode_utc_time(time);
        assert_eq!(encoded[0], 0x17);
        assert_eq!(encoded[1], 13);
        assert_eq!(&encoded[2..], b"240101000000Z");
    }

    #[test]
    fn message_digest_attribute_carries_digest() {
        let out = build_output();
        let digest_attr = out
            .raw_attributes
            .iter()
            .find(|a| a.oid == "1.2.840.113549.1.9.4")
            .expect("messageDigest attribute present");
        let needle = [0x11u8; 32];
        assert!(digest_attr
            .der
            .windows(needle.len())
            .any(|w| w == needle));
    }

    #[test]
    fn attribute_order_is_canonical() {
        let out = build_output();
        let ders: Vec<&[u8]> = out.raw_attributes.iter().map(|a| a.der.as_slice()).collect();
        let mut sorted = ders.clone();
        sorted.sort();
        assert_eq!(ders, sorted);
    }
}
