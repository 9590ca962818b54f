//! Embedded CMS structure parser.
//!
//! Decodes the `/Contents` value of a signature dictionary far enough to
//! report on it: the digest algorithm named in `SignedData` and the first
//! embedded certificate. Trailing placeholder padding is stripped and the
//! DER start is located defensively, since the reserved region is almost
//! always larger than the structure inside it.

use openssl::x509::X509;

use crate::domain::cms::der::DerReader;
use crate::domain::constants;
use crate::infra::error::{SignError, SignResult};

/// What the verification report needs from the embedded structure.
#[derive(Debug)]
pub struct ParsedCms {
    pub digest_algorithm: Option<String>,
    pub certificate: Option<X509>,
}

pub struct CmsParserService;

impl Default for CmsParserService {
    fn default() -> Self {
        Self::new()
    }
}

impl CmsParserService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse the raw `/Contents` bytes (zero padding included).
    ///
    /// # Errors
    /// `Asn1Parse` when no SEQUENCE tag is present or the structure is not
    /// a well-formed `SignedData`.
    pub fn parse(&self, contents: &[u8]) -> SignResult<ParsedCms> {
        // Locate the structure start instead of trimming from the end: the
        // declared DER length bounds the structure, and a signature whose
        // last byte happens to be zero must not lose it to padding removal.
        let start = contents
            .iter()
            .position(|&b| b == constants::ASN1_SEQUENCE_TAG)
            .ok_or_else(|| {
                SignError::Asn1Parse(
                    "Signature contents carry no ASN.1 SEQUENCE tag".to_string(),
                )
            })?;
        let der = &contents[start..];

        // ContentInfo ::= SEQUENCE { contentType OID, [0] EXPLICIT content }
        let mut reader = DerReader::new(der);
        let content_info = reader.expect(constants::ASN1_SEQUENCE_TAG)?;

        let mut ci_reader = DerReader::new(content_info.content);
        let content_type = ci_reader.expect(constants::ASN1_OID_TAG)?;
        if content_type.content != constants::PKCS7_SIGNED_DATA_OID {
            return Err(SignError::Asn1Parse(
                "Embedded structure is not a signedData ContentInfo".to_string(),
            ));
        }
        let explicit = ci_reader.expect(constants::ASN1_CONTEXT_0_EXPLICIT_TAG)?;

        // SignedData ::= SEQUENCE { version, digestAlgorithms, encapContentInfo,
        //                           certificates [0] IMPLICIT OPTIONAL, ... }
        let mut sd_outer = DerReader::new(explicit.content);
        let signed_data = sd_outer.expect(constants::ASN1_SEQUENCE_TAG)?;
        let mut sd_reader = DerReader::new(signed_data.content);

        sd_reader.expect(constants::ASN1_INTEGER_TAG)?; // version

        let digest_algorithms = sd_reader.expect(constants::ASN1_SET_TAG)?;
        let digest_algorithm = parse_first_digest_algorithm(digest_algorithms.content);

        sd_reader.expect(constants::ASN1_SEQUENCE_TAG)?; // encapContentInfo

        let mut certificate = None;
        if !sd_reader.is_empty()
            && sd_reader.peek_tag()? == constants::ASN1_CONTEXT_0_IMPLICIT_TAG
        {
            let certs = sd_reader.read_element()?;
            let mut cert_reader = DerReader::new(certs.content);
            if !cert_reader.is_empty() {
                let cert_der = cert_reader.read_raw()?;
                certificate = Some(X509::from_der(cert_der).map_err(|e| {
                    SignError::Asn1Parse(format!("Embedded certificate rejected: {e}"))
                })?);
            }
        }

        Ok(ParsedCms {
            digest_algorithm,
            certificate,
        })
    }
}

fn parse_first_digest_algorithm(set_content: &[u8]) -> Option<String> {
    let mut reader = DerReader::new(set_content);
    let alg_seq = reader.expect(constants::ASN1_SEQUENCE_TAG).ok()?;
    let mut alg_reader = DerReader::new(alg_seq.content);
    let oid = alg_reader.expect(constants::ASN1_OID_TAG).ok()?;
    Some(digest_oid_name(oid.content))
}

fn digest_oid_name(oid: &[u8]) -> String {
    if oid == constants::SHA256_ALGORITHM_OID {
        "SHA-256".to_string()
    } else if oid == constants::SHA1_ALGORITHM_OID {
        "SHA-1".to_string()
    } else {
        format!("OID:{}", hex::encode(oid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_all_zero_padding() {
        let err = CmsParserService::new().parse(&[0x00; 64]).unwrap_err();
        assert!(matches!(err, SignError::Asn1Parse(_)));
    }

    #[test]
    fn rejects_contents_without_sequence_tag() {
        let err = CmsParserService::new().parse(&[0x00, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, SignError::Asn1Parse(_)));
    }

    #[test]
    fn tolerates_trailing_padding_after_structure() {
        use crate::domain::cms::der::wrap;
        // signedData ContentInfo with an empty [0] body, followed by padding
        let mut body = Vec::new();
        body.push(0x06);
        body.push(constants::PKCS7_SIGNED_DATA_OID.len() as u8);
        body.extend_from_slice(constants::PKCS7_SIGNED_DATA_OID);
        let inner = wrap(0x30, &[0x02, 0x01, 0x01, 0x31, 0x00, 0x30, 0x00]);
        body.extend_from_slice(&wrap(0xa0, &inner));
        let mut padded = wrap(0x30, &body);
        padded.extend_from_slice(&[0u8; 32]);

        let parsed = CmsParserService::new().parse(&padded).unwrap();
        assert!(parsed.certificate.is_none());
        assert!(parsed.digest_algorithm.is_none());
    }

    #[test]
    fn rejects_non_signed_data_content_info() {
        // ContentInfo naming id-data instead of signedData
        use crate::domain::cms::der::wrap;
        let mut body = Vec::new();
        body.push(0x06);
        body.push(constants::PKCS7_DATA_OID.len() as u8);
        body.extend_from_slice(constants::PKCS7_DATA_OID);
        let bogus = wrap(0x30, &body);
        let err = CmsParserService::new().parse(&bogus).unwrap_err();
        assert!(matches!(err, SignError::Asn1Parse(_)));
    }

    #[test]
    fn digest_oid_names() {
        assert_eq!(digest_oid_name(constants::SHA256_ALGORITHM_OID), "SHA-256");
        assert_eq!(digest_oid_name(constants::SHA1_ALGORITHM_OID), "SHA-1");
        assert!(digest_oid_name(&[0x2a, 0x03]).starts_with("OID:"));
    }
}
