//! Detached CMS/PKCS#7 `SignedData` builder.
//!
//! Assembles the DER structure embedded into a PDF signature: signer
//! certificate, one `SignerInfo` referencing the certificate's
//! issuer/serial, and the authenticated attribute set. Per the detached
//! convention the signature covers the attribute set, not the raw content,
//! and the structure carries no copy of the content bytes.

use openssl::hash::MessageDigest;
use openssl::sign::Signer;
use sha2::{Digest, Sha256};

use crate::domain::cms::der::{encode_len, wrap};
use crate::domain::cms::{CmsDigestAlgorithms, CmsEncapContentInfo, CmsSignedData, CmsSignerInfos};
use crate::domain::constants;
use crate::domain::credential::CertificateCredential;
use crate::infra::error::{SignError, SignResult};
use crate::services::attr_builder::AttributeBuilderService;

pub struct CmsBuilderService;

impl Default for CmsBuilderService {
    fn default() -> Self {
        Self::new()
    }
}

impl CmsBuilderService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build a detached `SignedData` over `content`.
    ///
    /// # Errors
    /// - `InvalidContentType` for degenerate (empty) content
    /// - `SignerNotInitialized` if the credential cannot produce its
    ///   certificate DER
    /// - `Cryptographic` / `Certificate` for OpenSSL failures
    pub fn build_signed_data(
        &self,
        content: &[u8],
        credential: &CertificateCredential,
        signing_time: chrono::DateTime<chrono::Utc>,
    ) -> SignResult<CmsSignedData> {
        if content.is_empty() {
            return Err(SignError::InvalidContentType(
                "Content must be a non-empty byte sequence".to_string(),
            ));
        }

        let cert_der = credential.certificate_der().map_err(|e| {
            SignError::SignerNotInitialized(format!("Credential has no usable certificate: {e}"))
        })?;

        // Digest of the detached content, carried in the messageDigest attribute.
        let content_digest = Sha256::digest(content);

        let attrs = AttributeBuilderService::new().build(&content_digest, signing_time)?;

        // The signature covers the canonical SET encoding of the attributes.
        let mut signer = Signer::new(MessageDigest::sha256(), credential.private_key())
            .map_err(|e| SignError::Cryptographic(format!("Signer init failed: {e}")))?;
        signer
            .update(&attrs.set_der)
            .map_err(|e| SignError::Cryptographic(format!("Signer update failed: {e}")))?;
        let signature = signer
            .sign_to_vec()
            .map_err(|e| SignError::Cryptographic(format!("RSA signing failed: {e}")))?;

        log::debug!(
            "Built authenticated attributes ({} bytes) and signature ({} bytes)",
            attrs.set_der.len(),
            signature.len()
        );

        self.assemble(&cert_der, credential, &attrs.embedding_der, &signature)
    }

    fn assemble(
        &self,
        cert_der: &[u8],
        credential: &CertificateCredential,
        a0_implicit_attrs: &[u8],
        signature: &[u8],
    ) -> SignResult<CmsSignedData> {
        let mut signed_data_content = Vec::new();
        signed_data_content.extend_from_slice(constants::CMS_VERSION_1);
        signed_data_content.extend_from_slice(self.build_digest_algorithms().as_der());
        signed_data_content.extend_from_slice(self.build_encap_content_info().as_der());

        // certificates [0] IMPLICIT
        signed_data_content.push(constants::ASN1_CONTEXT_0_IMPLICIT_TAG);
        signed_data_content.extend_from_slice(&encode_len(cert_der.len()));
        signed_data_content.extend_from_slice(cert_der);

        signed_data_content.extend_from_slice(
            self.build_signer_infos(credential, a0_implicit_attrs, signature)?
                .as_der(),
        );

        let signed_data_seq = wrap(constants::ASN1_SEQUENCE_TAG, &signed_data_content);

        // Outer ContentInfo: OID signedData + [0] EXPLICIT SignedData
        let mut ci_body = Vec::new();
        ci_body.push(constants::ASN1_OID_TAG);
        ci_body.extend_from_slice(&encode_len(constants::PKCS7_SIGNED_DATA_OID.len()));
        ci_body.extend_from_slice(constants::PKCS7_SIGNED_DATA_OID);
        ci_body.push(constants::ASN1_CONTEXT_0_EXPLICIT_TAG);
        ci_body.extend_from_slice(&encode_len(signed_data_seq.len()));
        ci_body.extend_from_slice(&signed_data_seq);

        Ok(CmsSignedData::from_der(wrap(
            constants::ASN1_SEQUENCE_TAG,
            &ci_body,
        )))
    }

    /// digestAlgorithms: SET of one AlgorithmIdentifier (SHA-256 + NULL params).
    #[must_use]
    pub fn build_digest_algorithms(&self) -> CmsDigestAlgorithms {
        let mut alg = Vec::new();
        alg.push(constants::ASN1_OID_TAG);
        alg.extend_from_slice(&encode_len(constants::SHA256_ALGORITHM_OID.len()));
        alg.extend_from_slice(constants::SHA256_ALGORITHM_OID);
        alg.extend_from_slice(constants::ASN1_NULL);
        let alg_seq = wrap(constants::ASN1_SEQUENCE_TAG, &alg);
        CmsDigestAlgorithms::from_der(wrap(constants::ASN1_SET_TAG, &alg_seq))
    }

    /// encapContentInfo naming `id-data` with no embedded content (detached).
    #[must_use]
    pub fn build_encap_content_info(&self) -> CmsEncapContentInfo {
        let mut body = Vec::new();
        body.push(constants::ASN1_OID_TAG);
        body.extend_from_slice(&encode_len(constants::PKCS7_DATA_OID.len()));
        body.extend_from_slice(constants::PKCS7_DATA_OID);
        CmsEncapContentInfo::from_der(wrap(constants::ASN1_SEQUENCE_TAG, &body))
    }

    /// signerInfos: a single `SignerInfo` carrying the issuer/serial of the
    /// signing certificate, the `[0] IMPLICIT` attributes and the signature.
    pub fn build_signer_infos(
        &self,
        credential: &CertificateCredential,
        a0_implicit_attrs: &[u8],
        signature: &[u8],
    ) -> SignResult<CmsSignerInfos> {
        let cert = credential.certificate();
        let issuer_der = cert.issuer_name().to_der().map_err(|e| {
            SignError::Certificate(format!("Failed to encode issuer DN: {e}"))
        })?;
        let serial_bn = cert.serial_number().to_bn().map_err(|e| {
            SignError::Certificate(format!("Failed to read serial number: {e}"))
        })?;
        let mut serial_bytes = serial_bn.to_vec();
        if serial_bytes.is_empty() {
            serial_bytes.push(0);
        }
        if serial_bytes[0] & 0x80 != 0 {
            serial_bytes.insert(0, 0);
        }

        let mut issuer_serial = Vec::new();
        issuer_serial.extend_from_slice(&issuer_der);
        issuer_serial.push(constants::ASN1_INTEGER_TAG);
        issuer_serial.extend_from_slice(&encode_len(serial_bytes.len()));
        issuer_serial.extend_from_slice(&serial_bytes);

        let mut digest_alg = Vec::new();
        digest_alg.push(constants::ASN1_OID_TAG);
        digest_alg.extend_from_slice(&encode_len(constants::SHA256_ALGORITHM_OID.len()));
        digest_alg.extend_from_slice(constants::SHA256_ALGORITHM_OID);
        digest_alg.extend_from_slice(constants::ASN1_NULL);

        let mut sig_alg = Vec::new();
        sig_alg.push(constants::ASN1_OID_TAG);
        sig_alg.extend_from_slice(&encode_len(constants::RSA_ENCRYPTION_OID.len()));
        sig_alg.extend_from_slice(constants::RSA_ENCRYPTION_OID);
        sig_alg.extend_from_slice(constants::ASN1_NULL);

        let mut si_content = Vec::new();
        si_content.extend_from_slice(constants::CMS_VERSION_1);
        si_content.extend_from_slice(&wrap(constants::ASN1_SEQUENCE_TAG, &issuer_serial));
        si_content.extend_from_slice(&wrap(constants::ASN1_SEQUENCE_TAG, &digest_alg));
        si_content.extend_from_slice(a0_implicit_attrs);
        si_content.extend_from_slice(&wrap(constants::ASN1_SEQUENCE_TAG, &sig_alg));
        si_content.push(constants::ASN1_OCTET_STRING_TAG);
        si_content.extend_from_slice(&encode_len(signature.len()));
        si_content.extend_from_slice(signature);

        let si_seq = wrap(constants::ASN1_SEQUENCE_TAG, &si_content);
        Ok(CmsSignerInfos::from_der(wrap(
            constants::ASN1_SET_TAG,
            &si_seq,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use openssl::asn1::Asn1Time;
    use openssl::bn::BigNum;
    use openssl::pkey::PKey;
    use openssl::rsa::Rsa;
    use openssl::x509::{X509Builder, X509NameBuilder};

    fn test_credential() -> CertificateCredential {
        let rsa = Rsa::generate(2048).unwrap();
        let pkey = PKey::from_rsa(rsa).unwrap();
        let mut name = X509NameBuilder::new().unwrap();
        name.append_entry_by_text("CN", "Builder Test").unwrap();
        let name = name.build();
        let mut builder = X509Builder::new().unwrap();
        builder.set_version(2).unwrap();
        let serial = BigNum::from_u32(7).unwrap().to_asn1_integer().unwrap();
        builder.set_serial_number(&serial).unwrap();
        builder.set_subject_name(&name).unwrap();
        builder.set_issuer_name(&name).unwrap();
        builder
            .set_not_before(&Asn1Time::days_from_now(0).unwrap())
            .unwrap();
        builder
            .set_not_after(&Asn1Time::days_from_now(365).unwrap())
            .unwrap();
        builder.set_pubkey(&pkey).unwrap();
        builder
            .sign(&pkey, openssl::hash::MessageDigest::sha256())
            .unwrap();
        CertificateCredential::new(pkey, builder.build())
    }

    #[test]
    fn rejects_empty_content() {
        let credential = test_credential();
        let time = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let err = CmsBuilderService::new()
            .build_signed_data(&[], &credential, time)
            .unwrap_err();
        assert!(matches!(err, SignError::InvalidContentType(_)));
    }

    #[test]
    fn output_is_signed_data_content_info() {
        let credential = test_credential();
        let time = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let cms = CmsBuilderService::new()
            .build_signed_data(b"document bytes", &credential, time)
            .unwrap();
        let der = cms.as_der();
        assert_eq!(der[0], 0x30);
        // The signedData OID must appear near the head of the structure.
        assert!(der[..32]
            .windows(constants::PKCS7_SIGNED_DATA_OID.len())
            .any(|w| w == constants::PKCS7_SIGNED_DATA_OID));
        // Detached: the raw content must not be embedded.
        assert!(!der.windows(14).any(|w| w == b"document bytes"));
    }

    #[test]
    fn output_embeds_certificate() {
        let credential = test_credential();
        let cert_der = credential.certificate_der().unwrap();
        let time = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let cms = CmsBuilderService::new()
            .build_signed_data(b"content", &credential, time)
            .unwrap();
        assert!(cms
            .as_der()
            .windows(cert_der.len())
            .any(|w| w == cert_der.as_slice()));
    }

    #[test]
    fn digest_algorithms_component_shape() {
        let component = CmsBuilderService::new().build_digest_algorithms();
        let der = component.as_der();
        assert_eq!(der[0], 0x31);
        assert!(der
            .windows(constants::SHA256_ALGORITHM_OID.len())
            .any(|w| w == constants::SHA256_ALGORITHM_OID));
    }
}
