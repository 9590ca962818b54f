//! Signed-attribute and CMS structure tests over the builder's output.

mod common;

use chrono::{TimeZone, Utc};
use sha2::{Digest, Sha256};

use autopen::domain::constants;
use autopen::domain::credential::CertificateCredential;
use autopen::services::{AttributeBuilderService, CmsBuilderService};

fn test_credential() -> CertificateCredential {
    let (pkey, cert) = common::test_key_and_cert();
    CertificateCredential::new(pkey, cert)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn cms_carries_all_three_authenticated_attributes() {
    let credential = test_credential();
    let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let cms = CmsBuilderService::new()
        .build_signed_data(b"covered content", &credential, time)
        .unwrap();
    let der = cms.as_der();

    assert!(contains(der, constants::PKCS9_CONTENT_TYPE_OID));
    assert!(contains(der, constants::PKCS9_SIGNING_TIME_OID));
    assert!(contains(der, constants::PKCS9_MESSAGE_DIGEST_OID));
}

#[test]
fn message_digest_attribute_matches_content_digest() {
    let credential = test_credential();
    let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let content = b"the exact covered bytes";
    let cms = CmsBuilderService::new()
        .build_signed_data(content, &credential, time)
        .unwrap();

    let digest = Sha256::digest(content);
    assert!(contains(cms.as_der(), &digest));
}

#[test]
fn signing_time_is_utc_time_of_supplied_instant() {
    let credential = test_credential();
    let time = Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 45).unwrap();
    let cms = CmsBuilderService::new()
        .build_signed_data(b"content", &credential, time)
        .unwrap();

    assert!(contains(cms.as_der(), b"240615123045Z"));
}

#[test]
fn signature_verifies_over_attribute_set() {
    // Rebuild the attribute SET independently and check the RSA signature
    // inside SignerInfo against it.
    let credential = test_credential();
    let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let content = b"verified content";
    let cms = CmsBuilderService::new()
        .build_signed_data(content, &credential, time)
        .unwrap();

    let digest = Sha256::digest(content);
    let attrs = AttributeBuilderService::new().build(&digest, time).unwrap();

    // The signature is the last OCTET STRING of the structure; a 2048-bit
    // RSA signature is 256 bytes, DER header 0x04 0x82 0x01 0x00.
    let der = cms.as_der();
    let marker: &[u8] = &[0x04, 0x82, 0x01, 0x00];
    let sig_pos = der
        .windows(marker.len())
        .rposition(|w| w == marker)
        .expect("signature OCTET STRING present");
    let signature = &der[sig_pos + 4..sig_pos + 4 + 256];

    let mut verifier = openssl::sign::Verifier::new(
        openssl::hash::MessageDigest::sha256(),
        credential.private_key(),
    )
    .unwrap();
    verifier.update(&attrs.set_der).unwrap();
    assert!(verifier.verify(signature).unwrap());
}

#[test]
fn attribute_set_and_embedding_form_share_content() {
    let digest = Sha256::digest(b"content");
    let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let out = AttributeBuilderService::new().build(&digest, time).unwrap();

    assert_eq!(out.set_der[0], 0x31);
    assert_eq!(out.embedding_der[0], 0xa0);
    assert_eq!(out.set_der[1..], out.embedding_der[1..]);
    assert_eq!(out.raw_attributes.len(), 3);
}

#[test]
fn identical_inputs_build_identical_attribute_sets() {
    let digest = Sha256::digest(b"content");
    let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let builder = AttributeBuilderService::new();
    let a = builder.build(&digest, time).unwrap();
    let b = builder.build(&digest, time).unwrap();
    assert_eq!(a.set_der, b.set_der);
}
