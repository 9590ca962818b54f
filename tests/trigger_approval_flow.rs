//! QR-triggered approval flow: a scanned `autopen:<hash>` payload is
//! signed by the account credential and checked by address recovery.

use autopen::{AccountSigner, CredentialSigner, TriggerPayload};

#[test]
fn trigger_payload_signed_and_recovered() {
    let payload = TriggerPayload::new("autopen:9f8a6c52e1").unwrap();
    let signer = AccountSigner::from_seed("approval-device-key").unwrap();

    let signature = signer.sign(payload.message().as_bytes()).unwrap();
    assert!(signer
        .verify(payload.message().as_bytes(), &signature)
        .unwrap());
}

#[test]
fn approval_signature_binds_to_payload() {
    let signer = AccountSigner::from_seed("approval-device-key").unwrap();
    let original = TriggerPayload::new("autopen:9f8a6c52e1").unwrap();
    let other = TriggerPayload::new("autopen:deadbeef").unwrap();

    let signature = signer.sign(original.message().as_bytes()).unwrap();
    assert!(!signer
        .verify(other.message().as_bytes(), &signature)
        .unwrap());
}

#[test]
fn payload_validation_front_runs_signing() {
    // The scanning collaborator hands over an arbitrary string; only
    // well-formed payloads reach the credential.
    assert!(TriggerPayload::new("autopen:").is_err());
    assert!(TriggerPayload::new("someother:abc").is_err());
    assert!(TriggerPayload::new("autopen:abc").is_ok());
}

#[test]
fn account_and_certificate_variants_expose_distinct_key_formats() {
    let account = AccountSigner::from_seed("approval-device-key").unwrap();
    let address = account.public_key().unwrap();
    // Account variant reports an address, not a PEM block. Callers must not
    // assume one key format across variants.
    assert!(address.starts_with("0x"));
    assert!(!address.contains("BEGIN"));
}
