//! Autopen Signing Library
//!
//! A self-contained library for PDF-native digital signatures backed by
//! PKCS#12 credentials. Builds detached CMS/PKCS#7 structures, embeds them
//! in a reserved, length-preserving placeholder region, and re-extracts
//! signature and certificate metadata from signed documents.

pub mod domain;
pub mod infra;
pub mod pipelines;
pub mod services;

use std::path::Path;

use chrono::{DateTime, Utc};

pub use domain::credential::{AccountCredential, CertificateCredential};
pub use domain::pdf::{ByteRange, SignaturePlaceholder, SignedPdfFile, UnsignedPdfFile};
pub use domain::types::{Passphrase, PdfDate, TriggerPayload};
pub use domain::verification::{CertificateInfo, SignatureReport};
pub use infra::config::{ConfigManager, SigningConfiguration};
pub use infra::error::{SignError, SignResult};
pub use pipelines::{SignWorkflow, VerifyWorkflow};
pub use services::{
    AccountSigner, CertificateSigner, ContainerImportService, CredentialSigner,
};

/// Options written into the signature dictionary.
///
/// Immutable once handed to a workflow.
#[derive(Debug, Clone)]
pub struct SigningOptions {
    /// `/Reason` value
    pub reason: String,
    /// `/ContactInfo` value
    pub contact_info: String,
    /// `/Name` value
    pub name: String,
    /// `/Location` value
    pub location: String,
    /// Signing time, written to the dictionary and the authenticated
    /// signing-time attribute
    pub signing_time: DateTime<Utc>,
}

impl Default for SigningOptions {
    fn default() -> Self {
        Self {
            reason: "Digital Signature".to_string(),
            contact_info: String::new(),
            name: "Digital Signer".to_string(),
            location: String::new(),
            signing_time: Utc::now(),
        }
    }
}

/// Top-level signing configuration
#[derive(Debug)]
pub struct SigningConfig {
    /// Passphrase protecting the PKCS#12 container (empty = none)
    pub passphrase: Passphrase,
    /// Signature dictionary values
    pub options: SigningOptions,
    /// Bytes reserved for the DER signature in `/Contents`
    pub reserved_signature_bytes: usize,
}

impl SigningConfig {
    #[must_use]
    pub fn new(passphrase: Passphrase, options: SigningOptions) -> Self {
        Self {
            passphrase,
            options,
            reserved_signature_bytes: domain::constants::DEFAULT_RESERVED_SIGNATURE_BYTES,
        }
    }
}

/// Sign a PDF document in memory with an imported credential.
pub fn sign_pdf_bytes(
    pdf_bytes: &[u8],
    credential: &CertificateCredential,
    options: &SigningOptions,
    reserved_signature_bytes: usize,
) -> SignResult<Vec<u8>> {
    let workflow = SignWorkflow::new(reserved_signature_bytes);
    Ok(workflow.run(pdf_bytes, credential, options)?.into_bytes())
}

/// Inspect PDF bytes for an embedded signature.
pub fn verify_pdf_bytes(pdf_bytes: &[u8]) -> SignResult<Option<SignatureReport>> {
    VerifyWorkflow::new().run(pdf_bytes)
}

/// Main signing function - signs a PDF file using a PKCS#12 container
pub async fn sign_pdf_file<P: AsRef<Path>>(
    input_path: P,
    container_path: P,
    output_path: P,
    config: SigningConfig,
) -> SignResult<()> {
    log::info!("Starting PDF signing process");

    let pdf_bytes = std::fs::read(&input_path)
        .map_err(|e| SignError::Io(format!("Failed to read input file: {e}")))?;
    let container_bytes = std::fs::read(&container_path)
        .map_err(|e| SignError::Io(format!("Failed to read container file: {e}")))?;

    // Validate it's a PDF before touching key material, so we fail fast
    // with a clear structure error on invalid inputs.
    let _ = UnsignedPdfFile::new(pdf_bytes.clone())?;

    // The pipeline is CPU-bound; run it off the async executor so the
    // caller keeps an awaitable, cancellable handle.
    let signed = tokio::task::spawn_blocking(move || -> SignResult<Vec<u8>> {
        let credential =
            ContainerImportService::new().import(&container_bytes, &config.passphrase)?;
        log::info!("Imported credential from PKCS#12 container");
        sign_pdf_bytes(
            &pdf_bytes,
            &credential,
            &config.options,
            config.reserved_signature_bytes,
        )
    })
    .await
    .map_err(|e| SignError::Io(format!("Signing task failed: {e}")))??;

    std::fs::write(&output_path, signed)
        .map_err(|e| SignError::Io(format!("Failed to write output file: {e}")))?;

    log::info!("Successfully signed PDF: {:?}", output_path.as_ref());
    Ok(())
}

/// Verify a signed PDF file. `Ok(None)` means no signature is present.
pub async fn verify_pdf_file<P: AsRef<Path>>(path: P) -> SignResult<Option<SignatureReport>> {
    let pdf_bytes = std::fs::read(&path)
        .map_err(|e| SignError::Io(format!("Failed to read file: {e}")))?;

    tokio::task::spawn_blocking(move || verify_pdf_bytes(&pdf_bytes))
        .await
        .map_err(|e| SignError::Io(format!("Verification task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_signing_options() {
        let options = SigningOptions::default();
        assert_eq!(options.reason, "Digital Signature");
        assert_eq!(options.name, "Digital Signer");
        assert!(options.contact_info.is_empty());
        assert!(options.location.is_empty());
    }

    #[test]
    fn test_signing_config_creation() {
        let config = SigningConfig::new(Passphrase::new("secret"), SigningOptions::default());
        assert_eq!(
            config.reserved_signature_bytes,
            domain::constants::DEFAULT_RESERVED_SIGNATURE_BYTES
        );
        assert_eq!(config.passphrase.expose(), "secret");
    }
}
