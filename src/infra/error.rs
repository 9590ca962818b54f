//! Error types for PDF signing operations.
//! Error handling types and result definitions for the signing engine.

use thiserror::Error;

/// Result type for signing operations
pub type SignResult<T> = Result<T, SignError>;

/// Comprehensive error types for signing and verification operations
#[derive(Error, Debug, miette::Diagnostic)]
pub enum SignError {
    #[error("Container parse error: {0}")]
    ContainerParse(String),

    #[error("No credential available: {0}")]
    NoCredential(String),

    #[error("Signer not initialized: {0}")]
    SignerNotInitialized(String),

    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    #[error("Signature placeholder overflow: {0}")]
    PlaceholderOverflow(String),

    #[error("PDF structure error: {0}")]
    PdfStructure(String),

    #[error("ASN.1 encoding/decoding error: {0}")]
    Asn1Parse(String),

    #[error("Certificate error: {0}")]
    Certificate(String),

    #[error("Cryptographic error: {0}")]
    Cryptographic(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<openssl::error::ErrorStack> for SignError {
    fn from(error: openssl::error::ErrorStack) -> Self {
        SignError::Cryptographic(error.to_string())
    }
}

impl From<lopdf::Error> for SignError {
    fn from(error: lopdf::Error) -> Self {
        SignError::PdfStructure(error.to_string())
    }
}

impl From<std::io::Error> for SignError {
    fn from(error: std::io::Error) -> Self {
        SignError::Io(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SignError::ContainerParse("bad passphrase".to_string());
        assert_eq!(error.to_string(), "Container parse error: bad passphrase");

        let error = SignError::SignerNotInitialized("import a container first".to_string());
        assert_eq!(
            error.to_string(),
            "Signer not initialized: import a container first"
        );
    }

    #[test]
    fn test_error_conversion() {
        let error_msg = "unexpected tag";
        let sign_error = SignError::Asn1Parse(error_msg.to_string());
        match sign_error {
            SignError::Asn1Parse(msg) => assert_eq!(msg, error_msg),
            _ => panic!("Wrong error type"),
        }
    }
}
