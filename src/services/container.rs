//! PKCS#12 key-container import service.
//!
//! Decrypts a P12/PFX blob and recovers exactly one private key and one
//! certificate, the pair the detached-signature builder needs. The
//! container bytes are not retained past the call.

use openssl::pkcs12::Pkcs12;

use crate::domain::credential::CertificateCredential;
use crate::domain::types::Passphrase;
use crate::infra::error::{SignError, SignResult};

pub struct ContainerImportService;

impl Default for ContainerImportService {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerImportService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decrypt `container_bytes` with `passphrase` (empty string permitted,
    /// meaning "no passphrase") and extract the key/certificate pair.
    ///
    /// # Errors
    /// `ContainerParse` for a malformed blob, a wrong passphrase, or a
    /// container missing either the key bag or the certificate bag.
    pub fn import(
        &self,
        container_bytes: &[u8],
        passphrase: &Passphrase,
    ) -> SignResult<CertificateCredential> {
        let pkcs12 = Pkcs12::from_der(container_bytes).map_err(|e| {
            SignError::ContainerParse(format!("Not a PKCS#12 container: {e}"))
        })?;

        let parsed = pkcs12.parse2(passphrase.expose()).map_err(|e| {
            SignError::ContainerParse(format!(
                "Failed to decrypt container (wrong passphrase?): {e}"
            ))
        })?;

        let (Some(private_key), Some(certificate)) = (parsed.pkey, parsed.cert) else {
            return Err(SignError::ContainerParse(
                "missing key or certificate".to_string(),
            ));
        };

        let credential = CertificateCredential::new(private_key, certificate);
        log::info!(
            "Imported PKCS#12 container: subject={:?}",
            credential.subject_common_name()
        );
        Ok(credential)
    }
}
