//! Credential domain types.
//!
//! A credential is the key material a signer variant owns after successful
//! initialization. Each variant keeps its own format: the certificate
//! credential holds an RSA key pair plus X.509 certificate extracted from a
//! PKCS#12 container, the account credential holds a raw secp256k1 key and
//! its derived address. Neither is shared across signer instances.

use openssl::pkey::{PKey, Private};
use openssl::x509::X509;

use crate::infra::error::{SignError, SignResult};

/// Key material extracted from a PKCS#12 container.
///
/// Owned exclusively by the signer that imported it. The private key lives
/// inside an OpenSSL `PKey` handle and is released with the credential.
#[derive(Clone)]
pub struct CertificateCredential {
    private_key: PKey<Private>,
    certificate: X509,
}

impl CertificateCredential {
    #[must_use]
    pub fn new(private_key: PKey<Private>, certificate: X509) -> Self {
        Self {
            private_key,
            certificate,
        }
    }

    #[must_use]
    pub fn private_key(&self) -> &PKey<Private> {
        &self.private_key
    }

    #[must_use]
    pub fn certificate(&self) -> &X509 {
        &self.certificate
    }

    /// DER encoding of the certificate, as embedded in signed structures.
    pub fn certificate_der(&self) -> SignResult<Vec<u8>> {
        self.certificate
            .to_der()
            .map_err(|e| SignError::Certificate(format!("Failed to encode certificate: {e}")))
    }

    /// Common name of the certificate subject, when present.
    #[must_use]
    pub fn subject_common_name(&self) -> Option<String> {
        self.certificate
            .subject_name()
            .entries_by_nid(openssl::nid::Nid::COMMONNAME)
            .next()
            .map(|entry| String::from_utf8_lossy(entry.data().as_slice()).into_owned())
    }
}

impl std::fmt::Debug for CertificateCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Subject only; key material must not leak into logs.
        write!(
            f,
            "CertificateCredential(subject={:?})",
            self.subject_common_name()
        )
    }
}

/// Account key material for address-recoverable signatures.
///
/// `address` is the 0x-prefixed hex form derived from the public key; it is
/// what `public_key()` reports for this variant.
pub struct AccountCredential {
    signing_key: k256::ecdsa::SigningKey,
    address: String,
}

impl AccountCredential {
    #[must_use]
    pub fn new(signing_key: k256::ecdsa::SigningKey, address: String) -> Self {
        Self {
            signing_key,
            address,
        }
    }

    #[must_use]
    pub fn signing_key(&self) -> &k256::ecdsa::SigningKey {
        &self.signing_key
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl std::fmt::Debug for AccountCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountCredential(address={})", self.address)
    }
}
