//! Polymorphic credential signers.
//!
//! Two signer variants expose the same capability set over different key
//! material: a certificate-backed RSA signer fed from a PKCS#12 container,
//! and an account-style secp256k1 signer whose signatures recover to an
//! address. Each variant owns its credential format; callers must not
//! assume a single key format across variants (`public_key` returns a PEM
//! key for one and an address for the other).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use openssl::hash::MessageDigest;
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use openssl::sign::{Signer, Verifier};
use sha3::{Digest, Keccak256};

use crate::domain::constants;
use crate::domain::credential::{AccountCredential, CertificateCredential};
use crate::domain::types::Passphrase;
use crate::infra::error::{SignError, SignResult};
use crate::services::container::ContainerImportService;

/// Capability set shared by all signer variants.
///
/// Implementations are sync; signing is CPU-bound. For async callers,
/// wrap in `spawn_blocking` at the boundary.
pub trait CredentialSigner: Send + Sync {
    /// Sign a message. The encoding of the returned string is
    /// variant-specific (base64 for RSA, 0x-hex for the account signer).
    fn sign(&self, message: &[u8]) -> SignResult<String>;

    /// Check a signature produced by `sign`. A structurally valid but
    /// mismatching signature returns `Ok(false)`, never an error.
    fn verify(&self, message: &[u8], signature: &str) -> SignResult<bool>;

    /// Public key material: PEM for the certificate variant, the account
    /// address for the account variant.
    fn public_key(&self) -> SignResult<String>;

    /// Private key material: PKCS#8 PEM or 0x-hex, per variant.
    fn private_key(&self) -> SignResult<String>;

    /// Algorithm identifier string (e.g. "rsa-sha256").
    fn algorithm(&self) -> &str;
}

/// Certificate-backed signer over a PKCS#12 key/certificate pair.
///
/// Uninitialized until `initialize` has successfully imported the
/// container; every operation before that fails with `NoCredential`.
pub struct CertificateSigner {
    container: Option<Vec<u8>>,
    passphrase: Passphrase,
    credential: Option<CertificateCredential>,
}

impl CertificateSigner {
    #[must_use]
    pub fn new(container_bytes: Vec<u8>, passphrase: Passphrase) -> Self {
        Self {
            container: Some(container_bytes),
            passphrase,
            credential: None,
        }
    }

    /// Import the container, consuming the stored bytes.
    pub fn initialize(&mut self) -> SignResult<()> {
        let container = self.container.take().ok_or_else(|| {
            SignError::ContainerParse("Container bytes already consumed".to_string())
        })?;
        let credential = ContainerImportService::new().import(&container, &self.passphrase)?;
        self.credential = Some(credential);
        Ok(())
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.credential.is_some()
    }

    /// Access the imported credential.
    pub fn credential(&self) -> SignResult<&CertificateCredential> {
        self.credential.as_ref().ok_or_else(|| {
            SignError::NoCredential("import a PKCS#12 container first".to_string())
        })
    }
}

impl CredentialSigner for CertificateSigner {
    fn sign(&self, message: &[u8]) -> SignResult<String> {
        let credential = self.credential()?;
        let mut signer = Signer::new(MessageDigest::sha256(), credential.private_key())?;
        signer.update(message)?;
        let signature = signer.sign_to_vec()?;
        Ok(BASE64.encode(signature))
    }

    fn verify(&self, message: &[u8], signature: &str) -> SignResult<bool> {
        let credential = self.credential()?;
        let Ok(signature_bytes) = BASE64.decode(signature) else {
            return Ok(false);
        };
        let mut verifier = Verifier::new(MessageDigest::sha256(), credential.private_key())?;
        verifier.update(message)?;
        Ok(verifier.verify(&signature_bytes).unwrap_or(false))
    }

    fn public_key(&self) -> SignResult<String> {
        // Public key is re-derived from the private key's modulus/exponent.
        let credential = self.credential()?;
        let rsa = credential.private_key().rsa().map_err(|e| {
            SignError::Cryptographic(format!("Credential key is not RSA: {e}"))
        })?;
        let public = Rsa::from_public_components(rsa.n().to_owned()?, rsa.e().to_owned()?)?;
        let pem = PKey::from_rsa(public)?.public_key_to_pem()?;
        String::from_utf8(pem)
            .map_err(|e| SignError::Cryptographic(format!("Public key PEM not UTF-8: {e}")))
    }

    fn private_key(&self) -> SignResult<String> {
        let credential = self.credential()?;
        let pem = credential.private_key().private_key_to_pem_pkcs8()?;
        String::from_utf8(pem)
            .map_err(|e| SignError::Cryptographic(format!("Private key PEM not UTF-8: {e}")))
    }

    fn algorithm(&self) -> &str {
        "rsa-sha256"
    }
}

/// Account-style signer producing address-recoverable secp256k1 signatures.
///
/// Used for the QR-triggered approval flow, not for PDF embedding.
pub struct AccountSigner {
    credential: Option<AccountCredential>,
}

impl AccountSigner {
    /// Create an uninitialized signer; operations fail with `NoCredential`
    /// until a key is loaded.
    #[must_use]
    pub fn uninitialized() -> Self {
        Self { credential: None }
    }

    /// Deterministically derive a key from a seed string. The SHA-256 hash
    /// of the seed becomes the private scalar.
    pub fn from_seed(seed: &str) -> SignResult<Self> {
        let hash = <sha2::Sha256 as sha2::Digest>::digest(seed.as_bytes());
        let signing_key = SigningKey::from_bytes(&hash)
            .map_err(|e| SignError::Cryptographic(format!("Invalid seed: {e}")))?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Load an existing 32-byte private key given as 0x-prefixed hex.
    pub fn from_private_key_hex(key_hex: &str) -> SignResult<Self> {
        let stripped = key_hex.strip_prefix("0x").unwrap_or(key_hex);
        let bytes = hex::decode(stripped)
            .map_err(|e| SignError::Cryptographic(format!("Invalid private key hex: {e}")))?;
        let signing_key = SigningKey::from_slice(&bytes)
            .map_err(|e| SignError::Cryptographic(format!("Invalid private key: {e}")))?;
        Ok(Self::from_signing_key(signing_key))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = derive_address(signing_key.verifying_key());
        Self {
            credential: Some(AccountCredential::new(signing_key, address)),
        }
    }

    fn credential(&self) -> SignResult<&AccountCredential> {
        self.credential
            .as_ref()
            .ok_or_else(|| SignError::NoCredential("no account key loaded".to_string()))
    }

    /// Keccak-256 over the personal-message envelope: prefix, decimal
    /// message length, then the message itself.
    fn personal_digest(message: &[u8]) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update(constants::PERSONAL_MESSAGE_PREFIX);
        hasher.update(message.len().to_string().as_bytes());
        hasher.update(message);
        hasher.finalize().into()
    }
}

impl CredentialSigner for AccountSigner {
    fn sign(&self, message: &[u8]) -> SignResult<String> {
        let credential = self.credential()?;
        let digest = Self::personal_digest(message);
        let (signature, recovery_id): (Signature, RecoveryId) = credential
            .signing_key()
            .sign_prehash(&digest)
            .map_err(|e| SignError::Cryptographic(format!("secp256k1 sign failed: {e}")))?;

        // 65-byte signature: 32 bytes r + 32 bytes s + 1 byte v (27/28)
        let mut sig_bytes = signature.to_bytes().to_vec();
        sig_bytes.push(recovery_id.to_byte() + 27);
        Ok(format!("0x{}", hex::encode(sig_bytes)))
    }

    fn verify(&self, message: &[u8], signature: &str) -> SignResult<bool> {
        let credential = self.credential()?;
        let stripped = signature.strip_prefix("0x").unwrap_or(signature);
        let Ok(sig_bytes) = hex::decode(stripped) else {
            return Ok(false);
        };
        if sig_bytes.len() != 65 {
            return Ok(false);
        }
        let Ok(parsed) = Signature::from_slice(&sig_bytes[..64]) else {
            return Ok(false);
        };
        let v = sig_bytes[64];
        let Some(recovery_id) = RecoveryId::from_byte(if v >= 27 { v - 27 } else { v }) else {
            return Ok(false);
        };

        let digest = Self::personal_digest(message);
        let Ok(recovered) = VerifyingKey::recover_from_prehash(&digest, &parsed, recovery_id)
        else {
            return Ok(false);
        };
        let recovered_address = derive_address(&recovered);
        Ok(recovered_address.eq_ignore_ascii_case(credential.address()))
    }

    fn public_key(&self) -> SignResult<String> {
        // The account address, not a PEM key.
        Ok(self.credential()?.address().to_string())
    }

    fn private_key(&self) -> SignResult<String> {
        let credential = self.credential()?;
        Ok(format!(
            "0x{}",
            hex::encode(credential.signing_key().to_bytes())
        ))
    }

    fn algorithm(&self) -> &str {
        "secp256k1-recoverable"
    }
}

/// Last 20 bytes of keccak256 over the uncompressed public key, 0x-hex.
fn derive_address(verifying_key: &VerifyingKey) -> String {
    let encoded = verifying_key.to_encoded_point(false);
    let mut hasher = Keccak256::new();
    hasher.update(&encoded.as_bytes()[1..]);
    let hash = hasher.finalize();
    format!("0x{}", hex::encode(&hash[12..]))
}
