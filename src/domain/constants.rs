//! Centralized constants for commonly repeated DER/OID bytes, tags and PDF literals.
//! Keep this intentionally small; only broadly reused literals should live here.

// === ASN.1 DER Constants ===

/// ASN.1 NULL value (tag + length)
pub const ASN1_NULL: &[u8] = &[0x05, 0x00];

/// ASN.1 SEQUENCE tag
pub const ASN1_SEQUENCE_TAG: u8 = 0x30;

/// ASN.1 SET tag
pub const ASN1_SET_TAG: u8 = 0x31;

/// ASN.1 INTEGER tag
pub const ASN1_INTEGER_TAG: u8 = 0x02;

/// ASN.1 OBJECT IDENTIFIER tag
pub const ASN1_OID_TAG: u8 = 0x06;

/// ASN.1 OCTET STRING tag
pub const ASN1_OCTET_STRING_TAG: u8 = 0x04;

/// ASN.1 UTCTime tag
pub const ASN1_UTC_TIME_TAG: u8 = 0x17;

/// ASN.1 context-specific tag [0] EXPLICIT (constructed)
pub const ASN1_CONTEXT_0_EXPLICIT_TAG: u8 = 0xa0;

/// ASN.1 context-specific tag [0] IMPLICIT (constructed), used for both the
/// certificates field and the authenticated attributes in `SignerInfo`.
pub const ASN1_CONTEXT_0_IMPLICIT_TAG: u8 = 0xa0;

// === PKCS#7/CMS OID Constants ===

/// PKCS#7 `data` content type OID (1.2.840.113549.1.7.1) DER encoding
pub const PKCS7_DATA_OID: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x01];

/// PKCS#7 `signedData` OID (1.2.840.113549.1.7.2) DER encoding
pub const PKCS7_SIGNED_DATA_OID: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x02];

/// PKCS#9 contentType attribute OID (1.2.840.113549.1.9.3) DER encoding
pub const PKCS9_CONTENT_TYPE_OID: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x03];

/// PKCS#9 messageDigest attribute OID (1.2.840.113549.1.9.4) DER encoding
pub const PKCS9_MESSAGE_DIGEST_OID: &[u8] =
    &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x04];

/// PKCS#9 signingTime attribute OID (1.2.840.113549.1.9.5) DER encoding
pub const PKCS9_SIGNING_TIME_OID: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x05];

/// CMS version 1 (INTEGER, complete DER structure)
pub const CMS_VERSION_1: &[u8] = &[0x02, 0x01, 0x01];

// === Algorithm OIDs ===

/// SHA-256 algorithm OID (2.16.840.1.101.3.4.2.1) DER encoding
pub const SHA256_ALGORITHM_OID: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01];

/// SHA-1 algorithm OID (1.3.14.3.2.26) DER encoding; legacy documents only
pub const SHA1_ALGORITHM_OID: &[u8] = &[0x2b, 0x0e, 0x03, 0x02, 0x1a];

/// rsaEncryption OID (1.2.840.113549.1.1.1) DER encoding
pub const RSA_ENCRYPTION_OID: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];

// === PDF Signature Dictionary Literals ===

/// Marker preceding the four byte-range integers in the serialized document.
pub const BYTE_RANGE_MARKER: &[u8] = b"/ByteRange";

/// Marker preceding the reserved signature hex string.
pub const CONTENTS_MARKER: &[u8] = b"/Contents";

/// Signature handler name written to `/Filter`.
pub const SIG_FILTER: &str = "Adobe.PPKLite";

/// Signature encoding written to `/SubFilter` (detached CMS).
pub const SIG_SUBFILTER: &str = "adbe.pkcs7.detached";

/// Default reserved space for the DER signature inside `/Contents`, in bytes
/// (the hex string occupies twice this many characters).
pub const DEFAULT_RESERVED_SIGNATURE_BYTES: usize = 8192;

/// Wide byte-range placeholder value; its decimal width reserves enough
/// space for the in-place rewrite of the real offsets.
pub const BYTE_RANGE_PLACEHOLDER_VALUE: i64 = 9_999_999_999;

// === Account Signer Constants ===

/// Prefix hashed in front of personal messages for address-recoverable
/// secp256k1 signatures.
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// Scheme prefix of trigger payloads handed to a credential for approval
/// signatures.
pub const TRIGGER_SCHEME: &str = "autopen";
