//! CMS `SignedData` domain wrappers.
//! Minimal newtypes around DER byte sequences produced by the builder and
//! consumed by the splicer and parser.

use std::fmt;

pub mod attributes;
pub mod der;

pub use attributes::{SignedAttributeLogical, SignedAttributesCanonical};

/// DER-encoded detached CMS `SignedData` structure (outer `ContentInfo`).
pub struct CmsSignedData {
    der: Vec<u8>,
}

// Component wrappers to decouple assembly steps.
pub struct CmsDigestAlgorithms {
    der: Vec<u8>,
} // SET OF AlgorithmIdentifier
pub struct CmsEncapContentInfo {
    der: Vec<u8>,
} // EncapsulatedContentInfo without content (detached)
pub struct CmsSignerInfos {
    der: Vec<u8>,
} // SET OF SignerInfo

impl CmsDigestAlgorithms {
    #[must_use]
    pub fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }
    #[must_use]
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

impl CmsEncapContentInfo {
    #[must_use]
    pub fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }
    #[must_use]
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

impl CmsSignerInfos {
    #[must_use]
    pub fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }
    #[must_use]
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

impl CmsSignedData {
    #[must_use]
    pub fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }
    #[must_use]
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
    #[must_use]
    pub fn into_der(self) -> Vec<u8> {
        self.der
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.der.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.der.is_empty()
    }
}

impl fmt::Debug for CmsSignedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CmsSignedData(len={})", self.der.len())
    }
}
