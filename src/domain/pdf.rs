//! PDF document domain types for the signing pipeline.
//!
//! Provides staged representations of a document moving through the
//! placeholder/byte-range engine:
//! - `UnsignedPdfFile`: input bytes validated to look like a PDF
//! - `PreparedPdfFile`: serialized bytes with the placeholder injected and
//!   the signature geometry captured
//! - `SignedPdfFile`: final spliced bytes, same length as the prepared stage
//!
//! These types ensure the exact serialized buffer that had its offsets
//! measured is the buffer that gets spliced and shipped.

use crate::infra::error::{SignError, SignResult};

/// Geometry of the reserved signature region inside a serialized document.
///
/// Invariants (checked at construction):
/// - `contents_end - contents_start == 2 * reserved_signature_bytes`
///   (the region holds the hex encoding of the reserved bytes)
/// - the two signed spans plus the reserved region exactly tile
///   `[0, total_len)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignaturePlaceholder {
    /// Bytes reserved for the DER signature (hex length is twice this).
    pub reserved_signature_bytes: usize,
    /// Offset of the `/ByteRange` marker in the serialized bytes.
    pub byte_range_offset: usize,
    /// First byte after the `<` opening the reserved hex string.
    pub contents_start: usize,
    /// Offset of the matching `>`.
    pub contents_end: usize,
    /// Total serialized document length.
    pub total_len: usize,
}

impl SignaturePlaceholder {
    pub fn new(
        reserved_signature_bytes: usize,
        byte_range_offset: usize,
        contents_start: usize,
        contents_end: usize,
        total_len: usize,
    ) -> SignResult<Self> {
        if contents_end <= contents_start || contents_end > total_len {
            return Err(SignError::PdfStructure(format!(
                "Reserved signature region [{contents_start}, {contents_end}) out of bounds for document of {total_len} bytes"
            )));
        }
        if contents_end - contents_start != 2 * reserved_signature_bytes {
            return Err(SignError::PdfStructure(format!(
                "Reserved hex region is {} chars, expected {} for {} reserved bytes",
                contents_end - contents_start,
                2 * reserved_signature_bytes,
                reserved_signature_bytes
            )));
        }
        Ok(Self {
            reserved_signature_bytes,
            byte_range_offset,
            contents_start,
            contents_end,
            total_len,
        })
    }

    /// The four `/ByteRange` integers naming the signed spans.
    #[must_use]
    pub fn byte_range(&self) -> ByteRange {
        ByteRange([
            0,
            self.contents_start as i64,
            self.contents_end as i64,
            (self.total_len - self.contents_end) as i64,
        ])
    }

    /// Number of hex characters the signature may occupy.
    #[must_use]
    pub fn reserved_hex_len(&self) -> usize {
        2 * self.reserved_signature_bytes
    }
}

/// The four byte-range integers of a signature dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange(pub [i64; 4]);

impl ByteRange {
    /// True when the two named spans plus the excluded region tile
    /// `[0, total_len)` exactly.
    #[must_use]
    pub fn partitions(&self, total_len: usize) -> bool {
        let [r0, r1, r2, r3] = self.0;
        r0 == 0 && r1 >= 0 && r2 >= r1 && r2 + r3 == total_len as i64
    }

    /// Render as the literal array written into the document.
    #[must_use]
    pub fn to_pdf_array(&self) -> String {
        let [r0, r1, r2, r3] = self.0;
        format!("[{r0} {r1} {r2} {r3}]")
    }
}

/// Input document prior to placeholder injection.
#[derive(Debug)]
pub struct UnsignedPdfFile {
    bytes: Vec<u8>,
}

impl UnsignedPdfFile {
    pub fn new(bytes: Vec<u8>) -> SignResult<Self> {
        if bytes.len() < 8 || !bytes.starts_with(b"%PDF-") {
            return Err(SignError::PdfStructure(
                "Not a PDF file (missing %PDF- header)".into(),
            ));
        }
        Ok(Self { bytes })
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Serialized document with the placeholder injected and offsets captured.
#[derive(Debug)]
pub struct PreparedPdfFile {
    bytes: Vec<u8>,
    placeholder: SignaturePlaceholder,
}

impl PreparedPdfFile {
    pub fn new(bytes: Vec<u8>, placeholder: SignaturePlaceholder) -> SignResult<Self> {
        if placeholder.total_len != bytes.len() {
            return Err(SignError::PdfStructure(format!(
                "Placeholder captured for {} bytes but document is {} bytes",
                placeholder.total_len,
                bytes.len()
            )));
        }
        Ok(Self { bytes, placeholder })
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn placeholder(&self) -> &SignaturePlaceholder {
        &self.placeholder
    }

    /// The exact byte sequence covered by the signature: everything outside
    /// the reserved hex region.
    #[must_use]
    pub fn signed_content(&self) -> Vec<u8> {
        let mut content = Vec::with_capacity(
            self.bytes.len() - (self.placeholder.contents_end - self.placeholder.contents_start),
        );
        content.extend_from_slice(&self.bytes[..self.placeholder.contents_start]);
        content.extend_from_slice(&self.bytes[self.placeholder.contents_end..]);
        content
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Final spliced document.
#[derive(Debug)]
pub struct SignedPdfFile {
    bytes: Vec<u8>,
}

impl SignedPdfFile {
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_enforces_hex_width() {
        // 4 reserved bytes -> 8 hex chars
        assert!(SignaturePlaceholder::new(4, 0, 10, 18, 30).is_ok());
        assert!(SignaturePlaceholder::new(4, 0, 10, 17, 30).is_err());
    }

    #[test]
    fn placeholder_rejects_out_of_bounds_region() {
        assert!(SignaturePlaceholder::new(4, 0, 10, 18, 15).is_err());
        assert!(SignaturePlaceholder::new(4, 0, 18, 10, 30).is_err());
    }

    #[test]
    fn byte_range_tiles_document() {
        let placeholder = SignaturePlaceholder::new(4, 0, 10, 18, 30).unwrap();
        let range = placeholder.byte_range();
        assert_eq!(range.0, [0, 10, 18, 12]);
        assert!(range.partitions(30));
        assert!(!range.partitions(31));
    }

    #[test]
    fn unsigned_pdf_rejects_non_pdf() {
        assert!(UnsignedPdfFile::new(b"MZ garbage".to_vec()).is_err());
        assert!(UnsignedPdfFile::new(b"%PDF-1.5\n...".to_vec()).is_ok());
    }

    #[test]
    fn signed_content_excludes_reserved_region() {
        let bytes: Vec<u8> = (0u8..30).collect();
        let placeholder = SignaturePlaceholder::new(4, 0, 10, 18, 30).unwrap();
        let prepared = PreparedPdfFile::new(bytes.clone(), placeholder).unwrap();
        let content = prepared.signed_content();
        assert_eq!(content.len(), 22);
        assert_eq!(&content[..10], &bytes[..10]);
        assert_eq!(&content[10..], &bytes[18..]);
    }
}
