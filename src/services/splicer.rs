//! Byte-range capture and signature splicing.
//!
//! Operates on the exact serialized buffer produced by the placeholder
//! stage: locates the reserved `/Contents` region and the `/ByteRange`
//! array by scanning for their literal markers, then rewrites both in
//! place. Splicing only ever overwrites bytes inside spans measured here,
//! so the document length stays fixed and the byte range stays valid.

use crate::domain::constants;
use crate::domain::pdf::{PreparedPdfFile, SignaturePlaceholder, SignedPdfFile};
use crate::infra::error::{SignError, SignResult};

pub struct ByteRangeSplicer;

impl Default for ByteRangeSplicer {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteRangeSplicer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Capture the signature geometry from serialized placeholder bytes.
    pub fn locate(
        &self,
        bytes: &[u8],
        reserved_signature_bytes: usize,
    ) -> SignResult<SignaturePlaceholder> {
        let byte_range_offset = find_last(bytes, constants::BYTE_RANGE_MARKER).ok_or_else(|| {
            SignError::PdfStructure("Serialized document has no /ByteRange marker".to_string())
        })?;

        let contents_marker = find_from(bytes, constants::CONTENTS_MARKER, byte_range_offset)
            .ok_or_else(|| {
                SignError::PdfStructure(
                    "Serialized document has no /Contents marker after /ByteRange".to_string(),
                )
            })?;

        let open = find_byte_from(bytes, b'<', contents_marker).ok_or_else(|| {
            SignError::PdfStructure("No '<' after /Contents marker".to_string())
        })?;
        let contents_start = open + 1;
        let contents_end = contents_start + 2 * reserved_signature_bytes;

        if bytes.get(contents_end) != Some(&b'>') {
            return Err(SignError::PdfStructure(format!(
                "Reserved hex region does not end with '>' at offset {contents_end}"
            )));
        }

        SignaturePlaceholder::new(
            reserved_signature_bytes,
            byte_range_offset,
            contents_start,
            contents_end,
            bytes.len(),
        )
    }

    /// Splice the DER signature into the reserved region and rewrite the
    /// `/ByteRange` array. Every byte outside the two rewritten spans is
    /// untouched and the total length is preserved.
    pub fn splice(
        &self,
        prepared: &PreparedPdfFile,
        signature_der: &[u8],
    ) -> SignResult<SignedPdfFile> {
        let placeholder = prepared.placeholder();
        let signature_hex = hex::encode_upper(signature_der);

        if signature_hex.len() > placeholder.reserved_hex_len() {
            return Err(SignError::PlaceholderOverflow(format!(
                "Signature needs {} hex chars but only {} are reserved",
                signature_hex.len(),
                placeholder.reserved_hex_len()
            )));
        }

        let mut bytes = prepared.bytes().to_vec();

        self.rewrite_byte_range(&mut bytes, placeholder)?;

        // Right-pad with '0' to exactly fill the reserved hex length.
        let region = &mut bytes[placeholder.contents_start..placeholder.contents_end];
        region[..signature_hex.len()].copy_from_slice(signature_hex.as_bytes());
        for byte in region[signature_hex.len()..].iter_mut() {
            *byte = b'0';
        }

        debug_assert_eq!(bytes.len(), placeholder.total_len);
        log::debug!(
            "Spliced {} DER bytes into reserved region of {} hex chars",
            signature_der.len(),
            placeholder.reserved_hex_len()
        );
        Ok(SignedPdfFile::from_bytes(bytes))
    }

    fn rewrite_byte_range(
        &self,
        bytes: &mut [u8],
        placeholder: &SignaturePlaceholder,
    ) -> SignResult<()> {
        let open = find_byte_from(bytes, b'[', placeholder.byte_range_offset).ok_or_else(|| {
            SignError::PdfStructure("No '[' after /ByteRange marker".to_string())
        })?;
        let close = find_byte_from(bytes, b']', open).ok_or_else(|| {
            SignError::PdfStructure("No ']' closing the /ByteRange array".to_string())
        })?;

        let literal = placeholder.byte_range().to_pdf_array();
        let span = &mut bytes[open..=close];
        if literal.len() > span.len() {
            return Err(SignError::PdfStructure(format!(
                "ByteRange literal of {} chars exceeds reserved span of {}",
                literal.len(),
                span.len()
            )));
        }
        span[..literal.len()].copy_from_slice(literal.as_bytes());
        for byte in span[literal.len()..].iter_mut() {
            *byte = b' ';
        }
        Ok(())
    }
}

/// Last occurrence of `needle` in `haystack`.
fn find_last(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .rev()
        .find(|&i| &haystack[i..i + needle.len()] == needle)
}

/// First occurrence of `needle` at or after `from`.
fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

fn find_byte_from(haystack: &[u8], byte: u8, from: usize) -> Option<usize> {
    haystack[from.min(haystack.len())..]
        .iter()
        .position(|&b| b == byte)
        .map(|i| from + i)
}
