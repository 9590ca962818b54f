//! Minimal DER encode/decode helpers shared by the CMS builder and parser.
//!
//! Only the small subset of DER the engine needs: definite-length
//! encoding up to three length bytes, and a forward-only reader over
//! tag/length/value triplets.

use crate::infra::error::{SignError, SignResult};

/// Encode a definite DER length (short form, or long form up to 3 bytes).
#[must_use]
pub fn encode_len(len: usize) -> Vec<u8> {
    if len < 128 {
        vec![len as u8]
    } else if len < 256 {
        vec![0x81, len as u8]
    } else if len < 65536 {
        vec![0x82, (len >> 8) as u8, (len & 0xFF) as u8]
    } else {
        vec![
            0x83,
            (len >> 16) as u8,
            (len >> 8) as u8,
            (len & 0xFF) as u8,
        ]
    }
}

/// Wrap `content` in `tag` with a definite length header.
#[must_use]
pub fn wrap(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 5);
    out.push(tag);
    out.extend_from_slice(&encode_len(content.len()));
    out.extend_from_slice(content);
    out
}

/// One decoded tag/length/value element.
#[derive(Debug, Clone, Copy)]
pub struct DerElement<'a> {
    pub tag: u8,
    pub content: &'a [u8],
}

/// Forward-only reader over a DER byte sequence.
pub struct DerReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Peek the next element's tag without consuming it.
    pub fn peek_tag(&self) -> SignResult<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| SignError::Asn1Parse("Unexpected end of DER data".to_string()))
    }

    /// Read the next tag/length/value element.
    pub fn read_element(&mut self) -> SignResult<DerElement<'a>> {
        let tag = self.peek_tag()?;
        let mut cursor = self.pos + 1;

        let len_byte = *self.data.get(cursor).ok_or_else(|| {
            SignError::Asn1Parse("DER element truncated before length".to_string())
        })?;
        cursor += 1;

        let content_len = if len_byte & 0x80 == 0 {
            len_byte as usize
        } else {
            let num_bytes = (len_byte & 0x7f) as usize;
            if num_bytes == 0 || num_bytes > 4 {
                return Err(SignError::Asn1Parse(format!(
                    "Unsupported DER length form: 0x{len_byte:02x}"
                )));
            }
            let mut len = 0usize;
            for _ in 0..num_bytes {
                let b = *self.data.get(cursor).ok_or_else(|| {
                    SignError::Asn1Parse("DER length bytes truncated".to_string())
                })?;
                len = (len << 8) | b as usize;
                cursor += 1;
            }
            len
        };

        let end = cursor.checked_add(content_len).filter(|e| *e <= self.data.len());
        let Some(end) = end else {
            return Err(SignError::Asn1Parse(format!(
                "DER declared length {content_len} exceeds available {}",
                self.data.len() - cursor
            )));
        };

        let element = DerElement {
            tag,
            content: &self.data[cursor..end],
        };
        self.pos = end;
        Ok(element)
    }

    /// Read the next element, requiring a specific tag.
    pub fn expect(&mut self, tag: u8) -> SignResult<DerElement<'a>> {
        let found = self.peek_tag()?;
        if found != tag {
            return Err(SignError::Asn1Parse(format!(
                "Expected DER tag 0x{tag:02x}, got 0x{found:02x}"
            )));
        }
        self.read_element()
    }

    /// Skip the next element.
    pub fn skip(&mut self) -> SignResult<()> {
        self.read_element().map(|_| ())
    }

    /// The raw bytes of the next element including its header, consumed.
    pub fn read_raw(&mut self) -> SignResult<&'a [u8]> {
        let start = self.pos;
        self.read_element()?;
        Ok(&self.data[start..self.pos])
    }
}
