//! Verification service: locates and reports on an embedded signature.
//!
//! Walks the document's object graph to the first signature field, pulls
//! the signature dictionary metadata, and decodes the embedded CMS
//! structure for certificate details. A document without a signature field
//! is a valid non-error outcome (`None`), distinguished from structural
//! corruption which fails with `PdfStructure`.
//!
//! This service reports on the signature; it does not recompute the digest
//! over the declared byte range, so `is_valid` attests structure only.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Document, Object};
use openssl::asn1::{Asn1Time, Asn1TimeRef};
use openssl::x509::{X509NameRef, X509};

use crate::domain::pdf::ByteRange;
use crate::domain::types::PdfDate;
use crate::domain::verification::{CertificateInfo, SignatureReport};
use crate::infra::error::{SignError, SignResult};
use crate::services::cms_parser::CmsParserService;
use crate::services::placeholder::{resolve_acroform_fields, resolve_dict};

pub struct VerificationService;

impl Default for VerificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Inspect `pdf_bytes` for a signature.
    ///
    /// Returns `Ok(None)` when the document parses but carries no
    /// signature field (or the field has no usable `/V` dictionary).
    ///
    /// # Errors
    /// `PdfStructure` for input that is not a parseable PDF; `Asn1Parse`
    /// for a `/Contents` value with no decodable CMS structure.
    pub fn verify(&self, pdf_bytes: &[u8]) -> SignResult<Option<SignatureReport>> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| SignError::PdfStructure(format!("Failed to parse PDF: {e}")))?;

        let Ok(catalog) = doc.catalog() else {
            return Err(SignError::PdfStructure(
                "Document has no catalog".to_string(),
            ));
        };

        let Some(fields) = resolve_acroform_fields(&doc, catalog) else {
            log::debug!("No AcroForm/Fields present; reporting no signature");
            return Ok(None);
        };

        let Some(sig_field) = fields.iter().find_map(|field| {
            let dict = resolve_dict(&doc, field)?;
            let ft = dict.get(b"FT").ok()?.as_name_str().ok()?;
            (ft == "Sig").then_some(dict)
        }) else {
            return Ok(None);
        };

        let Some(sig_dict) = sig_field
            .get(b"V")
            .ok()
            .and_then(|v| resolve_dict(&doc, v))
        else {
            return Ok(None);
        };

        let Some(contents) = extract_bytes(&doc, sig_dict, b"Contents") else {
            return Ok(None);
        };
        let Some(byte_range) = extract_byte_range(&doc, sig_dict) else {
            return Ok(None);
        };

        let parsed = CmsParserService::new().parse(&contents)?;
        let certificate = parsed
            .certificate
            .as_ref()
            .map(certificate_info)
            .transpose()?;

        let signing_time = extract_string(&doc, sig_dict, b"M")
            .or_else(|| extract_string(&doc, sig_dict, b"SigningTime"))
            .and_then(|s| PdfDate::parse(&s).ok())
            .map_or_else(Utc::now, |d| d.as_datetime());

        Ok(Some(SignatureReport {
            signature_exists: true,
            // Structural parse success only; see module docs.
            is_valid: true,
            signer_name: extract_string(&doc, sig_dict, b"Name")
                .unwrap_or_else(|| "Unknown".to_string()),
            reason: extract_string(&doc, sig_dict, b"Reason").unwrap_or_default(),
            location: extract_string(&doc, sig_dict, b"Location"),
            contact_info: extract_string(&doc, sig_dict, b"ContactInfo"),
            signing_time,
            sub_filter: extract_string(&doc, sig_dict, b"SubFilter"),
            digest_algorithm: parsed.digest_algorithm,
            byte_range: Some(byte_range),
            certificate,
        }))
    }
}

/// Extract a text value: literal/hex strings decode as text, names render
/// with their leading slash.
fn extract_string(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let object = resolve_value(doc, dict.get(key).ok()?)?;
    match object {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Object::Name(name) => Some(format!("/{}", String::from_utf8_lossy(name))),
        _ => None,
    }
}

fn extract_bytes(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<Vec<u8>> {
    match resolve_value(doc, dict.get(key).ok()?)? {
        Object::String(bytes, _) => Some(bytes.clone()),
        _ => None,
    }
}

fn extract_byte_range(doc: &Document, dict: &Dictionary) -> Option<ByteRange> {
    let object = resolve_value(doc, dict.get(b"ByteRange").ok()?)?;
    let array = object.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let mut values = [0i64; 4];
    for (slot, item) in values.iter_mut().zip(array.iter()) {
        *slot = item.as_i64().ok()?;
    }
    Some(ByteRange(values))
}

fn resolve_value<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Pull issuer/subject maps, validity interval and serial from an X.509
/// certificate.
fn certificate_info(cert: &X509) -> SignResult<CertificateInfo> {
    Ok(CertificateInfo {
        issuer: name_entries(cert.issuer_name()),
        subject: name_entries(cert.subject_name()),
        valid_from: asn1_time_to_utc(cert.not_before())?,
        valid_to: asn1_time_to_utc(cert.not_after())?,
        serial_number: cert
            .serial_number()
            .to_bn()
            .ok()
            .and_then(|bn| bn.to_hex_str().ok().map(|s| s.to_string())),
    })
}

fn name_entries(name: &X509NameRef) -> BTreeMap<String, String> {
    name.entries()
        .map(|entry| {
            let key = entry
                .object()
                .nid()
                .short_name()
                .unwrap_or("UNKNOWN")
                .to_string();
            let value = String::from_utf8_lossy(entry.data().as_slice()).into_owned();
            (key, value)
        })
        .collect()
}

fn asn1_time_to_utc(time: &Asn1TimeRef) -> SignResult<DateTime<Utc>> {
    let epoch = Asn1Time::from_unix(0)
        .map_err(|e| SignError::Certificate(format!("epoch conversion: {e}")))?;
    let diff = epoch
        .diff(time)
        .map_err(|e| SignError::Certificate(format!("validity conversion: {e}")))?;
    let seconds = i64::from(diff.days) * 86_400 + i64::from(diff.secs);
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .ok_or_else(|| SignError::Certificate("certificate validity out of range".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_pdf_bytes_fail_with_pdf_structure() {
        let err = VerificationService::new()
            .verify(b"this is not a pdf at all")
            .unwrap_err();
        assert!(matches!(err, SignError::PdfStructure(_)));
    }
}
