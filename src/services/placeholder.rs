//! Signature placeholder injection service.
//!
//! Mutates a PDF's object graph to add the signature dictionary (with a
//! zero-filled reserved `/Contents` hex string and a wide `/ByteRange`
//! placeholder), a signature form field with an invisible widget
//! annotation, and the `/AcroForm` registration, then serializes with the
//! classic cross-reference writer so no object gets moved into an object
//! stream after offsets are measured.

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};

use crate::domain::constants;
use crate::domain::pdf::UnsignedPdfFile;
use crate::domain::types::PdfDate;
use crate::infra::error::{SignError, SignResult};
use crate::SigningOptions;

pub struct PlaceholderService {
    reserved_signature_bytes: usize,
}

impl Default for PlaceholderService {
    fn default() -> Self {
        Self::new(constants::DEFAULT_RESERVED_SIGNATURE_BYTES)
    }
}

impl PlaceholderService {
    #[must_use]
    pub fn new(reserved_signature_bytes: usize) -> Self {
        Self {
            reserved_signature_bytes,
        }
    }

    #[must_use]
    pub fn reserved_signature_bytes(&self) -> usize {
        self.reserved_signature_bytes
    }

    /// Inject the placeholder and serialize. Returns the serialized bytes;
    /// offset capture over this exact buffer is the next stage's job.
    pub fn inject(
        &self,
        unsigned: &UnsignedPdfFile,
        options: &SigningOptions,
    ) -> SignResult<Vec<u8>> {
        let mut doc = Document::load_mem(unsigned.bytes())
            .map_err(|e| SignError::PdfStructure(format!("Failed to parse PDF: {e}")))?;

        self.ensure_no_existing_signature(&doc)?;

        let first_page = doc
            .get_pages()
            .values()
            .next()
            .copied()
            .ok_or_else(|| SignError::PdfStructure("Document has no pages".to_string()))?;

        let sig_dict_id = self.add_signature_dictionary(&mut doc, options);
        let field_id = self.add_signature_field(&mut doc, sig_dict_id, first_page);
        self.register_acroform(&mut doc, field_id)?;
        self.add_to_page_annots(&mut doc, first_page, field_id)?;

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| SignError::PdfStructure(format!("Failed to serialize PDF: {e}")))?;
        log::debug!(
            "Injected signature placeholder ({} reserved bytes), serialized {} bytes",
            self.reserved_signature_bytes,
            buffer.len()
        );
        Ok(buffer)
    }

    /// One signature field per document; re-signing is out of scope.
    fn ensure_no_existing_signature(&self, doc: &Document) -> SignResult<()> {
        let Ok(catalog) = doc.catalog() else {
            return Ok(());
        };
        let Some(fields) = resolve_acroform_fields(doc, catalog) else {
            return Ok(());
        };
        for field in &fields {
            let Some(dict) = resolve_dict(doc, field) else {
                continue;
            };
            if let Ok(ft) = dict.get(b"FT") {
                if ft.as_name_str().map(|n| n == "Sig").unwrap_or(false) {
                    return Err(SignError::Validation(
                        "Document already carries a signature field".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn add_signature_dictionary(&self, doc: &mut Document, options: &SigningOptions) -> ObjectId {
        let mut sig_dict = Dictionary::new();
        sig_dict.set("Type", Object::Name(b"Sig".to_vec()));
        sig_dict.set("Filter", Object::Name(constants::SIG_FILTER.as_bytes().to_vec()));
        sig_dict.set(
            "SubFilter",
            Object::Name(constants::SIG_SUBFILTER.as_bytes().to_vec()),
        );
        sig_dict.set(
            "Name",
            Object::String(options.name.clone().into_bytes(), StringFormat::Literal),
        );
        sig_dict.set(
            "Reason",
            Object::String(options.reason.clone().into_bytes(), StringFormat::Literal),
        );
        sig_dict.set(
            "Location",
            Object::String(options.location.clone().into_bytes(), StringFormat::Literal),
        );
        sig_dict.set(
            "ContactInfo",
            Object::String(
                options.contact_info.clone().into_bytes(),
                StringFormat::Literal,
            ),
        );
        sig_dict.set(
            "M",
            Object::String(
                PdfDate::new(options.signing_time).to_pdf_string().into_bytes(),
                StringFormat::Literal,
            ),
        );
        // Wide placeholder values reserve the decimal width needed for the
        // in-place rewrite once the real offsets are known.
        sig_dict.set(
            "ByteRange",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(constants::BYTE_RANGE_PLACEHOLDER_VALUE),
                Object::Integer(constants::BYTE_RANGE_PLACEHOLDER_VALUE),
                Object::Integer(constants::BYTE_RANGE_PLACEHOLDER_VALUE),
            ]),
        );
        sig_dict.set(
            "Contents",
            Object::String(
                vec![0u8; self.reserved_signature_bytes],
                StringFormat::Hexadecimal,
            ),
        );
        doc.add_object(Object::Dictionary(sig_dict))
    }

    fn add_signature_field(
        &self,
        doc: &mut Document,
        sig_dict_id: ObjectId,
        page_id: ObjectId,
    ) -> ObjectId {
        let mut field_dict = Dictionary::new();
        field_dict.set("Type", Object::Name(b"Annot".to_vec()));
        field_dict.set("Subtype", Object::Name(b"Widget".to_vec()));
        field_dict.set("FT", Object::Name(b"Sig".to_vec()));
        field_dict.set(
            "T",
            Object::String(b"Signature1".to_vec(), StringFormat::Literal),
        );
        // Invisible widget: zero-area rectangle, print flag set.
        field_dict.set(
            "Rect",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(0),
            ]),
        );
        field_dict.set("F", Object::Integer(4));
        field_dict.set("V", Object::Reference(sig_dict_id));
        field_dict.set("P", Object::Reference(page_id));
        doc.add_object(Object::Dictionary(field_dict))
    }

    /// Register the field under `/AcroForm` with `/SigFlags 3`
    /// (SignaturesExist | AppendOnly).
    fn register_acroform(&self, doc: &mut Document, field_id: ObjectId) -> SignResult<()> {
        let existing = doc.catalog()?.get(b"AcroForm").ok().cloned();

        match existing {
            Some(Object::Reference(acroform_id)) => {
                let acroform = doc
                    .get_object_mut(acroform_id)
                    .map_err(|e| SignError::PdfStructure(format!("Broken AcroForm ref: {e}")))?
                    .as_dict_mut()
                    .map_err(|_| {
                        SignError::PdfStructure("AcroForm is not a dictionary".to_string())
                    })?;
                let mut fields = acroform
                    .get(b"Fields")
                    .ok()
                    .and_then(|f| f.as_array().ok().cloned())
                    .unwrap_or_default();
                fields.push(Object::Reference(field_id));
                acroform.set("Fields", Object::Array(fields));
                acroform.set("SigFlags", Object::Integer(3));
            }
            Some(Object::Dictionary(mut acroform)) => {
                let mut fields = acroform
                    .get(b"Fields")
                    .ok()
                    .and_then(|f| f.as_array().ok().cloned())
                    .unwrap_or_default();
                fields.push(Object::Reference(field_id));
                acroform.set("Fields", Object::Array(fields));
                acroform.set("SigFlags", Object::Integer(3));
                let acroform_id = doc.add_object(Object::Dictionary(acroform));
                doc.catalog_mut()?
                    .set("AcroForm", Object::Reference(acroform_id));
            }
            _ => {
                let mut acroform = Dictionary::new();
                acroform.set("Fields", Object::Array(vec![Object::Reference(field_id)]));
                acroform.set("SigFlags", Object::Integer(3));
                let acroform_id = doc.add_object(Object::Dictionary(acroform));
                doc.catalog_mut()?
                    .set("AcroForm", Object::Reference(acroform_id));
            }
        }
        Ok(())
    }

    fn add_to_page_annots(
        &self,
        doc: &mut Document,
        page_id: ObjectId,
        field_id: ObjectId,
    ) -> SignResult<()> {
        // Annots may be inline or behind a reference; normalize to inline.
        let annots_value = doc
            .get_object(page_id)
            .ok()
            .and_then(|o| o.as_dict().ok())
            .and_then(|d| d.get(b"Annots").ok().cloned());

        let mut annots = match annots_value {
            Some(Object::Array(existing)) => existing,
            Some(Object::Reference(annots_id)) => doc
                .get_object(annots_id)
                .ok()
                .and_then(|o| o.as_array().ok().cloned())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        annots.push(Object::Reference(field_id));

        let page = doc
            .get_object_mut(page_id)
            .map_err(|e| SignError::PdfStructure(format!("Failed to get page object: {e}")))?
            .as_dict_mut()
            .map_err(|_| SignError::PdfStructure("Page is not a dictionary".to_string()))?;
        page.set("Annots", Object::Array(annots));
        Ok(())
    }
}

/// Resolve the `/AcroForm` → `/Fields` array, following one reference level.
pub(crate) fn resolve_acroform_fields(doc: &Document, catalog: &Dictionary) -> Option<Vec<Object>> {
    let acroform = catalog.get(b"AcroForm").ok()?;
    let acroform_dict = match acroform {
        Object::Reference(id) => doc.get_dictionary(*id).ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };
    let fields = acroform_dict.get(b"Fields").ok()?;
    let fields = match fields {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?,
        Object::Array(array) => array,
        _ => return None,
    };
    Some(fields.clone())
}

/// Resolve an object (possibly a reference) to a dictionary.
pub(crate) fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match object {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}
