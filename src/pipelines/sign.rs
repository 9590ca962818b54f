//! `SignWorkflow` orchestrates the signing stages.
//!
//! Explicit pipeline of fallible stages over one document:
//! placeholder injection, range capture, detached signature construction,
//! splice. Each stage either produces the next stage's input or a typed
//! failure; no stage is retried, and no partially spliced document is ever
//! returned.

use crate::domain::credential::CertificateCredential;
use crate::domain::pdf::{PreparedPdfFile, SignedPdfFile, UnsignedPdfFile};
use crate::infra::error::SignResult;
use crate::services::{ByteRangeSplicer, CmsBuilderService, PlaceholderService};
use crate::SigningOptions;

pub struct SignWorkflow {
    reserved_signature_bytes: usize,
}

impl SignWorkflow {
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

    /// Sign `pdf_bytes` with `credential`, producing the spliced document.
    pub fn run(
        &self,
        pdf_bytes: &[u8],
        credential: &CertificateCredential,
        options: &SigningOptions,
    ) -> SignResult<SignedPdfFile> {
        let unsigned = UnsignedPdfFile::new(pdf_bytes.to_vec())?;

        // PlaceholderInjected: mutate the object graph and serialize once.
        let placeholder_service = PlaceholderService::new(self.reserved_signature_bytes);
        let serialized = placeholder_service.inject(&unsigned, options)?;

        // RangeComputed: measure the serialized buffer that will ship.
        let splicer = ByteRangeSplicer::new();
        let placeholder = splicer.locate(&serialized, self.reserved_signature_bytes)?;
        let prepared = PreparedPdfFile::new(serialized, placeholder)?;
        log::info!(
            "Placeholder ready: byte range {:?} over {} bytes",
            prepared.placeholder().byte_range().0,
            prepared.placeholder().total_len
        );

        // SignatureComputed: detached CMS over everything outside the
        // reserved region.
        let signed_content = prepared.signed_content();
        let cms = CmsBuilderService::new().build_signed_data(
            &signed_content,
            credential,
            options.signing_time,
        )?;

        // Spliced: overwrite the reserved spans, preserving total length.
        splicer.splice(&prepared, cms.as_der())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants;

    #[test]
    fn construct_workflow() {
        let workflow = SignWorkflow::new(constants::DEFAULT_RESERVED_SIGNATURE_BYTES);
        assert_eq!(
            workflow.reserved_signature_bytes(),
            constants::DEFAULT_RESERVED_SIGNATURE_BYTES
        );
    }

    #[test]
    fn rejects_non_pdf_input() {
        let workflow = SignWorkflow::new(64);
        let rsa = openssl::rsa::Rsa::generate(2048).unwrap();
        let pkey = openssl::pkey::PKey::from_rsa(rsa).unwrap();
        let mut name = openssl::x509::X509NameBuilder::new().unwrap();
        name.append_entry_by_text("CN", "X").unwrap();
        let name = name.build();
        let mut builder = openssl::x509::X509Builder::new().unwrap();
        let serial = openssl::bn::BigNum::from_u32(1)
            .unwrap()
            .to_asn1_integer()
            .unwrap();
        builder.set_serial_number(&serial).unwrap();
        builder.set_subject_name(&name).unwrap();
        builder.set_issuer_name(&name).unwrap();
        builder.set_pubkey(&pkey).unwrap();
        builder
            .set_not_before(&openssl::asn1::Asn1Time::days_from_now(0).unwrap())
            .unwrap();
        builder
            .set_not_after(&openssl::asn1::Asn1Time::days_from_now(1).unwrap())
            .unwrap();
        builder
            .sign(&pkey, openssl::hash::MessageDigest::sha256())
            .unwrap();
        let credential =
            crate::domain::credential::CertificateCredential::new(pkey, builder.build());

        let err = workflow
            .run(b"not a pdf", &credential, &SigningOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            crate::infra::error::SignError::PdfStructure(_)
        ));
    }
}
