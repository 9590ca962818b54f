//! `VerifyWorkflow`: high-level facade for inspecting signed documents.
//!
//! Delegates to `VerificationService`; keeps symmetry with the sign
//! workflow.

use crate::domain::verification::SignatureReport;
use crate::infra::error::SignResult;
use crate::services::VerificationService;

pub struct VerifyWorkflow {
    svc: VerificationService,
}

impl Default for VerifyWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl VerifyWorkflow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            svc: VerificationService::new(),
        }
    }

    /// Run verification over document bytes. `Ok(None)` means the document
    /// is well-formed but carries no signature.
    pub fn run(&self, pdf_bytes: &[u8]) -> SignResult<Option<SignatureReport>> {
        self.svc.verify(pdf_bytes)
    }
}
