//! Service layer module root.
//! Stateless services implementing the signing and verification steps.

pub mod attr_builder;
pub mod cms_builder;
pub mod cms_parser;
pub mod container;
pub mod placeholder;
pub mod signer;
pub mod splicer;
pub mod verification;

pub use attr_builder::{AttributeBuildOutput, AttributeBuilderService};
pub use cms_builder::CmsBuilderService;
pub use cms_parser::{CmsParserService, ParsedCms};
pub use container::ContainerImportService;
pub use placeholder::PlaceholderService;
pub use signer::{AccountSigner, CertificateSigner, CredentialSigner};
pub use splicer::ByteRangeSplicer;
pub use verification::VerificationService;
