//! Workflow facades sequencing the service layer.

pub mod sign;
pub mod verify;

pub use sign::SignWorkflow;
pub use verify::VerifyWorkflow;
