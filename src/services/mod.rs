pub mod content;
pub mod dakhala;
pub mod submission;

pub use content::ContentService;
pub use dakhala::{CertificateRequestForm, Notice, SubmissionOutcome};
pub use submission::SharedSubmitter;
