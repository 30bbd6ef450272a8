pub mod certificate;
pub mod form;
pub mod submission;
pub mod village;

pub use certificate::*;
pub use form::*;
pub use submission::*;
pub use village::*;
