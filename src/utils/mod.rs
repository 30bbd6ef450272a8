pub mod response;
pub mod upload;
pub mod validation;

pub use response::{ApiError, ApiResponse};
