pub mod certificate;
pub mod content;
pub mod pages;
