//! Domain models for the SOAP notes system.

mod note;
mod patient;

pub use note::*;
pub use patient::*;
