pub mod validation_service;

pub use validation_service::{ValidationResponse, ValidationService};
