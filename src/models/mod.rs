pub mod validation;
pub mod calculation;

pub use validation::{ValidateQuery, ValidationOptions, ValidationResult};
pub use calculation::CalculationResult;
