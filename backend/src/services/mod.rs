//! Business rules that sit between the HTTP layer and the repositories.

pub mod validation;

pub use validation::{
    is_valid_email, is_valid_phone, quick_check, validate_required_fields, validate_student,
    validate_update_fields, FieldError, ValidationResult,
};
