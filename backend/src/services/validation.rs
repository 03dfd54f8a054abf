//! Validation rules for student records.
//!
//! Two rule sets share the same field checks:
//! - [`validate_student`] is used when a record is created and requires the
//!   core fields (`name`, `email`).
//! - [`validate_update_fields`] is used for replacements and only checks
//!   fields that carry a non-default value.
//!
//! [`quick_check`] is the lightweight gate the create handler runs right after
//! decoding, before the comprehensive rules. It keeps its own, narrower age
//! window; both gates are applied independently.
//!
//! None of these functions fail on malformed input: they always return a
//! result describing every problem found.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use crate::models::{Group, Student};

pub const NAME_MAX_CHARS: usize = 100;
pub const ADDRESS_MAX_CHARS: usize = 500;
pub const MENTOR_MAX_CHARS: usize = 100;
pub const SUBJECTS_MAX_ENTRIES: usize = 10;
pub const SUBJECT_MAX_CHARS: usize = 50;

/// Age window enforced on creation (0 means unset).
pub const CREATE_AGE_RANGE: RangeInclusive<i32> = 5..=100;
/// Age window enforced on replacement (0 means unset).
pub const UPDATE_AGE_RANGE: RangeInclusive<i32> = 5..=20;
/// Exclusive upper bound of the handler quick check (`0 <= age < 20`).
pub const QUICK_CHECK_AGE_LIMIT: i32 = 20;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of validating a record. Errors keep the order rules ran in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Record a failure; the result becomes invalid.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(FieldError::new(field, message));
    }

    /// All messages reported for `field`.
    pub fn field_errors(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Update,
}

/// Validate a record about to be created.
pub fn validate_student(student: &Student) -> ValidationResult {
    run_rules(student, Mode::Create)
}

/// Validate a replacement record. Required checks are skipped and only
/// non-default fields are inspected.
pub fn validate_update_fields(student: &Student) -> ValidationResult {
    run_rules(student, Mode::Update)
}

/// Names of the required fields (`name`, `email`) that are blank.
pub fn validate_required_fields(student: &Student) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if student.name.trim().is_empty() {
        missing.push("name");
    }
    if student.email.trim().is_empty() {
        missing.push("email");
    }
    missing
}

/// Decode-time gate used by the create handler. Reports the first failing
/// field only.
pub fn quick_check(student: &Student) -> Result<(), FieldError> {
    if student.age < 0 || student.age >= QUICK_CHECK_AGE_LIMIT {
        return Err(FieldError::new(
            "age",
            format!("age must be between 0 and {}", QUICK_CHECK_AGE_LIMIT),
        ));
    }
    if !simple_email_regex().is_match(&student.email) {
        return Err(FieldError::new("email", "invalid email format"));
    }
    if !student.group_name.is_empty() && !Group::is_valid(&student.group_name) {
        return Err(FieldError::new("group", group_message()));
    }
    Ok(())
}

fn run_rules(student: &Student, mode: Mode) -> ValidationResult {
    let mut result = ValidationResult::new();

    match mode {
        Mode::Create => {
            if student.name.trim().is_empty() {
                result.add("name", "name is required");
            } else if char_len(&student.name) > NAME_MAX_CHARS {
                result.add("name", name_length_message());
            }

            if student.email.trim().is_empty() {
                result.add("email", "email is required");
            } else if !is_valid_email(&student.email) {
                result.add("email", "invalid email format");
            }
        }
        Mode::Update => {
            if !student.name.is_empty() && char_len(&student.name) > NAME_MAX_CHARS {
                result.add("name", name_length_message());
            }
            if !student.email.is_empty() && !is_valid_email(&student.email) {
                result.add("email", "invalid email format");
            }
        }
    }

    let age_range = match mode {
        Mode::Create => CREATE_AGE_RANGE,
        Mode::Update => UPDATE_AGE_RANGE,
    };
    if student.age != 0 && !age_range.contains(&student.age) {
        result.add(
            "age",
            format!(
                "age must be between {} and {}",
                age_range.start(),
                age_range.end()
            ),
        );
    }

    if !student.group_name.is_empty() && !Group::is_valid(&student.group_name) {
        result.add("group", group_message());
    }

    if student.tuition_fee < 0.0 {
        result.add("tuition_fee", "tuition fee cannot be negative");
    } else if !student.tuition_fee.is_finite() {
        result.add("tuition_fee", "tuition fee must be a finite number");
    }

    if !student.phone.is_empty() && !is_valid_phone(&student.phone) {
        result.add("phone", "invalid phone number format");
    }

    if char_len(&student.address) > ADDRESS_MAX_CHARS {
        result.add(
            "address",
            format!("address must not exceed {} characters", ADDRESS_MAX_CHARS),
        );
    }

    if char_len(&student.mentor) > MENTOR_MAX_CHARS {
        result.add(
            "mentor",
            format!("mentor name must not exceed {} characters", MENTOR_MAX_CHARS),
        );
    }

    if student.subjects.len() > SUBJECTS_MAX_ENTRIES {
        result.add(
            "subjects",
            format!("cannot have more than {} subjects", SUBJECTS_MAX_ENTRIES),
        );
    }

    for (index, subject) in student.subjects.iter().enumerate() {
        if subject.trim().is_empty() {
            result.add(
                "subjects",
                format!("subject at index {} cannot be empty", index),
            );
        }
        if char_len(subject) > SUBJECT_MAX_CHARS {
            result.add(
                "subjects",
                format!(
                    "subject at index {} must not exceed {} characters",
                    index, SUBJECT_MAX_CHARS
                ),
            );
        }
    }

    result
}

/// RFC 5322 style address check.
///
/// Accepts a bare `addr-spec` (`local@domain`) or a `display-name <addr-spec>`
/// mailbox. The local part is a dot-atom or a quoted string; the domain is a
/// dot-atom or a bracketed literal.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if addr_spec_regex().is_match(email) {
        return true;
    }
    mailbox_regex()
        .captures(email)
        .and_then(|caps| caps.get(1))
        .is_some_and(|addr| addr_spec_regex().is_match(addr.as_str()))
}

/// Accepts 10 to 15 digits once spaces, parentheses, hyphens and plus signs
/// are removed.
pub fn is_valid_phone(phone: &str) -> bool {
    let cleaned = phone_formatting_regex().replace_all(phone, "");
    phone_digits_regex().is_match(&cleaned)
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn name_length_message() -> String {
    format!("name must not exceed {} characters", NAME_MAX_CHARS)
}

fn group_message() -> String {
    let names: Vec<&str> = Group::ALL.iter().map(Group::as_str).collect();
    format!("group must be one of: {}", names.join(", "))
}

const ATEXT: &str = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]";

fn addr_spec_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let dot_atom = format!(r"{ATEXT}+(?:\.{ATEXT}+)*");
        let quoted = r#""(?:[^"\\\r\n]|\\.)*""#;
        let literal = r"\[[^\[\]\\\r\n]*\]";
        Regex::new(&format!(
            r"^(?:{dot_atom}|{quoted})@(?:{dot_atom}|{literal})$"
        ))
        .expect("address pattern is valid")
    })
}

fn mailbox_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(?:"(?:[^"\\]|\\.)*"|[^<>"@]*)\s*<([^<>\s]+)>$"#)
            .expect("mailbox pattern is valid")
    })
}

fn simple_email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern is valid")
    })
}

fn phone_formatting_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s\-()+]").expect("phone formatting pattern is valid"))
}

fn phone_digits_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{10,15}$").expect("phone pattern is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_forms() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(is_valid_email("Ada Lovelace <ada@example.com>"));
        assert!(is_valid_email("\"Ada L\" <ada@example.com>"));
        assert!(is_valid_email("\"odd local\"@example.com"));
        assert!(is_valid_email("ada@[192.168.0.1]"));
        assert!(is_valid_email("root@localhost"));

        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("ada@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada..lovelace@example.com"));
        assert!(!is_valid_email("ada@example..com"));
        assert!(!is_valid_email("ada lovelace@example.com"));
        assert!(!is_valid_email("Ada <not-an-email>"));
    }

    #[test]
    fn test_phone_normalization() {
        assert!(is_valid_phone("(555) 123-4567"));
        assert!(is_valid_phone("+1 555 123 4567"));
        assert!(is_valid_phone("123456789012345"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("1234567890123456"));
        assert!(!is_valid_phone("555-CALL-NOW1"));
    }

    #[test]
    fn test_quick_check_age_window() {
        let mut student = Student::new("Ada", "ada@example.com");
        assert!(quick_check(&student).is_ok());

        student.age = 19;
        assert!(quick_check(&student).is_ok());

        student.age = 20;
        assert_eq!(quick_check(&student).unwrap_err().field, "age");

        student.age = -1;
        assert_eq!(quick_check(&student).unwrap_err().field, "age");
    }

    #[test]
    fn test_quick_check_reports_first_failure_only() {
        let mut student = Student::new("Ada", "broken");
        student.group_name = "Math".to_string();
        let err = quick_check(&student).unwrap_err();
        assert_eq!(err.field, "email");
    }

    #[test]
    fn test_result_field_errors() {
        let mut result = ValidationResult::new();
        assert!(result.is_valid);
        result.add("subjects", "first");
        result.add("name", "second");
        result.add("subjects", "third");
        assert!(!result.is_valid);
        assert_eq!(result.field_errors("subjects"), vec!["first", "third"]);
        assert!(result.has_error_for("name"));
        assert!(!result.has_error_for("email"));
    }
}
