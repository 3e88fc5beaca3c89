//! Student identity models.
//!
//! The record is supplied by the caller (usually the faculty screen after a
//! student lookup) and is read-only here. Fields arrive as strings or numbers
//! and are kept as text.

use resultmail_core::serde::deserialize_optional_text;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Identity of the student whose result is being delivered.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// Unique key of the student; names the result document.
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    #[validate(
        required(message = "enrollmentNo is required"),
        custom(function = "not_blank", message = "enrollmentNo must not be blank")
    )]
    pub enrollment_no: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub middle_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub branch: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub semester: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub parent_email: Option<String>,
}

impl StudentRecord {
    pub fn enrollment_no(&self) -> &str {
        self.enrollment_no.as_deref().map(str::trim).unwrap_or("")
    }

    /// First, middle and last name joined by single spaces.
    ///
    /// A blank middle name leaves a double space, matching the printed layout.
    pub fn full_name(&self) -> String {
        format!(
            "{} {} {}",
            text(&self.first_name),
            text(&self.middle_name),
            text(&self.last_name)
        )
    }

    pub fn branch(&self) -> &str {
        text(&self.branch)
    }

    pub fn semester(&self) -> &str {
        text(&self.semester)
    }

    pub fn email(&self) -> Option<&str> {
        non_blank(&self.email)
    }

    pub fn parent_email(&self) -> Option<&str> {
        non_blank(&self.parent_email)
    }
}

fn text(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("")
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserializes_camel_case_and_numbers() {
        let student: StudentRecord = serde_json::from_value(json!({
            "enrollmentNo": "E100",
            "firstName": "A",
            "middleName": "",
            "lastName": "B",
            "branch": "CS",
            "semester": 5,
            "email": "a@x.com",
            "parentEmail": "",
            "_id": "65f0c0ffee"
        }))
        .unwrap();

        assert_eq!(student.enrollment_no(), "E100");
        assert_eq!(student.semester(), "5");
        assert_eq!(student.full_name(), "A  B");
        assert_eq!(student.email(), Some("a@x.com"));
        assert_eq!(student.parent_email(), None);
        assert!(student.validate().is_ok());
    }

    #[test]
    fn test_missing_enrollment_fails_validation() {
        let student: StudentRecord =
            serde_json::from_value(json!({ "firstName": "A" })).unwrap();
        assert!(student.validate().is_err());
    }

    #[test]
    fn test_blank_enrollment_fails_validation() {
        let student: StudentRecord =
            serde_json::from_value(json!({ "enrollmentNo": "   " })).unwrap();
        assert!(student.validate().is_err());
    }

    #[test]
    fn test_numeric_enrollment_is_accepted() {
        let student: StudentRecord =
            serde_json::from_value(json!({ "enrollmentNo": 20210042 })).unwrap();
        assert_eq!(student.enrollment_no(), "20210042");
        assert!(student.validate().is_ok());
    }
}
