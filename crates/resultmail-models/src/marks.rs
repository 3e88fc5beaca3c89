//! Marks models.
//!
//! Each grouping maps a subject to a mark. Marks are display values: they are
//! never parsed, rounded or checked, and subjects keep the order in which the
//! caller listed them.

use resultmail_core::serde::display_scalar;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Internal and external marks of one student.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, ToSchema)]
pub struct MarksRecord {
    /// Subject to mark, e.g. `{"DS": "88"}`.
    #[serde(default, deserialize_with = "deserialize_grouping")]
    #[schema(value_type = Object)]
    pub internal: Map<String, Value>,
    /// Subject to mark, e.g. `{"DS": 92}`.
    #[serde(default, deserialize_with = "deserialize_grouping")]
    #[schema(value_type = Object)]
    pub external: Map<String, Value>,
}

impl MarksRecord {
    /// `(subject, mark)` pairs of the internal grouping in caller order.
    pub fn internal_entries(&self) -> Vec<(&str, String)> {
        entries(&self.internal)
    }

    /// `(subject, mark)` pairs of the external grouping in caller order.
    pub fn external_entries(&self) -> Vec<(&str, String)> {
        entries(&self.external)
    }
}

fn entries(group: &Map<String, Value>) -> Vec<(&str, String)> {
    group
        .iter()
        .map(|(subject, mark)| {
            let shown = display_scalar(mark).unwrap_or_else(|| mark.to_string());
            (subject.as_str(), shown)
        })
        .collect()
}

/// A missing or `null` grouping is an empty grouping.
fn deserialize_grouping<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let group: Option<Map<String, Value>> = Option::deserialize(deserializer)?;
    Ok(group.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entries_keep_caller_order() {
        let marks: MarksRecord = serde_json::from_str(
            r#"{"internal": {"Math": "90", "Eng": "85", "Bio": "70"}}"#,
        )
        .unwrap();

        let subjects: Vec<&str> = marks.internal_entries().iter().map(|(s, _)| *s).collect();
        assert_eq!(subjects, vec!["Math", "Eng", "Bio"]);
    }

    #[test]
    fn test_marks_are_displayed_verbatim() {
        let marks: MarksRecord = serde_json::from_value(json!({
            "external": {"DS": 92, "OS": "A+", "CN": 91.5, "ML": "075"}
        }))
        .unwrap();

        assert_eq!(
            marks.external_entries(),
            vec![
                ("DS", "92".to_string()),
                ("OS", "A+".to_string()),
                ("CN", "91.5".to_string()),
                ("ML", "075".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_and_null_groupings_are_empty() {
        let marks: MarksRecord =
            serde_json::from_value(json!({ "internal": {"DS": "88"}, "external": null })).unwrap();
        assert_eq!(marks.internal_entries().len(), 1);
        assert!(marks.external_entries().is_empty());

        let marks: MarksRecord = serde_json::from_value(json!({ "internal": {} })).unwrap();
        assert!(marks.internal_entries().is_empty());
        assert!(marks.external_entries().is_empty());
    }

    #[test]
    fn test_non_object_grouping_is_rejected() {
        assert!(serde_json::from_value::<MarksRecord>(json!({ "internal": "90" })).is_err());
    }
}
