use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The form the service expects for a file attachment field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttachmentRef {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Attachments(Vec<AttachmentRef>),
    /// Booleans, nulls and nested values from JSON input, passed through untouched.
    Json(serde_json::Value),
}

impl FieldValue {
    pub fn attachment(url: impl Into<String>) -> Self {
        FieldValue::Attachments(vec![AttachmentRef { url: url.into() }])
    }

    /// Text form of a scalar value, used when the value becomes an attachment URL.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Json(serde_json::Value::Bool(b)) => Some(b.to_string()),
            FieldValue::Attachments(_) | FieldValue::Json(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

/// One input row: field name to value. Serializes as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A row as stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub id: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "createdTime", default)]
    pub created_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_deserializes_mixed_values() {
        let record: Record = serde_json::from_value(json!({
            "Name": "Alice",
            "Age": 31,
            "Active": true,
            "Photo": [{"url": "https://example.com/a.png"}],
            "Tags": ["a", "b"]
        }))
        .unwrap();

        assert_eq!(record.get("Name"), Some(&FieldValue::from("Alice")));
        assert_eq!(record.get("Age"), Some(&FieldValue::from(31_i64)));
        assert_eq!(record.get("Active"), Some(&FieldValue::Json(json!(true))));
        assert_eq!(
            record.get("Photo"),
            Some(&FieldValue::attachment("https://example.com/a.png"))
        );
        assert_eq!(record.get("Tags"), Some(&FieldValue::Json(json!(["a", "b"]))));
    }

    #[test]
    fn test_record_serializes_flat() {
        let mut record = Record::new();
        record.insert("Name", "Bob");
        record.insert("Avatar", FieldValue::attachment("https://example.com/b.png"));

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "Avatar": [{"url": "https://example.com/b.png"}],
                "Name": "Bob"
            })
        );
    }

    #[test]
    fn test_attachment_with_extra_keys_stays_json() {
        let value: FieldValue =
            serde_json::from_value(json!([{"url": "u", "filename": "f.png"}])).unwrap();
        assert!(matches!(value, FieldValue::Json(_)));
    }
}
