use crate::domain::model::{FieldValue, Record};
use crate::utils::error::{ImportError, Result};

/// Rewrites each named field present in `record` from a bare value into `[{url: value}]`.
/// Absent names are skipped; values already in attachment form are left alone.
/// Null and nested values have no URL form and fail the record.
pub fn apply_attachment_fields(record: &mut Record, attachment_fields: &[String]) -> Result<()> {
    for name in attachment_fields {
        let Some(value) = record.get_mut(name) else {
            continue;
        };
        if matches!(value, FieldValue::Attachments(_)) {
            continue;
        }
        match value.scalar_text() {
            Some(url) => *value = FieldValue::attachment(url),
            None => {
                return Err(ImportError::InvalidAttachment {
                    field: name.clone(),
                    value: serde_json::to_string(value).unwrap_or_default(),
                });
            }
        }
    }
    Ok(())
}
