use crate::config::ConflictPolicy;
use crate::domain::model::Record;
use crate::domain::ports::TableClient;
use crate::utils::error::{ImportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Inserted,
    Updated,
    Replaced,
}

/// Performs exactly one of insert / update-or-insert / replace-or-insert for `record`.
pub async fn upload_record<C: TableClient + ?Sized>(
    client: &C,
    policy: &ConflictPolicy,
    record: &Record,
) -> Result<UploadOutcome> {
    match policy {
        ConflictPolicy::Insert => {
            client.insert(record).await?;
            Ok(UploadOutcome::Inserted)
        }
        ConflictPolicy::Update { id_field } => {
            let key = record
                .get(id_field)
                .ok_or_else(|| missing_id_field(id_field))?;
            match client.update_by_field(id_field, key, record).await? {
                Some(_) => Ok(UploadOutcome::Updated),
                None => insert_fallback(client, id_field, record).await,
            }
        }
        ConflictPolicy::Replace { id_field } => {
            let key = record
                .get(id_field)
                .ok_or_else(|| missing_id_field(id_field))?;
            match client.replace_by_field(id_field, key, record).await? {
                Some(_) => Ok(UploadOutcome::Replaced),
                None => insert_fallback(client, id_field, record).await,
            }
        }
    }
}

async fn insert_fallback<C: TableClient + ?Sized>(
    client: &C,
    id_field: &str,
    record: &Record,
) -> Result<UploadOutcome> {
    tracing::debug!("No row matched {}, inserting", id_field);
    client.insert(record).await?;
    Ok(UploadOutcome::Inserted)
}

fn missing_id_field(id_field: &str) -> ImportError {
    ImportError::MissingIdField {
        field: id_field.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::model::{FieldValue, RemoteRecord};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Insert(Record),
        Update(String, FieldValue),
        Replace(String, FieldValue),
    }

    /// Records every call; rows whose key is in `existing` count as matches.
    #[derive(Clone, Default)]
    pub struct MockTableClient {
        pub calls: Arc<Mutex<Vec<Call>>>,
        pub existing: HashSet<String>,
        pub fail_on_insert: Option<usize>,
    }

    impl MockTableClient {
        pub fn with_existing(keys: &[&str]) -> Self {
            Self {
                existing: keys.iter().map(|k| k.to_string()).collect(),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn matched(&self, value: &FieldValue) -> Option<RemoteRecord> {
            let key = value.scalar_text()?;
            self.existing.contains(&key).then(|| RemoteRecord {
                id: format!("rec{}", key),
                fields: Default::default(),
                created_time: None,
            })
        }
    }

    #[async_trait]
    impl TableClient for MockTableClient {
        async fn insert(&self, record: &Record) -> Result<RemoteRecord> {
            let mut calls = self.calls.lock().unwrap();
            let inserts = calls.iter().filter(|c| matches!(c, Call::Insert(_))).count();
            if self.fail_on_insert == Some(inserts + 1) {
                return Err(ImportError::AirtableApi {
                    status: 429,
                    error_type: None,
                    message: "Rate limit exceeded".to_string(),
                });
            }
            calls.push(Call::Insert(record.clone()));
            Ok(RemoteRecord {
                id: format!("rec{}", inserts + 1),
                fields: Default::default(),
                created_time: None,
            })
        }

        async fn update_by_field(
            &self,
            field: &str,
            value: &FieldValue,
            _record: &Record,
        ) -> Result<Option<RemoteRecord>> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Update(field.to_string(), value.clone()));
            Ok(self.matched(value))
        }

        async fn replace_by_field(
            &self,
            field: &str,
            value: &FieldValue,
            _record: &Record,
        ) -> Result<Option<RemoteRecord>> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Replace(field.to_string(), value.clone()));
            Ok(self.matched(value))
        }
    }

    fn record(email: &str) -> Record {
        [("Email", email), ("Name", "Someone")].into_iter().collect()
    }

    fn update() -> ConflictPolicy {
        ConflictPolicy::Update {
            id_field: "Email".to_string(),
        }
    }

    fn replace() -> ConflictPolicy {
        ConflictPolicy::Replace {
            id_field: "Email".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_policy_never_looks_up() {
        let client = MockTableClient::with_existing(&["a@x.com"]);
        let outcome = upload_record(&client, &ConflictPolicy::Insert, &record("a@x.com"))
            .await
            .unwrap();

        assert_eq!(outcome, UploadOutcome::Inserted);
        assert_eq!(client.calls(), vec![Call::Insert(record("a@x.com"))]);
    }

    #[tokio::test]
    async fn test_update_without_match_falls_back_to_insert() {
        let client = MockTableClient::default();
        let outcome = upload_record(&client, &update(), &record("new@x.com")).await.unwrap();

        assert_eq!(outcome, UploadOutcome::Inserted);
        assert_eq!(
            client.calls(),
            vec![
                Call::Update("Email".to_string(), FieldValue::from("new@x.com")),
                Call::Insert(record("new@x.com")),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_with_match_does_not_insert() {
        let client = MockTableClient::with_existing(&["a@x.com"]);
        let outcome = upload_record(&client, &update(), &record("a@x.com")).await.unwrap();

        assert_eq!(outcome, UploadOutcome::Updated);
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_with_match_does_not_insert() {
        let client = MockTableClient::with_existing(&["a@x.com"]);
        let outcome = upload_record(&client, &replace(), &record("a@x.com")).await.unwrap();

        assert_eq!(outcome, UploadOutcome::Replaced);
        assert_eq!(
            client.calls(),
            vec![Call::Replace("Email".to_string(), FieldValue::from("a@x.com"))]
        );
    }

    #[tokio::test]
    async fn test_replace_without_match_falls_back_to_insert() {
        let client = MockTableClient::default();
        let outcome = upload_record(&client, &replace(), &record("b@x.com")).await.unwrap();

        assert_eq!(outcome, UploadOutcome::Inserted);
        assert_eq!(client.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_id_value_is_fatal() {
        let client = MockTableClient::default();
        let no_email: Record = [("Name", "Nobody")].into_iter().collect();

        let err = upload_record(&client, &update(), &no_email).await.unwrap_err();

        assert!(matches!(err, ImportError::MissingIdField { ref field } if field == "Email"));
        assert!(client.calls().is_empty());
    }
}
