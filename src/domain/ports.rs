use crate::domain::model::{FieldValue, Record, RemoteRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The remote table. `None` from the `*_by_field` calls means no existing row matched.
#[async_trait]
pub trait TableClient: Send + Sync {
    async fn insert(&self, record: &Record) -> Result<RemoteRecord>;

    /// Merges `record` into the first row whose `field` equals `value`.
    async fn update_by_field(
        &self,
        field: &str,
        value: &FieldValue,
        record: &Record,
    ) -> Result<Option<RemoteRecord>>;

    /// Overwrites the first row whose `field` equals `value`; unspecified fields are cleared.
    async fn replace_by_field(
        &self,
        field: &str,
        value: &FieldValue,
        record: &Record,
    ) -> Result<Option<RemoteRecord>>;
}
