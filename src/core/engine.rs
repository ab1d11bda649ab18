use crate::config::{ConflictPolicy, ImportSettings, InputFormat};
use crate::core::progress::ProgressReporter;
use crate::core::reader::read_records;
use crate::core::transform::apply_attachment_fields;
use crate::core::uploader::{upload_record, UploadOutcome};
use crate::domain::ports::TableClient;
use crate::utils::error::Result;
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub processed: usize,
    pub inserted: usize,
    pub updated: usize,
    pub replaced: usize,
}

/// Reads, transforms and uploads records one at a time.
pub struct ImportEngine<C: TableClient> {
    client: C,
    policy: ConflictPolicy,
    attachment_fields: Vec<String>,
    input_format: InputFormat,
}

impl<C: TableClient> ImportEngine<C> {
    pub fn new(client: C, settings: &ImportSettings) -> Self {
        Self {
            client,
            policy: settings.policy.clone(),
            attachment_fields: settings.attachment_fields.clone(),
            input_format: settings.input_format,
        }
    }

    /// Stops at the first failing record; earlier uploads stay committed.
    pub async fn run<R: Read, W: Write>(&self, input: R, out: W) -> Result<ImportSummary> {
        tracing::info!("Starting import ({:?} input, {:?})", self.input_format, self.policy);

        let records = read_records(self.input_format, input)?;
        let mut progress = ProgressReporter::new(out);
        let mut summary = ImportSummary::default();

        for record in records {
            let mut record = record?;
            apply_attachment_fields(&mut record, &self.attachment_fields)?;

            match upload_record(&self.client, &self.policy, &record).await? {
                UploadOutcome::Inserted => summary.inserted += 1,
                UploadOutcome::Updated => summary.updated += 1,
                UploadOutcome::Replaced => summary.replaced += 1,
            }

            progress.tick()?;
        }

        summary.processed = progress.count();
        progress.finish()?;

        tracing::info!(
            "Import finished: {} records ({} inserted, {} updated, {} replaced)",
            summary.processed,
            summary.inserted,
            summary.updated,
            summary.replaced
        );
        Ok(summary)
    }
}
