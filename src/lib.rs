pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::AirtableClient;
pub use config::{CliArgs, ConflictPolicy, ImportSettings, InputFormat};
pub use core::engine::{ImportEngine, ImportSummary};
pub use domain::model::{AttachmentRef, FieldValue, Record, RemoteRecord};
pub use domain::ports::TableClient;
pub use utils::error::{ImportError, Result};
