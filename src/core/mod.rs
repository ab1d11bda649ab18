pub mod engine;
pub mod progress;
pub mod reader;
pub mod transform;
pub mod uploader;

pub use crate::domain::model::{FieldValue, Record};
pub use crate::domain::ports::TableClient;
pub use crate::utils::error::Result;
