use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Field '{field}' cannot be sent as an attachment: {value}")]
    InvalidAttachment { field: String, value: String },

    #[error("Record has no value for primary field '{field}'")]
    MissingIdField { field: String },

    #[error("Airtable returned {status}: {message}")]
    AirtableApi {
        status: u16,
        error_type: Option<String>,
        message: String,
    },
}

impl ImportError {
    /// Message shown on stderr before the process exits.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ImportError::ConfigError { message } => message.clone(),
            ImportError::MissingConfigError { field } => match field.as_str() {
                "api_key" => {
                    "You must specify an api key in environment (AIRTABLE_API_KEY) or --api-key"
                        .to_string()
                }
                "base_key" => {
                    "You must specify a base key in environment (AIRTABLE_BASE_KEY) or --base-key"
                        .to_string()
                }
                other => format!("Missing required option: {}", other),
            },
            ImportError::CsvError(e) => format!("Could not parse CSV input: {}", e),
            ImportError::SerializationError(e) => format!("Could not parse JSON input: {}", e),
            ImportError::AirtableApi {
                status,
                error_type: Some(kind),
                message,
            } => format!("Airtable rejected the request ({} {}): {}", status, kind, message),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ImportError::ConfigError { .. }
            | ImportError::MissingConfigError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::TomlError(_)
            | ImportError::UrlError(_) => "Check the command line options and config file",
            ImportError::CsvError(_) => {
                "Check that the input has a header row and a consistent column count"
            }
            ImportError::SerializationError(_) => {
                "Check that the input is a JSON array of objects"
            }
            ImportError::InvalidAttachment { .. } => {
                "Attachment fields must hold a single URL string"
            }
            ImportError::MissingIdField { .. } => {
                "Make sure every input record carries the --id-field column"
            }
            ImportError::AirtableApi { status: 401, .. }
            | ImportError::AirtableApi { status: 403, .. } => {
                "Check the API key and that it has access to the base"
            }
            ImportError::AirtableApi { status: 404, .. } => "Check the base key and table name",
            ImportError::AirtableApi { status: 422, .. } => {
                "Check that field names and values match the table schema, or try --typecast"
            }
            ImportError::AirtableApi { status: 429, .. } => {
                "Rate limited by Airtable; records already uploaded remain committed"
            }
            ImportError::AirtableApi { .. } | ImportError::ApiError(_) => {
                "Check network connectivity and the Airtable service status"
            }
            ImportError::IoError(_) => "Check that standard input and output are readable/writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_messages_name_the_env_var() {
        let api = ImportError::MissingConfigError {
            field: "api_key".to_string(),
        };
        assert!(api.user_friendly_message().contains("AIRTABLE_API_KEY"));

        let base = ImportError::MissingConfigError {
            field: "base_key".to_string(),
        };
        assert!(base.user_friendly_message().contains("AIRTABLE_BASE_KEY"));
    }

    #[test]
    fn test_api_error_includes_service_type() {
        let err = ImportError::AirtableApi {
            status: 422,
            error_type: Some("INVALID_VALUE_FOR_COLUMN".to_string()),
            message: "Field \"Age\" cannot accept the provided value".to_string(),
        };
        let msg = err.user_friendly_message();
        assert!(msg.contains("422"));
        assert!(msg.contains("INVALID_VALUE_FOR_COLUMN"));
        assert!(err.recovery_suggestion().contains("typecast"));
    }
}
