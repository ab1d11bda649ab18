use crate::config::cli::CliArgs;
use crate::config::toml_config::{AirtableProfile, TomlConfig};
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_required_field, validate_url, Validate,
};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.airtable.com/v0";
pub const API_KEY_ENV: &str = "AIRTABLE_API_KEY";
pub const BASE_KEY_ENV: &str = "AIRTABLE_BASE_KEY";

/// What to do when a record's primary field already exists in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictPolicy {
    Insert,
    Update { id_field: String },
    Replace { id_field: String },
}

impl ConflictPolicy {
    pub fn id_field(&self) -> Option<&str> {
        match self {
            ConflictPolicy::Insert => None,
            ConflictPolicy::Update { id_field } | ConflictPolicy::Replace { id_field } => {
                Some(id_field)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

#[derive(Clone)]
pub struct ConnectionSettings {
    pub api_key: String,
    pub base_key: String,
    pub table: String,
    pub endpoint: String,
    pub typecast: bool,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("api_key", &"<redacted>")
            .field("base_key", &self.base_key)
            .field("table", &self.table)
            .field("endpoint", &self.endpoint)
            .field("typecast", &self.typecast)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Fully resolved run configuration. Never mutated after `resolve`.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub connection: ConnectionSettings,
    pub policy: ConflictPolicy,
    pub attachment_fields: Vec<String>,
    pub input_format: InputFormat,
}

impl ImportSettings {
    /// Resolves flags, environment and the optional profile file.
    ///
    /// Flag conflicts are reported before the profile is read, so a bad
    /// command line fails the same way with or without `--config`.
    pub fn resolve(args: &CliArgs) -> Result<Self> {
        let policy = resolve_policy(args)?;

        let profile = match &args.config {
            Some(path) => TomlConfig::from_file(path)?.airtable,
            None => AirtableProfile::default(),
        };

        Self::from_parts(args, policy, profile, env_var)
    }

    /// Same as `resolve` with an already loaded profile.
    pub fn resolve_with_profile(args: &CliArgs, profile: AirtableProfile) -> Result<Self> {
        let policy = resolve_policy(args)?;
        Self::from_parts(args, policy, profile, env_var)
    }

    fn from_parts(
        args: &CliArgs,
        policy: ConflictPolicy,
        profile: AirtableProfile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        // A blank flag (`--api-key ""`) falls through to the environment, then the profile.
        let api_key = non_blank(args.api_key.clone())
            .or_else(|| non_blank(env(API_KEY_ENV)))
            .or(profile.api_key);
        let api_key = validate_required_field("api_key", api_key)?;
        let base_key = non_blank(args.base_key.clone())
            .or_else(|| non_blank(env(BASE_KEY_ENV)))
            .or(profile.base_key);
        let base_key = validate_required_field("base_key", base_key)?;

        let endpoint = args
            .endpoint
            .clone()
            .or(profile.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let settings = ImportSettings {
            connection: ConnectionSettings {
                api_key,
                base_key,
                table: args.table.clone(),
                endpoint,
                typecast: args.typecast || profile.typecast.unwrap_or(false),
                timeout: profile.request_timeout_seconds.map(Duration::from_secs),
            },
            policy,
            attachment_fields: args.attachment_fields.clone(),
            input_format: if args.json {
                InputFormat::Json
            } else {
                InputFormat::Csv
            },
        };

        settings.validate()?;
        tracing::debug!("Resolved settings: {:?}", settings);
        Ok(settings)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn resolve_policy(args: &CliArgs) -> Result<ConflictPolicy> {
    if args.update && args.replace {
        return Err(ImportError::ConfigError {
            message: "Cannot specify both --update and --replace".to_string(),
        });
    }

    if !(args.update || args.replace) {
        return Ok(ConflictPolicy::Insert);
    }

    let id_field = args
        .id_field
        .clone()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ImportError::ConfigError {
            message: "You must specify a primary field when using --update or --replace"
                .to_string(),
        })?;

    Ok(if args.update {
        ConflictPolicy::Update { id_field }
    } else {
        ConflictPolicy::Replace { id_field }
    })
}

impl Validate for ImportSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("table", &self.connection.table)?;
        validate_url("endpoint", &self.connection.endpoint)?;
        if self.connection.timeout == Some(Duration::ZERO) {
            return Err(ImportError::InvalidConfigValueError {
                field: "request_timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be at least 1 second".to_string(),
            });
        }
        Ok(())
    }
}
